//! End-to-end scan orchestration

use super::{ExitCodeType, StopSignal};
use crate::bomtool::{CodeLocation, DetectorRegistry};
use crate::config::{ConfigError, ScanConfig};
use crate::document::{
    aggregate_file_name, code_location_file_name, code_location_name, DocumentError, OutputWriter,
    ScanDocument,
};
use crate::evaluate::{DetectorEvaluator, Evaluation, Outcome, PreconditionCache};
use crate::graph::{ExternalId, Forge, GraphAggregator};
use crate::report::print_extraction_summary;
use crate::search::{ExclusionMatcher, SearchEngine, SearchError, SearchOptions};
use std::path::PathBuf;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};

/// Run-aborting failures, each mapped to an exit-code category for
/// process-level reporting. Per-detector failures never end up here; they
/// are recorded in the evaluations instead.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("source path not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("source path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("could not canonicalize source path {path}: {source}")]
    Canonicalize {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Document(#[from] DocumentError),
}

impl ScanError {
    pub fn exit_code(&self) -> ExitCodeType {
        match self {
            ScanError::Config(_) => ExitCodeType::FailureConfiguration,
            _ => ExitCodeType::FailureGeneralError,
        }
    }
}

/// What a finished (or cooperatively stopped) run produced.
#[derive(Debug)]
pub struct ScanOutcome {
    pub evaluations: Vec<Evaluation>,
    pub code_locations: Vec<CodeLocation>,
    pub documents: Vec<PathBuf>,
    pub stopped: bool,
}

/// Drives one run: search → evaluation → aggregation/output.
pub struct ScanOrchestrator {
    config: ScanConfig,
    registry: DetectorRegistry,
}

impl ScanOrchestrator {
    pub fn new(config: ScanConfig, registry: DetectorRegistry) -> Self {
        Self { config, registry }
    }

    pub fn with_defaults(config: ScanConfig) -> Self {
        Self::new(config, DetectorRegistry::with_defaults())
    }

    pub fn run(&self, stop: &StopSignal) -> Result<ScanOutcome, ScanError> {
        let start = Instant::now();
        self.config.validate()?;
        let source_root = self.canonical_source_root()?;

        info!(
            source = %source_root.display(),
            max_depth = self.config.max_depth,
            detectors = self.registry.len(),
            "Starting scan"
        );

        let engine = SearchEngine::new(SearchOptions {
            max_depth: self.config.max_depth,
            exclusions: ExclusionMatcher::new(&self.config.excluded_directories),
            force_nested_search: self.config.force_nested_search,
        });
        let applicabilities = engine.search(self.registry.detectors(), &source_root, stop)?;
        debug!(applicable = applicabilities.len(), "Search completed");

        let evaluator = DetectorEvaluator::new(PreconditionCache::new());
        let evaluations = evaluator.evaluate_all(&applicabilities, stop);
        print_extraction_summary(&evaluations);

        let code_locations: Vec<CodeLocation> = evaluations
            .iter()
            .filter(|e| e.outcome == Outcome::Success)
            .flat_map(|e| e.code_locations.iter().cloned())
            .collect();

        let documents = match &self.config.aggregate_name {
            Some(aggregate_name) => {
                self.write_aggregate(&source_root, aggregate_name, &code_locations)?
            }
            None => self.write_per_location(&source_root, &code_locations)?,
        };

        info!(
            code_locations = code_locations.len(),
            documents = documents.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Scan completed"
        );

        Ok(ScanOutcome {
            evaluations,
            code_locations,
            documents,
            stopped: stop.is_stopped(),
        })
    }

    fn canonical_source_root(&self) -> Result<PathBuf, ScanError> {
        let path = &self.config.source_path;
        if !path.exists() {
            return Err(ScanError::SourceNotFound(path.clone()));
        }
        if !path.is_dir() {
            return Err(ScanError::NotADirectory(path.clone()));
        }
        path.canonicalize().map_err(|source| ScanError::Canonicalize {
            path: path.clone(),
            source,
        })
    }

    fn write_aggregate(
        &self,
        source_root: &std::path::Path,
        aggregate_name: &str,
        code_locations: &[CodeLocation],
    ) -> Result<Vec<PathBuf>, ScanError> {
        let aggregator = GraphAggregator::new(source_root);
        let aggregate_graph = aggregator.build_aggregate(code_locations);

        let project_external_id = ExternalId::name_version(
            Forge::ROOT,
            &self.config.project_name,
            self.config.project_version.as_deref(),
        );
        let document = ScanDocument::new(
            aggregate_name.to_string(),
            &self.config.project_name,
            self.config.project_version.as_deref(),
            project_external_id,
            aggregate_graph,
        );

        let writer = OutputWriter::new(&self.config.output_directory);
        let path = writer.write(&aggregate_file_name(aggregate_name), &document)?;
        Ok(vec![path])
    }

    fn write_per_location(
        &self,
        source_root: &std::path::Path,
        code_locations: &[CodeLocation],
    ) -> Result<Vec<PathBuf>, ScanError> {
        let writer = OutputWriter::new(&self.config.output_directory);
        let mut documents = Vec::with_capacity(code_locations.len());
        for location in code_locations {
            let document = ScanDocument::new(
                code_location_name(
                    &self.config.project_name,
                    self.config.project_version.as_deref(),
                    location.tool_type,
                ),
                &self.config.project_name,
                self.config.project_version.as_deref(),
                location.external_id.clone(),
                location.graph.clone(),
            );
            let file_name = code_location_file_name(&self.config.project_name, source_root, location);
            documents.push(writer.write(&file_name, &document)?);
        }
        Ok(documents)
    }
}
