//! Recursive, prunable directory search

use super::ExclusionMatcher;
use crate::bomtool::{Applicability, Detector};
use crate::scan::StopSignal;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Fatal search-stage errors. Failure to enumerate a directory's children
/// aborts that branch and propagates; it is never silently skipped.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("could not list the subdirectories of {path}: {source}")]
    DirectoryListing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Knobs controlling the walk. `max_depth` counts the root directory as
/// depth 1.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub max_depth: usize,
    pub exclusions: ExclusionMatcher,
    pub force_nested_search: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_depth: 10,
            exclusions: ExclusionMatcher::default(),
            force_nested_search: false,
        }
    }
}

/// Walks a source tree and asks every still-live detector whether it
/// applies in each directory.
///
/// A detector that applies in a directory is by default removed from
/// consideration for that directory's descendants; removal is scoped to
/// that subtree only, so the detector is still evaluated in sibling
/// subtrees. `force_nested_search` and a detector's own
/// `searchable_within_applicable_directories` capability both disable the
/// removal.
pub struct SearchEngine {
    options: SearchOptions,
}

impl SearchEngine {
    pub fn new(options: SearchOptions) -> Self {
        Self { options }
    }

    pub fn search(
        &self,
        detectors: &[Arc<dyn Detector>],
        root: &Path,
        stop: &StopSignal,
    ) -> Result<Vec<Applicability>, SearchError> {
        self.search_directories(detectors, &[root.to_path_buf()], 1, stop)
    }

    /// Each directory's result list is built independently and folded into
    /// the parent's list, keeping the recursion free of shared mutable
    /// state.
    fn search_directories(
        &self,
        detectors: &[Arc<dyn Detector>],
        directories: &[PathBuf],
        depth: usize,
        stop: &StopSignal,
    ) -> Result<Vec<Applicability>, SearchError> {
        let mut results = Vec::new();

        if depth > self.options.max_depth || directories.is_empty() {
            return Ok(results);
        }

        for directory in directories {
            if stop.is_stopped() {
                debug!("Stop signal raised, not searching further directories");
                return Ok(results);
            }

            let mut remaining: Vec<Arc<dyn Detector>> = Vec::with_capacity(detectors.len());
            let mut applied_here = Vec::new();
            for detector in detectors {
                if self.detector_applies(detector, directory) {
                    applied_here.push(detector.id().to_string());
                    results.push(Applicability {
                        detector: Arc::clone(detector),
                        directory: directory.clone(),
                        depth,
                    });
                    if self.stops_searching_when_applicable(detector.as_ref()) {
                        // pruned from this subtree only; siblings still see it
                        continue;
                    }
                }
                remaining.push(Arc::clone(detector));
            }
            debug!(
                directory = %directory.display(),
                applicable = applied_here.join(", "),
                "Directory searched"
            );

            if !remaining.is_empty() {
                let subdirectories = self.subdirectories(directory)?;
                let nested = self.search_directories(&remaining, &subdirectories, depth + 1, stop)?;
                results.extend(nested);
            }
        }

        Ok(results)
    }

    fn detector_applies(&self, detector: &Arc<dyn Detector>, directory: &Path) -> bool {
        // A plugin panic in applies() must not take down the whole search.
        catch_unwind(AssertUnwindSafe(|| detector.applies(directory))).unwrap_or_else(|_| {
            warn!(
                detector = %detector.id(),
                directory = %directory.display(),
                "Detector panicked during applies(), treating as not applicable"
            );
            false
        })
    }

    fn stops_searching_when_applicable(&self, detector: &dyn Detector) -> bool {
        if self.options.force_nested_search {
            return false;
        }
        if detector.searchable_within_applicable_directories() {
            return false;
        }
        true
    }

    fn subdirectories(&self, directory: &Path) -> Result<Vec<PathBuf>, SearchError> {
        let entries = std::fs::read_dir(directory).map_err(|source| {
            SearchError::DirectoryListing {
                path: directory.to_path_buf(),
                source,
            }
        })?;

        let mut subdirectories = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| SearchError::DirectoryListing {
                path: directory.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name,
                None => continue,
            };
            if self.options.exclusions.is_excluded(name) {
                continue;
            }
            subdirectories.push(path);
        }
        // read_dir order is platform-dependent; sort for a deterministic walk
        subdirectories.sort();
        Ok(subdirectories)
    }
}
