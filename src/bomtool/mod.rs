//! Detector contract and per-ecosystem detectors
//!
//! A [`Detector`] is a pluggable unit that can recognize and extract
//! dependency data for one package-manager ecosystem. The core engine only
//! ever sees this contract: an `applies` predicate evaluated during the
//! directory search, declared preconditions ("needs") and inter-detector
//! demands checked by the evaluator, and an `extract` step producing zero or
//! more [`CodeLocation`]s.

mod cargo;
mod go_mod;
mod maven;
mod npm;
mod pip;
mod registry;
mod yarn;

pub use cargo::CargoDetector;
pub use go_mod::GoModDetector;
pub use maven::MavenPomDetector;
pub use npm::NpmPackageJsonDetector;
pub use pip::PipRequirementsDetector;
pub use registry::DetectorRegistry;
pub use yarn::YarnLockDetector;

pub use cargo::CARGO_TOML;
pub use go_mod::GO_MOD;
pub use maven::MAVEN_POM;
pub use npm::NPM_PACKAGE_JSON;
pub use pip::PIP_REQUIREMENTS;
pub use yarn::YARN_LOCK;

use crate::graph::{DependencyGraph, ExternalId};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Stable identity of a detector type. One id per registered variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DetectorId(pub &'static str);

impl fmt::Display for DetectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Ecosystem/tool tag carried through code locations and output naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolType {
    Npm,
    Yarn,
    Cargo,
    Maven,
    GoMod,
    Pip,
}

impl ToolType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolType::Npm => "NPM",
            ToolType::Yarn => "YARN",
            ToolType::Cargo => "CARGO",
            ToolType::Maven => "MAVEN",
            ToolType::GoMod => "GO_MOD",
            ToolType::Pip => "PIP",
        }
    }
}

impl fmt::Display for ToolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Environment-level precondition a detector requires before extraction.
///
/// Checks are pure functions of the detector type, not the directory, and
/// are memoized per run (see [`crate::evaluate::PreconditionCache`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Precondition {
    /// An executable resolvable through `PATH`.
    ExecutableOnPath(String),
    /// An environment variable that must be set and non-empty.
    EnvVarSet(String),
    /// A file at an absolute path, e.g. a companion inspector install.
    FileExists(PathBuf),
}

impl fmt::Display for Precondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Precondition::ExecutableOnPath(name) => write!(f, "executable on PATH: {}", name),
            Precondition::EnvVarSet(name) => write!(f, "environment variable: {}", name),
            Precondition::FileExists(path) => write!(f, "file: {}", path.display()),
        }
    }
}

/// The extracted output of one successful (detector, directory) evaluation.
#[derive(Debug, Clone)]
pub struct CodeLocation {
    pub source_path: PathBuf,
    pub tool_type: ToolType,
    pub external_id: ExternalId,
    pub graph: DependencyGraph,
}

/// How an extraction attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionOutcome {
    /// Zero or more code locations produced.
    Success,
    /// The detector determined it cannot actually proceed. Expected and
    /// recoverable, not a system error.
    Failure,
    /// An unexpected fault. The triggering error is captured, not rethrown.
    Exception,
}

/// Result of a detector's `extract` call.
#[derive(Debug)]
pub struct Extraction {
    pub outcome: ExtractionOutcome,
    pub code_locations: Vec<CodeLocation>,
    pub error: Option<anyhow::Error>,
}

impl Extraction {
    pub fn success(code_locations: Vec<CodeLocation>) -> Self {
        Self {
            outcome: ExtractionOutcome::Success,
            code_locations,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            outcome: ExtractionOutcome::Failure,
            code_locations: Vec::new(),
            error: Some(anyhow::anyhow!(message.into())),
        }
    }

    pub fn exception(error: anyhow::Error) -> Self {
        Self {
            outcome: ExtractionOutcome::Exception,
            code_locations: Vec::new(),
            error: Some(error),
        }
    }
}

/// Contract implemented by every per-ecosystem detector.
pub trait Detector: Send + Sync {
    fn id(&self) -> DetectorId;

    fn tool_type(&self) -> ToolType;

    /// Whether this ecosystem's marker is present in `directory`.
    fn applies(&self, directory: &Path) -> bool;

    /// When true the search keeps evaluating this detector inside
    /// directories where it already applied.
    fn searchable_within_applicable_directories(&self) -> bool {
        false
    }

    fn needs(&self) -> Vec<Precondition> {
        Vec::new()
    }

    /// Ids of detectors whose applicability in the same directory must be
    /// known before this one may extract.
    fn demands(&self) -> Vec<DetectorId> {
        Vec::new()
    }

    fn extract(&self, directory: &Path) -> Extraction;
}

/// A detector match produced by the search stage.
#[derive(Clone)]
pub struct Applicability {
    pub detector: Arc<dyn Detector>,
    pub directory: PathBuf,
    pub depth: usize,
}

impl Applicability {
    pub fn detector_id(&self) -> DetectorId {
        self.detector.id()
    }

    pub fn tool_type(&self) -> ToolType {
        self.detector.tool_type()
    }
}

impl fmt::Debug for Applicability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Applicability")
            .field("detector", &self.detector.id())
            .field("directory", &self.directory)
            .field("depth", &self.depth)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_type_display() {
        assert_eq!(ToolType::Npm.to_string(), "NPM");
        assert_eq!(ToolType::GoMod.to_string(), "GO_MOD");
    }

    #[test]
    fn test_extraction_constructors() {
        let ok = Extraction::success(Vec::new());
        assert_eq!(ok.outcome, ExtractionOutcome::Success);
        assert!(ok.error.is_none());

        let failed = Extraction::failure("malformed manifest");
        assert_eq!(failed.outcome, ExtractionOutcome::Failure);
        assert!(failed.code_locations.is_empty());

        let exception = Extraction::exception(anyhow::anyhow!("disk on fire"));
        assert_eq!(exception.outcome, ExtractionOutcome::Exception);
        assert!(exception.error.is_some());
    }

    #[test]
    fn test_precondition_display() {
        assert_eq!(
            Precondition::ExecutableOnPath("mvn".into()).to_string(),
            "executable on PATH: mvn"
        );
    }
}
