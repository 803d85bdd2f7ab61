//! bomscan - source-tree dependency scanner for bill-of-materials reporting
//!
//! This library walks a source tree, discovers the manifest files that mark
//! dependency-bearing projects across many package-manager ecosystems,
//! evaluates whether each ecosystem's detector can actually extract
//! dependencies there, runs extraction, and merges the per-location
//! dependency graphs into one project-level graph.
//!
//! # Core Concepts
//!
//! - **Detector**: a pluggable unit recognizing and extracting dependency
//!   data for one ecosystem (npm, cargo, maven, ...)
//! - **Search**: the recursive, prunable directory walk deciding where each
//!   detector applies
//! - **Evaluation**: the per (detector, directory) state machine
//!   `Applies → NeedsMet → DemandsMet → Extracted`, isolating failure per
//!   pair
//! - **Aggregation**: merging every code location's graph into one project
//!   graph with collision-free wrapper identifiers
//!
//! # Example Usage
//!
//! ```no_run
//! use bomscan::config::ScanConfig;
//! use bomscan::scan::{ScanOrchestrator, StopSignal};
//! use std::path::PathBuf;
//!
//! fn scan() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = ScanConfig::new(PathBuf::from("/path/to/source"));
//!     config.aggregate_name = Some("everything".to_string());
//!
//!     let orchestrator = ScanOrchestrator::with_defaults(config);
//!     let outcome = orchestrator.run(&StopSignal::new())?;
//!
//!     for document in &outcome.documents {
//!         println!("wrote {}", document.display());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Project Structure
//!
//! - [`bomtool`]: the detector contract and built-in ecosystem detectors
//! - [`search`]: exclusion matching and the pruning directory walk
//! - [`evaluate`]: the evaluation state machine and precondition cache
//! - [`graph`]: external ids, dependency graphs, and aggregation
//! - [`document`]: output document model, naming, and the file writer
//! - [`scan`]: run orchestration, cancellation, and exit codes

// Public modules
pub mod bomtool;
pub mod cli;
pub mod config;
pub mod document;
pub mod evaluate;
pub mod graph;
pub mod report;
pub mod scan;
pub mod search;
pub mod util;

// Re-export key types for convenient access
pub use bomtool::{
    Applicability, CodeLocation, Detector, DetectorId, DetectorRegistry, Extraction,
    ExtractionOutcome, Precondition, ToolType,
};
pub use config::{ConfigError, ScanConfig};
pub use document::{OutputWriter, ScanDocument};
pub use evaluate::{DetectorEvaluator, Evaluation, Outcome, PreconditionCache};
pub use graph::{DependencyGraph, DependencyNode, ExternalId, Forge, GraphAggregator};
pub use scan::{ExitCodeType, ScanError, ScanOrchestrator, ScanOutcome, StopSignal};
pub use search::{ExclusionMatcher, SearchEngine, SearchError, SearchOptions};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
