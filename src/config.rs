//! Configuration management for bomscan
//!
//! Scan settings come from CLI arguments with environment-variable
//! fallbacks. Every knob has a sensible default except the source path.
//!
//! # Environment Variables
//!
//! - `BOMSCAN_OUTPUT_DIR`: Output directory for documents - default: "./bomscan-output"
//! - `BOMSCAN_MAX_DEPTH`: Maximum search depth (≥ 1) - default: "10"
//! - `BOMSCAN_EXCLUDED_DIRS`: Comma-separated directory-name globs appended
//!   to the built-in exclusion list
//! - `BOMSCAN_AGGREGATE_NAME`: When set, merge all code locations into one
//!   aggregate document with this name
//! - `BOMSCAN_LOG_LEVEL`: Logging level - default: "info"

use std::env;
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_OUTPUT_DIR: &str = "./bomscan-output";
const DEFAULT_MAX_DEPTH: usize = 10;

/// Directory names no ecosystem keeps manifests worth scanning in.
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &[
    ".git",
    ".idea",
    ".vscode",
    "node_modules",
    "target",
    "vendor",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("maximum search depth must be at least 1, got {0}")]
    InvalidMaxDepth(usize),

    #[error("source path must not be empty")]
    EmptySourcePath,

    #[error("invalid value for {variable}: {value}")]
    InvalidEnvValue { variable: String, value: String },
}

/// Full configuration for one scan run.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Root of the source tree to scan.
    pub source_path: PathBuf,
    /// Directory documents are written into.
    pub output_directory: PathBuf,
    /// Maximum recursion depth; the source root counts as depth 1.
    pub max_depth: usize,
    /// Directory-name globs never recursed into.
    pub excluded_directories: Vec<String>,
    /// Keep evaluating detectors inside directories where they applied.
    pub force_nested_search: bool,
    /// When set, merge everything into one aggregate document of this name.
    pub aggregate_name: Option<String>,
    pub project_name: String,
    pub project_version: Option<String>,
}

impl ScanConfig {
    /// Configuration with defaults for everything but the source path.
    /// The project name defaults to the source directory's name.
    pub fn new(source_path: PathBuf) -> Self {
        let project_name = source_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("project")
            .to_string();
        Self {
            source_path,
            output_directory: PathBuf::from(DEFAULT_OUTPUT_DIR),
            max_depth: DEFAULT_MAX_DEPTH,
            excluded_directories: DEFAULT_EXCLUDED_DIRS.iter().map(|s| s.to_string()).collect(),
            force_nested_search: false,
            aggregate_name: None,
            project_name,
            project_version: None,
        }
    }

    /// Applies `BOMSCAN_*` environment fallbacks on top of the defaults.
    /// Explicit setters afterwards still win.
    pub fn from_env(source_path: PathBuf) -> Result<Self, ConfigError> {
        let mut config = Self::new(source_path);

        if let Ok(dir) = env::var("BOMSCAN_OUTPUT_DIR") {
            config.output_directory = PathBuf::from(dir);
        }
        if let Ok(depth) = env::var("BOMSCAN_MAX_DEPTH") {
            config.max_depth =
                depth
                    .parse()
                    .map_err(|_| ConfigError::InvalidEnvValue {
                        variable: "BOMSCAN_MAX_DEPTH".to_string(),
                        value: depth.clone(),
                    })?;
        }
        if let Ok(excluded) = env::var("BOMSCAN_EXCLUDED_DIRS") {
            config.excluded_directories.extend(
                excluded
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string),
            );
        }
        if let Ok(name) = env::var("BOMSCAN_AGGREGATE_NAME") {
            if !name.is_empty() {
                config.aggregate_name = Some(name);
            }
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth < 1 {
            return Err(ConfigError::InvalidMaxDepth(self.max_depth));
        }
        if self.source_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptySourcePath);
        }
        Ok(())
    }
}
