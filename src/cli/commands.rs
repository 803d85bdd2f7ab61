use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Source-tree dependency scanner for bill-of-materials reporting
#[derive(Parser, Debug)]
#[command(
    name = "bomscan",
    about = "Scan a source tree for package-manager projects and produce a dependency bill of materials",
    version,
    long_about = "bomscan walks a source tree, discovers the manifest files of many \
                  package-manager ecosystems (npm, yarn, cargo, maven, go modules, pip), \
                  extracts each project's declared dependencies, and writes one document \
                  per code location or a single merged aggregate document."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Verbose (debug-level) logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Scan a source tree and write dependency documents",
        long_about = "Examples:\n  \
                      bomscan scan\n  \
                      bomscan scan /path/to/source\n  \
                      bomscan scan --aggregate-name everything\n  \
                      bomscan scan --exclude 'build*' --max-depth 5"
    )]
    Scan(ScanArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct ScanArgs {
    #[arg(
        value_name = "PATH",
        help = "Path to the source tree (defaults to current directory)"
    )]
    pub source_path: Option<PathBuf>,

    #[arg(
        short = 'o',
        long,
        value_name = "DIR",
        help = "Directory to write documents into (default: ./bomscan-output)"
    )]
    pub output_directory: Option<PathBuf>,

    #[arg(
        short = 'd',
        long,
        value_name = "DEPTH",
        help = "Maximum search depth; the source root counts as depth 1"
    )]
    pub max_depth: Option<usize>,

    #[arg(
        short = 'e',
        long = "exclude",
        value_name = "GLOB",
        help = "Directory-name glob to exclude (repeatable, appended to built-in list)"
    )]
    pub excluded_directories: Vec<String>,

    #[arg(
        long,
        help = "Keep evaluating detectors inside directories where they already applied"
    )]
    pub force_nested_search: bool,

    #[arg(
        long,
        value_name = "NAME",
        help = "Merge all code locations into one aggregate document with this name"
    )]
    pub aggregate_name: Option<String>,

    #[arg(long, value_name = "NAME", help = "Project name for document metadata")]
    pub project_name: Option<String>,

    #[arg(long, value_name = "VERSION", help = "Project version for document metadata")]
    pub project_version: Option<String>,
}
