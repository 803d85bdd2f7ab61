//! CLI command handlers

use super::commands::ScanArgs;
use crate::config::ScanConfig;
use crate::evaluate::Outcome;
use crate::scan::{ScanOrchestrator, StopSignal};
use std::path::PathBuf;
use tracing::{error, info};

/// Runs a scan from CLI arguments and returns the process exit code.
pub fn handle_scan(args: &ScanArgs) -> i32 {
    let source_path = args
        .source_path
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));

    let mut config = match ScanConfig::from_env(source_path) {
        Ok(config) => config,
        Err(err) => {
            error!("Invalid configuration: {}", err);
            return crate::scan::ExitCodeType::FailureConfiguration.code();
        }
    };
    apply_args(&mut config, args);

    let orchestrator = ScanOrchestrator::with_defaults(config);
    match orchestrator.run(&StopSignal::new()) {
        Ok(outcome) => {
            let failures = outcome
                .evaluations
                .iter()
                .filter(|e| matches!(e.outcome, Outcome::Failure | Outcome::Exception))
                .count();
            info!(
                code_locations = outcome.code_locations.len(),
                documents = outcome.documents.len(),
                failed_extractions = failures,
                "Scan finished"
            );
            for document in &outcome.documents {
                println!("{}", document.display());
            }
            0
        }
        Err(err) => {
            error!("Scan failed: {}", err);
            err.exit_code().code()
        }
    }
}

fn apply_args(config: &mut ScanConfig, args: &ScanArgs) {
    if let Some(output_directory) = &args.output_directory {
        config.output_directory = output_directory.clone();
    }
    if let Some(max_depth) = args.max_depth {
        config.max_depth = max_depth;
    }
    config
        .excluded_directories
        .extend(args.excluded_directories.iter().cloned());
    if args.force_nested_search {
        config.force_nested_search = true;
    }
    if let Some(aggregate_name) = &args.aggregate_name {
        config.aggregate_name = Some(aggregate_name.clone());
    }
    if let Some(project_name) = &args.project_name {
        config.project_name = project_name.clone();
    }
    if let Some(project_version) = &args.project_version {
        config.project_version = Some(project_version.clone());
    }
}
