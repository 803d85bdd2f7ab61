//! Post-run extraction summary

use crate::evaluate::{Evaluation, Outcome};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::info;

const HEADING: &str = "----------------------------------------------------------------";

#[derive(Default)]
struct DirectorySummary {
    applied: usize,
    extracted: usize,
    code_locations: usize,
    success: Vec<String>,
    failed: Vec<String>,
    exception: Vec<String>,
}

/// Logs a per-directory summary of extraction results, sorted by directory
/// path. Directories where nothing reached extraction are omitted.
pub fn print_extraction_summary(evaluations: &[Evaluation]) {
    let mut by_directory: BTreeMap<PathBuf, DirectorySummary> = BTreeMap::new();

    for evaluation in evaluations {
        let summary = by_directory.entry(evaluation.directory.clone()).or_default();
        summary.applied += 1;
        if evaluation.outcome == Outcome::NotRun {
            continue;
        }
        summary.extracted += 1;
        summary.code_locations += evaluation.code_locations.len();
        let name = format!("{} - {}", evaluation.tool_type, evaluation.detector_id);
        match evaluation.outcome {
            Outcome::Success => summary.success.push(name),
            Outcome::Failure => summary.failed.push(name),
            Outcome::Exception => summary.exception.push(name),
            Outcome::NotRun => {}
        }
    }

    info!("{}", HEADING);
    info!("Extraction results:");
    info!("{}", HEADING);
    for (directory, summary) in &by_directory {
        if summary.extracted == 0 {
            continue;
        }
        info!("{}", directory.display());
        info!("\t Code locations: {}", summary.code_locations);
        if !summary.success.is_empty() {
            info!("\t   Success: {}", summary.success.join(", "));
        }
        if !summary.failed.is_empty() {
            info!("\t   Failure: {}", summary.failed.join(", "));
        }
        if !summary.exception.is_empty() {
            info!("\t Exception: {}", summary.exception.join(", "));
        }
    }
    info!("{}", HEADING);
}
