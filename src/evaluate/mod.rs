//! Detector evaluation state machine
//!
//! Each (detector, directory) pair found applicable by the search moves
//! through strictly ordered stages:
//!
//! `Applies → NeedsMet → DemandsMet → Extracted{Success|Failure|Exception}`
//!
//! Failing needs or demands yields a [`Outcome::NotRun`] result, recorded
//! but never treated as an error. One pair's failure or exception can
//! never prevent evaluation of any other pair.

mod preconditions;

pub use preconditions::{NeedsReport, PreconditionCache};

use crate::bomtool::{Applicability, CodeLocation, DetectorId, Extraction, ExtractionOutcome, ToolType};
use crate::scan::StopSignal;
use std::collections::{HashMap, HashSet};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Final state of one (detector, directory) evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Needs or demands were not satisfied; extraction never ran.
    NotRun,
    Success,
    Failure,
    Exception,
}

/// One record per applicable (detector, directory) pair.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub detector_id: DetectorId,
    pub tool_type: ToolType,
    pub directory: PathBuf,
    pub needs_met: bool,
    pub demands_met: bool,
    pub outcome: Outcome,
    pub code_locations: Vec<CodeLocation>,
    pub error: Option<String>,
}

/// Runs the post-search stages for every applicability, isolating failure
/// per pair. Precondition results are memoized in the run-scoped
/// [`PreconditionCache`] handed in at construction.
pub struct DetectorEvaluator {
    preconditions: PreconditionCache,
}

impl DetectorEvaluator {
    pub fn new(preconditions: PreconditionCache) -> Self {
        Self { preconditions }
    }

    pub fn evaluate_all(
        &self,
        applicabilities: &[Applicability],
        stop: &StopSignal,
    ) -> Vec<Evaluation> {
        // Demands resolve against which detectors applied in the same
        // directory, so index applicability by directory up front.
        let mut applied_by_directory: HashMap<&PathBuf, HashSet<DetectorId>> = HashMap::new();
        for applicability in applicabilities {
            applied_by_directory
                .entry(&applicability.directory)
                .or_default()
                .insert(applicability.detector_id());
        }

        let mut evaluated: HashSet<(DetectorId, PathBuf)> = HashSet::new();
        let mut evaluations = Vec::with_capacity(applicabilities.len());
        for applicability in applicabilities {
            if stop.is_stopped() {
                debug!("Stop signal raised, not scheduling further evaluations");
                break;
            }
            // a pair is evaluated at most once per run
            if !evaluated.insert((applicability.detector_id(), applicability.directory.clone())) {
                continue;
            }
            let applied_here = applied_by_directory
                .get(&applicability.directory)
                .expect("every applicability was indexed");
            evaluations.push(self.evaluate(applicability, applied_here));
        }
        evaluations
    }

    fn evaluate(
        &self,
        applicability: &Applicability,
        applied_in_directory: &HashSet<DetectorId>,
    ) -> Evaluation {
        let detector = applicability.detector.as_ref();

        let needs = self.preconditions.check(detector);
        if !needs.met {
            debug!(
                detector = %detector.id(),
                directory = %applicability.directory.display(),
                unmet = needs.unmet.join(", "),
                "Detector needs not met"
            );
            return Evaluation {
                detector_id: detector.id(),
                tool_type: detector.tool_type(),
                directory: applicability.directory.clone(),
                needs_met: false,
                demands_met: false,
                outcome: Outcome::NotRun,
                code_locations: Vec::new(),
                error: None,
            };
        }

        let unmet_demands: Vec<DetectorId> = detector
            .demands()
            .into_iter()
            .filter(|demanded| !applied_in_directory.contains(demanded))
            .collect();
        if !unmet_demands.is_empty() {
            debug!(
                detector = %detector.id(),
                directory = %applicability.directory.display(),
                unmet = ?unmet_demands,
                "Detector demands not met"
            );
            return Evaluation {
                detector_id: detector.id(),
                tool_type: detector.tool_type(),
                directory: applicability.directory.clone(),
                needs_met: true,
                demands_met: false,
                outcome: Outcome::NotRun,
                code_locations: Vec::new(),
                error: None,
            };
        }

        let extraction = self.extract(applicability);
        let outcome = match extraction.outcome {
            ExtractionOutcome::Success => Outcome::Success,
            ExtractionOutcome::Failure => Outcome::Failure,
            ExtractionOutcome::Exception => Outcome::Exception,
        };
        if outcome != Outcome::Success {
            warn!(
                detector = %detector.id(),
                directory = %applicability.directory.display(),
                error = extraction.error.as_ref().map(|e| format!("{:#}", e)),
                "Extraction did not succeed"
            );
        }
        Evaluation {
            detector_id: detector.id(),
            tool_type: detector.tool_type(),
            directory: applicability.directory.clone(),
            needs_met: true,
            demands_met: true,
            outcome,
            code_locations: extraction.code_locations,
            error: extraction.error.map(|e| format!("{:#}", e)),
        }
    }

    /// Extraction faults the detector did not anticipate, including
    /// panics, are captured as Exception outcomes, never rethrown.
    fn extract(&self, applicability: &Applicability) -> Extraction {
        let detector = &applicability.detector;
        let directory = &applicability.directory;
        catch_unwind(AssertUnwindSafe(|| detector.extract(directory))).unwrap_or_else(|_| {
            Extraction::exception(anyhow::anyhow!(
                "detector {} panicked while extracting {}",
                detector.id(),
                directory.display()
            ))
        })
    }
}
