//! Run orchestration
//!
//! Ties the stages together: detector registry → directory search →
//! evaluation → aggregation/output. Also owns the run-level error type,
//! exit-code categories, and the cooperative stop signal.

mod orchestrator;

pub use orchestrator::{ScanError, ScanOrchestrator, ScanOutcome};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation for a run.
///
/// Once raised, no new (detector, directory) evaluations are scheduled;
/// in-flight ones finish and partial results remain valid.
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    stopped: Arc<AtomicBool>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

/// Process exit-code category surfaced to the caller on fatal failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCodeType {
    Success,
    FailureGeneralError,
    FailureConfiguration,
}

impl ExitCodeType {
    pub fn code(&self) -> i32 {
        match self {
            ExitCodeType::Success => 0,
            ExitCodeType::FailureGeneralError => 1,
            ExitCodeType::FailureConfiguration => 2,
        }
    }
}
