//! Run-scoped, memoized precondition checks

use crate::bomtool::{Detector, DetectorId, Precondition};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Outcome of a detector type's precondition ("needs") evaluation.
#[derive(Debug, Clone)]
pub struct NeedsReport {
    pub met: bool,
    pub unmet: Vec<String>,
}

impl NeedsReport {
    fn satisfied() -> Self {
        Self {
            met: true,
            unmet: Vec::new(),
        }
    }
}

/// Precondition checks are expensive and pure functions of the detector
/// type, so they run at most once per type for the lifetime of a run no
/// matter how many directories matched. The check executes while the map
/// lock is held, which is what guarantees at-most-once even with
/// concurrent first callers.
#[derive(Debug, Clone, Default)]
pub struct PreconditionCache {
    cache: Arc<Mutex<HashMap<DetectorId, NeedsReport>>>,
}

impl PreconditionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&self, detector: &dyn Detector) -> NeedsReport {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(report) = cache.get(&detector.id()) {
            return report.clone();
        }

        let report = evaluate_needs(&detector.needs());
        debug!(
            detector = %detector.id(),
            met = report.met,
            "Evaluated detector preconditions"
        );
        cache.insert(detector.id(), report.clone());
        report
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.cache.lock().unwrap().len()
    }
}

fn evaluate_needs(needs: &[Precondition]) -> NeedsReport {
    let unmet: Vec<String> = needs
        .iter()
        .filter(|need| !is_met(need))
        .map(|need| need.to_string())
        .collect();
    if unmet.is_empty() {
        NeedsReport::satisfied()
    } else {
        NeedsReport { met: false, unmet }
    }
}

fn is_met(need: &Precondition) -> bool {
    match need {
        Precondition::ExecutableOnPath(name) => executable_on_path(name),
        Precondition::EnvVarSet(name) => std::env::var(name).map_or(false, |v| !v.is_empty()),
        Precondition::FileExists(path) => path.is_file(),
    }
}

fn executable_on_path(name: &str) -> bool {
    let Some(paths) = std::env::var_os("PATH") else {
        return false;
    };
    std::env::split_paths(&paths).any(|dir| candidate_exists(&dir, name))
}

fn candidate_exists(dir: &Path, name: &str) -> bool {
    if dir.as_os_str().is_empty() {
        return false;
    }
    dir.join(name).is_file()
}
