//! Detector registry

use super::{
    CargoDetector, Detector, DetectorId, GoModDetector, MavenPomDetector,
    NpmPackageJsonDetector, PipRequirementsDetector, YarnLockDetector,
};
use std::sync::Arc;

/// Holds the detector set for one run. Detectors are immutable once
/// registered and shared by reference into the search and evaluation
/// stages.
#[derive(Clone, Default)]
pub struct DetectorRegistry {
    detectors: Vec<Arc<dyn Detector>>,
}

impl DetectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in ecosystem detector.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(NpmPackageJsonDetector));
        registry.register(Arc::new(YarnLockDetector));
        registry.register(Arc::new(CargoDetector));
        registry.register(Arc::new(MavenPomDetector));
        registry.register(Arc::new(GoModDetector));
        registry.register(Arc::new(PipRequirementsDetector));
        registry
    }

    pub fn register(&mut self, detector: Arc<dyn Detector>) {
        self.detectors.push(detector);
    }

    pub fn detectors(&self) -> &[Arc<dyn Detector>] {
        &self.detectors
    }

    pub fn get(&self, id: DetectorId) -> Option<&Arc<dyn Detector>> {
        self.detectors.iter().find(|d| d.id() == id)
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }
}
