//! Directory search: where each detector applies
//!
//! The search stage produces the [`crate::bomtool::Applicability`] set the
//! evaluator consumes. Pruning, depth bounding, and exclusion semantics
//! live here.

mod engine;
mod exclusion;

pub use engine::{SearchEngine, SearchError, SearchOptions};
pub use exclusion::ExclusionMatcher;
