//! Directory-name exclusion matching

use glob::Pattern;

/// Matches a directory name against a configured list of glob patterns.
///
/// Matching is by the final path component only, never the full path, so a
/// pattern like `node_modules` or `build*` excludes every directory of that
/// name anywhere in the tree.
#[derive(Debug, Clone, Default)]
pub struct ExclusionMatcher {
    patterns: Vec<Pattern>,
}

impl ExclusionMatcher {
    /// Compiles the given glob patterns. Invalid patterns are dropped with
    /// a warning rather than failing the run.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        let patterns = patterns
            .iter()
            .filter_map(|p| match Pattern::new(p.as_ref()) {
                Ok(pattern) => Some(pattern),
                Err(err) => {
                    tracing::warn!(pattern = p.as_ref(), error = %err, "Ignoring invalid exclusion pattern");
                    None
                }
            })
            .collect();
        Self { patterns }
    }

    pub fn is_excluded(&self, directory_name: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(directory_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_match() {
        let matcher = ExclusionMatcher::new(&["node_modules", ".git"]);
        assert!(matcher.is_excluded("node_modules"));
        assert!(matcher.is_excluded(".git"));
        assert!(!matcher.is_excluded("src"));
    }

    #[test]
    fn test_wildcard_match() {
        let matcher = ExclusionMatcher::new(&["build*", "*.tmp"]);
        assert!(matcher.is_excluded("build"));
        assert!(matcher.is_excluded("build-out"));
        assert!(matcher.is_excluded("scratch.tmp"));
        assert!(!matcher.is_excluded("rebuild"));
    }

    #[test]
    fn test_empty_list_excludes_nothing() {
        let matcher = ExclusionMatcher::new::<&str>(&[]);
        assert!(!matcher.is_excluded("node_modules"));
    }

    #[test]
    fn test_invalid_pattern_is_dropped() {
        let matcher = ExclusionMatcher::new(&["[", "target"]);
        assert!(matcher.is_excluded("target"));
        assert!(!matcher.is_excluded("["));
    }
}
