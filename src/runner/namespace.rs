//! Namespace tree printing by shared-prefix diffing.

/// Separator between module path segments.
pub const SEPARATOR: &str = "::";

/// A namespace segment to print, at `depth` indentation levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceLine {
    pub depth: usize,
    pub segment: String,
}

/// Remembers the previous namespace and the running indentation depth.
#[derive(Debug, Clone, Default)]
pub struct NamespaceTracker {
    previous: Vec<String>,
    depth: usize,
}

impl NamespaceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Depth at which the current namespace's fixtures are printed.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Moves to `namespace`, returning the segments that were not printed before.
    ///
    /// Leaving `n` segments of the previous namespace de-indents by `n`; every new segment is
    /// printed one level deeper than the last.
    pub fn enter(&mut self, namespace: &str) -> Vec<NamespaceLine> {
        let current = segments(namespace);
        let shared = self
            .previous
            .iter()
            .zip(&current)
            .take_while(|(previous, current)| previous.as_str() == **current)
            .count();

        self.depth = self.depth.saturating_sub(self.previous.len() - shared);

        let mut lines = Vec::with_capacity(current.len() - shared);
        for segment in &current[shared..] {
            lines.push(NamespaceLine {
                depth: self.depth,
                segment: segment.to_string(),
            });
            self.depth += 1;
        }

        self.previous = current.into_iter().map(str::to_string).collect();
        lines
    }
}

fn segments(namespace: &str) -> Vec<&str> {
    namespace.split(SEPARATOR).filter(|segment| !segment.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn printed(lines: Vec<NamespaceLine>) -> Vec<(usize, String)> {
        lines.into_iter().map(|line| (line.depth, line.segment)).collect()
    }

    #[test]
    fn test_first_namespace_prints_every_segment() {
        let mut tracker = NamespaceTracker::new();
        assert_eq!(
            printed(tracker.enter("a::b")),
            vec![(0, "a".to_string()), (1, "b".to_string())]
        );
        assert_eq!(tracker.depth(), 2);
    }

    #[test]
    fn test_shared_prefix_is_printed_once() {
        let mut tracker = NamespaceTracker::new();
        tracker.enter("a::b::x");
        assert!(tracker.enter("a::b::x").is_empty());
        assert_eq!(printed(tracker.enter("a::b::y")), vec![(2, "y".to_string())]);
        assert_eq!(
            printed(tracker.enter("a::c::z")),
            vec![(1, "c".to_string()), (2, "z".to_string())]
        );
        assert_eq!(tracker.depth(), 3);
    }

    #[test]
    fn test_unrelated_namespace_starts_at_the_root() {
        let mut tracker = NamespaceTracker::new();
        tracker.enter("a::b");
        assert_eq!(printed(tracker.enter("q")), vec![(0, "q".to_string())]);
    }

    #[test]
    fn test_moving_to_a_parent_prints_nothing() {
        let mut tracker = NamespaceTracker::new();
        tracker.enter("a::b::c");
        assert!(tracker.enter("a::b").is_empty());
        assert_eq!(tracker.depth(), 2);
    }

    #[test]
    fn test_segments_are_compared_whole() {
        let mut tracker = NamespaceTracker::new();
        tracker.enter("app::core");
        assert_eq!(printed(tracker.enter("app::coreutils")), vec![(1, "coreutils".to_string())]);
    }
}
