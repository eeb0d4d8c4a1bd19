//! Cyclic selection through a candidate set.

use std::path::{Path, PathBuf};

/// Position of the cursor within the current candidate set.
///
/// The default value is the reset state: no index and no file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RotationState {
    pub previous_index: Option<usize>,
    pub previous_file: Option<PathBuf>,
}

impl RotationState {
    #[must_use]
    pub const fn is_unset(&self) -> bool { self.previous_index.is_none() }
}

/// Picks candidates in cyclic order.
///
/// Calling [`next`](Self::next) `n` times over an unchanged set of `n`
/// candidates visits each one exactly once.
#[derive(Debug, Default)]
pub struct RotationCursor {
    state: RotationState,
}

impl RotationCursor {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Returns the next candidate, or `None` for an empty set (state untouched).
    pub fn next(&mut self, candidates: &[PathBuf]) -> Option<PathBuf> {
        if candidates.is_empty() {
            return None;
        }

        let index = self.state.previous_index.map_or(0, |prev| (prev + 1) % candidates.len());
        let picked = candidates[index].clone();

        self.state.previous_index = Some(index);
        self.state.previous_file = Some(picked.clone());
        Some(picked)
    }

    /// Records a file chosen outside the cycle (random backdrops, slideshow).
    pub fn record_file(&mut self, file: &Path) { self.state.previous_file = Some(file.to_path_buf()); }

    pub fn reset(&mut self) { self.state = RotationState::default(); }

    #[must_use]
    pub const fn state(&self) -> &RotationState { &self.state }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn paths(names: &[&str]) -> Vec<PathBuf> { names.iter().map(PathBuf::from).collect() }

    #[test]
    fn test_first_pick_is_index_zero() {
        let mut cursor = RotationCursor::new();
        assert!(cursor.state().is_unset());
        assert_eq!(cursor.next(&paths(&["a", "b"])), Some(PathBuf::from("a")));
        assert_eq!(cursor.state().previous_index, Some(0));
        assert_eq!(cursor.state().previous_file, Some(PathBuf::from("a")));
    }

    #[test]
    fn test_full_cycle_visits_each_once() {
        let candidates = paths(&["p1", "p2", "p3", "p4", "p5"]);
        let mut cursor = RotationCursor::new();

        let seen: HashSet<_> = (0..candidates.len()).filter_map(|_| cursor.next(&candidates)).collect();
        assert_eq!(seen.len(), candidates.len());
        assert_eq!(cursor.next(&candidates), Some(PathBuf::from("p1")));
    }

    #[test]
    fn test_empty_set_leaves_state_unchanged() {
        let mut cursor = RotationCursor::new();
        cursor.next(&paths(&["a", "b"]));
        let before = cursor.state().clone();

        assert_eq!(cursor.next(&[]), None);
        assert_eq!(cursor.state(), &before);
    }

    #[test]
    fn test_shrunk_set_wraps() {
        let mut cursor = RotationCursor::new();
        let big = paths(&["a", "b", "c", "d"]);
        for _ in 0..3 {
            cursor.next(&big);
        }
        assert_eq!(cursor.state().previous_index, Some(2));

        // (2 + 1) mod 2
        assert_eq!(cursor.next(&paths(&["x", "y"])), Some(PathBuf::from("y")));
        assert_eq!(cursor.next(&paths(&["x", "y"])), Some(PathBuf::from("x")));
    }

    #[test]
    fn test_reset() {
        let mut cursor = RotationCursor::new();
        cursor.next(&paths(&["a"]));
        cursor.reset();
        assert_eq!(cursor.state(), &RotationState::default());

        cursor.record_file(Path::new("/r.jpg"));
        assert!(cursor.state().is_unset());
        assert_eq!(cursor.state().previous_file, Some(PathBuf::from("/r.jpg")));
    }
}
