//! Path ordering strategies.

use std::cmp::Ordering;
use std::sync::Arc;

/// Two-argument comparator over relative paths. Any function with this
/// shape can replace the default ordering; the generator never references
/// directory depth outside the comparator itself.
pub type SortFunction = Arc<dyn Fn(&str, &str) -> Ordering + Send + Sync>;

/// Default ordering: shallower paths first, equal-depth paths compared
/// segment by segment in code-point order.
pub fn by_directory_depth(a: &str, b: &str) -> Ordering {
    let depth_a = a.split('/').count();
    let depth_b = b.split('/').count();
    match depth_a.cmp(&depth_b) {
        Ordering::Equal => a.split('/').cmp(b.split('/')),
        ordering => ordering,
    }
}

pub fn default_sort() -> SortFunction {
    Arc::new(by_directory_depth)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut paths: Vec<&str>) -> Vec<&str> {
        paths.sort_by(|a, b| by_directory_depth(a, b));
        paths
    }

    #[test]
    fn shallow_paths_sort_first() {
        assert_eq!(
            sorted(vec!["a/b/c", "b/c", "c", "d/f/g/h"]),
            vec!["c", "b/c", "a/b/c", "d/f/g/h"]
        );
    }

    #[test]
    fn equal_depth_is_alphabetic_per_segment() {
        assert_eq!(
            sorted(vec!["a/z/x", "a/b", "a", "a/bb/c/d", "z", "a/a", "a/ba/c/d"]),
            vec!["a", "z", "a/a", "a/b", "a/z/x", "a/ba/c/d", "a/bb/c/d"]
        );
    }

    #[test]
    fn sorting_is_idempotent() {
        let once = sorted(vec!["b/b", "a", "b/a", "c", "a/c/d"]);
        let twice = sorted(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn identical_paths_compare_equal() {
        assert_eq!(by_directory_depth("a/b", "a/b"), Ordering::Equal);
    }
}
