//! Nesting limits for parsing and serialization.
//!
//! Both directions recurse once per nested table/array, so without a cap the
//! maximum safe depth is whatever the call stack allows. `Limits` turns deep
//! or self-referencing input into an error instead of a stack overflow.

/// Default maximum nesting depth for tables/arrays.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Resource limits applied to one parse or serialize call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of tables/arrays open at once. `None` disables the check.
    pub max_depth: Option<usize>,
}

impl Limits {
    pub const fn new(max_depth: usize) -> Self {
        Self {
            max_depth: Some(max_depth),
        }
    }

    /// No nesting cap: depth is bounded only by the call stack.
    pub const fn unbounded() -> Self {
        Self { max_depth: None }
    }

    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Whether entering one more level at `depth` (already open levels)
    /// stays within the cap.
    pub fn allows(&self, depth: usize) -> bool {
        self.max_depth.map_or(true, |max| depth < max)
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}
