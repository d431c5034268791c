//! Configuration types for lazyseq operations

/// Buffer configuration for [`collect_with`](crate::consume::collect_with)
#[derive(Debug, Clone)]
pub struct CollectConfig {
    pub initial_capacity: usize,
    /// Fail with `CapacityExceeded` instead of growing past this many elements.
    pub max_len: Option<usize>,
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 16,
            max_len: None,
        }
    }
}

impl CollectConfig {
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            initial_capacity: max_len.min(1024),
            max_len: Some(max_len),
        }
    }
}

/// Which source `merge` polls first when several are ready in the same round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePriority {
    /// Always start with the first-provided source.
    #[default]
    InputOrder,
    /// Start with the source after the one that produced the last value.
    Rotating,
}

/// Merge configuration
#[derive(Debug, Clone, Default)]
pub struct MergeConfig {
    pub priority: MergePriority,
}
