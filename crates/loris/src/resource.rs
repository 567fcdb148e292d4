//! Resource accounting for the arena heap.
//!
//! Embedders can bound how much a sandboxed program allocates. The heap
//! consults its [`ResourceTracker`] before every allocation; exceeding a
//! bound surfaces as a [`ResourceError`], which converts into the normal
//! run-error channel.

use std::fmt;

use crate::exception::{CoreError, ErrorKind};

/// Error returned when a resource limit is exceeded during execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// Maximum number of heap allocations exceeded.
    Allocation { limit: usize, count: usize },
    /// Maximum estimated memory usage exceeded.
    Memory { limit: usize, used: usize },
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allocation { limit, count } => {
                write!(f, "allocation limit exceeded: {count} > {limit}")
            }
            Self::Memory { limit, used } => {
                write!(f, "memory limit exceeded: {used} bytes > {limit} bytes")
            }
        }
    }
}

impl std::error::Error for ResourceError {}

impl From<ResourceError> for CoreError {
    fn from(err: ResourceError) -> Self {
        Self::new(ErrorKind::ResourceError, err.to_string())
    }
}

/// Trait for tracking heap resource usage.
///
/// `on_allocate` is called before each heap allocation with a lazily
/// computed size estimate; returning an error rejects the allocation.
pub trait ResourceTracker: fmt::Debug {
    /// Called before each heap allocation.
    ///
    /// `get_size` computes an approximate size in bytes; implementations
    /// that don't track memory should not invoke it.
    fn on_allocate(&mut self, get_size: impl FnOnce() -> usize) -> Result<(), ResourceError>;

    /// Current allocation count, when tracked.
    fn allocations(&self) -> Option<usize> {
        None
    }

    /// Current estimated memory usage in bytes, when tracked.
    fn memory_bytes(&self) -> Option<usize> {
        None
    }
}

/// Tracker that imposes no limits and keeps no counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLimitTracker;

impl ResourceTracker for NoLimitTracker {
    fn on_allocate(&mut self, _get_size: impl FnOnce() -> usize) -> Result<(), ResourceError> {
        Ok(())
    }
}

/// Tracker enforcing allocation-count and memory bounds.
#[derive(Debug, Clone)]
pub struct LimitedTracker {
    max_allocations: Option<usize>,
    max_memory: Option<usize>,
    allocations: usize,
    memory: usize,
}

impl LimitedTracker {
    /// Creates a tracker with the given bounds; `None` leaves that axis
    /// unbounded.
    #[must_use]
    pub fn new(max_allocations: Option<usize>, max_memory: Option<usize>) -> Self {
        Self {
            max_allocations,
            max_memory,
            allocations: 0,
            memory: 0,
        }
    }
}

impl ResourceTracker for LimitedTracker {
    fn on_allocate(&mut self, get_size: impl FnOnce() -> usize) -> Result<(), ResourceError> {
        let next = self.allocations + 1;
        if let Some(limit) = self.max_allocations
            && next > limit
        {
            return Err(ResourceError::Allocation { limit, count: next });
        }
        if let Some(limit) = self.max_memory {
            let used = self.memory + get_size();
            if used > limit {
                return Err(ResourceError::Memory { limit, used });
            }
            self.memory = used;
        }
        self.allocations = next;
        Ok(())
    }

    fn allocations(&self) -> Option<usize> {
        Some(self.allocations)
    }

    fn memory_bytes(&self) -> Option<usize> {
        Some(self.memory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limited_tracker_rejects_past_allocation_bound() {
        let mut tracker = LimitedTracker::new(Some(2), None);
        assert!(tracker.on_allocate(|| 8).is_ok());
        assert!(tracker.on_allocate(|| 8).is_ok());
        let err = tracker.on_allocate(|| 8).unwrap_err();
        assert_eq!(err, ResourceError::Allocation { limit: 2, count: 3 });
    }

    #[test]
    fn limited_tracker_rejects_past_memory_bound() {
        let mut tracker = LimitedTracker::new(None, Some(100));
        assert!(tracker.on_allocate(|| 60).is_ok());
        let err = tracker.on_allocate(|| 60).unwrap_err();
        assert_eq!(err, ResourceError::Memory { limit: 100, used: 120 });
    }
}
