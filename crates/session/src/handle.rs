//! Stable integer handles for tracked shapes.

use std::fmt;

use crate::registry::ShapeRegistry;

/// Caller-chosen key of a tracked shape. At most one live record exists per
/// handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(pub u32);

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Handle {
    fn from(value: u32) -> Self {
        Handle(value)
    }
}

impl From<Handle> for u32 {
    fn from(handle: Handle) -> Self {
        handle.0
    }
}

/// Hands out the lowest unused handle at or above a cursor.
///
/// The registry never mints handles itself; callers that need fresh ones
/// (bounding-box overlays) draw them from an allocator so they stay clear of
/// slots reserved for other commands.
#[derive(Debug, Clone)]
pub struct HandleAllocator {
    cursor: u32,
}

impl HandleAllocator {
    pub fn starting_at(first: u32) -> Self {
        Self { cursor: first }
    }

    /// Next handle not present in `registry`, or `None` once the handle space
    /// is exhausted.
    pub fn allocate(&mut self, registry: &ShapeRegistry) -> Option<Handle> {
        let mut candidate = self.cursor;
        while registry.contains(Handle(candidate)) {
            candidate = candidate.checked_add(1)?;
        }
        self.cursor = candidate.checked_add(1).unwrap_or(u32::MAX);
        Some(Handle(candidate))
    }
}
