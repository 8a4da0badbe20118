//! Type definitions shared across the kernel.

use std::fmt;

/// Process-unique shape identifier.
///
/// Two [`crate::Shape`] values refer to the same sub-shape exactly when their
/// ids are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub u64);

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Topological kind of a shape, from the smallest to the largest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Vertex,
    Edge,
    Wire,
    Face,
    Shell,
    Solid,
    Compound,
}

impl ShapeKind {
    /// Whether a node of this kind may hold a direct child of `child` kind.
    pub fn accepts_child(self, child: ShapeKind) -> bool {
        match self {
            ShapeKind::Vertex => false,
            ShapeKind::Edge => child == ShapeKind::Vertex,
            ShapeKind::Wire => child == ShapeKind::Edge,
            ShapeKind::Face => child == ShapeKind::Wire,
            ShapeKind::Shell => child == ShapeKind::Face,
            ShapeKind::Solid => child == ShapeKind::Shell,
            ShapeKind::Compound => true,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Vertex => "vertex",
            ShapeKind::Edge => "edge",
            ShapeKind::Wire => "wire",
            ShapeKind::Face => "face",
            ShapeKind::Shell => "shell",
            ShapeKind::Solid => "solid",
            ShapeKind::Compound => "compound",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Boolean operators between two shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BooleanOp {
    /// `a` minus `b`
    Cut,
    /// `a` union `b`
    Fuse,
    /// `a` intersect `b`
    Common,
}

/// Errors raised by geometry kernel operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KernelError {
    #[error("Geometric construction failed: {0}")]
    Construction(String),
    #[error("Resulting shape is invalid: {0}")]
    InvalidResult(String),
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
