//! Session error types.

use kernel::{KernelError, ShapeId};
use thiserror::Error;

use crate::handle::Handle;
use crate::selection::SelectionMode;
use crate::shell::ShellError;

/// Errors surfaced to the command layer. Each aborts the command in flight
/// and leaves prior state unchanged, except inside bulk operations where it
/// is collected per shape.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Handle {0} is already registered")]
    DuplicateHandle(Handle),

    #[error("No shape registered under handle {0}")]
    UnknownHandle(Handle),

    #[error("Shape is empty or degenerate")]
    DegenerateShape,

    #[error("Geometric construction failed: {0}")]
    GeometricConstruction(String),

    #[error("Sub-shape {sub} is not part of the shape at handle {handle}")]
    SubstitutionTargetNotFound { handle: Handle, sub: ShapeId },

    #[error("Substitution produced an invalid shape: {0}")]
    InvalidResult(String),

    #[error("Selection mode {mode} does not accept {requested} picks")]
    ModeMismatch {
        mode: SelectionMode,
        requested: &'static str,
    },

    #[error("Presentation shell error: {0}")]
    Shell(#[from] ShellError),
}

impl SessionError {
    /// Stable machine-readable identifier.
    pub fn code(&self) -> &'static str {
        match self {
            SessionError::DuplicateHandle(_) => "duplicate_handle",
            SessionError::UnknownHandle(_) => "unknown_handle",
            SessionError::DegenerateShape => "degenerate_shape",
            SessionError::GeometricConstruction(_) => "geometric_construction",
            SessionError::SubstitutionTargetNotFound { .. } => "substitution_target_not_found",
            SessionError::InvalidResult(_) => "invalid_result",
            SessionError::ModeMismatch { .. } => "mode_mismatch",
            SessionError::Shell(_) => "shell",
        }
    }
}

impl From<KernelError> for SessionError {
    fn from(error: KernelError) -> Self {
        match error {
            KernelError::Construction(reason) | KernelError::InvalidParameter(reason) => {
                SessionError::GeometricConstruction(reason)
            }
            KernelError::InvalidResult(reason) => SessionError::InvalidResult(reason),
        }
    }
}
