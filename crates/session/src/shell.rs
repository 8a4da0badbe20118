//! The presentation shell seam.
//!
//! The core never renders anything itself. It tells a [`PresentationShell`]
//! what to show and treats every call as fire-and-forget: an error means the
//! instruction was not delivered, not that the core's own state is wrong.

use std::collections::HashSet;

use kernel::{Shape, ShapeId};
use solidview_ipc::Color;
use thiserror::Error;

use crate::handle::Handle;
use crate::record::ShapeRecord;
use crate::selection::SelectionSnapshot;

#[derive(Debug, Error)]
pub enum ShellError {
    /// Graphics could not be brought up; nothing else can succeed.
    #[error("Failed to initialize the presentation shell: {0}")]
    Initialization(String),

    #[error("Presentation shell disconnected: {0}")]
    Disconnected(String),

    #[error("Presentation shell rejected handle {handle}: {reason}")]
    Rejected { handle: Handle, reason: String },
}

/// Rendering side of the session.
pub trait PresentationShell {
    /// Show `shape` under `handle`, replacing whatever was shown there.
    fn display(
        &mut self,
        handle: Handle,
        shape: &Shape,
        color: Option<Color>,
        transparency: f32,
    ) -> Result<(), ShellError>;

    /// Stop showing `handle`.
    fn undisplay(&mut self, handle: Handle) -> Result<(), ShellError>;

    fn notify_selection_changed(&mut self, selection: &SelectionSnapshot) -> Result<(), ShellError>;

    fn request_redraw(&mut self) -> Result<(), ShellError>;

    /// Display a record with its own attributes.
    fn show(&mut self, handle: Handle, record: &ShapeRecord) -> Result<(), ShellError> {
        self.display(handle, &record.geometry, record.color, record.transparency)
    }
}

/// One call received by a [`RecordingShell`].
#[derive(Debug, Clone, PartialEq)]
pub enum ShellCall {
    Display {
        handle: Handle,
        shape: ShapeId,
        color: Option<Color>,
        transparency: f32,
    },
    Undisplay(Handle),
    SelectionChanged(SelectionSnapshot),
    RequestRedraw,
}

/// Shell that renders nothing and records every call.
///
/// Calls for handles listed with [`RecordingShell::fail_on`] return
/// [`ShellError::Rejected`] and are not recorded.
#[derive(Debug, Default)]
pub struct RecordingShell {
    calls: Vec<ShellCall>,
    failing: HashSet<Handle>,
    selection_failing: bool,
}

impl RecordingShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make display and undisplay calls for `handle` fail.
    pub fn fail_on(&mut self, handle: Handle) {
        self.failing.insert(handle);
    }

    /// Make selection notifications fail.
    pub fn fail_selection_updates(&mut self) {
        self.selection_failing = true;
    }

    pub fn recover(&mut self, handle: Handle) {
        self.failing.remove(&handle);
    }

    pub fn calls(&self) -> &[ShellCall] {
        &self.calls
    }

    /// Drain the call log.
    pub fn take_calls(&mut self) -> Vec<ShellCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn display_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, ShellCall::Display { .. }))
            .count()
    }

    pub fn undisplay_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, ShellCall::Undisplay(_)))
            .count()
    }

    pub fn redraw_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, ShellCall::RequestRedraw))
            .count()
    }

    /// Most recent selection snapshot pushed to the shell.
    pub fn last_selection(&self) -> Option<&SelectionSnapshot> {
        self.calls.iter().rev().find_map(|call| match call {
            ShellCall::SelectionChanged(snapshot) => Some(snapshot),
            _ => None,
        })
    }

    fn check(&self, handle: Handle) -> Result<(), ShellError> {
        if self.failing.contains(&handle) {
            Err(ShellError::Rejected {
                handle,
                reason: "configured to fail".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

impl PresentationShell for RecordingShell {
    fn display(
        &mut self,
        handle: Handle,
        shape: &Shape,
        color: Option<Color>,
        transparency: f32,
    ) -> Result<(), ShellError> {
        self.check(handle)?;
        self.calls.push(ShellCall::Display {
            handle,
            shape: shape.id(),
            color,
            transparency,
        });
        Ok(())
    }

    fn undisplay(&mut self, handle: Handle) -> Result<(), ShellError> {
        self.check(handle)?;
        self.calls.push(ShellCall::Undisplay(handle));
        Ok(())
    }

    fn notify_selection_changed(&mut self, selection: &SelectionSnapshot) -> Result<(), ShellError> {
        if self.selection_failing {
            return Err(ShellError::Disconnected(
                "selection updates configured to fail".to_string(),
            ));
        }
        self.calls.push(ShellCall::SelectionChanged(selection.clone()));
        Ok(())
    }

    fn request_redraw(&mut self) -> Result<(), ShellError> {
        self.calls.push(ShellCall::RequestRedraw);
        Ok(())
    }
}
