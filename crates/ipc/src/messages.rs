//! Main IPC message enums for communication between the core and the shell.

use serde::{Deserialize, Serialize};

use crate::commands::{AttributeCommand, BooleanCommand, PrimitiveCommand, SelectionCommand};
use crate::types::{Color, MeshPayload, SelectionInfo, ViewportInfo};

/// Messages from the session core to the presentation shell.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CoreToShell {
    /// Sent once when the core starts; the shell builds its window from it
    Initialize { viewport: ViewportInfo },

    /// Show (or replace) the geometry tracked under `handle`
    Display {
        handle: u32,
        /// `None` means the renderer's default material color
        color: Option<Color>,
        transparency: f32,
        mesh: MeshPayload,
    },

    /// Stop showing the geometry tracked under `handle`
    Undisplay { handle: u32 },

    /// Selection set changed
    SelectionChanged(SelectionInfo),

    /// Repaint the viewer
    RequestRedraw,

    /// Command failed; shown to the user as a dialog
    Error { code: String, message: String },
}

/// Messages from the presentation shell to the session core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ShellToCore {
    /// Initial window layout is stable
    LayoutReady,

    Primitive(PrimitiveCommand),

    Boolean(BooleanCommand),

    Selection(SelectionCommand),

    Attribute(AttributeCommand),

    /// Overlay a transparent bounding box on every visible shape
    DrawBoundingBoxes,

    /// Reset every visible shape to the default color
    UnsetColorAll,

    /// Remove every shape from the session
    DeleteAll,

    /// Remove the shape tracked under `handle`
    Delete { handle: u32 },

    /// Replace the box in slot 0 with a 5 x 2 x 2 box
    ModifyBox,

    /// End the session
    Quit,
}
