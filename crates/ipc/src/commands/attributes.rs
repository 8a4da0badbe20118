//! Display attribute commands.

use serde::{Deserialize, Serialize};

use crate::types::Color;

/// Commands that change how a tracked shape is displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeCommand {
    SetColor { handle: u32, color: Color },
    /// Fall back to the kernel default color
    UnsetColor { handle: u32 },
    /// Transparency (0.0 = opaque, 1.0 = invisible)
    SetTransparency { handle: u32, transparency: f32 },
    SetVisibility { handle: u32, visible: bool },
}
