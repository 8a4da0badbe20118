//! Viewport description sent when the shell connects.

use serde::{Deserialize, Serialize};

/// Initial window layout for the presentation shell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportInfo {
    pub width: u32,
    pub height: u32,
    pub scale: f32,
}
