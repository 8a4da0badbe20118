//! Tessellated geometry sent to the shell for rendering.

use serde::{Deserialize, Serialize};

/// Render-ready mesh of one displayed shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshPayload {
    pub positions: Vec<[f32; 3]>,
    /// Triangle list indices into `positions`
    pub indices: Vec<u32>,
    /// Free edges rendered as line strips
    pub polylines: Vec<Vec<u32>>,
    /// Free vertices rendered as markers
    #[serde(default)]
    pub points: Vec<u32>,
}

impl MeshPayload {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
