//! Per-shape display state.

use kernel::Shape;
use solidview_ipc::Color;

/// One tracked shape: a shared reference to kernel geometry plus the
/// attributes it is displayed with.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeRecord {
    pub geometry: Shape,
    /// `None` means the kernel's default color
    pub color: Option<Color>,
    /// 0.0 = opaque, 1.0 = fully transparent
    pub transparency: f32,
    pub visible: bool,
}

impl ShapeRecord {
    /// Visible, opaque, default color.
    pub fn new(geometry: Shape) -> Self {
        Self {
            geometry,
            color: None,
            transparency: 0.0,
            visible: true,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_transparency(mut self, transparency: f32) -> Self {
        self.transparency = transparency.clamp(0.0, 1.0);
        self
    }

    /// Same attributes around different geometry.
    pub fn with_geometry(&self, geometry: Shape) -> Self {
        Self {
            geometry,
            ..self.clone()
        }
    }
}
