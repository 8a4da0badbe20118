//! Display colors.

use serde::{Deserialize, Serialize};

/// RGB display color (0.0-1.0 per channel).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub const fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub const AZURE: Color = Color::rgb(0.941, 1.0, 1.0);
    pub const BISQUE: Color = Color::rgb(1.0, 0.894, 0.769);
    pub const CHOCOLATE: Color = Color::rgb(0.824, 0.412, 0.118);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const TAN: Color = Color::rgb(0.824, 0.706, 0.549);
    pub const YELLOW: Color = Color::rgb(1.0, 1.0, 0.0);
    pub const THISTLE: Color = Color::rgb(0.847, 0.749, 0.847);
    pub const SPRING_GREEN: Color = Color::rgb(0.0, 1.0, 0.498);
    pub const STEEL_BLUE: Color = Color::rgb(0.275, 0.510, 0.706);
    pub const SALMON: Color = Color::rgb(0.980, 0.502, 0.447);
    pub const ROSY_BROWN: Color = Color::rgb(0.737, 0.561, 0.561);
    pub const ROYAL_BLUE: Color = Color::rgb(0.255, 0.412, 0.882);
}

impl From<[f32; 3]> for Color {
    fn from(c: [f32; 3]) -> Self {
        Self::rgb(c[0], c[1], c[2])
    }
}
