//! Type definitions for IPC messages.

mod color;
mod mesh;
mod selection;
mod viewport;

pub use color::*;
pub use mesh::*;
pub use selection::*;
pub use viewport::*;
