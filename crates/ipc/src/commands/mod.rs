//! Command types for IPC messages.

mod attributes;
mod modeling;
mod selection;

pub use attributes::*;
pub use modeling::*;
pub use selection::*;
