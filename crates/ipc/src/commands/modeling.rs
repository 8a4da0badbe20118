//! Shape construction commands issued from the primitive and modeling menus.

use serde::{Deserialize, Serialize};

/// Primitive construction actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrimitiveCommand {
    /// Box 3 x 4 x 5 at the origin
    MakeBox,
    /// Cone reducer and full cone
    MakeCone,
    MakeSphere,
    /// Full cylinder and a 270 degree pie
    MakeCylinder,
    /// Full torus and a 90 degree elbow
    MakeTorus,
}

/// Boolean operation demos (box against sphere).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BooleanCommand {
    Cut,
    Fuse,
    Common,
}
