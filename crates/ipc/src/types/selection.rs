//! Selection state as seen by the shell.

use serde::{Deserialize, Serialize};

/// Sub-element kind that a selection context accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectionKind {
    Face,
    Edge,
    Vertex,
}

/// Current selection granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelectionModeInfo {
    /// Whole-shape selection only
    #[default]
    Neutral,
    Face,
    Edge,
    Vertex,
}

/// One selected sub-element, identified by its owning handle and the
/// kernel's shape id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedElement {
    pub handle: u32,
    pub kind: SelectionKind,
    pub shape_id: u64,
}

/// Full selection snapshot pushed after every selection change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionInfo {
    pub mode: SelectionModeInfo,
    /// Handles selected as whole shapes
    pub shapes: Vec<u32>,
    pub elements: Vec<SelectedElement>,
}
