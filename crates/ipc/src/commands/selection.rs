//! Selection command types.

use serde::{Deserialize, Serialize};

use crate::types::SelectionKind;

/// Commands for the selection controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionCommand {
    /// Open a sub-element selection context for faces, edges, or vertices
    EnterMode { kind: SelectionKind },
    /// Return to whole-shape selection
    Exit,
    /// Select every sub-element of `kind` on every visible shape
    SelectAll { kind: SelectionKind },
    /// Enter edge mode and select every edge
    SelectEdges,
    /// Deselect everything, keeping the current mode
    Clear,
    /// Whole-shape picks reported by hit-testing
    SelectShapes { handles: Vec<u32> },
    DeselectShapes { handles: Vec<u32> },
    /// Delete every whole-shape selection
    DeleteSelected,
}
