//! Selection granularity and the selected set.
//!
//! The controller starts in [`SelectionMode::Neutral`] with nothing selected
//! and lives for the whole session. Whole-shape picks and sub-element picks
//! are tracked separately: leaving a sub-element mode drops the latter and
//! keeps the former.

use std::fmt;

use indexmap::IndexSet;
use kernel::{GeometryKernel, Shape, ShapeKind};
use solidview_ipc::{SelectedElement, SelectionInfo, SelectionKind, SelectionModeInfo};

use crate::error::SessionError;
use crate::handle::Handle;
use crate::registry::ShapeRegistry;
use crate::shell::PresentationShell;

/// Current selection granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SelectionMode {
    /// Whole shapes only
    #[default]
    Neutral,
    Face,
    Edge,
    Vertex,
}

impl SelectionMode {
    pub fn for_kind(kind: SelectionKind) -> Self {
        match kind {
            SelectionKind::Face => SelectionMode::Face,
            SelectionKind::Edge => SelectionMode::Edge,
            SelectionKind::Vertex => SelectionMode::Vertex,
        }
    }

    /// Whether picks of `kind` are allowed in this mode.
    pub fn accepts(self, kind: SelectionKind) -> bool {
        self == Self::for_kind(kind)
    }

    pub fn name(self) -> &'static str {
        match self {
            SelectionMode::Neutral => "neutral",
            SelectionMode::Face => "face",
            SelectionMode::Edge => "edge",
            SelectionMode::Vertex => "vertex",
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<SelectionMode> for SelectionModeInfo {
    fn from(mode: SelectionMode) -> Self {
        match mode {
            SelectionMode::Neutral => SelectionModeInfo::Neutral,
            SelectionMode::Face => SelectionModeInfo::Face,
            SelectionMode::Edge => SelectionModeInfo::Edge,
            SelectionMode::Vertex => SelectionModeInfo::Vertex,
        }
    }
}

/// Kernel topology kind matching a selection kind.
pub fn shape_kind(kind: SelectionKind) -> ShapeKind {
    match kind {
        SelectionKind::Face => ShapeKind::Face,
        SelectionKind::Edge => ShapeKind::Edge,
        SelectionKind::Vertex => ShapeKind::Vertex,
    }
}

fn kind_name(kind: SelectionKind) -> &'static str {
    match kind {
        SelectionKind::Face => "face",
        SelectionKind::Edge => "edge",
        SelectionKind::Vertex => "vertex",
    }
}

/// A selected sub-shape and the handle that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubElement {
    pub handle: Handle,
    pub kind: SelectionKind,
    pub shape: Shape,
}

/// Point-in-time copy of the selection, pushed to the shell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionSnapshot {
    pub mode: SelectionMode,
    pub shapes: Vec<Handle>,
    pub elements: Vec<SubElement>,
}

impl SelectionSnapshot {
    pub fn to_info(&self) -> SelectionInfo {
        SelectionInfo {
            mode: self.mode.into(),
            shapes: self.shapes.iter().map(|h| h.0).collect(),
            elements: self
                .elements
                .iter()
                .map(|e| SelectedElement {
                    handle: e.handle.0,
                    kind: e.kind,
                    shape_id: e.shape.id().0,
                })
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty() && self.elements.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct SelectionController {
    mode: SelectionMode,
    /// Whole-shape picks, in pick order
    shapes: IndexSet<Handle>,
    /// Sub-element picks, in pick order
    elements: IndexSet<SubElement>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn selected_shapes(&self) -> impl Iterator<Item = Handle> + '_ {
        self.shapes.iter().copied()
    }

    pub fn selected_elements(&self) -> impl Iterator<Item = &SubElement> {
        self.elements.iter()
    }

    pub fn is_shape_selected(&self, handle: Handle) -> bool {
        self.shapes.contains(&handle)
    }

    /// Close the current mode and open one restricted to `kind`. Re-entering
    /// the current mode clears its selection.
    pub fn enter_mode(&mut self, kind: SelectionKind) {
        self.elements.clear();
        self.mode = SelectionMode::for_kind(kind);
        tracing::debug!("Entered {} selection mode", self.mode);
    }

    /// Back to neutral. Whole-shape picks survive.
    pub fn exit(&mut self) {
        self.elements.clear();
        self.mode = SelectionMode::Neutral;
        tracing::debug!("Returned to neutral selection mode");
    }

    /// Add every `kind` sub-shape of every visible record. Returns how many
    /// were newly added; already selected elements are left as they are.
    pub fn select_all_subelements<K: GeometryKernel>(
        &mut self,
        kind: SelectionKind,
        registry: &ShapeRegistry,
        kernel: &K,
    ) -> Result<usize, SessionError> {
        if !self.mode.accepts(kind) {
            return Err(SessionError::ModeMismatch {
                mode: self.mode,
                requested: kind_name(kind),
            });
        }

        let mut added = 0;
        for handle in registry.visible_handles() {
            let record = registry.get(handle)?;
            for shape in kernel.decompose(&record.geometry, shape_kind(kind)) {
                if self.elements.insert(SubElement { handle, kind, shape }) {
                    added += 1;
                }
            }
        }
        tracing::debug!(
            "Selected {} new {} elements ({} total)",
            added,
            kind_name(kind),
            self.elements.len()
        );
        Ok(added)
    }

    /// Pick a whole shape. Only allowed in neutral mode.
    pub fn select_shape(
        &mut self,
        handle: Handle,
        registry: &ShapeRegistry,
    ) -> Result<bool, SessionError> {
        if self.mode != SelectionMode::Neutral {
            return Err(SessionError::ModeMismatch {
                mode: self.mode,
                requested: "whole-shape",
            });
        }
        registry.get(handle)?;
        Ok(self.shapes.insert(handle))
    }

    pub fn deselect_shape(&mut self, handle: Handle) -> bool {
        self.shapes.shift_remove(&handle)
    }

    /// Empty the selected set without changing mode.
    pub fn clear(&mut self) {
        self.shapes.clear();
        self.elements.clear();
    }

    /// Drop everything that refers to `handle`. Returns whether anything
    /// was dropped.
    pub fn forget(&mut self, handle: Handle) -> bool {
        let before = self.shapes.len() + self.elements.len();
        self.shapes.shift_remove(&handle);
        self.elements.retain(|e| e.handle != handle);
        before != self.shapes.len() + self.elements.len()
    }

    /// Drop the sub-element picks on `handle`, keeping a whole-shape pick.
    /// Returns whether anything was dropped.
    pub fn forget_elements(&mut self, handle: Handle) -> bool {
        let before = self.elements.len();
        self.elements.retain(|e| e.handle != handle);
        before != self.elements.len()
    }

    /// Remove every whole-shape pick from the registry and the display, then
    /// clear the selection. Sub-element picks are never deleted on their own.
    ///
    /// Handles are processed independently: a shell failure on one is
    /// reported and the rest still go.
    pub fn delete_selected<S: PresentationShell>(
        &mut self,
        registry: &mut ShapeRegistry,
        shell: &mut S,
    ) -> crate::bulk::BulkReport {
        let mut report = crate::bulk::BulkReport::default();
        let handles: Vec<Handle> = self.shapes.iter().copied().collect();
        for handle in handles {
            match registry.remove(handle) {
                Ok(record) => {
                    report.processed += 1;
                    if record.visible {
                        if let Err(e) = shell.undisplay(handle) {
                            tracing::warn!("Failed to undisplay handle {}: {}", handle, e);
                            report.failures.push((handle, e.into()));
                        }
                    }
                }
                Err(e) => report.failures.push((handle, e)),
            }
        }
        self.clear();
        report
    }

    pub fn snapshot(&self) -> SelectionSnapshot {
        SelectionSnapshot {
            mode: self.mode,
            shapes: self.shapes.iter().copied().collect(),
            elements: self.elements.iter().cloned().collect(),
        }
    }
}
