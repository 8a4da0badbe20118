//! Best-effort operations over every visible shape.
//!
//! Each shape is processed on its own: a failure is recorded and the loop
//! moves on, so shapes handled before the failure stay mutated.

use crate::error::SessionError;
use crate::handle::Handle;
use crate::registry::ShapeRegistry;
use crate::selection::SelectionController;
use crate::shell::PresentationShell;

/// Outcome of a bulk operation.
#[derive(Debug, Default)]
pub struct BulkReport {
    /// Shapes whose registry state was changed
    pub processed: usize,
    pub failures: Vec<(Handle, SessionError)>,
}

impl BulkReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn fail(&mut self, handle: Handle, error: SessionError) {
        tracing::warn!("Bulk operation failed for handle {}: {}", handle, error);
        self.failures.push((handle, error));
    }
}

/// Reset every visible shape to the kernel default color and redisplay it.
pub fn unset_color_all<S: PresentationShell>(
    registry: &mut ShapeRegistry,
    shell: &mut S,
) -> BulkReport {
    let mut report = BulkReport::default();
    for handle in registry.visible_handles() {
        let record = match registry.get_mut(handle) {
            Ok(record) => record,
            Err(e) => {
                report.fail(handle, e);
                continue;
            }
        };
        record.color = None;
        report.processed += 1;
        if let Err(e) = shell.show(handle, record) {
            report.fail(handle, e.into());
        }
    }
    tracing::info!(
        "Unset color on {} shapes ({} failures)",
        report.processed,
        report.failures.len()
    );
    report
}

/// Remove every shape from the registry, undisplaying the visible ones.
pub fn delete_all<S: PresentationShell>(
    registry: &mut ShapeRegistry,
    selection: &mut SelectionController,
    shell: &mut S,
) -> BulkReport {
    let mut report = BulkReport::default();
    for handle in registry.handles() {
        let record = match registry.remove(handle) {
            Ok(record) => record,
            Err(e) => {
                report.fail(handle, e);
                continue;
            }
        };
        selection.forget(handle);
        report.processed += 1;
        if record.visible {
            if let Err(e) = shell.undisplay(handle) {
                report.fail(handle, e.into());
            }
        }
    }
    tracing::info!(
        "Deleted {} shapes ({} failures)",
        report.processed,
        report.failures.len()
    );
    report
}
