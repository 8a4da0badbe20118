//! The session object.
//!
//! A [`Session`] owns every piece of mutable state for one viewer: the
//! registry, the selection controller, the kernel and the shell. Command
//! handlers receive it by `&mut`; nothing lives in globals.
//!
//! Ordering rule for every command: the registry is updated first, then the
//! shell is told. If the shell call fails the registry keeps the new state
//! and the error is returned.

use kernel::{BooleanOp, BoundingBox, GeometryKernel, Primitive, Shape};
use solidview_config::{OverlayConfig, SessionConfig};
use solidview_ipc::{Color, SelectionKind};

use crate::bounds::BoundingVolumeCalculator;
use crate::bulk::{self, BulkReport};
use crate::editor::TopologyEditor;
use crate::error::SessionError;
use crate::handle::{Handle, HandleAllocator};
use crate::record::ShapeRecord;
use crate::registry::ShapeRegistry;
use crate::selection::{SelectionController, SelectionMode};
use crate::shell::PresentationShell;

pub struct Session<K: GeometryKernel, S: PresentationShell> {
    kernel: K,
    shell: S,
    registry: ShapeRegistry,
    selection: SelectionController,
    bounds: BoundingVolumeCalculator,
    overlay: OverlayConfig,
    redraw_requested: bool,
}

impl<K: GeometryKernel, S: PresentationShell> Session<K, S> {
    pub fn new(kernel: K, shell: S, config: &SessionConfig) -> Self {
        Self {
            kernel,
            shell,
            registry: ShapeRegistry::new(),
            selection: SelectionController::new(),
            bounds: BoundingVolumeCalculator::from_config(&config.bounds),
            overlay: config.overlay.clone(),
            redraw_requested: false,
        }
    }

    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    pub fn shell(&self) -> &S {
        &self.shell
    }

    pub fn shell_mut(&mut self) -> &mut S {
        &mut self.shell
    }

    pub fn registry(&self) -> &ShapeRegistry {
        &self.registry
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn get(&self, handle: Handle) -> Result<&ShapeRecord, SessionError> {
        self.registry.get(handle)
    }

    // Registration

    /// Track `record` under `handle` and display it if visible.
    pub fn register(&mut self, handle: Handle, record: ShapeRecord) -> Result<(), SessionError> {
        self.registry.insert(handle, record)?;
        let record = self.registry.get(handle)?;
        if record.visible {
            self.shell.show(handle, record)?;
        }
        Ok(())
    }

    /// Build a primitive and register it under `handle`.
    pub fn construct(
        &mut self,
        handle: Handle,
        primitive: &Primitive,
        color: Option<Color>,
    ) -> Result<Shape, SessionError> {
        self.ensure_free(handle)?;
        let shape = self.kernel.construct(primitive)?;
        self.register(handle, record_with(shape.clone(), color))?;
        tracing::info!("Constructed {} at handle {}", primitive.name(), handle);
        Ok(shape)
    }

    /// Evaluate a boolean and register the result under `handle`.
    pub fn construct_boolean(
        &mut self,
        handle: Handle,
        op: BooleanOp,
        a: &Shape,
        b: &Shape,
        color: Option<Color>,
    ) -> Result<Shape, SessionError> {
        self.ensure_free(handle)?;
        let shape = self.kernel.boolean(op, a, b)?;
        self.register(handle, record_with(shape.clone(), color))?;
        tracing::info!("Registered {:?} result at handle {}", op, handle);
        Ok(shape)
    }

    fn ensure_free(&self, handle: Handle) -> Result<(), SessionError> {
        if self.registry.contains(handle) {
            Err(SessionError::DuplicateHandle(handle))
        } else {
            Ok(())
        }
    }

    /// Stop tracking `handle` and erase it from the display.
    pub fn delete(&mut self, handle: Handle) -> Result<(), SessionError> {
        let record = self.registry.remove(handle)?;
        let selection_changed = self.selection.forget(handle);
        if record.visible {
            self.shell.undisplay(handle)?;
        }
        if selection_changed {
            self.notify_selection()?;
        }
        tracing::info!("Deleted handle {}", handle);
        Ok(())
    }

    // Display attributes

    pub fn set_color(&mut self, handle: Handle, color: Color) -> Result<(), SessionError> {
        self.update_record(handle, |record| record.color = Some(color))
    }

    pub fn unset_color(&mut self, handle: Handle) -> Result<(), SessionError> {
        self.update_record(handle, |record| record.color = None)
    }

    /// Values outside [0, 1] are clamped.
    pub fn set_transparency(&mut self, handle: Handle, transparency: f32) -> Result<(), SessionError> {
        let clamped = if transparency.is_nan() {
            0.0
        } else {
            transparency.clamp(0.0, 1.0)
        };
        if clamped != transparency {
            tracing::warn!(
                "Transparency {} for handle {} clamped to {}",
                transparency,
                handle,
                clamped
            );
        }
        self.update_record(handle, |record| record.transparency = clamped)
    }

    /// Hiding undisplays the shape but keeps it tracked; showing displays it
    /// again.
    pub fn set_visibility(&mut self, handle: Handle, visible: bool) -> Result<(), SessionError> {
        let record = self.registry.get_mut(handle)?;
        if record.visible == visible {
            return Ok(());
        }
        record.visible = visible;
        if visible {
            self.shell.show(handle, record)?;
        } else {
            self.shell.undisplay(handle)?;
        }
        tracing::debug!("Handle {} visibility set to {}", handle, visible);
        Ok(())
    }

    fn update_record(
        &mut self,
        handle: Handle,
        update: impl FnOnce(&mut ShapeRecord),
    ) -> Result<(), SessionError> {
        let record = self.registry.get_mut(handle)?;
        update(record);
        if record.visible {
            self.shell.show(handle, record)?;
        }
        Ok(())
    }

    // Bounding volumes

    pub fn bounding_box(&self, handle: Handle) -> Result<BoundingBox, SessionError> {
        let record = self.registry.get(handle)?;
        self.bounds.compute(&self.kernel, &record.geometry)
    }

    /// Overlay a transparent box on every visible shape. New overlays get
    /// handles from `allocator` and are ordinary records afterwards.
    pub fn draw_bounding_boxes(&mut self, allocator: &mut HandleAllocator) -> BulkReport {
        let mut report = BulkReport::default();
        let color = Color::from(self.overlay.color);
        let transparency = self.overlay.transparency;

        for handle in self.registry.visible_handles() {
            let result = self
                .bounding_box(handle)
                .and_then(|bounds| {
                    self.kernel
                        .construct(&Primitive::BoxFromCorners {
                            min: bounds.min,
                            max: bounds.max,
                        })
                        .map_err(SessionError::from)
                });
            let overlay = match result {
                Ok(shape) => shape,
                Err(e) => {
                    tracing::warn!("No bounding box for handle {}: {}", handle, e);
                    report.failures.push((handle, e));
                    continue;
                }
            };

            let Some(target) = allocator.allocate(&self.registry) else {
                tracing::warn!("Handle space exhausted while drawing bounding boxes");
                break;
            };
            let record = ShapeRecord::new(overlay)
                .with_color(color)
                .with_transparency(transparency);
            match self.register(target, record) {
                Ok(()) => report.processed += 1,
                Err(e) => {
                    tracing::warn!("Failed to display bounding box {}: {}", target, e);
                    // Registered even if display failed.
                    if self.registry.contains(target) {
                        report.processed += 1;
                    }
                    report.failures.push((target, e));
                }
            }
        }
        tracing::info!("Drew {} bounding boxes", report.processed);
        report
    }

    // Selection

    pub fn enter_selection_mode(&mut self, kind: SelectionKind) -> Result<(), SessionError> {
        self.selection.enter_mode(kind);
        self.notify_selection()
    }

    pub fn exit_selection_mode(&mut self) -> Result<(), SessionError> {
        self.selection.exit();
        self.notify_selection()
    }

    pub fn select_all(&mut self, kind: SelectionKind) -> Result<usize, SessionError> {
        let added = self
            .selection
            .select_all_subelements(kind, &self.registry, &self.kernel)?;
        self.notify_selection()?;
        Ok(added)
    }

    pub fn clear_selection(&mut self) -> Result<(), SessionError> {
        self.selection.clear();
        self.notify_selection()
    }

    /// Whole-shape pick reported by the shell; only accepted in neutral mode.
    pub fn select_shape(&mut self, handle: Handle) -> Result<(), SessionError> {
        if self.selection.select_shape(handle, &self.registry)? {
            self.notify_selection()?;
        }
        Ok(())
    }

    pub fn deselect_shape(&mut self, handle: Handle) -> Result<(), SessionError> {
        if self.selection.mode() != SelectionMode::Neutral {
            return Err(SessionError::ModeMismatch {
                mode: self.selection.mode(),
                requested: "whole-shape",
            });
        }
        if self.selection.deselect_shape(handle) {
            self.notify_selection()?;
        }
        Ok(())
    }

    /// Delete every whole-shape pick. Per-handle failures are in the report;
    /// failing to push the emptied selection is an error.
    pub fn delete_selected(&mut self) -> Result<BulkReport, SessionError> {
        let report = self
            .selection
            .delete_selected(&mut self.registry, &mut self.shell);
        self.notify_selection()?;
        Ok(report)
    }

    fn notify_selection(&mut self) -> Result<(), SessionError> {
        self.shell
            .notify_selection_changed(&self.selection.snapshot())?;
        Ok(())
    }

    // Topology editing

    /// Replace `old` with `new` inside the shape at `handle`, keeping the
    /// handle and its display attributes.
    pub fn replace(&mut self, handle: Handle, old: &Shape, new: &Shape) -> Result<Handle, SessionError> {
        TopologyEditor {
            kernel: &self.kernel,
            registry: &mut self.registry,
            selection: &mut self.selection,
            shell: &mut self.shell,
        }
        .replace(handle, old, new)
    }

    // Bulk operations

    pub fn unset_color_all(&mut self) -> BulkReport {
        bulk::unset_color_all(&mut self.registry, &mut self.shell)
    }

    /// Remove every shape. Per-handle failures are in the report; failing
    /// to push the emptied selection is an error.
    pub fn delete_all(&mut self) -> Result<BulkReport, SessionError> {
        let report = bulk::delete_all(&mut self.registry, &mut self.selection, &mut self.shell);
        self.notify_selection()?;
        Ok(report)
    }

    // Layout

    /// The shell's initial layout is stable. The first call requests one
    /// redraw; later calls do nothing. Returns whether a redraw was issued.
    pub fn on_layout_ready(&mut self) -> Result<bool, SessionError> {
        if self.redraw_requested {
            return Ok(false);
        }
        self.redraw_requested = true;
        self.shell.request_redraw()?;
        tracing::debug!("Requested deferred redraw after layout");
        Ok(true)
    }
}

fn record_with(shape: Shape, color: Option<Color>) -> ShapeRecord {
    let record = ShapeRecord::new(shape);
    match color {
        Some(color) => record.with_color(color),
        None => record,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::{RecordingShell, ShellCall, ShellError};
    use glam::DVec3;
    use kernel::{BRepKernel, Frame, ShapeKind};

    fn session() -> Session<BRepKernel, RecordingShell> {
        Session::new(BRepKernel, RecordingShell::new(), &SessionConfig::default())
    }

    fn unit_box(origin: DVec3) -> Primitive {
        Primitive::Box {
            frame: Frame::at(origin),
            dx: 1.0,
            dy: 1.0,
            dz: 1.0,
        }
    }

    #[test]
    fn test_construct_displays_after_registering() {
        let mut s = session();
        let shape = s
            .construct(Handle(0), &unit_box(DVec3::ZERO), Some(Color::AZURE))
            .unwrap();
        assert_eq!(s.get(Handle(0)).unwrap().geometry, shape);
        assert_eq!(
            s.shell().calls(),
            &[ShellCall::Display {
                handle: Handle(0),
                shape: shape.id(),
                color: Some(Color::AZURE),
                transparency: 0.0,
            }]
        );
    }

    #[test]
    fn test_construct_into_taken_handle() {
        let mut s = session();
        s.construct(Handle(0), &unit_box(DVec3::ZERO), None).unwrap();
        let result = s.construct(Handle(0), &unit_box(DVec3::X), None);
        assert!(matches!(result, Err(SessionError::DuplicateHandle(Handle(0)))));
        assert_eq!(s.shell().display_count(), 1);
    }

    #[test]
    fn test_construction_error_surfaces() {
        let mut s = session();
        let result = s.construct(
            Handle(1),
            &Primitive::Sphere {
                frame: Frame::WORLD,
                radius: -1.0,
            },
            None,
        );
        assert!(matches!(result, Err(SessionError::GeometricConstruction(_))));
        assert!(s.registry().is_empty());
    }

    #[test]
    fn test_display_failure_keeps_record() {
        let mut s = session();
        s.shell_mut().fail_on(Handle(3));
        let result = s.construct(Handle(3), &unit_box(DVec3::ZERO), None);
        assert!(matches!(result, Err(SessionError::Shell(_))));
        assert!(s.registry().contains(Handle(3)));
    }

    #[test]
    fn test_attributes_redisplay() {
        let mut s = session();
        s.construct(Handle(0), &unit_box(DVec3::ZERO), None).unwrap();
        s.shell_mut().take_calls();

        s.set_color(Handle(0), Color::RED).unwrap();
        s.set_transparency(Handle(0), 1.7).unwrap();
        let record = s.get(Handle(0)).unwrap();
        assert_eq!(record.color, Some(Color::RED));
        assert_eq!(record.transparency, 1.0);
        assert_eq!(s.shell().display_count(), 2);

        s.unset_color(Handle(0)).unwrap();
        assert_eq!(s.get(Handle(0)).unwrap().color, None);
        assert!(matches!(
            s.set_color(Handle(9), Color::RED),
            Err(SessionError::UnknownHandle(Handle(9)))
        ));
    }

    #[test]
    fn test_visibility() {
        let mut s = session();
        s.construct(Handle(0), &unit_box(DVec3::ZERO), None).unwrap();
        s.shell_mut().take_calls();

        s.set_visibility(Handle(0), false).unwrap();
        s.set_visibility(Handle(0), false).unwrap();
        assert_eq!(s.shell().calls(), &[ShellCall::Undisplay(Handle(0))]);
        assert!(s.registry().contains(Handle(0)));

        // Hidden shapes get attribute updates without being redisplayed.
        s.set_color(Handle(0), Color::TAN).unwrap();
        assert_eq!(s.shell().display_count(), 0);

        s.set_visibility(Handle(0), true).unwrap();
        assert_eq!(s.shell().display_count(), 1);
    }

    #[test]
    fn test_delete_forgets_selection() {
        let mut s = session();
        s.construct(Handle(0), &unit_box(DVec3::ZERO), None).unwrap();
        s.select_shape(Handle(0)).unwrap();
        s.delete(Handle(0)).unwrap();

        assert!(s.registry().is_empty());
        assert!(s.selection().snapshot().is_empty());
        assert_eq!(s.shell().undisplay_count(), 1);
        assert!(s.shell().last_selection().unwrap().is_empty());
        assert!(matches!(
            s.delete(Handle(0)),
            Err(SessionError::UnknownHandle(_))
        ));
    }

    #[test]
    fn test_draw_bounding_boxes() {
        let mut s = session();
        s.construct(Handle(0), &unit_box(DVec3::ZERO), None).unwrap();
        s.construct(Handle(1), &unit_box(DVec3::new(5.0, 0.0, 0.0)), None)
            .unwrap();
        s.register(Handle(2), ShapeRecord::new(Shape::compound(Vec::new())))
            .unwrap();

        let mut allocator = HandleAllocator::starting_at(1);
        let report = s.draw_bounding_boxes(&mut allocator);
        assert_eq!(report.processed, 2);
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(report.failures[0].1, SessionError::DegenerateShape));

        let overlay = s.get(Handle(3)).unwrap();
        assert_eq!(overlay.color, Some(Color::from([0.941, 1.0, 1.0])));
        assert_eq!(overlay.transparency, 0.8);
        assert_eq!(overlay.geometry.kind(), ShapeKind::Solid);
        assert!(s.registry().contains(Handle(4)));
        let b = s.bounding_box(Handle(4)).unwrap();
        assert_eq!(b.min, DVec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn test_selection_commands_notify() {
        let mut s = session();
        s.construct(Handle(0), &unit_box(DVec3::ZERO), None).unwrap();

        s.enter_selection_mode(SelectionKind::Edge).unwrap();
        assert_eq!(s.select_all(SelectionKind::Edge).unwrap(), 12);
        let snapshot = s.shell().last_selection().unwrap();
        assert_eq!(snapshot.mode, SelectionMode::Edge);
        assert_eq!(snapshot.elements.len(), 12);

        assert!(matches!(
            s.select_all(SelectionKind::Face),
            Err(SessionError::ModeMismatch { .. })
        ));
        assert!(matches!(
            s.select_shape(Handle(0)),
            Err(SessionError::ModeMismatch { .. })
        ));

        s.exit_selection_mode().unwrap();
        s.select_shape(Handle(0)).unwrap();
        s.deselect_shape(Handle(0)).unwrap();
        assert!(s.selection().snapshot().is_empty());
    }

    #[test]
    fn test_layout_ready_redraws_once() {
        let mut s = session();
        assert!(s.on_layout_ready().unwrap());
        assert!(!s.on_layout_ready().unwrap());
        assert_eq!(s.shell().redraw_count(), 1);
    }

    #[test]
    fn test_delete_all_reports_selection_push_failure() {
        let mut s = session();
        s.construct(Handle(0), &unit_box(DVec3::ZERO), None).unwrap();
        s.shell_mut().fail_selection_updates();

        let result = s.delete_all();
        assert!(matches!(
            result,
            Err(SessionError::Shell(ShellError::Disconnected(_)))
        ));
        assert!(s.registry().is_empty());
    }
}
