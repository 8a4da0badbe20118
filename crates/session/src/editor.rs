//! In-place topological substitution of tracked shapes.

use kernel::{GeometryKernel, Shape};

use crate::error::SessionError;
use crate::handle::Handle;
use crate::registry::ShapeRegistry;
use crate::selection::SelectionController;
use crate::shell::PresentationShell;

/// Replaces sub-shapes inside registered shapes.
///
/// The rebuilt shape goes back under the same handle with the same display
/// attributes, so external references to the handle stay valid.
pub struct TopologyEditor<'a, K: GeometryKernel, S: PresentationShell> {
    pub kernel: &'a K,
    pub registry: &'a mut ShapeRegistry,
    pub selection: &'a mut SelectionController,
    pub shell: &'a mut S,
}

impl<K: GeometryKernel, S: PresentationShell> TopologyEditor<'_, K, S> {
    /// Substitute `old` with `new` inside the shape at `handle` and return
    /// the handle now holding the result.
    ///
    /// Nothing changes unless the kernel accepts the substitution. After
    /// that, the registry is updated before the shell hears about it.
    pub fn replace(&mut self, handle: Handle, old: &Shape, new: &Shape) -> Result<Handle, SessionError> {
        let record = self.registry.get(handle)?;
        if !record.geometry.contains(old) {
            return Err(SessionError::SubstitutionTargetNotFound {
                handle,
                sub: old.id(),
            });
        }

        let rebuilt = self.kernel.substitute(&record.geometry, old, new)?;
        let replacement = record.with_geometry(rebuilt);

        let previous = self.registry.remove(handle)?;
        self.registry.insert(handle, replacement.clone())?;
        let selection_changed = self.selection.forget_elements(handle);
        tracing::info!(
            "Replaced {:?} with {:?} in handle {} ({:?} -> {:?})",
            old,
            new,
            handle,
            previous.geometry,
            replacement.geometry
        );

        if previous.visible {
            self.shell.undisplay(handle)?;
        }
        if replacement.visible {
            self.shell.show(handle, &replacement)?;
        }
        if selection_changed {
            self.shell
                .notify_selection_changed(&self.selection.snapshot())?;
        }
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ShapeRecord;
    use crate::shell::{RecordingShell, ShellCall};
    use kernel::{BRepKernel, Frame, Primitive, ShapeKind};
    use solidview_ipc::{Color, SelectionKind};

    fn make_box(dx: f64, dy: f64, dz: f64) -> Shape {
        BRepKernel
            .construct(&Primitive::Box {
                frame: Frame::WORLD,
                dx,
                dy,
                dz,
            })
            .unwrap()
    }

    struct Fixture {
        registry: ShapeRegistry,
        selection: SelectionController,
        shell: RecordingShell,
    }

    impl Fixture {
        fn with_box(shape: &Shape) -> Self {
            let mut registry = ShapeRegistry::new();
            registry
                .insert(Handle(0), ShapeRecord::new(shape.clone()).with_color(Color::AZURE))
                .unwrap();
            Self {
                registry,
                selection: SelectionController::new(),
                shell: RecordingShell::new(),
            }
        }

        fn editor(&mut self) -> TopologyEditor<'_, BRepKernel, RecordingShell> {
            TopologyEditor {
                kernel: &BRepKernel,
                registry: &mut self.registry,
                selection: &mut self.selection,
                shell: &mut self.shell,
            }
        }
    }

    #[test]
    fn test_replace_whole_shape() {
        let a = make_box(3.0, 4.0, 5.0);
        let b = make_box(5.0, 2.0, 2.0);
        let mut fx = Fixture::with_box(&a);

        let handle = fx.editor().replace(Handle(0), &a, &b).unwrap();
        assert_eq!(handle, Handle(0));

        let record = fx.registry.get(Handle(0)).unwrap();
        assert!(record.geometry.structurally_eq(&b));
        assert_eq!(record.color, Some(Color::AZURE));
        assert_eq!(
            fx.shell.calls(),
            &[
                ShellCall::Undisplay(Handle(0)),
                ShellCall::Display {
                    handle: Handle(0),
                    shape: b.id(),
                    color: Some(Color::AZURE),
                    transparency: 0.0,
                },
            ]
        );
    }

    #[test]
    fn test_replace_face_keeps_solid() {
        let a = make_box(1.0, 1.0, 1.0);
        let face = a.explore(ShapeKind::Face)[3].clone();
        let moved = face.translated(glam::DVec3::new(0.0, 0.5, 0.0));
        let mut fx = Fixture::with_box(&a);

        fx.editor().replace(Handle(0), &face, &moved).unwrap();
        let geometry = &fx.registry.get(Handle(0)).unwrap().geometry;
        assert_eq!(geometry.kind(), ShapeKind::Solid);
        assert_eq!(geometry.explore(ShapeKind::Face).len(), 6);
        assert!(!geometry.contains(&face));
    }

    #[test]
    fn test_target_not_found() {
        let a = make_box(1.0, 1.0, 1.0);
        let stranger = make_box(1.0, 1.0, 1.0);
        let mut fx = Fixture::with_box(&a);

        let result = fx.editor().replace(Handle(0), &stranger, &a);
        assert!(matches!(
            result,
            Err(SessionError::SubstitutionTargetNotFound { handle: Handle(0), .. })
        ));
        assert!(fx.shell.calls().is_empty());
        assert_eq!(fx.registry.get(Handle(0)).unwrap().geometry, a);
    }

    #[test]
    fn test_invalid_result_leaves_state() {
        let a = make_box(1.0, 1.0, 1.0);
        let edge = a.explore(ShapeKind::Edge)[0].clone();
        let mut fx = Fixture::with_box(&a);

        let result = fx.editor().replace(Handle(0), &edge, &make_box(1.0, 1.0, 1.0));
        assert!(matches!(result, Err(SessionError::InvalidResult(_))));
        assert!(fx.shell.calls().is_empty());
        assert_eq!(fx.registry.get(Handle(0)).unwrap().geometry, a);
    }

    #[test]
    fn test_replace_keeps_shape_pick_and_drops_stale_elements() {
        let a = make_box(3.0, 4.0, 5.0);
        let b = make_box(5.0, 2.0, 2.0);
        let mut fx = Fixture::with_box(&a);
        fx.selection.select_shape(Handle(0), &fx.registry).unwrap();
        fx.selection.enter_mode(SelectionKind::Face);
        fx.selection
            .select_all_subelements(SelectionKind::Face, &fx.registry, &BRepKernel)
            .unwrap();

        fx.editor().replace(Handle(0), &a, &b).unwrap();
        assert!(fx.selection.is_shape_selected(Handle(0)));
        assert_eq!(fx.selection.selected_elements().count(), 0);
        assert!(matches!(
            fx.shell.calls().last(),
            Some(ShellCall::SelectionChanged(snapshot)) if snapshot.shapes == vec![Handle(0)]
        ));
    }

    #[test]
    fn test_unknown_handle() {
        let a = make_box(1.0, 1.0, 1.0);
        let mut fx = Fixture::with_box(&a);
        assert!(matches!(
            fx.editor().replace(Handle(4), &a, &a),
            Err(SessionError::UnknownHandle(Handle(4)))
        ));
    }
}
