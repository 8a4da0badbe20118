//! End-to-end session scenarios against the analytic kernel.

use std::f64::consts::TAU;

use approx::assert_relative_eq;
use glam::DVec3;
use kernel::{BRepKernel, Frame, GeometryKernel, Primitive, Shape, ShapeKind};
use solidview_config::SessionConfig;
use solidview_ipc::{Color, SelectionKind};
use solidview_session::{
    Handle, PresentationShell, RecordingShell, SelectionMode, Session, SessionError, ShellCall,
};

fn session() -> Session<BRepKernel, RecordingShell> {
    Session::new(BRepKernel, RecordingShell::new(), &SessionConfig::default())
}

fn box_primitive(dx: f64, dy: f64, dz: f64) -> Primitive {
    Primitive::Box {
        frame: Frame::WORLD,
        dx,
        dy,
        dz,
    }
}

#[test]
fn test_box_lifecycle() {
    let mut s = session();
    let shape = s
        .construct(Handle(0), &box_primitive(3.0, 4.0, 5.0), None)
        .unwrap();

    let record = s.get(Handle(0)).unwrap();
    assert_eq!(record.geometry, shape);
    assert_eq!(record.color, None);
    assert!(record.visible);

    s.delete(Handle(0)).unwrap();
    assert!(matches!(
        s.get(Handle(0)),
        Err(SessionError::UnknownHandle(Handle(0)))
    ));
    assert_eq!(s.registry().all().count(), 0);
}

#[test]
fn test_modify_in_place() {
    let mut s = session();
    let a = s
        .construct(Handle(0), &box_primitive(3.0, 4.0, 5.0), Some(Color::AZURE))
        .unwrap();
    let b = s.kernel().construct(&box_primitive(5.0, 2.0, 2.0)).unwrap();
    s.shell_mut().take_calls();

    let handle = s.replace(Handle(0), &a, &b).unwrap();
    assert_eq!(handle, Handle(0));
    assert!(s.get(Handle(0)).unwrap().geometry.structurally_eq(&b));

    let calls = s.shell().calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], ShellCall::Undisplay(Handle(0)));
    assert!(matches!(
        &calls[1],
        ShellCall::Display { handle: Handle(0), shape, .. } if *shape == b.id()
    ));
}

#[test]
fn test_bulk_delete() {
    let mut s = session();
    for i in 0..5u32 {
        let primitive = Primitive::Sphere {
            frame: Frame::at(DVec3::new(10.0 * i as f64, 0.0, 0.0)),
            radius: 1.0,
        };
        s.construct(Handle(i), &primitive, Some(Color::BLUE)).unwrap();
    }
    s.shell_mut().take_calls();

    let report = s.delete_all().unwrap();
    assert!(report.is_clean());
    assert_eq!(report.processed, 5);
    assert_eq!(s.registry().all().count(), 0);
    assert_eq!(s.shell().undisplay_count(), 5);
}

#[test]
fn test_bulk_delete_continues_past_shell_failure() {
    let mut s = session();
    for i in 0..3u32 {
        let primitive = box_primitive(1.0 + i as f64, 1.0, 1.0);
        s.construct(Handle(i), &primitive, None).unwrap();
    }
    s.shell_mut().fail_on(Handle(1));

    let report = s.delete_all().unwrap();
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].0, Handle(1));
    assert!(s.registry().is_empty());
    assert_eq!(s.shell().undisplay_count(), 2);
}

#[test]
fn test_uniqueness_and_round_trip() {
    let mut s = session();
    s.construct(Handle(7), &box_primitive(1.0, 1.0, 1.0), None)
        .unwrap();
    let again = s.construct(Handle(7), &box_primitive(2.0, 2.0, 2.0), None);
    assert!(matches!(again, Err(SessionError::DuplicateHandle(Handle(7)))));

    s.delete(Handle(7)).unwrap();
    assert!(s.construct(Handle(7), &box_primitive(2.0, 2.0, 2.0), None).is_ok());
}

#[test]
fn test_bounding_box_scale_invariance() {
    let shapes = |k: f64| {
        vec![
            Primitive::Sphere {
                frame: Frame::WORLD,
                radius: k,
            },
            Primitive::Cylinder {
                frame: Frame::WORLD,
                radius: 3.0 * k,
                height: 5.0 * k,
                angle: TAU,
            },
            Primitive::Torus {
                frame: Frame::WORLD,
                major_radius: 3.0 * k,
                minor_radius: k,
                angle: TAU,
            },
        ]
    };

    let mut s = session();
    let k = 7.5;
    let mut next = 0u32;
    for (small, large) in shapes(1.0).iter().zip(shapes(k).iter()) {
        s.construct(Handle(next), small, None).unwrap();
        s.construct(Handle(next + 1), large, None).unwrap();

        let a = s.bounding_box(Handle(next)).unwrap().extents();
        let b = s.bounding_box(Handle(next + 1)).unwrap().extents();
        assert_relative_eq!(b.x, a.x * k, max_relative = 1e-9);
        assert_relative_eq!(b.y, a.y * k, max_relative = 1e-9);
        assert_relative_eq!(b.z, a.z * k, max_relative = 1e-9);
        next += 2;
    }
}

#[test]
fn test_substitution_keeps_solid_kind() {
    let mut s = session();
    let solid = s
        .construct(Handle(0), &box_primitive(1.0, 1.0, 1.0), None)
        .unwrap();
    let faces = solid.explore(ShapeKind::Face);
    let replacement = faces[0].translated(DVec3::new(0.0, 0.0, -0.25));

    s.replace(Handle(0), &faces[0], &replacement).unwrap();
    let rebuilt = &s.get(Handle(0)).unwrap().geometry;
    assert_eq!(rebuilt.kind(), ShapeKind::Solid);

    let rebuilt_faces = rebuilt.explore(ShapeKind::Face);
    assert_eq!(rebuilt_faces.len(), 6);
    for face in &faces[1..] {
        assert!(rebuilt_faces.contains(face));
    }
}

#[test]
fn test_mismatched_substitution_is_invalid() {
    let mut s = session();
    let solid = s
        .construct(Handle(0), &box_primitive(1.0, 1.0, 1.0), None)
        .unwrap();
    let face = solid.explore(ShapeKind::Face)[2].clone();
    let intruder = Shape::vertex(DVec3::ZERO);

    let result = s.replace(Handle(0), &face, &intruder);
    assert!(matches!(result, Err(SessionError::InvalidResult(_))));
    assert_eq!(s.get(Handle(0)).unwrap().geometry, solid);
}

#[test]
fn test_selection_mode_exclusivity() {
    let mut s = session();
    s.construct(Handle(0), &box_primitive(3.0, 4.0, 5.0), None)
        .unwrap();

    s.enter_selection_mode(SelectionKind::Face).unwrap();
    assert!(matches!(
        s.select_all(SelectionKind::Edge),
        Err(SessionError::ModeMismatch {
            mode: SelectionMode::Face,
            ..
        })
    ));

    s.enter_selection_mode(SelectionKind::Edge).unwrap();
    assert_eq!(s.select_all(SelectionKind::Edge).unwrap(), 12);
    assert_eq!(s.select_all(SelectionKind::Edge).unwrap(), 0);
    assert_eq!(s.selection().selected_elements().count(), 12);
}

#[test]
fn test_delete_selected_ignores_elements() {
    let mut s = session();
    s.construct(Handle(0), &box_primitive(1.0, 1.0, 1.0), None)
        .unwrap();
    s.construct(Handle(1), &box_primitive(2.0, 1.0, 1.0), None)
        .unwrap();

    s.select_shape(Handle(1)).unwrap();
    s.enter_selection_mode(SelectionKind::Vertex).unwrap();
    s.select_all(SelectionKind::Vertex).unwrap();

    let report = s.delete_selected().unwrap();
    assert_eq!(report.processed, 1);
    assert_eq!(s.registry().handles(), vec![Handle(0)]);
    assert!(s.selection().snapshot().is_empty());
    assert_eq!(s.selection().mode(), SelectionMode::Vertex);
}

#[test]
fn test_deferred_redraw_once() {
    let mut s = session();
    s.construct(Handle(0), &box_primitive(1.0, 1.0, 1.0), None)
        .unwrap();
    assert_eq!(s.shell().redraw_count(), 0);
    s.on_layout_ready().unwrap();
    s.on_layout_ready().unwrap();
    assert_eq!(s.shell().redraw_count(), 1);
}

#[test]
fn test_session_over_custom_shell() {
    // Any shell implementation plugs in; this one only counts calls.
    #[derive(Default)]
    struct Counting {
        shown: usize,
    }
    impl PresentationShell for Counting {
        fn display(
            &mut self,
            _handle: Handle,
            _shape: &Shape,
            _color: Option<Color>,
            _transparency: f32,
        ) -> Result<(), solidview_session::ShellError> {
            self.shown += 1;
            Ok(())
        }
        fn undisplay(&mut self, _handle: Handle) -> Result<(), solidview_session::ShellError> {
            self.shown -= 1;
            Ok(())
        }
        fn notify_selection_changed(
            &mut self,
            _selection: &solidview_session::SelectionSnapshot,
        ) -> Result<(), solidview_session::ShellError> {
            Ok(())
        }
        fn request_redraw(&mut self) -> Result<(), solidview_session::ShellError> {
            Ok(())
        }
    }

    let mut s = Session::new(BRepKernel, Counting::default(), &SessionConfig::default());
    s.construct(Handle(0), &box_primitive(1.0, 1.0, 1.0), None)
        .unwrap();
    s.construct(Handle(1), &box_primitive(1.0, 2.0, 1.0), None)
        .unwrap();
    s.delete(Handle(0)).unwrap();
    assert_eq!(s.shell().shown, 1);
}
