//! Command dispatch.
//!
//! Translates [`ShellToCore`] messages into [`Session`] calls. The demo
//! primitives keep fixed slots so that re-issuing a command reports a
//! duplicate instead of piling up copies; overlays get the lowest free
//! handle from [`OVERLAY_HANDLE_START`] upward.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use glam::DVec3;
use kernel::{BooleanOp, Frame, GeometryKernel, Primitive, Shape};
use solidview_ipc::{
    AttributeCommand, BooleanCommand, Color, PrimitiveCommand, SelectionCommand, SelectionKind,
    ShellToCore,
};
use solidview_session::{
    BulkReport, Handle, HandleAllocator, PresentationShell, Session, SessionError, ShapeRecord,
};

/// First handle handed to bounding-box overlays.
pub const OVERLAY_HANDLE_START: u32 = 100;

/// Whether the event loop keeps reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Outcome of one command: loop control plus every error to show the user.
#[derive(Debug)]
pub struct Handled {
    pub flow: Flow,
    pub errors: Vec<SessionError>,
}

impl Handled {
    fn ok() -> Self {
        Self {
            flow: Flow::Continue,
            errors: Vec::new(),
        }
    }

    fn from_result<T>(result: Result<T, SessionError>) -> Self {
        let mut handled = Self::ok();
        if let Err(e) = result {
            handled.errors.push(e);
        }
        handled
    }

    fn from_errors(errors: Vec<SessionError>) -> Self {
        Self {
            flow: Flow::Continue,
            errors,
        }
    }

    fn from_report(report: BulkReport) -> Self {
        Self::from_errors(report.failures.into_iter().map(|(_, e)| e).collect())
    }
}

/// One result shape of a boolean demo.
struct BooleanResult {
    slot: u32,
    /// Evaluate `box op sphere` when true, `sphere op box` otherwise
    box_first: bool,
    offset: f64,
    color: Color,
}

/// Slots and placement of one boolean demo.
struct BooleanDemo {
    op: BooleanOp,
    y: f64,
    box_slot: u32,
    sphere_slot: u32,
    results: &'static [BooleanResult],
}

const CUT_DEMO: BooleanDemo = BooleanDemo {
    op: BooleanOp::Cut,
    y: 90.0,
    box_slot: 20,
    sphere_slot: 21,
    results: &[
        BooleanResult {
            slot: 22,
            box_first: true,
            offset: 8.0,
            color: Color::TAN,
        },
        BooleanResult {
            slot: 23,
            box_first: false,
            offset: 16.0,
            color: Color::SALMON,
        },
    ],
};

const FUSE_DEMO: BooleanDemo = BooleanDemo {
    op: BooleanOp::Fuse,
    y: 100.0,
    box_slot: 24,
    sphere_slot: 25,
    results: &[BooleanResult {
        slot: 26,
        box_first: true,
        offset: 8.0,
        color: Color::ROSY_BROWN,
    }],
};

const COMMON_DEMO: BooleanDemo = BooleanDemo {
    op: BooleanOp::Common,
    y: 110.0,
    box_slot: 27,
    sphere_slot: 28,
    results: &[BooleanResult {
        slot: 29,
        box_first: true,
        offset: 8.0,
        color: Color::ROYAL_BLUE,
    }],
};

/// Routes shell commands to a session.
#[derive(Debug)]
pub struct Dispatcher {
    overlays: HandleAllocator,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            overlays: HandleAllocator::starting_at(OVERLAY_HANDLE_START),
        }
    }

    pub fn handle<K, S>(&mut self, session: &mut Session<K, S>, command: ShellToCore) -> Handled
    where
        K: GeometryKernel,
        S: PresentationShell,
    {
        tracing::debug!("Handling {:?}", command);
        match command {
            ShellToCore::LayoutReady => Handled::from_result(session.on_layout_ready()),
            ShellToCore::Primitive(cmd) => Handled::from_errors(make_primitive(session, cmd)),
            ShellToCore::Boolean(cmd) => {
                let demo = match cmd {
                    BooleanCommand::Cut => &CUT_DEMO,
                    BooleanCommand::Fuse => &FUSE_DEMO,
                    BooleanCommand::Common => &COMMON_DEMO,
                };
                Handled::from_errors(run_boolean_demo(session, demo))
            }
            ShellToCore::Selection(cmd) => Handled::from_errors(select(session, cmd)),
            ShellToCore::Attribute(cmd) => Handled::from_result(set_attribute(session, cmd)),
            ShellToCore::DrawBoundingBoxes => {
                Handled::from_report(session.draw_bounding_boxes(&mut self.overlays))
            }
            ShellToCore::UnsetColorAll => Handled::from_report(session.unset_color_all()),
            ShellToCore::DeleteAll => match session.delete_all() {
                Ok(report) => Handled::from_report(report),
                Err(e) => Handled::from_errors(vec![e]),
            },
            ShellToCore::Delete { handle } => Handled::from_result(session.delete(handle.into())),
            ShellToCore::ModifyBox => Handled::from_result(modify_box(session)),
            ShellToCore::Quit => {
                tracing::info!("Quit requested");
                Handled {
                    flow: Flow::Quit,
                    errors: Vec::new(),
                }
            }
        }
    }
}

fn make_primitive<K, S>(session: &mut Session<K, S>, command: PrimitiveCommand) -> Vec<SessionError>
where
    K: GeometryKernel,
    S: PresentationShell,
{
    let at = |x: f64, y: f64| Frame::at(DVec3::new(x, y, 0.0));
    let items: Vec<(u32, Primitive, Color)> = match command {
        PrimitiveCommand::MakeBox => vec![(
            0,
            Primitive::Box {
                frame: Frame::WORLD,
                dx: 3.0,
                dy: 4.0,
                dz: 5.0,
            },
            Color::AZURE,
        )],
        PrimitiveCommand::MakeCone => vec![
            (
                1,
                Primitive::Cone {
                    frame: at(0.0, 10.0),
                    base_radius: 3.0,
                    top_radius: 1.5,
                    height: 5.0,
                },
                Color::BISQUE,
            ),
            (
                2,
                Primitive::Cone {
                    frame: at(8.0, 10.0),
                    base_radius: 3.0,
                    top_radius: 0.0,
                    height: 5.0,
                },
                Color::CHOCOLATE,
            ),
        ],
        PrimitiveCommand::MakeSphere => vec![(
            3,
            Primitive::Sphere {
                frame: at(0.0, 20.0),
                radius: 3.0,
            },
            Color::BLUE,
        )],
        PrimitiveCommand::MakeCylinder => vec![
            (
                4,
                Primitive::Cylinder {
                    frame: at(0.0, 30.0),
                    radius: 3.0,
                    height: 5.0,
                    angle: TAU,
                },
                Color::RED,
            ),
            (
                5,
                Primitive::Cylinder {
                    frame: at(8.0, 30.0),
                    radius: 3.0,
                    height: 5.0,
                    angle: PI * 1.5,
                },
                Color::TAN,
            ),
        ],
        PrimitiveCommand::MakeTorus => vec![
            (
                6,
                Primitive::Torus {
                    frame: at(0.0, 40.0),
                    major_radius: 3.0,
                    minor_radius: 1.0,
                    angle: TAU,
                },
                Color::YELLOW,
            ),
            (
                7,
                Primitive::Torus {
                    frame: at(8.0, 40.0),
                    major_radius: 3.0,
                    minor_radius: 1.0,
                    angle: FRAC_PI_2,
                },
                Color::THISTLE,
            ),
        ],
    };

    items
        .into_iter()
        .filter_map(|(slot, primitive, color)| {
            session
                .construct(Handle(slot), &primitive, Some(color))
                .err()
        })
        .collect()
}

/// Build a box and a sphere sharing one corner placement, display both,
/// then display each translated boolean result that the kernel produces.
/// The operands overlap, so results only appear with a kernel that evaluates
/// overlapping booleans; `BRepKernel` reports each one as an error.
fn run_boolean_demo<K, S>(session: &mut Session<K, S>, demo: &BooleanDemo) -> Vec<SessionError>
where
    K: GeometryKernel,
    S: PresentationShell,
{
    let frame = Frame::at(DVec3::new(0.0, demo.y, 0.0));
    let mut errors = Vec::new();

    let operands = session
        .construct(
            Handle(demo.box_slot),
            &Primitive::Box {
                frame,
                dx: 3.0,
                dy: 4.0,
                dz: 5.0,
            },
            Some(Color::SPRING_GREEN),
        )
        .and_then(|a| {
            session
                .construct(
                    Handle(demo.sphere_slot),
                    &Primitive::Sphere { frame, radius: 2.5 },
                    Some(Color::STEEL_BLUE),
                )
                .map(|b| (a, b))
        });
    let (box_shape, sphere) = match operands {
        Ok(shapes) => shapes,
        Err(e) => return vec![e],
    };

    for result in demo.results {
        let (a, b) = if result.box_first {
            (&box_shape, &sphere)
        } else {
            (&sphere, &box_shape)
        };
        if let Err(e) = register_boolean(session, demo.op, a, b, result) {
            tracing::warn!("{:?} demo result {} failed: {}", demo.op, result.slot, e);
            errors.push(e);
        }
    }
    errors
}

fn register_boolean<K, S>(
    session: &mut Session<K, S>,
    op: BooleanOp,
    a: &Shape,
    b: &Shape,
    result: &BooleanResult,
) -> Result<(), SessionError>
where
    K: GeometryKernel,
    S: PresentationShell,
{
    let shape = session.kernel().boolean(op, a, b)?;
    let moved = session
        .kernel()
        .translate(&shape, DVec3::new(result.offset, 0.0, 0.0));
    session.register(
        Handle(result.slot),
        ShapeRecord::new(moved).with_color(result.color),
    )
}

fn select<K, S>(session: &mut Session<K, S>, command: SelectionCommand) -> Vec<SessionError>
where
    K: GeometryKernel,
    S: PresentationShell,
{
    let single =
        |result: Result<(), SessionError>| -> Vec<SessionError> { result.err().into_iter().collect() };
    match command {
        SelectionCommand::EnterMode { kind } => single(session.enter_selection_mode(kind)),
        SelectionCommand::Exit => single(session.exit_selection_mode()),
        SelectionCommand::SelectAll { kind } => single(session.select_all(kind).map(|n| {
            tracing::info!("Selected {} {:?} elements", n, kind);
        })),
        SelectionCommand::SelectEdges => single(
            session
                .enter_selection_mode(SelectionKind::Edge)
                .and_then(|()| session.select_all(SelectionKind::Edge))
                .map(|n| tracing::info!("Selected {} edges", n)),
        ),
        SelectionCommand::Clear => single(session.clear_selection()),
        SelectionCommand::SelectShapes { handles } => handles
            .into_iter()
            .filter_map(|h| session.select_shape(h.into()).err())
            .collect(),
        SelectionCommand::DeselectShapes { handles } => handles
            .into_iter()
            .filter_map(|h| session.deselect_shape(h.into()).err())
            .collect(),
        SelectionCommand::DeleteSelected => match session.delete_selected() {
            Ok(report) => report.failures.into_iter().map(|(_, e)| e).collect(),
            Err(e) => vec![e],
        },
    }
}

fn set_attribute<K, S>(session: &mut Session<K, S>, command: AttributeCommand) -> Result<(), SessionError>
where
    K: GeometryKernel,
    S: PresentationShell,
{
    match command {
        AttributeCommand::SetColor { handle, color } => session.set_color(handle.into(), color),
        AttributeCommand::UnsetColor { handle } => session.unset_color(handle.into()),
        AttributeCommand::SetTransparency {
            handle,
            transparency,
        } => session.set_transparency(handle.into(), transparency),
        AttributeCommand::SetVisibility { handle, visible } => {
            session.set_visibility(handle.into(), visible)
        }
    }
}

/// Swap the box in slot 0 for a 5 x 2 x 2 box, keeping the slot.
fn modify_box<K, S>(session: &mut Session<K, S>) -> Result<(), SessionError>
where
    K: GeometryKernel,
    S: PresentationShell,
{
    let handle = Handle(0);
    let old = session.get(handle)?.geometry.clone();
    let new = session.kernel().construct(&Primitive::Box {
        frame: Frame::WORLD,
        dx: 5.0,
        dy: 2.0,
        dz: 2.0,
    })?;
    session.replace(handle, &old, &new)?;
    Ok(())
}
