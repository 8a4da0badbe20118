//! Primitive solid construction.
//!
//! Every primitive comes out as `Solid -> Shell -> Faces`, with edges and
//! vertices shared between the faces they bound.

use std::collections::HashMap;
use std::f64::consts::{FRAC_PI_2, TAU};

use glam::DVec3;

use crate::geometry::{Curve, Domain, Frame, Surface, is_full_turn};
use crate::shape::Shape;
use crate::types::KernelError;

/// Parameters for a primitive solid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    /// Box with one corner at `frame.origin`, spanning the frame's axes.
    Box {
        frame: Frame,
        dx: f64,
        dy: f64,
        dz: f64,
    },
    /// World-aligned box between two opposite corners.
    BoxFromCorners { min: DVec3, max: DVec3 },
    /// Cylinder along `frame.z`; an `angle` below a full turn gives a pie.
    Cylinder {
        frame: Frame,
        radius: f64,
        height: f64,
        angle: f64,
    },
    /// Cone frustum along `frame.z`; a zero radius gives an apex.
    Cone {
        frame: Frame,
        base_radius: f64,
        top_radius: f64,
        height: f64,
    },
    Sphere { frame: Frame, radius: f64 },
    /// Torus around `frame.z`; an `angle` below a full turn gives an elbow.
    Torus {
        frame: Frame,
        major_radius: f64,
        minor_radius: f64,
        angle: f64,
    },
}

impl Primitive {
    pub fn name(&self) -> &'static str {
        match self {
            Primitive::Box { .. } | Primitive::BoxFromCorners { .. } => "box",
            Primitive::Cylinder { .. } => "cylinder",
            Primitive::Cone { .. } => "cone",
            Primitive::Sphere { .. } => "sphere",
            Primitive::Torus { .. } => "torus",
        }
    }
}

/// Build the solid described by `primitive`.
pub fn build(primitive: &Primitive) -> Result<Shape, KernelError> {
    match *primitive {
        Primitive::Box { frame, dx, dy, dz } => {
            positive("box dx", dx)?;
            positive("box dy", dy)?;
            positive("box dz", dz)?;
            Ok(make_box(&frame, dx, dy, dz))
        }
        Primitive::BoxFromCorners { min, max } => {
            if !min.is_finite() || !max.is_finite() {
                return Err(KernelError::Construction(
                    "box corners must be finite".to_string(),
                ));
            }
            let lo = min.min(max);
            let size = max.max(min) - lo;
            positive("box dx", size.x)?;
            positive("box dy", size.y)?;
            positive("box dz", size.z)?;
            Ok(make_box(&Frame::at(lo), size.x, size.y, size.z))
        }
        Primitive::Cylinder {
            frame,
            radius,
            height,
            angle,
        } => {
            positive("cylinder radius", radius)?;
            positive("cylinder height", height)?;
            sweep_angle("cylinder angle", angle)?;
            if is_full_turn(angle) {
                Ok(make_revolution(&frame, radius, radius, height))
            } else {
                Ok(make_pie(&frame, radius, height, angle))
            }
        }
        Primitive::Cone {
            frame,
            base_radius,
            top_radius,
            height,
        } => {
            non_negative("cone base radius", base_radius)?;
            non_negative("cone top radius", top_radius)?;
            positive("cone height", height)?;
            if (base_radius - top_radius).abs() <= f64::EPSILON * base_radius.max(top_radius) {
                return Err(KernelError::Construction(format!(
                    "cone radii must differ, got {} and {}",
                    base_radius, top_radius
                )));
            }
            Ok(make_revolution(&frame, base_radius, top_radius, height))
        }
        Primitive::Sphere { frame, radius } => {
            positive("sphere radius", radius)?;
            Ok(make_sphere(&frame, radius))
        }
        Primitive::Torus {
            frame,
            major_radius,
            minor_radius,
            angle,
        } => {
            positive("torus major radius", major_radius)?;
            positive("torus minor radius", minor_radius)?;
            sweep_angle("torus angle", angle)?;
            if minor_radius >= major_radius {
                return Err(KernelError::Construction(format!(
                    "torus minor radius {} must be below major radius {}",
                    minor_radius, major_radius
                )));
            }
            Ok(make_torus(&frame, major_radius, minor_radius, angle))
        }
    }
}

fn positive(what: &str, value: f64) -> Result<(), KernelError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(KernelError::Construction(format!(
            "{} must be positive, got {}",
            what, value
        )))
    }
}

fn non_negative(what: &str, value: f64) -> Result<(), KernelError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(KernelError::Construction(format!(
            "{} must not be negative, got {}",
            what, value
        )))
    }
}

fn sweep_angle(what: &str, angle: f64) -> Result<(), KernelError> {
    if angle.is_finite() && angle > 0.0 && (angle <= TAU || is_full_turn(angle)) {
        Ok(())
    } else {
        Err(KernelError::Construction(format!(
            "{} must lie in (0, 2pi], got {}",
            what, angle
        )))
    }
}

fn line(a: &Shape, b: &Shape) -> Shape {
    let (start, end) = (point_of(a), point_of(b));
    Shape::edge(Curve::Line { start, end }, a, b)
}

fn point_of(vertex: &Shape) -> DVec3 {
    vertex.point().unwrap_or_default()
}

fn arc(frame: Frame, radius: f64, start_angle: f64, end_angle: f64, a: &Shape, b: &Shape) -> Shape {
    Shape::edge(
        Curve::Circle {
            frame,
            radius,
            start_angle,
            end_angle,
        },
        a,
        b,
    )
}

fn full_circle(frame: Frame, radius: f64) -> (Shape, Shape) {
    let vertex = Shape::vertex(frame.polar(radius, 0.0));
    let edge = arc(frame, radius, 0.0, TAU, &vertex, &vertex);
    (vertex, edge)
}

fn plane_face(origin: DVec3, u_axis: DVec3, v_axis: DVec3, edges: Vec<Shape>) -> Shape {
    Shape::face(
        Surface::Plane {
            origin,
            u_axis,
            v_axis,
        },
        Domain::new(0.0, 1.0, 0.0, 1.0),
        Shape::wire(edges),
    )
}

fn solid(faces: Vec<Shape>) -> Shape {
    Shape::solid(Shape::shell(faces))
}

// Corner i sits at (i & 1, (i >> 1) & 1, (i >> 2) & 1) in box units.
const BOX_FACES: [[usize; 4]; 6] = [
    [0, 1, 3, 2],
    [4, 5, 7, 6],
    [0, 1, 5, 4],
    [2, 3, 7, 6],
    [0, 2, 6, 4],
    [1, 3, 7, 5],
];

fn make_box(frame: &Frame, dx: f64, dy: f64, dz: f64) -> Shape {
    let corners: Vec<DVec3> = (0..8)
        .map(|i| {
            frame.origin
                + frame.x * dx * (i & 1) as f64
                + frame.y * dy * ((i >> 1) & 1) as f64
                + frame.z * dz * ((i >> 2) & 1) as f64
        })
        .collect();
    let vertices: Vec<Shape> = corners.iter().map(|p| Shape::vertex(*p)).collect();

    let mut edges = HashMap::new();
    for i in 0..8usize {
        for bit in [1usize, 2, 4] {
            if i & bit == 0 {
                edges.insert((i, i | bit), line(&vertices[i], &vertices[i | bit]));
            }
        }
    }
    let edge_between = |a: usize, b: usize| edges[&(a.min(b), a.max(b))].clone();

    let faces = BOX_FACES
        .iter()
        .map(|quad| {
            let loop_edges = (0..4)
                .map(|k| edge_between(quad[k], quad[(k + 1) % 4]))
                .collect();
            plane_face(
                corners[quad[0]],
                corners[quad[1]] - corners[quad[0]],
                corners[quad[3]] - corners[quad[0]],
                loop_edges,
            )
        })
        .collect();
    solid(faces)
}

/// Full cylinder or cone frustum.
fn make_revolution(frame: &Frame, base_radius: f64, top_radius: f64, height: f64) -> Shape {
    let top_frame = frame.raised(height);
    let (bottom_vertex, bottom) = full_circle(*frame, base_radius);
    let (top_vertex, top) = full_circle(top_frame, top_radius);
    let seam = line(&bottom_vertex, &top_vertex);

    let surface = if base_radius == top_radius {
        Surface::Cylinder {
            frame: *frame,
            radius: base_radius,
        }
    } else {
        Surface::Cone {
            frame: *frame,
            base_radius,
            top_radius,
            height,
        }
    };
    let lateral = Shape::face(
        surface,
        Domain::new(0.0, TAU, 0.0, height),
        Shape::wire(vec![bottom.clone(), seam.clone(), top.clone(), seam]),
    );

    let mut faces = vec![lateral];
    for (cap_frame, radius, rim) in [(*frame, base_radius, bottom), (top_frame, top_radius, top)] {
        if radius > 0.0 {
            faces.push(Shape::face(
                Surface::Disc { frame: cap_frame },
                Domain::new(0.0, TAU, 0.0, radius),
                Shape::wire(vec![rim]),
            ));
        }
    }
    solid(faces)
}

/// Cylinder sector closed by two planar sides.
fn make_pie(frame: &Frame, radius: f64, height: f64, angle: f64) -> Shape {
    let top_frame = frame.raised(height);
    let axis_bottom = Shape::vertex(frame.origin);
    let axis_top = Shape::vertex(top_frame.origin);
    let b0 = Shape::vertex(frame.polar(radius, 0.0));
    let b1 = Shape::vertex(frame.polar(radius, angle));
    let t0 = Shape::vertex(top_frame.polar(radius, 0.0));
    let t1 = Shape::vertex(top_frame.polar(radius, angle));

    let bottom_arc = arc(*frame, radius, 0.0, angle, &b0, &b1);
    let top_arc = arc(top_frame, radius, 0.0, angle, &t0, &t1);
    let seam0 = line(&b0, &t0);
    let seam1 = line(&b1, &t1);
    let axis = line(&axis_bottom, &axis_top);
    let rb0 = line(&axis_bottom, &b0);
    let rb1 = line(&axis_bottom, &b1);
    let rt0 = line(&axis_top, &t0);
    let rt1 = line(&axis_top, &t1);

    let lateral = Shape::face(
        Surface::Cylinder {
            frame: *frame,
            radius,
        },
        Domain::new(0.0, angle, 0.0, height),
        Shape::wire(vec![bottom_arc.clone(), seam1.clone(), top_arc.clone(), seam0.clone()]),
    );
    let sector = |cap_frame: Frame, edges: Vec<Shape>| {
        Shape::face(
            Surface::Disc { frame: cap_frame },
            Domain::new(0.0, angle, 0.0, radius),
            Shape::wire(edges),
        )
    };
    let bottom_face = sector(*frame, vec![rb0.clone(), bottom_arc, rb1.clone()]);
    let top_face = sector(top_frame, vec![rt0.clone(), top_arc, rt1.clone()]);
    let side0 = plane_face(
        frame.origin,
        frame.direction(0.0) * radius,
        frame.z * height,
        vec![rb0, seam0, rt0, axis.clone()],
    );
    let side1 = plane_face(
        frame.origin,
        frame.direction(angle) * radius,
        frame.z * height,
        vec![rb1, seam1, rt1, axis],
    );
    solid(vec![lateral, bottom_face, top_face, side0, side1])
}

fn make_sphere(frame: &Frame, radius: f64) -> Shape {
    let south = Shape::vertex(frame.origin - frame.z * radius);
    let north = Shape::vertex(frame.origin + frame.z * radius);
    let meridian = Frame::from_axes(frame.origin, frame.x, frame.z);
    let seam = arc(meridian, radius, -FRAC_PI_2, FRAC_PI_2, &south, &north);
    let south_pole = arc(frame.raised(-radius), 0.0, 0.0, TAU, &south, &south);
    let north_pole = arc(frame.raised(radius), 0.0, 0.0, TAU, &north, &north);

    let face = Shape::face(
        Surface::Sphere {
            frame: *frame,
            radius,
        },
        Domain::new(0.0, TAU, -FRAC_PI_2, FRAC_PI_2),
        Shape::wire(vec![south_pole, seam.clone(), north_pole, seam]),
    );
    solid(vec![face])
}

/// Frame of the tube cross-section at ring angle `u`.
fn tube_frame(frame: &Frame, major_radius: f64, u: f64) -> Frame {
    Frame::from_axes(frame.polar(major_radius, u), frame.direction(u), frame.z)
}

fn make_torus(frame: &Frame, major_radius: f64, minor_radius: f64, angle: f64) -> Shape {
    let outer = major_radius + minor_radius;
    let surface = Surface::Torus {
        frame: *frame,
        major_radius,
        minor_radius,
    };
    let domain = Domain::new(0.0, angle, 0.0, TAU);

    if is_full_turn(angle) {
        let (vertex, ring) = full_circle(*frame, outer);
        let tube = arc(
            tube_frame(frame, major_radius, 0.0),
            minor_radius,
            0.0,
            TAU,
            &vertex,
            &vertex,
        );
        let face = Shape::face(
            surface,
            domain,
            Shape::wire(vec![ring.clone(), tube.clone(), ring, tube]),
        );
        return solid(vec![face]);
    }

    let start_frame = tube_frame(frame, major_radius, 0.0);
    let end_frame = tube_frame(frame, major_radius, angle);
    let (p0, tube0) = full_circle(start_frame, minor_radius);
    let (p1, tube1) = full_circle(end_frame, minor_radius);
    let ring = arc(*frame, outer, 0.0, angle, &p0, &p1);

    let lateral = Shape::face(
        surface,
        domain,
        Shape::wire(vec![tube0.clone(), ring.clone(), tube1.clone(), ring]),
    );
    let cap = |cap_frame: Frame, rim: Shape| {
        Shape::face(
            Surface::Disc { frame: cap_frame },
            Domain::new(0.0, TAU, 0.0, minor_radius),
            Shape::wire(vec![rim]),
        )
    };
    solid(vec![lateral, cap(start_frame, tube0), cap(end_frame, tube1)])
}
