//! Analytic curves and surfaces carried by edges and faces.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use glam::DVec3;

use crate::bounds::BoundingBox;

/// Upper bound on segments along any single parameter direction.
pub const MAX_SEGMENTS: usize = 2048;

/// Right-handed placement: an origin and three orthonormal axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub origin: DVec3,
    pub x: DVec3,
    pub y: DVec3,
    pub z: DVec3,
}

impl Default for Frame {
    fn default() -> Self {
        Self::WORLD
    }
}

impl Frame {
    pub const WORLD: Frame = Frame {
        origin: DVec3::ZERO,
        x: DVec3::X,
        y: DVec3::Y,
        z: DVec3::Z,
    };

    /// World-aligned frame at `origin`.
    pub fn at(origin: DVec3) -> Self {
        Self {
            origin,
            ..Self::WORLD
        }
    }

    /// Frame whose x axis is `x` and whose xy plane contains `y`.
    pub fn from_axes(origin: DVec3, x: DVec3, y: DVec3) -> Self {
        let x = x.normalize();
        let z = x.cross(y).normalize();
        let y = z.cross(x);
        Self { origin, x, y, z }
    }

    /// Unit direction at `angle` in the frame's xy plane.
    pub fn direction(&self, angle: f64) -> DVec3 {
        self.x * angle.cos() + self.y * angle.sin()
    }

    pub fn polar(&self, radius: f64, angle: f64) -> DVec3 {
        self.origin + self.direction(angle) * radius
    }

    pub fn translated(&self, offset: DVec3) -> Self {
        Self {
            origin: self.origin + offset,
            ..*self
        }
    }

    /// Same axes, origin moved `distance` along z.
    pub fn raised(&self, distance: f64) -> Self {
        self.translated(self.z * distance)
    }
}

/// Rectangular parameter range of a face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    pub u: (f64, f64),
    pub v: (f64, f64),
}

impl Domain {
    pub fn new(u0: f64, u1: f64, v0: f64, v1: f64) -> Self {
        Self {
            u: (u0, u1),
            v: (v0, v1),
        }
    }

    pub fn u_span(&self) -> f64 {
        self.u.1 - self.u.0
    }

    pub fn v_span(&self) -> f64 {
        self.v.1 - self.v.0
    }

    pub fn u_at(&self, t: f64) -> f64 {
        self.u.0 + self.u_span() * t
    }

    pub fn v_at(&self, t: f64) -> f64 {
        self.v.0 + self.v_span() * t
    }
}

/// Edge geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Curve {
    Line {
        start: DVec3,
        end: DVec3,
    },
    /// Arc of the circle centred on `frame.origin` in the frame's xy plane
    Circle {
        frame: Frame,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    },
}

impl Curve {
    /// Point at normalized parameter `t` in [0, 1].
    pub fn point_at(&self, t: f64) -> DVec3 {
        match *self {
            Curve::Line { start, end } => start.lerp(end, t),
            Curve::Circle {
                frame,
                radius,
                start_angle,
                end_angle,
            } => frame.polar(radius, start_angle + (end_angle - start_angle) * t),
        }
    }

    /// Box of the underlying geometry. Arcs report their full circle.
    pub fn coarse_bounds(&self) -> BoundingBox {
        match *self {
            Curve::Line { start, end } => BoundingBox::from_points([start, end]),
            Curve::Circle { frame, radius, .. } => circle_bounds(&frame, radius),
        }
    }

    /// Segments needed to keep chord sag within `deflection`.
    pub fn segments(&self, deflection: f64) -> usize {
        match *self {
            Curve::Line { .. } => 1,
            Curve::Circle {
                radius,
                start_angle,
                end_angle,
                ..
            } => angular_segments(radius, end_angle - start_angle, deflection),
        }
    }

    pub fn translated(&self, offset: DVec3) -> Self {
        match *self {
            Curve::Line { start, end } => Curve::Line {
                start: start + offset,
                end: end + offset,
            },
            Curve::Circle {
                frame,
                radius,
                start_angle,
                end_angle,
            } => Curve::Circle {
                frame: frame.translated(offset),
                radius,
                start_angle,
                end_angle,
            },
        }
    }
}

/// Face geometry. Each variant fixes how `(u, v)` maps to space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Surface {
    /// `origin + u * u_axis + v * v_axis`
    Plane {
        origin: DVec3,
        u_axis: DVec3,
        v_axis: DVec3,
    },
    /// Planar polar patch: u is the angle, v the radius
    Disc { frame: Frame },
    /// u is the angle, v the height along `frame.z`
    Cylinder { frame: Frame, radius: f64 },
    /// Radius varies linearly from `base_radius` at v = 0 to `top_radius` at v = `height`
    Cone {
        frame: Frame,
        base_radius: f64,
        top_radius: f64,
        height: f64,
    },
    /// u is the longitude, v the latitude in [-pi/2, pi/2]
    Sphere { frame: Frame, radius: f64 },
    /// u runs around `frame.z`, v around the tube
    Torus {
        frame: Frame,
        major_radius: f64,
        minor_radius: f64,
    },
}

impl Surface {
    pub fn point(&self, u: f64, v: f64) -> DVec3 {
        match *self {
            Surface::Plane {
                origin,
                u_axis,
                v_axis,
            } => origin + u_axis * u + v_axis * v,
            Surface::Disc { frame } => frame.polar(v, u),
            Surface::Cylinder { frame, radius } => frame.polar(radius, u) + frame.z * v,
            Surface::Cone { frame, .. } => {
                frame.polar(self.cone_radius_at(v), u) + frame.z * v
            }
            Surface::Sphere { frame, radius } => {
                frame.origin + (frame.direction(u) * v.cos() + frame.z * v.sin()) * radius
            }
            Surface::Torus {
                frame,
                major_radius,
                minor_radius,
            } => {
                frame.origin
                    + frame.direction(u) * (major_radius + minor_radius * v.cos())
                    + frame.z * (minor_radius * v.sin())
            }
        }
    }

    fn cone_radius_at(&self, v: f64) -> f64 {
        match *self {
            Surface::Cone {
                base_radius,
                top_radius,
                height,
                ..
            } => base_radius + (top_radius - base_radius) * (v / height),
            _ => 0.0,
        }
    }

    /// Box of the untrimmed surface over `domain`; revolved surfaces report
    /// their full revolution.
    pub fn coarse_bounds(&self, domain: &Domain) -> BoundingBox {
        match *self {
            Surface::Plane { .. } => BoundingBox::from_points([
                self.point(domain.u.0, domain.v.0),
                self.point(domain.u.1, domain.v.0),
                self.point(domain.u.1, domain.v.1),
                self.point(domain.u.0, domain.v.1),
            ]),
            Surface::Disc { frame } => {
                let radius = domain.v.0.abs().max(domain.v.1.abs());
                let mut b = circle_bounds(&frame, radius);
                b.add_point(frame.origin);
                b
            }
            Surface::Cylinder { frame, radius } => {
                let mut b = circle_bounds(&frame.raised(domain.v.0), radius);
                b.union(&circle_bounds(&frame.raised(domain.v.1), radius));
                b
            }
            Surface::Cone { frame, .. } => {
                let mut b =
                    circle_bounds(&frame.raised(domain.v.0), self.cone_radius_at(domain.v.0));
                b.union(&circle_bounds(
                    &frame.raised(domain.v.1),
                    self.cone_radius_at(domain.v.1),
                ));
                b
            }
            Surface::Sphere { frame, radius } => BoundingBox::new(
                frame.origin - DVec3::splat(radius),
                frame.origin + DVec3::splat(radius),
            ),
            Surface::Torus {
                frame,
                major_radius,
                minor_radius,
            } => {
                let outer = major_radius + minor_radius;
                let mut b = circle_bounds(&frame.raised(-minor_radius), outer);
                b.union(&circle_bounds(&frame.raised(minor_radius), outer));
                b
            }
        }
    }

    /// Grid resolution `(nu, nv)` keeping chord sag within `deflection`.
    pub fn resolution(&self, domain: &Domain, deflection: f64) -> (usize, usize) {
        let du = domain.u_span();
        let dv = domain.v_span();
        match *self {
            Surface::Plane { .. } => (1, 1),
            Surface::Disc { .. } => {
                let radius = domain.v.0.abs().max(domain.v.1.abs());
                (angular_segments(radius, du, deflection), 1)
            }
            Surface::Cylinder { radius, .. } => (angular_segments(radius, du, deflection), 1),
            Surface::Cone { .. } => {
                let radius = self
                    .cone_radius_at(domain.v.0)
                    .abs()
                    .max(self.cone_radius_at(domain.v.1).abs());
                (angular_segments(radius, du, deflection), 1)
            }
            Surface::Sphere { radius, .. } => (
                angular_segments(radius, du, deflection),
                angular_segments(radius, dv, deflection),
            ),
            Surface::Torus {
                major_radius,
                minor_radius,
                ..
            } => (
                angular_segments(major_radius + minor_radius, du, deflection),
                angular_segments(minor_radius, dv, deflection),
            ),
        }
    }

    pub fn translated(&self, offset: DVec3) -> Self {
        match *self {
            Surface::Plane {
                origin,
                u_axis,
                v_axis,
            } => Surface::Plane {
                origin: origin + offset,
                u_axis,
                v_axis,
            },
            Surface::Disc { frame } => Surface::Disc {
                frame: frame.translated(offset),
            },
            Surface::Cylinder { frame, radius } => Surface::Cylinder {
                frame: frame.translated(offset),
                radius,
            },
            Surface::Cone {
                frame,
                base_radius,
                top_radius,
                height,
            } => Surface::Cone {
                frame: frame.translated(offset),
                base_radius,
                top_radius,
                height,
            },
            Surface::Sphere { frame, radius } => Surface::Sphere {
                frame: frame.translated(offset),
                radius,
            },
            Surface::Torus {
                frame,
                major_radius,
                minor_radius,
            } => Surface::Torus {
                frame: frame.translated(offset),
                major_radius,
                minor_radius,
            },
        }
    }
}

/// Exact box of a full circle of `radius` in the frame's xy plane.
pub fn circle_bounds(frame: &Frame, radius: f64) -> BoundingBox {
    let n = frame.z;
    let half = DVec3::new(
        (1.0 - n.x * n.x).max(0.0).sqrt(),
        (1.0 - n.y * n.y).max(0.0).sqrt(),
        (1.0 - n.z * n.z).max(0.0).sqrt(),
    ) * radius.abs();
    BoundingBox::new(frame.origin - half, frame.origin + half)
}

/// Segments for an arc of `span` radians on a circle of `radius` such that
/// the chord sag `r * (1 - cos(step / 2))` stays within `deflection`.
pub fn angular_segments(radius: f64, span: f64, deflection: f64) -> usize {
    let span = span.abs();
    if radius <= 0.0 || span == 0.0 || !deflection.is_finite() || deflection <= 0.0 {
        return 1;
    }
    let step = if deflection < radius {
        2.0 * (1.0 - deflection / radius).acos()
    } else {
        PI
    };
    // Never coarser than a quarter turn.
    let step = step.min(FRAC_PI_2);
    ((span / step).ceil() as usize).clamp(1, MAX_SEGMENTS)
}

/// True when `angle` describes a full turn.
pub fn is_full_turn(angle: f64) -> bool {
    (angle - TAU).abs() <= 1e-9
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_frame_polar() {
        let frame = Frame::at(DVec3::new(1.0, 2.0, 3.0));
        let p = frame.polar(2.0, FRAC_PI_2);
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 4.0, epsilon = 1e-12);
        assert_relative_eq!(p.z, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_from_axes_is_orthonormal() {
        let frame = Frame::from_axes(DVec3::ZERO, DVec3::new(2.0, 0.0, 0.0), DVec3::Z);
        assert_relative_eq!(frame.z.y, -1.0, epsilon = 1e-12);
        assert_relative_eq!(frame.x.dot(frame.y), 0.0, epsilon = 1e-12);
        assert_relative_eq!(frame.y.length(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_circle_bounds_tilted() {
        let frame = Frame::WORLD;
        let b = circle_bounds(&frame, 3.0);
        assert_relative_eq!(b.min.x, -3.0);
        assert_relative_eq!(b.max.y, 3.0);
        assert_relative_eq!(b.extents().z, 0.0);
    }

    #[test]
    fn test_angular_segments() {
        // Tolerance equal to the radius still yields at least a quarter-turn step.
        assert_eq!(angular_segments(1.0, TAU, 10.0), 4);
        // Tighter tolerance means more segments.
        let coarse = angular_segments(1.0, TAU, 0.1);
        let fine = angular_segments(1.0, TAU, 0.001);
        assert!(fine > coarse);
        // Scale invariant when tolerance scales with radius.
        assert_eq!(angular_segments(1.0, TAU, 0.01), angular_segments(10.0, TAU, 0.1));
    }

    #[test]
    fn test_sphere_poles() {
        let s = Surface::Sphere {
            frame: Frame::WORLD,
            radius: 2.0,
        };
        let north = s.point(0.0, FRAC_PI_2);
        assert_relative_eq!(north.z, 2.0, epsilon = 1e-12);
        assert_relative_eq!(north.x, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cone_radius_interpolates() {
        let s = Surface::Cone {
            frame: Frame::WORLD,
            base_radius: 3.0,
            top_radius: 1.0,
            height: 4.0,
        };
        let mid = s.point(0.0, 2.0);
        assert_relative_eq!(mid.x, 2.0, epsilon = 1e-12);
        assert_relative_eq!(mid.z, 2.0, epsilon = 1e-12);
    }
}
