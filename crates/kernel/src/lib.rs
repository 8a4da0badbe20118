//! Geometry kernel for solidview
//!
//! This crate defines the [`GeometryKernel`] seam the session core talks to,
//! together with [`BRepKernel`], an analytic boundary-representation kernel:
//! - Immutable, shared [`Shape`] graphs (vertex, edge, wire, face, shell,
//!   solid, compound)
//! - Primitive solids (box, cylinder, cone, sphere, torus)
//! - Coarse bounding boxes and deflection-driven tessellation
//! - Sub-shape substitution with validity checks

pub mod bounds;
pub mod geometry;
pub mod kernel;
pub mod primitives;
pub mod reshape;
pub mod shape;
pub mod tessellation;
pub mod types;
pub mod validation;

pub use bounds::BoundingBox;
pub use geometry::{Curve, Domain, Frame, Surface};
pub use kernel::{BRepKernel, GeometryKernel, coarse_bounds};
pub use primitives::Primitive;
pub use reshape::ReShape;
pub use shape::{Shape, ShapeData};
pub use tessellation::Mesh;
pub use types::{BooleanOp, KernelError, ShapeId, ShapeKind};
pub use validation::validate;
