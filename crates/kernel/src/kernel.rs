//! The geometry kernel seam and its reference implementation.

use glam::DVec3;

use crate::bounds::BoundingBox;
use crate::primitives::{self, Primitive};
use crate::reshape;
use crate::shape::{Shape, ShapeData};
use crate::tessellation::{self, Mesh};
use crate::types::{BooleanOp, KernelError, ShapeKind};

/// Operations the session core needs from a solid-modeling kernel.
///
/// Shapes are immutable values; every operation returns a new shape and
/// leaves its inputs untouched.
pub trait GeometryKernel {
    /// Build a primitive solid.
    fn construct(&self, primitive: &Primitive) -> Result<Shape, KernelError>;

    /// Evaluate `a op b`.
    fn boolean(&self, op: BooleanOp, a: &Shape, b: &Shape) -> Result<Shape, KernelError>;

    /// Copy of `shape` moved by `offset`.
    fn translate(&self, shape: &Shape, offset: DVec3) -> Shape;

    /// Unique sub-shapes of `kind`, in exploration order.
    fn decompose(&self, shape: &Shape, kind: ShapeKind) -> Vec<Shape>;

    /// Boundary mesh within `deflection` of the exact geometry.
    fn tessellate(&self, shape: &Shape, deflection: f64) -> Result<Mesh, KernelError>;

    /// Coarse box from untessellated geometry; `None` when the shape is void.
    fn bounding_box(&self, shape: &Shape) -> Option<BoundingBox>;

    /// Rebuild `shape` with `old` replaced by `new`.
    fn substitute(&self, shape: &Shape, old: &Shape, new: &Shape) -> Result<Shape, KernelError>;
}

/// Reference analytic B-Rep kernel.
///
/// Primitives, translation, tessellation and substitution are exact.
/// Booleans are only evaluated for operands whose boxes are disjoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct BRepKernel;

impl BRepKernel {
    pub fn new() -> Self {
        Self
    }
}

impl GeometryKernel for BRepKernel {
    fn construct(&self, primitive: &Primitive) -> Result<Shape, KernelError> {
        let shape = primitives::build(primitive)?;
        tracing::debug!("Constructed {} as {:?}", primitive.name(), shape);
        Ok(shape)
    }

    fn boolean(&self, op: BooleanOp, a: &Shape, b: &Shape) -> Result<Shape, KernelError> {
        let box_a = coarse_bounds(a);
        let box_b = coarse_bounds(b);
        if box_a.is_void() || box_b.is_void() {
            return Err(KernelError::Construction(format!(
                "{:?} needs two non-empty operands",
                op
            )));
        }
        if box_a.intersects(&box_b) {
            return Err(KernelError::Construction(format!(
                "{:?} of overlapping operands is not supported by the analytic kernel",
                op
            )));
        }

        let result = match op {
            BooleanOp::Cut => a.translated(DVec3::ZERO),
            BooleanOp::Fuse => Shape::compound(vec![
                a.translated(DVec3::ZERO),
                b.translated(DVec3::ZERO),
            ]),
            BooleanOp::Common => {
                return Err(KernelError::Construction(
                    "common of disjoint operands is empty".to_string(),
                ));
            }
        };
        tracing::debug!("{:?}({:?}, {:?}) = {:?}", op, a, b, result);
        Ok(result)
    }

    fn translate(&self, shape: &Shape, offset: DVec3) -> Shape {
        shape.translated(offset)
    }

    fn decompose(&self, shape: &Shape, kind: ShapeKind) -> Vec<Shape> {
        shape.explore(kind)
    }

    fn tessellate(&self, shape: &Shape, deflection: f64) -> Result<Mesh, KernelError> {
        tessellation::tessellate(shape, deflection)
    }

    fn bounding_box(&self, shape: &Shape) -> Option<BoundingBox> {
        let bounds = coarse_bounds(shape);
        (!bounds.is_void()).then_some(bounds)
    }

    fn substitute(&self, shape: &Shape, old: &Shape, new: &Shape) -> Result<Shape, KernelError> {
        let result = reshape::substitute(shape, old, new)?;
        tracing::debug!("Substituted {:?} with {:?} in {:?}", old, new, shape);
        Ok(result)
    }
}

/// Box of every face surface, edge curve and vertex reachable from `shape`.
pub fn coarse_bounds(shape: &Shape) -> BoundingBox {
    let mut bounds = BoundingBox::void();
    for face in shape.explore(ShapeKind::Face) {
        if let ShapeData::Face { surface, domain } = face.data() {
            bounds.union(&surface.coarse_bounds(domain));
        }
    }
    for edge in shape.explore(ShapeKind::Edge) {
        if let ShapeData::Edge(curve) = edge.data() {
            bounds.union(&curve.coarse_bounds());
        }
    }
    for vertex in shape.explore(ShapeKind::Vertex) {
        if let Some(p) = vertex.point() {
            bounds.add_point(p);
        }
    }
    bounds
}
