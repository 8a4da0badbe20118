//! Structural validity checks for shape graphs.

use std::collections::HashSet;

use crate::shape::{Shape, ShapeData};
use crate::types::{KernelError, ShapeId};

/// Distance under which two points are considered coincident.
pub const POINT_TOLERANCE: f64 = 1e-7;

/// Check every node reachable from `shape`.
///
/// Rules:
/// - each child is of a kind its parent accepts
/// - an edge has one (closed) or two vertices, matching its curve ends
/// - wires, faces, shells and solids are not empty
/// - consecutive edges of a wire share a vertex
pub fn validate(shape: &Shape) -> Result<(), KernelError> {
    let mut visited = HashSet::new();
    validate_node(shape, &mut visited)
}

fn validate_node(shape: &Shape, visited: &mut HashSet<ShapeId>) -> Result<(), KernelError> {
    if !visited.insert(shape.id()) {
        return Ok(());
    }

    let kind = shape.kind();
    for child in shape.children() {
        if !kind.accepts_child(child.kind()) {
            return Err(KernelError::InvalidResult(format!(
                "{} {} cannot contain {} {}",
                kind,
                shape.id(),
                child.kind(),
                child.id()
            )));
        }
    }

    match shape.data() {
        ShapeData::Vertex(p) => {
            if !p.is_finite() {
                return Err(KernelError::InvalidResult(format!(
                    "vertex {} has a non-finite position",
                    shape.id()
                )));
            }
        }
        ShapeData::Edge(curve) => {
            let vertices = shape.children();
            if vertices.is_empty() || vertices.len() > 2 {
                return Err(KernelError::InvalidResult(format!(
                    "edge {} has {} vertices",
                    shape.id(),
                    vertices.len()
                )));
            }
            let ends = [curve.point_at(0.0), curve.point_at(1.0)];
            let first = vertices[0].point();
            let last = vertices[vertices.len() - 1].point();
            for (end, vertex) in ends.iter().zip([first, last]) {
                let matches = vertex.is_some_and(|p| p.distance(*end) <= tolerance_at(*end));
                if !matches {
                    return Err(KernelError::InvalidResult(format!(
                        "edge {} does not end at its vertices",
                        shape.id()
                    )));
                }
            }
        }
        ShapeData::Wire => {
            check_not_empty(shape)?;
            check_wire_connected(shape)?;
        }
        ShapeData::Face { .. } | ShapeData::Shell | ShapeData::Solid => check_not_empty(shape)?,
        ShapeData::Compound => {}
    }

    for child in shape.children() {
        validate_node(child, visited)?;
    }
    Ok(())
}

fn tolerance_at(p: glam::DVec3) -> f64 {
    POINT_TOLERANCE * p.abs().max_element().max(1.0)
}

fn check_not_empty(shape: &Shape) -> Result<(), KernelError> {
    if shape.children().is_empty() {
        return Err(KernelError::InvalidResult(format!(
            "{} {} is empty",
            shape.kind(),
            shape.id()
        )));
    }
    Ok(())
}

fn check_wire_connected(wire: &Shape) -> Result<(), KernelError> {
    let edges = wire.children();
    if edges.len() < 2 {
        return Ok(());
    }
    for (i, edge) in edges.iter().enumerate() {
        let next = &edges[(i + 1) % edges.len()];
        let shared = edge
            .children()
            .iter()
            .any(|v| next.children().contains(v));
        if !shared {
            return Err(KernelError::InvalidResult(format!(
                "wire {} is open between {} and {}",
                wire.id(),
                edge.id(),
                next.id()
            )));
        }
    }
    Ok(())
}
