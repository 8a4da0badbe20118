//! Boundary tessellation at a given deflection.

use std::collections::HashSet;

use glam::DVec3;

use crate::bounds::BoundingBox;
use crate::shape::{Shape, ShapeData};
use crate::types::{KernelError, ShapeId, ShapeKind};

/// Triangulated boundary plus free edges and free vertices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<DVec3>,
    pub triangles: Vec<[u32; 3]>,
    /// Vertex indices of edges not bounding any face
    pub polylines: Vec<Vec<u32>>,
    /// Vertex indices of vertices not bounding any edge
    pub points: Vec<u32>,
}

impl Mesh {
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Box around every position; void for an empty mesh.
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::from_points(self.positions.iter().copied())
    }

    fn push(&mut self, p: DVec3) -> u32 {
        self.positions.push(p);
        (self.positions.len() - 1) as u32
    }
}

/// Tessellate `shape` so that no chord strays more than `deflection` from
/// the exact boundary.
pub fn tessellate(shape: &Shape, deflection: f64) -> Result<Mesh, KernelError> {
    if !deflection.is_finite() || deflection <= 0.0 {
        return Err(KernelError::InvalidParameter(format!(
            "deflection must be positive and finite, got {}",
            deflection
        )));
    }

    let mut mesh = Mesh::default();
    let faces = shape.explore(ShapeKind::Face);
    let mut bounded_edges: HashSet<ShapeId> = HashSet::new();

    for face in &faces {
        for edge in face.explore(ShapeKind::Edge) {
            bounded_edges.insert(edge.id());
        }
        if let ShapeData::Face { surface, domain } = face.data() {
            let (nu, nv) = surface.resolution(domain, deflection);
            let base = mesh.positions.len() as u32;
            for j in 0..=nv {
                let v = domain.v_at(j as f64 / nv as f64);
                for i in 0..=nu {
                    let u = domain.u_at(i as f64 / nu as f64);
                    mesh.push(surface.point(u, v));
                }
            }
            let row = (nu + 1) as u32;
            for j in 0..nv as u32 {
                for i in 0..nu as u32 {
                    let a = base + j * row + i;
                    let b = a + 1;
                    let c = a + row;
                    let d = c + 1;
                    mesh.triangles.push([a, b, d]);
                    mesh.triangles.push([a, d, c]);
                }
            }
        }
    }

    let mut bounded_vertices: HashSet<ShapeId> = HashSet::new();
    for edge in shape.explore(ShapeKind::Edge) {
        for vertex in edge.children() {
            bounded_vertices.insert(vertex.id());
        }
        if bounded_edges.contains(&edge.id()) {
            continue;
        }
        if let ShapeData::Edge(curve) = edge.data() {
            let n = curve.segments(deflection);
            let polyline = (0..=n)
                .map(|k| mesh.push(curve.point_at(k as f64 / n as f64)))
                .collect();
            mesh.polylines.push(polyline);
        }
    }

    for vertex in shape.explore(ShapeKind::Vertex) {
        if bounded_vertices.contains(&vertex.id()) {
            continue;
        }
        if let Some(p) = vertex.point() {
            let index = mesh.push(p);
            mesh.points.push(index);
        }
    }

    tracing::trace!(
        "Tessellated {:?} at deflection {:.6}: {} positions, {} triangles, {} polylines",
        shape,
        deflection,
        mesh.positions.len(),
        mesh.triangles.len(),
        mesh.polylines.len()
    );
    Ok(mesh)
}
