//! Immutable topological shape graph.
//!
//! A [`Shape`] is a shared reference to a node. Nodes never change after
//! creation; editing produces new nodes and reuses every untouched subtree,
//! so sharing between parents (an edge bounding two faces) survives edits.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use glam::DVec3;

use crate::geometry::{Curve, Domain, Surface};
use crate::types::{ShapeId, ShapeKind};

static NEXT_SHAPE_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> ShapeId {
    ShapeId(NEXT_SHAPE_ID.fetch_add(1, Ordering::Relaxed))
}

/// Geometric payload of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeData {
    Vertex(DVec3),
    Edge(Curve),
    Wire,
    Face { surface: Surface, domain: Domain },
    Shell,
    Solid,
    Compound,
}

impl ShapeData {
    pub fn kind(&self) -> ShapeKind {
        match self {
            ShapeData::Vertex(_) => ShapeKind::Vertex,
            ShapeData::Edge(_) => ShapeKind::Edge,
            ShapeData::Wire => ShapeKind::Wire,
            ShapeData::Face { .. } => ShapeKind::Face,
            ShapeData::Shell => ShapeKind::Shell,
            ShapeData::Solid => ShapeKind::Solid,
            ShapeData::Compound => ShapeKind::Compound,
        }
    }

    fn translated(&self, offset: DVec3) -> Self {
        match self {
            ShapeData::Vertex(p) => ShapeData::Vertex(*p + offset),
            ShapeData::Edge(curve) => ShapeData::Edge(curve.translated(offset)),
            ShapeData::Face { surface, domain } => ShapeData::Face {
                surface: surface.translated(offset),
                domain: *domain,
            },
            other => other.clone(),
        }
    }
}

struct ShapeNode {
    id: ShapeId,
    data: ShapeData,
    children: Vec<Shape>,
}

/// Shared reference to an immutable topological node.
///
/// Equality and hashing go by identity: two values are equal exactly when
/// they refer to the same sub-shape. Use [`Shape::structurally_eq`] to
/// compare geometry.
#[derive(Clone)]
pub struct Shape(Arc<ShapeNode>);

impl Shape {
    /// Create a node with a fresh id. Child kinds are not checked here; see
    /// [`crate::validate`].
    pub fn new(data: ShapeData, children: Vec<Shape>) -> Self {
        Shape(Arc::new(ShapeNode {
            id: next_id(),
            data,
            children,
        }))
    }

    pub fn vertex(point: DVec3) -> Self {
        Self::new(ShapeData::Vertex(point), Vec::new())
    }

    /// Edge over `curve`. Pass the same vertex twice for a closed curve.
    pub fn edge(curve: Curve, start: &Shape, end: &Shape) -> Self {
        let children = if start == end {
            vec![start.clone()]
        } else {
            vec![start.clone(), end.clone()]
        };
        Self::new(ShapeData::Edge(curve), children)
    }

    pub fn wire(edges: Vec<Shape>) -> Self {
        Self::new(ShapeData::Wire, edges)
    }

    pub fn face(surface: Surface, domain: Domain, wire: Shape) -> Self {
        Self::new(ShapeData::Face { surface, domain }, vec![wire])
    }

    pub fn shell(faces: Vec<Shape>) -> Self {
        Self::new(ShapeData::Shell, faces)
    }

    pub fn solid(shell: Shape) -> Self {
        Self::new(ShapeData::Solid, vec![shell])
    }

    pub fn compound(children: Vec<Shape>) -> Self {
        Self::new(ShapeData::Compound, children)
    }

    pub fn id(&self) -> ShapeId {
        self.0.id
    }

    pub fn kind(&self) -> ShapeKind {
        self.0.data.kind()
    }

    pub fn data(&self) -> &ShapeData {
        &self.0.data
    }

    pub fn children(&self) -> &[Shape] {
        &self.0.children
    }

    /// Location of a vertex; `None` for any other kind.
    pub fn point(&self) -> Option<DVec3> {
        match self.0.data {
            ShapeData::Vertex(p) => Some(p),
            _ => None,
        }
    }

    /// Unique sub-shapes of `kind` in first-visit depth-first order,
    /// including `self` when it matches.
    pub fn explore(&self, kind: ShapeKind) -> Vec<Shape> {
        let mut visited = HashSet::new();
        let mut found = Vec::new();
        self.explore_into(kind, &mut visited, &mut found);
        found
    }

    fn explore_into(&self, kind: ShapeKind, visited: &mut HashSet<ShapeId>, found: &mut Vec<Shape>) {
        if !visited.insert(self.id()) {
            return;
        }
        if self.kind() == kind {
            found.push(self.clone());
        }
        for child in self.children() {
            child.explore_into(kind, visited, found);
        }
    }

    /// True when `sub` is this shape or reachable from it.
    pub fn contains(&self, sub: &Shape) -> bool {
        let mut visited = HashSet::new();
        self.contains_inner(sub.id(), &mut visited)
    }

    fn contains_inner(&self, target: ShapeId, visited: &mut HashSet<ShapeId>) -> bool {
        if self.id() == target {
            return true;
        }
        if !visited.insert(self.id()) {
            return false;
        }
        self.children()
            .iter()
            .any(|child| child.contains_inner(target, visited))
    }

    /// Compare kind, geometry and children recursively, ignoring ids.
    pub fn structurally_eq(&self, other: &Shape) -> bool {
        if self == other {
            return true;
        }
        self.data() == other.data()
            && self.children().len() == other.children().len()
            && self
                .children()
                .iter()
                .zip(other.children())
                .all(|(a, b)| a.structurally_eq(b))
    }

    /// Copy of the whole graph moved by `offset`, with fresh ids and the
    /// same internal sharing.
    pub fn translated(&self, offset: DVec3) -> Shape {
        let mut memo = HashMap::new();
        self.translated_inner(offset, &mut memo)
    }

    fn translated_inner(&self, offset: DVec3, memo: &mut HashMap<ShapeId, Shape>) -> Shape {
        if let Some(done) = memo.get(&self.id()) {
            return done.clone();
        }
        let children = self
            .children()
            .iter()
            .map(|child| child.translated_inner(offset, memo))
            .collect();
        let moved = Shape::new(self.data().translated(offset), children);
        memo.insert(self.id(), moved.clone());
        moved
    }

    /// Number of distinct nodes reachable from this shape, itself included.
    pub fn node_count(&self) -> usize {
        let mut visited = HashSet::new();
        let mut stack = vec![self.clone()];
        while let Some(shape) = stack.pop() {
            if visited.insert(shape.id()) {
                stack.extend(shape.children().iter().cloned());
            }
        }
        visited.len()
    }
}

impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Shape {}

impl std::hash::Hash for Shape {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shape({} {})", self.kind(), self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(a: &Shape, b: &Shape) -> Shape {
        let curve = Curve::Line {
            start: a.point().unwrap(),
            end: b.point().unwrap(),
        };
        Shape::edge(curve, a, b)
    }

    #[test]
    fn test_identity_equality() {
        let a = Shape::vertex(DVec3::ZERO);
        let b = Shape::vertex(DVec3::ZERO);
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
        assert!(a.structurally_eq(&b));
    }

    #[test]
    fn test_explore_deduplicates_shared() {
        let v0 = Shape::vertex(DVec3::ZERO);
        let v1 = Shape::vertex(DVec3::X);
        let v2 = Shape::vertex(DVec3::Y);
        let e0 = segment(&v0, &v1);
        let e1 = segment(&v1, &v2);
        let wire = Shape::wire(vec![e0.clone(), e1.clone()]);

        let vertices = wire.explore(ShapeKind::Vertex);
        assert_eq!(vertices, vec![v0, v1, v2]);
        assert_eq!(wire.explore(ShapeKind::Edge), vec![e0, e1]);
        assert_eq!(wire.explore(ShapeKind::Wire), vec![wire.clone()]);
        assert!(wire.explore(ShapeKind::Face).is_empty());
    }

    #[test]
    fn test_contains() {
        let v0 = Shape::vertex(DVec3::ZERO);
        let v1 = Shape::vertex(DVec3::X);
        let edge = segment(&v0, &v1);
        let stranger = Shape::vertex(DVec3::ZERO);
        assert!(edge.contains(&edge));
        assert!(edge.contains(&v1));
        assert!(!edge.contains(&stranger));
    }

    #[test]
    fn test_translated_keeps_sharing() {
        let v0 = Shape::vertex(DVec3::ZERO);
        let v1 = Shape::vertex(DVec3::X);
        let v2 = Shape::vertex(DVec3::Y);
        let wire = Shape::wire(vec![segment(&v0, &v1), segment(&v1, &v2)]);

        let moved = wire.translated(DVec3::Z);
        assert_eq!(moved.node_count(), wire.node_count());
        assert!(!moved.contains(&v1));

        let points: Vec<DVec3> = moved
            .explore(ShapeKind::Vertex)
            .iter()
            .filter_map(Shape::point)
            .collect();
        assert_eq!(points, vec![DVec3::Z, DVec3::X + DVec3::Z, DVec3::Y + DVec3::Z]);
    }

    #[test]
    fn test_closed_edge_single_vertex() {
        let v = Shape::vertex(DVec3::X);
        let curve = Curve::Line {
            start: DVec3::X,
            end: DVec3::X,
        };
        let edge = Shape::edge(curve, &v, &v);
        assert_eq!(edge.children().len(), 1);
    }

    #[test]
    fn test_debug_format() {
        let s = Shape::compound(Vec::new());
        assert_eq!(format!("{:?}", s), format!("Shape(compound {})", s.id()));
    }
}
