//! Sub-shape substitution.

use std::collections::HashMap;

use crate::shape::Shape;
use crate::types::{KernelError, ShapeId};
use crate::validation::validate;

/// Pending substitutions applied to a shape graph in one pass.
///
/// Every ancestor of a replaced node is rebuilt once; subtrees that hold no
/// replaced node are reused as-is, so untouched sub-shapes keep their ids.
#[derive(Debug, Default)]
pub struct ReShape {
    replacements: HashMap<ShapeId, (Shape, Shape)>,
}

impl ReShape {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `old` is to be replaced by `new`.
    pub fn replace(&mut self, old: &Shape, new: &Shape) {
        self.replacements.insert(old.id(), (old.clone(), new.clone()));
    }

    pub fn is_empty(&self) -> bool {
        self.replacements.is_empty()
    }

    /// Rebuild `shape` with every recorded replacement, then check the
    /// result is valid and no longer references any replaced node.
    pub fn apply(&self, shape: &Shape) -> Result<Shape, KernelError> {
        let mut memo = HashMap::new();
        let result = self.rebuild(shape, &mut memo);

        validate(&result)?;
        for (old, new) in self.replacements.values() {
            if !new.contains(old) && result.contains(old) {
                return Err(KernelError::InvalidResult(format!(
                    "{:?} is still referenced after substitution",
                    old
                )));
            }
        }
        Ok(result)
    }

    fn rebuild(&self, shape: &Shape, memo: &mut HashMap<ShapeId, Shape>) -> Shape {
        if let Some((_, new)) = self.replacements.get(&shape.id()) {
            return new.clone();
        }
        if let Some(done) = memo.get(&shape.id()) {
            return done.clone();
        }

        let children: Vec<Shape> = shape
            .children()
            .iter()
            .map(|child| self.rebuild(child, memo))
            .collect();
        let unchanged = children.iter().zip(shape.children()).all(|(a, b)| a == b);
        let rebuilt = if unchanged {
            shape.clone()
        } else {
            Shape::new(shape.data().clone(), children)
        };
        memo.insert(shape.id(), rebuilt.clone());
        rebuilt
    }
}

/// Replace `old` inside `shape` with `new`.
pub fn substitute(shape: &Shape, old: &Shape, new: &Shape) -> Result<Shape, KernelError> {
    let mut reshape = ReShape::new();
    reshape.replace(old, new);
    reshape.apply(shape)
}
