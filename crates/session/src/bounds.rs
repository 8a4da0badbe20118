//! Two-pass bounding volume computation.
//!
//! 1. Coarse box straight from the untessellated shape.
//! 2. Deflection = largest coarse extent * relative factor.
//! 3. Tessellate at that deflection.
//! 4. Box of the tessellation, widened by the sag the grid can hide and
//!    clipped to the coarse box.
//!
//! The deflection grows with the shape, so the result is scale invariant:
//! scaling a shape by `k` scales its box by `k`.

use kernel::{BoundingBox, GeometryKernel, Shape};
use solidview_config::BoundsConfig;

use crate::error::SessionError;

#[derive(Debug, Clone)]
pub struct BoundingVolumeCalculator {
    relative_deflection: f64,
}

impl Default for BoundingVolumeCalculator {
    fn default() -> Self {
        Self::from_config(&BoundsConfig::default())
    }
}

impl BoundingVolumeCalculator {
    pub fn new(relative_deflection: f64) -> Self {
        Self {
            relative_deflection,
        }
    }

    pub fn from_config(config: &BoundsConfig) -> Self {
        Self::new(config.relative_deflection)
    }

    pub fn relative_deflection(&self) -> f64 {
        self.relative_deflection
    }

    /// Deflection used to refine a shape whose coarse box is `coarse`.
    pub fn deflection_for(&self, coarse: &BoundingBox) -> f64 {
        coarse.max_extent() * self.relative_deflection
    }

    pub fn compute<K: GeometryKernel>(
        &self,
        kernel: &K,
        shape: &Shape,
    ) -> Result<BoundingBox, SessionError> {
        let coarse = kernel
            .bounding_box(shape)
            .ok_or(SessionError::DegenerateShape)?;

        let deflection = self.deflection_for(&coarse);
        if deflection <= 0.0 {
            // A lone point: nothing to refine.
            return Ok(coarse);
        }

        let mesh = kernel.tessellate(shape, deflection)?;
        let refined = mesh.bounds();
        if refined.is_void() {
            tracing::warn!("Tessellation of {:?} is empty, keeping coarse box", shape);
            return Ok(coarse);
        }
        // Mesh vertices lie on the surface but can miss its extremes by up
        // to one deflection per parameter direction.
        let refined = refined.enlarged(2.0 * deflection).clipped_to(&coarse);
        tracing::trace!(
            "Refined box of {:?} at deflection {:.6}: {:?} -> {:?}",
            shape,
            deflection,
            coarse.extents(),
            refined.extents()
        );
        Ok(refined)
    }
}
