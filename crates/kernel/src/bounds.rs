//! Axis-aligned bounding boxes.

use glam::DVec3;

/// Axis-aligned box. A box with no points added is *void*.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: DVec3,
    pub max: DVec3,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::void()
    }
}

impl BoundingBox {
    /// Empty box; adding any point makes it non-void.
    pub fn void() -> Self {
        Self {
            min: DVec3::splat(f64::INFINITY),
            max: DVec3::splat(f64::NEG_INFINITY),
        }
    }

    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn from_points<I: IntoIterator<Item = DVec3>>(points: I) -> Self {
        let mut bounds = Self::void();
        for p in points {
            bounds.add_point(p);
        }
        bounds
    }

    pub fn is_void(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn add_point(&mut self, p: DVec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn union(&mut self, other: &BoundingBox) {
        if other.is_void() {
            return;
        }
        self.add_point(other.min);
        self.add_point(other.max);
    }

    /// Size along each axis (zero for a void box).
    pub fn extents(&self) -> DVec3 {
        if self.is_void() {
            DVec3::ZERO
        } else {
            self.max - self.min
        }
    }

    /// Largest of the three axis extents.
    pub fn max_extent(&self) -> f64 {
        let e = self.extents();
        e.x.abs().max(e.y.abs()).max(e.z.abs())
    }

    /// Grown by `margin` on every side; a void box stays void.
    pub fn enlarged(&self, margin: f64) -> Self {
        if self.is_void() {
            return *self;
        }
        let m = DVec3::splat(margin);
        Self::new(self.min - m, self.max + m)
    }

    /// Part of this box inside `limit`.
    pub fn clipped_to(&self, limit: &BoundingBox) -> Self {
        if self.is_void() || limit.is_void() {
            return Self::void();
        }
        let min = self.min.max(limit.min);
        let max = self.max.min(limit.max);
        if min.cmpgt(max).any() {
            Self::void()
        } else {
            Self::new(min, max)
        }
    }

    /// True when the two boxes share at least one point.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        if self.is_void() || other.is_void() {
            return false;
        }
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
            && self.min.z <= other.max.z
            && other.min.z <= self.max.z
    }

    pub fn contains_point(&self, p: DVec3, tolerance: f64) -> bool {
        !self.is_void()
            && p.x >= self.min.x - tolerance
            && p.y >= self.min.y - tolerance
            && p.z >= self.min.z - tolerance
            && p.x <= self.max.x + tolerance
            && p.y <= self.max.y + tolerance
            && p.z <= self.max.z + tolerance
    }
}
