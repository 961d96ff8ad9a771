//! Axis-aligned bounding boxes
//!
//! [`AABB3D`] is the only collision primitive in the engine. Bodies carry one
//! as their collider and the world hands them in as ground, ceiling and wall
//! candidates.
//!
//! All overlap tests compare with strict `<`/`>` on the separating axis, so two
//! boxes that exactly touch are reported as intersecting with zero depth. The
//! collision sweep in [`crate::body`] depends on that boundary behaviour.

use gengine_math::{sign, Vec3};
use serde::{Deserialize, Serialize};

/// A 3D axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AABB3D {
    /// Minimum corner (all components are minimums)
    pub min: Vec3,
    /// Maximum corner (all components are maximums)
    pub max: Vec3,
}

/// Penetration along one axis: `(depth, signed_direction)`
///
/// `from_low` is how far `other.max` reaches past `self.min`, `from_high` how
/// far `self.max` reaches past `other.min`. The smaller one is the depth; the
/// sign of their difference gives the direction (zero counts as positive).
#[inline]
fn axis_penetration(self_min: f32, self_max: f32, other_min: f32, other_max: f32) -> (f32, f32) {
    let from_low = other_max - self_min;
    let from_high = self_max - other_min;
    (from_low.min(from_high), sign(from_low - from_high))
}

impl AABB3D {
    /// Create a new AABB from two opposite corners
    ///
    /// The corners may be given in any order; components are sorted so the
    /// `min <= max` invariant always holds.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min_components(b),
            max: a.max_components(b),
        }
    }

    /// Create an AABB centered at a position with given half-extents
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        let half_extents = half_extents.abs();
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Collider for a body anchored at `position`
    ///
    /// The box hangs from the anchor: its top face is at `position.y`, it
    /// extends `height` downward and `width / 2` to each horizontal side.
    pub fn for_body(position: Vec3, width: f32, height: f32) -> Self {
        let half = width.abs() / 2.0;
        Self::new(
            position - Vec3::new(half, height.abs(), half),
            position + Vec3::new(half, 0.0, half),
        )
    }

    /// Unit block occupying the voxel cell whose minimum corner is `cell`
    pub fn block(cell: Vec3) -> Self {
        Self::new(cell, cell + Vec3::new(1.0, 1.0, 1.0))
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the full size in each dimension
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Check if a point is inside or on the AABB
    pub fn contains(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Translate the AABB by a delta
    pub fn translated(&self, delta: Vec3) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    /// Euclidean distance from a point to the box, zero when inside
    pub fn distance(&self, point: Vec3) -> f32 {
        self.gap(&AABB3D { min: point, max: point })
    }

    /// Euclidean distance between the closest faces of two boxes, zero when they touch
    pub fn gap(&self, other: &AABB3D) -> f32 {
        let excess = |low: f32, high: f32, other_low: f32, other_high: f32| {
            (low - other_high).max(other_low - high).max(0.0)
        };
        Vec3::new(
            excess(self.min.x, self.max.x, other.min.x, other.max.x),
            excess(self.min.y, self.max.y, other.min.y, other.max.y),
            excess(self.min.z, self.max.z, other.min.z, other.max.z),
        )
        .length()
    }

    /// Union with `other` along Y only; X and Z extents are kept from `self`
    pub fn combine_y(&self, other: &AABB3D) -> Self {
        Self {
            min: self.min.with_y(self.min.y.min(other.min.y)),
            max: self.max.with_y(self.max.y.max(other.max.y)),
        }
    }

    /// All 8 corners, X-major then Y then Z
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }

    #[inline]
    fn overlaps_xz(&self, other: &AABB3D) -> bool {
        !(self.max.x < other.min.x
            || self.min.x > other.max.x
            || self.max.z < other.min.z
            || self.min.z > other.max.z)
    }

    #[inline]
    fn overlaps_y(&self, other: &AABB3D) -> bool {
        !(self.max.y < other.min.y || self.min.y > other.max.y)
    }

    /// Horizontal penetration, ignoring Y
    ///
    /// Returns the penetration along whichever of X or Z has the smaller
    /// depth (Z wins ties). The sign is positive when `other` lies toward the
    /// positive end of `self` on that axis.
    pub fn intersection_xz(&self, other: &AABB3D) -> Option<Vec3> {
        if !self.overlaps_xz(other) {
            return None;
        }

        let (dx, sx) = axis_penetration(self.min.x, self.max.x, other.min.x, other.max.x);
        let (dz, sz) = axis_penetration(self.min.z, self.max.z, other.min.z, other.max.z);

        if dx < dz {
            Some(Vec3::new(dx * sx, 0.0, 0.0))
        } else {
            Some(Vec3::new(0.0, 0.0, dz * sz))
        }
    }

    /// Unsigned vertical penetration depth
    ///
    /// Requires horizontal overlap first. Callers only ever need "how far to
    /// lift", so no direction is returned.
    pub fn intersection_y(&self, other: &AABB3D) -> Option<f32> {
        if !self.overlaps_xz(other) || !self.overlaps_y(other) {
            return None;
        }

        let (dy, _) = axis_penetration(self.min.y, self.max.y, other.min.y, other.max.y);
        Some(dy)
    }

    /// Full 3-axis minimum penetration vector
    ///
    /// The resolution axis is the one with the smallest depth. Exact ties fall
    /// through in the order X, then Y, then Z: X only wins if strictly smaller
    /// than both others, Y likewise, otherwise Z.
    ///
    /// The boolean result is symmetric. Swapping the operands negates the
    /// vector, except when the two boxes are centred on the resolution axis,
    /// where both orders report the positive direction.
    pub fn intersection(&self, other: &AABB3D) -> Option<Vec3> {
        if !self.overlaps_xz(other) || !self.overlaps_y(other) {
            return None;
        }

        let (dx, sx) = axis_penetration(self.min.x, self.max.x, other.min.x, other.max.x);
        let (dy, sy) = axis_penetration(self.min.y, self.max.y, other.min.y, other.max.y);
        let (dz, sz) = axis_penetration(self.min.z, self.max.z, other.min.z, other.max.z);

        let penetration = if dx < dy && dx < dz {
            Vec3::new(dx * sx, 0.0, 0.0)
        } else if dy < dx && dy < dz {
            Vec3::new(0.0, dy * sy, 0.0)
        } else {
            Vec3::new(0.0, 0.0, dz * sz)
        };
        Some(penetration)
    }

    /// True when the boxes overlap or touch
    pub fn intersects(&self, other: &AABB3D) -> bool {
        self.overlaps_xz(other) && self.overlaps_y(other)
    }
}
