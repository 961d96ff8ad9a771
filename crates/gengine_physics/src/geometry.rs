//! World geometry queries
//!
//! The physics core does not store the world. Whoever does (chunk storage,
//! a level file, a test fixture) implements [`CollisionGeometry`] and the body
//! asks it for candidate boxes around its collider each frame.

use gengine_math::Vec3;

use crate::aabb::AABB3D;

/// Source of static collision boxes near a body
///
/// All queries take the body's current collider as the probe.
pub trait CollisionGeometry {
    /// The supporting box directly beneath the probe, if any
    fn ground_below(&self, probe: &AABB3D) -> Option<AABB3D>;

    /// The box directly above the probe, if any
    fn ceiling_above(&self, probe: &AABB3D) -> Option<AABB3D>;

    /// Append every obstacle close enough to `volume` to matter for this frame
    ///
    /// `volume` covers the whole path the body may sweep, not just where it
    /// starts. Ground and ceiling boxes are included; the wall sweep is what
    /// stops a body moving into them.
    fn walls_near(&self, volume: &AABB3D, out: &mut Vec<AABB3D>);

    /// Whether a point lies inside solid geometry
    fn is_solid(&self, point: Vec3) -> bool;
}

/// How far below the probe a ground top may be and still count as support
pub const DEFAULT_GROUND_PROBE_DEPTH: f32 = 0.3;
/// How far into the probe a ground top (or ceiling bottom) may reach
pub const DEFAULT_PENETRATION_REACH: f32 = 0.5;
/// Boxes farther than this from the query volume are not returned as walls
pub const DEFAULT_WALL_QUERY_RADIUS: f32 = 3.0;

/// A flat list of static boxes, scanned linearly
///
/// Fine for tests, demos and the handful of candidate boxes a voxel world
/// produces around one body.
#[derive(Clone, Debug)]
pub struct StaticGeometry {
    boxes: Vec<AABB3D>,
    /// Support search distance below the probe
    pub ground_probe_depth: f32,
    /// Accepted overlap when looking for ground or ceiling
    pub penetration_reach: f32,
    /// Wall search radius around the query volume
    pub wall_query_radius: f32,
}

impl Default for StaticGeometry {
    fn default() -> Self {
        Self::new()
    }
}

impl StaticGeometry {
    pub fn new() -> Self {
        Self {
            boxes: Vec::new(),
            ground_probe_depth: DEFAULT_GROUND_PROBE_DEPTH,
            penetration_reach: DEFAULT_PENETRATION_REACH,
            wall_query_radius: DEFAULT_WALL_QUERY_RADIUS,
        }
    }

    /// Create geometry from an existing box list
    pub fn from_boxes(boxes: Vec<AABB3D>) -> Self {
        Self {
            boxes,
            ..Self::new()
        }
    }

    /// Add a box
    pub fn push(&mut self, aabb: AABB3D) {
        self.boxes.push(aabb);
    }

    /// Add a unit block at an integer voxel cell
    pub fn add_block(&mut self, x: i32, y: i32, z: i32) {
        self.push(AABB3D::block(Vec3::new(x as f32, y as f32, z as f32)));
    }

    pub fn boxes(&self) -> &[AABB3D] {
        &self.boxes
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Boxes sharing horizontal footprint with the probe (touching excluded)
    fn beneath_or_above<'a>(&'a self, probe: &'a AABB3D) -> impl Iterator<Item = &'a AABB3D> + 'a {
        self.boxes.iter().filter(move |b| {
            b.max.x > probe.min.x && b.min.x < probe.max.x && b.max.z > probe.min.z && b.min.z < probe.max.z
        })
    }
}

impl CollisionGeometry for StaticGeometry {
    fn ground_below(&self, probe: &AABB3D) -> Option<AABB3D> {
        let feet = probe.min.y;
        self.beneath_or_above(probe)
            .filter(|b| b.max.y >= feet - self.ground_probe_depth && b.max.y <= feet + self.penetration_reach)
            .max_by(|a, b| a.max.y.total_cmp(&b.max.y))
            .copied()
    }

    fn ceiling_above(&self, probe: &AABB3D) -> Option<AABB3D> {
        let head = probe.max.y;
        self.beneath_or_above(probe)
            .filter(|b| b.min.y >= head - self.penetration_reach && b.min.y <= head + self.ground_probe_depth)
            .min_by(|a, b| a.min.y.total_cmp(&b.min.y))
            .copied()
    }

    fn walls_near(&self, volume: &AABB3D, out: &mut Vec<AABB3D>) {
        let radius = self.wall_query_radius;
        out.extend(self.boxes.iter().filter(|b| b.gap(volume) <= radius).copied());
    }

    fn is_solid(&self, point: Vec3) -> bool {
        self.boxes.iter().any(|b| b.contains(point))
    }
}
