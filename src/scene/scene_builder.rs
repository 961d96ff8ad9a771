//! SceneBuilder - Declarative voxel scene construction
//!
//! Provides a fluent API for laying out unit blocks into a [`StaticGeometry`].

use gengine_math::Vec3;
use gengine_physics::StaticGeometry;

/// Builder for block scenes
///
/// # Example
/// ```ignore
/// let geometry = SceneBuilder::new()
///     .add_floor(-1, 8)
///     .add_cube(2, 0, 2, 3)
///     .add_pillar(-4, -4, 0, 4)
///     .build();
/// ```
pub struct SceneBuilder {
    geometry: StaticGeometry,
    player_start: Option<Vec3>,
}

impl SceneBuilder {
    /// Create a new scene builder
    pub fn new() -> Self {
        Self {
            geometry: StaticGeometry::new(),
            player_start: None,
        }
    }

    /// Add a single block
    pub fn add_block(mut self, x: i32, y: i32, z: i32) -> Self {
        self.geometry.add_block(x, y, z);
        self
    }

    /// Add a square one-block-thick floor whose top face is at `y + 1`
    ///
    /// Spans cells `-half_size..half_size` on X and Z.
    pub fn add_floor(mut self, y: i32, half_size: i32) -> Self {
        for x in -half_size..half_size {
            for z in -half_size..half_size {
                self.geometry.add_block(x, y, z);
            }
        }
        self
    }

    /// Add a solid `size`-block cube with its minimum cell at (x, y, z)
    pub fn add_cube(mut self, x: i32, y: i32, z: i32, size: i32) -> Self {
        for dx in 0..size {
            for dy in 0..size {
                for dz in 0..size {
                    self.geometry.add_block(x + dx, y + dy, z + dz);
                }
            }
        }
        self
    }

    /// Add a one-block column `height` blocks tall starting at `base_y`
    pub fn add_pillar(mut self, x: i32, z: i32, base_y: i32, height: i32) -> Self {
        for y in base_y..base_y + height {
            self.geometry.add_block(x, y, z);
        }
        self
    }

    /// Set where the player spawns
    pub fn with_player_start(mut self, position: Vec3) -> Self {
        self.player_start = Some(position);
        self
    }

    /// Get the player's starting position (if one was set)
    pub fn player_start(&self) -> Option<Vec3> {
        self.player_start
    }

    /// Build the scene and return its collision geometry
    pub fn build(self) -> StaticGeometry {
        log::debug!("Built scene with {} blocks", self.geometry.len());
        self.geometry
    }
}

impl Default for SceneBuilder {
    fn default() -> Self {
        Self::new()
    }
}
