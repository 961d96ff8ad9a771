//! Rigid bodies and their stepped move-and-collide resolution

use std::collections::VecDeque;

use bitflags::bitflags;
use gengine_math::Vec3;
use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};

use crate::aabb::AABB3D;
use crate::geometry::CollisionGeometry;

// Define generational key type for rigid bodies
new_key_type! {
    /// Key to a rigid body in a [`BodySet`]
    ///
    /// Uses generational indexing to prevent the ABA problem where a handle
    /// could point to a reused slot. If a body is removed and its slot reused,
    /// old keys will return None instead of pointing to the wrong body.
    pub struct BodyKey;
}

/// Default upward velocity applied by [`RigidBody::jump`]
pub const DEFAULT_JUMP_SPEED: f32 = 3.0;
/// Default gravity magnitude (acceleration, pointing down)
pub const DEFAULT_GRAVITY: f32 = 12.0;
/// Ground penetration below this depth is ignored
pub const DEFAULT_GROUND_PENETRATION_EPSILON: f32 = 0.001;
/// Extra lift added on top of the penetration depth when snapping to ground
pub const DEFAULT_GROUND_SNAP_MARGIN: f32 = 0.2;
/// Horizontal movement multiplier while airborne
pub const DEFAULT_AIR_MOVEMENT_SUPPRESSION: f32 = 0.7;
/// Movement multiplier while flying
pub const DEFAULT_FLYING_SPEED_MULTIPLIER: f32 = 2.0;
/// Most negative vertical velocity a body may reach
pub const DEFAULT_TERMINAL_VELOCITY: f32 = -10.0;
/// Number of past positions kept for trail rendering
pub const DEFAULT_HISTORY_LENGTH: usize = 20;

/// Smallest mass a body may have; the tick divides by mass
pub const MIN_MASS: f32 = 0.001;

/// Vertical sub-steps per unit of vertical displacement
const VERTICAL_STEPS_PER_UNIT: f32 = 5.0;
/// Horizontal displacement is always split into this many sub-steps
const HORIZONTAL_STEPS: usize = 4;
/// Horizontal moves shorter than this are skipped
const MIN_HORIZONTAL_MOVE: f32 = 0.001;

/// Per-body physics coefficients
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyTuning {
    /// Vertical velocity set by a jump
    pub jump_speed: f32,
    /// Gravity magnitude; the applied force is `mass * -gravity` on Y
    pub gravity: f32,
    /// Minimum ground penetration that triggers a snap
    pub ground_penetration_epsilon: f32,
    /// Margin added above the ground when snapping
    pub ground_snap_margin: f32,
    /// Movement multiplier while airborne and not flying
    pub air_movement_suppression: f32,
    /// Movement multiplier while flying
    pub flying_speed_multiplier: f32,
    /// Vertical velocity floor (negative)
    pub terminal_velocity: f32,
    /// Maximum number of entries in the position history
    pub history_length: usize,
}

impl Default for BodyTuning {
    fn default() -> Self {
        Self {
            jump_speed: DEFAULT_JUMP_SPEED,
            gravity: DEFAULT_GRAVITY,
            ground_penetration_epsilon: DEFAULT_GROUND_PENETRATION_EPSILON,
            ground_snap_margin: DEFAULT_GROUND_SNAP_MARGIN,
            air_movement_suppression: DEFAULT_AIR_MOVEMENT_SUPPRESSION,
            flying_speed_multiplier: DEFAULT_FLYING_SPEED_MULTIPLIER,
            terminal_velocity: DEFAULT_TERMINAL_VELOCITY,
            history_length: DEFAULT_HISTORY_LENGTH,
        }
    }
}

bitflags! {
    /// What happened during a [`RigidBody::move_and_collide`] call
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MoveFlags: u8 {
        /// The body was lifted out of the ground box
        const GROUND_SNAP = 1 << 0;
        /// The body went from airborne to grounded
        const LANDED = 1 << 1;
        /// The vertical sweep hit a wall before completing
        const BLOCKED_VERTICAL = 1 << 2;
        /// The horizontal sweep hit a wall before completing
        const BLOCKED_HORIZONTAL = 1 << 3;
        /// Movement was applied directly, without sub-stepping
        const UNSTEPPED = 1 << 4;
    }
}

/// Result of one sub-stepped sweep
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SweepOutcome {
    /// Every step was committed
    Clear,
    /// A step collided; this many steps were committed before it
    Blocked { committed: usize },
}

/// A non-rotating rigid body with an AABB collider
#[derive(Clone, Debug)]
pub struct RigidBody {
    /// Anchor position (top centre of the collider)
    pub position: Vec3,
    /// Velocity (units per second)
    pub velocity: Vec3,
    /// Force accumulated since the last tick
    pub force: Vec3,
    /// Collider width on X and Z
    pub width: f32,
    /// Collider height on Y
    pub height: f32,
    /// Resting on a supporting surface this frame
    pub grounded: bool,
    /// Flight mode: no gravity, free vertical movement
    pub flying: bool,
    /// Distance travelled since the body last came to rest
    pub trip_distance: f32,
    /// Physics coefficients
    pub tuning: BodyTuning,
    mass: f32,
    collider: Option<AABB3D>,
    position_history: VecDeque<Vec3>,
}

/// Clamp a mass to something the tick can divide by
fn sanitize_mass(mass: f32) -> f32 {
    if mass.is_finite() && mass >= MIN_MASS {
        mass
    } else {
        log::warn!("Invalid rigid body mass {}, clamping to {}", mass, MIN_MASS);
        MIN_MASS
    }
}

impl RigidBody {
    /// Create a new body at `position` with the given mass and collider extents
    ///
    /// The collider is not built until the first position update, so the
    /// first [`move_and_collide`](Self::move_and_collide) takes the unstepped
    /// path.
    pub fn new(position: Vec3, mass: f32, width: f32, height: f32) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            force: Vec3::ZERO,
            width,
            height,
            grounded: false,
            flying: false,
            trip_distance: 0.0,
            tuning: BodyTuning::default(),
            mass: sanitize_mass(mass),
            collider: None,
            position_history: VecDeque::new(),
        }
    }

    /// Replace the physics coefficients
    pub fn with_tuning(mut self, tuning: BodyTuning) -> Self {
        self.tuning = tuning;
        self
    }

    /// Set the velocity of this body
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Set the mass of this body (clamped to [`MIN_MASS`])
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.set_mass(mass);
        self
    }

    /// Start in flight mode
    pub fn with_flying(mut self, flying: bool) -> Self {
        self.flying = flying;
        self
    }

    /// Build the collider immediately
    pub fn with_collider(mut self) -> Self {
        self.update_collider();
        self
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Set the mass (clamped to [`MIN_MASS`])
    pub fn set_mass(&mut self, mass: f32) {
        self.mass = sanitize_mass(mass);
    }

    /// Current collider, `None` until the first position update
    pub fn collider(&self) -> Option<&AABB3D> {
        self.collider.as_ref()
    }

    /// Past positions, most recent first
    pub fn position_history(&self) -> &VecDeque<Vec3> {
        &self.position_history
    }

    /// Add to the force accumulator; consumed by the next tick
    pub fn apply_force(&mut self, force: Vec3) {
        self.force += force;
    }

    /// Rebuild the collider from the current position
    pub fn update_collider(&mut self) {
        self.update_collider_at(self.position);
    }

    /// Rebuild the collider as if the body stood at `position`
    ///
    /// Used for tentative positions during a sweep. The stored position is
    /// not changed.
    pub fn update_collider_at(&mut self, position: Vec3) {
        self.collider = Some(AABB3D::for_body(position, self.width, self.height));
    }

    /// Teleport the body, recording the new position in the history
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.append_history();
        self.update_collider();
    }

    /// Jump if grounded; silently does nothing otherwise
    pub fn jump(&mut self) {
        if self.grounded {
            self.velocity.y = self.tuning.jump_speed;
            self.grounded = false;
        }
    }

    /// Record the current position at the front of the history
    pub fn append_history(&mut self) {
        self.position_history.push_front(self.position);
        self.position_history.truncate(self.tuning.history_length);
    }

    /// Move the body, resolving against the supplied world geometry
    ///
    /// `ground` is the box directly beneath the body, if any. `ceiling` is
    /// accepted for symmetry with the world query but is not resolved on its
    /// own: ceiling hits are caught by the wall sweep, so callers should
    /// include it in `walls`.
    ///
    /// Vertical displacement is `velocity.y` when falling, `movement.y` when
    /// flying and zero when grounded; it is swept in `ceil(|dy| * 5)` steps.
    /// Horizontal displacement is swept in 4 steps. Both stop at the first
    /// step that touches a wall. Without walls or a collider, the movement is
    /// applied directly.
    pub fn move_and_collide(
        &mut self,
        movement: Vec3,
        ground: Option<&AABB3D>,
        _ceiling: Option<&AABB3D>,
        walls: &[AABB3D],
    ) -> MoveFlags {
        let mut flags = MoveFlags::empty();
        let mut movement = movement;

        match ground {
            Some(ground) => {
                if !self.grounded {
                    self.velocity.y = 0.0;
                    flags |= MoveFlags::LANDED;
                }
                self.grounded = true;

                if let Some(collider) = self.collider {
                    if let Some(depth) = ground.intersection_y(&collider) {
                        if depth > self.tuning.ground_penetration_epsilon {
                            log::debug!("Ground penetration {:.4}, snapping body up", depth);
                            self.position.y += depth + self.tuning.ground_snap_margin;
                            self.update_collider();
                            flags |= MoveFlags::GROUND_SNAP;
                        }
                    }
                }
            }
            None => self.grounded = false,
        }

        if self.flying {
            movement *= self.tuning.flying_speed_multiplier;
        } else if !self.grounded {
            movement *= self.tuning.air_movement_suppression;
        }

        if self.collider.is_none() || walls.is_empty() {
            self.position += movement;
            if !self.flying {
                self.position.y += self.velocity.y;
            }
            self.update_collider();
            return flags | MoveFlags::UNSTEPPED;
        }

        let vertical = if self.flying {
            movement.y
        } else if !self.grounded {
            self.velocity.y
        } else {
            0.0
        };

        if vertical != 0.0 {
            let steps = ((vertical.abs() * VERTICAL_STEPS_PER_UNIT).ceil() as usize).max(1);
            if let SweepOutcome::Blocked { committed } =
                self.sweep(Vec3::new(0.0, vertical, 0.0), steps, walls)
            {
                log::debug!("Vertical sweep blocked after {}/{} steps", committed, steps);
                if self.velocity.y < 0.0 {
                    if !self.grounded {
                        flags |= MoveFlags::LANDED;
                    }
                    self.grounded = true;
                }
                self.velocity.y = 0.0;
                flags |= MoveFlags::BLOCKED_VERTICAL;
            }
        }

        let horizontal = movement.flattened();
        if horizontal.length() > MIN_HORIZONTAL_MOVE {
            if let SweepOutcome::Blocked { committed } =
                self.sweep(horizontal, HORIZONTAL_STEPS, walls)
            {
                log::debug!(
                    "Horizontal sweep blocked after {}/{} steps",
                    committed,
                    HORIZONTAL_STEPS
                );
                flags |= MoveFlags::BLOCKED_HORIZONTAL;
            }
        }

        self.update_collider();
        flags
    }

    /// Query `geometry` along this call's path and resolve `movement`
    /// against it
    ///
    /// Walls are gathered around the volume the collider may sweep through,
    /// so a fast fall still sees the floor it is heading for. A body moving
    /// up is never handed ground; it has to come back down onto it.
    pub fn resolve_against<G: CollisionGeometry + ?Sized>(
        &mut self,
        movement: Vec3,
        geometry: &G,
    ) -> MoveFlags {
        if self.collider.is_none() {
            self.update_collider();
        }
        let collider = match self.collider {
            Some(collider) => collider,
            None => AABB3D::for_body(self.position, self.width, self.height),
        };

        let ground = if self.velocity.y > 0.0 && !self.flying {
            None
        } else {
            geometry.ground_below(&collider)
        };
        let ceiling = geometry.ceiling_above(&collider);
        let mut walls = Vec::new();
        geometry.walls_near(&self.swept_volume(&collider, movement), &mut walls);

        self.move_and_collide(movement, ground.as_ref(), ceiling.as_ref(), &walls)
    }

    /// Box covering every position `move_and_collide` can reach from `collider`
    fn swept_volume(&self, collider: &AABB3D, movement: Vec3) -> AABB3D {
        let reach = if self.flying {
            movement * self.tuning.flying_speed_multiplier
        } else {
            movement + Vec3::new(0.0, self.velocity.y, 0.0)
        };
        let tall = collider.combine_y(&collider.translated(Vec3::new(0.0, reach.y, 0.0)));
        let moved = tall.translated(reach.flattened());
        AABB3D::new(tall.min.min_components(moved.min), tall.max.max_components(moved.max))
    }

    /// Advance the position by `displacement` in `steps` equal increments
    ///
    /// Each increment is tested against every wall at the tentative position
    /// and committed only if nothing intersects. The first collision stops the
    /// sweep. The collider is left at the last tested position.
    fn sweep(&mut self, displacement: Vec3, steps: usize, walls: &[AABB3D]) -> SweepOutcome {
        let step = displacement / steps as f32;

        for committed in 0..steps {
            let tentative = self.position + step;
            let collider = AABB3D::for_body(tentative, self.width, self.height);
            self.collider = Some(collider);

            if walls.iter().any(|wall| collider.intersects(wall)) {
                return SweepOutcome::Blocked { committed };
            }
            self.position = tentative;
        }

        SweepOutcome::Clear
    }
}

/// Arena owning rigid bodies, addressed by [`BodyKey`]
///
/// The physics engine and movement controllers hold keys into a `BodySet`
/// rather than references, so removing a body never leaves them dangling.
#[derive(Clone, Debug, Default)]
pub struct BodySet {
    bodies: SlotMap<BodyKey, RigidBody>,
}

impl BodySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a body and return its key
    pub fn insert(&mut self, body: RigidBody) -> BodyKey {
        self.bodies.insert(body)
    }

    /// Remove a body and return it
    pub fn remove(&mut self, key: BodyKey) -> Option<RigidBody> {
        self.bodies.remove(key)
    }

    pub fn get(&self, key: BodyKey) -> Option<&RigidBody> {
        self.bodies.get(key)
    }

    pub fn get_mut(&mut self, key: BodyKey) -> Option<&mut RigidBody> {
        self.bodies.get_mut(key)
    }

    pub fn contains(&self, key: BodyKey) -> bool {
        self.bodies.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Iterate over all bodies with their keys
    pub fn iter(&self) -> impl Iterator<Item = (BodyKey, &RigidBody)> {
        self.bodies.iter()
    }
}
