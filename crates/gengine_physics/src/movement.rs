//! Camera-relative movement for a player-controlled body
//!
//! Turns forward/right/up input plus the camera's view and right vectors into
//! a world-space movement vector. The controller refers to its body by key,
//! so every operation that touches the body takes the owning [`BodySet`].

use gengine_math::Vec3;

use crate::body::{BodyKey, BodySet, RigidBody};
use crate::error::PhysicsError;

/// Default movement speed (units per update)
pub const DEFAULT_MOVE_SPEED: f32 = 1.0;

/// Default jump force carried by the controller
pub const DEFAULT_JUMP_FORCE: f32 = 4.0;

/// Drives one rigid body from camera-relative input
#[derive(Clone, Debug)]
pub struct MovementController {
    body: BodyKey,
    /// Length of the movement vector for any non-zero input
    pub speed: f32,
    /// Jump strength (informational; the body's tuning decides the jump)
    pub jump_force: f32,
    flying: bool,
}

impl MovementController {
    /// Create a controller for `body`
    pub fn new(body: BodyKey, speed: f32, jump_force: f32) -> Self {
        Self {
            body,
            speed,
            jump_force,
            flying: false,
        }
    }

    /// Key of the controlled body
    pub fn body(&self) -> BodyKey {
        self.body
    }

    pub fn is_flying(&self) -> bool {
        self.flying
    }

    fn body_ref<'a>(&self, bodies: &'a BodySet) -> Result<&'a RigidBody, PhysicsError> {
        bodies.get(self.body).ok_or(PhysicsError::UnknownBody(self.body))
    }

    fn body_mut<'a>(&self, bodies: &'a mut BodySet) -> Result<&'a mut RigidBody, PhysicsError> {
        bodies
            .get_mut(self.body)
            .ok_or(PhysicsError::UnknownBody(self.body))
    }

    /// Compute the world-space movement vector for this input
    ///
    /// View and right vectors are flattened onto the XZ plane, so looking up
    /// or down never slows walking. Vertical input only counts while flying.
    /// Any non-zero result is rescaled to exactly `speed`, so diagonal input
    /// is not faster than straight input.
    pub fn move_vector(&self, forward: f32, right: f32, up: f32, view: Vec3, right_dir: Vec3) -> Vec3 {
        let flat_view = view.flattened().normalized();
        let flat_right = right_dir.flattened().normalized();

        let mut movement = flat_view * forward + flat_right * right;

        if self.flying {
            movement.y += up;
        }

        if movement.length() > 0.0 {
            movement = movement.normalized() * self.speed;
        }
        movement
    }

    /// Jump, if the body is grounded
    ///
    /// Returns whether the jump took effect.
    pub fn jump(&self, bodies: &mut BodySet) -> Result<bool, PhysicsError> {
        let body = self.body_mut(bodies)?;
        if !body.grounded {
            return Ok(false);
        }
        body.jump();
        Ok(true)
    }

    /// Toggle flight mode on both the controller and its body
    ///
    /// Returns the new flying state.
    pub fn toggle_flight(&mut self, bodies: &mut BodySet) -> Result<bool, PhysicsError> {
        let body = self.body_mut(bodies)?;
        self.flying = !self.flying;
        body.flying = self.flying;
        log::debug!("Flight mode {}", if self.flying { "on" } else { "off" });
        Ok(self.flying)
    }

    /// Nudge the body directly by the movement vector
    ///
    /// This bypasses collision resolution entirely; use
    /// [`RigidBody::move_and_collide`] when walls matter.
    pub fn update(
        &self,
        bodies: &mut BodySet,
        forward: f32,
        right: f32,
        up: f32,
        view: Vec3,
        right_dir: Vec3,
    ) -> Result<Vec3, PhysicsError> {
        let movement = self.move_vector(forward, right, up, view, right_dir);
        let body = self.body_mut(bodies)?;
        body.position += movement;
        body.append_history();
        body.update_collider();
        Ok(movement)
    }

    /// Current position of the controlled body
    pub fn position(&self, bodies: &BodySet) -> Result<Vec3, PhysicsError> {
        self.body_ref(bodies).map(|body| body.position)
    }

    /// Teleport the controlled body
    pub fn set_position(&self, bodies: &mut BodySet, position: Vec3) -> Result<(), PhysicsError> {
        self.body_mut(bodies)?.set_position(position);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;
    const VIEW: Vec3 = Vec3::new(0.0, 0.0, -1.0);
    const RIGHT: Vec3 = Vec3::new(1.0, 0.0, 0.0);

    fn setup() -> (BodySet, MovementController) {
        let mut bodies = BodySet::new();
        let key = bodies.insert(RigidBody::new(Vec3::new(0.0, 5.0, 0.0), 70.0, 0.6, 1.8));
        (bodies, MovementController::new(key, 2.5, DEFAULT_JUMP_FORCE))
    }

    #[test]
    fn test_forward_has_speed_magnitude() {
        let (_, controller) = setup();
        let m = controller.move_vector(1.0, 0.0, 1.0, VIEW, RIGHT);
        assert!((m.length() - 2.5).abs() < EPSILON);
        assert!((m.z + 2.5).abs() < EPSILON);
        assert_eq!(m.y, 0.0);
    }

    #[test]
    fn test_diagonal_is_not_faster() {
        let (_, controller) = setup();
        let m = controller.move_vector(1.0, 1.0, 0.0, VIEW, RIGHT);
        assert!((m.length() - 2.5).abs() < EPSILON);
    }

    #[test]
    fn test_view_pitch_is_flattened() {
        let (_, controller) = setup();
        let looking_down = Vec3::new(0.0, -0.9, -0.1);
        let m = controller.move_vector(1.0, 0.0, 0.0, looking_down, RIGHT);
        assert!((m.length() - 2.5).abs() < EPSILON);
        assert_eq!(m.y, 0.0);
    }

    #[test]
    fn test_zero_input_is_zero() {
        let (_, controller) = setup();
        assert_eq!(controller.move_vector(0.0, 0.0, 0.0, VIEW, RIGHT), Vec3::ZERO);
        // Straight-down view has no horizontal component
        let down = Vec3::new(0.0, -1.0, 0.0);
        assert_eq!(controller.move_vector(1.0, 0.0, 0.0, down, Vec3::ZERO), Vec3::ZERO);
    }

    #[test]
    fn test_up_only_counts_when_flying() {
        let (mut bodies, mut controller) = setup();
        assert_eq!(controller.move_vector(0.0, 0.0, 1.0, VIEW, RIGHT), Vec3::ZERO);

        controller.toggle_flight(&mut bodies).unwrap();
        let m = controller.move_vector(0.0, 0.0, 1.0, VIEW, RIGHT);
        assert!((m.y - 2.5).abs() < EPSILON);
    }

    #[test]
    fn test_toggle_flight_keeps_body_in_sync() {
        let (mut bodies, mut controller) = setup();
        let key = controller.body();

        assert!(controller.toggle_flight(&mut bodies).unwrap());
        assert!(controller.is_flying());
        assert!(bodies.get(key).unwrap().flying);

        assert!(!controller.toggle_flight(&mut bodies).unwrap());
        assert!(!bodies.get(key).unwrap().flying);
    }

    #[test]
    fn test_jump_defers_to_body_grounded_flag() {
        let (mut bodies, controller) = setup();
        let key = controller.body();

        assert!(!controller.jump(&mut bodies).unwrap());
        assert_eq!(bodies.get(key).unwrap().velocity.y, 0.0);

        bodies.get_mut(key).unwrap().grounded = true;
        assert!(controller.jump(&mut bodies).unwrap());
        let body = bodies.get(key).unwrap();
        assert!(body.velocity.y > 0.0);
        assert!(!body.grounded);
    }

    #[test]
    fn test_update_moves_body_directly() {
        let (mut bodies, controller) = setup();
        let key = controller.body();
        let movement = controller.update(&mut bodies, 0.0, 1.0, 0.0, VIEW, RIGHT).unwrap();

        let body = bodies.get(key).unwrap();
        assert_eq!(movement, Vec3::new(2.5, 0.0, 0.0));
        assert_eq!(body.position, Vec3::new(2.5, 5.0, 0.0));
        assert_eq!(body.position_history()[0], body.position);
        assert_eq!(body.collider().unwrap().max.y, 5.0);
    }

    #[test]
    fn test_position_round_trip() {
        let (mut bodies, controller) = setup();
        controller.set_position(&mut bodies, Vec3::new(1.0, 2.0, 3.0)).unwrap();
        assert_eq!(controller.position(&bodies).unwrap(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_removed_body_is_an_error() {
        let (mut bodies, mut controller) = setup();
        let key = controller.body();
        bodies.remove(key);
        assert_eq!(controller.position(&bodies), Err(PhysicsError::UnknownBody(key)));
        assert_eq!(controller.toggle_flight(&mut bodies), Err(PhysicsError::UnknownBody(key)));
        // A failed toggle leaves the controller unchanged
        assert!(!controller.is_flying());
    }
}
