//! Player glue: one body, its movement controller and a first-person camera

use gengine_math::Vec3;
use gengine_physics::{BodyKey, BodySet, CollisionGeometry, MoveFlags, MovementController, PhysicsError};

use crate::camera::Camera;
use crate::config::AppConfig;

/// A player-controlled body with an eye-level camera
#[derive(Clone, Debug)]
pub struct Player {
    /// First-person camera, kept at eye height by [`Player::update`]
    pub camera: Camera,
    controller: MovementController,
    /// Grounded this frame, by the body flag or the block probe
    pub on_ground: bool,
    height: f32,
    width: f32,
    eye_height_ratio: f32,
    probe_depth: f32,
    probe_spread: f32,
}

impl Player {
    /// Spawn the player body from config and insert it into `bodies`
    pub fn spawn(bodies: &mut BodySet, config: &AppConfig) -> Self {
        let body = bodies.insert(config.player_body());
        Self::attach(body, bodies, config)
    }

    /// Build a player around an existing body
    pub fn attach(body: BodyKey, bodies: &BodySet, config: &AppConfig) -> Self {
        let player = &config.player;
        let controller = MovementController::new(body, player.move_speed, player.jump_force);
        let mut this = Self {
            camera: Camera::from_config(Vec3::ZERO, &config.camera),
            controller,
            on_ground: false,
            height: player.height,
            width: player.width,
            eye_height_ratio: player.eye_height_ratio,
            probe_depth: player.ground_probe_depth,
            probe_spread: player.ground_probe_spread,
        };
        if let Some(b) = bodies.get(body) {
            this.camera.position = this.eye_position(b.position);
        }
        this
    }

    /// Key of the player's body
    pub fn body(&self) -> BodyKey {
        self.controller.body()
    }

    pub fn controller(&self) -> &MovementController {
        &self.controller
    }

    pub fn is_flying(&self) -> bool {
        self.controller.is_flying()
    }

    /// Eye position for a body anchored at `position`
    ///
    /// Measured up from the collider bottom, which sits one body height
    /// below the anchor.
    pub fn eye_position(&self, position: Vec3) -> Vec3 {
        let bottom = position.y - self.height;
        position.with_y(bottom + self.height * self.eye_height_ratio)
    }

    /// Points just below the collider bottom that count as standing on something
    fn probe_points(&self, position: Vec3) -> [Vec3; 5] {
        let foot = position.with_y(position.y - self.height - self.probe_depth);
        let h = self.width * self.probe_spread;
        [
            foot,
            foot + Vec3::new(-h, 0.0, -h),
            foot + Vec3::new(h, 0.0, -h),
            foot + Vec3::new(-h, 0.0, h),
            foot + Vec3::new(h, 0.0, h),
        ]
    }

    /// Refresh `on_ground` and move the camera to eye height
    pub fn update<G: CollisionGeometry + ?Sized>(
        &mut self,
        bodies: &BodySet,
        geometry: &G,
    ) -> Result<(), PhysicsError> {
        let key = self.body();
        let body = bodies.get(key).ok_or(PhysicsError::UnknownBody(key))?;

        self.on_ground = body.grounded
            || self
                .probe_points(body.position)
                .iter()
                .any(|&point| geometry.is_solid(point));

        self.camera.position = self.eye_position(body.position);
        Ok(())
    }

    /// Jump if the body is grounded and not flying
    ///
    /// Returns whether the jump happened.
    pub fn jump(&mut self, bodies: &mut BodySet) -> Result<bool, PhysicsError> {
        let key = self.body();
        let body = bodies.get_mut(key).ok_or(PhysicsError::UnknownBody(key))?;
        if !body.grounded || self.is_flying() {
            return Ok(false);
        }

        body.jump();
        self.on_ground = false;
        log::debug!("Player jumped from {:?}", body.position);
        Ok(true)
    }

    pub fn toggle_flight(&mut self, bodies: &mut BodySet) -> Result<bool, PhysicsError> {
        self.controller.toggle_flight(bodies)
    }

    /// Nudge forward along the camera's horizontal view, ignoring collisions
    pub fn move_forward(&self, bodies: &mut BodySet, amount: f32) -> Result<Vec3, PhysicsError> {
        self.controller
            .update(bodies, amount, 0.0, 0.0, self.camera.front(), self.camera.right())
    }

    /// Nudge sideways along the camera's right vector, ignoring collisions
    pub fn move_right(&self, bodies: &mut BodySet, amount: f32) -> Result<Vec3, PhysicsError> {
        self.controller
            .update(bodies, 0.0, amount, 0.0, self.camera.front(), self.camera.right())
    }

    /// Walk through the world for one tick of length `dt`
    ///
    /// The controller's movement vector is scaled by `dt` and resolved
    /// against `geometry`, so walls and floors stop the player.
    pub fn walk<G: CollisionGeometry + ?Sized>(
        &self,
        bodies: &mut BodySet,
        geometry: &G,
        input: (f32, f32, f32),
        dt: f32,
    ) -> Result<MoveFlags, PhysicsError> {
        let (forward, right, up) = input;
        let movement = self
            .controller
            .move_vector(forward, right, up, self.camera.front(), self.camera.right())
            * dt;

        let key = self.body();
        let body = bodies.get_mut(key).ok_or(PhysicsError::UnknownBody(key))?;
        Ok(body.resolve_against(movement, geometry))
    }
}
