//! Game simulation system
//!
//! Manages the game loop simulation including:
//! - Fixed-timestep accumulation of frame time
//! - Input → player movement
//! - Physics stepping
//! - Camera synchronization

use gengine_physics::{BodySet, CollisionGeometry, MoveFlags, PhysicsEngine, PhysicsError};

use crate::config::SimulationConfig;
use crate::player::Player;

/// Input gathered for one frame
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// Forward/backward axis in [-1, 1]
    pub forward: f32,
    /// Right/left axis in [-1, 1]
    pub right: f32,
    /// Up/down axis, only used while flying
    pub up: f32,
    /// Jump was pressed this frame
    pub jump: bool,
    /// Flight toggle was pressed this frame
    pub toggle_flight: bool,
    /// Mouse movement since the last frame
    pub mouse_delta: (f32, f32),
}

/// Result of a simulation update
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimulationResult {
    /// Fixed ticks run this frame
    pub ticks: u32,
    /// Union of the move flags from every tick
    pub flags: MoveFlags,
}

/// Manages the game simulation loop
///
/// Frame time is fed into an accumulator and consumed in fixed ticks. Each
/// tick integrates every registered body, resolves the player's movement
/// against the world and re-syncs the camera.
pub struct SimulationSystem {
    engine: PhysicsEngine,
    accumulator: f32,
    tick_dt: f32,
    max_frame_delta: f32,
    total_ticks: u64,
}

impl SimulationSystem {
    /// Create a new simulation system
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            engine: PhysicsEngine::new(),
            accumulator: 0.0,
            tick_dt: config.tick_dt(),
            max_frame_delta: config.max_frame_delta.max(0.0),
            total_ticks: 0,
        }
    }

    pub fn engine(&self) -> &PhysicsEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut PhysicsEngine {
        &mut self.engine
    }

    /// Length of one fixed tick in seconds
    pub fn tick_dt(&self) -> f32 {
        self.tick_dt
    }

    /// Ticks run since creation
    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    /// Run one simulation frame
    ///
    /// # Arguments
    /// * `frame_dt` - Wall time since the last frame, capped at `max_frame_delta`
    /// * `bodies` - Body arena the engine ticks
    /// * `player` - Player to drive from `input`
    /// * `geometry` - World boxes the player collides with
    /// * `input` - This frame's input
    pub fn update<G: CollisionGeometry + ?Sized>(
        &mut self,
        frame_dt: f32,
        bodies: &mut BodySet,
        player: &mut Player,
        geometry: &G,
        input: &FrameInput,
    ) -> Result<SimulationResult, PhysicsError> {
        // Cap dt to prevent spiral of death after a stall
        let dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, self.max_frame_delta)
        } else {
            0.0
        };

        // 1. Mouse look
        let (dx, dy) = input.mouse_delta;
        if dx != 0.0 || dy != 0.0 {
            player.camera.process_mouse(dx, dy);
        }

        // 2. One-shot actions
        if input.toggle_flight {
            let flying = player.toggle_flight(bodies)?;
            log::info!("Flight {}", if flying { "enabled" } else { "disabled" });
        }
        if input.jump {
            player.jump(bodies)?;
        }

        // 3. Fixed ticks
        let mut result = SimulationResult::default();
        self.accumulator += dt;
        while self.accumulator >= self.tick_dt {
            self.engine.tick(bodies, self.tick_dt);
            result.flags |= player.walk(
                bodies,
                geometry,
                (input.forward, input.right, input.up),
                self.tick_dt,
            )?;
            player.update(bodies, geometry)?;

            self.accumulator -= self.tick_dt;
            self.total_ticks += 1;
            result.ticks += 1;
        }

        // 4. Keep the camera on the body even when no tick ran
        if result.ticks == 0 {
            player.update(bodies, geometry)?;
        }

        if result.flags.contains(MoveFlags::LANDED) {
            log::debug!("Player landed");
        }
        Ok(result)
    }
}
