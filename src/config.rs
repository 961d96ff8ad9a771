//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`GE_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use gengine_math::Vec3;
use gengine_physics::{BodyTuning, RigidBody, DEFAULT_JUMP_FORCE, DEFAULT_MOVE_SPEED};
use serde::{Serialize, Deserialize};
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Per-body physics coefficients
    #[serde(default)]
    pub physics: BodyTuning,
    /// Player body and movement
    #[serde(default)]
    pub player: PlayerConfig,
    /// Camera configuration
    #[serde(default)]
    pub camera: CameraConfig,
    /// Fixed-timestep simulation
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`GE_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        // Load user config (optional)
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // GE_PHYSICS__GRAVITY=9.8 -> physics.gravity = 9.8
        figment = figment.merge(Env::prefixed("GE_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }

    /// Build the player's rigid body at its spawn point
    ///
    /// The body uses the `physics` coefficients, except that its jump speed
    /// comes from `player.jump_force`.
    pub fn player_body(&self) -> RigidBody {
        let tuning = BodyTuning {
            jump_speed: self.player.jump_force,
            ..self.physics
        };
        RigidBody::new(
            Vec3::from_array(self.player.spawn),
            self.player.mass,
            self.player.width,
            self.player.height,
        )
        .with_tuning(tuning)
        .with_collider()
    }
}

/// Player configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Collider width on X and Z
    pub width: f32,
    /// Collider height
    pub height: f32,
    /// Body mass
    pub mass: f32,
    /// Movement speed; units per second when walking through the simulation
    pub move_speed: f32,
    /// Upward velocity of a jump
    pub jump_force: f32,
    /// Eye height as a fraction of body height, measured from the collider bottom
    pub eye_height_ratio: f32,
    /// How far below the collider bottom the ground probe looks
    pub ground_probe_depth: f32,
    /// Probe corner offset as a fraction of body width
    pub ground_probe_spread: f32,
    /// Spawn position [x, y, z]
    pub spawn: [f32; 3],
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            width: 0.6,
            height: 1.8,
            mass: 70.0,
            move_speed: DEFAULT_MOVE_SPEED,
            jump_force: DEFAULT_JUMP_FORCE,
            eye_height_ratio: 0.85,
            ground_probe_depth: 0.05,
            ground_probe_spread: 0.45,
            spawn: [0.5, 6.0, 0.5],
        }
    }
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Starting yaw in degrees (-90 looks down -Z)
    pub yaw: f32,
    /// Starting pitch in degrees
    pub pitch: f32,
    /// Degrees of rotation per unit of mouse delta
    pub mouse_sensitivity: f32,
    /// Maximum pitch angle in degrees
    pub pitch_limit: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            yaw: -90.0,
            pitch: 0.0,
            mouse_sensitivity: 0.1,
            pitch_limit: 89.0,
        }
    }
}

/// Simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed physics ticks per second
    pub tick_rate: u32,
    /// Longest frame delta fed to the accumulator, in seconds
    pub max_frame_delta: f32,
    /// How long the headless demo runs, in seconds
    pub demo_seconds: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            max_frame_delta: 0.25,
            demo_seconds: 6.0,
        }
    }
}

impl SimulationConfig {
    /// Length of one fixed tick in seconds
    pub fn tick_dt(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
    /// Log the player's position trail once per second
    pub log_trail: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_trail: false,
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
