//! gengine - headless movement demo
//!
//! Drops the player onto a small block scene and drives it with a scripted
//! input timeline, logging its state once per simulated second.

use gengine::config::AppConfig;
use gengine::player::Player;
use gengine::scene::SceneBuilder;
use gengine::systems::{FrameInput, SimulationSystem};
use gengine_math::Vec3;
use gengine_physics::{BodyKey, BodySet, PhysicsError, RigidBody};

/// Simulated frame length fed to the simulation system
const FRAME_DT: f32 = 1.0 / 30.0;

/// Scripted input for the frame starting at `time` seconds
fn scripted_input(time: f32, previous: f32) -> FrameInput {
    let crossed = |mark: f32| previous < mark && time >= mark;
    let mut input = FrameInput::default();

    if (1.0..3.0).contains(&time) {
        input.forward = 1.0;
        input.mouse_delta = (10.0, 0.0);
    }
    if (3.0..4.0).contains(&time) {
        input.right = 1.0;
    }
    input.jump = crossed(3.0);
    input.toggle_flight = crossed(4.0) || crossed(5.0);
    if (4.0..5.0).contains(&time) {
        input.up = 1.0;
    }
    input
}

fn run(config: &AppConfig) -> Result<(), PhysicsError> {
    let builder = SceneBuilder::new()
        .add_floor(-1, 8)
        .add_cube(2, 0, -6, 3)
        .add_pillar(-4, -4, 0, 4)
        .with_player_start(Vec3::from_array(config.player.spawn));
    let spawn = builder.player_start();
    let geometry = builder.build();

    let mut bodies = BodySet::new();
    let mut player = Player::spawn(&mut bodies, config);
    if let Some(spawn) = spawn {
        player.controller().set_position(&mut bodies, spawn)?;
    }

    let mut sim = SimulationSystem::new(&config.simulation);
    if config.debug.log_trail {
        let every = config.simulation.tick_rate.max(1);
        let mut ticks = 0u32;
        sim.engine_mut().register_with_listener(
            player.body(),
            Box::new(move |key: BodyKey, body: &RigidBody| {
                ticks += 1;
                if ticks % every == 0 {
                    log::info!(
                        "Trail {:?}: {} points, trip {:.2}, oldest {:?}",
                        key,
                        body.position_history().len(),
                        body.trip_distance,
                        body.position_history().back()
                    );
                }
            }),
        );
    } else {
        sim.engine_mut().register(player.body());
    }

    log::info!(
        "Scene ready: {} blocks, player at {:?}, {} Hz",
        geometry.len(),
        player.controller().position(&bodies)?,
        config.simulation.tick_rate
    );

    let frames = (config.simulation.demo_seconds.max(0.0) / FRAME_DT).ceil() as u32;
    let mut previous = -1.0;
    for frame in 0..frames {
        let time = frame as f32 * FRAME_DT;
        let input = scripted_input(time, previous);
        previous = time;

        let result = sim.update(FRAME_DT, &mut bodies, &mut player, &geometry, &input)?;
        if !result.flags.is_empty() {
            log::debug!("t={:.2}s flags {:?}", time, result.flags);
        }

        if frame % 30 == 29 {
            let key = player.body();
            let body = bodies.get(key).ok_or(PhysicsError::UnknownBody(key))?;
            log::info!(
                "t={:.1}s pos=({:.2}, {:.2}, {:.2}) vel_y={:.2} grounded={} flying={} look=({:.2}, {:.2}, {:.2})",
                time + FRAME_DT,
                body.position.x,
                body.position.y,
                body.position.z,
                body.velocity.y,
                player.on_ground,
                body.flying,
                player.camera.front().x,
                player.camera.front().y,
                player.camera.front().z
            );
        }
    }

    log::info!("Simulated {} ticks", sim.total_ticks());
    Ok(())
}

fn main() {
    // Load configuration before logging so it can pick the filter
    let config = AppConfig::load();
    let log_level = config
        .as_ref()
        .map(|c| c.debug.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = config.unwrap_or_else(|e| {
        log::warn!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });

    log::info!("Starting gengine");
    if let Err(e) = run(&config) {
        log::error!("Simulation failed: {}", e);
        std::process::exit(1);
    }
}
