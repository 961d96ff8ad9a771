//! Integration tests for configuration loading
//!
//! Tests that verify config loading from files and environment variables.

use gengine::config::AppConfig;
use serial_test::serial;

#[test]
#[serial]
fn test_env_override() {
    std::env::set_var("GE_PHYSICS__GRAVITY", "9.5");
    std::env::set_var("GE_DEBUG__LOG_LEVEL", "debug");
    let config = AppConfig::load().unwrap();
    assert_eq!(config.physics.gravity, 9.5);
    assert_eq!(config.debug.log_level, "debug");
    std::env::remove_var("GE_PHYSICS__GRAVITY");
    std::env::remove_var("GE_DEBUG__LOG_LEVEL");
}

#[test]
#[serial]
fn test_env_override_reaches_player_body() {
    std::env::set_var("GE_PLAYER__JUMP_FORCE", "6.0");
    std::env::set_var("GE_PLAYER__MASS", "90.0");
    let config = AppConfig::load().unwrap();
    let body = config.player_body();
    assert_eq!(body.tuning.jump_speed, 6.0);
    assert_eq!(body.mass(), 90.0);
    std::env::remove_var("GE_PLAYER__JUMP_FORCE");
    std::env::remove_var("GE_PLAYER__MASS");
}

#[test]
#[serial]
fn test_default_file_loading() {
    std::env::remove_var("GE_PHYSICS__GRAVITY");

    let cwd = std::env::current_dir().unwrap();
    assert!(cwd.join("config/default.toml").exists());

    let config = AppConfig::load().unwrap();
    // Values shipped in config/default.toml, unless a local user.toml overrides them
    if !cwd.join("config/user.toml").exists() {
        assert_eq!(config.physics.gravity, 12.0);
        assert_eq!(config.physics.terminal_velocity, -10.0);
        assert_eq!(config.player.height, 1.8);
        assert_eq!(config.camera.pitch_limit, 89.0);
    }
}

#[test]
#[serial]
fn test_invalid_env_value_is_an_error() {
    std::env::set_var("GE_SIMULATION__TICK_RATE", "fast");
    let result = AppConfig::load();
    std::env::remove_var("GE_SIMULATION__TICK_RATE");

    let err = result.unwrap_err();
    assert!(err.to_string().starts_with("Configuration error"));
}
