//! gengine - voxel movement and collision
//!
//! Application layer on top of the physics crates: configuration, the
//! first-person camera, player glue, scene construction and the fixed-step
//! simulation system.

pub mod camera;
pub mod config;
pub mod player;
pub mod scene;
pub mod systems;
