//! Voxel physics for gengine
//!
//! This crate provides the movement core for bodies in a block world:
//! - Axis-aligned boxes with penetration queries
//! - Rigid bodies with stepped move-and-collide against world boxes
//! - A tick engine that integrates gravity and forces
//! - Camera-relative movement for player-driven bodies

pub mod aabb;
pub mod body;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod movement;

// Re-export commonly used types
pub use aabb::AABB3D;
pub use body::{BodyKey, BodySet, BodyTuning, MoveFlags, RigidBody, DEFAULT_HISTORY_LENGTH, MIN_MASS};
pub use engine::{BodyListener, PhysicsEngine};
pub use error::PhysicsError;
pub use geometry::{CollisionGeometry, StaticGeometry};
pub use movement::{MovementController, DEFAULT_JUMP_FORCE, DEFAULT_MOVE_SPEED};
