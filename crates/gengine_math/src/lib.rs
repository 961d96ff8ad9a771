//! 3D Mathematics Library
//!
//! This crate provides the vector type shared by the gengine physics core
//! and its consumers.
//!
//! ## Core Types
//!
//! - [`Vec3`] - 3D vector with x, y, z components (Y up)

mod vec3;

pub use vec3::{sign, Vec3};
