//! Physics error types
//!
//! The numerical core never fails: bad mass is clamped, inverted boxes are
//! reordered, and moves without a collider take the unstepped path. The only
//! failures are identity lookups against a [`BodySet`](crate::BodySet) or the
//! engine registry.

use std::fmt;

use crate::body::BodyKey;

/// Error type for physics lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicsError {
    /// The key does not refer to a live body (never inserted, or removed)
    UnknownBody(BodyKey),
    /// The body exists but is not registered with the engine
    NotRegistered(BodyKey),
}

impl fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicsError::UnknownBody(key) => write!(f, "Unknown rigid body: {:?}", key),
            PhysicsError::NotRegistered(key) => {
                write!(f, "Rigid body not registered with the engine: {:?}", key)
            }
        }
    }
}

impl std::error::Error for PhysicsError {}
