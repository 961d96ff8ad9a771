//! Physics engine: per-tick integration of registered bodies

use gengine_math::Vec3;
use slotmap::SecondaryMap;

use crate::body::{BodyKey, BodySet, RigidBody};
use crate::error::PhysicsError;

/// Callback fired for a body after each tick finishes updating it
pub type BodyListener = Box<dyn FnMut(BodyKey, &RigidBody)>;

/// Engine-side state for one registered body
#[derive(Default)]
struct Registration {
    listener: Option<BodyListener>,
}

/// Applies gravity and integrates registered rigid bodies
///
/// The engine does not own bodies. It keeps a set of [`BodyKey`]s into a
/// caller-owned [`BodySet`], which is borrowed for the duration of each
/// [`tick`](Self::tick). Keys whose body has since been removed are dropped
/// from the registry on the next tick.
#[derive(Default)]
pub struct PhysicsEngine {
    registrations: SecondaryMap<BodyKey, Registration>,
}

impl PhysicsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a body for ticking
    ///
    /// Registering an already registered body keeps its existing listener.
    pub fn register(&mut self, key: BodyKey) {
        if !self.registrations.contains_key(key) {
            self.registrations.insert(key, Registration::default());
        }
    }

    /// Register a body together with its post-tick listener
    pub fn register_with_listener(&mut self, key: BodyKey, listener: BodyListener) {
        self.registrations.insert(
            key,
            Registration {
                listener: Some(listener),
            },
        );
    }

    /// Stop ticking a body; unregistering a non-member does nothing
    pub fn unregister(&mut self, key: BodyKey) {
        self.registrations.remove(key);
    }

    /// Attach or replace the listener of a registered body
    pub fn set_listener(&mut self, key: BodyKey, listener: BodyListener) -> Result<(), PhysicsError> {
        let registration = self
            .registrations
            .get_mut(key)
            .ok_or(PhysicsError::NotRegistered(key))?;
        registration.listener = Some(listener);
        Ok(())
    }

    /// Remove the listener of a registered body
    pub fn clear_listener(&mut self, key: BodyKey) -> Result<(), PhysicsError> {
        let registration = self
            .registrations
            .get_mut(key)
            .ok_or(PhysicsError::NotRegistered(key))?;
        registration.listener = None;
        Ok(())
    }

    pub fn is_registered(&self, key: BodyKey) -> bool {
        self.registrations.contains_key(key)
    }

    /// Number of registered bodies
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Iterate over registered keys
    pub fn registered(&self) -> impl Iterator<Item = BodyKey> + '_ {
        self.registrations.keys()
    }

    /// Advance every registered body by `dt` seconds
    ///
    /// Bodies are processed in slot order. Each one is integrated and then
    /// its listener, if any, is invoked before moving on to the next body.
    pub fn tick(&mut self, bodies: &mut BodySet, dt: f32) {
        let mut stale = Vec::new();

        for (key, registration) in self.registrations.iter_mut() {
            let Some(body) = bodies.get_mut(key) else {
                stale.push(key);
                continue;
            };

            integrate(body, dt);

            if let Some(listener) = registration.listener.as_mut() {
                listener(key, &*body);
            }
        }

        for key in stale {
            log::warn!("Dropping registration for removed body {:?}", key);
            self.registrations.remove(key);
        }

        log::trace!("Physics tick dt={:.4} bodies={}", dt, self.registrations.len());
    }
}

/// One explicit Euler step for a single body
fn integrate(body: &mut RigidBody, dt: f32) {
    if !body.grounded && !body.flying {
        body.force.y += body.mass() * -body.tuning.gravity;
    }

    let acceleration = body.force / body.mass();
    body.velocity += acceleration * dt;

    if body.velocity.y < body.tuning.terminal_velocity {
        body.velocity.y = body.tuning.terminal_velocity;
    }

    // Grounded bodies never carry downward velocity into the next tick
    if body.grounded && body.velocity.y < 0.0 {
        body.velocity.y = 0.0;
    }

    let displacement = body.velocity * dt;

    body.append_history();
    body.position += displacement;
    body.update_collider();

    let distance = displacement.length();
    body.trip_distance += distance;
    if distance == 0.0 && body.trip_distance > 0.0 {
        body.trip_distance = 0.0;
    }

    body.force = Vec3::ZERO;
}
