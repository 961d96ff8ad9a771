//! End-to-end movement scenarios
//!
//! These tests drive bodies through the engine tick and the collision sweep
//! together, the way a game loop does:
//! 1. Free fall reaches terminal velocity
//! 2. Walls stop horizontal movement at the first touching sub-step
//! 3. Bodies sunk into the ground are lifted out
//! 4. A falling body comes to rest on a voxel floor, even from a great height
//! 5. A jump resolved against the world leaves the ground and comes back

use gengine_math::Vec3;
use gengine_physics::{
    AABB3D, BodySet, CollisionGeometry, MoveFlags, MovementController, PhysicsEngine, RigidBody,
    StaticGeometry, DEFAULT_HISTORY_LENGTH,
};

const DT: f32 = 1.0 / 60.0;
const EPSILON: f32 = 0.0001;

fn player_at(position: Vec3) -> RigidBody {
    RigidBody::new(position, 70.0, 0.6, 1.8)
}

/// 8x8 voxel floor whose top face is at y = 0
fn voxel_floor() -> StaticGeometry {
    let mut geometry = StaticGeometry::new();
    for x in -4..4 {
        for z in -4..4 {
            geometry.add_block(x, -1, z);
        }
    }
    geometry
}

// ==================== Engine Tick ====================

#[test]
fn test_one_second_of_free_fall_hits_terminal_velocity() {
    let mut bodies = BodySet::new();
    let key = bodies.insert(player_at(Vec3::new(0.0, 10.0, 0.0)));
    let mut engine = PhysicsEngine::new();
    engine.register(key);

    for _ in 0..60 {
        engine.tick(&mut bodies, DT);
    }

    let body = bodies.get(key).unwrap();
    // Unclamped it would be -12; the floor is -10
    assert_eq!(body.velocity.y, -10.0);
    assert!(body.position.y < 10.0);
    assert_eq!(body.position.x, 0.0);
    assert_eq!(body.position.z, 0.0);
}

#[test]
fn test_grounded_bodies_never_keep_downward_velocity() {
    let mut bodies = BodySet::new();
    let key = bodies.insert(player_at(Vec3::new(0.0, 2.0, 0.0)).with_velocity(Vec3::new(1.0, -6.0, 0.0)));
    bodies.get_mut(key).unwrap().grounded = true;
    let mut engine = PhysicsEngine::new();
    engine.register(key);

    for _ in 0..10 {
        engine.tick(&mut bodies, DT);
        let body = bodies.get(key).unwrap();
        assert_eq!(body.velocity.y, 0.0);
        assert_eq!(body.position.y, 2.0);
    }
    // Horizontal velocity is untouched
    assert_eq!(bodies.get(key).unwrap().velocity.x, 1.0);
}

#[test]
fn test_history_never_exceeds_cap() {
    let mut bodies = BodySet::new();
    let key = bodies.insert(player_at(Vec3::new(0.0, 50.0, 0.0)));
    let mut engine = PhysicsEngine::new();
    engine.register(key);

    let mut last_before = Vec3::ZERO;
    for _ in 0..(DEFAULT_HISTORY_LENGTH * 3) {
        last_before = bodies.get(key).unwrap().position;
        engine.tick(&mut bodies, DT);
        assert!(bodies.get(key).unwrap().position_history().len() <= DEFAULT_HISTORY_LENGTH);
    }

    let body = bodies.get(key).unwrap();
    assert_eq!(body.position_history().len(), DEFAULT_HISTORY_LENGTH);
    assert_eq!(body.position_history()[0], last_before);
}

// ==================== Collision Sweep ====================

#[test]
fn test_corridor_walls_block_horizontal_move() {
    // Walls at x <= -0.5 and x >= 0.5; the 0.6-wide body fits between them
    let left = AABB3D::new(Vec3::new(-1.5, 0.0, -5.0), Vec3::new(-0.5, 5.0, 5.0));
    let right = AABB3D::new(Vec3::new(0.5, 0.0, -5.0), Vec3::new(1.5, 5.0, 5.0));
    let ground = AABB3D::new(Vec3::new(-5.0, -1.0, -5.0), Vec3::new(5.0, 0.0, 5.0));
    let walls = [left, right];

    let mut body = player_at(Vec3::new(0.0, 2.0, 0.0)).with_collider();
    body.grounded = true;

    let flags = body.move_and_collide(Vec3::new(2.0, 0.0, 0.0), Some(&ground), None, &walls);

    // The first sub-step (0.5) already reaches into the right wall
    assert!(flags.contains(MoveFlags::BLOCKED_HORIZONTAL));
    assert_eq!(body.position.x, 0.0);
    let collider = *body.collider().unwrap();
    assert!(walls.iter().all(|w| !collider.intersects(w)));
}

#[test]
fn test_sweep_stops_at_first_touching_substep() {
    let right = AABB3D::new(Vec3::new(0.45, 0.0, -5.0), Vec3::new(1.5, 5.0, 5.0));
    let ground = AABB3D::new(Vec3::new(-5.0, -1.0, -5.0), Vec3::new(5.0, 0.0, 5.0));

    let mut body = player_at(Vec3::new(0.0, 2.0, 0.0)).with_collider();
    body.grounded = true;

    // Four sub-steps of 0.1; the second one reaches past the wall at x = 0.45
    let flags = body.move_and_collide(Vec3::new(0.4, 0.0, 0.0), Some(&ground), None, &[right]);

    assert!(flags.contains(MoveFlags::BLOCKED_HORIZONTAL));
    assert!((body.position.x - 0.1).abs() < EPSILON);
    assert!(body.collider().unwrap().max.x < right.min.x);
}

#[test]
fn test_ground_snap_through_world_query() {
    let geometry = voxel_floor();
    // Collider bottom 0.3 below the floor top
    let mut body = player_at(Vec3::new(0.5, 1.5, 0.5)).with_collider();

    let flags = body.resolve_against(Vec3::ZERO, &geometry);

    assert!(flags.contains(MoveFlags::GROUND_SNAP));
    assert!(flags.contains(MoveFlags::LANDED));
    assert!(body.grounded);
    let bottom = body.collider().unwrap().min.y;
    assert!(bottom >= 0.2 - EPSILON);
    assert!(!geometry.is_solid(body.position));
}

#[test]
fn test_falling_body_comes_to_rest_on_floor() {
    let geometry = voxel_floor();
    let mut bodies = BodySet::new();
    let key = bodies.insert(player_at(Vec3::new(0.5, 5.0, 0.5)));
    let mut engine = PhysicsEngine::new();
    engine.register(key);

    for _ in 0..180 {
        engine.tick(&mut bodies, DT);
        bodies
            .get_mut(key)
            .unwrap()
            .resolve_against(Vec3::ZERO, &geometry);
    }

    let body = bodies.get(key).unwrap();
    assert!(body.grounded);
    assert_eq!(body.velocity.y, 0.0);
    let bottom = body.collider().unwrap().min.y;
    assert!(bottom >= -0.001);
    assert!(bottom <= 0.5);

    // Stays put once resting
    let rest = body.position;
    engine.tick(&mut bodies, DT);
    bodies
        .get_mut(key)
        .unwrap()
        .resolve_against(Vec3::ZERO, &geometry);
    assert_eq!(bodies.get(key).unwrap().position, rest);
}

#[test]
fn test_terminal_velocity_fall_lands_on_floor() {
    let geometry = voxel_floor();

    // Spread the spawns so the landing sub-step phase varies
    for i in 0..40 {
        let spawn_y = 300.0 + i as f32 * 0.25;
        let mut bodies = BodySet::new();
        let key = bodies.insert(player_at(Vec3::new(0.5, spawn_y, 0.5)));
        let mut engine = PhysicsEngine::new();
        engine.register(key);

        for _ in 0..600 {
            engine.tick(&mut bodies, DT);
            bodies
                .get_mut(key)
                .unwrap()
                .resolve_against(Vec3::ZERO, &geometry);
        }

        let body = bodies.get(key).unwrap();
        let bottom = body.collider().unwrap().min.y;
        assert!(body.grounded, "spawn {spawn_y} never landed");
        assert!(bottom >= -0.001, "spawn {spawn_y} ended at {bottom}");
        assert!(bottom <= 0.5, "spawn {spawn_y} ended at {bottom}");
    }
}

#[test]
fn test_jump_off_floor_gains_height() {
    let geometry = voxel_floor();
    let mut bodies = BodySet::new();
    // Collider bottom 0.1 above the floor top
    let key = bodies.insert(player_at(Vec3::new(0.5, 1.9, 0.5)).with_collider());
    bodies.get_mut(key).unwrap().grounded = true;
    let mut engine = PhysicsEngine::new();
    engine.register(key);

    let start = bodies.get(key).unwrap().position.y;
    bodies.get_mut(key).unwrap().jump();
    assert!(!bodies.get(key).unwrap().grounded);

    let mut peak = start;
    let mut landed = false;
    for _ in 0..240 {
        engine.tick(&mut bodies, DT);
        let flags = bodies
            .get_mut(key)
            .unwrap()
            .resolve_against(Vec3::ZERO, &geometry);
        peak = peak.max(bodies.get(key).unwrap().position.y);
        landed |= flags.contains(MoveFlags::LANDED);
    }

    assert!(peak > start + 1.0, "peak {peak} from {start}");
    assert!(landed);
    let body = bodies.get(key).unwrap();
    assert!(body.grounded);
    assert!(body.collider().unwrap().min.y >= -0.001);
}

#[test]
fn test_walking_into_pillar_stops_short() {
    let mut geometry = voxel_floor();
    for y in 0..3 {
        geometry.add_block(2, y, 0);
    }

    let mut bodies = BodySet::new();
    let key = bodies.insert(player_at(Vec3::new(0.5, 2.0, 0.5)).with_collider());
    bodies.get_mut(key).unwrap().grounded = true;
    let controller = MovementController::new(key, 0.25, 4.0);
    let view = Vec3::new(1.0, 0.0, 0.0);
    let right = Vec3::new(0.0, 0.0, 1.0);

    for _ in 0..40 {
        let movement = controller.move_vector(1.0, 0.0, 0.0, view, right);
        bodies
            .get_mut(key)
            .unwrap()
            .resolve_against(movement, &geometry);
    }

    let body = bodies.get(key).unwrap();
    assert!(body.grounded);
    assert!(body.collider().unwrap().max.x < 2.0);
    assert!(body.position.x > 1.0);
}

// ==================== AABB ====================

#[test]
fn test_intersection_is_symmetric() {
    let a = AABB3D::block(Vec3::ZERO);
    let b = AABB3D::new(Vec3::new(0.8, 0.2, 0.1), Vec3::new(1.8, 1.2, 1.1));

    assert_eq!(a.intersects(&b), b.intersects(&a));

    let ab = a.intersection(&b).unwrap();
    let ba = b.intersection(&a).unwrap();
    assert!((ab.x - 0.2).abs() < EPSILON);
    assert!((ab + ba).length() < EPSILON);

    let far = AABB3D::block(Vec3::new(5.0, 0.0, 0.0));
    assert!(a.intersection(&far).is_none());
    assert!(far.intersection(&a).is_none());
}
