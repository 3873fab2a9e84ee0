//! Physics Tests - Character Controller Against Collision Worlds
//!
//! Slopes, ledges, jumps and the invariants the substepped tick must keep.

use glam::{Vec2, Vec3};
use island_portfolio_engine::config::PhysicsConfig;
use island_portfolio_engine::input::MovementIntent;
use island_portfolio_engine::physics::{CollisionWorld, Triangle};
use island_portfolio_engine::player::{ArrivalAction, Character, CharacterController};
use island_portfolio_engine::world::ground_strip;

const DT: f32 = 1.0 / 60.0;

/// Plane y = -0.3158 x, about 17.5 degrees, descending to the right.
fn slope_world() -> CollisionWorld {
    CollisionWorld::build(&[Triangle::new(
        Vec3::new(-200.0, 63.16, -5.0),
        Vec3::new(0.0, 0.0, 400.0),
        Vec3::new(200.0, -63.16, -5.0),
    )])
}

fn slope_height(x: f32) -> f32 {
    -0.3158 * x
}

fn intent(direction: i32, jump: bool) -> MovementIntent {
    MovementIntent { direction, jump }
}

fn settle(controller: &CharacterController, world: &CollisionWorld, feet: Vec2) -> Character {
    let mut ch = Character::new(feet, controller.physics());
    for _ in 0..60 {
        controller.drive(&mut ch, MovementIntent::NEUTRAL);
        controller.step(&mut ch, world, DT);
    }
    ch
}

fn assert_invariants(ch: &Character, physics: &PhysicsConfig) {
    assert!(ch.is_finite());
    assert!(ch.grounded_frames() <= physics.grace_frames);
    assert_eq!(ch.is_grounded(), ch.grounded_frames() > 0);
    assert!(ch.velocity.y >= physics.min_vertical_velocity);
    assert!(ch.velocity.y <= physics.max_vertical_velocity);
}

// ============================================================================
// Slopes
// ============================================================================

#[test]
fn test_walking_downhill_stays_on_slope() {
    let controller = CharacterController::default();
    let world = slope_world();
    let mut ch = settle(&controller, &world, Vec2::new(0.0, 0.5));
    assert!(ch.is_grounded());

    for _ in 0..120 {
        controller.drive(&mut ch, intent(1, false));
        controller.step(&mut ch, &world, DT);
        assert_invariants(&ch, controller.physics());
        assert!(ch.is_grounded(), "lost ground at x={}", ch.position.x);
        assert!((ch.position.y - slope_height(ch.position.x)).abs() < 0.15);
    }
    assert!(ch.position.x > 10.0);
}

#[test]
fn test_walking_uphill_climbs() {
    let controller = CharacterController::default();
    let world = slope_world();
    let mut ch = settle(&controller, &world, Vec2::new(0.0, 0.5));

    for _ in 0..90 {
        controller.drive(&mut ch, intent(-1, false));
        controller.step(&mut ch, &world, DT);
        assert_invariants(&ch, controller.physics());
    }
    assert!(ch.position.x < -5.0);
    assert!(ch.position.y > 1.5);
    assert!((ch.position.y - slope_height(ch.position.x)).abs() < 0.15);
}

#[test]
fn test_resting_on_slope_tracks_surface() {
    let controller = CharacterController::default();
    let world = slope_world();
    let mut ch = settle(&controller, &world, Vec2::new(0.0, 0.5));
    for _ in 0..120 {
        controller.drive(&mut ch, MovementIntent::NEUTRAL);
        controller.step(&mut ch, &world, DT);
        assert_invariants(&ch, controller.physics());
        assert!(ch.is_grounded());
    }
    // gravity projected onto the slope creeps downhill, never uphill
    assert!(ch.position.x >= 0.0);
    assert!((ch.position.y - slope_height(ch.position.x)).abs() < 0.15);
    assert!(ch.has_ground_normal);
    assert!(ch.ground_normal.x > 0.2);
}

// ============================================================================
// Ground checks
// ============================================================================

/// Flat slab at height `y` facing downward.
fn ceiling_world(y: f32) -> CollisionWorld {
    CollisionWorld::build(&[Triangle::new(
        Vec3::new(-50.0, y, -50.0),
        Vec3::new(100.0, y, 50.0),
        Vec3::new(-50.0, y, 50.0),
    )])
}

/// Vertical wall in the plane x = `x`, facing -X.
fn wall_world(x: f32) -> CollisionWorld {
    CollisionWorld::build(&[Triangle::new(
        Vec3::new(x, -100.0, -10.0),
        Vec3::new(x, 0.0, 50.0),
        Vec3::new(x, 100.0, -10.0),
    )])
}

#[test]
fn test_snap_pulls_falling_capsule_onto_ground_below_feet() {
    let controller = CharacterController::default();
    let world = CollisionWorld::build(&ground_strip(-40.0, 40.0, 0.0));
    let mut ch = Character::new(Vec2::new(1.0, 0.2), controller.physics());
    assert!(!ch.is_grounded());

    controller.step(&mut ch, &world, DT);
    assert!(ch.is_grounded());
    assert!(ch.position.y.abs() < 0.01, "y = {}", ch.position.y);
    assert!(ch.velocity.y.abs() < 1e-4);
    assert!(ch.has_ground_normal);
    assert_invariants(&ch, controller.physics());
}

#[test]
fn test_snap_ignores_ground_beyond_reach() {
    let controller = CharacterController::default();
    let world = CollisionWorld::build(&ground_strip(-40.0, 40.0, 0.0));
    let mut ch = Character::new(Vec2::new(1.0, 0.6), controller.physics());

    controller.step(&mut ch, &world, DT);
    assert!(!ch.is_grounded());
    assert!(ch.position.y > 0.5);
    assert!(ch.velocity.y < 0.0);
}

#[test]
fn test_snap_does_not_cancel_a_jump() {
    let controller = CharacterController::default();
    let world = CollisionWorld::build(&ground_strip(-40.0, 40.0, 0.0));
    let mut ch = settle(&controller, &world, Vec2::new(0.0, 0.5));
    controller.drive(&mut ch, intent(0, true));

    // grace runs out within the first frame while still under snap reach
    for _ in 0..3 {
        controller.step(&mut ch, &world, DT);
    }
    assert!(!ch.is_grounded());
    assert!(ch.position.y > 0.5);
    assert!(ch.velocity.y > 0.0);
}

#[test]
fn test_ceiling_stops_upward_motion() {
    let controller = CharacterController::default();
    let world = ceiling_world(1.9);
    let mut ch = Character::new(Vec2::ZERO, controller.physics());
    ch.touch_ground(controller.physics().grace_frames);
    ch.velocity.y = 20.0;

    controller.step(&mut ch, &world, DT);
    assert!(!ch.is_grounded());
    assert!(!ch.has_ground_normal);
    assert!(ch.velocity.y <= 0.0, "vy = {}", ch.velocity.y);
    // capsule top stays under the slab
    assert!(ch.capsule.end.y + ch.capsule.radius <= 1.9 + 1e-3);
}

#[test]
fn test_open_air_jump_keeps_rising() {
    let controller = CharacterController::default();
    let world = CollisionWorld::empty();
    let mut ch = Character::new(Vec2::ZERO, controller.physics());
    ch.touch_ground(controller.physics().grace_frames);
    ch.velocity.y = 20.0;

    controller.step(&mut ch, &world, DT);
    assert!(ch.velocity.y > 15.0);
}

#[test]
fn test_steep_wall_only_spends_grace() {
    let controller = CharacterController::default();
    let physics = controller.physics();
    let world = wall_world(0.3);
    let mut ch = Character::new(Vec2::new(0.0, 5.0), physics);
    ch.touch_ground(physics.grace_frames);
    ch.velocity.x = 5.0;

    // one contact per substep, none of them refill the counter
    controller.step(&mut ch, &world, DT);
    assert_eq!(ch.grounded_frames(), physics.grace_frames.saturating_sub(physics.substeps));
    assert!(!ch.is_grounded());
    assert!(!ch.has_ground_normal);
    // pushed out of the wall but not stopped vertically
    assert!(ch.position.x <= 0.3 - physics.capsule_radius + 1e-3);
    assert!(ch.velocity.y < 0.0);
    assert_invariants(&ch, physics);
}

// ============================================================================
// Jumps and ledges
// ============================================================================

#[test]
fn test_jump_rises_and_lands() {
    let controller = CharacterController::default();
    let world = CollisionWorld::build(&ground_strip(-40.0, 40.0, 0.0));
    let mut ch = settle(&controller, &world, Vec2::new(0.0, 0.5));
    let ground_y = ch.position.y;

    controller.drive(&mut ch, intent(0, true));
    assert_eq!(ch.velocity.y, 20.0);

    let mut apex = ground_y;
    let mut left_ground = false;
    for _ in 0..120 {
        controller.drive(&mut ch, MovementIntent::NEUTRAL);
        controller.step(&mut ch, &world, DT);
        assert_invariants(&ch, controller.physics());
        apex = apex.max(ch.position.y);
        left_ground |= !ch.is_grounded();
    }
    assert!(left_ground);
    // v^2 / 2g = 4
    assert!(apex > ground_y + 3.0);
    assert!(apex < ground_y + 4.5);
    assert!(ch.is_grounded());
    assert!((ch.position.y - ground_y).abs() < 0.05);
}

#[test]
fn test_walking_off_ledge_falls() {
    let controller = CharacterController::default();
    let world = CollisionWorld::build(&ground_strip(-100.0, 0.0, 0.0));
    let mut ch = settle(&controller, &world, Vec2::new(-10.0, 0.5));
    assert!(ch.is_grounded());

    for _ in 0..150 {
        controller.drive(&mut ch, intent(1, false));
        controller.step(&mut ch, &world, DT);
        assert_invariants(&ch, controller.physics());
    }
    assert!(ch.position.x > 5.0);
    assert!(ch.position.y < -1.0);
    assert!(!ch.is_grounded());
    assert!(!ch.has_ground_normal);
}

#[test]
fn test_long_fall_clamps_to_terminal_speed() {
    let controller = CharacterController::default();
    let world = CollisionWorld::empty();
    let mut ch = Character::new(Vec2::new(0.0, 500.0), controller.physics());
    for _ in 0..120 {
        controller.step(&mut ch, &world, DT);
        assert_invariants(&ch, controller.physics());
    }
    assert_eq!(ch.velocity.y, -50.0);
}

#[test]
fn test_grace_counter_survives_brief_air_time() {
    let controller = CharacterController::default();
    let world = CollisionWorld::build(&ground_strip(-40.0, 40.0, 0.0));
    let mut ch = settle(&controller, &world, Vec2::new(0.0, 0.5));
    assert_eq!(ch.grounded_frames(), controller.physics().grace_frames);

    ch.lose_ground();
    assert!(ch.is_grounded());
    ch.lose_ground();
    ch.lose_ground();
    assert!(!ch.is_grounded());
    ch.lose_ground();
    assert_eq!(ch.grounded_frames(), 0);
}

// ============================================================================
// Auto-walk
// ============================================================================

#[test]
fn test_auto_walk_ends_exactly_on_target() {
    let controller = CharacterController::default();
    let world = CollisionWorld::build(&ground_strip(-40.0, 40.0, 0.0));
    let mut ch = settle(&controller, &world, Vec2::new(0.0, 0.5));
    ch.start_auto_walk(7.5, ArrivalAction::OpenIsland(3));

    let mut arrived = None;
    for _ in 0..600 {
        // held keys are ignored while walking
        if let Some(action) = controller.drive(&mut ch, intent(-1, true)) {
            arrived = Some(action);
            assert_eq!(ch.position.x, 7.5);
            assert_eq!(ch.velocity.x, 0.0);
            break;
        }
        controller.step(&mut ch, &world, DT);
        assert!(ch.velocity.x > 0.0);
    }
    assert_eq!(arrived, Some(ArrivalAction::OpenIsland(3)));
    assert!(!ch.is_auto_walking());

    controller.step(&mut ch, &world, DT);
    assert!((ch.position.x - 7.5).abs() < 1e-5);
}
