//! Camera Tests - Framing, FOV and Screen Projection
//!
//! Tests for the camera rig across free roam, island lock and the room.

use glam::{Vec2, Vec3};
use island_portfolio_engine::camera::{CameraInputs, CameraRig, Framing, ndc_to_screen};
use island_portfolio_engine::config::{CameraConfig, CharacterConfig};

fn rig_at(character: Vec2) -> CameraRig {
    CameraRig::new(&CameraConfig::default(), &CharacterConfig::default(), character)
}

fn inputs(framing: Framing, in_room: bool, character: Vec2, velocity_x: f32) -> CameraInputs {
    CameraInputs {
        framing,
        in_room,
        character,
        velocity_x,
    }
}

// ============================================================================
// FOV
// ============================================================================

#[test]
fn test_fov_widens_monotonically_at_full_speed() {
    let mut rig = rig_at(Vec2::ZERO);
    let mut last = rig.current_fov();
    for _ in 0..2000 {
        rig.update(&inputs(Framing::Follow, false, Vec2::ZERO, 18.0));
        assert!(rig.current_fov() >= last - 1e-5);
        last = rig.current_fov();
    }
    assert!(rig.current_fov() <= 40.0 + 1e-4);
    assert!(rig.current_fov() > 35.0);
}

#[test]
fn test_fov_narrows_quickly_when_stopping() {
    let mut rig = rig_at(Vec2::ZERO);
    for _ in 0..2000 {
        rig.update(&inputs(Framing::Follow, false, Vec2::ZERO, 18.0));
    }
    let wide = rig.current_fov();
    for _ in 0..2000 {
        rig.update(&inputs(Framing::Follow, false, Vec2::ZERO, 0.0));
    }
    assert!(rig.current_fov() < wide);
    assert!((rig.current_fov() - 20.0).abs() < 0.5);
}

#[test]
fn test_fov_stays_within_range() {
    let mut rig = rig_at(Vec2::ZERO);
    for i in 0..500 {
        let vx = if i % 50 < 25 { 500.0 } else { -500.0 };
        rig.update(&inputs(Framing::Follow, false, Vec2::ZERO, vx));
        assert!(rig.current_fov() >= 20.0 - 1e-4);
        assert!(rig.current_fov() <= 40.0 + 1e-4);
    }
}

#[test]
fn test_island_lock_returns_fov_to_minimum_and_resets_speed() {
    let mut rig = rig_at(Vec2::ZERO);
    for _ in 0..1000 {
        rig.update(&inputs(Framing::Follow, false, Vec2::ZERO, 18.0));
    }
    assert!(rig.smoothed_speed() > 1.0);

    let locked = Framing::Locked { x: 10.0, y: 1.5 };
    rig.update(&inputs(locked, false, Vec2::ZERO, 0.0));
    assert_eq!(rig.smoothed_speed(), 0.0);
    for _ in 0..400 {
        rig.update(&inputs(locked, false, Vec2::ZERO, 0.0));
    }
    assert!((rig.current_fov() - 20.0).abs() < 0.05);
}

// ============================================================================
// Framing
// ============================================================================

#[test]
fn test_locked_camera_converges_on_island_position() {
    let mut rig = rig_at(Vec2::ZERO);
    let locked = Framing::Locked { x: 10.0, y: 1.5 };
    for _ in 0..600 {
        rig.update(&inputs(locked, false, Vec2::new(9.0, 0.0), 0.0));
    }
    let expected = rig.island_position(10.0, 1.5);
    assert!((rig.position - expected).length() < 0.01);
    assert_eq!(expected, Vec3::new(10.0, -1.5, 20.0));
}

#[test]
fn test_lock_ignores_character_movement() {
    let mut rig = rig_at(Vec2::ZERO);
    let locked = Framing::Locked { x: 10.0, y: 1.5 };
    rig.update(&inputs(locked, false, Vec2::new(-30.0, 4.0), 12.0));
    assert_eq!(rig.target, Vec3::new(10.0, -1.5, 20.0));
}

#[test]
fn test_room_overrides_follow_target() {
    let mut rig = rig_at(Vec2::new(-50.0, 0.0));
    rig.update(&inputs(Framing::Follow, true, Vec2::new(-48.0, 0.0), 4.0));
    assert_eq!(rig.target, Vec3::new(-50.0, 3.5, 25.0));
    // room blend, not follow blend
    let config = CameraConfig::default();
    assert_eq!(
        rig.smoothing_for(&inputs(Framing::Follow, true, Vec2::ZERO, 0.0)),
        config.room_transition_speed
    );
}

#[test]
fn test_follow_camera_trails_walking_character() {
    let mut rig = rig_at(Vec2::ZERO);
    let mut x = 0.0;
    for _ in 0..120 {
        x += 0.2;
        rig.update(&inputs(Framing::Follow, false, Vec2::new(x, 0.0), 12.0));
    }
    assert!(rig.position.x > 0.0);
    assert!(rig.position.x < x);
    assert!((rig.position.z - 25.0).abs() < 1e-4);
}

// ============================================================================
// Screen projection
// ============================================================================

#[test]
fn test_point_right_of_camera_projects_right_of_center() {
    let rig = rig_at(Vec2::ZERO);
    let center = rig.project_to_screen(Vec3::new(0.0, 3.0, 0.0)).unwrap();
    let right = rig.project_to_screen(Vec3::new(2.0, 3.0, 0.0)).unwrap();
    let above = rig.project_to_screen(Vec3::new(0.0, 5.0, 0.0)).unwrap();
    assert!(right.x > center.x);
    // screen Y grows downward
    assert!(above.y < center.y);
}

#[test]
fn test_point_behind_camera_is_not_projected() {
    let rig = rig_at(Vec2::ZERO);
    assert!(rig.project_to_screen(Vec3::new(0.0, 3.0, 40.0)).is_none());
}

#[test]
fn test_ndc_corners() {
    let viewport = Vec2::new(1920.0, 1080.0);
    assert_eq!(ndc_to_screen(Vec2::new(-1.0, 1.0), viewport), Vec2::ZERO);
    assert_eq!(ndc_to_screen(Vec2::new(1.0, -1.0), viewport), viewport);
}

#[test]
fn test_resize_changes_aspect() {
    let mut rig = rig_at(Vec2::ZERO);
    let updates = rig.projection_updates();
    rig.set_viewport(800.0, 800.0);
    assert_eq!(rig.aspect(), 1.0);
    assert_eq!(rig.projection_updates(), updates + 1);
    // zero-size viewports are ignored
    rig.set_viewport(0.0, 600.0);
    assert_eq!(rig.aspect(), 1.0);
}
