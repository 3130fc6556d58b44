use glam::Vec2;
use subway_scene::core::{InputBridge, StageBounds};

#[test]
fn pointer_leave_resets_exactly() {
    let mut input = InputBridge::new(800, 600, false);
    input.pointer_moved(713.0, 41.0);
    assert_ne!(input.state().pointer, Vec2::ZERO);

    input.pointer_left();
    assert_eq!(input.state().pointer, Vec2::ZERO);
}

#[test]
fn pointer_normalises_with_y_up() {
    let mut input = InputBridge::new(800, 600, false);

    input.pointer_moved(0.0, 0.0);
    assert_eq!(input.state().pointer, Vec2::new(-1.0, 1.0));

    input.pointer_moved(400.0, 300.0);
    assert_eq!(input.state().pointer, Vec2::ZERO);

    input.pointer_moved(800.0, 600.0);
    assert_eq!(input.state().pointer, Vec2::new(1.0, -1.0));
}

#[test]
fn pinned_stage_clamps_outside_points() {
    let mut input = InputBridge::new(1000, 1000, false).with_stage(StageBounds::new(100.0, 200.0, 400.0, 200.0));

    input.pointer_moved(300.0, 300.0);
    assert_eq!(input.state().pointer, Vec2::ZERO);

    input.pointer_moved(-50.0, 900.0);
    assert_eq!(input.state().pointer, Vec2::new(-1.0, -1.0));

    // Window resizes do not move a pinned stage
    assert!(input.resized(1200, 900));
    assert_eq!(input.stage(), StageBounds::new(100.0, 200.0, 400.0, 200.0));
}

#[test]
fn resize_is_idempotent_and_clamped() {
    let mut input = InputBridge::new(800, 600, false);
    assert!(input.resized(1024, 512));
    assert!(!input.resized(1024, 512));
    assert_eq!(input.state().viewport.aspect(), 2.0);

    assert!(input.resized(0, 0));
    assert_eq!(input.state().viewport.width, 1);
    assert_eq!(input.state().viewport.height, 1);
    assert_eq!(input.stage(), StageBounds::new(0.0, 0.0, 1.0, 1.0));
}

#[test]
fn reduced_motion_toggles() {
    let mut input = InputBridge::new(800, 600, false);
    assert!(input.set_reduced_motion(true));
    assert!(!input.set_reduced_motion(true));
    assert!(input.state().reduced_motion);
    assert!(!input.toggle_reduced_motion());
    assert!(!input.state().reduced_motion);
}

#[test]
fn detached_bridge_ignores_everything() {
    let mut input = InputBridge::new(800, 600, false);
    input.pointer_moved(10.0, 10.0);
    input.detach();

    assert_eq!(input.state().pointer, Vec2::ZERO);
    input.pointer_moved(700.0, 500.0);
    assert!(!input.resized(100, 100));
    assert!(!input.set_reduced_motion(true));

    assert_eq!(input.state().pointer, Vec2::ZERO);
    assert_eq!(input.state().viewport.width, 800);
    assert!(!input.state().reduced_motion);
}
