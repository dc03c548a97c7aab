/// Tests for Engine
///
/// Drives the loop with synthetic timestamps on a RecordingDevice.

use super::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use glam::Vec3;
use crate::camera::Camera;
use crate::dispatch::PrimitiveKind;
use crate::graphics_device::RecordingDevice;
use crate::resource::{Geometry, Material};
use crate::scene::{Node, NodeScript, Transform};
use crate::uniform::Uniforms;

// ============================================================================
// Helper Functions
// ============================================================================

/// Records every hook call as "fixed" / "update"
struct TraceApp {
    events: Rc<RefCell<Vec<&'static str>>>,
}

impl Application for TraceApp {
    fn fixed_update(&mut self, _scene: &mut SceneGraph, step_seconds: f32) {
        assert!((step_seconds - 1.0 / 60.0).abs() < 1e-6);
        self.events.borrow_mut().push("fixed");
    }

    fn update(&mut self, _scene: &mut SceneGraph, _dt_seconds: f32) {
        self.events.borrow_mut().push("update");
    }
}

fn traced_engine() -> (Engine<RecordingDevice>, Rc<RefCell<Vec<&'static str>>>) {
    let events = Rc::new(RefCell::new(Vec::new()));
    let app = TraceApp { events: Rc::clone(&events) };
    let config = EngineConfig::default().with_size(64, 32);
    let mut engine = Engine::new(config, RecordingDevice::new(), Box::new(app)).unwrap();
    engine.scene_mut().create_node(Node::camera("camera", Camera::perspective(1.0, 2.0, 0.1, 100.0)));
    (engine, events)
}

struct Slide;

impl NodeScript for Slide {
    fn update(&mut self, transform: &mut Transform, dt: f32) {
        transform.position.x += dt;
    }
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_new_rejects_invalid_config() {
    let config = EngineConfig::default().with_fixed_rate(0.0);
    let result = Engine::new(config, RecordingDevice::new(), Box::new(NoopApplication));
    assert!(matches!(result, Err(crate::error::Error::InvalidConfiguration(_))));
}

#[test]
fn test_new_allocates_scene_target() {
    let config = EngineConfig::default().with_size(64, 32).with_pixel_ratio(2.0);
    let engine = Engine::new(config, RecordingDevice::new(), Box::new(NoopApplication)).unwrap();
    assert_eq!(engine.renderer().scene_renderer().target().width(), 128);
    assert_eq!(engine.renderer().scene_renderer().target().height(), 64);
    assert!(engine.device().framebuffers_created() >= 1);
}

// ============================================================================
// Scheduling
// ============================================================================

#[test]
fn test_first_run_renders_without_fixed_steps() {
    let (mut engine, events) = traced_engine();
    let report = engine.run(1000.0).unwrap();
    assert_eq!(report.fixed_steps, 0);
    assert!(report.variable_step_ran);
    assert_eq!(*events.borrow(), vec!["update"]);
    assert_eq!(engine.stats().frames, 1);
}

#[test]
fn test_fixed_steps_run_before_update() {
    let (mut engine, events) = traced_engine();
    engine.run(0.0).unwrap();
    events.borrow_mut().clear();

    let report = engine.run(1000.0 / 30.0).unwrap();

    assert_eq!(report.fixed_steps, 2);
    assert_eq!(*events.borrow(), vec!["fixed", "fixed", "update"]);
}

#[test]
fn test_short_tick_skips_variable_step() {
    let (mut engine, events) = traced_engine();
    engine.run(0.0).unwrap();
    events.borrow_mut().clear();
    engine.device_mut().clear_commands();

    let report = engine.run(1000.0 / 120.0).unwrap();

    assert_eq!(report, FrameReport { fixed_steps: 0, variable_step_ran: false, draw_calls: 0 });
    assert!(events.borrow().is_empty());
    assert!(engine.device().commands().is_empty());
}

#[test]
fn test_logic_and_transforms_run_before_render() {
    let (mut engine, _events) = traced_engine();
    let key = engine.scene_mut().create_node(Node::group("slider").with_script(Box::new(Slide)));
    engine.run(0.0).unwrap();

    engine.run(100.0).unwrap();

    let world = engine.scene().world_matrix(key).unwrap();
    assert!((world.w_axis.x - 0.1).abs() < 1e-5);
}

#[test]
fn test_stats_accumulate() {
    let (mut engine, _events) = traced_engine();
    engine.run(0.0).unwrap();
    engine.run(1000.0 / 60.0).unwrap();
    engine.run(2000.0 / 60.0).unwrap();

    let stats = engine.stats();
    assert_eq!(stats.frames, 3);
    assert_eq!(stats.fixed_steps, 2);
    // one copy blit per frame with an empty postprocess chain
    assert_eq!(stats.draw_calls, 3);
    assert_eq!(stats.aborted_frames, 0);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_render_error_aborts_frame_only() {
    let (mut engine, _events) = traced_engine();
    let vertices = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    let geometry = Geometry::from_slices(engine.device_mut(), "tri", &vertices, 3, None, PrimitiveKind::Triangles).unwrap();
    let mesh = Node::mesh("broken", Arc::new(geometry), Material::new("broken", "vs", "fs", Uniforms::new()))
        .with_position(Vec3::new(0.0, 0.0, -5.0));
    let key = engine.scene_mut().create_node(mesh);
    engine.device_mut().fail_program("broken");

    assert!(engine.run(0.0).is_err());
    assert_eq!(engine.stats().aborted_frames, 1);
    assert_eq!(engine.stats().frames, 0);

    engine.scene_mut().remove(key);
    assert!(engine.run(1000.0 / 60.0).is_ok());
    assert_eq!(engine.stats().frames, 1);
}

// ============================================================================
// Resize
// ============================================================================

#[test]
fn test_set_size_updates_config_and_targets() {
    let (mut engine, _events) = traced_engine();
    engine.set_size(200, 100, 1.5).unwrap();

    assert_eq!(engine.config().width, 200);
    assert_eq!(engine.config().pixel_ratio, 1.5);
    assert_eq!(engine.renderer().scene_renderer().target().width(), 300);
    assert_eq!(engine.renderer().postprocess().height(), 150);
}

#[test]
fn test_set_size_rejects_zero() {
    let (mut engine, _events) = traced_engine();
    assert!(engine.set_size(0, 100, 1.0).is_err());
    assert_eq!(engine.config().width, 64);
}
