//! Integration tests for the engine loop
//!
//! Drives a complete frame (scene pass + postprocess chain) through the
//! public nova3d API on a RecordingDevice and inspects the recorded commands.
//!
//! Run with: cargo test --test engine_integration_tests

use std::sync::Arc;
use nova_3d_engine::glam::{Mat4, Vec3};
use nova_3d_engine::nova3d::{Engine, EngineConfig, NoopApplication};
use nova_3d_engine::nova3d::camera::Camera;
use nova_3d_engine::nova3d::dispatch::PrimitiveKind;
use nova_3d_engine::nova3d::graphics_device::{Command, Framebuffer, RecordingDevice};
use nova_3d_engine::nova3d::postprocess::{PassOutput, PostProcessPass};
use nova_3d_engine::nova3d::resource::{Geometry, Material};
use nova_3d_engine::nova3d::scene::{Light, Node};
use nova_3d_engine::nova3d::target::RenderTargetDesc;
use nova_3d_engine::nova3d::uniform::{Uniform, UniformValue, Uniforms};

// ============================================================================
// TEST HELPERS
// ============================================================================

fn lit_material() -> Material {
    Material::new("lit", "vs", "fs", Uniforms::from_list(vec![
        Uniform::mat4("modelMatrix", Mat4::IDENTITY),
        Uniform::mat4("viewMatrix", Mat4::IDENTITY),
        Uniform::mat4("projectionMatrix", Mat4::IDENTITY),
        Uniform::struct_array("lights", vec![]),
    ]))
}

fn fullscreen_material(name: &str) -> Material {
    Material::new(name, "vs", "fs", Uniforms::new())
}

/// Camera, one lit triangle, one point light and a two-pass chain
/// (plain pass, then a feedback pass) with a disabled pass in between
fn build_engine() -> Engine<RecordingDevice> {
    let config = EngineConfig::default().with_size(64, 64);
    let mut engine = Engine::new(config, RecordingDevice::new(), Box::new(NoopApplication)).unwrap();

    let vertices = [-1.0, -1.0, 0.0, 1.0, -1.0, 0.0, 0.0, 1.0, 0.0];
    let geometry = Geometry::from_slices(engine.device_mut(), "tri", &vertices, 3, None, PrimitiveKind::Triangles).unwrap();

    let scene = engine.scene_mut();
    scene.create_node(
        Node::camera("camera", Camera::perspective(1.0, 1.0, 0.1, 100.0)).with_position(Vec3::new(0.0, 0.0, 5.0)),
    );
    scene.create_node(Node::mesh("triangle", Arc::new(geometry), lit_material()));
    scene.create_node(
        Node::light("lamp", Light::point(Vec3::ONE, 2.0, 10.0)).with_position(Vec3::new(0.0, 3.0, 0.0)),
    );

    let (renderer, device) = engine.renderer_and_device();
    let blur = PostProcessPass::new(device, "blur", fullscreen_material("blur"), RenderTargetDesc::new("blur", 64, 64)).unwrap();
    let grade = PostProcessPass::new(device, "grade", fullscreen_material("grade"), RenderTargetDesc::new("grade", 64, 64))
        .unwrap()
        .with_enabled(false);
    let trail = PostProcessPass::feedback(device, "trail", fullscreen_material("trail"), RenderTargetDesc::new("trail", 64, 64)).unwrap();
    let pipeline = renderer.postprocess_mut();
    pipeline.add_pass(blur);
    pipeline.add_pass(grade);
    pipeline.add_pass(trail);

    engine
}

fn target_switches(device: &RecordingDevice) -> Vec<Option<u64>> {
    device.commands().iter().filter_map(|c| match c {
        Command::SetRenderTarget(target) => Some(*target),
        _ => None,
    }).collect()
}

fn single_target_id(engine: &Engine<RecordingDevice>, name: &str) -> u64 {
    match engine.renderer().postprocess().pass(name).unwrap().output() {
        PassOutput::Single(target) => target.framebuffer().id(),
        PassOutput::Feedback(_) => panic!("expected a single-target pass"),
    }
}

fn feedback_write_id(engine: &Engine<RecordingDevice>, name: &str) -> u64 {
    match engine.renderer().postprocess().pass(name).unwrap().output() {
        PassOutput::Feedback(buffer) => buffer.write().framebuffer().id(),
        PassOutput::Single(_) => panic!("expected a feedback pass"),
    }
}

// ============================================================================
// FRAME TESTS
// ============================================================================

#[test]
fn test_integration_full_frame_target_hand_off() {
    let mut engine = build_engine();
    let scene_id = engine.renderer().scene_renderer().target().framebuffer().id();
    let blur_id = single_target_id(&engine, "blur");
    let trail_id = feedback_write_id(&engine, "trail");
    engine.device_mut().clear_commands();

    let report = engine.run(0.0).unwrap();

    // triangle, blur, trail, then the copy of the trail result to the screen
    assert_eq!(report.draw_calls, 4);
    assert_eq!(engine.device().draw_count(), 4);
    assert_eq!(
        target_switches(engine.device()),
        vec![Some(scene_id), Some(blur_id), Some(trail_id), None],
    );
}

#[test]
fn test_integration_light_reaches_mesh_uniforms() {
    let mut engine = build_engine();
    engine.run(0.0).unwrap();

    let intensity = engine.device().last_uniform("lights[0].intensity").cloned();
    assert!(matches!(intensity, Some(UniformValue::Float(v)) if (v - 2.0).abs() < 1e-6));
}

#[test]
fn test_integration_feedback_buffer_swaps_each_frame() {
    let mut engine = build_engine();
    let first_write = feedback_write_id(&engine, "trail");

    engine.run(0.0).unwrap();
    let second_write = feedback_write_id(&engine, "trail");
    assert_ne!(first_write, second_write);

    engine.run(1000.0 / 60.0).unwrap();
    assert_eq!(feedback_write_id(&engine, "trail"), first_write);
}

#[test]
fn test_integration_pass_removal_applies_next_frame() {
    let mut engine = build_engine();
    engine.run(0.0).unwrap();

    assert!(engine.renderer_mut().postprocess_mut().remove_pass("blur").is_some());
    engine.device_mut().clear_commands();
    let report = engine.run(1000.0 / 60.0).unwrap();

    assert_eq!(report.draw_calls, 3);
}

#[test]
fn test_integration_enabling_pass_joins_chain() {
    let mut engine = build_engine();
    assert!(engine.renderer_mut().postprocess_mut().set_enabled("grade", true));

    let report = engine.run(0.0).unwrap();

    assert_eq!(report.draw_calls, 5);
}

#[test]
fn test_integration_resize_reaches_passes() {
    let mut engine = build_engine();
    engine.set_size(32, 16, 2.0).unwrap();

    let pipeline = engine.renderer().postprocess();
    assert_eq!(pipeline.width(), 64);
    assert_eq!(pipeline.height(), 32);
    for pass in pipeline.passes() {
        assert_eq!(pass.output_texture().info().width, 64);
        assert_eq!(pass.output_texture().info().height, 32);
    }
    assert!(engine.run(0.0).is_ok());
}
