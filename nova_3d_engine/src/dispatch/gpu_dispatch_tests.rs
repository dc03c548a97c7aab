/// Tests for GpuDispatch
///
/// Drives the dispatch against a RecordingDevice and inspects the command
/// stream: blend policy, composite uniform keys, texture units, indexed vs
/// array draws.

use super::*;
use glam::{Vec3, Vec4};
use crate::error::Error;
use crate::graphics_device::{
    BlendState, Command, PrimitiveTopology, ProgramDesc, RecordingDevice, Texture, TextureDesc,
    TextureFormat, TextureType, TextureUsage,
};
use crate::uniform::Uniform;

// ============================================================================
// Helper Functions
// ============================================================================

fn bound_dispatch(device: &mut RecordingDevice) -> GpuDispatch {
    let program = device
        .create_program(&ProgramDesc {
            name: "test".to_string(),
            vertex_source: "vs".to_string(),
            fragment_source: "fs".to_string(),
        })
        .unwrap();
    let mut dispatch = GpuDispatch::new();
    dispatch.set_program(program);
    dispatch
}

fn texture(device: &mut RecordingDevice) -> Arc<dyn Texture> {
    device
        .create_texture(TextureDesc {
            width: 2,
            height: 2,
            format: TextureFormat::R8G8B8A8_UNORM,
            usage: TextureUsage::Sampled,
            texture_type: TextureType::Tex2D,
            data: None,
        })
        .unwrap()
}

fn texture_binds(device: &RecordingDevice) -> Vec<(u32, String, u64)> {
    device
        .commands()
        .iter()
        .filter_map(|c| match c {
            Command::BindTexture { unit, name, texture } => Some((*unit, name.clone(), *texture)),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Policy
// ============================================================================

#[test]
fn test_draw_without_program_fails() {
    let mut device = RecordingDevice::new();
    let mut dispatch = GpuDispatch::new();
    let result = dispatch.draw(&mut device, 3, PrimitiveKind::Triangles, BlendKind::Opaque, 0);
    assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
    assert_eq!(device.draw_count(), 0);
}

#[test]
fn test_blend_policy_applied() {
    let mut device = RecordingDevice::new();
    let mut dispatch = bound_dispatch(&mut device);

    dispatch.draw(&mut device, 3, PrimitiveKind::Triangles, BlendKind::Additive, 0).unwrap();

    let depth = device.commands().iter().find_map(|c| match c {
        Command::SetDepthState(d) => Some(*d),
        _ => None,
    }).unwrap();
    let blend = device.commands().iter().find_map(|c| match c {
        Command::SetBlendState(b) => Some(*b),
        _ => None,
    }).unwrap();
    assert!(!depth.write_enable);
    assert_eq!(blend, BlendState::ADDITIVE);
}

#[test]
fn test_array_draw_without_index_buffer() {
    let mut device = RecordingDevice::new();
    let mut dispatch = bound_dispatch(&mut device);

    dispatch.draw(&mut device, 12, PrimitiveKind::LineStrip, BlendKind::Opaque, 4).unwrap();

    assert_eq!(
        device.commands().last(),
        Some(&Command::DrawArrays { topology: PrimitiveTopology::LineStrip, first: 4, count: 12 })
    );
    assert_eq!(dispatch.draw_calls(), 1);
}

#[test]
fn test_indexed_draw_with_index_buffer() {
    let mut device = RecordingDevice::new();
    let quad = Geometry::fullscreen_quad(&mut device).unwrap();
    let mut dispatch = bound_dispatch(&mut device);
    dispatch.bind_geometry(&quad);

    dispatch.draw(&mut device, quad.draw_count(), quad.primitive(), BlendKind::Opaque, 0).unwrap();

    assert_eq!(
        device.commands().last(),
        Some(&Command::DrawElements {
            topology: PrimitiveTopology::TriangleList,
            index_type: IndexType::U32,
            first: 0,
            count: 6,
        })
    );
}

// ============================================================================
// Uniform binding
// ============================================================================

#[test]
fn test_struct_and_array_keys() {
    let mut device = RecordingDevice::new();
    let mut dispatch = bound_dispatch(&mut device);
    let uniforms = Uniforms::from_list(vec![
        Uniform::float("opacity", 0.5),
        Uniform::structure("fog", vec![
            Uniform::color("color", Vec4::ONE),
            Uniform::float("density", 0.1),
        ]),
        Uniform::struct_array("lights", vec![
            vec![Uniform::vec3("position", Vec3::X)],
            vec![Uniform::vec3("position", Vec3::Y)],
        ]),
    ]);
    dispatch.set_uniforms(&uniforms);

    dispatch.draw(&mut device, 3, PrimitiveKind::Triangles, BlendKind::Opaque, 0).unwrap();

    assert_eq!(device.last_uniform("opacity"), Some(&UniformValue::Float(0.5)));
    assert_eq!(device.last_uniform("fog.density"), Some(&UniformValue::Float(0.1)));
    assert_eq!(device.last_uniform("fog.color"), Some(&UniformValue::Color(Vec4::ONE)));
    assert_eq!(device.last_uniform("lights[0].position"), Some(&UniformValue::Vector3(Vec3::X)));
    assert_eq!(device.last_uniform("lights[1].position"), Some(&UniformValue::Vector3(Vec3::Y)));
    assert!(device.last_uniform("fog").is_none());
}

#[test]
fn test_texture_units_reset_every_draw() {
    let mut device = RecordingDevice::new();
    let mut dispatch = bound_dispatch(&mut device);
    let a = texture(&mut device);
    let b = texture(&mut device);
    dispatch.set_uniforms(&Uniforms::from_list(vec![
        Uniform::texture("tDiffuse", Some(Arc::clone(&a))),
        Uniform::texture("tNormal", Some(Arc::clone(&b))),
    ]));

    dispatch.draw(&mut device, 3, PrimitiveKind::Triangles, BlendKind::Opaque, 0).unwrap();
    dispatch.draw(&mut device, 3, PrimitiveKind::Triangles, BlendKind::Opaque, 0).unwrap();

    let binds = texture_binds(&device);
    assert_eq!(binds.len(), 4);
    assert_eq!(binds[0], (0, "tDiffuse".to_string(), a.id()));
    assert_eq!(binds[1], (1, "tNormal".to_string(), b.id()));
    assert_eq!(binds[2].0, 0);
    assert_eq!(binds[3].0, 1);
    assert_eq!(dispatch.texture_units_used(), 2);
}

#[test]
fn test_null_texture_binds_neutral() {
    let mut device = RecordingDevice::new();
    let mut dispatch = bound_dispatch(&mut device);
    dispatch.set_uniforms(&Uniforms::from_list(vec![Uniform::texture("map", None)]));

    dispatch.draw(&mut device, 3, PrimitiveKind::Triangles, BlendKind::Opaque, 0).unwrap();

    let neutral = device.neutral_texture().unwrap();
    let binds = texture_binds(&device);
    assert_eq!(binds, vec![(0, "map".to_string(), neutral.id())]);
}

#[test]
fn test_textures_inside_struct_array_take_units() {
    let mut device = RecordingDevice::new();
    let mut dispatch = bound_dispatch(&mut device);
    dispatch.set_uniforms(&Uniforms::from_list(vec![Uniform::struct_array("shadows", vec![
        vec![Uniform::texture("map", None)],
        vec![Uniform::texture("map", None)],
    ])]));

    dispatch.draw(&mut device, 3, PrimitiveKind::Triangles, BlendKind::Opaque, 0).unwrap();

    let binds = texture_binds(&device);
    assert_eq!(binds[0].0, 0);
    assert_eq!(binds[0].1, "shadows[0].map");
    assert_eq!(binds[1].0, 1);
    assert_eq!(binds[1].1, "shadows[1].map");
}

#[test]
fn test_reset_clears_binding_state() {
    let mut device = RecordingDevice::new();
    let mut dispatch = bound_dispatch(&mut device);
    dispatch.reset();
    assert!(dispatch.program().is_none());
    assert!(dispatch.uniforms().is_empty());
}
