/// Unit tests for RecordingDevice
///
/// Validates id allocation, failure injection and command recording.

use super::*;
use crate::graphics_device::{BufferDesc, BufferUsage, TextureDesc, TextureFormat, TextureUsage, TextureType};
use crate::uniform::UniformValue;
use glam::Vec3;

fn color_texture_desc(width: u32, height: u32) -> TextureDesc {
    TextureDesc {
        width,
        height,
        format: TextureFormat::R8G8B8A8_UNORM,
        usage: TextureUsage::SampledAndRenderTarget,
        texture_type: TextureType::Tex2D,
        data: None,
    }
}

fn program_desc(name: &str) -> ProgramDesc {
    ProgramDesc {
        name: name.to_string(),
        vertex_source: "void main() {}".to_string(),
        fragment_source: "void main() {}".to_string(),
    }
}

// ============================================================================
// Resource creation
// ============================================================================

#[test]
fn test_ids_are_unique() {
    let mut device = RecordingDevice::new();
    let a = device.create_texture(color_texture_desc(4, 4)).unwrap();
    let b = device.create_texture(color_texture_desc(4, 4)).unwrap();
    assert_ne!(a.id(), b.id());
    assert_eq!(device.textures_created(), 2);
}

#[test]
fn test_buffer_size_matches_data() {
    let mut device = RecordingDevice::new();
    let buffer = device
        .create_buffer(BufferDesc { name: "vb".to_string(), usage: BufferUsage::Vertex }, &[0u8; 48])
        .unwrap();
    assert_eq!(buffer.size(), 48);
    assert_eq!(buffer.usage(), BufferUsage::Vertex);
}

#[test]
fn test_empty_buffer_fails() {
    let mut device = RecordingDevice::new();
    let result = device.create_buffer(BufferDesc { name: "vb".to_string(), usage: BufferUsage::Vertex }, &[]);
    assert!(result.is_err());
}

#[test]
fn test_zero_size_texture_fails() {
    let mut device = RecordingDevice::new();
    assert!(device.create_texture(color_texture_desc(0, 16)).is_err());
}

#[test]
fn test_neutral_texture_is_cached() {
    let mut device = RecordingDevice::new();
    let a = device.neutral_texture().unwrap();
    let b = device.neutral_texture().unwrap();
    assert_eq!(a.id(), b.id());
    assert_eq!(a.info().width, 1);
}

#[test]
fn test_framebuffer_failure_injection() {
    let mut device = RecordingDevice::new();
    let color = device.create_texture(color_texture_desc(8, 8)).unwrap();
    device.set_fail_framebuffers(true);
    let result = device.create_framebuffer(FramebufferDesc {
        color_attachments: vec![color],
        depth_attachment: None,
        width: 8,
        height: 8,
    });
    assert!(result.is_err());
    assert_eq!(device.framebuffers_created(), 0);
}

#[test]
fn test_framebuffer_failure_after_budget() {
    let mut device = RecordingDevice::new();
    let color = device.create_texture(color_texture_desc(8, 8)).unwrap();
    let desc = || FramebufferDesc {
        color_attachments: vec![Arc::clone(&color)],
        depth_attachment: None,
        width: 8,
        height: 8,
    };
    device.fail_framebuffers_after(2);

    assert!(device.create_framebuffer(desc()).is_ok());
    assert!(device.create_framebuffer(desc()).is_ok());
    assert!(device.create_framebuffer(desc()).is_err());
    assert_eq!(device.framebuffers_created(), 2);

    device.set_fail_framebuffers(false);
    assert!(device.create_framebuffer(desc()).is_ok());
}

#[test]
fn test_recording_can_be_switched_off() {
    let mut device = RecordingDevice::new();
    device.set_recording(false);
    device.set_viewport(Viewport::from_size(4, 4)).unwrap();
    device.draw_arrays(PrimitiveTopology::TriangleList, 0, 3).unwrap();
    assert!(device.commands().is_empty());

    device.set_recording(true);
    device.draw_arrays(PrimitiveTopology::TriangleList, 0, 3).unwrap();
    assert_eq!(device.draw_count(), 1);
}

#[test]
fn test_program_failure_injection() {
    let mut device = RecordingDevice::new();
    device.fail_program("broken");
    assert!(device.create_program(&program_desc("broken")).is_err());
    assert!(device.create_program(&program_desc("fine")).is_ok());
    assert_eq!(device.programs_created(), 1);
}

#[test]
fn test_program_with_empty_stage_fails() {
    let mut device = RecordingDevice::new();
    let mut desc = program_desc("empty");
    desc.fragment_source = "   ".to_string();
    assert!(device.create_program(&desc).is_err());
}

// ============================================================================
// Command recording
// ============================================================================

#[test]
fn test_commands_are_recorded_in_order() {
    let mut device = RecordingDevice::new();
    let program = device.create_program(&program_desc("p")).unwrap();

    device.set_render_target(None).unwrap();
    device.use_program(&program).unwrap();
    device.set_uniform("color", &UniformValue::Vector3(Vec3::X)).unwrap();
    device.draw_arrays(PrimitiveTopology::TriangleList, 0, 3).unwrap();

    assert_eq!(device.commands().len(), 4);
    assert_eq!(device.commands()[0], Command::SetRenderTarget(None));
    assert_eq!(device.commands()[1], Command::UseProgram(program.id()));
    assert_eq!(device.draw_count(), 1);
    assert_eq!(device.last_uniform("color"), Some(&UniformValue::Vector3(Vec3::X)));
}

#[test]
fn test_clear_commands() {
    let mut device = RecordingDevice::new();
    device.clear(&[ClearValue::Color([0.0; 4])]).unwrap();
    device.clear_commands();
    assert!(device.commands().is_empty());
}
