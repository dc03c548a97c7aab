/// Tests for RenderTarget
///
/// Validates allocation, in-place resize and the bind/clear command sequence.

use super::*;
use crate::error::Error;
use crate::graphics_device::{Command, RecordingDevice};

// ============================================================================
// Creation
// ============================================================================

#[test]
fn test_new_allocates_color_and_depth() {
    let mut device = RecordingDevice::new();
    let target = RenderTarget::new(&mut device, RenderTargetDesc::new("scene", 320, 200)).unwrap();

    assert_eq!(target.width(), 320);
    assert_eq!(target.height(), 200);
    assert_eq!(target.color_attachments().len(), 1);
    assert!(target.depth_attachment().is_some());
    assert_eq!(target.texture().info().width, 320);
    assert_eq!(device.textures_created(), 2);
    assert_eq!(device.framebuffers_created(), 1);
}

#[test]
fn test_multiple_color_attachments_without_depth() {
    let mut device = RecordingDevice::new();
    let desc = RenderTargetDesc::new("gbuffer", 64, 64)
        .with_color_formats(vec![TextureFormat::R8G8B8A8_UNORM, TextureFormat::R16G16B16A16_SFLOAT])
        .with_depth(false);
    let target = RenderTarget::new(&mut device, desc).unwrap();

    assert_eq!(target.color_attachments().len(), 2);
    assert!(target.depth_attachment().is_none());
}

#[test]
fn test_invalid_descriptors_fail() {
    let mut device = RecordingDevice::new();
    let zero = RenderTarget::new(&mut device, RenderTargetDesc::new("zero", 0, 10));
    assert!(matches!(zero, Err(Error::InvalidConfiguration(_))));

    let no_color = RenderTarget::new(&mut device, RenderTargetDesc::new("none", 4, 4).with_color_formats(vec![]));
    assert!(matches!(no_color, Err(Error::InvalidConfiguration(_))));

    let depth_as_color = RenderTarget::new(
        &mut device,
        RenderTargetDesc::new("bad", 4, 4).with_color_formats(vec![TextureFormat::D32_FLOAT]),
    );
    assert!(matches!(depth_as_color, Err(Error::InvalidConfiguration(_))));
}

#[test]
fn test_framebuffer_failure_propagates() {
    let mut device = RecordingDevice::new();
    device.set_fail_framebuffers(true);
    assert!(RenderTarget::new(&mut device, RenderTargetDesc::new("scene", 8, 8)).is_err());
}

// ============================================================================
// Resize
// ============================================================================

#[test]
fn test_set_size_reallocates_in_place() {
    let mut device = RecordingDevice::new();
    let mut target = RenderTarget::new(&mut device, RenderTargetDesc::new("scene", 100, 100)).unwrap();
    let old_texture = target.texture().id();
    let old_framebuffer = target.framebuffer().id();

    target.set_size(&mut device, 200, 50).unwrap();

    assert_eq!((target.width(), target.height()), (200, 50));
    assert_ne!(target.texture().id(), old_texture);
    assert_ne!(target.framebuffer().id(), old_framebuffer);
    assert_eq!(target.texture().info().width, 200);
    assert_eq!(target.name(), "scene");
}

#[test]
fn test_set_size_same_size_is_noop() {
    let mut device = RecordingDevice::new();
    let mut target = RenderTarget::new(&mut device, RenderTargetDesc::new("scene", 100, 100)).unwrap();
    let texture = target.texture().id();
    target.set_size(&mut device, 100, 100).unwrap();
    assert_eq!(target.texture().id(), texture);
    assert_eq!(device.framebuffers_created(), 1);
}

#[test]
fn test_failed_resize_keeps_previous_attachments() {
    let mut device = RecordingDevice::new();
    let mut target = RenderTarget::new(&mut device, RenderTargetDesc::new("scene", 100, 100)).unwrap();
    let framebuffer = target.framebuffer().id();

    device.set_fail_framebuffers(true);
    assert!(target.set_size(&mut device, 10, 10).is_err());
    assert_eq!(target.framebuffer().id(), framebuffer);
    assert_eq!(target.width(), 100);
}

// ============================================================================
// Commands
// ============================================================================

#[test]
fn test_bind_and_clear() {
    let mut device = RecordingDevice::new();
    let target = RenderTarget::new(
        &mut device,
        RenderTargetDesc::new("scene", 16, 8).with_clear_color([0.1, 0.2, 0.3, 1.0]),
    )
    .unwrap();

    target.bind(&mut device).unwrap();
    target.clear(&mut device).unwrap();

    assert_eq!(device.commands(), &[
        Command::SetRenderTarget(Some(target.framebuffer().id())),
        Command::SetViewport(Viewport::from_size(16, 8)),
        Command::Clear(vec![ClearValue::Color([0.1, 0.2, 0.3, 1.0]), ClearValue::Depth(1.0)]),
    ]);
}
