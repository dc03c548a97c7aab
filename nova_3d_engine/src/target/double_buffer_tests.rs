/// Tests for DoubleBuffer

use super::*;
use crate::graphics_device::RecordingDevice;

fn double_buffer(device: &mut RecordingDevice) -> DoubleBuffer {
    DoubleBuffer::new(device, RenderTargetDesc::new("history", 32, 32)).unwrap()
}

#[test]
fn test_read_and_write_are_distinct() {
    let mut device = RecordingDevice::new();
    let buffer = double_buffer(&mut device);
    assert_ne!(buffer.read().framebuffer().id(), buffer.write().framebuffer().id());
    assert_eq!(buffer.read().name(), "history.0");
    assert_eq!(buffer.write().name(), "history.1");
}

#[test]
fn test_swap_parity() {
    let mut device = RecordingDevice::new();
    let mut buffer = double_buffer(&mut device);
    let read = buffer.read().texture().id();
    let write = buffer.write().texture().id();

    for swaps in 1..=6 {
        buffer.swap();
        let (r, w) = (buffer.read().texture().id(), buffer.write().texture().id());
        assert_ne!(r, w);
        if swaps % 2 == 0 {
            assert_eq!((r, w), (read, write));
        } else {
            assert_eq!((r, w), (write, read));
        }
    }
}

#[test]
fn test_set_size_resizes_both() {
    let mut device = RecordingDevice::new();
    let mut buffer = double_buffer(&mut device);
    buffer.swap();
    buffer.set_size(&mut device, 64, 48).unwrap();

    assert_eq!((buffer.width(), buffer.height()), (64, 48));
    assert_eq!(buffer.read().width(), 64);
    assert_eq!(buffer.write().height(), 48);
    assert_eq!(buffer.read_index(), 1);
}

#[test]
fn test_failed_resize_leaves_both_targets_unchanged() {
    let mut device = RecordingDevice::new();
    let mut buffer = double_buffer(&mut device);
    let ids = (buffer.read().framebuffer().id(), buffer.write().framebuffer().id());
    device.fail_framebuffers_after(1);

    assert!(buffer.set_size(&mut device, 64, 48).is_err());

    assert_eq!((buffer.read().width(), buffer.read().height()), (32, 32));
    assert_eq!((buffer.write().width(), buffer.write().height()), (32, 32));
    assert_eq!((buffer.read().framebuffer().id(), buffer.write().framebuffer().id()), ids);
}
