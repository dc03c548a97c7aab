/// Graphics device module - the abstraction every graphics API binding satisfies
///
/// The engine never talks to a concrete API. Everything goes through the
/// `GraphicsDevice` trait, passed explicitly to whoever issues GPU work.

// Module declarations
pub mod graphics_device;
pub mod texture;
pub mod buffer;
pub mod program;
pub mod frame_buffer;
pub mod state;
pub mod recording_device;

// Re-export everything from graphics_device.rs
pub use graphics_device::*;

// Re-export from other modules
pub use texture::*;
pub use buffer::*;
pub use program::*;
pub use frame_buffer::*;
pub use state::*;
pub use recording_device::{RecordingDevice, Command};
