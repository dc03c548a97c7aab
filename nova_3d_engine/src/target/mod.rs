//! Render target module
//!
//! Offscreen framebuffers: single render targets and read/write double
//! buffers for feedback effects.

mod double_buffer;
mod render_target;

pub use double_buffer::DoubleBuffer;
pub use render_target::{RenderTarget, RenderTargetDesc};
pub(crate) use render_target::PendingResize;
