/// Framebuffer trait - groups render target attachments
///
/// A framebuffer binds together color and depth attachments that draws
/// render into. Recreated whenever its attachments are reallocated
/// (e.g. on resize).

use std::sync::Arc;
use super::texture::Texture;

/// Framebuffer - groups color and depth attachments together
pub trait Framebuffer: Send + Sync {
    /// Stable backend handle id
    fn id(&self) -> u64;

    /// Width in pixels
    fn width(&self) -> u32;

    /// Height in pixels
    fn height(&self) -> u32;
}

/// Descriptor for creating a framebuffer
pub struct FramebufferDesc {
    /// Color attachments (one or more)
    pub color_attachments: Vec<Arc<dyn Texture>>,
    /// Optional depth attachment
    pub depth_attachment: Option<Arc<dyn Texture>>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}
