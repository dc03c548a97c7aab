/// GraphicsDevice trait - resource factory and command entry points
///
/// A device is owned by the Engine and passed as `&mut dyn GraphicsDevice`
/// to everything that creates GPU objects or issues draws. There is no
/// process-wide device: several independent devices (e.g. one real, one
/// recording) can coexist.

use std::sync::Arc;
use crate::error::Result;
use crate::uniform::UniformValue;
use super::{
    Buffer, BufferDesc, Texture, TextureDesc, Framebuffer, FramebufferDesc,
    Program, ProgramDesc, PrimitiveTopology, IndexType, CullMode,
    DepthState, BlendState, Viewport, ClearValue,
};

/// Main graphics device trait
///
/// Implemented by backend-specific devices. Every creation method fails with
/// an `Err` when the backend object cannot be created; callers propagate it
/// and abort the frame.
pub trait GraphicsDevice: Send {
    // ===== RESOURCE CREATION =====

    /// Create a buffer and upload `data` into it
    fn create_buffer(&mut self, desc: BufferDesc, data: &[u8]) -> Result<Arc<dyn Buffer>>;

    /// Create a texture
    fn create_texture(&mut self, desc: TextureDesc) -> Result<Arc<dyn Texture>>;

    /// Create a framebuffer grouping color and depth attachments
    fn create_framebuffer(&mut self, desc: FramebufferDesc) -> Result<Arc<dyn Framebuffer>>;

    /// Compile and link a shader program
    fn create_program(&mut self, desc: &ProgramDesc) -> Result<Arc<dyn Program>>;

    /// 1x1 neutral texture bound in place of a null texture uniform
    fn neutral_texture(&mut self) -> Result<Arc<dyn Texture>>;

    // ===== FRAME STATE =====

    /// Select the draw destination (`None` = the presentation surface)
    fn set_render_target(&mut self, framebuffer: Option<&Arc<dyn Framebuffer>>) -> Result<()>;

    /// Set the viewport
    fn set_viewport(&mut self, viewport: Viewport) -> Result<()>;

    /// Clear the current render target
    fn clear(&mut self, values: &[ClearValue]) -> Result<()>;

    // ===== DRAW STATE =====

    /// Make a program current
    fn use_program(&mut self, program: &Arc<dyn Program>) -> Result<()>;

    /// Bind a vertex buffer
    fn bind_vertex_buffer(&mut self, buffer: &Arc<dyn Buffer>) -> Result<()>;

    /// Bind an index buffer
    fn bind_index_buffer(&mut self, buffer: &Arc<dyn Buffer>, index_type: IndexType) -> Result<()>;

    /// Set face culling
    fn set_cull_mode(&mut self, mode: CullMode) -> Result<()>;

    /// Set depth test/write state
    fn set_depth_state(&mut self, state: DepthState) -> Result<()>;

    /// Set color blend state
    fn set_blend_state(&mut self, state: BlendState) -> Result<()>;

    /// Upload a leaf uniform (never a Struct, StructArray or texture value)
    fn set_uniform(&mut self, name: &str, value: &UniformValue) -> Result<()>;

    /// Bind a texture to a texture unit and point the sampler uniform `name` at it
    fn bind_texture(&mut self, unit: u32, name: &str, texture: &Arc<dyn Texture>) -> Result<()>;

    // ===== DRAWS =====

    /// Non-indexed draw
    fn draw_arrays(&mut self, topology: PrimitiveTopology, first: u32, count: u32) -> Result<()>;

    /// Indexed draw from the bound index buffer
    fn draw_elements(
        &mut self,
        topology: PrimitiveTopology,
        index_type: IndexType,
        first: u32,
        count: u32,
    ) -> Result<()>;
}
