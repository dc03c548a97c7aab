/// Recording graphics device (no GPU required)
///
/// Implements `GraphicsDevice` by allocating handle ids and recording every
/// state change and draw into a command list. Used by the engine's tests
/// and for headless runs where frames are inspected instead of displayed.

use std::sync::Arc;
use rustc_hash::FxHashSet;
use crate::error::Result;
use crate::engine_bail;
use crate::uniform::UniformValue;
use super::{
    GraphicsDevice, Buffer, BufferDesc, BufferUsage, Texture, TextureDesc, TextureInfo,
    TextureFormat, TextureUsage, TextureType, Framebuffer, FramebufferDesc, Program,
    ProgramDesc, PrimitiveTopology, IndexType, CullMode, DepthState, BlendState,
    Viewport, ClearValue,
};

// ============================================================================
// Recorded resources
// ============================================================================

#[derive(Debug)]
pub struct RecordedBuffer {
    pub id: u64,
    pub name: String,
    pub size: u64,
    pub usage: BufferUsage,
}

impl Buffer for RecordedBuffer {
    fn id(&self) -> u64 { self.id }
    fn size(&self) -> u64 { self.size }
    fn usage(&self) -> BufferUsage { self.usage }
}

#[derive(Debug)]
pub struct RecordedTexture {
    pub id: u64,
    pub info: TextureInfo,
}

impl Texture for RecordedTexture {
    fn id(&self) -> u64 { self.id }
    fn info(&self) -> &TextureInfo { &self.info }
}

#[derive(Debug)]
pub struct RecordedFramebuffer {
    pub id: u64,
    pub width: u32,
    pub height: u32,
    pub color_attachments: Vec<u64>,
    pub depth_attachment: Option<u64>,
}

impl Framebuffer for RecordedFramebuffer {
    fn id(&self) -> u64 { self.id }
    fn width(&self) -> u32 { self.width }
    fn height(&self) -> u32 { self.height }
}

#[derive(Debug)]
pub struct RecordedProgram {
    pub id: u64,
    pub name: String,
}

impl Program for RecordedProgram {
    fn id(&self) -> u64 { self.id }
    fn name(&self) -> &str { &self.name }
}

// ============================================================================
// Recorded commands
// ============================================================================

/// One recorded device call
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `None` = presentation surface
    SetRenderTarget(Option<u64>),
    SetViewport(Viewport),
    Clear(Vec<ClearValue>),
    UseProgram(u64),
    BindVertexBuffer(u64),
    BindIndexBuffer(u64, IndexType),
    SetCullMode(CullMode),
    SetDepthState(DepthState),
    SetBlendState(BlendState),
    SetUniform { name: String, value: UniformValue },
    BindTexture { unit: u32, name: String, texture: u64 },
    DrawArrays { topology: PrimitiveTopology, first: u32, count: u32 },
    DrawElements { topology: PrimitiveTopology, index_type: IndexType, first: u32, count: u32 },
}

impl Command {
    /// Whether this command is a draw
    pub fn is_draw(&self) -> bool {
        matches!(self, Command::DrawArrays { .. } | Command::DrawElements { .. })
    }
}

// ============================================================================
// RecordingDevice
// ============================================================================

/// Headless device recording every call
///
/// The command list grows until `clear_commands()` is called. Long headless
/// runs clear it once per frame or switch recording off with
/// `set_recording(false)`; resources are still created either way.
pub struct RecordingDevice {
    next_id: u64,
    commands: Vec<Command>,
    neutral_texture: Option<Arc<dyn Texture>>,
    failing_programs: FxHashSet<String>,
    /// Framebuffer creations left before they start failing (`None` = unlimited)
    framebuffer_budget: Option<u32>,
    recording: bool,
    textures_created: u32,
    framebuffers_created: u32,
    programs_created: u32,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            commands: Vec::new(),
            neutral_texture: None,
            failing_programs: FxHashSet::default(),
            framebuffer_budget: None,
            recording: true,
            textures_created: 0,
            framebuffers_created: 0,
            programs_created: 0,
        }
    }

    fn record(&mut self, command: Command) {
        if self.recording {
            self.commands.push(command);
        }
    }

    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// All commands recorded since creation or the last `clear_commands()`
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Forget recorded commands (resources stay alive)
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Number of recorded draws
    pub fn draw_count(&self) -> usize {
        self.commands.iter().filter(|c| c.is_draw()).count()
    }

    /// Last value uploaded for a uniform name
    pub fn last_uniform(&self, name: &str) -> Option<&UniformValue> {
        self.commands.iter().rev().find_map(|c| match c {
            Command::SetUniform { name: n, value } if n == name => Some(value),
            _ => None,
        })
    }

    /// Make program creation fail for programs with this name
    pub fn fail_program(&mut self, name: &str) {
        self.failing_programs.insert(name.to_string());
    }

    /// Make every framebuffer creation fail
    pub fn set_fail_framebuffers(&mut self, fail: bool) {
        self.framebuffer_budget = if fail { Some(0) } else { None };
    }

    /// Let `count` more framebuffer creations succeed, then fail every later one
    pub fn fail_framebuffers_after(&mut self, count: u32) {
        self.framebuffer_budget = Some(count);
    }

    /// Turn command recording on or off (on by default)
    pub fn set_recording(&mut self, recording: bool) {
        self.recording = recording;
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn textures_created(&self) -> u32 {
        self.textures_created
    }

    pub fn framebuffers_created(&self) -> u32 {
        self.framebuffers_created
    }

    pub fn programs_created(&self) -> u32 {
        self.programs_created
    }
}

impl Default for RecordingDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsDevice for RecordingDevice {
    fn create_buffer(&mut self, desc: BufferDesc, data: &[u8]) -> Result<Arc<dyn Buffer>> {
        if data.is_empty() {
            engine_bail!("nova3d::RecordingDevice", InvalidResource =>
                "Buffer '{}' created with no data", desc.name);
        }
        let id = self.alloc_id();
        Ok(Arc::new(RecordedBuffer {
            id,
            name: desc.name,
            size: data.len() as u64,
            usage: desc.usage,
        }))
    }

    fn create_texture(&mut self, desc: TextureDesc) -> Result<Arc<dyn Texture>> {
        if desc.width == 0 || desc.height == 0 {
            engine_bail!("nova3d::RecordingDevice", InvalidResource =>
                "Texture size must be non-zero (got {}x{})", desc.width, desc.height);
        }
        let id = self.alloc_id();
        self.textures_created += 1;
        Ok(Arc::new(RecordedTexture {
            id,
            info: TextureInfo {
                width: desc.width,
                height: desc.height,
                format: desc.format,
                usage: desc.usage,
                texture_type: desc.texture_type,
            },
        }))
    }

    fn create_framebuffer(&mut self, desc: FramebufferDesc) -> Result<Arc<dyn Framebuffer>> {
        if let Some(budget) = &mut self.framebuffer_budget {
            if *budget == 0 {
                engine_bail!("nova3d::RecordingDevice", "Framebuffer creation failed");
            }
            *budget -= 1;
        }
        if desc.color_attachments.is_empty() {
            engine_bail!("nova3d::RecordingDevice", InvalidResource =>
                "Framebuffer needs at least one color attachment");
        }
        let id = self.alloc_id();
        self.framebuffers_created += 1;
        Ok(Arc::new(RecordedFramebuffer {
            id,
            width: desc.width,
            height: desc.height,
            color_attachments: desc.color_attachments.iter().map(|t| t.id()).collect(),
            depth_attachment: desc.depth_attachment.as_ref().map(|t| t.id()),
        }))
    }

    fn create_program(&mut self, desc: &ProgramDesc) -> Result<Arc<dyn Program>> {
        if self.failing_programs.contains(&desc.name) {
            engine_bail!("nova3d::RecordingDevice", "Program '{}' failed to link", desc.name);
        }
        if desc.vertex_source.trim().is_empty() || desc.fragment_source.trim().is_empty() {
            engine_bail!("nova3d::RecordingDevice",
                "Program '{}' failed to compile: empty shader stage", desc.name);
        }
        let id = self.alloc_id();
        self.programs_created += 1;
        Ok(Arc::new(RecordedProgram { id, name: desc.name.clone() }))
    }

    fn neutral_texture(&mut self) -> Result<Arc<dyn Texture>> {
        if let Some(texture) = &self.neutral_texture {
            return Ok(Arc::clone(texture));
        }
        let texture = self.create_texture(TextureDesc {
            width: 1,
            height: 1,
            format: TextureFormat::R8G8B8A8_UNORM,
            usage: TextureUsage::Sampled,
            texture_type: TextureType::Tex2D,
            data: Some(vec![255, 255, 255, 255]),
        })?;
        self.neutral_texture = Some(Arc::clone(&texture));
        Ok(texture)
    }

    fn set_render_target(&mut self, framebuffer: Option<&Arc<dyn Framebuffer>>) -> Result<()> {
        self.record(Command::SetRenderTarget(framebuffer.map(|f| f.id())));
        Ok(())
    }

    fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        self.record(Command::SetViewport(viewport));
        Ok(())
    }

    fn clear(&mut self, values: &[ClearValue]) -> Result<()> {
        self.record(Command::Clear(values.to_vec()));
        Ok(())
    }

    fn use_program(&mut self, program: &Arc<dyn Program>) -> Result<()> {
        self.record(Command::UseProgram(program.id()));
        Ok(())
    }

    fn bind_vertex_buffer(&mut self, buffer: &Arc<dyn Buffer>) -> Result<()> {
        self.record(Command::BindVertexBuffer(buffer.id()));
        Ok(())
    }

    fn bind_index_buffer(&mut self, buffer: &Arc<dyn Buffer>, index_type: IndexType) -> Result<()> {
        self.record(Command::BindIndexBuffer(buffer.id(), index_type));
        Ok(())
    }

    fn set_cull_mode(&mut self, mode: CullMode) -> Result<()> {
        self.record(Command::SetCullMode(mode));
        Ok(())
    }

    fn set_depth_state(&mut self, state: DepthState) -> Result<()> {
        self.record(Command::SetDepthState(state));
        Ok(())
    }

    fn set_blend_state(&mut self, state: BlendState) -> Result<()> {
        self.record(Command::SetBlendState(state));
        Ok(())
    }

    fn set_uniform(&mut self, name: &str, value: &UniformValue) -> Result<()> {
        self.record(Command::SetUniform { name: name.to_string(), value: value.clone() });
        Ok(())
    }

    fn bind_texture(&mut self, unit: u32, name: &str, texture: &Arc<dyn Texture>) -> Result<()> {
        self.record(Command::BindTexture {
            unit,
            name: name.to_string(),
            texture: texture.id(),
        });
        Ok(())
    }

    fn draw_arrays(&mut self, topology: PrimitiveTopology, first: u32, count: u32) -> Result<()> {
        self.record(Command::DrawArrays { topology, first, count });
        Ok(())
    }

    fn draw_elements(
        &mut self,
        topology: PrimitiveTopology,
        index_type: IndexType,
        first: u32,
        count: u32,
    ) -> Result<()> {
        self.record(Command::DrawElements { topology, index_type, first, count });
        Ok(())
    }
}

#[cfg(test)]
#[path = "recording_device_tests.rs"]
mod tests;
