/// Render target - an offscreen framebuffer and its attachments.
///
/// A RenderTarget owns one or more color textures, an optional depth
/// texture and the framebuffer grouping them. `set_size()` reallocates the
/// attachments in place: the RenderTarget value (and anything holding it)
/// stays the same, only its textures and framebuffer are replaced. Prior
/// contents are undefined after a resize.

use std::sync::Arc;
use crate::error::Result;
use crate::{engine_bail, engine_debug};
use crate::graphics_device::{
    self, ClearValue, Framebuffer, FramebufferDesc, Texture, TextureDesc, TextureFormat,
    TextureType, TextureUsage, Viewport,
};

// ===== DESCRIPTOR =====

/// Offscreen target configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RenderTargetDesc {
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// One entry per color attachment
    pub color_formats: Vec<TextureFormat>,
    /// Whether a depth attachment is allocated
    pub depth: bool,
    /// Clear color of every color attachment (RGBA)
    pub clear_color: [f32; 4],
}

impl RenderTargetDesc {
    /// One RGBA8 color attachment plus depth
    pub fn new(name: &str, width: u32, height: u32) -> Self {
        Self {
            name: name.to_string(),
            width,
            height,
            color_formats: vec![TextureFormat::R8G8B8A8_UNORM],
            depth: true,
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }

    pub fn with_color_formats(mut self, formats: Vec<TextureFormat>) -> Self {
        self.color_formats = formats;
        self
    }

    pub fn with_depth(mut self, depth: bool) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_clear_color(mut self, color: [f32; 4]) -> Self {
        self.clear_color = color;
        self
    }
}

/// Attachments of one allocation
struct Attachments {
    colors: Vec<Arc<dyn Texture>>,
    depth: Option<Arc<dyn Texture>>,
    framebuffer: Arc<dyn Framebuffer>,
}

/// Attachments allocated for a size change, not yet installed
pub(crate) struct PendingResize {
    /// `None` when the size is unchanged
    attachments: Option<Attachments>,
    width: u32,
    height: u32,
}

// ===== RENDER TARGET =====

pub struct RenderTarget {
    desc: RenderTargetDesc,
    attachments: Attachments,
}

impl RenderTarget {
    /// Allocate a render target
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` for a zero size, no color attachment or a depth
    /// format used as color; any device creation error.
    pub fn new(device: &mut dyn graphics_device::GraphicsDevice, desc: RenderTargetDesc) -> Result<Self> {
        if desc.color_formats.is_empty() {
            engine_bail!("nova3d::RenderTarget", InvalidConfiguration =>
                "RenderTarget '{}' needs at least one color attachment", desc.name);
        }
        if let Some(format) = desc.color_formats.iter().find(|f| f.is_depth()) {
            engine_bail!("nova3d::RenderTarget", InvalidConfiguration =>
                "RenderTarget '{}': {:?} is not a color format", desc.name, format);
        }
        let attachments = allocate(device, &desc, desc.width, desc.height)?;
        engine_debug!("nova3d::RenderTarget", "Created '{}' ({}x{}, {} color attachment(s), depth: {})",
            desc.name, desc.width, desc.height, desc.color_formats.len(), desc.depth);
        Ok(Self { desc, attachments })
    }

    /// Reallocate attachments to a new size
    ///
    /// Same size is a no-op. On failure the previous attachments are kept.
    pub fn set_size(&mut self, device: &mut dyn graphics_device::GraphicsDevice, width: u32, height: u32) -> Result<()> {
        let pending = self.prepare_resize(device, width, height)?;
        self.commit_resize(pending);
        Ok(())
    }

    /// Allocate attachments for a new size without touching this target
    ///
    /// Owners of several targets prepare all of them before committing any.
    pub(crate) fn prepare_resize(
        &self,
        device: &mut dyn graphics_device::GraphicsDevice,
        width: u32,
        height: u32,
    ) -> Result<PendingResize> {
        let attachments = if width == self.desc.width && height == self.desc.height {
            None
        } else {
            Some(allocate(device, &self.desc, width, height)?)
        };
        Ok(PendingResize { attachments, width, height })
    }

    /// Install attachments returned by `prepare_resize`
    pub(crate) fn commit_resize(&mut self, pending: PendingResize) {
        let Some(attachments) = pending.attachments else { return };
        self.attachments = attachments;
        self.desc.width = pending.width;
        self.desc.height = pending.height;
        engine_debug!("nova3d::RenderTarget", "Resized '{}' to {}x{}", self.desc.name, pending.width, pending.height);
    }

    // ===== DRAW HELPERS =====

    /// Make this target current with a full-size viewport
    pub fn bind(&self, device: &mut dyn graphics_device::GraphicsDevice) -> Result<()> {
        device.set_render_target(Some(&self.attachments.framebuffer))?;
        device.set_viewport(Viewport::from_size(self.desc.width, self.desc.height))
    }

    /// Clear every attachment of the current target with this target's clear values
    pub fn clear(&self, device: &mut dyn graphics_device::GraphicsDevice) -> Result<()> {
        let mut values: Vec<ClearValue> = self
            .attachments
            .colors
            .iter()
            .map(|_| ClearValue::Color(self.desc.clear_color))
            .collect();
        if self.attachments.depth.is_some() {
            values.push(ClearValue::Depth(1.0));
        }
        device.clear(&values)
    }

    // ===== ACCESSORS =====

    pub fn name(&self) -> &str {
        &self.desc.name
    }

    pub fn desc(&self) -> &RenderTargetDesc {
        &self.desc
    }

    pub fn width(&self) -> u32 {
        self.desc.width
    }

    pub fn height(&self) -> u32 {
        self.desc.height
    }

    /// First color attachment (the texture sampled by the next pass)
    pub fn texture(&self) -> &Arc<dyn Texture> {
        &self.attachments.colors[0]
    }

    pub fn color_attachments(&self) -> &[Arc<dyn Texture>] {
        &self.attachments.colors
    }

    pub fn depth_attachment(&self) -> Option<&Arc<dyn Texture>> {
        self.attachments.depth.as_ref()
    }

    pub fn framebuffer(&self) -> &Arc<dyn Framebuffer> {
        &self.attachments.framebuffer
    }
}

/// Create all attachments and the framebuffer for one size
fn allocate(
    device: &mut dyn graphics_device::GraphicsDevice,
    desc: &RenderTargetDesc,
    width: u32,
    height: u32,
) -> Result<Attachments> {
    if width == 0 || height == 0 {
        engine_bail!("nova3d::RenderTarget", InvalidConfiguration =>
            "RenderTarget '{}': size must be non-zero (got {}x{})", desc.name, width, height);
    }
    let colors = desc
        .color_formats
        .iter()
        .map(|&format| {
            device.create_texture(TextureDesc {
                width,
                height,
                format,
                usage: TextureUsage::SampledAndRenderTarget,
                texture_type: TextureType::Tex2D,
                data: None,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let depth = if desc.depth {
        Some(device.create_texture(TextureDesc {
            width,
            height,
            format: TextureFormat::D24_UNORM_S8_UINT,
            usage: TextureUsage::DepthStencil,
            texture_type: TextureType::Tex2D,
            data: None,
        })?)
    } else {
        None
    };
    let framebuffer = device.create_framebuffer(FramebufferDesc {
        color_attachments: colors.clone(),
        depth_attachment: depth.clone(),
        width,
        height,
    })?;
    Ok(Attachments { colors, depth, framebuffer })
}

#[cfg(test)]
#[path = "render_target_tests.rs"]
mod tests;
