/// PostProcessPass - one full-screen stage of the postprocess chain.
///
/// A pass pairs a material with the output it renders into. Ordinary passes
/// own a single RenderTarget; feedback passes own a DoubleBuffer so they can
/// sample their own previous result (`tHistory`) while writing a new one.

use std::sync::Arc;
use glam::Mat4;
use crate::error::Result;
use crate::engine_warn;
use crate::graphics_device::{self, Texture};
use crate::resource::Material;
use crate::target::{DoubleBuffer, PendingResize, RenderTarget, RenderTargetDesc};
use crate::uniform::Uniform;

/// Sampler receiving the previous stage's output
pub const SOURCE_UNIFORM: &str = "tDiffuse";
/// Sampler receiving a feedback pass's own previous output
pub const HISTORY_UNIFORM: &str = "tHistory";
/// Full-screen quad matrices
pub const PROJECTION_UNIFORM: &str = "projectionMatrix";
pub const MODEL_VIEW_UNIFORM: &str = "modelViewMatrix";

/// Where a pass renders
pub enum PassOutput {
    Single(RenderTarget),
    Feedback(DoubleBuffer),
}

/// Output allocated for a size change, not yet installed
pub(crate) enum PendingOutput {
    Single(PendingResize),
    Feedback([PendingResize; 2]),
}

pub struct PostProcessPass {
    name: String,
    material: Material,
    output: PassOutput,
    enabled: bool,
}

impl PostProcessPass {
    /// Pass rendering into its own render target
    pub fn new(
        device: &mut dyn graphics_device::GraphicsDevice,
        name: &str,
        material: Material,
        desc: RenderTargetDesc,
    ) -> Result<Self> {
        let target = RenderTarget::new(device, desc)?;
        Ok(Self::with_output(name, material, PassOutput::Single(target)))
    }

    /// Pass rendering into a double buffer, sampling its previous result
    pub fn feedback(
        device: &mut dyn graphics_device::GraphicsDevice,
        name: &str,
        material: Material,
        desc: RenderTargetDesc,
    ) -> Result<Self> {
        let buffer = DoubleBuffer::new(device, desc)?;
        Ok(Self::with_output(name, material, PassOutput::Feedback(buffer)))
    }

    fn with_output(name: &str, mut material: Material, output: PassOutput) -> Self {
        let uniforms = material.uniforms_mut();
        let mut required = vec![
            Uniform::texture(SOURCE_UNIFORM, None),
            Uniform::mat4(PROJECTION_UNIFORM, Mat4::IDENTITY),
            Uniform::mat4(MODEL_VIEW_UNIFORM, Mat4::IDENTITY),
        ];
        if matches!(output, PassOutput::Feedback(_)) {
            required.push(Uniform::texture(HISTORY_UNIFORM, None));
        }
        for uniform in required {
            if !uniforms.contains(&uniform.name) {
                uniforms.insert(uniform);
            }
        }
        Self { name: name.to_string(), material, output, enabled: true }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    // ===== ACCESSORS =====

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn material_mut(&mut self) -> &mut Material {
        &mut self.material
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut Material, &mut PassOutput) {
        (&mut self.material, &mut self.output)
    }

    pub fn output(&self) -> &PassOutput {
        &self.output
    }

    pub fn is_feedback(&self) -> bool {
        matches!(self.output, PassOutput::Feedback(_))
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Texture holding this pass's latest result
    pub fn output_texture(&self) -> &Arc<dyn Texture> {
        match &self.output {
            PassOutput::Single(target) => target.texture(),
            PassOutput::Feedback(buffer) => buffer.read().texture(),
        }
    }

    /// Resize the pass output
    pub fn set_size(&mut self, device: &mut dyn graphics_device::GraphicsDevice, width: u32, height: u32) -> Result<()> {
        let pending = self.prepare_resize(device, width, height)?;
        self.commit_resize(pending);
        Ok(())
    }

    /// Allocate the resized output without installing it
    pub(crate) fn prepare_resize(
        &self,
        device: &mut dyn graphics_device::GraphicsDevice,
        width: u32,
        height: u32,
    ) -> Result<PendingOutput> {
        Ok(match &self.output {
            PassOutput::Single(target) => PendingOutput::Single(target.prepare_resize(device, width, height)?),
            PassOutput::Feedback(buffer) => PendingOutput::Feedback(buffer.prepare_resize(device, width, height)?),
        })
    }

    pub(crate) fn commit_resize(&mut self, pending: PendingOutput) {
        match (&mut self.output, pending) {
            (PassOutput::Single(target), PendingOutput::Single(pending)) => target.commit_resize(pending),
            (PassOutput::Feedback(buffer), PendingOutput::Feedback(pending)) => buffer.commit_resize(pending),
            _ => engine_warn!("nova3d::PostProcess", "Pass '{}': resize does not match its output kind", self.name),
        }
    }
}
