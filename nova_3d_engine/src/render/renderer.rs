/// Renderer - scene pass + postprocess chain + the shared dispatch state.
///
/// Owns everything sized to the surface: the scene target, the postprocess
/// pipeline and an optional offscreen output target. `set_size` resizes all
/// of them, plus every camera in the scene, before the next frame renders.

use crate::error::Result;
use crate::engine_info;
use crate::config::{self, EngineConfig};
use crate::dispatch::GpuDispatch;
use crate::graphics_device;
use crate::postprocess::PostProcessPipeline;
use crate::scene::{Capabilities, SceneGraph};
use crate::target::RenderTarget;
use super::scene_renderer::SceneRenderer;

pub struct Renderer {
    scene: SceneRenderer,
    postprocess: PostProcessPipeline,
    dispatch: GpuDispatch,
    /// Final destination; `None` presents to the screen
    output: Option<RenderTarget>,
    width: u32,
    height: u32,
    pixel_ratio: f32,
}

impl Renderer {
    pub fn new(device: &mut dyn graphics_device::GraphicsDevice, config: &EngineConfig) -> Result<Self> {
        let (width, height) = config.device_size();
        let scene = SceneRenderer::new(device, width, height, config.clear_color)?;
        let postprocess = PostProcessPipeline::new(device, width, height)?
            .with_clear_color(config.clear_color);
        Ok(Self {
            scene,
            postprocess,
            dispatch: GpuDispatch::new(),
            output: None,
            width: config.width,
            height: config.height,
            pixel_ratio: config.pixel_ratio,
        })
    }

    /// Render one frame; returns the number of draw calls issued
    pub fn render(&mut self, device: &mut dyn graphics_device::GraphicsDevice, graph: &mut SceneGraph) -> Result<u64> {
        self.dispatch.reset_draw_calls();
        self.scene.render(device, &mut self.dispatch, graph)?;
        self.postprocess.render(
            device,
            &mut self.dispatch,
            self.scene.target().texture(),
            self.output.as_ref(),
        )?;
        Ok(self.dispatch.draw_calls())
    }

    /// Propagate a surface size change
    ///
    /// `width`/`height` are logical pixels; targets are allocated in device
    /// pixels (`width * pixel_ratio`). Cameras take the new aspect ratio.
    pub fn set_size(
        &mut self,
        device: &mut dyn graphics_device::GraphicsDevice,
        graph: &mut SceneGraph,
        width: u32,
        height: u32,
        pixel_ratio: f32,
    ) -> Result<()> {
        let (device_width, device_height) = config::device_pixels(width, height, pixel_ratio);
        // allocate every target first; nothing changes unless all succeed
        let scene_pending = self.scene.target().prepare_resize(device, device_width, device_height)?;
        let output_pending = match &self.output {
            Some(output) => Some(output.prepare_resize(device, device_width, device_height)?),
            None => None,
        };
        self.postprocess.set_size(device, device_width, device_height)?;

        self.scene.commit_resize(scene_pending);
        if let (Some(output), Some(pending)) = (&mut self.output, output_pending) {
            output.commit_resize(pending);
        }
        for key in graph.keys_with(Capabilities::CAMERA) {
            if let Some(camera) = graph.node_mut(key).and_then(|n| n.camera_data_mut()) {
                camera.set_size(width, height);
            }
        }
        self.width = width;
        self.height = height;
        self.pixel_ratio = pixel_ratio;
        engine_info!("nova3d::Renderer", "Surface resized to {}x{} (x{})", width, height, pixel_ratio);
        Ok(())
    }

    /// Render into an offscreen target instead of the screen
    pub fn set_output(&mut self, output: Option<RenderTarget>) {
        self.output = output;
    }

    pub fn output(&self) -> Option<&RenderTarget> {
        self.output.as_ref()
    }

    pub fn scene_renderer(&self) -> &SceneRenderer {
        &self.scene
    }

    pub fn postprocess(&self) -> &PostProcessPipeline {
        &self.postprocess
    }

    pub fn postprocess_mut(&mut self) -> &mut PostProcessPipeline {
        &mut self.postprocess
    }

    pub fn dispatch(&self) -> &GpuDispatch {
        &self.dispatch
    }

    /// Logical surface size
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }
}

#[cfg(test)]
#[path = "renderer_tests.rs"]
mod tests;
