/// PostProcessPipeline - ordered chain of full-screen passes.
///
/// Each frame the chain runs over the *enabled* passes only: disabled
/// passes are dropped before the frame starts, so their neighbours hand off
/// to each other directly.
///
/// Hand-off per frame:
/// - the first enabled pass samples the scene texture
/// - every later pass samples the previous pass's output texture
/// - the last enabled pass renders straight into the final target; no
///   other pass ever writes it
/// - with no enabled pass, the scene texture is copied to the final target
///
/// A feedback pass always renders into its double buffer; when it is last,
/// a copy into the final target follows.

use std::sync::Arc;
use glam::{Mat4, Vec3};
use crate::error::Result;
use crate::{engine_debug, engine_info, engine_warn};
use crate::camera::Camera;
use crate::dispatch::GpuDispatch;
use crate::graphics_device::{self, ClearValue, CullMode, Texture, Viewport};
use crate::resource::{Geometry, Material, Side};
use crate::target::RenderTarget;
use crate::uniform::{Uniform, UniformValue, Uniforms};
use super::pass::{
    PassOutput, PostProcessPass, HISTORY_UNIFORM, MODEL_VIEW_UNIFORM, PROJECTION_UNIFORM,
    SOURCE_UNIFORM,
};

const COPY_VERTEX_SHADER: &str = "\
uniform mat4 projectionMatrix;
uniform mat4 modelViewMatrix;
attribute vec3 position;
attribute vec2 uv;
varying vec2 vUv;
void main() {
    vUv = uv;
    gl_Position = projectionMatrix * modelViewMatrix * vec4(position, 1.0);
}
";

const COPY_FRAGMENT_SHADER: &str = "\
precision mediump float;
uniform sampler2D tDiffuse;
varying vec2 vUv;
void main() {
    gl_FragColor = texture2D(tDiffuse, vUv);
}
";

/// Destination of one full-screen draw
#[derive(Clone, Copy)]
enum Destination<'a> {
    /// Presentation surface
    Screen { width: u32, height: u32, clear_color: [f32; 4] },
    Target(&'a RenderTarget),
}

pub struct PostProcessPipeline {
    passes: Vec<PostProcessPass>,
    /// Orthographic camera framing the full-screen quad
    camera: Camera,
    quad: Arc<Geometry>,
    copy_material: Material,
    width: u32,
    height: u32,
    /// Clear color used when the final destination is the screen
    clear_color: [f32; 4],
}

impl PostProcessPipeline {
    pub fn new(device: &mut dyn graphics_device::GraphicsDevice, width: u32, height: u32) -> Result<Self> {
        let quad = Arc::new(Geometry::fullscreen_quad(device)?);
        let copy_material = Material::new(
            "postprocess_copy",
            COPY_VERTEX_SHADER,
            COPY_FRAGMENT_SHADER,
            Uniforms::from_list(vec![
                Uniform::texture(SOURCE_UNIFORM, None),
                Uniform::mat4(PROJECTION_UNIFORM, Mat4::IDENTITY),
                Uniform::mat4(MODEL_VIEW_UNIFORM, Mat4::IDENTITY),
            ]),
        )
        .with_side(Side::Double);
        Ok(Self {
            passes: Vec::new(),
            camera: Camera::screen(width, height),
            quad,
            copy_material,
            width,
            height,
            clear_color: [0.0, 0.0, 0.0, 1.0],
        })
    }

    pub fn with_clear_color(mut self, color: [f32; 4]) -> Self {
        self.clear_color = color;
        self
    }

    // ===== PASS LIST =====

    /// Append a pass at the end of the chain
    pub fn add_pass(&mut self, pass: PostProcessPass) {
        engine_info!("nova3d::PostProcess", "Added pass '{}'", pass.name());
        self.passes.push(pass);
    }

    /// Insert a pass at `index` (clamped to the chain length)
    pub fn insert_pass(&mut self, index: usize, pass: PostProcessPass) {
        let index = index.min(self.passes.len());
        engine_info!("nova3d::PostProcess", "Inserted pass '{}' at {}", pass.name(), index);
        self.passes.insert(index, pass);
    }

    /// Remove a pass by name; takes effect on the next `render`
    pub fn remove_pass(&mut self, name: &str) -> Option<PostProcessPass> {
        let index = self.passes.iter().position(|p| p.name() == name)?;
        engine_info!("nova3d::PostProcess", "Removed pass '{}'", name);
        Some(self.passes.remove(index))
    }

    pub fn pass(&self, name: &str) -> Option<&PostProcessPass> {
        self.passes.iter().find(|p| p.name() == name)
    }

    pub fn pass_mut(&mut self, name: &str) -> Option<&mut PostProcessPass> {
        self.passes.iter_mut().find(|p| p.name() == name)
    }

    /// Enable or disable a pass. Returns false if no pass has this name.
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> bool {
        match self.pass_mut(name) {
            Some(pass) => {
                pass.set_enabled(enabled);
                true
            }
            None => {
                engine_warn!("nova3d::PostProcess", "set_enabled: no pass named '{}'", name);
                false
            }
        }
    }

    pub fn passes(&self) -> &[PostProcessPass] {
        &self.passes
    }

    pub fn enabled_count(&self) -> usize {
        self.passes.iter().filter(|p| p.enabled()).count()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    // ===== RESIZE =====

    /// Resize every pass output and the full-screen camera together
    ///
    /// Every output is allocated before any is replaced: on failure the
    /// passes, the camera and the pipeline size all keep the old size.
    pub fn set_size(&mut self, device: &mut dyn graphics_device::GraphicsDevice, width: u32, height: u32) -> Result<()> {
        let pending = self
            .passes
            .iter()
            .map(|pass| pass.prepare_resize(device, width, height))
            .collect::<Result<Vec<_>>>()?;
        for (pass, pending) in self.passes.iter_mut().zip(pending) {
            pass.commit_resize(pending);
        }
        self.camera.fit_screen(width, height);
        self.width = width;
        self.height = height;
        engine_debug!("nova3d::PostProcess", "Resized {} pass(es) to {}x{}", self.passes.len(), width, height);
        Ok(())
    }

    // ===== RENDER =====

    /// Run the chain on `scene_texture`
    ///
    /// `final_target` is owned by the caller; `None` renders to the screen.
    pub fn render(
        &mut self,
        device: &mut dyn graphics_device::GraphicsDevice,
        dispatch: &mut GpuDispatch,
        scene_texture: &Arc<dyn Texture>,
        final_target: Option<&RenderTarget>,
    ) -> Result<()> {
        let destination = match final_target {
            Some(target) => Destination::Target(target),
            None => self.screen(),
        };
        let enabled: Vec<usize> = (0..self.passes.len()).filter(|&i| self.passes[i].enabled()).collect();

        let Some(&last) = enabled.last() else {
            return self.copy(device, dispatch, scene_texture, destination);
        };

        let matrices = self.quad_matrices();
        let mut previous = Arc::clone(scene_texture);
        for &index in &enabled {
            let (material, output) = self.passes[index].parts_mut();
            material.set_uniform(SOURCE_UNIFORM, UniformValue::Texture(Some(Arc::clone(&previous))));

            match output {
                PassOutput::Single(target) => {
                    let pass_destination = if index == last { destination } else { Destination::Target(&*target) };
                    begin(device, pass_destination)?;
                    draw_quad(device, dispatch, material, &self.quad, matrices)?;
                    previous = Arc::clone(target.texture());
                }
                PassOutput::Feedback(buffer) => {
                    material.set_uniform(
                        HISTORY_UNIFORM,
                        UniformValue::Texture(Some(Arc::clone(buffer.read().texture()))),
                    );
                    begin(device, Destination::Target(buffer.write()))?;
                    draw_quad(device, dispatch, material, &self.quad, matrices)?;
                    buffer.swap();
                    previous = Arc::clone(buffer.read().texture());
                }
            }
        }

        if self.passes[last].is_feedback() {
            self.copy(device, dispatch, &previous, destination)?;
        }
        Ok(())
    }

    /// Projection and model-view of the full-screen quad
    fn quad_matrices(&self) -> (Mat4, Mat4) {
        // the quad spans [-1, 1]; the camera frames the pixel size
        let model_view = Mat4::from_scale(Vec3::new(self.width as f32 * 0.5, self.height as f32 * 0.5, 1.0));
        (self.camera.projection_matrix(), model_view)
    }

    fn screen(&self) -> Destination<'static> {
        Destination::Screen { width: self.width, height: self.height, clear_color: self.clear_color }
    }

    /// Copy a texture to a destination with the internal copy material
    fn copy(
        &mut self,
        device: &mut dyn graphics_device::GraphicsDevice,
        dispatch: &mut GpuDispatch,
        source: &Arc<dyn Texture>,
        destination: Destination<'_>,
    ) -> Result<()> {
        let matrices = self.quad_matrices();
        begin(device, destination)?;
        self.copy_material.set_uniform(SOURCE_UNIFORM, UniformValue::Texture(Some(Arc::clone(source))));
        draw_quad(device, dispatch, &mut self.copy_material, &self.quad, matrices)
    }
}

/// Select and clear a destination
fn begin(device: &mut dyn graphics_device::GraphicsDevice, destination: Destination<'_>) -> Result<()> {
    match destination {
        Destination::Target(target) => {
            target.bind(device)?;
            target.clear(device)
        }
        Destination::Screen { width, height, clear_color } => {
            device.set_render_target(None)?;
            device.set_viewport(Viewport::from_size(width, height))?;
            device.clear(&[ClearValue::Color(clear_color), ClearValue::Depth(1.0)])
        }
    }
}

/// Compile (lazily) and draw a material over the full-screen quad
fn draw_quad(
    device: &mut dyn graphics_device::GraphicsDevice,
    dispatch: &mut GpuDispatch,
    material: &mut Material,
    quad: &Geometry,
    (projection, model_view): (Mat4, Mat4),
) -> Result<()> {
    let program = material.compile(device)?;
    material.set_uniform(PROJECTION_UNIFORM, UniformValue::Matrix4(projection));
    material.set_uniform(MODEL_VIEW_UNIFORM, UniformValue::Matrix4(model_view));

    dispatch.set_program(program);
    dispatch.bind_geometry(quad);
    dispatch.set_uniforms(material.uniforms());
    dispatch.set_cull_mode(CullMode::None);
    dispatch.draw(device, quad.draw_count(), quad.primitive(), material.blend(), 0)
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
