/// GpuDispatch - the single "currently bound" draw state
///
/// Holds the active program, vertex/index buffers, uniform set and cull mode
/// for the next draw. It owns no long-lived GPU objects beyond shared handles,
/// and every draw goes through an explicitly passed `GraphicsDevice`.
///
/// Uniform binding rules:
/// - scalar, vector and matrix values upload directly under their name
/// - Struct fields upload as `parent.field`
/// - StructArray fields upload as `parent[index].field`
/// - texture values take the next texture unit (reset to 0 every draw);
///   a null texture binds the device's neutral texture

use std::sync::Arc;
use crate::error::Result;
use crate::{engine_bail, engine_trace};
use crate::graphics_device::{Buffer, CullMode, GraphicsDevice, IndexType, Program};
use crate::resource::Geometry;
use crate::uniform::{UniformValue, Uniforms};
use super::{BlendKind, PrimitiveKind};

/// Current binding state for one draw call
pub struct GpuDispatch {
    program: Option<Arc<dyn Program>>,
    vertex_buffer: Option<Arc<dyn Buffer>>,
    index_buffer: Option<(Arc<dyn Buffer>, IndexType)>,
    uniforms: Uniforms,
    cull_mode: CullMode,
    /// Next free texture unit of the draw in progress
    texture_unit: u32,
    draw_calls: u64,
}

impl GpuDispatch {
    pub fn new() -> Self {
        Self {
            program: None,
            vertex_buffer: None,
            index_buffer: None,
            uniforms: Uniforms::new(),
            cull_mode: CullMode::Back,
            texture_unit: 0,
            draw_calls: 0,
        }
    }

    // ===== BINDING STATE =====

    pub fn set_program(&mut self, program: Arc<dyn Program>) {
        self.program = Some(program);
    }

    pub fn program(&self) -> Option<&Arc<dyn Program>> {
        self.program.as_ref()
    }

    pub fn set_vertex_buffer(&mut self, buffer: Option<Arc<dyn Buffer>>) {
        self.vertex_buffer = buffer;
    }

    pub fn set_index_buffer(&mut self, buffer: Option<(Arc<dyn Buffer>, IndexType)>) {
        self.index_buffer = buffer;
    }

    /// Bind the vertex buffer and (if any) the index buffer of a geometry
    pub fn bind_geometry(&mut self, geometry: &Geometry) {
        self.vertex_buffer = Some(Arc::clone(geometry.vertex_buffer()));
        self.index_buffer = geometry
            .index_buffer()
            .map(|(buffer, index_type)| (Arc::clone(buffer), *index_type));
    }

    /// Replace the active uniform set
    pub fn set_uniforms(&mut self, uniforms: &Uniforms) {
        self.uniforms = uniforms.clone();
    }

    pub fn uniforms(&self) -> &Uniforms {
        &self.uniforms
    }

    pub fn set_cull_mode(&mut self, mode: CullMode) {
        self.cull_mode = mode;
    }

    pub fn cull_mode(&self) -> CullMode {
        self.cull_mode
    }

    /// Forget every bound object
    pub fn reset(&mut self) {
        self.program = None;
        self.vertex_buffer = None;
        self.index_buffer = None;
        self.uniforms = Uniforms::new();
        self.cull_mode = CullMode::Back;
        self.texture_unit = 0;
    }

    // ===== DRAW =====

    /// Issue one draw with the current binding state
    ///
    /// `count` is a vertex count for array draws and an index count for
    /// indexed draws; `start` is the first vertex/index.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if no program is bound, and any error
    /// the device reports.
    pub fn draw(
        &mut self,
        device: &mut dyn GraphicsDevice,
        count: u32,
        primitive: PrimitiveKind,
        blend: BlendKind,
        start: u32,
    ) -> Result<()> {
        let program = match &self.program {
            Some(program) => program,
            None => engine_bail!("nova3d::GpuDispatch", InvalidConfiguration =>
                "Draw issued with no program bound"),
        };

        device.use_program(program)?;
        if let Some(buffer) = &self.vertex_buffer {
            device.bind_vertex_buffer(buffer)?;
        }
        if let Some((buffer, index_type)) = &self.index_buffer {
            device.bind_index_buffer(buffer, *index_type)?;
        }

        let (depth, blend_state) = blend.policy();
        device.set_cull_mode(self.cull_mode)?;
        device.set_depth_state(depth)?;
        device.set_blend_state(blend_state)?;

        self.texture_unit = 0;
        for uniform in self.uniforms.iter() {
            bind_value(device, &mut self.texture_unit, &uniform.name, &uniform.value)?;
        }

        let topology = primitive.topology();
        match &self.index_buffer {
            Some((_, index_type)) => device.draw_elements(topology, *index_type, start, count)?,
            None => device.draw_arrays(topology, start, count)?,
        }

        self.draw_calls += 1;
        engine_trace!("nova3d::GpuDispatch", "Draw {} x{} ({}, {} texture units)",
            primitive, count, blend, self.texture_unit);
        Ok(())
    }

    /// Texture units consumed by the last draw
    pub fn texture_units_used(&self) -> u32 {
        self.texture_unit
    }

    /// Draws issued since creation or the last `reset_draw_calls()`
    pub fn draw_calls(&self) -> u64 {
        self.draw_calls
    }

    pub fn reset_draw_calls(&mut self) {
        self.draw_calls = 0;
    }
}

impl Default for GpuDispatch {
    fn default() -> Self {
        Self::new()
    }
}

/// Upload one uniform value, recursing into composites
fn bind_value(
    device: &mut dyn GraphicsDevice,
    unit: &mut u32,
    key: &str,
    value: &UniformValue,
) -> Result<()> {
    match value {
        UniformValue::Struct(fields) => {
            for field in fields {
                bind_value(device, unit, &format!("{}.{}", key, field.name), &field.value)?;
            }
        }
        UniformValue::StructArray(items) => {
            for (index, fields) in items.iter().enumerate() {
                for field in fields {
                    let field_key = format!("{}[{}].{}", key, index, field.name);
                    bind_value(device, unit, &field_key, &field.value)?;
                }
            }
        }
        UniformValue::Texture(texture) | UniformValue::CubeMap(texture) => {
            let texture = match texture {
                Some(texture) => Arc::clone(texture),
                None => device.neutral_texture()?,
            };
            device.bind_texture(*unit, key, &texture)?;
            *unit += 1;
        }
        leaf => device.set_uniform(key, leaf)?,
    }
    Ok(())
}

#[cfg(test)]
#[path = "gpu_dispatch_tests.rs"]
mod tests;
