/// Resource-level material type.
///
/// A Material pairs an opaque shader source with its own uniform registry.
/// The GPU program is linked lazily the first time the material is drawn;
/// until then `is_compiled()` is false.
///
/// Architecture:
/// - Shader: vertex + fragment source blobs (never parsed by the engine)
/// - Uniforms: owned registry with lenient partial-merge updates
/// - Draw policy: blend kind and face side

use std::sync::Arc;
use crate::error::Result;
use crate::{engine_debug, engine_error};
use crate::dispatch::BlendKind;
use crate::graphics_device::{self, CullMode, Program, ProgramDesc};
use crate::uniform::{Uniform, UniformValue, Uniforms};

/// Which faces of a surface are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Front,
    Back,
    Double,
}

impl Side {
    /// Cull mode that draws this side
    pub fn cull_mode(self) -> CullMode {
        match self {
            Side::Front => CullMode::Back,
            Side::Back => CullMode::Front,
            Side::Double => CullMode::None,
        }
    }
}

// ===== DESCRIPTOR =====

/// Material creation descriptor (typically built from asset data)
pub struct MaterialDesc {
    pub name: String,
    pub vertex_source: String,
    pub fragment_source: String,
    /// Uniform lists merged in order (later lists override earlier ones)
    pub uniforms: Vec<Vec<Uniform>>,
    /// Blend kind name ("opaque", "transparent", "additive"); None = opaque
    pub blend: Option<String>,
    pub side: Side,
}

// ===== MATERIAL =====

/// Shader + uniforms + draw policy
pub struct Material {
    shader: ProgramDesc,
    uniforms: Uniforms,
    program: Option<Arc<dyn Program>>,
    blend: BlendKind,
    side: Side,
}

impl Material {
    /// Create an opaque, front-sided material
    pub fn new(name: &str, vertex_source: &str, fragment_source: &str, uniforms: Uniforms) -> Self {
        Self {
            shader: ProgramDesc {
                name: name.to_string(),
                vertex_source: vertex_source.to_string(),
                fragment_source: fragment_source.to_string(),
            },
            uniforms,
            program: None,
            blend: BlendKind::Opaque,
            side: Side::Front,
        }
    }

    /// Create a material from a descriptor
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the blend kind name is unknown.
    pub fn from_desc(desc: MaterialDesc) -> Result<Self> {
        let blend = match &desc.blend {
            Some(name) => name.parse::<BlendKind>()?,
            None => BlendKind::Opaque,
        };
        let mut material = Self::new(
            &desc.name,
            &desc.vertex_source,
            &desc.fragment_source,
            Uniforms::merged(desc.uniforms),
        );
        material.blend = blend;
        material.side = desc.side;
        Ok(material)
    }

    pub fn with_blend(mut self, blend: BlendKind) -> Self {
        self.blend = blend;
        self
    }

    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    // ===== PROGRAM =====

    /// Whether the program has been linked successfully
    pub fn is_compiled(&self) -> bool {
        self.program.is_some()
    }

    /// Link the program if not done yet and return it
    ///
    /// A failed link leaves the material uncompiled; the error is returned.
    pub fn compile(&mut self, device: &mut dyn graphics_device::GraphicsDevice) -> Result<Arc<dyn Program>> {
        if let Some(program) = &self.program {
            return Ok(Arc::clone(program));
        }
        let program = device.create_program(&self.shader).map_err(|e| {
            engine_error!("nova3d::Material", "Material '{}' failed to compile: {}", self.shader.name, e);
            e
        })?;
        engine_debug!("nova3d::Material", "Compiled material '{}'", self.shader.name);
        self.program = Some(Arc::clone(&program));
        Ok(program)
    }

    /// Linked program, if compiled
    pub fn program(&self) -> Option<&Arc<dyn Program>> {
        self.program.as_ref()
    }

    // ===== UNIFORMS =====

    pub fn uniforms(&self) -> &Uniforms {
        &self.uniforms
    }

    pub fn uniforms_mut(&mut self) -> &mut Uniforms {
        &mut self.uniforms
    }

    /// Lenient uniform update (unknown names are ignored)
    pub fn set_uniform(&mut self, name: &str, value: UniformValue) {
        self.uniforms.set_value(name, value);
    }

    // ===== ACCESSORS =====

    pub fn name(&self) -> &str {
        &self.shader.name
    }

    pub fn blend(&self) -> BlendKind {
        self.blend
    }

    pub fn side(&self) -> Side {
        self.side
    }
}

#[cfg(test)]
#[path = "material_tests.rs"]
mod tests;
