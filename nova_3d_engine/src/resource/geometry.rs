//! Resource-level geometry type.
//!
//! A `Geometry` is the collaborator-facing container of vertex and index
//! buffers. Buffer layout is opaque to the engine: it only needs the
//! buffers, the element counts and the primitive kind to issue draws.

use std::sync::Arc;
use glam::Vec3;
use crate::error::Result;
use crate::engine_bail;
use crate::dispatch::PrimitiveKind;
use crate::graphics_device::{
    self, Buffer, BufferDesc, BufferUsage, IndexType,
};

/// Vertex/index buffers plus draw parameters
pub struct Geometry {
    name: String,
    vertex_buffer: Arc<dyn Buffer>,
    index_buffer: Option<(Arc<dyn Buffer>, IndexType)>,
    vertex_count: u32,
    index_count: u32,
    primitive: PrimitiveKind,
    /// Local-space center of the vertex positions (first 3 floats of each vertex)
    center: Vec3,
}

impl Geometry {
    /// Upload interleaved float vertices (and optional u32 indices)
    ///
    /// The first three floats of each vertex are treated as its position
    /// for bounding-center computation; everything else is opaque.
    ///
    /// # Arguments
    ///
    /// * `device` - Device creating the buffers
    /// * `name` - Debug name
    /// * `vertices` - Interleaved vertex data
    /// * `floats_per_vertex` - Stride in floats (>= 3)
    /// * `indices` - Optional index list
    /// * `primitive` - Primitive kind used when drawing
    pub fn from_slices(
        device: &mut dyn graphics_device::GraphicsDevice,
        name: &str,
        vertices: &[f32],
        floats_per_vertex: u32,
        indices: Option<&[u32]>,
        primitive: PrimitiveKind,
    ) -> Result<Self> {
        if floats_per_vertex < 3 {
            engine_bail!("nova3d::Geometry", InvalidResource =>
                "Geometry '{}': stride of {} floats cannot hold a position", name, floats_per_vertex);
        }
        if vertices.is_empty() || vertices.len() % floats_per_vertex as usize != 0 {
            engine_bail!("nova3d::Geometry", InvalidResource =>
                "Geometry '{}': {} floats is not a whole number of {}-float vertices",
                name, vertices.len(), floats_per_vertex);
        }
        let vertex_count = (vertices.len() / floats_per_vertex as usize) as u32;

        let vertex_buffer = device.create_buffer(
            BufferDesc { name: format!("{}.vertices", name), usage: BufferUsage::Vertex },
            bytemuck::cast_slice(vertices),
        )?;

        let (index_buffer, index_count) = match indices {
            Some(indices) => {
                if let Some(&bad) = indices.iter().find(|&&i| i >= vertex_count) {
                    engine_bail!("nova3d::Geometry", InvalidResource =>
                        "Geometry '{}': index {} out of range ({} vertices)", name, bad, vertex_count);
                }
                let buffer = device.create_buffer(
                    BufferDesc { name: format!("{}.indices", name), usage: BufferUsage::Index },
                    bytemuck::cast_slice(indices),
                )?;
                (Some((buffer, IndexType::U32)), indices.len() as u32)
            }
            None => (None, 0),
        };

        let mut sum = Vec3::ZERO;
        for vertex in vertices.chunks_exact(floats_per_vertex as usize) {
            sum += Vec3::new(vertex[0], vertex[1], vertex[2]);
        }

        Ok(Self {
            name: name.to_string(),
            vertex_buffer,
            index_buffer,
            vertex_count,
            index_count,
            primitive,
            center: sum / vertex_count as f32,
        })
    }

    /// Full-screen quad in normalized device coordinates (position xyz + uv)
    pub fn fullscreen_quad(device: &mut dyn graphics_device::GraphicsDevice) -> Result<Self> {
        #[rustfmt::skip]
        let vertices: [f32; 20] = [
            -1.0, -1.0, 0.0,  0.0, 0.0,
             1.0, -1.0, 0.0,  1.0, 0.0,
             1.0,  1.0, 0.0,  1.0, 1.0,
            -1.0,  1.0, 0.0,  0.0, 1.0,
        ];
        let indices: [u32; 6] = [0, 1, 2, 0, 2, 3];
        Self::from_slices(device, "fullscreen_quad", &vertices, 5, Some(&indices), PrimitiveKind::Triangles)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertex_buffer(&self) -> &Arc<dyn Buffer> {
        &self.vertex_buffer
    }

    /// Index buffer and its element type, if indexed
    pub fn index_buffer(&self) -> Option<&(Arc<dyn Buffer>, IndexType)> {
        self.index_buffer.as_ref()
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Element count of a whole-geometry draw (indices if indexed, else vertices)
    pub fn draw_count(&self) -> u32 {
        if self.index_buffer.is_some() {
            self.index_count
        } else {
            self.vertex_count
        }
    }

    pub fn primitive(&self) -> PrimitiveKind {
        self.primitive
    }

    /// Local-space center of the vertex positions
    pub fn center(&self) -> Vec3 {
        self.center
    }
}

#[cfg(test)]
#[path = "geometry_tests.rs"]
mod tests;
