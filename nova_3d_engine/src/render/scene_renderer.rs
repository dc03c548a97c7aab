/// SceneRenderer - forward pass producing the pre-postprocess scene texture.
///
/// Draws every visible renderable node as seen by the graph's active camera
/// into an offscreen scene target. Opaque draws go first in traversal order;
/// transparent and additive draws follow, sorted back-to-front by the view
/// depth of their geometry center.
///
/// Per draw, the node's material receives (when it declares them):
/// `modelMatrix`, `modelViewMatrix`, `viewMatrix`, `projectionMatrix`,
/// `cameraPosition`, the shared `lights` struct array and, for skinned
/// meshes, the `bones` struct array.

use std::sync::Arc;
use glam::{Mat4, Vec3};
use rdst::RadixSort;
use crate::error::Result;
use crate::{engine_trace, engine_warn};
use crate::dispatch::GpuDispatch;
use crate::graphics_device;
use crate::scene::{Capabilities, NodeKey, SceneGraph};
use crate::target::{PendingResize, RenderTarget, RenderTargetDesc};
use crate::uniform::{Uniform, UniformValue};

/// Per-frame camera matrices
#[derive(Debug, Clone, Copy)]
struct View {
    view: Mat4,
    projection: Mat4,
    position: Vec3,
}

pub struct SceneRenderer {
    target: RenderTarget,
    /// Reused sort keys of blended draws
    sort_keys: Vec<u64>,
}

impl SceneRenderer {
    pub fn new(
        device: &mut dyn graphics_device::GraphicsDevice,
        width: u32,
        height: u32,
        clear_color: [f32; 4],
    ) -> Result<Self> {
        let target = RenderTarget::new(
            device,
            RenderTargetDesc::new("scene", width, height).with_clear_color(clear_color),
        )?;
        Ok(Self { target, sort_keys: Vec::new() })
    }

    /// Scene color target (source of the postprocess chain)
    pub fn target(&self) -> &RenderTarget {
        &self.target
    }

    pub fn set_size(&mut self, device: &mut dyn graphics_device::GraphicsDevice, width: u32, height: u32) -> Result<()> {
        self.target.set_size(device, width, height)
    }

    pub(crate) fn commit_resize(&mut self, pending: PendingResize) {
        self.target.commit_resize(pending);
    }

    /// Render the graph into the scene target; returns the number of draws issued
    ///
    /// Expects world matrices to be current (`SceneGraph::update_transforms`).
    pub fn render(
        &mut self,
        device: &mut dyn graphics_device::GraphicsDevice,
        dispatch: &mut GpuDispatch,
        graph: &mut SceneGraph,
    ) -> Result<usize> {
        self.target.bind(device)?;
        self.target.clear(device)?;

        let Some(view) = active_view(graph) else {
            engine_warn!("nova3d::SceneRenderer", "No active camera; scene left cleared");
            return Ok(0);
        };

        let lights = graph.lights_uniform();

        let (opaque, blended) = self.draw_order(graph, &view);
        let mut draws = 0;
        for key in opaque.into_iter().chain(blended) {
            draw_node(device, dispatch, graph, key, &view, &lights)?;
            draws += 1;
        }
        engine_trace!("nova3d::SceneRenderer", "Scene pass: {} draw(s)", draws);
        Ok(draws)
    }

    /// Opaque keys in traversal order, blended keys back-to-front
    fn draw_order(&mut self, graph: &SceneGraph, view: &View) -> (Vec<NodeKey>, Vec<NodeKey>) {
        let mut opaque = Vec::new();
        let mut blended = Vec::new();
        for key in graph.keys_with(Capabilities::RENDERABLE) {
            let Some(node) = graph.node(key) else { continue };
            let (Some(geometry), Some(material)) = (node.geometry(), node.material()) else { continue };
            if !node.visible {
                continue;
            }
            if material.blend().is_blended() {
                let center = node.transform.world_matrix().transform_point3(geometry.center());
                let depth = -view.view.transform_point3(center).z;
                blended.push((key, depth));
            } else {
                opaque.push(key);
            }
        }

        self.sort_keys.clear();
        self.sort_keys.extend(
            blended.iter().enumerate().map(|(i, &(_, depth))| back_to_front_key(depth, i as u32)),
        );
        self.sort_keys.radix_sort_unstable();
        let blended = self
            .sort_keys
            .iter()
            .map(|&k| blended[(k & 0xFFFF_FFFF) as usize].0)
            .collect();
        (opaque, blended)
    }
}

/// Sort key ordering far depths first, ties by insertion index
fn back_to_front_key(depth: f32, index: u32) -> u64 {
    let bits = depth.to_bits();
    // monotonic mapping of f32 onto u32
    let ordered = if bits & 0x8000_0000 != 0 { !bits } else { bits | 0x8000_0000 };
    ((!ordered as u64) << 32) | index as u64
}

/// Camera matrices of the graph's active camera
fn active_view(graph: &SceneGraph) -> Option<View> {
    let node = graph.node(graph.active_camera()?)?;
    let camera = node.camera_data()?;
    let world = *node.transform.world_matrix();
    Some(View {
        view: camera.view_matrix(&world),
        projection: camera.projection_matrix(),
        position: node.transform.world_position(),
    })
}

/// Feed per-draw uniforms into a node's material and draw it
fn draw_node(
    device: &mut dyn graphics_device::GraphicsDevice,
    dispatch: &mut GpuDispatch,
    graph: &mut SceneGraph,
    key: NodeKey,
    view: &View,
    lights: &UniformValue,
) -> Result<()> {
    let bones = bone_uniforms(graph, key);
    let Some(node) = graph.node_mut(key) else { return Ok(()) };
    let model = *node.transform.world_matrix();
    let Some((geometry, material)) = node.drawable_mut() else { return Ok(()) };
    let geometry = Arc::clone(geometry);

    material.set_uniform("modelMatrix", UniformValue::Matrix4(model));
    material.set_uniform("modelViewMatrix", UniformValue::Matrix4(view.view * model));
    material.set_uniform("viewMatrix", UniformValue::Matrix4(view.view));
    material.set_uniform("projectionMatrix", UniformValue::Matrix4(view.projection));
    material.set_uniform("cameraPosition", UniformValue::Vector3(view.position));
    material.set_uniform("lights", lights.clone());
    if let Some(bones) = bones {
        material.set_uniform("bones", bones);
    }

    let program = material.compile(device)?;
    dispatch.set_program(program);
    dispatch.bind_geometry(&geometry);
    dispatch.set_uniforms(material.uniforms());
    dispatch.set_cull_mode(material.side().cull_mode());
    dispatch.draw(device, geometry.draw_count(), geometry.primitive(), material.blend(), 0)
}

/// `bones` update of a skinned node (bone world * inverse bind)
fn bone_uniforms(graph: &SceneGraph, key: NodeKey) -> Option<UniformValue> {
    let skin = graph.node(key)?.skin()?;
    let items = skin
        .bones
        .iter()
        .zip(&skin.inverse_bind_matrices)
        .map(|(&bone, inverse_bind)| {
            let world = graph.world_matrix(bone).copied().unwrap_or(Mat4::IDENTITY);
            vec![Uniform::mat4("matrix", world * *inverse_bind)]
        })
        .collect();
    Some(UniformValue::StructArray(items))
}

#[cfg(test)]
#[path = "scene_renderer_tests.rs"]
mod tests;
