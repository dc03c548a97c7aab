/// Scene node - one entity record with a closed kind tag.
///
/// Every node carries a transform; what else it does is decided by its
/// `NodeKind` and the `Capabilities` derived from it once at construction.
/// There is no node type hierarchy: renderers and updaters test capability
/// bits and match on the kind.

use std::sync::Arc;
use bitflags::bitflags;
use glam::{Mat4, Vec3};
use slotmap::new_key_type;
use crate::error::Result;
use crate::engine_bail;
use crate::camera::Camera;
use crate::resource::{Geometry, Material};
use crate::uniform::Uniform;
use super::transform::{LookAtMode, Transform};

// ===== SLOT MAP KEY =====

new_key_type! {
    /// Stable handle of a node within a SceneGraph.
    ///
    /// A key becomes invalid only when its own node is removed.
    pub struct NodeKey;
}

// ===== CAPABILITIES =====

bitflags! {
    /// What a node can take part in
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Capabilities: u32 {
        const RENDERABLE = 1 << 0;
        const CAMERA = 1 << 1;
        const LIGHT = 1 << 2;
        const CASTS_SHADOW = 1 << 3;
        const SKINNED = 1 << 4;
    }
}

// ===== LIGHTS =====

/// Light variant
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    Point,
    /// Cone half-angle and penumbra fraction, both in [0, 1] radians/ratio
    Spot { angle: f32, penumbra: f32 },
    Directional,
}

impl LightKind {
    /// Value of the `type` field in the `lights` uniform
    pub fn type_index(&self) -> f32 {
        match self {
            LightKind::Point => 0.0,
            LightKind::Spot { .. } => 1.0,
            LightKind::Directional => 2.0,
        }
    }
}

/// Shadow map parameters (spot and directional lights only)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowSettings {
    pub map_size: u32,
    pub bias: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ShadowSettings {
    fn default() -> Self {
        Self { map_size: 512, bias: 0.0005, near: 0.5, far: 500.0 }
    }
}

/// Light parameters of a light node
#[derive(Debug, Clone)]
pub struct Light {
    kind: LightKind,
    pub color: Vec3,
    pub intensity: f32,
    /// Attenuation distance (0 = infinite)
    pub range: f32,
    shadow: Option<ShadowSettings>,
    /// Slot in the shared `lights` uniform, assigned by the scene graph
    index: usize,
}

impl Light {
    pub fn point(color: Vec3, intensity: f32, range: f32) -> Self {
        Self::new(LightKind::Point, color, intensity, range)
    }

    pub fn spot(color: Vec3, intensity: f32, range: f32, angle: f32, penumbra: f32) -> Self {
        Self::new(LightKind::Spot { angle, penumbra }, color, intensity, range)
    }

    pub fn directional(color: Vec3, intensity: f32) -> Self {
        Self::new(LightKind::Directional, color, intensity, 0.0)
    }

    fn new(kind: LightKind, color: Vec3, intensity: f32, range: f32) -> Self {
        Self { kind, color, intensity, range, shadow: None, index: 0 }
    }

    /// Enable shadow casting
    ///
    /// # Errors
    ///
    /// Point lights cannot cast shadows: returns `InvalidConfiguration`.
    pub fn with_shadow(mut self, settings: ShadowSettings) -> Result<Self> {
        if self.kind == LightKind::Point {
            engine_bail!("nova3d::Light", InvalidConfiguration =>
                "Point lights do not support shadows");
        }
        self.shadow = Some(settings);
        Ok(self)
    }

    pub fn kind(&self) -> LightKind {
        self.kind
    }

    pub fn shadow(&self) -> Option<&ShadowSettings> {
        self.shadow.as_ref()
    }

    /// Shadow settings, only present on shadow-casting lights
    pub fn shadow_mut(&mut self) -> Option<&mut ShadowSettings> {
        self.shadow.as_mut()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    /// Fields of this light's element in the `lights` uniform
    pub fn uniform_fields(&self, transform: &Transform) -> Vec<Uniform> {
        let (angle, penumbra) = match self.kind {
            LightKind::Spot { angle, penumbra } => (angle.cos(), penumbra),
            _ => (0.0, 0.0),
        };
        vec![
            Uniform::float("type", self.kind.type_index()),
            Uniform::color("color", self.color.extend(1.0)),
            Uniform::float("intensity", self.intensity),
            Uniform::vec3("position", transform.world_position()),
            Uniform::vec3("direction", transform.forward()),
            Uniform::float("range", self.range),
            Uniform::float("coneCos", angle),
            Uniform::float("penumbra", penumbra),
            Uniform::float("castShadow", if self.shadow.is_some() { 1.0 } else { 0.0 }),
        ]
    }

    /// Element written into a `lights` slot no light occupies
    ///
    /// Same fields as `uniform_fields`, with zero color and intensity.
    pub fn unlit_fields() -> Vec<Uniform> {
        Self::new(LightKind::Point, Vec3::ZERO, 0.0, 0.0).uniform_fields(&Transform::default())
    }
}

// ===== SKINNING =====

/// Bones driving a skinned mesh
#[derive(Debug, Clone)]
pub struct Skin {
    pub bones: Vec<NodeKey>,
    pub inverse_bind_matrices: Vec<Mat4>,
}

// ===== SCRIPTS =====

/// Per-node logic run by the logic traversal
pub trait NodeScript: Send {
    fn update(&mut self, transform: &mut Transform, dt: f32);
}

// ===== NODE =====

/// Closed set of node kinds
pub enum NodeKind {
    Group,
    Mesh { geometry: Arc<Geometry>, material: Material },
    SkinnedMesh { geometry: Arc<Geometry>, material: Material, skin: Skin },
    Camera(Camera),
    Light(Light),
}

impl NodeKind {
    fn capabilities(&self) -> Capabilities {
        match self {
            NodeKind::Group => Capabilities::empty(),
            NodeKind::Mesh { .. } => Capabilities::RENDERABLE,
            NodeKind::SkinnedMesh { .. } => Capabilities::RENDERABLE | Capabilities::SKINNED,
            NodeKind::Camera(_) => Capabilities::CAMERA,
            NodeKind::Light(light) if light.shadow().is_some() => {
                Capabilities::LIGHT | Capabilities::CASTS_SHADOW
            }
            NodeKind::Light(_) => Capabilities::LIGHT,
        }
    }
}

/// Scene entity
pub struct Node {
    pub name: String,
    pub transform: Transform,
    pub visible: bool,
    kind: NodeKind,
    capabilities: Capabilities,
    script: Option<Box<dyn NodeScript>>,
}

impl Node {
    pub fn new(name: &str, kind: NodeKind) -> Self {
        let look_at_mode = match kind {
            NodeKind::Camera(_) => LookAtMode::Inverted,
            _ => LookAtMode::Direct,
        };
        Self {
            name: name.to_string(),
            transform: Transform::new(look_at_mode),
            visible: true,
            capabilities: kind.capabilities(),
            kind,
            script: None,
        }
    }

    pub fn group(name: &str) -> Self {
        Self::new(name, NodeKind::Group)
    }

    pub fn mesh(name: &str, geometry: Arc<Geometry>, material: Material) -> Self {
        Self::new(name, NodeKind::Mesh { geometry, material })
    }

    pub fn skinned_mesh(name: &str, geometry: Arc<Geometry>, material: Material, skin: Skin) -> Self {
        Self::new(name, NodeKind::SkinnedMesh { geometry, material, skin })
    }

    pub fn camera(name: &str, camera: Camera) -> Self {
        Self::new(name, NodeKind::Camera(camera))
    }

    pub fn light(name: &str, light: Light) -> Self {
        Self::new(name, NodeKind::Light(light))
    }

    pub fn with_script(mut self, script: Box<dyn NodeScript>) -> Self {
        self.script = Some(script);
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    // ===== KIND ACCESS =====

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn has(&self, capability: Capabilities) -> bool {
        self.capabilities.contains(capability)
    }

    pub fn camera_data(&self) -> Option<&Camera> {
        match &self.kind {
            NodeKind::Camera(camera) => Some(camera),
            _ => None,
        }
    }

    pub fn camera_data_mut(&mut self) -> Option<&mut Camera> {
        match &mut self.kind {
            NodeKind::Camera(camera) => Some(camera),
            _ => None,
        }
    }

    pub fn light_data(&self) -> Option<&Light> {
        match &self.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }

    pub fn light_data_mut(&mut self) -> Option<&mut Light> {
        match &mut self.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }

    pub fn geometry(&self) -> Option<&Arc<Geometry>> {
        match &self.kind {
            NodeKind::Mesh { geometry, .. } | NodeKind::SkinnedMesh { geometry, .. } => Some(geometry),
            _ => None,
        }
    }

    pub fn material(&self) -> Option<&Material> {
        match &self.kind {
            NodeKind::Mesh { material, .. } | NodeKind::SkinnedMesh { material, .. } => Some(material),
            _ => None,
        }
    }

    pub fn material_mut(&mut self) -> Option<&mut Material> {
        match &mut self.kind {
            NodeKind::Mesh { material, .. } | NodeKind::SkinnedMesh { material, .. } => Some(material),
            _ => None,
        }
    }

    /// Geometry and material together, for drawing
    pub fn drawable_mut(&mut self) -> Option<(&Arc<Geometry>, &mut Material)> {
        match &mut self.kind {
            NodeKind::Mesh { geometry, material }
            | NodeKind::SkinnedMesh { geometry, material, .. } => Some((geometry, material)),
            _ => None,
        }
    }

    pub fn skin(&self) -> Option<&Skin> {
        match &self.kind {
            NodeKind::SkinnedMesh { skin, .. } => Some(skin),
            _ => None,
        }
    }

    // ===== LOGIC =====

    /// Run the node's script, if any
    pub fn update_logic(&mut self, dt: f32) {
        if let Some(script) = &mut self.script {
            script.update(&mut self.transform, dt);
        }
    }
}


#[cfg(test)]
#[path = "node_tests.rs"]
mod tests;
