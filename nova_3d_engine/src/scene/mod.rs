//! Scene module
//!
//! Arena scene graph of nodes (groups, meshes, cameras, lights), their
//! transforms and the per-frame logic and transform traversals.

mod node;
mod scene_graph;
mod transform;

pub use node::{
    Capabilities, Light, LightKind, Node, NodeKey, NodeKind, NodeScript,
    ShadowSettings, Skin,
};
pub use scene_graph::SceneGraph;
pub use transform::{LookAtMode, Transform};
