/// SceneGraph - arena of nodes linked by parent/child keys.
///
/// Nodes live in a SlotMap; the hierarchy is stored as key relations
/// (parent key + ordered child keys), so there are no owning cycles.
/// Removing a node removes its whole subtree.
///
/// Per frame the engine runs two traversals: `update_logic` (scripts)
/// then `update_transforms` (unconditional top-down matrix recompute).

use slotmap::SlotMap;
use glam::Mat4;
use crate::error::Result;
use crate::{engine_bail, engine_debug};
use crate::uniform::UniformValue;
use super::node::{Capabilities, Light, Node, NodeKey};

/// Node plus its hierarchy links
struct NodeEntry {
    node: Node,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
}

/// Hierarchical node store
pub struct SceneGraph {
    nodes: SlotMap<NodeKey, NodeEntry>,
    /// Parentless nodes in insertion order
    roots: Vec<NodeKey>,
    /// Camera used by the renderer
    active_camera: Option<NodeKey>,
    /// Occupant of each slot of the shared `lights` uniform
    light_slots: Vec<Option<NodeKey>>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            roots: Vec::new(),
            active_camera: None,
            light_slots: Vec::new(),
        }
    }

    // ===== NODE LIFECYCLE =====

    /// Insert a node as a new root
    ///
    /// Light nodes get the lowest free slot of the `lights` uniform. The
    /// first camera inserted becomes the active camera.
    pub fn create_node(&mut self, node: Node) -> NodeKey {
        let is_camera = node.has(Capabilities::CAMERA);
        let key = self.nodes.insert(NodeEntry { node, parent: None, children: Vec::new() });
        if let Some(light) = self.nodes[key].node.light_data_mut() {
            let slot = match self.light_slots.iter().position(Option::is_none) {
                Some(free) => free,
                None => {
                    self.light_slots.push(None);
                    self.light_slots.len() - 1
                }
            };
            self.light_slots[slot] = Some(key);
            light.set_index(slot);
        }
        self.roots.push(key);
        if is_camera && self.active_camera.is_none() {
            self.active_camera = Some(key);
        }
        key
    }

    /// Insert a node directly under `parent`
    pub fn create_child(&mut self, parent: NodeKey, node: Node) -> Result<NodeKey> {
        let key = self.create_node(node);
        if let Err(e) = self.add_child(parent, key) {
            self.remove(key);
            return Err(e);
        }
        Ok(key)
    }

    /// Re-parent `child` under `parent` (appended last)
    ///
    /// # Errors
    ///
    /// `InvalidResource` for unknown keys, `InvalidConfiguration` if the
    /// link would create a cycle.
    pub fn add_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<()> {
        if !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            engine_bail!("nova3d::SceneGraph", InvalidResource => "add_child: unknown node key");
        }
        if self.is_ancestor_or_self(child, parent) {
            engine_bail!("nova3d::SceneGraph", InvalidConfiguration =>
                "add_child: '{}' cannot become a child of its own descendant '{}'",
                self.nodes[child].node.name, self.nodes[parent].node.name);
        }
        self.unlink(child);
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
        Ok(())
    }

    /// Detach a node from its parent, making it a root. Returns false if the key is invalid.
    pub fn detach(&mut self, key: NodeKey) -> bool {
        if !self.nodes.contains_key(key) {
            return false;
        }
        if self.nodes[key].parent.is_some() {
            self.unlink(key);
            self.roots.push(key);
        }
        true
    }

    /// Remove a node and its whole subtree. Returns the number of nodes removed.
    pub fn remove(&mut self, key: NodeKey) -> usize {
        if !self.nodes.contains_key(key) {
            return 0;
        }
        self.unlink(key);
        let mut removed = 0;
        let mut stack = vec![key];
        while let Some(current) = stack.pop() {
            if let Some(entry) = self.nodes.remove(current) {
                stack.extend(entry.children);
                if self.active_camera == Some(current) {
                    self.active_camera = None;
                }
                if let Some(light) = entry.node.light_data() {
                    if let Some(slot) = self.light_slots.get_mut(light.index()) {
                        *slot = None;
                    }
                }
                removed += 1;
            }
        }
        engine_debug!("nova3d::SceneGraph", "Removed {} node(s)", removed);
        removed
    }

    /// Remove the parent link (or root entry) of a node
    fn unlink(&mut self, key: NodeKey) {
        match self.nodes[key].parent.take() {
            Some(parent) => {
                if let Some(entry) = self.nodes.get_mut(parent) {
                    entry.children.retain(|&c| c != key);
                }
            }
            None => self.roots.retain(|&r| r != key),
        }
    }

    fn is_ancestor_or_self(&self, ancestor: NodeKey, mut key: NodeKey) -> bool {
        loop {
            if key == ancestor {
                return true;
            }
            match self.nodes.get(key).and_then(|e| e.parent) {
                Some(parent) => key = parent,
                None => return false,
            }
        }
    }

    // ===== ACCESS =====

    pub fn node(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key).map(|e| &e.node)
    }

    pub fn node_mut(&mut self, key: NodeKey) -> Option<&mut Node> {
        self.nodes.get_mut(key).map(|e| &mut e.node)
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.nodes.get(key).and_then(|e| e.parent)
    }

    pub fn children(&self, key: NodeKey) -> &[NodeKey] {
        self.nodes.get(key).map(|e| e.children.as_slice()).unwrap_or(&[])
    }

    pub fn roots(&self) -> &[NodeKey] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// First node (pre-order) with this name
    pub fn find_by_name(&self, name: &str) -> Option<NodeKey> {
        self.keys().into_iter().find(|&k| self.nodes[k].node.name == name)
    }

    /// Cached world matrix of a node (valid after `update_transforms`)
    pub fn world_matrix(&self, key: NodeKey) -> Option<&Mat4> {
        self.node(key).map(|n| n.transform.world_matrix())
    }

    // ===== CAMERA =====

    pub fn active_camera(&self) -> Option<NodeKey> {
        self.active_camera
    }

    /// Select the camera used for rendering
    pub fn set_active_camera(&mut self, key: NodeKey) -> Result<()> {
        let Some(node) = self.node(key) else {
            engine_bail!("nova3d::SceneGraph", InvalidResource => "set_active_camera: unknown node key");
        };
        if !node.has(Capabilities::CAMERA) {
            engine_bail!("nova3d::SceneGraph", InvalidConfiguration =>
                "Node '{}' is not a camera", node.name);
        }
        self.active_camera = Some(key);
        Ok(())
    }

    // ===== LIGHTS =====

    /// Occupant of each `lights` slot; freed slots are `None` until reused
    pub fn light_slots(&self) -> &[Option<NodeKey>] {
        &self.light_slots
    }

    /// Full `lights` struct array: one element per slot, unlit where free
    ///
    /// Slots are never dropped, so a removed light's element is overwritten
    /// on the next upload instead of keeping its last values.
    pub fn lights_uniform(&self) -> UniformValue {
        let items = self
            .light_slots
            .iter()
            .map(|slot| {
                slot.and_then(|key| self.node(key))
                    .and_then(|node| node.light_data().map(|light| light.uniform_fields(&node.transform)))
                    .unwrap_or_else(Light::unlit_fields)
            })
            .collect();
        UniformValue::StructArray(items)
    }

    // ===== TRAVERSAL =====

    /// All node keys in depth-first pre-order (roots in insertion order)
    pub fn keys(&self) -> Vec<NodeKey> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeKey> = self.roots.iter().rev().copied().collect();
        while let Some(key) = stack.pop() {
            order.push(key);
            stack.extend(self.nodes[key].children.iter().rev().copied());
        }
        order
    }

    /// Keys of nodes having every bit of `capability`, in pre-order
    pub fn keys_with(&self, capability: Capabilities) -> Vec<NodeKey> {
        self.keys()
            .into_iter()
            .filter(|&k| self.nodes[k].node.has(capability))
            .collect()
    }

    /// Visit every node depth-first, parents before children
    pub fn traverse<F: FnMut(NodeKey, &Node)>(&self, mut visit: F) {
        for key in self.keys() {
            visit(key, &self.nodes[key].node);
        }
    }

    /// Visit every node mutably, parents before children
    pub fn traverse_mut<F: FnMut(NodeKey, &mut Node)>(&mut self, mut visit: F) {
        for key in self.keys() {
            visit(key, &mut self.nodes[key].node);
        }
    }

    /// Logic traversal: run every node's script
    pub fn update_logic(&mut self, dt: f32) {
        self.traverse_mut(|_, node| node.update_logic(dt));
    }

    /// Transform traversal: recompute every local and world matrix top-down
    pub fn update_transforms(&mut self) {
        let mut stack: Vec<(NodeKey, Option<Mat4>)> =
            self.roots.iter().rev().map(|&k| (k, None)).collect();
        while let Some((key, parent_world)) = stack.pop() {
            let entry = &mut self.nodes[key];
            entry.node.transform.update(parent_world.as_ref());
            let world = *entry.node.transform.world_matrix();
            stack.extend(entry.children.iter().rev().map(|&c| (c, Some(world))));
        }
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "scene_graph_tests.rs"]
mod tests;
