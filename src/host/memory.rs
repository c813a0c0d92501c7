//! host::memory
//!
//! In-memory scene implementing every host trait.
//!
//! # Design
//!
//! Nodes live in an arena (`Vec`) and are addressed by [`NodeId`] index.
//! Each node keeps its user properties the way the host does: one raw text
//! buffer of `key=value` lines separated by `\r\n`. `set_property` edits
//! that text in place, so what the codec reads back is exactly what a host
//! would hand it.
//!
//! Writes can be made to fail per key with [`Scene::reject_writes`], which
//! lets tests exercise partial, best-effort encodes.

use std::collections::HashSet;

use super::traits::{HostError, NodeFactory, NodeGraph, NodeId, PropertyStore, ScalarValue};
use crate::core::metadata::codec::LINE_TERMINATOR;

/// Name given to the implicit root node.
pub const ROOT_NAME: &str = "Scene Root";

/// A node stored in the arena.
#[derive(Debug, Clone)]
pub(crate) struct SceneNode {
    pub(crate) name: String,
    pub(crate) class: Option<String>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) user_props: String,
}

impl SceneNode {
    fn new(name: &str, parent: Option<NodeId>) -> Self {
        Self {
            name: name.to_string(),
            class: None,
            parent,
            children: Vec::new(),
            user_props: String::new(),
        }
    }
}

/// An in-memory scene graph.
#[derive(Debug, Clone)]
pub struct Scene {
    nodes: Vec<SceneNode>,
    rejected_keys: HashSet<String>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create a scene containing only the root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![SceneNode::new(ROOT_NAME, None)],
            rejected_keys: HashSet::new(),
        }
    }

    /// Add a node under `parent` (the root when `None`).
    ///
    /// An unknown parent falls back to the root.
    pub fn add_node(&mut self, name: &str, parent: Option<NodeId>) -> NodeId {
        let parent = parent
            .filter(|p| p.0 < self.nodes.len())
            .unwrap_or(NodeId(0));
        let id = NodeId(self.nodes.len());
        self.nodes.push(SceneNode::new(name, Some(parent)));
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Add a node with a host class family.
    pub fn add_node_with_class(
        &mut self,
        name: &str,
        class: &str,
        parent: Option<NodeId>,
    ) -> NodeId {
        let id = self.add_node(name, parent);
        self.nodes[id.0].class = Some(class.to_string());
        id
    }

    /// Replace the whole property buffer of `node` with `text`.
    pub fn set_raw_buffer(&mut self, node: NodeId, text: &str) -> Result<(), HostError> {
        let entry = self.node_mut(node)?;
        entry.user_props = text.to_string();
        Ok(())
    }

    /// Make every later write of `key` fail.
    pub fn reject_writes(&mut self, key: &str) {
        self.rejected_keys.insert(key.to_string());
    }

    /// Parent of `node`; `None` for the root or unknown nodes.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the scene holds only its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    pub(crate) fn node(&self, node: NodeId) -> Option<&SceneNode> {
        self.nodes.get(node.0)
    }

    fn node_mut(&mut self, node: NodeId) -> Result<&mut SceneNode, HostError> {
        self.nodes.get_mut(node.0).ok_or(HostError::UnknownNode(node))
    }
}

/// Key of a buffer line: the text before the first `=`, trimmed.
fn line_key(line: &str) -> Option<&str> {
    line.split_once('=').map(|(key, _)| key.trim())
}

impl NodeGraph for Scene {
    fn find_node_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.name == name).map(NodeId)
    }

    fn root_node(&self) -> NodeId {
        NodeId(0)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(node.0)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn name(&self, node: NodeId) -> String {
        self.nodes
            .get(node.0)
            .map(|n| n.name.clone())
            .unwrap_or_default()
    }

    fn superclass(&self, node: NodeId) -> Option<String> {
        self.nodes.get(node.0).and_then(|n| n.class.clone())
    }
}

impl PropertyStore for Scene {
    fn raw_buffer(&self, node: NodeId) -> Option<String> {
        self.nodes
            .get(node.0)
            .map(|n| n.user_props.clone())
            .filter(|b| !b.is_empty())
    }

    fn set_property(
        &mut self,
        node: NodeId,
        key: &str,
        value: &ScalarValue,
    ) -> Result<(), HostError> {
        if self.rejected_keys.contains(key) {
            return Err(HostError::WriteRejected {
                key: key.to_string(),
                reason: "write rejected by host".to_string(),
            });
        }

        let entry = self.node_mut(node)?;
        let new_line = format!("{}={}", key, value.to_host_text());

        let mut lines: Vec<String> = if entry.user_props.is_empty() {
            Vec::new()
        } else {
            entry
                .user_props
                .split(LINE_TERMINATOR)
                .map(str::to_string)
                .collect()
        };

        match lines.iter().rposition(|l| line_key(l) == Some(key)) {
            Some(idx) => lines[idx] = new_line,
            None => lines.push(new_line),
        }

        entry.user_props = lines.join(LINE_TERMINATOR);
        Ok(())
    }

    fn property(&self, node: NodeId, key: &str) -> Option<String> {
        let entry = self.nodes.get(node.0)?;
        entry
            .user_props
            .split(LINE_TERMINATOR)
            .filter_map(|line| line.split_once('='))
            .filter(|(k, _)| k.trim() == key)
            .last()
            .map(|(_, v)| v.trim().to_string())
    }
}

impl NodeFactory for Scene {
    fn create_node(&mut self, name: &str, parent: Option<NodeId>) -> NodeId {
        self.add_node(name, parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicated_key_reads_last_line() {
        let mut scene = Scene::new();
        let node = scene.add_node("c", None);
        scene
            .set_raw_buffer(node, "namespace=old\r\nname=bar\r\nnamespace=new")
            .unwrap();

        assert_eq!(scene.property(node, "namespace").as_deref(), Some("new"));
        assert_eq!(scene.property(node, "name").as_deref(), Some("bar"));

        scene
            .set_property(node, "namespace", &ScalarValue::from("newer"))
            .unwrap();
        assert_eq!(scene.property(node, "namespace").as_deref(), Some("newer"));
    }

    #[test]
    fn new_scene_has_root() {
        let scene = Scene::new();
        assert!(scene.is_empty());
        assert_eq!(scene.name(scene.root_node()), ROOT_NAME);
        assert!(scene.children(scene.root_node()).is_empty());
    }

    #[test]
    fn add_node_links_parent_and_child() {
        let mut scene = Scene::new();
        let a = scene.add_node("a", None);
        let b = scene.add_node("b", Some(a));

        assert_eq!(scene.children(scene.root_node()), vec![a]);
        assert_eq!(scene.children(a), vec![b]);
        assert_eq!(scene.parent(b), Some(a));
        assert_eq!(scene.len(), 3);
    }

    #[test]
    fn find_returns_first_match() {
        let mut scene = Scene::new();
        let first = scene.add_node("dup", None);
        scene.add_node("dup", None);
        assert_eq!(scene.find_node_by_name("dup"), Some(first));
        assert_eq!(scene.find_node_by_name("missing"), None);
    }

    #[test]
    fn set_property_appends_then_overwrites_in_place() {
        let mut scene = Scene::new();
        let n = scene.add_node("n", None);

        scene.set_property(n, "a", &ScalarValue::from("1")).unwrap();
        scene.set_property(n, "b", &ScalarValue::from(true)).unwrap();
        scene.set_property(n, "a", &ScalarValue::from("2")).unwrap();

        assert_eq!(scene.raw_buffer(n).as_deref(), Some("a=2\r\nb=true"));
        assert_eq!(scene.property(n, "a").as_deref(), Some("2"));
        assert_eq!(scene.property(n, "b").as_deref(), Some("true"));
        assert_eq!(scene.property(n, "c"), None);
    }

    #[test]
    fn property_lookup_tolerates_spaces() {
        let mut scene = Scene::new();
        let n = scene.add_node("n", None);
        scene.set_raw_buffer(n, "name = bar\r\ngarbage").unwrap();
        assert_eq!(scene.property(n, "name").as_deref(), Some("bar"));
    }

    #[test]
    fn empty_buffer_is_absent() {
        let mut scene = Scene::new();
        let n = scene.add_node("n", None);
        assert_eq!(scene.raw_buffer(n), None);
    }

    #[test]
    fn rejected_writes_fail() {
        let mut scene = Scene::new();
        let n = scene.add_node("n", None);
        scene.reject_writes("locked");

        let err = scene
            .set_property(n, "locked", &ScalarValue::from("x"))
            .unwrap_err();
        assert!(matches!(err, HostError::WriteRejected { .. }));
        assert_eq!(scene.raw_buffer(n), None);
    }

    #[test]
    fn unknown_node_write_fails() {
        let mut scene = Scene::new();
        let err = scene
            .set_property(NodeId(99), "a", &ScalarValue::from("x"))
            .unwrap_err();
        assert_eq!(err, HostError::UnknownNode(NodeId(99)));
    }

    #[test]
    fn classes_are_reported() {
        let mut scene = Scene::new();
        let n = scene.add_node_with_class("box", "GeometryClass", None);
        assert_eq!(scene.superclass(n).as_deref(), Some("GeometryClass"));
        assert_eq!(scene.superclass(scene.root_node()), None);
    }
}
