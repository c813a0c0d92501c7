//! host::traits
//!
//! Collaborator traits through which the core reaches the host scene.
//!
//! # Design
//!
//! The core never touches host globals. Node lookup, traversal and user
//! property access all go through these traits, so every operation can be
//! exercised against an in-memory [`Scene`](super::Scene) in tests.
//!
//! Nodes are identified by [`NodeId`], an opaque index issued by the host.
//! A `NodeId` is only meaningful for the host that issued it.
//!
//! # Example
//!
//! ```
//! use containerkit::host::{NodeGraph, PropertyStore, ScalarValue, Scene};
//!
//! let mut scene = Scene::new();
//! let node = scene.add_node("bar01:barCON", None);
//! scene.set_property(node, "name", &ScalarValue::from("bar")).unwrap();
//!
//! assert_eq!(scene.find_node_by_name("bar01:barCON"), Some(node));
//! assert_eq!(scene.property(node, "name").as_deref(), Some("bar"));
//! ```

use std::fmt;

use serde_json::Number;
use thiserror::Error;

/// Opaque handle to a node owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Index of the node within its host.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Errors reported by host property writes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The handle does not refer to a node of this host.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    /// The host refused to store a property.
    #[error("host rejected write of '{key}': {reason}")]
    WriteRejected { key: String, reason: String },
}

/// A scalar the host can store natively in a user property.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    String(String),
    Boolean(bool),
    Number(Number),
}

impl ScalarValue {
    /// Render the value the way the host writes it into the property buffer.
    pub fn to_host_text(&self) -> String {
        match self {
            ScalarValue::String(s) => s.clone(),
            ScalarValue::Boolean(true) => "true".to_string(),
            ScalarValue::Boolean(false) => "false".to_string(),
            ScalarValue::Number(n) => n.to_string(),
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_host_text())
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::String(value.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        ScalarValue::String(value)
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        ScalarValue::Boolean(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Number(Number::from(value))
    }
}

/// Read access to the host's node tree.
///
/// The tree is rooted at [`root_node`](NodeGraph::root_node) and has no
/// cycles. Node names are not required to be unique; lookups by name return
/// the first match in host order.
pub trait NodeGraph {
    /// Find a node by its exact name.
    fn find_node_by_name(&self, name: &str) -> Option<NodeId>;

    /// The scene root.
    fn root_node(&self) -> NodeId;

    /// Direct children of `node`, in host order.
    ///
    /// Unknown nodes have no children.
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Name of `node`. Unknown nodes have an empty name.
    fn name(&self, node: NodeId) -> String;

    /// Host class family of `node` (e.g. `GeometryClass`), if the host
    /// tracks one.
    fn superclass(&self, _node: NodeId) -> Option<String> {
        None
    }
}

/// Per-node user property access.
pub trait PropertyStore {
    /// The full property buffer text of `node`, if it has one.
    fn raw_buffer(&self, node: NodeId) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value for the key.
    fn set_property(&mut self, node: NodeId, key: &str, value: &ScalarValue)
        -> Result<(), HostError>;

    /// The raw text stored under `key`, if present. When the key appears
    /// on several lines, the last one wins.
    fn property(&self, node: NodeId, key: &str) -> Option<String>;
}

/// Node creation, used by the container workflow.
pub trait NodeFactory {
    /// Create a node named `name` under `parent` (the scene root when `None`).
    fn create_node(&mut self, name: &str, parent: Option<NodeId>) -> NodeId;
}

/// Everything the core needs from a host.
pub trait Host: NodeGraph + PropertyStore {}

impl<T: NodeGraph + PropertyStore + ?Sized> Host for T {}
