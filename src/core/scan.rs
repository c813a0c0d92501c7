//! core::scan
//!
//! Tree walks collecting nodes by user property or class.
//!
//! # Traversal
//!
//! Walks are depth-first pre-order and use an explicit stack, so deep
//! hierarchies cannot exhaust the call stack. The host tree has no cycles;
//! each node is visited once.

use crate::host::{Host, NodeGraph, NodeId};

/// Depth-first pre-order walk starting at (and including) `start`.
fn walk<G: NodeGraph + ?Sized>(graph: &G, start: NodeId) -> Vec<NodeId> {
    let mut visited = Vec::new();
    let mut stack = vec![start];

    while let Some(node) = stack.pop() {
        visited.push(node);
        stack.extend(graph.children(node).into_iter().rev());
    }

    visited
}

/// Nodes carrying user property `attr`.
///
/// With `value`, only nodes whose raw property text equals it exactly are
/// returned; without, every node where the property is present and
/// non-empty. The walk starts at `root` (the scene root when `None`) and
/// includes it.
///
/// # Example
///
/// ```
/// use containerkit::core::scan::list_nodes_with_attribute;
/// use containerkit::host::{PropertyStore, ScalarValue, Scene};
///
/// let mut scene = Scene::new();
/// let a = scene.add_node("a", None);
/// let b = scene.add_node("b", Some(a));
/// scene.set_property(b, "id", &ScalarValue::from("pyblish.avalon.container")).unwrap();
///
/// assert_eq!(list_nodes_with_attribute(&scene, "id", None, None), vec![b]);
/// assert!(list_nodes_with_attribute(&scene, "id", Some("other"), None).is_empty());
/// ```
#[doc(alias = "lsattr")]
pub fn list_nodes_with_attribute<H: Host + ?Sized>(
    host: &H,
    attr: &str,
    value: Option<&str>,
    root: Option<NodeId>,
) -> Vec<NodeId> {
    let start = root.unwrap_or_else(|| host.root_node());

    walk(host, start)
        .into_iter()
        .filter(|&node| match (host.property(node, attr), value) {
            (Some(found), Some(expected)) => found == expected,
            (Some(found), None) => !found.is_empty(),
            (None, _) => false,
        })
        .collect()
}

/// Every descendant of `parent`, excluding `parent` itself.
///
/// With `superclass`, only descendants of that host class family are
/// returned.
#[doc(alias = "get_all_children")]
pub fn all_children<G: NodeGraph + ?Sized>(
    graph: &G,
    parent: NodeId,
    superclass: Option<&str>,
) -> Vec<NodeId> {
    walk(graph, parent)
        .into_iter()
        .skip(1)
        .filter(|&node| match superclass {
            Some(class) => graph.superclass(node).as_deref() == Some(class),
            None => true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{PropertyStore, ScalarValue, Scene};

    /// root
    /// ├── a (foo=1)
    /// │   ├── a1 (foo=2)
    /// │   │   └── a1x (foo=1)
    /// │   └── a2
    /// └── b (foo="")
    ///     └── b1 (bar=1)
    fn tree() -> (Scene, Vec<NodeId>) {
        let mut scene = Scene::new();
        let a = scene.add_node_with_class("a", "GeometryClass", None);
        let a1 = scene.add_node_with_class("a1", "Helper", Some(a));
        let a1x = scene.add_node_with_class("a1x", "GeometryClass", Some(a1));
        let a2 = scene.add_node("a2", Some(a));
        let b = scene.add_node("b", None);
        let b1 = scene.add_node("b1", Some(b));

        let set = |scene: &mut Scene, n, k: &str, v: &str| {
            scene.set_property(n, k, &ScalarValue::from(v)).unwrap();
        };
        set(&mut scene, a, "foo", "1");
        set(&mut scene, a1, "foo", "2");
        set(&mut scene, a1x, "foo", "1");
        set(&mut scene, b, "foo", "");
        set(&mut scene, b1, "bar", "1");

        (scene, vec![a, a1, a1x, a2, b, b1])
    }

    #[test]
    fn walk_is_preorder() {
        let (scene, ids) = tree();
        let order = walk(&scene, scene.root_node());
        let mut expected = vec![scene.root_node()];
        expected.extend(ids);
        assert_eq!(order, expected);
    }

    #[test]
    fn any_non_empty_value_matches() {
        let (scene, ids) = tree();
        let found = list_nodes_with_attribute(&scene, "foo", None, None);
        assert_eq!(found, vec![ids[0], ids[1], ids[2]]);
    }

    #[test]
    fn exact_value_matches() {
        let (scene, ids) = tree();
        let found = list_nodes_with_attribute(&scene, "foo", Some("1"), None);
        assert_eq!(found, vec![ids[0], ids[2]]);
    }

    #[test]
    fn root_limits_the_walk() {
        let (scene, ids) = tree();
        let found = list_nodes_with_attribute(&scene, "foo", None, Some(ids[1]));
        assert_eq!(found, vec![ids[1], ids[2]]);
    }

    #[test]
    fn no_matches_is_empty() {
        let (scene, _) = tree();
        assert!(list_nodes_with_attribute(&scene, "missing", None, None).is_empty());
        assert!(list_nodes_with_attribute(&Scene::new(), "foo", None, None).is_empty());
    }

    #[test]
    fn all_children_excludes_parent() {
        let (scene, ids) = tree();
        assert_eq!(all_children(&scene, ids[0], None), vec![ids[1], ids[2], ids[3]]);
        assert!(all_children(&scene, ids[5], None).is_empty());
    }

    #[test]
    fn all_children_filters_by_class() {
        let (scene, ids) = tree();
        assert_eq!(
            all_children(&scene, scene.root_node(), Some("GeometryClass")),
            vec![ids[0], ids[2]]
        );
    }

    #[test]
    fn deep_chain_does_not_recurse() {
        let mut scene = Scene::new();
        let mut parent = None;
        for i in 0..50_000 {
            parent = Some(scene.add_node(&format!("n{}", i), parent));
        }
        let last = parent.unwrap();
        scene.set_property(last, "foo", &ScalarValue::from("x")).unwrap();

        assert_eq!(list_nodes_with_attribute(&scene, "foo", None, None), vec![last]);
    }
}
