//! ls and children commands - Walk the scene tree

use super::{open_scene, require_node, Context};
use crate::core::scan;
use crate::host::NodeGraph;
use anyhow::Result;

/// Print the names of nodes carrying `attr`, in tree order.
pub fn ls(ctx: &Context, attr: &str, value: Option<&str>, root: Option<&str>) -> Result<()> {
    let (_, scene) = open_scene(ctx)?;
    let start = root.map(|name| require_node(&scene, name)).transpose()?;

    let nodes = scan::list_nodes_with_attribute(&scene, attr, value, start);
    tracing::debug!(attr, matches = nodes.len(), "attribute scan finished");

    for node in nodes {
        println!("{}", scene.name(node));
    }
    Ok(())
}

/// Print the names of every descendant of `parent`.
pub fn children(ctx: &Context, parent: &str, class: Option<&str>) -> Result<()> {
    let (_, scene) = open_scene(ctx)?;
    let parent = require_node(&scene, parent)?;

    for node in scan::all_children(&scene, parent, class) {
        println!("{}", scene.name(node));
    }
    Ok(())
}
