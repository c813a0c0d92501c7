//! read command - Print the decoded metadata of a container

use super::{open_scene, require_node, Context};
use crate::core::metadata;
use anyhow::{Context as _, Result};

/// Decode `container` and print its metadata as pretty JSON.
pub fn read(ctx: &Context, container: &str) -> Result<()> {
    let (_, scene) = open_scene(ctx)?;
    let node = require_node(&scene, container)?;

    let data = metadata::decode(&scene, node);
    let rendered = serde_json::to_string_pretty(&data).context("Failed to render metadata")?;
    println!("{}", rendered);

    Ok(())
}
