//! imprint command - Write metadata onto a container node

use super::{open_scene, parse_json_pair, parse_pair, Context};
use crate::core::metadata::{self, Metadata, MetadataValue};
use crate::host::NodeGraph;
use anyhow::{bail, Context as _, Result};

/// Imprint `--set` and `--json` pairs onto `container`.
///
/// Later pairs win over earlier ones for the same key; `--json` pairs are
/// applied after `--set` pairs.
pub fn imprint(ctx: &Context, container: &str, set: &[String], json: &[String]) -> Result<()> {
    if set.is_empty() && json.is_empty() {
        bail!("Nothing to imprint. Pass --set KEY=VALUE or --json KEY=JSON.");
    }

    let mut data = Metadata::new();
    for pair in set {
        let (key, value) = parse_pair(pair)?;
        data.insert(key, MetadataValue::String(value));
    }
    for pair in json {
        let (key, value) = parse_json_pair(pair)?;
        data.insert(key, value);
    }

    let (file, mut scene) = open_scene(ctx)?;
    if scene.find_node_by_name(container).is_none() {
        bail!("Container '{}' not found in scene", container);
    }

    if !metadata::encode(&mut scene, container, &data) {
        bail!("Failed to imprint '{}'", container);
    }

    file.save(&scene)
        .with_context(|| format!("Failed to save scene '{}'", file.path().display()))?;

    if !ctx.quiet {
        println!("Imprinted {} key(s) on {}", data.len(), container);
    }

    Ok(())
}
