//! containerise and containers commands

use super::{load_config, namespace_options, open_scene, parse_json_pair, Context, NamespaceArgs};
use crate::core::container::{self, ContainerData};
use crate::core::metadata::Metadata;
use anyhow::{Context as _, Result};

/// Create a master container for `name` and save the scene.
pub fn containerise(
    ctx: &Context,
    name: &str,
    base_namespace: Option<&str>,
    loader: &str,
    representation: &str,
    json: &[String],
    args: &NamespaceArgs,
) -> Result<()> {
    let config = load_config(ctx)?;
    let options = namespace_options(&config, args)?;

    let mut extra = Metadata::new();
    for pair in json {
        let (key, value) = parse_json_pair(pair)?;
        extra.insert(key, value);
    }

    let data = ContainerData {
        loader: loader.to_string(),
        representation: representation.to_string(),
        extra,
    };

    let base = base_namespace.unwrap_or(name);

    let (file, mut scene) = open_scene(ctx)?;
    let created = container::containerise(&mut scene, name, base, &options, &data)
        .with_context(|| format!("Failed to containerise '{}'", name))?;

    file.save(&scene)
        .with_context(|| format!("Failed to save scene '{}'", file.path().display()))?;

    if ctx.quiet {
        println!("{}", created.node_name);
    } else {
        println!(
            "Created {} in namespace {}",
            created.node_name, created.namespace
        );
    }

    Ok(())
}

/// Print every container's metadata as a JSON array.
pub fn containers(ctx: &Context) -> Result<()> {
    let (_, scene) = open_scene(ctx)?;
    let all = container::ls(&scene);

    let rendered = serde_json::to_string_pretty(&all).context("Failed to render containers")?;
    println!("{}", rendered);

    Ok(())
}
