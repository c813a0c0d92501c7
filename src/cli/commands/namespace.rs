//! unique-namespace and namespace commands

use super::{load_config, namespace_options, open_scene, Context, NamespaceArgs};
use crate::core::namespace;
use anyhow::{Context as _, Result};

/// Print the first free namespace for `base`.
pub fn unique_namespace(ctx: &Context, base: &str, args: &NamespaceArgs) -> Result<()> {
    let config = load_config(ctx)?;
    let options = namespace_options(&config, args)?;
    let (_, scene) = open_scene(ctx)?;

    let unique = namespace::allocate(&scene, base, &options)
        .with_context(|| format!("Failed to allocate a namespace for '{}'", base))?;
    println!("{}", unique);

    Ok(())
}

/// Print the raw namespace and name of a master container.
pub fn namespace(ctx: &Context, container: &str) -> Result<()> {
    let (_, scene) = open_scene(ctx)?;
    let sub = namespace::get_namespace(&scene, container)?;

    println!("namespace = {}", sub.namespace.as_deref().unwrap_or("(not set)"));
    println!("name = {}", sub.name.as_deref().unwrap_or("(not set)"));

    Ok(())
}
