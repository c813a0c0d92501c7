//! config command - Show or set configuration values

use super::{load_config, project_dir, Context};
use crate::core::config::{set_value, Config};
use anyhow::{Context as _, Result};

/// Show the effective configuration and where it came from.
pub fn show(ctx: &Context) -> Result<()> {
    let config = load_config(ctx)?;

    println!("# Effective Configuration");
    match config.global_config_loaded_from() {
        Some(path) => println!("# global: {}", path.display()),
        None => println!("# global: (none)"),
    }
    match config.project_config_loaded_from() {
        Some(path) => println!("# project: {}", path.display()),
        None => println!("# project: (none)"),
    }

    println!("namespace.format = {}", config.namespace_format());
    println!("namespace.prefix = {:?}", config.namespace_prefix());
    println!("namespace.suffix = {:?}", config.namespace_suffix());
    println!(
        "namespace.container_suffix = {:?}",
        config.container_suffix()
    );
    match config.max_iterations() {
        Some(max) => println!("namespace.max_iterations = {}", max),
        None => println!("namespace.max_iterations = (unbounded)"),
    }

    Ok(())
}

/// Set a configuration value in the project or global config.
pub fn set(ctx: &Context, key: &str, value: &str, global: bool) -> Result<()> {
    let path = if global {
        Config::global_config_path().context("Failed to locate global config")?
    } else {
        Config::project_config_path(&project_dir(ctx))
    };

    let mut config = Config::read_for_edit(&path)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    set_value(&mut config, key, value)?;

    let written = if global {
        Config::write_global(&config)
    } else {
        Config::write_project(&project_dir(ctx), &config)
    }
    .context("Failed to write config")?;

    tracing::debug!(path = %written.display(), key, "config updated");
    if !ctx.quiet {
        println!("Set {} = {}", key, value);
    }

    Ok(())
}
