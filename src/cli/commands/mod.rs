//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Validates command-specific arguments
//! 2. Loads the scene snapshot (and configuration when needed)
//! 3. Calls into `core`
//! 4. Formats and displays output, saving the snapshot if it changed

mod config_cmd;
mod containerise;
mod imprint;
mod ls;
mod namespace;
mod read;

// Re-export command functions for testing and direct invocation
pub use config_cmd::{set as config_set, show as config_show};
pub use containerise::{containerise, containers};
pub use imprint::imprint;
pub use ls::{children, ls};
pub use namespace::{namespace, unique_namespace};
pub use read::read;

use anyhow::{anyhow, bail, Context as _, Result};
use std::path::{Path, PathBuf};

use super::args::{Command, ConfigAction, NamespaceArgs};
use super::Context;
use crate::core::config::Config;
use crate::core::metadata::MetadataValue;
use crate::core::namespace::NamespaceOptions;
use crate::core::types::NumberFormat;
use crate::host::{NodeGraph, NodeId, Scene, SceneFile};

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Imprint {
            container,
            set,
            json,
        } => imprint::imprint(ctx, &container, &set, &json),
        Command::Read { container } => read::read(ctx, &container),
        Command::Ls { attr, value, root } => {
            ls::ls(ctx, &attr, value.as_deref(), root.as_deref())
        }
        Command::Children { parent, class } => ls::children(ctx, &parent, class.as_deref()),
        Command::UniqueNamespace { base, options } => {
            namespace::unique_namespace(ctx, &base, &options)
        }
        Command::Namespace { container } => namespace::namespace(ctx, &container),
        Command::Containerise {
            name,
            namespace,
            loader,
            representation,
            json,
            options,
        } => containerise::containerise(
            ctx,
            &name,
            namespace.as_deref(),
            &loader,
            &representation,
            &json,
            &options,
        ),
        Command::Containers => containerise::containers(ctx),
        Command::Config { action } => match action {
            ConfigAction::Show => config_cmd::show(ctx),
            ConfigAction::Set { key, value, global } => {
                config_cmd::set(ctx, &key, &value, global)
            }
        },
    }
}

/// Directory holding the scene snapshot; project config lives here.
pub(crate) fn project_dir(ctx: &Context) -> PathBuf {
    ctx.scene_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Load the scene snapshot named by the context.
pub(crate) fn open_scene(ctx: &Context) -> Result<(SceneFile, Scene)> {
    let file = SceneFile::new(&ctx.scene_path);
    let scene = file
        .load()
        .with_context(|| format!("Failed to load scene '{}'", ctx.scene_path.display()))?;
    Ok((file, scene))
}

/// Load configuration for the context's project.
pub(crate) fn load_config(ctx: &Context) -> Result<Config> {
    Config::load(Some(&project_dir(ctx))).context("Failed to load configuration")
}

/// Resolve a node by name or fail with a readable error.
pub(crate) fn require_node(scene: &Scene, name: &str) -> Result<NodeId> {
    scene
        .find_node_by_name(name)
        .ok_or_else(|| anyhow!("Node '{}' not found in scene", name))
}

/// Configured namespace options with command-line overrides applied.
pub(crate) fn namespace_options(config: &Config, args: &NamespaceArgs) -> Result<NamespaceOptions> {
    let mut options = config.namespace_options();

    if let Some(format) = &args.format {
        options.format = NumberFormat::new(format.as_str())
            .with_context(|| format!("Invalid --format '{}'", format))?;
    }
    if let Some(prefix) = &args.prefix {
        options.prefix = prefix.clone();
    }
    if let Some(suffix) = &args.suffix {
        options.suffix = suffix.clone();
    }
    if let Some(suffix) = &args.container_suffix {
        if suffix.is_empty() {
            bail!("--container-suffix cannot be empty");
        }
        options.container_suffix = suffix.clone();
    }
    if let Some(max) = args.max_iterations {
        if max == 0 {
            bail!("--max-iterations must be at least 1");
        }
        options.max_iterations = Some(max);
    }

    Ok(options)
}

/// Split `KEY=VALUE` at the first `=`.
pub(crate) fn parse_pair(pair: &str) -> Result<(String, String)> {
    let (key, value) = pair
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected KEY=VALUE, got '{}'", pair))?;
    let key = key.trim();
    if key.is_empty() {
        bail!("Empty key in '{}'", pair);
    }
    Ok((key.to_string(), value.to_string()))
}

/// Parse `KEY=JSON` into a metadata entry.
pub(crate) fn parse_json_pair(pair: &str) -> Result<(String, MetadataValue)> {
    let (key, raw) = parse_pair(pair)?;
    let value: MetadataValue = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid JSON value for '{}': {}", key, raw))?;
    Ok((key, value))
}
