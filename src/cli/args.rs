//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--scene <path>`: Scene snapshot to operate on
//! - `--verbose` / `-v`: Enable debug logging
//! - `--quiet` / `-q`: Suppress all logging

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Environment variable naming the default scene snapshot.
pub const SCENE_ENV: &str = "CONTAINERKIT_SCENE";

/// Scene snapshot used when neither `--scene` nor the environment names one.
pub const DEFAULT_SCENE: &str = "scene.json";

/// ctk - container metadata and namespaces for 3D scene pipelines
#[derive(Parser, Debug)]
#[command(name = "ctk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Scene snapshot to operate on (default: $CONTAINERKIT_SCENE or scene.json)
    #[arg(long, global = true, value_name = "PATH")]
    pub scene: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress all logging
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Resolve the scene snapshot path.
    pub fn scene_path(&self) -> PathBuf {
        self.scene
            .clone()
            .or_else(|| std::env::var_os(SCENE_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCENE))
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write metadata onto a container node
    #[command(
        name = "imprint",
        long_about = "Write metadata onto a container node.\n\n\
            Values given with --set are stored as text. Values given with --json are \
            parsed as JSON: maps and lists are stored as structured data, scalars \
            natively. Existing keys are overwritten; other keys are left alone.",
        after_help = "\
EXAMPLES:
    ctk imprint bar01:barCON --set family=model --set subset=modelMain
    ctk imprint bar01:barCON --json 'frames=[1001,1100]' --json active=true"
    )]
    Imprint {
        /// Name of the container node
        container: String,

        /// Store a text value
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,

        /// Store a JSON value
        #[arg(long = "json", value_name = "KEY=JSON")]
        json: Vec<String>,
    },

    /// Print the decoded metadata of a container
    #[command(name = "read")]
    Read {
        /// Name of the container node
        container: String,
    },

    /// List nodes carrying a user property
    #[command(name = "ls")]
    Ls {
        /// Property name
        attr: String,

        /// Only nodes whose property equals this value
        #[arg(long)]
        value: Option<String>,

        /// Start the walk at this node instead of the scene root
        #[arg(long)]
        root: Option<String>,
    },

    /// List every descendant of a node
    #[command(name = "children")]
    Children {
        /// Name of the parent node
        parent: String,

        /// Only descendants of this class family
        #[arg(long)]
        class: Option<String>,
    },

    /// Find the first free namespace for a base name
    #[command(
        name = "unique-namespace",
        after_help = "\
EXAMPLES:
    ctk unique-namespace bar              # bar01
    ctk unique-namespace :hello           # :hello01
    ctk unique-namespace bar: --suffix _NS # bar01_NS:"
    )]
    UniqueNamespace {
        /// Base namespace
        base: String,

        #[command(flatten)]
        options: NamespaceArgs,
    },

    /// Print the namespace and name recorded on a master container
    #[command(name = "namespace")]
    Namespace {
        /// Name of the master container
        container: String,
    },

    /// Create and imprint a master container in a fresh namespace
    #[command(name = "containerise")]
    Containerise {
        /// Instance name
        name: String,

        /// Base namespace (default: the instance name)
        #[arg(long)]
        namespace: Option<String>,

        /// Loader recorded on the container
        #[arg(long)]
        loader: String,

        /// Representation recorded on the container
        #[arg(long)]
        representation: String,

        /// Extra JSON value to record
        #[arg(long = "json", value_name = "KEY=JSON")]
        json: Vec<String>,

        #[command(flatten)]
        options: NamespaceArgs,
    },

    /// Print the metadata of every container in the scene
    #[command(name = "containers")]
    Containers,

    /// Show or edit configuration
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Namespace allocation overrides.
#[derive(clap::Args, Debug, Default, Clone)]
pub struct NamespaceArgs {
    /// printf-style iteration format, e.g. %02d
    #[arg(long)]
    pub format: Option<String>,

    /// Text in front of every candidate
    #[arg(long)]
    pub prefix: Option<String>,

    /// Text after every candidate
    #[arg(long)]
    pub suffix: Option<String>,

    /// Suffix of master container names
    #[arg(long)]
    pub container_suffix: Option<String>,

    /// Give up after this many candidates
    #[arg(long)]
    pub max_iterations: Option<u32>,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Set a configuration value
    Set {
        /// Key, e.g. namespace.format
        key: String,

        /// Value
        value: String,

        /// Write the global config instead of the project config
        #[arg(long)]
        global: bool,
    },
}
