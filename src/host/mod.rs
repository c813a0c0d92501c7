//! host
//!
//! Abstraction over the 3D host application's scene graph.
//!
//! # Architecture
//!
//! The core talks to the host only through the traits in this module:
//!
//! - [`NodeGraph`]: node lookup and tree traversal
//! - [`PropertyStore`]: per-node user property buffer
//! - [`NodeFactory`]: node creation for the container workflow
//!
//! Two implementations ship with the crate:
//!
//! - [`Scene`]: an in-memory arena, used by tests and the CLI
//! - [`SceneFile`]: loads and saves a [`Scene`] as a JSON snapshot
//!
//! # Threading
//!
//! Hosts are single-threaded. Nothing here is `Sync`-bound; mutation goes
//! through `&mut self`, so a scene has exactly one writer at a time.

pub mod file_scene;
pub mod memory;
mod traits;

pub use file_scene::{SceneFile, SceneFileError, SNAPSHOT_VERSION};
pub use memory::{Scene, ROOT_NAME};
pub use traits::{Host, HostError, NodeFactory, NodeGraph, NodeId, PropertyStore, ScalarValue};
