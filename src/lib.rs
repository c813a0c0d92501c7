//! containerkit - container metadata and namespaces for 3D scene pipelines
//!
//! Scene nodes become publishable *containers* by carrying structured
//! metadata in their user property buffer. Loaded asset instances live in
//! uniquely numbered namespaces.
//!
//! # Architecture
//!
//! - [`host`] - Traits over the host scene graph, plus in-memory and
//!   file-backed implementations
//! - [`core`] - Metadata codec, attribute scanning, namespace allocation,
//!   container workflow, configuration
//! - [`cli`] - The `ctk` command-line interface
//!
//! # Correctness Invariants
//!
//! 1. Decoding never fails as a whole; unreadable lines are dropped
//! 2. Decoded metadata always names its container in `instance_node`
//! 3. An allocated namespace's master container does not exist at the time
//!    of allocation
//! 4. Parent segments of a namespace are never renumbered

pub mod cli;
pub mod core;
pub mod host;
