//! core
//!
//! Core domain types and operations for containerkit.
//!
//! # Modules
//!
//! - [`types`] - Strong types: NumberFormat
//! - [`metadata`] - Metadata value model and property buffer codec
//! - [`scan`] - Tree walks collecting nodes by attribute or class
//! - [`namespace`] - Unique namespace allocation
//! - [`container`] - Master container creation and listing
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - All host access goes through the [`crate::host`] traits
//! - Decoding is tolerant: bad data is dropped, never fatal
//! - Allocation is deterministic for a given scene

pub mod config;
pub mod container;
pub mod metadata;
pub mod namespace;
pub mod scan;
pub mod types;
