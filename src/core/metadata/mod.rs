//! core::metadata
//!
//! Container metadata: value model and property buffer codec.
//!
//! # Modules
//!
//! - [`value`] - [`MetadataValue`] sum type and the [`Metadata`] map
//! - [`codec`] - Encoding into and decoding from a node's property buffer
//!
//! # Architecture
//!
//! Metadata is stored on the container node itself, as user properties in
//! the host's flat `key=value` buffer. There is no schema version in the
//! buffer; decoding is tolerant and drops what it cannot read.

pub mod codec;
pub mod value;

pub use codec::{decode, encode, INSTANCE_NODE_KEY, JSON_PREFIX, LINE_TERMINATOR};
pub use value::{Metadata, MetadataValue, NullValueError, Structured};
