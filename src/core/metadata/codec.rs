//! core::metadata::codec
//!
//! Encoding of container metadata into a node's user property buffer.
//!
//! # Buffer Format
//!
//! The host keeps user properties as one text buffer:
//!
//! ```text
//! id=pyblish.avalon.container\r\n
//! name=bar\r\n
//! active=true\r\n
//! frames=JSON::[1001,1002]
//! ```
//!
//! - One `key=value` line per property, separated by `\r\n`
//! - Scalars are stored as host text
//! - Maps and lists are stored as [`JSON_PREFIX`] followed by compact JSON
//!
//! # Decoding Rules
//!
//! Applied per line, in order:
//!
//! 1. Lines without exactly one `=` are skipped
//! 2. Key and value are trimmed
//! 3. `JSON::` values are parsed; a parse failure drops the line
//! 4. `true` / `false` become booleans
//! 5. Everything else stays text
//!
//! Rule 4 means a string whose text is `true` or `false` comes back as a
//! boolean. Consumers rely on this, so it is kept as is.
//!
//! # Example
//!
//! ```
//! use containerkit::core::metadata::{codec, Metadata, MetadataValue};
//! use containerkit::host::Scene;
//!
//! let mut scene = Scene::new();
//! let node = scene.add_node("bar01:barCON", None);
//!
//! let mut data = Metadata::new();
//! data.insert("name".into(), MetadataValue::from("bar"));
//! data.insert("active".into(), MetadataValue::from(true));
//! assert!(codec::encode(&mut scene, "bar01:barCON", &data));
//!
//! let read = codec::decode(&scene, node);
//! assert_eq!(read["name"], MetadataValue::from("bar"));
//! assert_eq!(read["active"], MetadataValue::from(true));
//! assert_eq!(read["instance_node"], MetadataValue::from("bar01:barCON"));
//! ```

use crate::host::{Host, NodeId, ScalarValue};

use super::value::{Metadata, MetadataValue, Structured};

/// Marker in front of JSON-encoded structured values.
pub const JSON_PREFIX: &str = "JSON::";

/// Separator between buffer lines.
pub const LINE_TERMINATOR: &str = "\r\n";

/// Key synthesized on decode, holding the container's own name.
pub const INSTANCE_NODE_KEY: &str = "instance_node";

/// Convert a metadata value into what the host stores.
pub fn encode_value(value: &MetadataValue) -> ScalarValue {
    match value {
        MetadataValue::String(s) => ScalarValue::String(s.clone()),
        MetadataValue::Boolean(b) => ScalarValue::Boolean(*b),
        MetadataValue::Number(n) => ScalarValue::Number(n.clone()),
        MetadataValue::Structured(_) => {
            ScalarValue::String(format!("{}{}", JSON_PREFIX, value.to_json()))
        }
    }
}

/// Decode one stored value.
///
/// Returns `None` when a `JSON::` value does not parse.
pub fn decode_value(raw: &str) -> Option<MetadataValue> {
    let raw = raw.trim();

    let value = match raw.strip_prefix(JSON_PREFIX) {
        Some(json) => match serde_json::from_str::<MetadataValue>(json) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::debug!(error = %e, "dropping malformed structured value");
                return None;
            }
        },
        None => MetadataValue::String(raw.to_string()),
    };

    Some(match value {
        MetadataValue::String(s) if s == "true" => MetadataValue::Boolean(true),
        MetadataValue::String(s) if s == "false" => MetadataValue::Boolean(false),
        other => other,
    })
}

/// Parse a raw property buffer into its decodable entries.
///
/// Entries come back in buffer order. Malformed lines are skipped.
pub fn parse_buffer(buffer: &str) -> Vec<(String, MetadataValue)> {
    let mut entries = Vec::new();

    for line in buffer.split(LINE_TERMINATOR) {
        let mut parts = line.split('=');
        let (Some(key), Some(raw), None) = (parts.next(), parts.next(), parts.next()) else {
            if !line.is_empty() {
                tracing::debug!(line, "skipping property line without a single '='");
            }
            continue;
        };

        if let Some(value) = decode_value(raw) {
            entries.push((key.trim().to_string(), value));
        }
    }

    entries
}

/// Write `data` onto the node named `container_name`.
///
/// Returns `false` without touching the scene when the node does not exist.
/// Existing keys are overwritten; keys missing from `data` are kept.
///
/// Writes are independent: a key the host refuses is logged and skipped,
/// and the remaining keys are still written.
#[doc(alias = "imprint")]
pub fn encode<H: Host + ?Sized>(host: &mut H, container_name: &str, data: &Metadata) -> bool {
    let Some(node) = host.find_node_by_name(container_name) else {
        tracing::debug!(container = container_name, "encode target not found");
        return false;
    };

    for (key, value) in data {
        let scalar = encode_value(value);
        warn_if_lossy(container_name, key, &scalar);

        if let Err(e) = host.set_property(node, key, &scalar) {
            tracing::warn!(
                container = container_name,
                key = key.as_str(),
                error = %e,
                "failed to write metadata key"
            );
        }
    }

    true
}

/// Read the metadata stored on `container`.
///
/// An empty or missing buffer yields an empty map. Otherwise the result
/// always carries [`INSTANCE_NODE_KEY`] set to the container's name,
/// replacing any stored value of that key.
#[doc(alias = "read")]
pub fn decode<H: Host + ?Sized>(host: &H, container: NodeId) -> Metadata {
    let mut data = Metadata::new();

    let Some(buffer) = host.raw_buffer(container).filter(|b| !b.is_empty()) else {
        return data;
    };

    data.extend(parse_buffer(&buffer));
    data.insert(
        INSTANCE_NODE_KEY.to_string(),
        MetadataValue::String(host.name(container)),
    );
    data
}

/// Log entries that will not read back as written.
fn warn_if_lossy(container: &str, key: &str, value: &ScalarValue) {
    let breaks_line = |s: &str| s.contains('=') || s.contains('\r') || s.contains('\n');

    if breaks_line(key) {
        tracing::warn!(container, key, "metadata key will not survive decoding");
        return;
    }

    match value {
        ScalarValue::String(s) if breaks_line(s) => {
            tracing::warn!(container, key, "metadata value will not survive decoding");
        }
        ScalarValue::String(s) if s.trim() == "true" || s.trim() == "false" => {
            tracing::debug!(container, key, "string value will decode as a boolean");
        }
        _ => {}
    }
}

/// Kind of a stored entry, for display.
pub fn kind_name(value: &MetadataValue) -> &'static str {
    match value {
        MetadataValue::String(_) => "string",
        MetadataValue::Boolean(_) => "boolean",
        MetadataValue::Number(_) => "number",
        MetadataValue::Structured(Structured::Map(_)) => "map",
        MetadataValue::Structured(Structured::List(_)) => "list",
    }
}
