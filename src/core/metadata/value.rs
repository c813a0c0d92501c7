//! core::metadata::value
//!
//! The value model carried by container metadata.
//!
//! # Variants
//!
//! A [`MetadataValue`] is one of:
//!
//! - `String`: plain text
//! - `Boolean`: `true` / `false`
//! - `Number`: a JSON number (integer or float)
//! - `Structured`: a nested map or list of further values
//!
//! JSON `null` has no counterpart; structured data containing `null` is
//! rejected when converted from JSON.
//!
//! # Example
//!
//! ```
//! use containerkit::core::metadata::{MetadataValue, Structured};
//!
//! let v: MetadataValue = serde_json::from_str(r#"{"frames": [1, 2]}"#).unwrap();
//! assert!(matches!(v, MetadataValue::Structured(Structured::Map(_))));
//! assert_eq!(serde_json::to_string(&v).unwrap(), r#"{"frames":[1,2]}"#);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Decoded metadata of one container, keyed by property name.
pub type Metadata = BTreeMap<String, MetadataValue>;

/// A single metadata value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Boolean(bool),
    Number(Number),
    String(String),
    Structured(Structured),
}

/// Nested metadata: a mapping or a sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Structured {
    Map(BTreeMap<String, MetadataValue>),
    List(Vec<MetadataValue>),
}

impl MetadataValue {
    /// A float value; `None` for NaN or infinities, which JSON cannot carry.
    pub fn float(value: f64) -> Option<Self> {
        Number::from_f64(value).map(MetadataValue::Number)
    }

    /// The text of a `String` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetadataValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// The flag of a `Boolean` value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MetadataValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Numeric view of the value.
    ///
    /// Top-level numbers are persisted as host text and come back as
    /// `String`, so numeric-looking strings are coerced here.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetadataValue::Number(n) => n.as_f64(),
            MetadataValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Integer view of the value; see [`as_f64`](Self::as_f64).
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            MetadataValue::Number(n) => n.as_i64(),
            MetadataValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// The nested data of a `Structured` value.
    pub fn as_structured(&self) -> Option<&Structured> {
        match self {
            MetadataValue::Structured(s) => Some(s),
            _ => None,
        }
    }

    /// True for maps and lists.
    pub fn is_structured(&self) -> bool {
        matches!(self, MetadataValue::Structured(_))
    }

    /// Convert to a JSON value.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            MetadataValue::Boolean(b) => serde_json::Value::Bool(*b),
            MetadataValue::Number(n) => serde_json::Value::Number(n.clone()),
            MetadataValue::String(s) => serde_json::Value::String(s.clone()),
            MetadataValue::Structured(Structured::Map(map)) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
            MetadataValue::Structured(Structured::List(items)) => {
                serde_json::Value::Array(items.iter().map(MetadataValue::to_json).collect())
            }
        }
    }
}

/// Error converting JSON that contains `null`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NullValueError;

impl fmt::Display for NullValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("null is not a metadata value")
    }
}

impl std::error::Error for NullValueError {}

impl TryFrom<serde_json::Value> for MetadataValue {
    type Error = NullValueError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        Ok(match value {
            serde_json::Value::Null => return Err(NullValueError),
            serde_json::Value::Bool(b) => MetadataValue::Boolean(b),
            serde_json::Value::Number(n) => MetadataValue::Number(n),
            serde_json::Value::String(s) => MetadataValue::String(s),
            serde_json::Value::Array(items) => MetadataValue::Structured(Structured::List(
                items
                    .into_iter()
                    .map(MetadataValue::try_from)
                    .collect::<Result<_, _>>()?,
            )),
            serde_json::Value::Object(map) => MetadataValue::Structured(Structured::Map(
                map.into_iter()
                    .map(|(k, v)| MetadataValue::try_from(v).map(|v| (k, v)))
                    .collect::<Result<_, _>>()?,
            )),
        })
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        MetadataValue::String(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        MetadataValue::String(value)
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        MetadataValue::Boolean(value)
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        MetadataValue::Number(Number::from(value))
    }
}

impl From<Vec<MetadataValue>> for MetadataValue {
    fn from(value: Vec<MetadataValue>) -> Self {
        MetadataValue::Structured(Structured::List(value))
    }
}

impl From<BTreeMap<String, MetadataValue>> for MetadataValue {
    fn from(value: BTreeMap<String, MetadataValue>) -> Self {
        MetadataValue::Structured(Structured::Map(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn untagged_deserialize_picks_variants() {
        let v: MetadataValue = serde_json::from_str("true").unwrap();
        assert_eq!(v, MetadataValue::Boolean(true));

        let v: MetadataValue = serde_json::from_str("3").unwrap();
        assert_eq!(v, MetadataValue::from(3i64));

        let v: MetadataValue = serde_json::from_str("\"x\"").unwrap();
        assert_eq!(v, MetadataValue::from("x"));

        let v: MetadataValue = serde_json::from_str("[1, \"a\"]").unwrap();
        assert_eq!(
            v,
            MetadataValue::from(vec![MetadataValue::from(1i64), MetadataValue::from("a")])
        );
    }

    #[test]
    fn null_is_rejected() {
        assert!(serde_json::from_str::<MetadataValue>("null").is_err());
        assert!(serde_json::from_str::<MetadataValue>(r#"{"a": null}"#).is_err());
        assert_eq!(
            MetadataValue::try_from(json!([1, null])),
            Err(NullValueError)
        );
    }

    #[test]
    fn json_conversion_is_symmetric() {
        let source = json!({"a": [1, 2.5, "x", false], "b": {"c": "d"}});
        let value = MetadataValue::try_from(source.clone()).unwrap();
        assert_eq!(value.to_json(), source);
    }

    #[test]
    fn numeric_coercion_from_text() {
        assert_eq!(MetadataValue::from("12").as_i64(), Some(12));
        assert_eq!(MetadataValue::from(" 2.5 ").as_f64(), Some(2.5));
        assert_eq!(MetadataValue::from("abc").as_f64(), None);
        assert_eq!(MetadataValue::from(true).as_f64(), None);
        assert_eq!(MetadataValue::float(f64::NAN), None);
    }

    #[test]
    fn accessors() {
        assert_eq!(MetadataValue::from("x").as_str(), Some("x"));
        assert_eq!(MetadataValue::from(false).as_bool(), Some(false));
        assert!(MetadataValue::from(Vec::new()).is_structured());
        assert!(MetadataValue::from("x").as_structured().is_none());
    }
}
