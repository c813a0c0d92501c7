//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Files
//!
//! The same schema is used for both scopes:
//! 1. Global: `$CONTAINERKIT_CONFIG`, `$XDG_CONFIG_HOME/containerkit/config.toml`
//!    or `~/.containerkit/config.toml`
//! 2. Project: `containerkit.toml` next to the scene snapshot
//!
//! # Validation
//!
//! Config values are validated after parsing (e.g., the number format must
//! contain exactly one `%d` directive).

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::types::NumberFormat;

/// A configuration file.
///
/// # Example
///
/// ```toml
/// [namespace]
/// format = "%03d"
/// prefix = ""
/// suffix = "_"
/// container_suffix = "_CON"
/// max_iterations = 1000
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Namespace allocation defaults
    pub namespace: Option<NamespaceConfig>,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(namespace) = &self.namespace {
            namespace.validate()?;
        }
        Ok(())
    }

    /// Mutable namespace section, created on demand.
    pub fn namespace_mut(&mut self) -> &mut NamespaceConfig {
        self.namespace.get_or_insert_with(NamespaceConfig::default)
    }
}

/// Namespace allocation defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct NamespaceConfig {
    /// printf-style iteration format (default: "%02d")
    pub format: Option<String>,

    /// Text in front of every candidate
    pub prefix: Option<String>,

    /// Text after every candidate
    pub suffix: Option<String>,

    /// Suffix of master container names (default: "CON")
    pub container_suffix: Option<String>,

    /// Maximum candidates to try (default: unbounded)
    pub max_iterations: Option<u32>,
}

impl NamespaceConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(format) = &self.format {
            NumberFormat::new(format.as_str()).map_err(|e| {
                ConfigError::InvalidValue(format!("invalid namespace.format: {}", e))
            })?;
        }

        if let Some(suffix) = &self.container_suffix {
            if suffix.is_empty() {
                return Err(ConfigError::InvalidValue(
                    "namespace.container_suffix cannot be empty".to_string(),
                ));
            }
        }

        if self.max_iterations == Some(0) {
            return Err(ConfigError::InvalidValue(
                "namespace.max_iterations must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_parses() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config, FileConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn full_namespace_section_parses() {
        let config: FileConfig = toml::from_str(
            r#"
            [namespace]
            format = "%03d"
            prefix = "p_"
            suffix = "_"
            container_suffix = "_CON"
            max_iterations = 50
            "#,
        )
        .unwrap();

        let ns = config.namespace.as_ref().unwrap();
        assert_eq!(ns.format.as_deref(), Some("%03d"));
        assert_eq!(ns.max_iterations, Some(50));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unknown_fields_rejected() {
        let result: Result<FileConfig, _> = toml::from_str(
            r#"
            [namespace]
            formatt = "%02d"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn invalid_values_rejected() {
        let bad_format = NamespaceConfig {
            format: Some("%s".into()),
            ..Default::default()
        };
        assert!(bad_format.validate().is_err());

        let empty_suffix = NamespaceConfig {
            container_suffix: Some(String::new()),
            ..Default::default()
        };
        assert!(empty_suffix.validate().is_err());

        let zero_cap = NamespaceConfig {
            max_iterations: Some(0),
            ..Default::default()
        };
        assert!(zero_cap.validate().is_err());
    }

    #[test]
    fn serializes_round_trip() {
        let mut config = FileConfig::default();
        config.namespace_mut().suffix = Some("_NS".into());

        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: FileConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
