//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! containerkit has two configuration scopes:
//! - **Global**: User-level settings
//! - **Project**: Settings stored next to a scene snapshot
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Project config file
//! 4. CLI flags (not handled here)
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$CONTAINERKIT_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/containerkit/config.toml`
//! 3. `~/.containerkit/config.toml` (canonical write location)
//!
//! # Project Config Location
//!
//! `containerkit.toml` in the directory holding the scene snapshot.
//!
//! # Example
//!
//! ```no_run
//! use containerkit::core::config::Config;
//! use std::path::Path;
//!
//! let config = Config::load(Some(Path::new("/path/to/project"))).unwrap();
//! let options = config.namespace_options();
//! println!("format: {}", options.format);
//! println!("container suffix: {}", config.container_suffix());
//! ```

pub mod schema;

pub use schema::{FileConfig, NamespaceConfig};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::namespace::{NamespaceOptions, DEFAULT_CONTAINER_SUFFIX};
use crate::core::types::NumberFormat;

/// Environment variable overriding the global config path.
pub const CONFIG_ENV: &str = "CONTAINERKIT_CONFIG";

/// File name of the project config.
pub const PROJECT_CONFIG_FILE: &str = "containerkit.toml";

/// Keys accepted by [`set_value`].
pub const SETTABLE_KEYS: &[&str] = &[
    "namespace.format",
    "namespace.prefix",
    "namespace.suffix",
    "namespace.container_suffix",
    "namespace.max_iterations",
];

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("unknown config key '{0}'")]
    UnknownKey(String),

    #[error("home directory not found")]
    NoHomeDir,
}

/// Merged configuration from all sources.
///
/// Accessors apply precedence automatically: project config overrides
/// global config, which overrides built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: FileConfig,
    /// Project configuration (if present)
    pub project: Option<FileConfig>,
    global_path: Option<PathBuf>,
    project_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// If `project_dir` is provided, also loads its project config.
    ///
    /// # Errors
    ///
    /// Returns an error if config files exist but cannot be parsed or hold
    /// invalid values. Missing config files are not an error.
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ConfigError> {
        let global_path = Self::find_global();
        Self::load_from(global_path.as_deref(), project_dir)
    }

    /// Load configuration from an explicit global file.
    ///
    /// A `global_path` that does not exist is treated as absent.
    pub fn load_from(
        global_path: Option<&Path>,
        project_dir: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let (global, global_path) = match global_path.filter(|p| p.exists()) {
            Some(path) => (Self::read_config(path)?, Some(path.to_path_buf())),
            None => (FileConfig::default(), None),
        };

        let (project, project_path) = match project_dir {
            Some(dir) => {
                let path = Self::project_config_path(dir);
                if path.exists() {
                    (Some(Self::read_config(&path)?), Some(path))
                } else {
                    (None, None)
                }
            }
            None => (None, None),
        };

        global.validate()?;
        if let Some(ref p) = project {
            p.validate()?;
        }

        tracing::debug!(
            global = ?global_path,
            project = ?project_path,
            "configuration loaded"
        );

        Ok(Config {
            global,
            project,
            global_path,
            project_path,
        })
    }

    /// Locate the global config file, if any exists.
    fn find_global() -> Option<PathBuf> {
        // 1. Check $CONTAINERKIT_CONFIG
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
            tracing::warn!(path = %path.display(), "{} points to a missing file", CONFIG_ENV);
        }

        // 2. Check $XDG_CONFIG_HOME/containerkit/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("containerkit/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 3. Check ~/.containerkit/config.toml
        if let Some(home) = dirs::home_dir() {
            let path = home.join(".containerkit/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        None
    }

    /// Read and parse a config file.
    fn read_config(path: &Path) -> Result<FileConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Read the config file at `path` for editing; a missing file yields
    /// an empty config.
    pub fn read_for_edit(path: &Path) -> Result<FileConfig, ConfigError> {
        if path.exists() {
            Self::read_config(path)
        } else {
            Ok(FileConfig::default())
        }
    }

    /// Get the canonical path for global config.
    ///
    /// Returns `$CONTAINERKIT_CONFIG` when set, else
    /// `~/.containerkit/config.toml`.
    pub fn global_config_path() -> Result<PathBuf, ConfigError> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".containerkit/config.toml"))
    }

    /// Get the path of the project config in `project_dir`.
    pub fn project_config_path(project_dir: &Path) -> PathBuf {
        project_dir.join(PROJECT_CONFIG_FILE)
    }

    /// Write global config atomically.
    pub fn write_global(config: &FileConfig) -> Result<PathBuf, ConfigError> {
        let path = Self::global_config_path()?;
        Self::write_config_atomic(&path, config)?;
        Ok(path)
    }

    /// Write project config atomically.
    pub fn write_project(project_dir: &Path, config: &FileConfig) -> Result<PathBuf, ConfigError> {
        let path = Self::project_config_path(project_dir);
        Self::write_config_atomic(&path, config)?;
        Ok(path)
    }

    /// Write a config file atomically.
    ///
    /// Creates parent directories if needed. Uses atomic write
    /// (write to temp file, then rename) to prevent corruption.
    pub fn write_config_atomic(path: &Path, config: &FileConfig) -> Result<(), ConfigError> {
        config.validate()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let contents =
            toml::to_string_pretty(config).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

        let temp_path = path.with_extension("toml.tmp");
        let mut file = fs::File::create(&temp_path).map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        file.write_all(contents.as_bytes())
            .map_err(|e| ConfigError::WriteError {
                path: temp_path.clone(),
                source: e,
            })?;

        file.sync_all().map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        fs::rename(&temp_path, path).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// First value set in project, then global scope.
    fn namespace_value<T>(&self, pick: impl Fn(&NamespaceConfig) -> Option<T>) -> Option<T> {
        self.project
            .as_ref()
            .and_then(|p| p.namespace.as_ref())
            .and_then(&pick)
            .or_else(|| self.global.namespace.as_ref().and_then(&pick))
    }

    /// Get the namespace iteration format.
    ///
    /// Defaults to `%02d` if not configured.
    pub fn namespace_format(&self) -> NumberFormat {
        self.namespace_value(|n| n.format.clone())
            .and_then(|f| NumberFormat::new(f).ok())
            .unwrap_or_default()
    }

    /// Get the namespace prefix. Defaults to empty.
    pub fn namespace_prefix(&self) -> String {
        self.namespace_value(|n| n.prefix.clone()).unwrap_or_default()
    }

    /// Get the namespace suffix. Defaults to empty.
    pub fn namespace_suffix(&self) -> String {
        self.namespace_value(|n| n.suffix.clone()).unwrap_or_default()
    }

    /// Get the master container suffix.
    ///
    /// Defaults to `CON` if not configured.
    pub fn container_suffix(&self) -> String {
        self.namespace_value(|n| n.container_suffix.clone())
            .unwrap_or_else(|| DEFAULT_CONTAINER_SUFFIX.to_string())
    }

    /// Get the allocation cap. `None` means unbounded.
    pub fn max_iterations(&self) -> Option<u32> {
        self.namespace_value(|n| n.max_iterations)
    }

    /// Namespace options with all configured values applied.
    pub fn namespace_options(&self) -> NamespaceOptions {
        NamespaceOptions {
            format: self.namespace_format(),
            prefix: self.namespace_prefix(),
            suffix: self.namespace_suffix(),
            container_suffix: self.container_suffix(),
            max_iterations: self.max_iterations(),
        }
    }

    /// Get the path to the loaded global config file.
    pub fn global_config_loaded_from(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Get the path to the loaded project config file.
    pub fn project_config_loaded_from(&self) -> Option<&Path> {
        self.project_path.as_deref()
    }
}

/// Set `key` to `value` in `config`.
///
/// # Errors
///
/// `UnknownKey` for keys outside [`SETTABLE_KEYS`], `InvalidValue` when the
/// value does not validate.
pub fn set_value(config: &mut FileConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    let mut edited = config.clone();
    let namespace = edited.namespace_mut();
    match key {
        "namespace.format" => namespace.format = Some(value.to_string()),
        "namespace.prefix" => namespace.prefix = Some(value.to_string()),
        "namespace.suffix" => namespace.suffix = Some(value.to_string()),
        "namespace.container_suffix" => namespace.container_suffix = Some(value.to_string()),
        "namespace.max_iterations" => {
            let parsed = value.parse::<u32>().map_err(|_| {
                ConfigError::InvalidValue(format!(
                    "namespace.max_iterations must be a positive integer, got '{}'",
                    value
                ))
            })?;
            namespace.max_iterations = Some(parsed);
        }
        other => return Err(ConfigError::UnknownKey(other.to_string())),
    }
    edited.validate()?;
    *config = edited;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_empty_defaults() {
        let config = Config::load_from(None, None).unwrap();

        assert_eq!(config.namespace_format(), NumberFormat::default());
        assert_eq!(config.namespace_prefix(), "");
        assert_eq!(config.namespace_suffix(), "");
        assert_eq!(config.container_suffix(), "CON");
        assert_eq!(config.max_iterations(), None);
        assert!(config.global_config_loaded_from().is_none());
    }

    #[test]
    fn load_global_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            r#"
            [namespace]
            format = "%03d"
            max_iterations = 10
            "#,
        )
        .unwrap();

        let config = Config::load_from(Some(&path), None).unwrap();
        assert_eq!(config.namespace_format().render(1), "001");
        assert_eq!(config.max_iterations(), Some(10));
        assert_eq!(config.global_config_loaded_from(), Some(path.as_path()));
    }

    #[test]
    fn missing_global_path_is_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Config::load_from(Some(&temp.path().join("nope.toml")), None).unwrap();
        assert!(config.global_config_loaded_from().is_none());
    }

    #[test]
    fn precedence_project_overrides_global() {
        let temp = TempDir::new().unwrap();
        let global = temp.path().join("global.toml");
        fs::write(
            &global,
            r#"
            [namespace]
            suffix = "_G"
            container_suffix = "_CON"
            "#,
        )
        .unwrap();
        fs::write(
            temp.path().join(PROJECT_CONFIG_FILE),
            r#"
            [namespace]
            suffix = "_P"
            "#,
        )
        .unwrap();

        let config = Config::load_from(Some(&global), Some(temp.path())).unwrap();
        assert_eq!(config.namespace_suffix(), "_P");
        assert_eq!(config.container_suffix(), "_CON");
        assert!(config.project_config_loaded_from().is_some());
    }

    #[test]
    fn invalid_format_rejected() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(PROJECT_CONFIG_FILE),
            "[namespace]\nformat = \"nope\"\n",
        )
        .unwrap();

        let result = Config::load_from(None, Some(temp.path()));
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn unknown_fields_rejected() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(PROJECT_CONFIG_FILE), "colour = true\n").unwrap();

        let result = Config::load_from(None, Some(temp.path()));
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn write_project_config_atomic() {
        let temp = TempDir::new().unwrap();
        let mut file = FileConfig::default();
        set_value(&mut file, "namespace.prefix", "p_").unwrap();

        let path = Config::write_project(temp.path(), &file).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("toml.tmp").exists());

        let loaded = Config::load_from(None, Some(temp.path())).unwrap();
        assert_eq!(loaded.namespace_prefix(), "p_");
    }

    #[test]
    fn set_value_validates() {
        let mut file = FileConfig::default();
        assert!(set_value(&mut file, "namespace.max_iterations", "25").is_ok());
        assert_eq!(file.namespace.as_ref().unwrap().max_iterations, Some(25));

        assert!(matches!(
            set_value(&mut file, "namespace.max_iterations", "lots"),
            Err(ConfigError::InvalidValue(_))
        ));
        assert!(matches!(
            set_value(&mut file, "namespace.format", "%x"),
            Err(ConfigError::InvalidValue(_))
        ));
        assert_eq!(file.namespace.as_ref().unwrap().format, None);
        assert!(matches!(
            set_value(&mut file, "colour", "red"),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn namespace_options_collects_everything() {
        let config = Config {
            project: Some(FileConfig {
                namespace: Some(NamespaceConfig {
                    prefix: Some("a_".into()),
                    max_iterations: Some(5),
                    ..Default::default()
                }),
            }),
            ..Default::default()
        };

        let options = config.namespace_options();
        assert_eq!(options.prefix, "a_");
        assert_eq!(options.max_iterations, Some(5));
        assert_eq!(options.container_suffix, "CON");
    }
}
