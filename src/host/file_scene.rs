//! host::file_scene
//!
//! JSON snapshot of a [`Scene`] on disk.
//!
//! # Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "nodes": [
//!     {
//!       "name": "bar01:barCON",
//!       "class": "Container",
//!       "user_props": "namespace=bar01\r\nname=bar",
//!       "children": []
//!     }
//!   ]
//! }
//! ```
//!
//! `nodes` are the children of the scene root. `user_props` is the raw
//! property buffer, stored verbatim.
//!
//! Writes are atomic (write to temp file, then rename).

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::memory::Scene;
use super::traits::{NodeGraph, NodeId};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Errors from scene snapshot I/O.
#[derive(Debug, Error)]
pub enum SceneFileError {
    #[error("failed to read scene file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse scene file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write scene file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize scene for '{path}': {message}")]
    SerializeError { path: PathBuf, message: String },

    #[error("unsupported scene file version {0}, supported: {SNAPSHOT_VERSION}")]
    UnsupportedVersion(u32),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
struct SnapshotFile {
    version: u32,
    #[serde(default)]
    nodes: Vec<NodeRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
struct NodeRecord {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    class: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    user_props: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<NodeRecord>,
}

/// A scene snapshot file.
#[derive(Debug, Clone)]
pub struct SceneFile {
    path: PathBuf,
}

impl SceneFile {
    /// Refer to a snapshot at `path`. Nothing is read until [`load`](Self::load).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the snapshot.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the snapshot. A missing file yields an empty scene.
    pub fn load(&self) -> Result<Scene, SceneFileError> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "scene file missing, starting empty");
            return Ok(Scene::new());
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| SceneFileError::ReadError {
            path: self.path.clone(),
            source: e,
        })?;

        parse_snapshot(&contents).map_err(|e| match e {
            SceneFileError::ParseError { message, .. } => SceneFileError::ParseError {
                path: self.path.clone(),
                message,
            },
            other => other,
        })
    }

    /// Write `scene` to the snapshot atomically.
    pub fn save(&self, scene: &Scene) -> Result<(), SceneFileError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| SceneFileError::WriteError {
                path: self.path.clone(),
                source: e,
            })?;
        }

        let contents = render_snapshot(scene).map_err(|e| SceneFileError::SerializeError {
            path: self.path.clone(),
            message: e.to_string(),
        })?;

        let temp_path = self.path.with_extension("json.tmp");
        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .map_err(|e| SceneFileError::WriteError {
                    path: temp_path.clone(),
                    source: e,
                })?;

            file.write_all(contents.as_bytes())
                .map_err(|e| SceneFileError::WriteError {
                    path: temp_path.clone(),
                    source: e,
                })?;

            file.sync_all().map_err(|e| SceneFileError::WriteError {
                path: temp_path.clone(),
                source: e,
            })?;
        }

        fs::rename(&temp_path, &self.path).map_err(|e| SceneFileError::WriteError {
            path: self.path.clone(),
            source: e,
        })?;

        tracing::debug!(path = %self.path.display(), nodes = scene.len(), "scene saved");
        Ok(())
    }
}

/// Parse snapshot JSON into a scene.
fn parse_snapshot(contents: &str) -> Result<Scene, SceneFileError> {
    let file: SnapshotFile =
        serde_json::from_str(contents).map_err(|e| SceneFileError::ParseError {
            path: PathBuf::new(),
            message: e.to_string(),
        })?;

    if file.version != SNAPSHOT_VERSION {
        return Err(SceneFileError::UnsupportedVersion(file.version));
    }

    let mut scene = Scene::new();
    let root = scene.root_node();

    // Reverse pushes keep sibling order.
    let mut stack: Vec<(&NodeRecord, NodeId)> =
        file.nodes.iter().rev().map(|r| (r, root)).collect();

    while let Some((record, parent)) = stack.pop() {
        let id = match &record.class {
            Some(class) => scene.add_node_with_class(&record.name, class, Some(parent)),
            None => scene.add_node(&record.name, Some(parent)),
        };
        if !record.user_props.is_empty() {
            // The id was just issued by this scene.
            let _ = scene.set_raw_buffer(id, &record.user_props);
        }
        stack.extend(record.children.iter().rev().map(|c| (c, id)));
    }

    Ok(scene)
}

/// Render a scene as pretty snapshot JSON.
fn render_snapshot(scene: &Scene) -> Result<String, serde_json::Error> {
    // Children always have higher ids than their parents, so walking ids
    // downwards builds every subtree before its parent needs it.
    let mut built: Vec<Option<NodeRecord>> = vec![None; scene.len()];

    for index in (1..scene.len()).rev() {
        let id = NodeId(index);
        let Some(node) = scene.node(id) else {
            continue;
        };
        let children = node
            .children
            .iter()
            .filter_map(|c| built.get_mut(c.0).and_then(Option::take))
            .collect();
        built[index] = Some(NodeRecord {
            name: node.name.clone(),
            class: node.class.clone(),
            user_props: node.user_props.clone(),
            children,
        });
    }

    let nodes = scene
        .children(scene.root_node())
        .iter()
        .filter_map(|c| built.get_mut(c.0).and_then(Option::take))
        .collect();

    let file = SnapshotFile {
        version: SNAPSHOT_VERSION,
        nodes,
    };

    serde_json::to_string_pretty(&file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{PropertyStore, ScalarValue};
    use tempfile::TempDir;

    fn sample_scene() -> Scene {
        let mut scene = Scene::new();
        let con = scene.add_node_with_class("bar01:barCON", "Container", None);
        scene
            .set_property(con, "namespace", &ScalarValue::from("bar01"))
            .unwrap();
        scene
            .set_property(con, "name", &ScalarValue::from("bar"))
            .unwrap();
        let mesh = scene.add_node_with_class("bar01:mesh", "GeometryClass", Some(con));
        scene.add_node("bar01:mesh_child", Some(mesh));
        scene.add_node("camera1", None);
        scene
    }

    #[test]
    fn save_and_load_preserves_tree() {
        let temp = TempDir::new().unwrap();
        let file = SceneFile::new(temp.path().join("scene.json"));
        let scene = sample_scene();

        file.save(&scene).unwrap();
        let loaded = file.load().unwrap();

        assert_eq!(loaded.len(), scene.len());
        let con = loaded.find_node_by_name("bar01:barCON").unwrap();
        assert_eq!(
            loaded.raw_buffer(con).as_deref(),
            Some("namespace=bar01\r\nname=bar")
        );
        assert_eq!(loaded.superclass(con).as_deref(), Some("Container"));

        let children: Vec<String> = loaded
            .children(loaded.root_node())
            .into_iter()
            .map(|c| loaded.name(c))
            .collect();
        assert_eq!(children, vec!["bar01:barCON", "camera1"]);

        let mesh = loaded.find_node_by_name("bar01:mesh").unwrap();
        assert_eq!(loaded.parent(mesh), Some(con));
        assert_eq!(loaded.children(mesh).len(), 1);
    }

    #[test]
    fn render_returns_a_full_document() {
        let rendered = render_snapshot(&Scene::new()).unwrap();
        let parsed: SnapshotFile = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed.version, SNAPSHOT_VERSION);
        assert!(parsed.nodes.is_empty());

        let rendered = render_snapshot(&sample_scene()).unwrap();
        assert!(rendered.contains("bar01:barCON"));

        let err = SceneFileError::SerializeError {
            path: PathBuf::from("shot.json"),
            message: "boom".into(),
        };
        assert!(err.to_string().contains("shot.json"));
    }

    #[test]
    fn missing_file_is_empty_scene() {
        let temp = TempDir::new().unwrap();
        let file = SceneFile::new(temp.path().join("nope.json"));
        let scene = file.load().unwrap();
        assert!(scene.is_empty());
    }

    #[test]
    fn save_creates_parent_dirs_and_no_temp_left() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/dir/scene.json");
        let file = SceneFile::new(&path);

        file.save(&sample_scene()).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn malformed_json_reports_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("scene.json");
        fs::write(&path, "{ not json").unwrap();

        let err = SceneFile::new(&path).load().unwrap_err();
        match err {
            SceneFileError::ParseError { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn unsupported_version_rejected() {
        let err = parse_snapshot(r#"{"version": 9, "nodes": []}"#).unwrap_err();
        assert!(matches!(err, SceneFileError::UnsupportedVersion(9)));
    }

    #[test]
    fn unknown_fields_rejected() {
        let err = parse_snapshot(r#"{"version": 1, "nodes": [], "extra": true}"#).unwrap_err();
        assert!(matches!(err, SceneFileError::ParseError { .. }));
    }
}
