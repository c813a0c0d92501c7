//! core::container
//!
//! Creation and listing of master containers.
//!
//! # Workflow
//!
//! Loading an asset instance:
//!
//! 1. Allocate a namespace for the instance ([`namespace::allocate`])
//! 2. Create the master container node the allocation probed for
//! 3. Imprint the instance metadata onto it ([`codec::encode`])
//!
//! Listing finds every node whose `id` property marks it as a container and
//! decodes its metadata.

use thiserror::Error;

use crate::core::metadata::{codec, Metadata, MetadataValue};
use crate::core::namespace::{self, NamespaceError, NamespaceOptions};
use crate::core::scan;
use crate::host::{Host, NodeFactory, NodeId};

/// Value of the `id` property on every container.
pub const CONTAINER_ID: &str = "pyblish.avalon.container";

/// Schema tag written with every container.
pub const CONTAINER_SCHEMA: &str = "container-2.0";

/// Errors from container operations.
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error(transparent)]
    Namespace(#[from] NamespaceError),

    #[error("failed to imprint container '{0}'")]
    ImprintFailed(String),
}

/// What gets recorded on a new container besides its namespace and name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContainerData {
    /// Loader that produced the instance.
    pub loader: String,
    /// Identifier of the loaded representation.
    pub representation: String,
    /// Additional metadata. Reserved keys are overwritten.
    pub extra: Metadata,
}

/// A created master container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    /// Node of the master container.
    pub node: NodeId,
    /// Node name of the master container.
    pub node_name: String,
    /// Allocated namespace.
    pub namespace: String,
}

/// Allocate a namespace, create the master container and imprint it.
///
/// The node is named after the allocation probe,
/// `{candidate}:{leaf}{container_suffix}`, without the base's leading `:`
/// or parent segments. Creating it takes the slot, so the next call with
/// the same base gets the next namespace. The instance `name` is recorded
/// in the metadata.
///
/// # Example
///
/// ```
/// use containerkit::core::container::{containerise, ContainerData};
/// use containerkit::core::namespace::NamespaceOptions;
/// use containerkit::host::Scene;
///
/// let mut scene = Scene::new();
/// let options = NamespaceOptions::default();
/// let data = ContainerData {
///     loader: "AbcLoader".into(),
///     representation: "rep-1".into(),
///     ..Default::default()
/// };
///
/// let first = containerise(&mut scene, "bar", "bar", &options, &data).unwrap();
/// let second = containerise(&mut scene, "bar", "bar", &options, &data).unwrap();
/// assert_eq!(first.node_name, "bar01:barCON");
/// assert_eq!(second.namespace, "bar02");
/// ```
pub fn containerise<H: Host + NodeFactory + ?Sized>(
    host: &mut H,
    name: &str,
    base_namespace: &str,
    options: &NamespaceOptions,
    data: &ContainerData,
) -> Result<Container, ContainerError> {
    let namespace::Allocation {
        namespace,
        master_container: node_name,
    } = namespace::allocate_master(&*host, base_namespace, options)?;
    let node = host.create_node(&node_name, None);

    let mut metadata = data.extra.clone();
    let reserved = [
        ("schema", CONTAINER_SCHEMA),
        ("id", CONTAINER_ID),
        ("name", name),
        ("namespace", namespace.as_str()),
        ("loader", data.loader.as_str()),
        ("representation", data.representation.as_str()),
    ];
    for (key, value) in reserved {
        metadata.insert(key.to_string(), MetadataValue::from(value));
    }

    if !codec::encode(host, &node_name, &metadata) {
        return Err(ContainerError::ImprintFailed(node_name));
    }

    tracing::debug!(container = %node_name, namespace = %namespace, "container created");
    Ok(Container {
        node,
        node_name,
        namespace,
    })
}

/// Decoded metadata of every container in the scene, in tree order.
pub fn ls<H: Host + ?Sized>(host: &H) -> Vec<Metadata> {
    scan::list_nodes_with_attribute(host, "id", Some(CONTAINER_ID), None)
        .into_iter()
        .map(|node| codec::decode(host, node))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::namespace::get_namespace;
    use crate::host::{NodeGraph, Scene};

    fn data() -> ContainerData {
        ContainerData {
            loader: "FbxLoader".into(),
            representation: "abc123".into(),
            extra: Metadata::new(),
        }
    }

    #[test]
    fn containerise_imprints_reserved_keys() {
        let mut scene = Scene::new();
        let con = containerise(&mut scene, "hero", "hero_", &NamespaceOptions::default(), &data())
            .unwrap();

        assert_eq!(con.namespace, "hero_01");
        assert_eq!(con.node_name, "hero_01:hero_CON");
        assert_eq!(scene.name(con.node), con.node_name);

        let meta = codec::decode(&scene, con.node);
        assert_eq!(meta["id"], MetadataValue::from(CONTAINER_ID));
        assert_eq!(meta["loader"], MetadataValue::from("FbxLoader"));
        assert_eq!(meta["representation"], MetadataValue::from("abc123"));
        assert_eq!(meta["instance_node"], MetadataValue::from("hero_01:hero_CON"));

        let sub = get_namespace(&scene, &con.node_name).unwrap();
        assert_eq!(sub.namespace.as_deref(), Some("hero_01"));
        assert_eq!(sub.name.as_deref(), Some("hero"));
    }

    #[test]
    fn reserved_keys_win_over_extra() {
        let mut scene = Scene::new();
        let mut d = data();
        d.extra.insert("id".into(), MetadataValue::from("spoofed"));
        d.extra.insert("frames".into(), MetadataValue::from(vec![MetadataValue::from(1i64)]));

        let con = containerise(&mut scene, "a", "a", &NamespaceOptions::default(), &d).unwrap();
        let meta = codec::decode(&scene, con.node);
        assert_eq!(meta["id"], MetadataValue::from(CONTAINER_ID));
        assert!(meta["frames"].is_structured());
    }

    #[test]
    fn repeated_loads_get_new_namespaces() {
        let mut scene = Scene::new();
        let options = NamespaceOptions::default();
        let namespaces: Vec<String> = (0..3)
            .map(|_| {
                containerise(&mut scene, "bar", "bar", &options, &data())
                    .unwrap()
                    .namespace
            })
            .collect();
        assert_eq!(namespaces, vec!["bar01", "bar02", "bar03"]);
    }

    #[test]
    fn scoped_bases_take_their_slot() {
        let options = NamespaceOptions::default();
        for (base, expected) in [
            (":bar", [":bar01", ":bar02"]),
            ("a:bar", ["a:bar01", "a:bar02"]),
            (":a:bar:", [":a:bar01:", ":a:bar02:"]),
            ("hero_", ["hero_01", "hero_02"]),
        ] {
            let mut scene = Scene::new();
            let first = containerise(&mut scene, "bar", base, &options, &data()).unwrap();
            let second = containerise(&mut scene, "bar", base, &options, &data()).unwrap();

            assert_eq!([first.namespace.as_str(), second.namespace.as_str()], expected);
            assert_ne!(first.node_name, second.node_name);
            assert_eq!(scene.find_node_by_name(&second.node_name), Some(second.node));
        }
    }

    #[test]
    fn exhaustion_propagates() {
        let mut scene = Scene::new();
        let options = NamespaceOptions {
            max_iterations: Some(1),
            ..Default::default()
        };
        containerise(&mut scene, "bar", "bar", &options, &data()).unwrap();
        let err = containerise(&mut scene, "bar", "bar", &options, &data()).unwrap_err();
        assert!(matches!(
            err,
            ContainerError::Namespace(NamespaceError::Exhausted { .. })
        ));
    }

    #[test]
    fn ls_finds_only_containers() {
        let mut scene = Scene::new();
        let options = NamespaceOptions::default();
        containerise(&mut scene, "a", "a", &options, &data()).unwrap();
        containerise(&mut scene, "b", "b", &options, &data()).unwrap();
        scene.add_node("plain", None);

        let found = ls(&scene);
        let names: Vec<_> = found
            .iter()
            .map(|m| m["instance_node"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a01:aCON", "b01:bCON"]);
    }
}
