//! core::namespace
//!
//! Unique namespace allocation for loaded containers.
//!
//! # Namespaces
//!
//! A namespace is a colon-delimited path such as `:a:bar01:`. A leading `:`
//! makes it absolute. Only the last segment is numbered; parent segments
//! are carried through verbatim.
//!
//! # Allocation
//!
//! For a base such as `bar`, candidates `bar01`, `bar02`, ... are tried in
//! order. A candidate is taken when the scene already holds its master
//! container, named `"{candidate}:{base}{container_suffix}"`
//! (e.g. `bar01:barCON`). The first free candidate wins.
//!
//! # Concurrency
//!
//! Allocation reads the scene and decides; it reserves nothing. Two callers
//! that allocate before either creates its master container can receive the
//! same namespace. Callers that may race must serialize allocation and
//! container creation themselves.
//!
//! # Example
//!
//! ```
//! use containerkit::core::namespace::{allocate, NamespaceOptions};
//! use containerkit::host::Scene;
//!
//! let mut scene = Scene::new();
//! scene.add_node("bar01:barCON", None);
//!
//! let options = NamespaceOptions::default();
//! assert_eq!(allocate(&scene, "bar", &options).unwrap(), "bar02");
//! assert_eq!(allocate(&scene, ":hello", &options).unwrap(), ":hello01");
//! ```

use thiserror::Error;

use crate::core::types::NumberFormat;
use crate::host::{Host, NodeGraph};

/// Default suffix of master container names.
pub const DEFAULT_CONTAINER_SUFFIX: &str = "CON";

/// Namespace delimiter.
pub const SEPARATOR: char = ':';

/// Errors from namespace operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NamespaceError {
    /// The master container to read from does not exist.
    #[error("master container not found: {0}")]
    ContainerNotFound(String),

    /// Every candidate up to the configured cap is taken.
    #[error("no free namespace for '{base}' after {attempts} attempts")]
    Exhausted { base: String, attempts: u32 },
}

/// Options controlling candidate names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceOptions {
    /// Rendering of the iteration number.
    pub format: NumberFormat,
    /// Text placed before each candidate.
    pub prefix: String,
    /// Text placed after each candidate.
    pub suffix: String,
    /// Suffix of the master container name probed for collisions.
    pub container_suffix: String,
    /// Give up after this many candidates. `None` searches without bound.
    pub max_iterations: Option<u32>,
}

impl Default for NamespaceOptions {
    fn default() -> Self {
        Self {
            format: NumberFormat::default(),
            prefix: String::new(),
            suffix: String::new(),
            container_suffix: DEFAULT_CONTAINER_SUFFIX.to_string(),
            max_iterations: None,
        }
    }
}

/// A base namespace split into the parts allocation works with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceScope {
    /// Whether the base started with `:`.
    pub is_absolute: bool,
    /// Scope the namespace is created in, always ending in `:`.
    pub root: String,
    /// Text restored in front of the result: a leading `:` plus parents.
    pub start: String,
    /// `:` when the base ended with one, otherwise empty.
    pub end: String,
    /// The segment that gets numbered.
    pub leaf: String,
}

impl NamespaceScope {
    /// Split `base` into its scope parts.
    ///
    /// # Example
    ///
    /// ```
    /// use containerkit::core::namespace::NamespaceScope;
    ///
    /// let scope = NamespaceScope::parse(":a:x");
    /// assert!(scope.is_absolute);
    /// assert_eq!(scope.start, ":a:");
    /// assert_eq!(scope.leaf, "x");
    /// assert_eq!(scope.root, "::a:");
    /// ```
    pub fn parse(base: &str) -> Self {
        let is_absolute = base.starts_with(SEPARATOR);

        let mut root = if is_absolute {
            SEPARATOR.to_string()
        } else if base.ends_with(SEPARATOR) {
            base.to_string()
        } else {
            format!("{}{}", base, SEPARATOR)
        };

        let mut start = if is_absolute {
            SEPARATOR.to_string()
        } else {
            String::new()
        };
        let end = if base.ends_with(SEPARATOR) {
            SEPARATOR.to_string()
        } else {
            String::new()
        };

        let stripped = base.trim_matches(SEPARATOR);
        let leaf = match stripped.rsplit_once(SEPARATOR) {
            Some((parents, leaf)) => {
                start.push_str(parents);
                start.push(SEPARATOR);
                root.push_str(&start);
                leaf
            }
            None => stripped,
        };

        Self {
            is_absolute,
            root,
            start,
            end,
            leaf: leaf.to_string(),
        }
    }
}

/// Name of the master container probed for a candidate namespace.
///
/// ```
/// use containerkit::core::namespace::master_container_name;
///
/// assert_eq!(master_container_name("bar01", "bar", "CON"), "bar01:barCON");
/// ```
pub fn master_container_name(unique: &str, leaf: &str, container_suffix: &str) -> String {
    format!("{}{}{}{}", unique, SEPARATOR, leaf, container_suffix)
}

/// A free namespace together with the master container name that was
/// probed for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    /// Namespace to create, with the base's scope restored around it.
    pub namespace: String,
    /// Master container name checked for this namespace. Creating a node
    /// with this name takes the slot for later allocations.
    pub master_container: String,
}

/// Find the first free namespace for `base`.
///
/// Candidates are `prefix + leaf + format(n) + suffix` for n = 1, 2, ...;
/// the result restores the base's leading `:`, parent segments and
/// trailing `:` around the winning candidate.
///
/// # Errors
///
/// [`NamespaceError::Exhausted`] when `max_iterations` is set and every
/// candidate up to it is taken. Without a cap the search does not give up.
#[doc(alias = "unique_namespace")]
pub fn allocate<G: NodeGraph + ?Sized>(
    graph: &G,
    base: &str,
    options: &NamespaceOptions,
) -> Result<String, NamespaceError> {
    allocate_master(graph, base, options).map(|allocation| allocation.namespace)
}

/// Like [`allocate`], also returning the master container name that
/// occupies the namespace.
///
/// ```
/// use containerkit::core::namespace::{allocate_master, NamespaceOptions};
/// use containerkit::host::Scene;
///
/// let scene = Scene::new();
/// let found = allocate_master(&scene, ":a:bar", &NamespaceOptions::default()).unwrap();
/// assert_eq!(found.namespace, ":a:bar01");
/// assert_eq!(found.master_container, "bar01:barCON");
/// ```
pub fn allocate_master<G: NodeGraph + ?Sized>(
    graph: &G,
    base: &str,
    options: &NamespaceOptions,
) -> Result<Allocation, NamespaceError> {
    let scope = NamespaceScope::parse(base);
    tracing::debug!(base, root = %scope.root, leaf = %scope.leaf, "allocating namespace");

    let mut iteration: u32 = 1;
    loop {
        if let Some(max) = options.max_iterations {
            if iteration > max {
                return Err(NamespaceError::Exhausted {
                    base: base.to_string(),
                    attempts: max,
                });
            }
        }

        let numbered = format!("{}{}", scope.leaf, options.format.render(iteration));
        let unique = format!("{}{}{}", options.prefix, numbered, options.suffix);
        let probe = master_container_name(&unique, &scope.leaf, &options.container_suffix);

        if graph.find_node_by_name(&probe).is_none() {
            let namespace = format!("{}{}{}", scope.start, unique, scope.end);
            tracing::debug!(namespace = %namespace, iteration, "namespace allocated");
            return Ok(Allocation {
                namespace,
                master_container: probe,
            });
        }

        tracing::debug!(probe = %probe, "namespace candidate taken");
        iteration = match iteration.checked_add(1) {
            Some(next) => next,
            None => {
                return Err(NamespaceError::Exhausted {
                    base: base.to_string(),
                    attempts: u32::MAX,
                })
            }
        };
    }
}

/// Namespace and name recorded on a master container.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubContainer {
    /// Raw `namespace` property.
    pub namespace: Option<String>,
    /// Raw `name` property.
    pub name: Option<String>,
}

/// Read the `namespace` and `name` properties of a master container.
///
/// Values are returned as stored, without metadata decoding.
///
/// # Errors
///
/// [`NamespaceError::ContainerNotFound`] when no node has that name.
pub fn get_namespace<H: Host + ?Sized>(
    host: &H,
    container_name: &str,
) -> Result<SubContainer, NamespaceError> {
    let node = host
        .find_node_by_name(container_name)
        .ok_or_else(|| NamespaceError::ContainerNotFound(container_name.to_string()))?;

    Ok(SubContainer {
        namespace: host.property(node, "namespace"),
        name: host.property(node, "name"),
    })
}
