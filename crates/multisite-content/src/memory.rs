//! In-memory content repository.
//!
//! Provides [`MemoryRepository`], a content tree held entirely in memory. Used
//! as the fake data store in tests and, loaded from a YAML tree file, as the
//! repository behind the CLI.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::node::{NodeId, NodeRef, normalize_path};
use crate::repository::{ContentError, ContentErrorKind, ContentRepository};

const BACKEND: &str = "Memory";

#[derive(Debug)]
struct Node {
    id: NodeId,
    database: String,
    path: String,
    template: Option<String>,
    parent: Option<NodeId>,
}

impl Node {
    fn to_ref(&self) -> NodeRef {
        NodeRef {
            id: self.id,
            database: self.database.clone(),
            path: self.path.clone(),
            template: self.template.clone(),
        }
    }
}

/// Nodes keyed by id, plus a `(database, normalized path)` index.
#[derive(Debug, Default)]
struct Tree {
    nodes: HashMap<NodeId, Node>,
    by_path: HashMap<(String, String), NodeId>,
}

impl Tree {
    fn key(database: &str, path: &str) -> (String, String) {
        (database.to_lowercase(), normalize_path(path))
    }

    fn get_by_path(&self, database: &str, path: &str) -> Option<&Node> {
        self.by_path
            .get(&Self::key(database, path))
            .and_then(|id| self.nodes.get(id))
    }

    fn add(&mut self, node: Node) -> NodeId {
        let id = node.id;
        self.by_path
            .insert(Self::key(&node.database, &node.path), id);
        self.nodes.insert(id, node);
        id
    }

    /// Make sure every node along `path` exists, creating missing ones.
    fn ensure_path(&mut self, database: &str, path: &str) -> NodeId {
        let mut parent = match self.get_by_path(database, "/") {
            Some(root) => root.id,
            None => self.add(Node {
                id: NodeId::new(),
                database: database.to_owned(),
                path: "/".to_owned(),
                template: None,
                parent: None,
            }),
        };

        let mut current = String::new();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current.push('/');
            current.push_str(segment);

            parent = match self.get_by_path(database, &current) {
                Some(existing) => existing.id,
                None => self.add(Node {
                    id: NodeId::new(),
                    database: database.to_owned(),
                    path: current.clone(),
                    template: None,
                    parent: Some(parent),
                }),
            };
        }

        parent
    }

    fn remove_subtree(&mut self, id: NodeId) {
        let children: Vec<NodeId> = self
            .nodes
            .values()
            .filter(|n| n.parent == Some(id))
            .map(|n| n.id)
            .collect();
        for child in children {
            self.remove_subtree(child);
        }
        if let Some(node) = self.nodes.remove(&id) {
            self.by_path.remove(&Self::key(&node.database, &node.path));
        }
    }
}

/// Content tree held in memory.
///
/// Nodes are created with the builder methods; missing ancestors are created
/// on the fly, so `with_node("web", "/sitecore/content/alpha")` also creates
/// `/sitecore` and `/sitecore/content`.
///
/// # Example
///
/// ```
/// use multisite_content::{ContentRepository, MemoryRepository};
///
/// let repository = MemoryRepository::new()
///     .with_template_node("web", "/sitecore/content/alpha", "Site")
///     .with_node("web", "/sitecore/content/alpha/home");
///
/// let root = repository.resolve_path("web", "/sitecore/content/alpha").unwrap().unwrap();
/// assert_eq!(root.template.as_deref(), Some("Site"));
/// ```
#[derive(Debug, Default)]
pub struct MemoryRepository {
    tree: RwLock<Tree>,
}

impl MemoryRepository {
    /// Create a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an empty database.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_database(self, database: &str) -> Self {
        self.tree.write().unwrap().ensure_path(database, "/");
        self
    }

    /// Add a node (and any missing ancestors).
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_node(self, database: &str, path: &str) -> Self {
        self.insert(database, path, None);
        self
    }

    /// Add a node created from `template` (and any missing ancestors).
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_template_node(self, database: &str, path: &str, template: &str) -> Self {
        self.insert(database, path, Some(template));
        self
    }

    /// Insert a node, creating missing ancestors.
    ///
    /// Inserting an existing path returns the existing node; a given
    /// `template` replaces the stored one.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn insert(&self, database: &str, path: &str, template: Option<&str>) -> NodeRef {
        let mut tree = self.tree.write().unwrap();
        let id = tree.ensure_path(database, path);
        if let (Some(template), Some(node)) = (template, tree.nodes.get_mut(&id)) {
            node.template = Some(template.to_owned());
        }
        tree.nodes[&id].to_ref()
    }

    /// Insert a node with a fixed identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ContentErrorKind::AlreadyExists`] if the identifier or the path
    /// is already taken.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn insert_with_id(
        &self,
        database: &str,
        path: &str,
        id: NodeId,
        template: Option<&str>,
    ) -> Result<NodeRef, ContentError> {
        let mut tree = self.tree.write().unwrap();

        if tree.nodes.contains_key(&id) || tree.get_by_path(database, path).is_some() {
            return Err(ContentError::new(ContentErrorKind::AlreadyExists)
                .with_backend(BACKEND)
                .with_database(database)
                .with_location(path));
        }

        if normalize_path(path) == "/" {
            return Err(ContentError::new(ContentErrorKind::InvalidPath)
                .with_backend(BACKEND)
                .with_database(database)
                .with_location(path));
        }

        // Keep the caller's casing for the stored path.
        let display_path = format!(
            "/{}",
            path.split('/')
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join("/")
        );
        let display_parent = display_path
            .rsplit_once('/')
            .map_or("", |(parent, _)| parent);
        let parent = tree.ensure_path(database, display_parent);

        tree.add(Node {
            id,
            database: database.to_owned(),
            path: display_path,
            template: template.map(str::to_owned),
            parent: Some(parent),
        });

        Ok(tree.nodes[&id].to_ref())
    }

    /// Remove the node at `path` together with its descendants.
    ///
    /// Returns `false` if no node exists at that path.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn remove(&self, database: &str, path: &str) -> bool {
        let mut tree = self.tree.write().unwrap();
        let Some(id) = tree.get_by_path(database, path).map(|n| n.id) else {
            return false;
        };
        tree.remove_subtree(id);
        tracing::debug!(database, path, "Removed content subtree");
        true
    }

    /// Number of nodes across all databases, database roots included.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.read().unwrap().nodes.len()
    }

    /// True if no database has been created.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ContentRepository for MemoryRepository {
    fn resolve_path(&self, database: &str, path: &str) -> Result<Option<NodeRef>, ContentError> {
        let tree = self.tree.read().unwrap();
        Ok(tree.get_by_path(database, path).map(Node::to_ref))
    }

    fn is_ancestor_or_self(&self, root: &NodeRef, item: &NodeRef) -> bool {
        if !root.database.eq_ignore_ascii_case(&item.database) {
            return false;
        }

        let tree = self.tree.read().unwrap();
        if !tree.nodes.contains_key(&root.id) {
            return false;
        }

        let mut current = tree.nodes.get(&item.id);
        while let Some(node) = current {
            if node.id == root.id {
                return true;
            }
            current = node.parent.and_then(|p| tree.nodes.get(&p));
        }
        false
    }

    fn lookup(&self, id: NodeId) -> Result<NodeRef, ContentError> {
        self.tree
            .read()
            .unwrap()
            .nodes
            .get(&id)
            .map(Node::to_ref)
            .ok_or_else(|| ContentError::node_not_found(id).with_backend(BACKEND))
    }
}
