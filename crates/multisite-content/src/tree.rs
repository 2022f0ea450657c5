//! YAML content tree loading.
//!
//! A tree file lists databases and their nested nodes:
//!
//! ```yaml
//! databases:
//!   web:
//!     - name: sitecore
//!       children:
//!         - name: content
//!           children:
//!             - name: alpha
//!               template: Site
//!               id: "{5a6f1c2e-0d7b-4a43-9d1e-3f8e6c0b2a11}"
//!               children:
//!                 - name: home
//! ```
//!
//! Nodes without an `id` get a random one.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::memory::MemoryRepository;
use crate::node::NodeId;
use crate::repository::{ContentError, ContentErrorKind};

#[derive(Debug, Deserialize)]
struct TreeFile {
    #[serde(default)]
    databases: BTreeMap<String, Vec<TreeNode>>,
}

#[derive(Debug, Deserialize)]
struct TreeNode {
    name: String,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    template: Option<String>,
    #[serde(default)]
    children: Vec<TreeNode>,
}

impl MemoryRepository {
    /// Load a repository from a YAML tree file.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError`] if the file cannot be read or is not a valid tree.
    pub fn load(path: &Path) -> Result<Self, ContentError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ContentError::io(e, Some(path.to_path_buf())))?;
        let repository = Self::from_yaml_str(&content)
            .map_err(|e| e.with_location(path.display().to_string()))?;
        tracing::info!(path = %path.display(), nodes = repository.len(), "Loaded content tree");
        Ok(repository)
    }

    /// Build a repository from YAML tree source.
    ///
    /// # Errors
    ///
    /// Returns [`ContentErrorKind::InvalidData`] on malformed YAML, bad ids or
    /// node names containing `/`, and [`ContentErrorKind::AlreadyExists`] on
    /// duplicate ids or sibling names.
    pub fn from_yaml_str(source: &str) -> Result<Self, ContentError> {
        let file: TreeFile = serde_yaml::from_str(source).map_err(|e| {
            ContentError::new(ContentErrorKind::InvalidData)
                .with_backend("Yaml")
                .with_source(e)
        })?;

        let repository = Self::new();
        for (database, nodes) in &file.databases {
            repository.insert(database, "/", None);
            for node in nodes {
                add_node(&repository, database, "", node)?;
            }
        }
        Ok(repository)
    }
}

fn add_node(
    repository: &MemoryRepository,
    database: &str,
    parent_path: &str,
    node: &TreeNode,
) -> Result<(), ContentError> {
    if node.name.is_empty() || node.name.contains('/') {
        return Err(ContentError::new(ContentErrorKind::InvalidData)
            .with_backend("Yaml")
            .with_database(database)
            .with_location(format!("{parent_path}/{}", node.name)));
    }

    let path = format!("{parent_path}/{}", node.name);
    let id = match &node.id {
        Some(raw) => raw.parse::<NodeId>().map_err(|e| {
            ContentError::new(ContentErrorKind::InvalidData)
                .with_backend("Yaml")
                .with_database(database)
                .with_location(path.clone())
                .with_source(e)
        })?,
        None => NodeId::new(),
    };

    repository.insert_with_id(database, &path, id, node.template.as_deref())?;

    for child in &node.children {
        add_node(repository, database, &path, child)?;
    }
    Ok(())
}
