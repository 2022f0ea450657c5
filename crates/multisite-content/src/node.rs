//! Node identity handles.
//!
//! # Path Convention
//!
//! Content paths are absolute, slash-separated and case-insensitive:
//! - `"/"` - the database root
//! - `"/sitecore/content"` - nested node
//! - `"/sitecore/content/alpha/"` - same node as without the trailing slash
//!
//! [`normalize_path`] produces the canonical lookup form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier of a content node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(Uuid);

impl NodeId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.0.hyphenated())
    }
}

impl FromStr for NodeId {
    type Err = uuid::Error;

    /// Accepts both bare and brace-wrapped UUIDs.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('{').trim_end_matches('}');
        Uuid::parse_str(trimmed).map(Self)
    }
}

/// Reference to a node in a content database.
///
/// A `NodeRef` is an identity handle, not an owner of the subtree below it.
/// Two references are equal when they point at the same node in the same
/// database; `path` and `template` are descriptive and do not take part in
/// equality.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeRef {
    /// Node identifier.
    pub id: NodeId,
    /// Database the node lives in (e.g., "web", "master").
    pub database: String,
    /// Absolute path as stored (e.g., "/sitecore/content/alpha").
    pub path: String,
    /// Template name the node was created from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.database.eq_ignore_ascii_case(&other.database)
    }
}

impl Eq for NodeRef {}

impl NodeRef {
    /// Number of path segments below the database root.
    ///
    /// `"/"` has depth 0, `"/sitecore/content"` has depth 2.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.path.split('/').filter(|s| !s.is_empty()).count()
    }

    /// Last path segment, empty for the database root.
    #[must_use]
    pub fn name(&self) -> &str {
        self.path
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
    }
}

/// Canonical lookup form of a content path.
///
/// Lowercases, collapses repeated slashes, drops the trailing slash, and
/// guarantees a leading slash.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let segments: Vec<String> = path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
        .collect();
    format!("/{}", segments.join("/"))
}
