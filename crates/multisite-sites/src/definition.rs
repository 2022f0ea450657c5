//! Site configuration records and validated definitions.

use multisite_content::NodeRef;
use serde::{Deserialize, Serialize};

/// One site as written in configuration, before validation.
///
/// Produced by configuration loading. Nothing here is checked yet; see
/// [`ConfigValidator`](crate::ConfigValidator) for the rules.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSiteConfig {
    /// Site name (e.g., "alpha"). Not required to be unique.
    pub name: String,
    /// Path of the site's root node (e.g., "/sitecore/content/alpha").
    pub root_path: String,
    /// Literal public hostname.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_name: Option<String>,
    /// Hostname override, wins over `host_name` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_host_name: Option<String>,
    /// Content database the root path resolves against.
    pub database: String,
}

impl RawSiteConfig {
    /// Create a record without any hostname.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        root_path: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            root_path: root_path.into(),
            host_name: None,
            target_host_name: None,
            database: database.into(),
        }
    }

    /// Set the public hostname.
    #[must_use]
    pub fn with_host_name(mut self, host_name: impl Into<String>) -> Self {
        self.host_name = Some(host_name.into());
        self
    }

    /// Set the hostname override.
    #[must_use]
    pub fn with_target_host_name(mut self, target_host_name: impl Into<String>) -> Self {
        self.target_host_name = Some(target_host_name.into());
        self
    }
}

/// Validated routing record mapping a hostname to a content root.
///
/// Only [`ConfigValidator`](crate::ConfigValidator) builds these, so every
/// instance has a resolved root and an exact (non-wildcard) hostname.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SiteDefinition {
    name: String,
    host_name: String,
    root_item: NodeRef,
}

impl SiteDefinition {
    pub(crate) fn new(name: String, host_name: String, root_item: NodeRef) -> Self {
        Self {
            name,
            host_name,
            root_item,
        }
    }

    /// Site name, copied from configuration.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Effective hostname (target hostname if set, otherwise hostname).
    #[must_use]
    pub fn host_name(&self) -> &str {
        &self.host_name
    }

    /// Root node of the site's content subtree.
    #[must_use]
    pub fn root_item(&self) -> &NodeRef {
        &self.root_item
    }
}

/// Owning site for a content item, as seen from one request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ContextSiteResult {
    /// Site that owns the item.
    pub definition: SiteDefinition,
    /// True if `definition` is the request's current site.
    pub is_current: bool,
}
