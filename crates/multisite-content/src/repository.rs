//! Repository trait and error types.
//!
//! Provides the core [`ContentRepository`] trait for locating content nodes,
//! along with [`ContentError`] for unified error handling across backends.

use std::path::PathBuf;

use crate::node::{NodeId, NodeRef};

/// Semantic error categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ContentErrorKind {
    /// Node or database does not exist.
    NotFound,
    /// Node already exists (for create operations).
    AlreadyExists,
    /// Invalid path or node name.
    InvalidPath,
    /// Content tree source could not be parsed.
    InvalidData,
    /// Backend is temporarily unavailable.
    Unavailable,
    /// Other/unknown error category.
    Other,
}

/// Content repository error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct ContentError {
    kind: ContentErrorKind,
    database: Option<String>,
    location: Option<String>,
    backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ContentError {
    /// Create a new content error.
    #[must_use]
    pub fn new(kind: ContentErrorKind) -> Self {
        Self {
            kind,
            database: None,
            location: None,
            backend: None,
            source: None,
        }
    }

    /// Attach database context.
    #[must_use]
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Attach location context (content path, node id or file path).
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Semantic error category.
    #[must_use]
    pub fn kind(&self) -> ContentErrorKind {
        self.kind
    }

    /// Database context, if attached.
    #[must_use]
    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    /// Location context, if attached.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Backend identifier, if attached.
    #[must_use]
    pub fn backend(&self) -> Option<&'static str> {
        self.backend
    }

    /// Create a not found error for a node id.
    #[must_use]
    pub fn node_not_found(id: NodeId) -> Self {
        Self::new(ContentErrorKind::NotFound).with_location(id.to_string())
    }

    /// Create a storage error from an I/O error while reading a tree source.
    #[must_use]
    pub fn io(err: std::io::Error, path: Option<PathBuf>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => ContentErrorKind::NotFound,
            std::io::ErrorKind::TimedOut => ContentErrorKind::Unavailable,
            _ => ContentErrorKind::Other,
        };
        let mut error = Self::new(kind).with_source(err);
        if let Some(p) = path {
            error = error.with_location(p.display().to_string());
        }
        error
    }
}

impl std::fmt::Display for ContentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (at web:/sitecore/content)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            ContentErrorKind::NotFound => "Not found",
            ContentErrorKind::AlreadyExists => "Already exists",
            ContentErrorKind::InvalidPath => "Invalid path",
            ContentErrorKind::InvalidData => "Invalid content tree",
            ContentErrorKind::Unavailable => "Unavailable",
            ContentErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        match (&self.database, &self.location) {
            (Some(db), Some(loc)) => write!(f, " (at {db}:{loc})")?,
            (Some(db), None) => write!(f, " (database: {db})")?,
            (None, Some(loc)) => write!(f, " (at {loc})")?,
            (None, None) => {}
        }

        Ok(())
    }
}

impl std::error::Error for ContentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Read access to a content hierarchy split into named databases.
///
/// Implementations must be safe for concurrent reads; site resolution calls
/// into the repository from whichever thread handles the request.
pub trait ContentRepository: Send + Sync {
    /// Locate the node at `path` in `database`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(node))` - a node exists at that path
    /// - `Ok(None)` - the database or the path does not exist
    ///
    /// # Errors
    ///
    /// Returns [`ContentError`] when the backend fails, never for a missing node.
    fn resolve_path(&self, database: &str, path: &str) -> Result<Option<NodeRef>, ContentError>;

    /// Check whether `root` is `item` or one of its ancestors.
    ///
    /// Nodes from different databases never contain each other. Returns
    /// `false` when either node is unknown to the repository.
    fn is_ancestor_or_self(&self, root: &NodeRef, item: &NodeRef) -> bool;

    /// Look up a node by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError`] with [`ContentErrorKind::NotFound`] if no node
    /// carries that identifier.
    fn lookup(&self, id: NodeId) -> Result<NodeRef, ContentError>;
}
