//! Content repository abstraction for multisite resolution.
//!
//! This crate provides a [`ContentRepository`] trait for locating nodes in a
//! content hierarchy and testing containment between them. Site resolution only
//! ever talks to the hierarchy through this trait, which keeps it independent
//! of where the content actually lives.
//!
//! # Architecture
//!
//! The crate provides:
//! - [`ContentRepository`] trait with `resolve_path()`, `is_ancestor_or_self()`,
//!   and `lookup()` methods
//! - [`NodeRef`] identity handles returned by the repository
//! - [`MemoryRepository`], an in-memory tree with a builder API, loadable from
//!   a YAML tree file
//!
//! # Example
//!
//! ```
//! use multisite_content::{ContentRepository, MemoryRepository};
//!
//! let repository = MemoryRepository::new()
//!     .with_node("web", "/sitecore/content/alpha/home");
//!
//! let root = repository.resolve_path("web", "/sitecore/content/alpha").unwrap().unwrap();
//! let home = repository.resolve_path("web", "/sitecore/content/alpha/home").unwrap().unwrap();
//! assert!(repository.is_ancestor_or_self(&root, &home));
//! ```

mod memory;
mod node;
mod repository;
mod tree;

pub use memory::MemoryRepository;
pub use node::{NodeId, NodeRef, normalize_path};
pub use repository::{ContentError, ContentErrorKind, ContentRepository};
