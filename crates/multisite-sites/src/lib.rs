//! Site definition validation and context resolution.
//!
//! This crate provides:
//! - [`ConfigValidator`]: turns one [`RawSiteConfig`] into a [`SiteDefinition`]
//! - [`SiteDefinitionsProvider`]: the queryable set of definitions, and the
//!   owning site for a content item
//!
//! # Quick Start
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use multisite_content::{ContentRepository, MemoryRepository};
//! use multisite_sites::{RawSiteConfig, SiteDefinitionsProvider};
//!
//! let repository = Arc::new(
//!     MemoryRepository::new()
//!         .with_node("web", "/sitecore/content/alpha/home")
//!         .with_node("web", "/sitecore/content/beta"),
//! );
//! let configs = vec![
//!     RawSiteConfig::new("alpha", "/sitecore/content/alpha", "web").with_host_name("alpha.test"),
//!     RawSiteConfig::new("beta", "/sitecore/content/beta", "web").with_host_name("beta.test"),
//! ];
//! let provider = SiteDefinitionsProvider::new(configs, repository.clone());
//!
//! let definitions = provider.site_definitions()?;
//! let home = repository.resolve_path("web", "/sitecore/content/alpha/home")?.unwrap();
//!
//! // Hierarchy wins over the current site.
//! let result = provider.context_site_definition(&home, &definitions[1])?;
//! assert_eq!(result.definition.name(), "alpha");
//! assert!(!result.is_current);
//! # Ok(())
//! # }
//! ```

mod definition;
mod error;
mod provider;
mod validator;

pub use definition::{ContextSiteResult, RawSiteConfig, SiteDefinition};
pub use error::ConfigurationError;
pub use provider::{ProviderSettings, SiteDefinitionsProvider};
pub use validator::{ConfigValidator, ValidatorSettings, effective_host_name};
