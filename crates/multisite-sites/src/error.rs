//! Site configuration errors.

use multisite_content::ContentError;

/// A site configuration that must not be served.
///
/// Raised while building the definition list; the whole list is unavailable
/// until the configuration is fixed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    /// Neither `target_host_name` nor `host_name` is set.
    #[error("no effective hostname for site `{site}`")]
    MissingHostName {
        /// Site name.
        site: String,
    },
    /// Effective hostname contains a wildcard marker.
    #[error("wildcard hostnames are not permitted (site `{site}` uses `{host}`)")]
    WildcardHostName {
        /// Site name.
        site: String,
        /// Offending hostname.
        host: String,
    },
    /// Effective hostname is not a bare domain name or IP address.
    #[error("invalid hostname `{host}` for site `{site}`: expected a domain name or IP address without scheme, port or path")]
    InvalidHostName {
        /// Site name.
        site: String,
        /// Offending hostname.
        host: String,
    },
    /// Content repository failed while resolving the site root.
    #[error("failed to resolve root of site `{site}`: {source}")]
    Repository {
        /// Site name.
        site: String,
        /// Backend error.
        #[source]
        source: ContentError,
    },
}

impl ConfigurationError {
    /// Name of the site the error refers to.
    #[must_use]
    pub fn site(&self) -> &str {
        match self {
            Self::MissingHostName { site }
            | Self::WildcardHostName { site, .. }
            | Self::InvalidHostName { site, .. }
            | Self::Repository { site, .. } => site,
        }
    }
}
