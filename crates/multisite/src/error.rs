//! CLI error types.

use multisite_config::ConfigError;
use multisite_content::ContentError;
use multisite_sites::ConfigurationError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Content(#[from] ContentError),

    #[error("Invalid site configuration: {0}")]
    Sites(#[from] ConfigurationError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Validation(String),
}
