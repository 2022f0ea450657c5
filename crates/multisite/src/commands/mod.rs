//! CLI command implementations.

pub(crate) mod resolve;
pub(crate) mod sites;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use multisite_config::{CliSettings, Config};
use multisite_content::MemoryRepository;
use multisite_sites::SiteDefinitionsProvider;

use crate::error::CliError;

pub(crate) use resolve::ResolveArgs;
pub(crate) use sites::SitesArgs;

/// Options shared by all commands.
#[derive(Args, Debug)]
pub(crate) struct SharedArgs {
    /// Path to configuration file (default: auto-discover multisite.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Content tree file (overrides config).
    #[arg(short, long)]
    tree: Option<PathBuf>,

    /// Template every site root must use (overrides config).
    #[arg(long)]
    site_template: Option<String>,

    /// Disable the definitions cache.
    #[arg(long)]
    no_cache: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Loaded content tree and provider for one command run.
pub(crate) struct Session {
    pub repository: Arc<MemoryRepository>,
    pub provider: SiteDefinitionsProvider,
}

impl SharedArgs {
    /// Load configuration and content tree, then build the provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration or the content tree cannot be loaded.
    pub(crate) fn open(&self) -> Result<Session, CliError> {
        let cli_settings = CliSettings {
            tree: self.tree.clone(),
            cache_enabled: self.no_cache.then_some(false),
            site_template: self.site_template.clone(),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let repository = Arc::new(MemoryRepository::load(&config.content_resolved.tree)?);
        tracing::info!(
            sites = config.sites.len(),
            tree = %config.content_resolved.tree.display(),
            "Configuration loaded"
        );

        let provider = SiteDefinitionsProvider::with_settings(
            config.sites.clone(),
            Arc::<MemoryRepository>::clone(&repository),
            &config.provider_settings(),
        );

        Ok(Session {
            repository,
            provider,
        })
    }
}
