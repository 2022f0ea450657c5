//! `multisite resolve` command implementation.

use clap::Args;
use multisite_content::ContentRepository;
use multisite_sites::ContextSiteResult;

use super::{Session, SharedArgs};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the resolve command.
#[derive(Args, Debug)]
pub(crate) struct ResolveArgs {
    /// Path of the content item (e.g., /sitecore/content/alpha/home).
    item_path: String,

    /// Name of the site serving the request.
    #[arg(long)]
    current: String,

    /// Database of the item (default: the current site's database).
    #[arg(short, long)]
    database: Option<String>,

    /// Print the result as JSON.
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    pub shared: SharedArgs,
}

impl ResolveArgs {
    /// Execute the resolve command.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails, the current site or the item is
    /// unknown, or any site is misconfigured.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let session = self.shared.open()?;
        let result = self.resolve(&session)?;

        if self.json {
            output.print(&serde_json::to_string_pretty(&result)?);
            return Ok(());
        }

        let relation = if result.is_current {
            "current site"
        } else {
            "other site"
        };
        output.entry(
            result.definition.name(),
            &format!("{} ({relation})", result.definition.host_name()),
        );
        Ok(())
    }

    /// Find the owning site for the item.
    fn resolve(&self, session: &Session) -> Result<ContextSiteResult, CliError> {
        let current = session
            .provider
            .site_definition(&self.current)?
            .ok_or_else(|| CliError::Validation(format!("Unknown site: {}", self.current)))?;

        let database = self
            .database
            .as_deref()
            .unwrap_or(current.root_item().database.as_str());
        let item = session
            .repository
            .resolve_path(database, &self.item_path)?
            .ok_or_else(|| {
                CliError::Validation(format!("Item not found: {database}:{}", self.item_path))
            })?;

        Ok(session.provider.context_site_definition(&item, &current)?)
    }
}
