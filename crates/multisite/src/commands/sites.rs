//! `multisite sites` command implementation.

use clap::Args;
use multisite_sites::SiteDefinition;

use super::SharedArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the sites command.
#[derive(Args, Debug)]
pub(crate) struct SitesArgs {
    #[command(flatten)]
    pub shared: SharedArgs,

    /// Print definitions as JSON.
    #[arg(long)]
    json: bool,
}

impl SitesArgs {
    /// Execute the sites command.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails or any site is misconfigured.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let definitions = self.shared.open()?.provider.site_definitions()?;

        if self.json {
            output.print(&serde_json::to_string_pretty(&definitions)?);
            return Ok(());
        }

        if definitions.is_empty() {
            output.warning("No servable sites configured");
            return Ok(());
        }

        for definition in &definitions {
            output.entry(definition.name(), &describe(definition));
        }

        Ok(())
    }
}

/// One-line summary of a definition: host and root location.
fn describe(definition: &SiteDefinition) -> String {
    let root = definition.root_item();
    format!("{} -> {}:{}", definition.host_name(), root.database, root.path)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::commands::fixtures::{shared_args, write_project};

    #[test]
    fn test_describe_definition() {
        let temp = tempfile::tempdir().unwrap();
        let session = shared_args(write_project(temp.path())).open().unwrap();

        let beta = session.provider.site_definition("beta").unwrap().unwrap();

        assert_eq!(describe(&beta), "www.beta.test -> web:/sitecore/content/beta");
    }

    #[test]
    fn test_execute_json() {
        let temp = tempfile::tempdir().unwrap();
        let args = SitesArgs {
            shared: shared_args(write_project(temp.path())),
            json: true,
        };

        args.execute().unwrap();
    }
}
