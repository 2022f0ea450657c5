//! Configuration management for multisite.
//!
//! Parses `multisite.toml` files with serde and provides auto-discovery of
//! the config file in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! Site values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields (per `[[site]]` entry):
//! - `root_path`
//! - `host_name`
//! - `target_host_name`
//! - `database`
//!
//! Hostname rules (missing, wildcard or malformed hosts) are not checked here. They are
//! reported by the provider when the definition list is built.

mod expand;

use std::path::{Path, PathBuf};

use multisite_sites::{ProviderSettings, RawSiteConfig};
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override content tree file.
    pub tree: Option<PathBuf>,
    /// Override cache enabled flag.
    pub cache_enabled: Option<bool>,
    /// Override required site template.
    pub site_template: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "multisite.toml";

/// Default content tree filename, relative to the config directory.
const DEFAULT_TREE: &str = "content.yaml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Content configuration (paths are relative strings from TOML).
    content: ContentConfigRaw,
    /// Provider configuration.
    pub provider: ProviderConfig,
    /// Site records in file order.
    #[serde(rename = "site")]
    pub sites: Vec<RawSiteConfig>,

    /// Resolved content configuration (set after loading).
    #[serde(skip)]
    pub content_resolved: ContentConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw content configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ContentConfigRaw {
    tree: Option<String>,
}

/// Resolved content configuration with absolute paths.
#[derive(Debug, Default)]
pub struct ContentConfig {
    /// YAML content tree file.
    pub tree: PathBuf,
}

/// Provider configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Keep validated definitions between calls.
    pub cache_enabled: bool,
    /// Template every site root must be created from.
    pub site_template: Option<String>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`site[0].host_name`").
        field: String,
        /// Error message (e.g., "${`ALPHA_HOST`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `multisite.toml` in current directory and parents.
    /// Without any file the configuration has no sites.
    ///
    /// CLI settings are applied after loading and path resolution.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// an environment variable is missing or a site entry is malformed.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            tracing::debug!("No {CONFIG_FILENAME} found, using defaults");
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Settings for [`multisite_sites::SiteDefinitionsProvider`].
    #[must_use]
    pub fn provider_settings(&self) -> ProviderSettings {
        ProviderSettings {
            cache_enabled: self.provider.cache_enabled,
            site_template: self.provider.site_template.clone(),
        }
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(tree) = &settings.tree {
            self.content_resolved.tree.clone_from(tree);
        }
        if let Some(cache_enabled) = settings.cache_enabled {
            self.provider.cache_enabled = cache_enabled;
        }
        if let Some(site_template) = &settings.site_template {
            self.provider.site_template = Some(site_template.clone());
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            content: ContentConfigRaw::default(),
            provider: ProviderConfig::default(),
            sites: Vec::new(),
            content_resolved: ContentConfig {
                tree: base.join(DEFAULT_TREE),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        tracing::debug!(
            path = %path.display(),
            sites = config.sites.len(),
            "Loaded configuration"
        );

        Ok(config)
    }

    /// Validate the shape of the site entries.
    ///
    /// Called automatically after loading from file. Duplicate names are
    /// allowed; the first match wins on lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if a site has no name, root path or
    /// database.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (index, site) in self.sites.iter().enumerate() {
            require_non_empty(&site.name, &format!("site[{index}].name"))?;
            require_non_empty(&site.root_path, &format!("site[{index}].root_path"))?;
            require_non_empty(&site.database, &format!("site[{index}].database"))?;
        }
        if let Some(template) = &self.provider.site_template {
            require_non_empty(template, "provider.site_template")?;
        }
        Ok(())
    }

    /// Expand environment variable references in site values.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        for (index, site) in self.sites.iter_mut().enumerate() {
            let field = |name: &str| format!("site[{index}].{name}");

            site.root_path = expand::expand_env(&site.root_path, &field("root_path"))?;
            site.database = expand::expand_env(&site.database, &field("database"))?;
            if let Some(host) = &site.host_name {
                site.host_name = Some(expand::expand_env(host, &field("host_name"))?);
            }
            if let Some(target) = &site.target_host_name {
                site.target_host_name =
                    Some(expand::expand_env(target, &field("target_host_name"))?);
            }
        }
        Ok(())
    }

    /// Resolve relative paths against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.content_resolved = ContentConfig {
            tree: config_dir.join(self.content.tree.as_deref().unwrap_or(DEFAULT_TREE)),
        };
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;

    const SAMPLE: &str = r#"
[content]
tree = "tree/content.yaml"

[provider]
cache_enabled = true
site_template = "Site"

[[site]]
name = "alpha"
root_path = "/sitecore/content/alpha"
host_name = "alpha.test"
database = "web"

[[site]]
name = "beta"
root_path = "/sitecore/content/beta"
target_host_name = "www.beta.test"
database = "web"
"#;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join(CONFIG_FILENAME);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));

        assert_eq!(config.content_resolved.tree, PathBuf::from("/test/content.yaml"));
        assert!(!config.provider.cache_enabled);
        assert!(config.provider.site_template.is_none());
        assert!(config.sites.is_empty());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();

        assert!(config.sites.is_empty());
        assert!(!config.provider.cache_enabled);
    }

    #[test]
    fn test_parse_sites_in_order() {
        let config: Config = toml::from_str(SAMPLE).unwrap();

        assert_eq!(
            config.sites,
            vec![
                RawSiteConfig::new("alpha", "/sitecore/content/alpha", "web")
                    .with_host_name("alpha.test"),
                RawSiteConfig::new("beta", "/sitecore/content/beta", "web")
                    .with_target_host_name("www.beta.test"),
            ]
        );
    }

    #[test]
    fn test_parse_site_missing_database_fails() {
        let toml = r#"
[[site]]
name = "alpha"
root_path = "/sitecore/content/alpha"
"#;
        let result: Result<Config, _> = toml::from_str(toml);

        assert!(result.is_err());
    }

    #[test]
    fn test_load_resolves_tree_relative_to_config() {
        let temp = tempfile::tempdir().unwrap();
        let path = write_config(temp.path(), SAMPLE);

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(
            config.content_resolved.tree,
            temp.path().join("tree/content.yaml")
        );
        assert_eq!(config.config_path, Some(path));
        assert_eq!(config.sites.len(), 2);
    }

    #[test]
    fn test_load_default_tree() {
        let temp = tempfile::tempdir().unwrap();
        let path = write_config(temp.path(), "");

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.content_resolved.tree, temp.path().join("content.yaml"));
    }

    #[test]
    fn test_load_missing_file() {
        let temp = tempfile::tempdir().unwrap();

        let err = Config::load(Some(&temp.path().join("missing.toml")), None).unwrap_err();

        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp = tempfile::tempdir().unwrap();
        let path = write_config(temp.path(), "[[site]\nname = ");

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_expands_env_vars() {
        // SAFETY: variable names are unique to this test
        unsafe {
            std::env::set_var("MULTISITE_CONFIG_TEST_HOST", "alpha.example.com");
        }
        let temp = tempfile::tempdir().unwrap();
        let path = write_config(
            temp.path(),
            r#"
[[site]]
name = "alpha"
root_path = "/sitecore/content/alpha"
host_name = "${MULTISITE_CONFIG_TEST_HOST}"
target_host_name = "${MULTISITE_CONFIG_TEST_TARGET:-}"
database = "${MULTISITE_CONFIG_TEST_DB:-web}"
"#,
        );

        let config = Config::load(Some(&path), None).unwrap();

        let site = &config.sites[0];
        assert_eq!(site.host_name.as_deref(), Some("alpha.example.com"));
        assert_eq!(site.target_host_name.as_deref(), Some(""));
        assert_eq!(site.database, "web");
        unsafe {
            std::env::remove_var("MULTISITE_CONFIG_TEST_HOST");
        }
    }

    #[test]
    fn test_load_unset_env_var_errors() {
        let temp = tempfile::tempdir().unwrap();
        let path = write_config(
            temp.path(),
            r#"
[[site]]
name = "alpha"
root_path = "/sitecore/content/alpha"
host_name = "alpha.test"
database = "web"

[[site]]
name = "beta"
root_path = "${MULTISITE_CONFIG_TEST_UNSET_ROOT}"
database = "web"
"#,
        );

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { ref field, .. } if field == "site[1].root_path"));
    }

    #[test]
    fn test_load_empty_site_name_fails() {
        let temp = tempfile::tempdir().unwrap();
        let path = write_config(
            temp.path(),
            r#"
[[site]]
name = ""
root_path = "/sitecore/content/alpha"
database = "web"
"#,
        );

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("site[0].name"));
    }

    #[test]
    fn test_load_empty_database_fails() {
        let temp = tempfile::tempdir().unwrap();
        let path = write_config(
            temp.path(),
            r#"
[[site]]
name = "alpha"
root_path = "/sitecore/content/alpha"
host_name = "alpha.test"
database = "${MULTISITE_CONFIG_TEST_UNSET_DB:-}"
"#,
        );

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("site[0].database"));
    }

    #[test]
    fn test_load_keeps_hostname_problems_for_provider() {
        let temp = tempfile::tempdir().unwrap();
        let path = write_config(
            temp.path(),
            r#"
[[site]]
name = "wild"
root_path = "/sitecore/content/wild"
host_name = "*.wild.test"
database = "web"
"#,
        );

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.sites[0].host_name.as_deref(), Some("*.wild.test"));
    }

    #[test]
    fn test_provider_settings() {
        let config: Config = toml::from_str(SAMPLE).unwrap();

        let settings = config.provider_settings();

        assert!(settings.cache_enabled);
        assert_eq!(settings.site_template.as_deref(), Some("Site"));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            tree: Some(PathBuf::from("/custom/tree.yaml")),
            cache_enabled: Some(true),
            site_template: Some("Site".to_owned()),
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.content_resolved.tree, PathBuf::from("/custom/tree.yaml"));
        assert!(config.provider.cache_enabled);
        assert_eq!(config.provider.site_template.as_deref(), Some("Site"));
    }

    #[test]
    fn test_apply_cli_settings_empty_keeps_values() {
        let temp = tempfile::tempdir().unwrap();
        let path = write_config(temp.path(), SAMPLE);

        let config = Config::load(Some(&path), Some(&CliSettings::default())).unwrap();

        assert!(config.provider.cache_enabled);
        assert_eq!(
            config.content_resolved.tree,
            temp.path().join("tree/content.yaml")
        );
    }
}
