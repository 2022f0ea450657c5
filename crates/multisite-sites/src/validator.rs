//! Single-record validation.
//!
//! Rules, in order:
//! 1. The effective hostname is `target_host_name` if non-empty, otherwise
//!    `host_name` if non-empty, otherwise the record is rejected.
//! 2. The effective hostname must not contain a wildcard marker (`*`, `?`),
//!    and must be a bare domain name or IP literal: no scheme, port, path,
//!    whitespace or `|`-separated list.
//! 3. The root path must resolve in the record's database. If it does not, the
//!    record is skipped without error (content not provisioned yet).
//! 4. If a site template is required, a root node of another template is
//!    skipped the same way.
//!
//! Rules 1 and 2 run before the repository is touched, so a bad hostname is
//! reported even for a site whose content does not exist.

use multisite_content::ContentRepository;

use crate::definition::{RawSiteConfig, SiteDefinition};
use crate::error::ConfigurationError;

const WILDCARD_MARKERS: [char; 2] = ['*', '?'];

/// Validation options.
#[derive(Clone, Debug, Default)]
pub struct ValidatorSettings {
    /// Template the root node must be created from (compared ignoring case).
    ///
    /// If `None`, any node may be a site root.
    pub site_template: Option<String>,
}

/// Resolve the effective hostname of a record.
///
/// # Errors
///
/// Returns [`ConfigurationError::MissingHostName`] if neither hostname is set
/// to a non-blank value, [`ConfigurationError::WildcardHostName`] if the
/// chosen hostname contains `*` or `?`, and
/// [`ConfigurationError::InvalidHostName`] if it is not a bare host.
pub fn effective_host_name(config: &RawSiteConfig) -> Result<&str, ConfigurationError> {
    let host = non_blank(config.target_host_name.as_deref())
        .or_else(|| non_blank(config.host_name.as_deref()))
        .ok_or_else(|| ConfigurationError::MissingHostName {
            site: config.name.clone(),
        })?;

    if host.contains(WILDCARD_MARKERS) {
        return Err(ConfigurationError::WildcardHostName {
            site: config.name.clone(),
            host: host.to_owned(),
        });
    }

    if !is_bare_host(host) {
        return Err(ConfigurationError::InvalidHostName {
            site: config.name.clone(),
            host: host.to_owned(),
        });
    }

    Ok(host)
}

/// Domain name, IPv4 address or bracketed IPv6 address, without a port.
fn is_bare_host(host: &str) -> bool {
    !host.contains(|c: char| c.is_whitespace() || c == '|') && url::Host::parse(host).is_ok()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Turns raw site records into [`SiteDefinition`]s.
#[derive(Clone, Debug, Default)]
pub struct ConfigValidator {
    settings: ValidatorSettings,
}

impl ConfigValidator {
    /// Create a validator with the given settings.
    #[must_use]
    pub fn new(settings: ValidatorSettings) -> Self {
        Self { settings }
    }

    /// Validate one record against the repository.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(definition))` - the record is a servable site
    /// - `Ok(None)` - the root is missing (or of the wrong template); skip it
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] for hostname problems and repository
    /// failures.
    pub fn validate(
        &self,
        config: &RawSiteConfig,
        repository: &dyn ContentRepository,
    ) -> Result<Option<SiteDefinition>, ConfigurationError> {
        let host_name = effective_host_name(config)?;

        let root = repository
            .resolve_path(&config.database, &config.root_path)
            .map_err(|source| ConfigurationError::Repository {
                site: config.name.clone(),
                source,
            })?;

        let Some(root) = root else {
            tracing::debug!(
                site = %config.name,
                database = %config.database,
                root_path = %config.root_path,
                "Site root not found, skipping"
            );
            return Ok(None);
        };

        if let Some(required) = &self.settings.site_template {
            let matches = root
                .template
                .as_deref()
                .is_some_and(|t| t.eq_ignore_ascii_case(required));
            if !matches {
                tracing::debug!(
                    site = %config.name,
                    root_path = %config.root_path,
                    template = ?root.template,
                    required = %required,
                    "Site root is not a site template, skipping"
                );
                return Ok(None);
            }
        }

        Ok(Some(SiteDefinition::new(
            config.name.clone(),
            host_name.to_owned(),
            root,
        )))
    }
}

#[cfg(test)]
mod tests {
    use multisite_content::MemoryRepository;
    use pretty_assertions::assert_eq;

    use super::*;

    const ROOT: &str = "/sitecore/content/alpha";

    fn config() -> RawSiteConfig {
        RawSiteConfig::new("alpha", ROOT, "web")
    }

    fn repository() -> MemoryRepository {
        MemoryRepository::new().with_template_node("web", ROOT, "Site")
    }

    #[test]
    fn test_effective_host_name_prefers_target() {
        let config = config()
            .with_host_name("alpha.test")
            .with_target_host_name("www.alpha.test");

        assert_eq!(effective_host_name(&config).unwrap(), "www.alpha.test");
    }

    #[test]
    fn test_effective_host_name_falls_back_to_host() {
        let config = config().with_host_name("alpha.test");

        assert_eq!(effective_host_name(&config).unwrap(), "alpha.test");
    }

    #[test]
    fn test_effective_host_name_blank_target_falls_back() {
        let config = config()
            .with_host_name("alpha.test")
            .with_target_host_name("  ");

        assert_eq!(effective_host_name(&config).unwrap(), "alpha.test");
    }

    #[test]
    fn test_effective_host_name_missing() {
        let err = effective_host_name(&config()).unwrap_err();

        assert!(matches!(err, ConfigurationError::MissingHostName { .. }));
        assert_eq!(err.to_string(), "no effective hostname for site `alpha`");
    }

    #[test]
    fn test_effective_host_name_both_empty() {
        let config = config().with_host_name("").with_target_host_name("");

        let err = effective_host_name(&config).unwrap_err();

        assert!(matches!(err, ConfigurationError::MissingHostName { .. }));
    }

    #[test]
    fn test_effective_host_name_wildcard() {
        let config = config().with_host_name("*.test.com");

        let err = effective_host_name(&config).unwrap_err();

        assert!(matches!(err, ConfigurationError::WildcardHostName { .. }));
        assert!(err.to_string().contains("wildcard hostnames are not permitted"));
        assert!(err.to_string().contains("*.test.com"));
    }

    #[test]
    fn test_effective_host_name_question_mark_wildcard() {
        let config = config().with_target_host_name("alpha?.test");

        assert!(matches!(
            effective_host_name(&config),
            Err(ConfigurationError::WildcardHostName { .. })
        ));
    }

    #[test]
    fn test_effective_host_name_rejects_non_bare_hosts() {
        for host in [
            "alpha.test|beta.test",
            "alpha test",
            "http://alpha.test/",
            "alpha.test:8080",
            "alpha.test/home",
            "[::1]:8080",
        ] {
            let config = config().with_host_name(host);

            let err = effective_host_name(&config).unwrap_err();

            assert!(
                matches!(err, ConfigurationError::InvalidHostName { .. }),
                "expected InvalidHostName for {host:?}, got {err:?}"
            );
            assert!(err.to_string().contains(host));
        }
    }

    #[test]
    fn test_effective_host_name_accepts_ip_literals() {
        for host in ["10.0.0.1", "[::1]", "localhost"] {
            let config = config().with_host_name(host);

            assert_eq!(effective_host_name(&config).unwrap(), host);
        }
    }

    #[test]
    fn test_wildcard_host_ignored_when_target_wins() {
        let config = config()
            .with_host_name("*.alpha.test")
            .with_target_host_name("www.alpha.test");

        assert_eq!(effective_host_name(&config).unwrap(), "www.alpha.test");
    }

    #[test]
    fn test_validate_builds_definition() {
        let repository = repository();
        let config = config().with_host_name("alpha.test");

        let definition = ConfigValidator::default()
            .validate(&config, &repository)
            .unwrap()
            .unwrap();

        assert_eq!(definition.name(), "alpha");
        assert_eq!(definition.host_name(), "alpha.test");
        assert_eq!(definition.root_item().path, ROOT);
    }

    #[test]
    fn test_validate_missing_root_is_skipped() {
        let repository = MemoryRepository::new().with_node("web", "/sitecore/content");
        let config = config().with_host_name("alpha.test");

        let result = ConfigValidator::default().validate(&config, &repository).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_validate_wrong_database_is_skipped() {
        let repository = repository();
        let mut config = config().with_host_name("alpha.test");
        config.database = "master".to_owned();

        let result = ConfigValidator::default().validate(&config, &repository).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_validate_host_checked_before_root() {
        let repository = MemoryRepository::new();
        let config = config().with_host_name("*.alpha.test");

        let err = ConfigValidator::default()
            .validate(&config, &repository)
            .unwrap_err();

        assert!(matches!(err, ConfigurationError::WildcardHostName { .. }));
    }

    #[test]
    fn test_validate_site_template_required() {
        let repository = MemoryRepository::new()
            .with_node("web", ROOT)
            .with_template_node("web", "/sitecore/content/beta", "site");
        let validator = ConfigValidator::new(ValidatorSettings {
            site_template: Some("Site".to_owned()),
        });

        let alpha = validator
            .validate(&config().with_host_name("alpha.test"), &repository)
            .unwrap();
        let beta = validator
            .validate(
                &RawSiteConfig::new("beta", "/sitecore/content/beta", "web")
                    .with_host_name("beta.test"),
                &repository,
            )
            .unwrap();

        assert!(alpha.is_none());
        assert_eq!(beta.unwrap().name(), "beta");
    }
}
