//! Site definition listing and context resolution.
//!
//! Provides [`SiteDefinitionsProvider`], which validates the configured sites
//! against a [`ContentRepository`] and decides which site owns a content item.
//!
//! # Resolution
//!
//! For an item and the request's current site:
//! - if some site root is the item or one of its ancestors, that site owns the
//!   item, even when another site is current;
//! - if several roots contain the item, the deepest root wins, and on equal
//!   depth the site configured first wins;
//! - if no root contains the item, the current site owns it.
//!
//! # Thread Safety
//!
//! `SiteDefinitionsProvider` is designed for concurrent access:
//! - without caching there is no shared mutable state besides the config
//!   snapshot, every call validates from scratch
//! - with caching, `definitions()` returns an `Arc` snapshot after a cheap
//!   flag check, and rebuilds are serialized with double-checked locking

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use multisite_content::{ContentRepository, NodeRef};

use crate::definition::{ContextSiteResult, RawSiteConfig, SiteDefinition};
use crate::error::ConfigurationError;
use crate::validator::{ConfigValidator, ValidatorSettings};

/// Configuration for [`SiteDefinitionsProvider`].
#[derive(Clone, Debug, Default)]
pub struct ProviderSettings {
    /// Keep the validated list between calls.
    ///
    /// The snapshot is dropped by [`SiteDefinitionsProvider::set_configs`] and
    /// [`SiteDefinitionsProvider::invalidate`]. Failed validations are never
    /// cached.
    pub cache_enabled: bool,
    /// Template every site root must be created from.
    pub site_template: Option<String>,
}

/// Validated, queryable set of site definitions.
///
/// Built once from the ordered site records. The order is kept in
/// [`site_definitions`](Self::site_definitions) output and breaks ties
/// between equally deep roots during resolution.
pub struct SiteDefinitionsProvider {
    repository: Arc<dyn ContentRepository>,
    validator: ConfigValidator,
    cache_enabled: bool,
    configs: RwLock<Arc<Vec<RawSiteConfig>>>,
    /// Serializes rebuilds and snapshot replacement.
    reload_lock: Mutex<()>,
    snapshot: RwLock<Arc<Vec<SiteDefinition>>>,
    cache_valid: AtomicBool,
}

impl SiteDefinitionsProvider {
    /// Create a provider with default settings (no cache, no template check).
    #[must_use]
    pub fn new(configs: Vec<RawSiteConfig>, repository: Arc<dyn ContentRepository>) -> Self {
        Self::with_settings(configs, repository, &ProviderSettings::default())
    }

    /// Create a provider with explicit settings.
    #[must_use]
    pub fn with_settings(
        configs: Vec<RawSiteConfig>,
        repository: Arc<dyn ContentRepository>,
        settings: &ProviderSettings,
    ) -> Self {
        let validator = ConfigValidator::new(ValidatorSettings {
            site_template: settings.site_template.clone(),
        });

        Self {
            repository,
            validator,
            cache_enabled: settings.cache_enabled,
            configs: RwLock::new(Arc::new(configs)),
            reload_lock: Mutex::new(()),
            snapshot: RwLock::new(Arc::new(Vec::new())),
            cache_valid: AtomicBool::new(false),
        }
    }

    /// Current site records.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn configs(&self) -> Arc<Vec<RawSiteConfig>> {
        Arc::clone(&self.configs.read().unwrap())
    }

    /// Replace the site records.
    ///
    /// Drops any cached definitions; the next access validates the new records.
    ///
    /// # Panics
    ///
    /// Panics if internal locks are poisoned.
    pub fn set_configs(&self, configs: Vec<RawSiteConfig>) {
        let _guard = self.reload_lock.lock().unwrap();
        *self.configs.write().unwrap() = Arc::new(configs);
        self.cache_valid.store(false, Ordering::Release);
    }

    /// Drop cached definitions, e.g. after the content tree changed.
    ///
    /// Current readers keep their existing snapshot.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn invalidate(&self) {
        let _guard = self.reload_lock.lock().unwrap();
        self.cache_valid.store(false, Ordering::Release);
    }

    /// All servable site definitions, in configuration order.
    ///
    /// Records whose root does not resolve are left out.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigurationError`]; no partial list is returned.
    ///
    /// # Panics
    ///
    /// Panics if internal locks are poisoned.
    pub fn site_definitions(&self) -> Result<Vec<SiteDefinition>, ConfigurationError> {
        Ok(Arc::unwrap_or_clone(self.definitions()?))
    }

    /// Site that owns `item`, seen from a request whose site is `current`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if the definition list cannot be built.
    ///
    /// # Panics
    ///
    /// Panics if internal locks are poisoned.
    pub fn context_site_definition(
        &self,
        item: &NodeRef,
        current: &SiteDefinition,
    ) -> Result<ContextSiteResult, ConfigurationError> {
        let definitions = self.definitions()?;

        let mut owner: Option<&SiteDefinition> = None;
        for definition in definitions.iter() {
            if !self
                .repository
                .is_ancestor_or_self(definition.root_item(), item)
            {
                continue;
            }
            if owner.is_none_or(|o| definition.root_item().depth() > o.root_item().depth()) {
                owner = Some(definition);
            }
        }

        let result = match owner {
            Some(definition) => ContextSiteResult {
                is_current: definition.name() == current.name(),
                definition: definition.clone(),
            },
            None => ContextSiteResult {
                definition: current.clone(),
                is_current: true,
            },
        };

        tracing::debug!(
            item = %item.path,
            site = %result.definition.name(),
            is_current = result.is_current,
            "Resolved context site"
        );

        Ok(result)
    }

    /// First definition with the given name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if the definition list cannot be built.
    ///
    /// # Panics
    ///
    /// Panics if internal locks are poisoned.
    pub fn site_definition(&self, name: &str) -> Result<Option<SiteDefinition>, ConfigurationError> {
        Ok(self
            .definitions()?
            .iter()
            .find(|d| d.name() == name)
            .cloned())
    }

    /// First definition serving `host`.
    ///
    /// Matches the whole hostname ignoring case; a `:port` suffix on `host` is
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if the definition list cannot be built.
    ///
    /// # Panics
    ///
    /// Panics if internal locks are poisoned.
    pub fn site_definition_for_host(
        &self,
        host: &str,
    ) -> Result<Option<SiteDefinition>, ConfigurationError> {
        let host = strip_port(host.trim());
        Ok(self
            .definitions()?
            .iter()
            .find(|d| d.host_name().eq_ignore_ascii_case(host))
            .cloned())
    }

    /// Validated list, from the cache when enabled and valid.
    fn definitions(&self) -> Result<Arc<Vec<SiteDefinition>>, ConfigurationError> {
        if !self.cache_enabled {
            return self.build(&self.configs()).map(Arc::new);
        }

        // Fast path: cache valid
        if self.cache_valid.load(Ordering::Acquire) {
            tracing::debug!("Site definitions served from cache");
            return Ok(self.snapshot());
        }

        // Slow path: acquire reload lock
        let _guard = self.reload_lock.lock().unwrap();

        // Double-check after acquiring lock
        if self.cache_valid.load(Ordering::Acquire) {
            return Ok(self.snapshot());
        }

        let definitions = Arc::new(self.build(&self.configs())?);
        *self.snapshot.write().unwrap() = Arc::clone(&definitions);
        self.cache_valid.store(true, Ordering::Release);
        tracing::info!(sites = definitions.len(), "Rebuilt site definitions cache");

        Ok(definitions)
    }

    fn snapshot(&self) -> Arc<Vec<SiteDefinition>> {
        Arc::clone(&self.snapshot.read().unwrap())
    }

    fn build(&self, configs: &[RawSiteConfig]) -> Result<Vec<SiteDefinition>, ConfigurationError> {
        let mut definitions = Vec::with_capacity(configs.len());
        for config in configs {
            if let Some(definition) = self.validator.validate(config, self.repository.as_ref())? {
                definitions.push(definition);
            }
        }

        tracing::debug!(
            configured = configs.len(),
            valid = definitions.len(),
            "Validated site definitions"
        );

        Ok(definitions)
    }
}

/// Drop a `:port` suffix, leaving bracketed IPv6 literals intact.
fn strip_port(host: &str) -> &str {
    if let Some(rest) = host.strip_prefix('[') {
        return rest.split_once(']').map_or(host, |(addr, _)| addr);
    }
    match host.rsplit_once(':') {
        Some((name, port)) if !name.contains(':') && port.bytes().all(|b| b.is_ascii_digit()) => {
            name
        }
        _ => host,
    }
}
