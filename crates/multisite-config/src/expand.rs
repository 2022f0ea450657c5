//! `${VAR}` and `${VAR:-default}` expansion in configuration values.

use crate::ConfigError;

/// Expand environment variable references in `value`.
///
/// `${VAR}` fails if `VAR` is unset; `${VAR:-default}` falls back to `default`.
/// A value without any `${` is returned unchanged, including bare `$VAR`.
/// Once a value contains `${`, bare `$VAR` references in it are expanded too.
///
/// `field` names the setting in error messages (e.g., `site[0].host_name`).
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |name| match std::env::var(name) {
        Ok(found) => Ok(Some(found)),
        Err(_) => Err(UnsetVar(name.to_owned())),
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

/// Name of a variable referenced without a default and not set.
struct UnsetVar(String);
