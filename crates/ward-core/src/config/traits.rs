//! Core trait for Ward configuration types

use crate::{Result, WardError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::str::FromStr;

/// Core trait for Ward configuration types.
///
/// Values resolve in three layers: defaults, then a TOML file, then
/// environment variables. `WARD_MAX_ATTESTATION_AGE_MS` sets
/// `max_attestation_age_ms`; a double underscore descends into a table, so
/// `WARD_REGISTRY__FETCH_TIMEOUT_MS` sets `registry.fetch_timeout_ms`.
pub trait WardConfig: Clone + Default + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Prefix that marks an environment variable as a config override
    const ENV_PREFIX: &'static str = "WARD_";

    /// Load configuration from a TOML file. Missing keys take their defaults.
    fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            WardError::invalid(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;
        let config = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Set a single dotted key from its string form. Unknown keys are ignored.
    fn set_from_string(&mut self, key: &str, value: &str) -> Result<()>;

    /// Validate the configuration
    fn validate(&self) -> Result<()>;

    /// Apply overrides from `(name, value)` pairs carrying [`Self::ENV_PREFIX`]
    fn merge_with_vars<I>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in vars {
            if let Some(rest) = name.strip_prefix(Self::ENV_PREFIX) {
                let key = rest.to_lowercase().replace("__", ".");
                tracing::debug!(%key, "config override from environment");
                self.set_from_string(&key, &value)?;
            }
        }
        Ok(())
    }

    /// Apply overrides from the process environment
    fn merge_with_env(&mut self) -> Result<()> {
        self.merge_with_vars(std::env::vars())
    }

    /// Defaults, then the optional file, then the environment, then validation
    fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.merge_with_env()?;
        config.validate()?;
        Ok(config)
    }
}

/// Parse a config value, naming the key in the error
pub fn parse_value<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| WardError::invalid(format!("Invalid value for '{key}': {e}")))
}
