//! Runtime configuration.
//!
//! Defaults suit tests and the demo: in-memory tables, no latency, a 250 unit
//! shipping fee. A TOML file and `STOREFRONT_*` environment variables override them.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const ENV_PREFIX: &str = "STOREFRONT_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorefrontConfig {
    /// Flat shipping surcharge added to every order, in minor units.
    pub shipping_fee: u64,
    /// Delay before every facade call, standing in for a network round trip.
    pub simulated_latency_ms: u64,
    /// Mailbox size of each actor.
    pub channel_capacity: usize,
    /// Directory of the JSON tables. `None` keeps everything in memory.
    pub data_dir: Option<PathBuf>,
    /// Insert the default seller and demo products into empty tables at startup.
    pub seed_demo_data: bool,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            shipping_fee: 250,
            simulated_latency_ms: 0,
            channel_capacity: 32,
            data_dir: None,
            seed_demo_data: false,
        }
    }
}

impl StorefrontConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Load from the process environment.
    ///
    /// `STOREFRONT_CONFIG` names an optional TOML file; the other `STOREFRONT_*`
    /// variables then override individual fields.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        let mut config = match var("CONFIG") {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Some(v) = var("SHIPPING_FEE") {
            config.shipping_fee = parse("SHIPPING_FEE", &v)?;
        }
        if let Some(v) = var("SIMULATED_LATENCY_MS") {
            config.simulated_latency_ms = parse("SIMULATED_LATENCY_MS", &v)?;
        }
        if let Some(v) = var("CHANNEL_CAPACITY") {
            config.channel_capacity = parse("CHANNEL_CAPACITY", &v)?;
        }
        if let Some(v) = var("DATA_DIR") {
            config.data_dir = (!v.trim().is_empty()).then(|| PathBuf::from(v));
        }
        if let Some(v) = var("SEED_DEMO_DATA") {
            config.seed_demo_data = parse("SEED_DEMO_DATA", &v)?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.channel_capacity == 0 {
            return Err(ConfigError::Invalid("channel_capacity must be at least 1".into()));
        }
        Ok(())
    }
}

fn parse<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: format!("{ENV_PREFIX}{name}"),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = StorefrontConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, StorefrontConfig::default());
        assert_eq!(config.shipping_fee, 250);
        assert_eq!(config.simulated_latency(), Duration::ZERO);
    }

    #[test]
    fn toml_overrides_some_fields() {
        let config = StorefrontConfig::from_toml_str(
            r#"
            shipping_fee = 300
            data_dir = "/var/lib/storefront"
            "#,
        )
        .unwrap();
        assert_eq!(config.shipping_fee, 300);
        assert_eq!(config.data_dir, Some(PathBuf::from("/var/lib/storefront")));
        assert_eq!(config.channel_capacity, 32);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            StorefrontConfig::from_toml_str("shiping_fee = 1"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storefront.toml");
        std::fs::write(&path, "shipping_fee = 100\nseed_demo_data = true\n").unwrap();
        let path = path.to_string_lossy().to_string();

        let config = StorefrontConfig::from_lookup(lookup(&[
            ("STOREFRONT_CONFIG", path.as_str()),
            ("STOREFRONT_SHIPPING_FEE", "400"),
            ("STOREFRONT_SIMULATED_LATENCY_MS", "300"),
        ]))
        .unwrap();
        assert_eq!(config.shipping_fee, 400);
        assert!(config.seed_demo_data);
        assert_eq!(config.simulated_latency(), Duration::from_millis(300));
    }

    #[test]
    fn bad_values_are_reported() {
        let err = StorefrontConfig::from_lookup(lookup(&[("STOREFRONT_CHANNEL_CAPACITY", "lots")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == "STOREFRONT_CHANNEL_CAPACITY"));

        let err = StorefrontConfig::from_lookup(lookup(&[("STOREFRONT_CHANNEL_CAPACITY", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
