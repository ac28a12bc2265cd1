//! Store configuration.
//!
//! Environment:
//! - `PDF_TTL_MINUTES`: lifetime of each artifact (default 30)
//! - `PDF_MAX_ITEMS`: maximum number of artifacts held at once (default 100)

use std::num::NonZeroUsize;
use std::time::Duration as StdDuration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_TTL_MINUTES: &str = "PDF_TTL_MINUTES";
pub const ENV_MAX_ITEMS: &str = "PDF_MAX_ITEMS";

pub const DEFAULT_TTL_MINUTES: u64 = 30;
pub const DEFAULT_MAX_ITEMS: NonZeroUsize = NonZeroUsize::new(100).unwrap();
pub const DEFAULT_SWEEP_INTERVAL: StdDuration = StdDuration::from_secs(60);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("PDF_MAX_ITEMS must be at least 1")]
    ZeroCapacity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub ttl_minutes: u64,
    pub max_items: NonZeroUsize,
    /// Time between two GC sweeps.
    #[serde(with = "sweep_interval_secs")]
    pub sweep_interval: StdDuration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: DEFAULT_TTL_MINUTES,
            max_items: DEFAULT_MAX_ITEMS,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

impl StoreConfig {
    pub fn new(ttl_minutes: u64, max_items: NonZeroUsize) -> Self {
        Self {
            ttl_minutes,
            max_items,
            ..Self::default()
        }
    }

    /// Load from the process environment, reading a `.env` file first if
    /// one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Missing keys fall back to the
    /// defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_TTL_MINUTES) {
            config.ttl_minutes = parse_u64(ENV_TTL_MINUTES, &raw)?;
        }

        if let Some(raw) = lookup(ENV_MAX_ITEMS) {
            let n = parse_u64(ENV_MAX_ITEMS, &raw)?;
            let n = usize::try_from(n).map_err(|_| ConfigError::Invalid {
                key: ENV_MAX_ITEMS,
                value: raw.clone(),
            })?;
            config.max_items = NonZeroUsize::new(n).ok_or(ConfigError::ZeroCapacity)?;
        }

        Ok(config)
    }

    /// TTL as a signed duration, saturating for values chrono cannot hold.
    pub fn ttl(&self) -> chrono::Duration {
        i64::try_from(self.ttl_minutes)
            .ok()
            .and_then(chrono::Duration::try_minutes)
            .unwrap_or(chrono::Duration::MAX)
    }
}

fn parse_u64(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: raw.to_string(),
    })
}

mod sweep_interval_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_service_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.ttl_minutes, 30);
        assert_eq!(config.max_items.get(), 100);
        assert_eq!(config.sweep_interval, StdDuration::from_secs(60));
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config = StoreConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn reads_both_keys() {
        let config = StoreConfig::from_lookup(lookup(&[
            (ENV_TTL_MINUTES, "5"),
            (ENV_MAX_ITEMS, " 2 "),
        ]))
        .unwrap();
        assert_eq!(config.ttl_minutes, 5);
        assert_eq!(config.max_items.get(), 2);
    }

    #[test]
    fn zero_ttl_is_allowed() {
        let config = StoreConfig::from_lookup(lookup(&[(ENV_TTL_MINUTES, "0")])).unwrap();
        assert_eq!(config.ttl(), chrono::Duration::zero());
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let err = StoreConfig::from_lookup(lookup(&[(ENV_MAX_ITEMS, "0")])).unwrap_err();
        assert_eq!(err, ConfigError::ZeroCapacity);
    }

    #[rstest]
    #[case(ENV_TTL_MINUTES, "thirty")]
    #[case(ENV_TTL_MINUTES, "-1")]
    #[case(ENV_MAX_ITEMS, "")]
    #[case(ENV_MAX_ITEMS, "1.5")]
    fn garbage_is_rejected(#[case] key: &'static str, #[case] value: &str) {
        let err = StoreConfig::from_lookup(lookup(&[(key, value)])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key,
                value: value.to_string()
            }
        );
    }

    #[test]
    fn ttl_saturates_for_huge_values() {
        let config = StoreConfig::new(u64::MAX, DEFAULT_MAX_ITEMS);
        assert_eq!(config.ttl(), chrono::Duration::MAX);
    }

    #[test]
    fn serializes_interval_as_seconds() {
        let json = serde_json::to_value(StoreConfig::default()).unwrap();
        assert_eq!(json["sweep_interval"], 60);
        assert_eq!(json["max_items"], 100);
    }
}
