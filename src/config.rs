//! Configuration
//!
//! Runtime settings read from `LOOPER_*` environment variables. Unset or
//! unparseable values fall back to defaults.

use std::net::SocketAddr;
use std::path::PathBuf;

use tracing::warn;

use crate::core::seed::SeedPolicy;
use crate::network::server::ServerConfig;
use crate::progress::hints::{clamp_allowance, MAX_HINTS};
use crate::puzzle::DifficultyMode;

/// Directory name under the platform data dir.
pub const APP_DIR: &str = "logic-looper";

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// How dates become seeds.
    pub seed_policy: SeedPolicy,
    /// Where difficulty comes from.
    pub difficulty: DifficultyMode,
    /// Daily hint allowance (2 or 3).
    pub hint_allowance: u32,
    /// JSON file store directory.
    pub data_dir: PathBuf,
    /// Sync service base URL; `None` disables sync.
    pub sync_url: Option<String>,
    /// Sync server bind address.
    pub bind_addr: SocketAddr,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed_policy: SeedPolicy::Calendar,
            difficulty: DifficultyMode::Calendar,
            hint_allowance: MAX_HINTS,
            data_dir: default_data_dir(),
            sync_url: None,
            bind_addr: ServerConfig::default().bind_addr,
        }
    }
}

/// `<data_local_dir>/logic-looper`, or `./logic-looper` without one.
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

impl Config {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let seed_policy = match get("LOOPER_SEED_SECRET") {
            Some(secret) => SeedPolicy::Keyed { secret },
            None => SeedPolicy::Calendar,
        };

        let difficulty = match get("LOOPER_DIFFICULTY") {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                warn!("{}, using calendar difficulty", e);
                DifficultyMode::Calendar
            }),
            None => defaults.difficulty,
        };

        let hint_allowance = match get("LOOPER_HINTS") {
            Some(raw) => match raw.parse::<u32>() {
                Ok(n) => clamp_allowance(n),
                Err(_) => {
                    warn!("LOOPER_HINTS '{}' is not a number, using {}", raw, MAX_HINTS);
                    MAX_HINTS
                }
            },
            None => defaults.hint_allowance,
        };

        let bind_addr = match get("LOOPER_BIND") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("LOOPER_BIND '{}' is not a socket address, using {}", raw, defaults.bind_addr);
                defaults.bind_addr
            }),
            None => defaults.bind_addr,
        };

        Self {
            seed_policy,
            difficulty,
            hint_allowance,
            data_dir: get("LOOPER_DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            sync_url: get("LOOPER_SYNC_URL"),
            bind_addr,
        }
    }

    /// Check if score sync is configured.
    pub fn sync_enabled(&self) -> bool {
        self.sync_url.is_some()
    }

    /// Sync server settings.
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig { bind_addr: self.bind_addr, ..ServerConfig::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.seed_policy, SeedPolicy::Calendar);
        assert_eq!(config.difficulty, DifficultyMode::Calendar);
        assert_eq!(config.hint_allowance, 3);
        assert_eq!(config.bind_addr.port(), 5000);
        assert!(config.data_dir.ends_with(APP_DIR));
        assert!(!config.sync_enabled());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("LOOPER_SEED_SECRET", "hunter2"),
            ("LOOPER_DIFFICULTY", "Seeded"),
            ("LOOPER_HINTS", "2"),
            ("LOOPER_DATA_DIR", "/tmp/looper"),
            ("LOOPER_SYNC_URL", "http://localhost:5000"),
            ("LOOPER_BIND", "127.0.0.1:6000"),
        ]);
        assert_eq!(config.seed_policy, SeedPolicy::Keyed { secret: "hunter2".into() });
        assert_eq!(config.difficulty, DifficultyMode::Seeded);
        assert_eq!(config.hint_allowance, 2);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/looper"));
        assert!(config.sync_enabled());
        assert_eq!(config.server_config().bind_addr.port(), 6000);
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = config_from(&[
            ("LOOPER_SEED_SECRET", "   "),
            ("LOOPER_DIFFICULTY", "nightmare"),
            ("LOOPER_HINTS", "10"),
            ("LOOPER_BIND", "everywhere"),
        ]);
        assert_eq!(config.seed_policy, SeedPolicy::Calendar);
        assert_eq!(config.difficulty, DifficultyMode::Calendar);
        assert_eq!(config.hint_allowance, 3);
        assert_eq!(config.bind_addr.port(), 5000);

        assert_eq!(config_from(&[("LOOPER_HINTS", "0")]).hint_allowance, 2);
        assert_eq!(config_from(&[("LOOPER_HINTS", "two")]).hint_allowance, 3);
    }
}
