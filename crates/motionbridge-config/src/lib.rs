//! Configuration for the motionbridge binary.
//!
//! Layered loading (defaults, TOML or JSON file, `MOTIONBRIDGE_*` env),
//! gateway key resolution (env + keyring + plaintext), and translation to
//! `motionbridge_core::PlatformConfig`. Blind entries stay raw JSON so the
//! core can validate them one by one.

use std::net::IpAddr;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized, Toml},
};
use motionbridge_core::{BlindConfigTable, PlatformConfig};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Keyring service name the gateway key is stored under.
pub const KEYRING_SERVICE: &str = "motionbridge";
/// Keyring entry holding the gateway key.
pub const KEYRING_USER: &str = "gateway-key";
/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "MOTIONBRIDGE_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Config struct ───────────────────────────────────────────────────

/// Top-level bridge configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BridgeConfig {
    /// Platform display name.
    pub name: Option<String>,

    /// Gateway address. Unset means multicast discovery.
    #[serde(alias = "gatewayIp")]
    pub gateway_ip: Option<String>,

    /// Gateway key (plaintext; prefer keyring or env var).
    pub key: Option<String>,

    /// Environment variable name containing the gateway key.
    #[serde(alias = "keyEnv")]
    pub key_env: Option<String>,

    /// Per-blind overrides, validated by the core.
    pub blinds: Option<Vec<Value>>,
}

impl BridgeConfig {
    /// Parse `gateway_ip`, if set.
    pub fn gateway_addr(&self) -> Result<Option<IpAddr>, ConfigError> {
        self.gateway_ip
            .as_deref()
            .map(|raw| {
                raw.trim().parse().map_err(|_| ConfigError::Validation {
                    field: "gateway_ip".into(),
                    reason: format!("not an IP address: {raw}"),
                })
            })
            .transpose()
    }

    /// Build the per-blind lookup table. Malformed entries are logged and
    /// dropped by the core.
    pub fn blind_table(&self) -> BlindConfigTable {
        BlindConfigTable::from_entries(self.blinds.as_deref())
    }

    pub fn to_platform_config(&self) -> PlatformConfig {
        PlatformConfig {
            name: self.name.clone(),
            blinds: self.blind_table(),
        }
    }

    /// Resolve the gateway key.
    ///
    /// Tries `key_env`, then the system keyring, then the plaintext `key`.
    /// `None` means the bridge runs read-only.
    pub fn resolve_key(&self) -> Option<SecretString> {
        if let Some(ref env_name) = self.key_env {
            if let Ok(val) = std::env::var(env_name) {
                return Some(SecretString::from(val));
            }
        }

        if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER) {
            if let Ok(secret) = entry.get_password() {
                return Some(SecretString::from(secret));
            }
        }

        self.key.clone().map(SecretString::from)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the default config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "motionbridge", "motionbridge").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("motionbridge");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the configuration from `path` (or the default path) plus env.
///
/// An explicit path must exist; a missing default file yields defaults.
/// Files ending in `.json` are read as JSON, anything else as TOML.
pub fn load_config(path: Option<&Path>) -> Result<BridgeConfig, ConfigError> {
    let path = match path {
        Some(p) if !p.exists() => {
            return Err(ConfigError::NotFound { path: p.to_owned() });
        }
        Some(p) => p.to_owned(),
        None => config_path(),
    };

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let mut figment = Figment::new().merge(Serialized::defaults(BridgeConfig::default()));
    figment = if is_json {
        figment.merge(Json::file(&path))
    } else {
        figment.merge(Toml::file(&path))
    };
    figment = figment.merge(Env::prefixed(ENV_PREFIX));

    let config: BridgeConfig = figment.extract()?;
    config.gateway_addr()?;
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use figment::Jail;
    use motionbridge_core::MacAddress;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    fn load(path: &str) -> Result<BridgeConfig, figment::Error> {
        load_config(Some(Path::new(path))).map_err(|e| figment::Error::from(e.to_string()))
    }

    #[test]
    fn loads_toml_with_blinds() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                name = "Living room"
                gateway_ip = "192.168.1.50"

                [[blinds]]
                mac = "AA:BB:CC:DD:EE:FF"
                name = "Office"
                invert = true
                pollInterval = 0

                [[blinds]]
                name = "missing mac"
                "#,
            )?;

            let cfg = load("config.toml")?;
            assert_eq!(cfg.name.as_deref(), Some("Living room"));
            assert_eq!(
                cfg.gateway_addr().unwrap(),
                Some("192.168.1.50".parse().unwrap())
            );

            let table = cfg.blind_table();
            assert_eq!(table.len(), 1);
            let blind = table.resolve(&MacAddress::new("aa:bb:cc:dd:ee:ff"));
            assert_eq!(blind.display_name(), "Office");
            assert!(blind.invert());
            assert_eq!(blind.poll_interval(), None);
            Ok(())
        });
    }

    #[test]
    fn loads_plugin_style_json() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.json",
                r#"{
                    "name": "MOTION Blinds",
                    "gatewayIp": "10.0.0.2",
                    "key": "12ab345c-d67e-8f",
                    "blinds": [
                        { "mac": "aa:bb:cc:dd:ee:01", "tilt": true, "lowBatteryThreshold": 30 }
                    ]
                }"#,
            )?;

            let cfg = load("config.json")?;
            assert_eq!(cfg.gateway_ip.as_deref(), Some("10.0.0.2"));

            let platform = cfg.to_platform_config();
            assert_eq!(platform.name.as_deref(), Some("MOTION Blinds"));
            let blind = platform.blinds.resolve(&MacAddress::new("aa:bb:cc:dd:ee:01"));
            assert!(blind.tilt());
            assert_eq!(blind.low_battery_threshold(), 30);
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", r#"gateway_ip = "10.0.0.2""#)?;
            jail.set_env("MOTIONBRIDGE_GATEWAY_IP", "10.0.0.9");

            let cfg = load("config.toml")?;
            assert_eq!(cfg.gateway_ip.as_deref(), Some("10.0.0.9"));
            Ok(())
        });
    }

    #[test]
    fn invalid_gateway_ip_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", r#"gateway_ip = "not-an-ip""#)?;

            let err = load_config(Some(Path::new("config.toml"))).unwrap_err();
            assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "gateway_ip"));
            Ok(())
        });
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = load_config(Some(Path::new("/nonexistent/motionbridge.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn key_env_takes_precedence_over_plaintext() {
        Jail::expect_with(|jail| {
            jail.set_env("TEST_MOTION_KEY", "from-env");
            let cfg = BridgeConfig {
                key: Some("from-file".into()),
                key_env: Some("TEST_MOTION_KEY".into()),
                ..BridgeConfig::default()
            };

            let key = cfg.resolve_key().unwrap();
            assert_eq!(key.expose_secret(), "from-env");
            Ok(())
        });
    }

    #[test]
    fn missing_blinds_array_yields_empty_table() {
        let cfg = BridgeConfig::default();
        assert!(cfg.blind_table().is_empty());
        assert_eq!(cfg.gateway_addr().unwrap(), None);
    }
}
