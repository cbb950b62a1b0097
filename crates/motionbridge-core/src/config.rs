// ── Runtime blind configuration ──
//
// Per-device overrides keyed by normalized MAC. Built once at startup from
// already-parsed entries and read-only afterward; the core never reads
// config files itself.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::model::MacAddress;

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 60_000;
pub const DEFAULT_LOW_BATTERY_THRESHOLD: u8 = 20;

/// Overrides for a single blind. Unset fields fall back to defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlindConfig {
    pub mac: MacAddress,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tilt: Option<bool>,
    #[serde(default)]
    pub invert: Option<bool>,
    /// Milliseconds; 0 disables polling.
    #[serde(default)]
    pub poll_interval: Option<u64>,
    /// Percent below which the battery is reported low.
    #[serde(default)]
    pub low_battery_threshold: Option<u8>,
    /// Explicit power-source override. Unset means "ask the device".
    #[serde(default)]
    pub is_battery_powered: Option<bool>,
}

impl BlindConfig {
    /// Defaults-only configuration for an unconfigured device.
    pub fn for_mac(mac: MacAddress) -> Self {
        Self {
            mac,
            name: None,
            tilt: None,
            invert: None,
            poll_interval: None,
            low_battery_threshold: None,
            is_battery_powered: None,
        }
    }

    pub fn invert(&self) -> bool {
        self.invert.unwrap_or(false)
    }

    pub fn tilt(&self) -> bool {
        self.tilt.unwrap_or(false)
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.mac.as_str())
    }

    /// `None` when polling is disabled.
    pub fn poll_interval(&self) -> Option<Duration> {
        match self.poll_interval.unwrap_or(DEFAULT_POLL_INTERVAL_MS) {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }

    pub fn low_battery_threshold(&self) -> u8 {
        self.low_battery_threshold
            .unwrap_or(DEFAULT_LOW_BATTERY_THRESHOLD)
    }
}

// ── BlindConfigTable ────────────────────────────────────────────────

/// Read-only lookup of blind overrides by MAC.
#[derive(Debug, Clone, Default)]
pub struct BlindConfigTable {
    by_mac: HashMap<MacAddress, Arc<BlindConfig>>,
}

impl BlindConfigTable {
    /// Build the table from raw config entries.
    ///
    /// Entries are validated one at a time: an entry without a string `mac`
    /// or with a malformed field is logged and skipped without affecting the
    /// rest. A missing array is only a warning.
    pub fn from_entries(entries: Option<&[Value]>) -> Self {
        let Some(entries) = entries else {
            warn!("no \"blinds\" array in configuration; every blind uses defaults");
            return Self::default();
        };

        info!(count = entries.len(), "loading blind configurations");
        let mut by_mac = HashMap::with_capacity(entries.len());

        for (index, entry) in entries.iter().enumerate() {
            if !entry.get("mac").is_some_and(Value::is_string) {
                error!(index, "blind config entry is missing \"mac\", ignoring");
                continue;
            }

            match BlindConfig::deserialize(entry) {
                Ok(cfg) => {
                    info!(
                        mac = %cfg.mac,
                        name = ?cfg.name,
                        invert = ?cfg.invert,
                        tilt = ?cfg.tilt,
                        poll_interval = ?cfg.poll_interval,
                        low_battery_threshold = ?cfg.low_battery_threshold,
                        is_battery_powered = ?cfg.is_battery_powered,
                        "loaded blind config"
                    );
                    by_mac.insert(cfg.mac.clone(), Arc::new(cfg));
                }
                Err(e) => {
                    error!(index, error = %e, "malformed blind config entry, ignoring");
                }
            }
        }

        Self { by_mac }
    }

    pub fn from_configs(configs: impl IntoIterator<Item = BlindConfig>) -> Self {
        Self {
            by_mac: configs
                .into_iter()
                .map(|c| (c.mac.clone(), Arc::new(c)))
                .collect(),
        }
    }

    pub fn get(&self, mac: &MacAddress) -> Option<&Arc<BlindConfig>> {
        self.by_mac.get(mac)
    }

    /// The configured overrides for `mac`, or defaults if none exist.
    pub fn resolve(&self, mac: &MacAddress) -> Arc<BlindConfig> {
        self.get(mac)
            .cloned()
            .unwrap_or_else(|| Arc::new(BlindConfig::for_mac(mac.clone())))
    }

    /// All configured blinds, sorted by MAC.
    pub fn configs(&self) -> Vec<Arc<BlindConfig>> {
        let mut all: Vec<_> = self.by_mac.values().cloned().collect();
        all.sort_by(|a, b| a.mac.cmp(&b.mac));
        all
    }

    pub fn len(&self) -> usize {
        self.by_mac.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_mac.is_empty()
    }
}

/// Runtime configuration handed to the platform.
#[derive(Debug, Clone, Default)]
pub struct PlatformConfig {
    /// Platform display name, used in logs only.
    pub name: Option<String>,
    pub blinds: BlindConfigTable,
}
