// ── Device identity ──
//
// MacAddress is the reconciliation key; the accessory UUID is derived from
// it deterministically so identities survive restarts regardless of the
// order devices are discovered in.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Namespace for accessory UUIDs (v5, SHA-1 over the normalized MAC).
const ACCESSORY_NAMESPACE: Uuid = Uuid::from_u128(0x6d6f_7469_6f6e_4272_6964_6765_0000_0001);

// ── MacAddress ──────────────────────────────────────────────────────

/// MAC address, normalized to lowercase colon-separated format (aa:bb:cc:dd:ee:ff).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct MacAddress(String);

impl MacAddress {
    /// Create a normalized MAC address from any common format.
    /// Accepts colon-separated, dash-separated, or bare hex.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let normalized = raw.as_ref().trim().to_lowercase().replace('-', ":");
        if normalized.len() == 12 && normalized.bytes().all(|b| b.is_ascii_hexdigit()) {
            let octets: Vec<&str> = (0..12)
                .step_by(2)
                .filter_map(|i| normalized.get(i..i + 2))
                .collect();
            return Self(octets.join(":"));
        }
        Self(normalized)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Deterministic accessory UUID for this MAC.
    pub fn accessory_uuid(&self) -> Uuid {
        Uuid::new_v5(&ACCESSORY_NAMESPACE, self.0.as_bytes())
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MacAddress {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<String> for MacAddress {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for MacAddress {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<MacAddress> for String {
    fn from(mac: MacAddress) -> Self {
        mac.0
    }
}
