// ── Accessory record types ──
//
// What the host persists between restarts. The core owns the meaning of
// every field in `AccessoryContext`; the host only stores it.

use motionbridge_api::{DeviceType, RawStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::mac::MacAddress;

/// Last requested targets, in host-semantic units.
///
/// Written by the command path when the host sets a target, and by the
/// sync path when the blind settles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetState {
    /// 0–100.
    pub position: Option<i32>,
    /// −90..90.
    pub angle: Option<i32>,
}

/// Per-accessory state owned by the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessoryContext {
    pub mac: MacAddress,
    pub device_type: DeviceType,
    /// Last applied telemetry. Written only by the sync path.
    pub status: RawStatus,
    #[serde(default)]
    pub target: TargetState,
}

/// A persisted accessory identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessoryRecord {
    pub uuid: Uuid,
    pub display_name: String,
    pub context: AccessoryContext,
}

impl AccessoryRecord {
    /// Seed a record for a device seen for the first time.
    pub fn new(uuid: Uuid, mac: MacAddress, device_type: DeviceType, status: RawStatus) -> Self {
        Self {
            uuid,
            display_name: mac.to_string(),
            context: AccessoryContext {
                mac,
                device_type,
                status,
                target: TargetState::default(),
            },
        }
    }

    pub fn mac(&self) -> &MacAddress {
        &self.context.mac
    }
}

/// Values for the host's accessory-information service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessoryInformation {
    pub manufacturer: String,
    pub model: String,
    pub serial_number: String,
}
