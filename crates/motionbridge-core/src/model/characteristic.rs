// ── Host characteristic vocabulary ──
//
// The subset of the host's service/characteristic schema this bridge
// touches. Values use the host's encodings (e.g. PositionState 0/1/2).

use serde::{Deserialize, Serialize};

/// Services attached to a blind accessory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceKind {
    AccessoryInformation,
    WindowCovering,
    Battery,
}

/// Characteristics the bridge reads, writes, or pushes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Characteristic {
    Name,
    CurrentPosition,
    TargetPosition,
    PositionState,
    HoldPosition,
    CurrentVerticalTiltAngle,
    TargetVerticalTiltAngle,
    CurrentHorizontalTiltAngle,
    TargetHorizontalTiltAngle,
    BatteryLevel,
    StatusLowBattery,
}

impl Characteristic {
    /// The service this characteristic lives on.
    pub fn service(self) -> ServiceKind {
        match self {
            Self::BatteryLevel | Self::StatusLowBattery => ServiceKind::Battery,
            _ => ServiceKind::WindowCovering,
        }
    }
}

/// A characteristic value in host encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CharacteristicValue {
    Bool(bool),
    Int(i32),
    Text(String),
}

impl CharacteristicValue {
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<i32> for CharacteristicValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<u8> for CharacteristicValue {
    fn from(v: u8) -> Self {
        Self::Int(i32::from(v))
    }
}

impl From<bool> for CharacteristicValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<String> for CharacteristicValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<PositionState> for CharacteristicValue {
    fn from(s: PositionState) -> Self {
        Self::Int(s.code())
    }
}

impl From<LowBatteryStatus> for CharacteristicValue {
    fn from(s: LowBatteryStatus) -> Self {
        Self::Int(s.code())
    }
}

// ── PositionState ───────────────────────────────────────────────────

/// Host-visible direction of travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionState {
    Decreasing,
    Increasing,
    Stopped,
}

impl PositionState {
    pub fn code(self) -> i32 {
        match self {
            Self::Decreasing => 0,
            Self::Increasing => 1,
            Self::Stopped => 2,
        }
    }
}

/// Host-visible low battery flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LowBatteryStatus {
    Normal,
    Low,
}

impl LowBatteryStatus {
    pub fn code(self) -> i32 {
        match self {
            Self::Normal => 0,
            Self::Low => 1,
        }
    }
}

impl From<bool> for LowBatteryStatus {
    fn from(is_low: bool) -> Self {
        if is_low { Self::Low } else { Self::Normal }
    }
}

// ── Bindings & updates ──────────────────────────────────────────────

/// Access permissions granted on a bound characteristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Perms {
    pub read: bool,
    pub write: bool,
    pub notify: bool,
}

impl Perms {
    pub const READ_NOTIFY: Self = Self {
        read: true,
        write: false,
        notify: true,
    };
    pub const READ_WRITE_NOTIFY: Self = Self {
        read: true,
        write: true,
        notify: true,
    };
    pub const WRITE_ONLY: Self = Self {
        read: false,
        write: true,
        notify: false,
    };
    pub const NONE: Self = Self {
        read: false,
        write: false,
        notify: false,
    };
}

/// One characteristic the core serves for an accessory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacteristicBinding {
    pub characteristic: Characteristic,
    pub perms: Perms,
}

impl CharacteristicBinding {
    pub fn new(characteristic: Characteristic, perms: Perms) -> Self {
        Self {
            characteristic,
            perms,
        }
    }
}

/// A value to push to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacteristicUpdate {
    pub characteristic: Characteristic,
    pub value: CharacteristicValue,
}

impl CharacteristicUpdate {
    pub fn new(characteristic: Characteristic, value: impl Into<CharacteristicValue>) -> Self {
        Self {
            characteristic,
            value: value.into(),
        }
    }

    pub fn service(&self) -> ServiceKind {
        self.characteristic.service()
    }
}
