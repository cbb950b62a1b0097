// ── Gateway payload types ──
//
// Field names and integer codes follow the gateway's JSON protocol.
// Enums keep an `Unknown` catch-all so newer firmware never fails to parse.

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

// ── DeviceType ──────────────────────────────────────────────────────

/// Vendor device class, transmitted as an 8-digit code string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeviceType {
    Gateway,
    ChildGateway,
    Blind,
    TopDownBottomUp,
    DoubleRoller,
    Unknown(String),
}

impl DeviceType {
    pub fn code(&self) -> &str {
        match self {
            Self::Gateway => "02000001",
            Self::ChildGateway => "02000002",
            Self::Blind => "10000000",
            Self::TopDownBottomUp => "10000001",
            Self::DoubleRoller => "10000002",
            Self::Unknown(code) => code,
        }
    }
}

impl From<String> for DeviceType {
    fn from(code: String) -> Self {
        match code.as_str() {
            "02000001" => Self::Gateway,
            "02000002" => Self::ChildGateway,
            "10000000" => Self::Blind,
            "10000001" => Self::TopDownBottomUp,
            "10000002" => Self::DoubleRoller,
            _ => Self::Unknown(code),
        }
    }
}

impl From<DeviceType> for String {
    fn from(t: DeviceType) -> Self {
        t.code().to_owned()
    }
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown(code) => write!(f, "Unknown({code})"),
            other => write!(f, "{other:?}"),
        }
    }
}

// ── BlindType ───────────────────────────────────────────────────────

/// Physical shape of the covering, reported in the status `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, IntoStaticStr)]
#[serde(from = "u8", into = "u8")]
pub enum BlindType {
    RollerBlind,
    VenetianBlind,
    RomanBlind,
    HoneycombBlind,
    ShangriLaBlind,
    RollerShutter,
    RollerGate,
    Awning,
    TopDownBottomUp,
    DayNightBlind,
    DimmingBlind,
    Curtain,
    CurtainLeft,
    CurtainRight,
    DoubleRoller,
    Switch,
    Unknown(u8),
}

impl BlindType {
    /// Every named shape, in protocol order.
    pub const KNOWN: [Self; 16] = [
        Self::RollerBlind,
        Self::VenetianBlind,
        Self::RomanBlind,
        Self::HoneycombBlind,
        Self::ShangriLaBlind,
        Self::RollerShutter,
        Self::RollerGate,
        Self::Awning,
        Self::TopDownBottomUp,
        Self::DayNightBlind,
        Self::DimmingBlind,
        Self::Curtain,
        Self::CurtainLeft,
        Self::CurtainRight,
        Self::DoubleRoller,
        Self::Switch,
    ];

    pub fn code(self) -> u8 {
        match self {
            Self::RollerBlind => 1,
            Self::VenetianBlind => 2,
            Self::RomanBlind => 3,
            Self::HoneycombBlind => 4,
            Self::ShangriLaBlind => 5,
            Self::RollerShutter => 6,
            Self::RollerGate => 7,
            Self::Awning => 8,
            Self::TopDownBottomUp => 9,
            Self::DayNightBlind => 10,
            Self::DimmingBlind => 11,
            Self::Curtain => 12,
            Self::CurtainLeft => 13,
            Self::CurtainRight => 14,
            Self::DoubleRoller => 17,
            Self::Switch => 43,
            Self::Unknown(code) => code,
        }
    }

    /// Human-readable name, used as the accessory model string.
    pub fn name(self) -> &'static str {
        self.into()
    }
}

impl From<u8> for BlindType {
    fn from(code: u8) -> Self {
        Self::KNOWN
            .into_iter()
            .find(|t| t.code() == code)
            .unwrap_or(Self::Unknown(code))
    }
}

impl From<BlindType> for u8 {
    fn from(t: BlindType) -> Self {
        t.code()
    }
}

// ── Operation ───────────────────────────────────────────────────────

/// Motor activity, both as reported state and as a write command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum Operation {
    CloseDown,
    OpenUp,
    Stop,
    StatusQuery,
    Unknown(u8),
}

impl From<u8> for Operation {
    fn from(code: u8) -> Self {
        match code {
            0 => Self::CloseDown,
            1 => Self::OpenUp,
            2 => Self::Stop,
            5 => Self::StatusQuery,
            other => Self::Unknown(other),
        }
    }
}

impl From<Operation> for u8 {
    fn from(op: Operation) -> Self {
        match op {
            Operation::CloseDown => 0,
            Operation::OpenUp => 1,
            Operation::Stop => 2,
            Operation::StatusQuery => 5,
            Operation::Unknown(code) => code,
        }
    }
}

// ── LimitsState / WirelessMode ──────────────────────────────────────

/// Travel-limit calibration state. Carried, never interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum LimitsState {
    #[default]
    NoLimits,
    TopLimitDetected,
    BottomLimitDetected,
    LimitsDetected,
    ThirdLimitDetected,
    Unknown(u8),
}

impl From<u8> for LimitsState {
    fn from(code: u8) -> Self {
        match code {
            0 => Self::NoLimits,
            1 => Self::TopLimitDetected,
            2 => Self::BottomLimitDetected,
            3 => Self::LimitsDetected,
            4 => Self::ThirdLimitDetected,
            other => Self::Unknown(other),
        }
    }
}

impl From<LimitsState> for u8 {
    fn from(s: LimitsState) -> Self {
        match s {
            LimitsState::NoLimits => 0,
            LimitsState::TopLimitDetected => 1,
            LimitsState::BottomLimitDetected => 2,
            LimitsState::LimitsDetected => 3,
            LimitsState::ThirdLimitDetected => 4,
            LimitsState::Unknown(code) => code,
        }
    }
}

/// Radio link mode. Carried, never interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum WirelessMode {
    #[default]
    UniDirection,
    BiDirection,
    BiDirectionLimits,
    Other(u8),
}

impl From<u8> for WirelessMode {
    fn from(code: u8) -> Self {
        match code {
            0 => Self::UniDirection,
            1 => Self::BiDirection,
            2 => Self::BiDirectionLimits,
            other => Self::Other(other),
        }
    }
}

impl From<WirelessMode> for u8 {
    fn from(m: WirelessMode) -> Self {
        match m {
            WirelessMode::UniDirection => 0,
            WirelessMode::BiDirection => 1,
            WirelessMode::BiDirectionLimits => 2,
            WirelessMode::Other(code) => code,
        }
    }
}

// ── RawStatus ───────────────────────────────────────────────────────

/// Vendor-native status snapshot for one blind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStatus {
    #[serde(rename = "type")]
    pub blind_type: BlindType,
    pub operation: Operation,
    /// 0–100, 0 = fully open at the top limit.
    pub current_position: u8,
    /// 0–180 degrees.
    pub current_angle: u8,
    #[serde(default)]
    pub current_state: LimitsState,
    /// 0 on battery-powered motors.
    #[serde(default)]
    pub voltage_mode: u8,
    /// Centivolts.
    #[serde(default)]
    pub battery_level: u32,
    #[serde(default)]
    pub wireless_mode: WirelessMode,
    #[serde(default, rename = "RSSI")]
    pub rssi: i16,
}

impl Default for RawStatus {
    /// Placeholder used before the first real reading: half-open, level,
    /// stationary roller blind.
    fn default() -> Self {
        Self {
            blind_type: BlindType::RollerBlind,
            operation: Operation::Stop,
            current_position: 50,
            current_angle: 90,
            current_state: LimitsState::NoLimits,
            voltage_mode: 0,
            battery_level: 0,
            wireless_mode: WirelessMode::UniDirection,
            rssi: 0,
        }
    }
}

// ── DeviceReport ────────────────────────────────────────────────────

/// One device as returned by a bulk read or pushed as a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceReport {
    pub mac: String,
    pub device_type: DeviceType,
    pub data: RawStatus,
}

// ── WriteRequest ────────────────────────────────────────────────────

/// Write payload. Unset fields are omitted on the wire.
///
/// Values are passed through unclamped; range policing is the host's job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_position: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_angle: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<Operation>,
}
