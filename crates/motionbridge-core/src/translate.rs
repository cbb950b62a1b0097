// ── Raw ⇄ host value translation ──
//
// Pure functions. Everything the host sees is derived from
// (RawStatus, BlindConfig, blind type) with no hidden state, so the same
// inputs always produce the same characteristic values.

use motionbridge_api::{BlindType, Operation, RawStatus, battery_info};

use crate::config::BlindConfig;
use crate::model::{Characteristic, PositionState};

// ── Position & angle ────────────────────────────────────────────────

/// Raw 0–100 position to host position. Inversion is its own inverse.
pub fn host_position(raw: u8, invert: bool) -> i32 {
    let raw = i32::from(raw);
    if invert { 100 - raw } else { raw }
}

/// Host target position to the raw value written to the gateway.
pub fn raw_position(host: i32, invert: bool) -> i32 {
    if invert { 100 - host } else { host }
}

/// Raw 0–180 angle to host −90..90. Not clamped.
pub fn host_angle(raw: u8) -> i32 {
    i32::from(raw) - 90
}

/// Host target angle to the raw value written to the gateway. Not clamped.
pub fn raw_angle(host: i32) -> i32 {
    host + 90
}

// ── Position state machine ──────────────────────────────────────────

/// Map the motor's operation onto the host's direction of travel.
///
/// Stateless: the current state is always recomputed from the latest
/// status, never tracked incrementally.
pub fn position_state(operation: Operation, invert: bool) -> PositionState {
    match operation {
        Operation::CloseDown if invert => PositionState::Increasing,
        Operation::CloseDown => PositionState::Decreasing,
        Operation::OpenUp if invert => PositionState::Decreasing,
        Operation::OpenUp => PositionState::Increasing,
        Operation::Stop | Operation::StatusQuery | Operation::Unknown(_) => {
            PositionState::Stopped
        }
    }
}

// ── Battery ─────────────────────────────────────────────────────────

/// Charge percentage from the raw centivolt reading.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
pub fn battery_percent(raw_level: u32) -> u8 {
    // fraction is clamped to [0, 1], so the product fits in a u8
    (battery_info(raw_level).fraction * 100.0).round() as u8
}

/// Explicit config override first, then the `voltageMode == 0` heuristic.
pub fn is_battery_powered(config: &BlindConfig, status: &RawStatus) -> bool {
    config
        .is_battery_powered
        .unwrap_or(status.voltage_mode == 0)
}

pub fn is_low_battery(percent: u8, threshold: u8) -> bool {
    percent < threshold
}

// ── Tilt axis ───────────────────────────────────────────────────────

/// Which tilt characteristic pair a blind shape is exposed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TiltAxis {
    Vertical,
    Horizontal,
}

impl TiltAxis {
    /// Total partition of blind shapes into the two axes.
    pub fn for_blind(blind_type: BlindType) -> Self {
        match blind_type {
            BlindType::RollerBlind
            | BlindType::VenetianBlind
            | BlindType::RomanBlind
            | BlindType::HoneycombBlind
            | BlindType::ShangriLaBlind
            | BlindType::Awning
            | BlindType::TopDownBottomUp
            | BlindType::DayNightBlind
            | BlindType::DimmingBlind
            | BlindType::DoubleRoller
            | BlindType::Switch => Self::Vertical,
            BlindType::RollerShutter
            | BlindType::RollerGate
            | BlindType::Curtain
            | BlindType::CurtainLeft
            | BlindType::CurtainRight
            | BlindType::Unknown(_) => Self::Horizontal,
        }
    }

    pub fn current(self) -> Characteristic {
        match self {
            Self::Vertical => Characteristic::CurrentVerticalTiltAngle,
            Self::Horizontal => Characteristic::CurrentHorizontalTiltAngle,
        }
    }

    pub fn target(self) -> Characteristic {
        match self {
            Self::Vertical => Characteristic::TargetVerticalTiltAngle,
            Self::Horizontal => Characteristic::TargetHorizontalTiltAngle,
        }
    }
}

// ── HostView ────────────────────────────────────────────────────────

/// Every host-visible value derived from one raw status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostView {
    pub position: i32,
    pub state: PositionState,
    pub angle: i32,
    pub tilt_axis: TiltAxis,
    pub battery_level: u8,
    pub low_battery: bool,
}

impl HostView {
    pub fn of(status: &RawStatus, config: &BlindConfig) -> Self {
        let invert = config.invert();
        let battery_level = battery_percent(status.battery_level);
        Self {
            position: host_position(status.current_position, invert),
            state: position_state(status.operation, invert),
            angle: host_angle(status.current_angle),
            tilt_axis: TiltAxis::for_blind(status.blind_type),
            battery_level,
            low_battery: is_low_battery(battery_level, config.low_battery_threshold()),
        }
    }
}
