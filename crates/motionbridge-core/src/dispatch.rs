// ── Update dispatcher ──
//
// Given the previously stored status and a new one, decide which host
// characteristics changed and must be pushed. Synchronous and side-effect
// free: the caller pushes `updates` and stores the frozen targets.

use motionbridge_api::RawStatus;

use crate::config::BlindConfig;
use crate::model::{Characteristic, CharacteristicUpdate, LowBatteryStatus, PositionState};
use crate::translate::HostView;

/// Optional characteristic groups enabled on an accessory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub tilt: bool,
    /// Decided once at attachment; see `BlindAccessory::attach`.
    pub battery: bool,
}

/// Outcome of one diff.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dispatch {
    /// Updates in push order.
    pub updates: Vec<CharacteristicUpdate>,
    /// Target position to store, set when the blind came to rest.
    pub target_position: Option<i32>,
    /// Target angle to store, set when the tilt settled while stopped.
    pub target_angle: Option<i32>,
}

impl Dispatch {
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty() && self.target_position.is_none() && self.target_angle.is_none()
    }
}

/// Diff two raw statuses in host terms.
///
/// Every attribute is emitted when its translated value changed, or
/// unconditionally when `initial`. Coming to rest freezes the target
/// position at the current one; with tilt enabled, a stopped blind also
/// freezes its target angle whenever the current angle is pushed.
pub fn diff(
    prev: &RawStatus,
    new: &RawStatus,
    config: &BlindConfig,
    caps: Capabilities,
    initial: bool,
) -> Dispatch {
    let before = HostView::of(prev, config);
    let after = HostView::of(new, config);
    let mut out = Dispatch::default();

    if initial || after.position != before.position {
        out.updates.push(CharacteristicUpdate::new(
            Characteristic::CurrentPosition,
            after.position,
        ));
    }

    let state_changed = after.state != before.state;
    if initial || state_changed {
        out.updates.push(CharacteristicUpdate::new(
            Characteristic::PositionState,
            after.state,
        ));
    }

    let stopped = after.state == PositionState::Stopped;
    if state_changed && stopped {
        out.updates.push(CharacteristicUpdate::new(
            Characteristic::TargetPosition,
            after.position,
        ));
        out.target_position = Some(after.position);
    }

    if caps.tilt {
        // axis follows the blind shape in the new status
        let axis = after.tilt_axis;
        let angle_changed = after.angle != before.angle;
        if initial || angle_changed {
            out.updates
                .push(CharacteristicUpdate::new(axis.current(), after.angle));
        }
        if stopped && (initial || angle_changed || state_changed) {
            out.updates
                .push(CharacteristicUpdate::new(axis.target(), after.angle));
            out.target_angle = Some(after.angle);
        }
    }

    if caps.battery {
        if initial || after.battery_level != before.battery_level {
            out.updates.push(CharacteristicUpdate::new(
                Characteristic::BatteryLevel,
                after.battery_level,
            ));
        }
        if initial || after.low_battery != before.low_battery {
            out.updates.push(CharacteristicUpdate::new(
                Characteristic::StatusLowBattery,
                LowBatteryStatus::from(after.low_battery),
            ));
        }
    }

    out
}
