// ── Command issuer ──
//
// Host-originated writes. Each command is translated back into vendor
// units and sent to the gateway as a single write; telemetry is never
// updated optimistically, the next report or poll carries the outcome.

use motionbridge_api::{DeviceType, GatewayClient, Operation, WriteRequest};
use tracing::{debug, error};

use crate::error::{CoreError, HapStatus};
use crate::model::{Characteristic, CharacteristicValue, MacAddress};
use crate::translate::{raw_angle, raw_position};

/// A write the host can request on a blind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlindCommand {
    /// Host position, 0–100.
    SetTargetPosition(i32),
    /// Host angle, −90..90.
    SetTargetTiltAngle(i32),
    HoldPosition,
}

impl BlindCommand {
    /// Interpret a host `set` on `characteristic`.
    pub fn from_set(
        characteristic: Characteristic,
        value: &CharacteristicValue,
    ) -> Result<Self, HapStatus> {
        let int = || value.as_int().ok_or(HapStatus::InvalidValueInRequest);
        match characteristic {
            Characteristic::TargetPosition => Ok(Self::SetTargetPosition(int()?)),
            Characteristic::TargetVerticalTiltAngle
            | Characteristic::TargetHorizontalTiltAngle => Ok(Self::SetTargetTiltAngle(int()?)),
            Characteristic::HoldPosition => Ok(Self::HoldPosition),
            _ => Err(HapStatus::ReadOnlyCharacteristic),
        }
    }

    /// Gateway payload for this command. Values are not clamped.
    pub fn to_write_request(self, invert: bool) -> WriteRequest {
        match self {
            Self::SetTargetPosition(hk) => WriteRequest {
                target_position: Some(raw_position(hk, invert)),
                ..WriteRequest::default()
            },
            Self::SetTargetTiltAngle(hk) => WriteRequest {
                target_angle: Some(raw_angle(hk)),
                ..WriteRequest::default()
            },
            Self::HoldPosition => WriteRequest {
                operation: Some(Operation::Stop),
                ..WriteRequest::default()
            },
        }
    }
}

/// Send `command` to the blind at `mac`.
pub async fn issue(
    gateway: &dyn GatewayClient,
    mac: &MacAddress,
    device_type: &DeviceType,
    command: BlindCommand,
    invert: bool,
) -> Result<(), CoreError> {
    let request = command.to_write_request(invert);
    debug!(%mac, ?command, ?request, "-> write_device");

    match gateway.write_device(mac.as_str(), device_type, request).await {
        Ok(()) => {
            debug!(%mac, ?command, "<- write_device ok");
            Ok(())
        }
        Err(e) => {
            error!(%mac, ?command, error = %e, "write_device failed");
            Err(e.into())
        }
    }
}
