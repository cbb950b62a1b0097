// ── Core error types ──
//
// Domain errors from motionbridge-core. Consumers never see raw gateway
// transport failures; `From<motionbridge_api::Error>` folds them into the
// variants below. `HapStatus` is the narrower vocabulary handed back to the
// accessory host when a characteristic read or write fails.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Gateway errors ───────────────────────────────────────────────
    #[error("Gateway communication failed: {reason}")]
    GatewayUnavailable { reason: String },

    #[error("Gateway timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Gateway rejected the request: {message}")]
    Rejected { message: String },

    #[error("Write commands require a gateway key")]
    ReadOnly,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Device not found: {mac}")]
    DeviceNotFound { mac: String },

    #[error("Invalid gateway payload: {message}")]
    InvalidPayload { message: String },

    // ── Host errors ──────────────────────────────────────────────────
    #[error("Accessory host error: {message}")]
    Host { message: String },
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<motionbridge_api::Error> for CoreError {
    fn from(err: motionbridge_api::Error) -> Self {
        match err {
            motionbridge_api::Error::Communication(reason) => {
                CoreError::GatewayUnavailable { reason }
            }
            motionbridge_api::Error::Timeout { timeout_ms } => CoreError::Timeout { timeout_ms },
            motionbridge_api::Error::Rejected { message } => CoreError::Rejected { message },
            motionbridge_api::Error::MissingKey => CoreError::ReadOnly,
            motionbridge_api::Error::DeviceNotFound { mac } => CoreError::DeviceNotFound { mac },
            motionbridge_api::Error::Deserialization { message, body: _ } => {
                CoreError::InvalidPayload { message }
            }
        }
    }
}

// ── HapStatus ────────────────────────────────────────────────────────

/// Status codes returned to the host for failed characteristic access.
///
/// Numeric values match the HAP status codes so a host bridge can forward
/// them unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HapStatus {
    #[error("service communication failure")]
    ServiceCommunicationFailure,

    #[error("characteristic is read-only")]
    ReadOnlyCharacteristic,

    #[error("characteristic is write-only")]
    WriteOnlyCharacteristic,

    #[error("invalid value in request")]
    InvalidValueInRequest,

    #[error("resource does not exist")]
    ResourceDoesNotExist,
}

impl HapStatus {
    pub fn code(self) -> i32 {
        match self {
            Self::ServiceCommunicationFailure => -70402,
            Self::ReadOnlyCharacteristic => -70404,
            Self::WriteOnlyCharacteristic => -70405,
            Self::InvalidValueInRequest => -70410,
            Self::ResourceDoesNotExist => -70409,
        }
    }
}
