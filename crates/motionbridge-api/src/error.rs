use thiserror::Error;

/// Top-level error type for the `motionbridge-api` crate.
///
/// Every failure a gateway client can surface: transport, timeouts,
/// gateway-side rejections and malformed payloads. `motionbridge-core`
/// maps these into domain errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// Socket-level failure (unreachable gateway, send error, etc.)
    #[error("Gateway communication failed: {0}")]
    Communication(String),

    /// No response within the client's deadline.
    #[error("Gateway request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    // ── Gateway ─────────────────────────────────────────────────────
    /// The gateway answered with an error payload.
    #[error("Gateway rejected request: {message}")]
    Rejected { message: String },

    /// A write was attempted without a configured gateway key.
    #[error("Gateway key required for write commands")]
    MissingKey,

    /// The gateway does not know the addressed device.
    #[error("Device not found on gateway: {mac}")]
    DeviceNotFound { mac: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON payload failed to parse, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if retrying on the next cycle might succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Communication(_) | Self::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        assert!(Error::Communication("reset".into()).is_transient());
        assert!(Error::Timeout { timeout_ms: 3000 }.is_transient());
        assert!(!Error::MissingKey.is_transient());
        assert!(
            !Error::Rejected {
                message: "bad token".into()
            }
            .is_transient()
        );
    }
}
