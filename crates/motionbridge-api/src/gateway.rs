// ── Gateway client contract ──
//
// Implemented by the transport layer; consumed by `motionbridge-core`.
// Reads and writes are request/response, reports arrive on a broadcast
// channel whenever a blind changes state.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::error::Error;
use crate::models::{DeviceReport, DeviceType, RawStatus, WriteRequest};

/// Capacity implementations should use for the report channel.
pub const REPORT_CHANNEL_CAPACITY: usize = 256;

/// Async client for one MOTION gateway.
///
/// MAC arguments are in normalized lowercase form.
#[async_trait]
pub trait GatewayClient: Send + Sync {
    /// List every device attached to the gateway with its current status.
    async fn read_all_devices(&self) -> Result<Vec<DeviceReport>, Error>;

    /// Query a single device.
    async fn read_device(&self, mac: &str, device_type: &DeviceType) -> Result<RawStatus, Error>;

    /// Send a command to a single device.
    async fn write_device(
        &self,
        mac: &str,
        device_type: &DeviceType,
        request: WriteRequest,
    ) -> Result<(), Error>;

    /// Subscribe to unsolicited status reports.
    fn subscribe_reports(&self) -> broadcast::Receiver<Arc<DeviceReport>>;

    /// Whether a gateway key is configured. Without one, writes are refused.
    fn has_key(&self) -> bool;
}
