// motionbridge-api: Vendor vocabulary and client contract for MOTION blind gateways.
//
// The wire protocol itself (multicast discovery, AES token handshake, UDP
// framing) lives behind `GatewayClient`; this crate only fixes the shapes
// that cross that boundary.

pub mod battery;
pub mod error;
pub mod gateway;
pub mod models;

pub use battery::{BatteryInfo, battery_info};
pub use error::Error;
pub use gateway::GatewayClient;
pub use models::{
    BlindType, DeviceReport, DeviceType, LimitsState, Operation, RawStatus, WirelessMode,
    WriteRequest,
};
