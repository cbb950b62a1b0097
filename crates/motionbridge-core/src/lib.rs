// motionbridge-core: State sync and reconciliation between a MOTION gateway and an accessory host.

pub mod accessory;
pub mod command;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod host;
pub mod model;
pub mod platform;
pub mod poll;
pub mod reconcile;
pub mod translate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use accessory::{AttachedBlind, BlindAccessory, MANUFACTURER};
pub use command::BlindCommand;
pub use config::{BlindConfig, BlindConfigTable, PlatformConfig};
pub use dispatch::{Capabilities, Dispatch};
pub use error::{CoreError, HapStatus};
pub use host::{AccessoryHost, CharacteristicHandler};
pub use platform::{DiscoverySummary, Platform};
pub use reconcile::{PassKind, ReconcilePlan, SessionWindow};
pub use translate::{HostView, TiltAxis};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    AccessoryContext, AccessoryInformation, AccessoryRecord, Characteristic,
    CharacteristicBinding, CharacteristicUpdate, CharacteristicValue, LowBatteryStatus,
    MacAddress, Perms, PositionState, ServiceKind, TargetState,
};

// Vendor vocabulary consumers need alongside the core types.
pub use motionbridge_api::{
    BlindType, DeviceReport, DeviceType, GatewayClient, Operation, RawStatus, WriteRequest,
};
