// ── Domain model ──

pub mod accessory;
pub mod characteristic;
pub mod mac;

pub use accessory::{AccessoryContext, AccessoryInformation, AccessoryRecord, TargetState};
pub use characteristic::{
    Characteristic, CharacteristicBinding, CharacteristicUpdate, CharacteristicValue,
    LowBatteryStatus, Perms, PositionState, ServiceKind,
};
pub use mac::MacAddress;
