// ── Accessory host contract ──
//
// The accessory/characteristic object model and its persistence belong to
// the host. The core drives it through this trait and serves characteristic
// reads and writes through `CharacteristicHandler`.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{CoreError, HapStatus};
use crate::model::{
    AccessoryInformation, AccessoryRecord, Characteristic, CharacteristicBinding,
    CharacteristicValue, MacAddress, ServiceKind,
};

/// Serves host-originated reads and writes for one accessory.
#[async_trait]
pub trait CharacteristicHandler: Send + Sync {
    async fn get(&self, characteristic: Characteristic) -> Result<CharacteristicValue, HapStatus>;

    async fn set(
        &self,
        characteristic: Characteristic,
        value: CharacteristicValue,
    ) -> Result<(), HapStatus>;
}

/// Operations the core needs from the accessory host.
///
/// Calls are synchronous and must not block; the core may invoke them while
/// holding an accessory's context lock.
pub trait AccessoryHost: Send + Sync {
    /// Stable accessory identity for a MAC.
    fn uuid_for(&self, mac: &MacAddress) -> Uuid {
        mac.accessory_uuid()
    }

    // ── Records ──────────────────────────────────────────────────────

    fn register_accessories(&self, records: &[AccessoryRecord]);

    /// Persist changed context for already-registered records.
    fn update_accessories(&self, records: &[AccessoryRecord]);

    fn unregister_accessories(&self, records: &[AccessoryRecord]);

    // ── Services ─────────────────────────────────────────────────────

    /// Fill the accessory-information service.
    fn set_accessory_information(
        &self,
        uuid: Uuid,
        info: &AccessoryInformation,
    ) -> Result<(), CoreError>;

    /// Create the service if the accessory does not have it yet.
    fn ensure_service(&self, uuid: Uuid, service: ServiceKind);

    /// Returns `true` if a service was removed.
    fn remove_service(&self, uuid: Uuid, service: ServiceKind) -> bool;

    // ── Characteristics ──────────────────────────────────────────────

    /// Set a static characteristic value without notifying.
    fn set_characteristic(
        &self,
        uuid: Uuid,
        service: ServiceKind,
        characteristic: Characteristic,
        value: CharacteristicValue,
    );

    /// Route reads and writes of `bindings` on `uuid` to `handler`.
    fn bind_characteristics(
        &self,
        uuid: Uuid,
        bindings: Vec<CharacteristicBinding>,
        handler: Arc<dyn CharacteristicHandler>,
    );

    /// Drop every handler bound for `uuid`.
    fn unbind(&self, uuid: Uuid);

    /// Push a changed value to subscribers.
    fn update_characteristic(
        &self,
        uuid: Uuid,
        service: ServiceKind,
        characteristic: Characteristic,
        value: CharacteristicValue,
    );
}
