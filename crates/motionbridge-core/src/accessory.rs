// ── Blind accessory ──
//
// Runtime behavior for one attached blind: serves host reads and writes,
// applies telemetry through the dispatcher, and owns its poller.
//
// The context lock is a std mutex held only for synchronous work. A status
// update (diff, push, store) runs entirely under it so updates apply in
// arrival order; gateway I/O is always awaited with the lock released.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use motionbridge_api::{DeviceType, GatewayClient, RawStatus};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::command::{self, BlindCommand};
use crate::config::BlindConfig;
use crate::dispatch::{self, Capabilities};
use crate::error::{CoreError, HapStatus};
use crate::host::{AccessoryHost, CharacteristicHandler};
use crate::model::{
    AccessoryContext, AccessoryInformation, AccessoryRecord, Characteristic,
    CharacteristicBinding, CharacteristicValue, LowBatteryStatus, MacAddress, Perms, ServiceKind,
    TargetState,
};
use crate::poll::spawn_poller;
use crate::translate::{HostView, TiltAxis, is_battery_powered};

/// Value of the accessory-information Manufacturer characteristic.
pub const MANUFACTURER: &str = "MOTION";

pub struct BlindAccessory {
    uuid: Uuid,
    display_name: String,
    mac: MacAddress,
    device_type: DeviceType,
    config: Arc<BlindConfig>,
    caps: Capabilities,
    /// Axis the tilt characteristics were bound on.
    tilt_axis: TiltAxis,
    writable: bool,
    context: Mutex<AccessoryContext>,
    gateway: Arc<dyn GatewayClient>,
    host: Arc<dyn AccessoryHost>,
}

impl BlindAccessory {
    /// Attach behavior to `record` and start its poller.
    ///
    /// Fills the information service, ensures the window-covering service,
    /// decides the battery capability once, binds characteristic handlers,
    /// seeds missing targets, and pushes the cached status as an initial
    /// update. Must be called inside a Tokio runtime when polling is on.
    pub fn attach(
        record: AccessoryRecord,
        config: Arc<BlindConfig>,
        gateway: Arc<dyn GatewayClient>,
        host: Arc<dyn AccessoryHost>,
        cancel: CancellationToken,
    ) -> AttachedBlind {
        let AccessoryRecord {
            uuid,
            display_name,
            mut context,
        } = record;
        let mac = context.mac.clone();
        let status = context.status.clone();

        let info = AccessoryInformation {
            manufacturer: MANUFACTURER.to_owned(),
            model: status.blind_type.name().to_owned(),
            serial_number: mac.to_string(),
        };
        if let Err(e) = host.set_accessory_information(uuid, &info) {
            error!(%mac, error = %e, "could not set accessory information");
        }

        host.ensure_service(uuid, ServiceKind::WindowCovering);
        host.set_characteristic(
            uuid,
            ServiceKind::WindowCovering,
            Characteristic::Name,
            config.display_name().to_owned().into(),
        );

        let battery = is_battery_powered(&config, &status);
        if battery {
            host.ensure_service(uuid, ServiceKind::Battery);
        } else if host.remove_service(uuid, ServiceKind::Battery) {
            info!(%mac, "removed battery service from mains-powered blind");
        }

        let writable = gateway.has_key();
        if !writable {
            warn!(%mac, "no gateway key configured, blind is read-only");
        }

        let caps = Capabilities {
            tilt: config.tilt(),
            battery,
        };

        let view = HostView::of(&status, &config);
        if context.target.position.is_none() {
            context.target.position = Some(view.position);
        }
        if caps.tilt && context.target.angle.is_none() {
            context.target.angle = Some(view.angle);
        }

        let accessory = Arc::new(Self {
            uuid,
            display_name,
            mac,
            device_type: context.device_type.clone(),
            config,
            caps,
            tilt_axis: view.tilt_axis,
            writable,
            context: Mutex::new(context),
            gateway,
            host,
        });

        accessory
            .host
            .bind_characteristics(uuid, accessory.bindings(), accessory.clone());

        {
            let mut ctx = accessory.lock();
            accessory.apply_locked(&mut ctx, status, true);
        }

        let poller = accessory
            .config
            .poll_interval()
            .map(|period| spawn_poller(Arc::clone(&accessory), period, cancel.clone()));

        info!(
            mac = %accessory.mac,
            %uuid,
            name = accessory.config.display_name(),
            tilt = caps.tilt,
            battery = caps.battery,
            polling = poller.is_some(),
            "accessory attached"
        );

        AttachedBlind {
            accessory,
            cancel,
            poller,
        }
    }

    // ── Accessors ───────────────────────────────────────────────────

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn mac(&self) -> &MacAddress {
        &self.mac
    }

    pub fn device_type(&self) -> &DeviceType {
        &self.device_type
    }

    pub fn config(&self) -> &BlindConfig {
        &self.config
    }

    pub fn capabilities(&self) -> Capabilities {
        self.caps
    }

    pub fn is_writable(&self) -> bool {
        self.writable
    }

    pub fn status(&self) -> RawStatus {
        self.lock().status.clone()
    }

    pub fn target(&self) -> TargetState {
        self.lock().target
    }

    /// Snapshot of the persisted form.
    pub fn record(&self) -> AccessoryRecord {
        AccessoryRecord {
            uuid: self.uuid,
            display_name: self.display_name.clone(),
            context: self.lock().clone(),
        }
    }

    // ── Sync path ───────────────────────────────────────────────────

    /// Apply a fresh status from a report or poll.
    pub fn apply_status(&self, status: RawStatus) {
        debug!(
            mac = %self.mac,
            position = status.current_position,
            angle = status.current_angle,
            operation = ?status.operation,
            battery = status.battery_level,
            "applying status"
        );
        let mut ctx = self.lock();
        self.apply_locked(&mut ctx, status, false);
    }

    /// Read the device once and apply the result.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        debug!(mac = %self.mac, "-> read_device");
        let status = self
            .gateway
            .read_device(self.mac.as_str(), &self.device_type)
            .await?;
        self.apply_status(status);
        Ok(())
    }

    fn apply_locked(&self, ctx: &mut AccessoryContext, status: RawStatus, initial: bool) {
        let out = dispatch::diff(&ctx.status, &status, &self.config, self.caps, initial);

        for update in out.updates {
            debug!(
                mac = %self.mac,
                characteristic = ?update.characteristic,
                value = ?update.value,
                "push"
            );
            self.host.update_characteristic(
                self.uuid,
                update.service(),
                update.characteristic,
                update.value,
            );
        }

        if let Some(position) = out.target_position {
            ctx.target.position = Some(position);
        }
        if let Some(angle) = out.target_angle {
            ctx.target.angle = Some(angle);
        }
        ctx.status = status;
    }

    // ── Command path ────────────────────────────────────────────────

    /// Store the requested target, then write it to the gateway.
    ///
    /// A failed write leaves the stored target in place.
    pub async fn execute(&self, command: BlindCommand) -> Result<(), HapStatus> {
        if !self.writable {
            return Err(HapStatus::ReadOnlyCharacteristic);
        }

        {
            let mut ctx = self.lock();
            match command {
                BlindCommand::SetTargetPosition(hk) => ctx.target.position = Some(hk),
                BlindCommand::SetTargetTiltAngle(hk) => ctx.target.angle = Some(hk),
                BlindCommand::HoldPosition => {}
            }
        }

        command::issue(
            self.gateway.as_ref(),
            &self.mac,
            &self.device_type,
            command,
            self.config.invert(),
        )
        .await
        .map_err(|_| HapStatus::ServiceCommunicationFailure)
    }

    // ── Internals ───────────────────────────────────────────────────

    fn lock(&self) -> MutexGuard<'_, AccessoryContext> {
        self.context.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn bindings(&self) -> Vec<CharacteristicBinding> {
        let (target, hold) = if self.writable {
            (Perms::READ_WRITE_NOTIFY, Perms::WRITE_ONLY)
        } else {
            (Perms::READ_NOTIFY, Perms::NONE)
        };

        let mut bindings = vec![
            CharacteristicBinding::new(Characteristic::CurrentPosition, Perms::READ_NOTIFY),
            CharacteristicBinding::new(Characteristic::PositionState, Perms::READ_NOTIFY),
            CharacteristicBinding::new(Characteristic::TargetPosition, target),
            CharacteristicBinding::new(Characteristic::HoldPosition, hold),
        ];
        if self.caps.tilt {
            bindings.push(CharacteristicBinding::new(
                self.tilt_axis.current(),
                Perms::READ_NOTIFY,
            ));
            bindings.push(CharacteristicBinding::new(self.tilt_axis.target(), target));
        }
        if self.caps.battery {
            bindings.push(CharacteristicBinding::new(
                Characteristic::BatteryLevel,
                Perms::READ_NOTIFY,
            ));
            bindings.push(CharacteristicBinding::new(
                Characteristic::StatusLowBattery,
                Perms::READ_NOTIFY,
            ));
        }
        bindings
    }

    fn read(&self, characteristic: Characteristic) -> Result<CharacteristicValue, HapStatus> {
        let ctx = self.lock();
        let view = HostView::of(&ctx.status, &self.config);

        let value = match characteristic {
            Characteristic::Name => self.config.display_name().to_owned().into(),
            Characteristic::CurrentPosition => view.position.into(),
            Characteristic::PositionState => view.state.into(),
            Characteristic::TargetPosition => ctx.target.position.unwrap_or(view.position).into(),
            Characteristic::HoldPosition => return Err(HapStatus::WriteOnlyCharacteristic),
            Characteristic::CurrentVerticalTiltAngle
            | Characteristic::CurrentHorizontalTiltAngle
                if self.caps.tilt =>
            {
                view.angle.into()
            }
            Characteristic::TargetVerticalTiltAngle
            | Characteristic::TargetHorizontalTiltAngle
                if self.caps.tilt =>
            {
                ctx.target.angle.unwrap_or(view.angle).into()
            }
            Characteristic::BatteryLevel if self.caps.battery => view.battery_level.into(),
            Characteristic::StatusLowBattery if self.caps.battery => {
                LowBatteryStatus::from(view.low_battery).into()
            }
            _ => return Err(HapStatus::ResourceDoesNotExist),
        };
        Ok(value)
    }
}

#[async_trait]
impl CharacteristicHandler for BlindAccessory {
    async fn get(&self, characteristic: Characteristic) -> Result<CharacteristicValue, HapStatus> {
        let value = self.read(characteristic)?;
        debug!(mac = %self.mac, ?characteristic, ?value, "<- get");
        Ok(value)
    }

    async fn set(
        &self,
        characteristic: Characteristic,
        value: CharacteristicValue,
    ) -> Result<(), HapStatus> {
        debug!(mac = %self.mac, ?characteristic, ?value, "-> set");
        if !self.writable {
            return Err(HapStatus::ReadOnlyCharacteristic);
        }
        let command = BlindCommand::from_set(characteristic, &value)?;
        self.execute(command).await
    }
}

// ── AttachedBlind ───────────────────────────────────────────────────

/// Handle to an attached accessory. Detaching stops its poller and
/// releases its characteristic handlers.
pub struct AttachedBlind {
    accessory: Arc<BlindAccessory>,
    cancel: CancellationToken,
    poller: Option<JoinHandle<()>>,
}

impl AttachedBlind {
    pub fn accessory(&self) -> &Arc<BlindAccessory> {
        &self.accessory
    }

    pub fn is_polling(&self) -> bool {
        self.poller.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop polling, unbind handlers, and return the final record.
    pub async fn detach(self) -> AccessoryRecord {
        self.cancel.cancel();
        if let Some(handle) = self.poller {
            if let Err(e) = handle.await {
                warn!(mac = %self.accessory.mac, error = %e, "poller task ended abnormally");
            }
        }
        self.accessory.host.unbind(self.accessory.uuid);
        info!(mac = %self.accessory.mac, "accessory detached");
        self.accessory.record()
    }
}
