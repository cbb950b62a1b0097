// In-memory gateway and accessory host shared by the integration tests.

#![allow(dead_code, clippy::unwrap_used)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use motionbridge_api::gateway::REPORT_CHANNEL_CAPACITY;
use motionbridge_api::{DeviceReport, DeviceType, Error, GatewayClient, RawStatus, WriteRequest};
use motionbridge_core::{
    AccessoryHost, AccessoryInformation, AccessoryRecord, BlindConfig, BlindConfigTable,
    Characteristic, CharacteristicBinding, CharacteristicHandler, CharacteristicValue,
    CoreError, MacAddress, Platform, PlatformConfig, ServiceKind,
};
use tokio::sync::broadcast;
use uuid::Uuid;

// ── FakeGateway ─────────────────────────────────────────────────────

pub struct FakeGateway {
    key: bool,
    pub devices: Mutex<Vec<DeviceReport>>,
    pub statuses: Mutex<HashMap<String, RawStatus>>,
    pub writes: Mutex<Vec<(String, WriteRequest)>>,
    pub reads: AtomicUsize,
    pub fail_bulk: AtomicBool,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
    /// Single reads take this long to answer.
    pub read_delay_ms: AtomicU64,
    reports: broadcast::Sender<Arc<DeviceReport>>,
}

impl FakeGateway {
    pub fn new() -> Arc<Self> {
        Self::with_key(true)
    }

    pub fn with_key(key: bool) -> Arc<Self> {
        let (reports, _) = broadcast::channel(REPORT_CHANNEL_CAPACITY);
        Arc::new(Self {
            key,
            devices: Mutex::new(Vec::new()),
            statuses: Mutex::new(HashMap::new()),
            writes: Mutex::new(Vec::new()),
            reads: AtomicUsize::new(0),
            fail_bulk: AtomicBool::new(false),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            read_delay_ms: AtomicU64::new(0),
            reports,
        })
    }

    /// Make `mac` appear in bulk reads and answer single reads with `status`.
    pub fn add_device(&self, mac: &str, status: RawStatus) {
        self.devices.lock().unwrap().push(report(mac, status.clone()));
        self.set_status(mac, status);
    }

    pub fn set_status(&self, mac: &str, status: RawStatus) {
        self.statuses
            .lock()
            .unwrap()
            .insert(mac.to_lowercase(), status);
    }

    pub fn send_report(&self, report: DeviceReport) {
        let _ = self.reports.send(Arc::new(report));
    }

    pub fn writes(&self) -> Vec<(String, WriteRequest)> {
        self.writes.lock().unwrap().clone()
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GatewayClient for FakeGateway {
    async fn read_all_devices(&self) -> Result<Vec<DeviceReport>, Error> {
        if self.fail_bulk.load(Ordering::SeqCst) {
            return Err(Error::Timeout { timeout_ms: 3000 });
        }
        Ok(self.devices.lock().unwrap().clone())
    }

    async fn read_device(&self, mac: &str, _device_type: &DeviceType) -> Result<RawStatus, Error> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let delay = self.read_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::Communication("no answer".into()));
        }
        self.statuses
            .lock()
            .unwrap()
            .get(mac)
            .cloned()
            .ok_or_else(|| Error::DeviceNotFound { mac: mac.into() })
    }

    async fn write_device(
        &self,
        mac: &str,
        _device_type: &DeviceType,
        request: WriteRequest,
    ) -> Result<(), Error> {
        self.writes.lock().unwrap().push((mac.into(), request));
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Communication("write not acknowledged".into()));
        }
        Ok(())
    }

    fn subscribe_reports(&self) -> broadcast::Receiver<Arc<DeviceReport>> {
        self.reports.subscribe()
    }

    fn has_key(&self) -> bool {
        self.key
    }
}

// ── FakeHost ────────────────────────────────────────────────────────

type Bound = (Vec<CharacteristicBinding>, Arc<dyn CharacteristicHandler>);

#[derive(Default)]
pub struct FakeHost {
    pub registered: Mutex<Vec<AccessoryRecord>>,
    pub updated: Mutex<Vec<AccessoryRecord>>,
    pub unregistered: Mutex<Vec<AccessoryRecord>>,
    pub info: Mutex<HashMap<Uuid, AccessoryInformation>>,
    pub services: Mutex<HashMap<Uuid, HashSet<ServiceKind>>>,
    pub statics: Mutex<Vec<(Uuid, Characteristic, CharacteristicValue)>>,
    pub bound: Mutex<HashMap<Uuid, Bound>>,
    pub pushes: Mutex<Vec<(Uuid, Characteristic, CharacteristicValue)>>,
    pub fail_info: AtomicBool,
}

impl FakeHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn pushes_for(&self, uuid: Uuid) -> Vec<(Characteristic, CharacteristicValue)> {
        self.pushes
            .lock()
            .unwrap()
            .iter()
            .filter(|(u, _, _)| *u == uuid)
            .map(|(_, c, v)| (*c, v.clone()))
            .collect()
    }

    pub fn clear_pushes(&self) {
        self.pushes.lock().unwrap().clear();
    }

    pub fn handler(&self, uuid: Uuid) -> Arc<dyn CharacteristicHandler> {
        Arc::clone(&self.bound.lock().unwrap()[&uuid].1)
    }

    pub fn binding(&self, uuid: Uuid, characteristic: Characteristic) -> Option<CharacteristicBinding> {
        self.bound
            .lock()
            .unwrap()
            .get(&uuid)?
            .0
            .iter()
            .find(|b| b.characteristic == characteristic)
            .copied()
    }

    pub fn is_bound(&self, uuid: Uuid) -> bool {
        self.bound.lock().unwrap().contains_key(&uuid)
    }

    pub fn has_service(&self, uuid: Uuid, service: ServiceKind) -> bool {
        self.services
            .lock()
            .unwrap()
            .get(&uuid)
            .is_some_and(|s| s.contains(&service))
    }

    pub fn unregistered_uuids(&self) -> Vec<Uuid> {
        self.unregistered.lock().unwrap().iter().map(|r| r.uuid).collect()
    }

    pub fn updated_uuids(&self) -> Vec<Uuid> {
        self.updated.lock().unwrap().iter().map(|r| r.uuid).collect()
    }
}

impl AccessoryHost for FakeHost {
    fn register_accessories(&self, records: &[AccessoryRecord]) {
        self.registered.lock().unwrap().extend_from_slice(records);
    }

    fn update_accessories(&self, records: &[AccessoryRecord]) {
        self.updated.lock().unwrap().extend_from_slice(records);
    }

    fn unregister_accessories(&self, records: &[AccessoryRecord]) {
        self.unregistered.lock().unwrap().extend_from_slice(records);
    }

    fn set_accessory_information(
        &self,
        uuid: Uuid,
        info: &AccessoryInformation,
    ) -> Result<(), CoreError> {
        if self.fail_info.load(Ordering::SeqCst) {
            return Err(CoreError::Host {
                message: "AccessoryInformation service missing".into(),
            });
        }
        self.info.lock().unwrap().insert(uuid, info.clone());
        Ok(())
    }

    fn ensure_service(&self, uuid: Uuid, service: ServiceKind) {
        self.services
            .lock()
            .unwrap()
            .entry(uuid)
            .or_default()
            .insert(service);
    }

    fn remove_service(&self, uuid: Uuid, service: ServiceKind) -> bool {
        self.services
            .lock()
            .unwrap()
            .get_mut(&uuid)
            .is_some_and(|s| s.remove(&service))
    }

    fn set_characteristic(
        &self,
        uuid: Uuid,
        _service: ServiceKind,
        characteristic: Characteristic,
        value: CharacteristicValue,
    ) {
        self.statics
            .lock()
            .unwrap()
            .push((uuid, characteristic, value));
    }

    fn bind_characteristics(
        &self,
        uuid: Uuid,
        bindings: Vec<CharacteristicBinding>,
        handler: Arc<dyn CharacteristicHandler>,
    ) {
        self.bound.lock().unwrap().insert(uuid, (bindings, handler));
    }

    fn unbind(&self, uuid: Uuid) {
        self.bound.lock().unwrap().remove(&uuid);
    }

    fn update_characteristic(
        &self,
        uuid: Uuid,
        _service: ServiceKind,
        characteristic: Characteristic,
        value: CharacteristicValue,
    ) {
        self.pushes
            .lock()
            .unwrap()
            .push((uuid, characteristic, value));
    }
}

// ── Builders ────────────────────────────────────────────────────────

pub fn report(mac: &str, status: RawStatus) -> DeviceReport {
    DeviceReport {
        mac: mac.into(),
        device_type: DeviceType::Blind,
        data: status,
    }
}

pub fn uuid_of(mac: &str) -> Uuid {
    MacAddress::new(mac).accessory_uuid()
}

pub fn blind(mac: &str) -> BlindConfig {
    let mut cfg = BlindConfig::for_mac(MacAddress::new(mac));
    cfg.poll_interval = Some(0);
    cfg
}

pub fn platform(
    gateway: &Arc<FakeGateway>,
    host: &Arc<FakeHost>,
    blinds: Vec<BlindConfig>,
) -> Platform {
    let config = PlatformConfig {
        name: Some("test".into()),
        blinds: BlindConfigTable::from_configs(blinds),
    };
    Platform::new(config, gateway.clone(), host.clone())
}

/// Let spawned tasks drain their queues.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}
