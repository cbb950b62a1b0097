// ── Platform ──
//
// Owns the gateway, the host, the blind config table, and every accessory
// the host knows about. Cached records are loaded first, then discovery
// and unsolicited reports reconcile them against what the gateway sees.

use std::collections::HashSet;
use std::sync::{Arc, MutexGuard, PoisonError};

use dashmap::DashMap;
use motionbridge_api::{DeviceReport, GatewayClient};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::accessory::{AttachedBlind, BlindAccessory};
use crate::config::PlatformConfig;
use crate::error::CoreError;
use crate::host::AccessoryHost;
use crate::model::{AccessoryRecord, MacAddress};
use crate::reconcile::{Discovered, PassKind, ReconcilePlan, SessionWindow, reconcile};

/// Counts from one applied reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiscoverySummary {
    pub discovered: usize,
    pub created: usize,
    pub updated: usize,
    pub removed: usize,
}

/// The bridge runtime. Cheaply cloneable.
#[derive(Clone)]
pub struct Platform {
    inner: Arc<PlatformInner>,
}

struct PlatformInner {
    config: PlatformConfig,
    gateway: Arc<dyn GatewayClient>,
    host: Arc<dyn AccessoryHost>,
    accessories: DashMap<Uuid, AccessoryEntry>,
    window: std::sync::Mutex<SessionWindow>,
    /// Serializes reconciliation passes.
    pass_lock: Mutex<()>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

/// A known accessory. `attached` is `None` for a cached record the
/// gateway has not confirmed yet.
struct AccessoryEntry {
    record: AccessoryRecord,
    attached: Option<AttachedBlind>,
}

impl AccessoryEntry {
    fn snapshot(&self) -> AccessoryRecord {
        self.attached
            .as_ref()
            .map_or_else(|| self.record.clone(), |a| a.accessory().record())
    }
}

impl Platform {
    pub fn new(
        config: PlatformConfig,
        gateway: Arc<dyn GatewayClient>,
        host: Arc<dyn AccessoryHost>,
    ) -> Self {
        info!(
            name = config.name.as_deref().unwrap_or("motionbridge"),
            blinds = config.blinds.len(),
            "initializing platform"
        );
        Self {
            inner: Arc::new(PlatformInner {
                config,
                gateway,
                host,
                accessories: DashMap::new(),
                window: std::sync::Mutex::new(SessionWindow::new()),
                pass_lock: Mutex::new(()),
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn config(&self) -> &PlatformConfig {
        &self.inner.config
    }

    // ── Lifecycle ───────────────────────────────────────────────────

    /// Load a record persisted by the host. Call before [`launch`](Self::launch).
    pub fn configure_accessory(&self, record: AccessoryRecord) {
        if self.inner.accessories.contains_key(&record.uuid) {
            warn!(mac = %record.mac(), "accessory already loaded, ignoring cached copy");
            return;
        }
        info!(name = %record.display_name, mac = %record.mac(), "loading accessory from cache");
        self.inner.accessories.insert(
            record.uuid,
            AccessoryEntry {
                record,
                attached: None,
            },
        );
    }

    /// Start listening for reports and run the first discovery pass.
    ///
    /// A failed discovery is logged and leaves the cached set untouched.
    pub async fn launch(&self) {
        let rx = self.inner.gateway.subscribe_reports();
        let handle = tokio::spawn(report_task(self.clone(), rx, self.inner.cancel.clone()));
        self.inner.task_handles.lock().await.push(handle);

        match self.discover_devices().await {
            Ok(summary) => info!(
                discovered = summary.discovered,
                created = summary.created,
                updated = summary.updated,
                removed = summary.removed,
                "discovery complete"
            ),
            Err(e) => error!(error = %e, "failed fetching list of blinds"),
        }
    }

    /// Cancel the report listener and every poller, then persist the final
    /// state of each attached accessory.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        drop(handles);

        let uuids: Vec<Uuid> = self.inner.accessories.iter().map(|e| *e.key()).collect();
        let mut records = Vec::new();
        for uuid in uuids {
            let attached = self
                .inner
                .accessories
                .get_mut(&uuid)
                .and_then(|mut e| e.attached.take());
            let Some(attached) = attached else { continue };

            let record = attached.detach().await;
            if let Some(mut entry) = self.inner.accessories.get_mut(&uuid) {
                entry.record = record.clone();
            }
            records.push(record);
        }

        if !records.is_empty() {
            self.inner.host.update_accessories(&records);
        }
        info!("platform shut down");
    }

    // ── Reconciliation ──────────────────────────────────────────────

    /// Full discovery pass against the gateway's device list.
    ///
    /// Opens a new session window. If the bulk read fails nothing changes.
    pub async fn discover_devices(&self) -> Result<DiscoverySummary, CoreError> {
        debug!("-> read_all_devices");
        let devices = self.inner.gateway.read_all_devices().await?;
        debug!(count = devices.len(), "<- read_all_devices");

        let (mut summary, retired) = {
            let _pass = self.inner.pass_lock.lock().await;
            self.window().begin_pass();

            let plan = reconcile(&devices, &self.known_uuids(), PassKind::Full, |mac| {
                self.inner.host.uuid_for(mac)
            });
            self.apply_plan(plan)
        };
        self.retire(retired).await;
        summary.discovered = devices.len();
        Ok(summary)
    }

    /// Handle one unsolicited report.
    ///
    /// An attached accessory takes the status as telemetry. Any other MAC
    /// is reconciled, at most once per session window.
    pub async fn handle_report(&self, report: &DeviceReport) {
        let mac = MacAddress::new(&report.mac);
        let uuid = self.inner.host.uuid_for(&mac);

        if let Some(accessory) = self.attached(uuid) {
            accessory.apply_status(report.data.clone());
            return;
        }

        debug!(%mac, device_type = %report.device_type, "report from unattached device");
        let (_, retired) = {
            let _pass = self.inner.pass_lock.lock().await;
            let plan = reconcile(
                std::iter::once(report),
                &self.known_uuids(),
                PassKind::Report,
                |mac| self.inner.host.uuid_for(mac),
            );
            self.apply_plan(plan)
        };
        self.retire(retired).await;
    }

    /// Apply creates and updates, and take removed entries out of the
    /// registry. The caller retires them once the pass lock is released.
    fn apply_plan(&self, plan: ReconcilePlan) -> (DiscoverySummary, Vec<AccessoryEntry>) {
        let mut summary = DiscoverySummary::default();

        for device in plan.to_create {
            if !self.window().mark(&device.mac) {
                continue;
            }
            self.create_accessory(device);
            summary.created += 1;
        }

        for device in plan.to_update {
            if !self.window().mark(&device.mac) {
                continue;
            }
            self.update_accessory(device);
            summary.updated += 1;
        }

        if !plan.to_remove.is_empty() {
            warn!(
                count = plan.to_remove.len(),
                "removing accessories that are no longer present"
            );
        }
        let mut retired = Vec::with_capacity(plan.to_remove.len());
        for uuid in plan.to_remove {
            let Some((_, entry)) = self.inner.accessories.remove(&uuid) else {
                continue;
            };
            // held in the window until unregistered
            self.window().mark(entry.record.mac());
            retired.push(entry);
        }
        summary.removed = retired.len();

        (summary, retired)
    }

    /// Stop, unregister and forget removed accessories.
    async fn retire(&self, entries: Vec<AccessoryEntry>) {
        if entries.is_empty() {
            return;
        }
        let mut removed = Vec::with_capacity(entries.len());
        for entry in entries {
            let record = match entry.attached {
                Some(attached) => attached.detach().await,
                None => entry.record,
            };
            warn!(mac = %record.mac(), uuid = %record.uuid, "accessory removed");
            removed.push(record);
        }
        self.inner.host.unregister_accessories(&removed);

        let mut window = self.window();
        for record in &removed {
            window.forget(record.mac());
        }
    }

    fn create_accessory(&self, device: Discovered) {
        info!(
            mac = %device.mac,
            uuid = %device.uuid,
            device_type = %device.device_type,
            blind_type = device.status.blind_type.name(),
            "adding new accessory"
        );
        let record =
            AccessoryRecord::new(device.uuid, device.mac, device.device_type, device.status);
        let attached = self.attach(record);
        let record = attached.accessory().record();

        self.inner
            .host
            .register_accessories(std::slice::from_ref(&record));
        self.inner.accessories.insert(
            record.uuid,
            AccessoryEntry {
                record,
                attached: Some(attached),
            },
        );
    }

    fn update_accessory(&self, device: Discovered) {
        let Some(mut entry) = self.inner.accessories.get_mut(&device.uuid) else {
            return;
        };

        if let Some(attached) = &entry.attached {
            attached.accessory().apply_status(device.status);
            let record = attached.accessory().record();
            self.inner
                .host
                .update_accessories(std::slice::from_ref(&record));
            entry.record = record;
            return;
        }

        info!(
            name = %entry.record.display_name,
            mac = %device.mac,
            "restoring existing accessory from cache"
        );
        entry.record.context.status = device.status;
        entry.record.context.device_type = device.device_type;
        self.inner
            .host
            .update_accessories(std::slice::from_ref(&entry.record));
        let attached = self.attach(entry.record.clone());
        entry.attached = Some(attached);
    }

    fn attach(&self, record: AccessoryRecord) -> AttachedBlind {
        let config = self.inner.config.blinds.resolve(record.mac());
        BlindAccessory::attach(
            record,
            config,
            Arc::clone(&self.inner.gateway),
            Arc::clone(&self.inner.host),
            self.inner.cancel.child_token(),
        )
    }

    // ── Snapshots ───────────────────────────────────────────────────

    /// Every known record, sorted by MAC.
    pub fn records(&self) -> Vec<AccessoryRecord> {
        let mut records: Vec<_> = self
            .inner
            .accessories
            .iter()
            .map(|e| e.value().snapshot())
            .collect();
        records.sort_by(|a, b| a.mac().cmp(b.mac()));
        records
    }

    pub fn record_by_mac(&self, mac: &MacAddress) -> Option<AccessoryRecord> {
        let uuid = self.inner.host.uuid_for(mac);
        self.inner.accessories.get(&uuid).map(|e| e.snapshot())
    }

    /// The live accessory for `mac`, if attached.
    pub fn accessory(&self, mac: &MacAddress) -> Option<Arc<BlindAccessory>> {
        self.attached(self.inner.host.uuid_for(mac))
    }

    fn attached(&self, uuid: Uuid) -> Option<Arc<BlindAccessory>> {
        self.inner
            .accessories
            .get(&uuid)
            .and_then(|e| e.attached.as_ref().map(|a| Arc::clone(a.accessory())))
    }

    fn known_uuids(&self) -> HashSet<Uuid> {
        self.inner.accessories.iter().map(|e| *e.key()).collect()
    }

    fn window(&self) -> MutexGuard<'_, SessionWindow> {
        self.inner
            .window
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

// ── Background tasks ────────────────────────────────────────────────

/// Feed gateway reports into the platform until cancelled.
async fn report_task(
    platform: Platform,
    mut rx: broadcast::Receiver<Arc<DeviceReport>>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            report = rx.recv() => match report {
                Ok(report) => platform.handle_report(&report).await,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "report listener lagged, reports dropped");
                }
                Err(RecvError::Closed) => {
                    debug!("report channel closed");
                    break;
                }
            },
        }
    }
}
