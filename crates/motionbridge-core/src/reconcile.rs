// ── Device reconciliation ──
//
// Matches what the gateway reports against the accessory identities the
// host already knows. Pure planning only; `Platform` applies the plan.

use std::collections::{HashMap, HashSet};

use motionbridge_api::{DeviceReport, DeviceType, RawStatus};
use uuid::Uuid;

use crate::model::MacAddress;

/// Whether a pass saw the gateway's whole device list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    /// Bulk discovery. Known identities missing from it are removed.
    Full,
    /// A single unsolicited report. Never removes anything.
    Report,
}

/// A discovered device, keyed for the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovered {
    pub uuid: Uuid,
    pub mac: MacAddress,
    pub device_type: DeviceType,
    pub status: RawStatus,
}

/// The actions one pass produces.
///
/// Apply `to_create` and `to_update` before `to_remove`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    pub to_create: Vec<Discovered>,
    pub to_update: Vec<Discovered>,
    pub to_remove: Vec<Uuid>,
}

impl ReconcilePlan {
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_update.is_empty() && self.to_remove.is_empty()
    }
}

/// Plan create/update/remove actions for one pass.
///
/// A MAC listed more than once yields a single action; the first entry
/// wins. `to_remove` is sorted so the plan is deterministic.
pub fn reconcile<'a, I, F>(
    discovered: I,
    known: &HashSet<Uuid>,
    pass: PassKind,
    uuid_for: F,
) -> ReconcilePlan
where
    I: IntoIterator<Item = &'a DeviceReport>,
    F: Fn(&MacAddress) -> Uuid,
{
    let mut plan = ReconcilePlan::default();
    let mut present: HashSet<Uuid> = HashSet::new();

    for report in discovered {
        let mac = MacAddress::new(&report.mac);
        let uuid = uuid_for(&mac);
        if !present.insert(uuid) {
            continue;
        }

        let entry = Discovered {
            uuid,
            mac,
            device_type: report.device_type.clone(),
            status: report.data.clone(),
        };
        if known.contains(&uuid) {
            plan.to_update.push(entry);
        } else {
            plan.to_create.push(entry);
        }
    }

    if pass == PassKind::Full {
        plan.to_remove = known.difference(&present).copied().collect();
        plan.to_remove.sort_unstable();
    }

    plan
}

// ── SessionWindow ───────────────────────────────────────────────────

/// Dedupes reconciliation work per MAC within one discovery window.
///
/// Every full pass opens a new window. A MAC is processed at most once per
/// window; forgetting a MAC (on removal) lets it be processed again.
#[derive(Debug, Default)]
pub struct SessionWindow {
    generation: u64,
    seen: HashMap<MacAddress, u64>,
}

impl SessionWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new window and return its generation.
    pub fn begin_pass(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Record `mac` in the current window. Returns `false` if it was
    /// already recorded there.
    pub fn mark(&mut self, mac: &MacAddress) -> bool {
        match self.seen.insert(mac.clone(), self.generation) {
            Some(previous) => previous != self.generation,
            None => true,
        }
    }

    pub fn contains(&self, mac: &MacAddress) -> bool {
        self.seen.get(mac) == Some(&self.generation)
    }

    pub fn forget(&mut self, mac: &MacAddress) {
        self.seen.remove(mac);
    }
}
