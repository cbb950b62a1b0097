// ── Polling supervisor ──
//
// One task per attached accessory. Fixed schedule, no backoff: a failed
// read is logged and the cycle skipped. Cancellation abandons a read that
// is still in flight.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::accessory::BlindAccessory;

/// Spawn the status poller for `accessory`. Runs until `cancel` fires.
pub fn spawn_poller(
    accessory: Arc<BlindAccessory>,
    period: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    debug!(mac = %accessory.mac(), ?period, "starting poller");
    tokio::spawn(poll_task(accessory, period, cancel))
}

async fn poll_task(accessory: Arc<BlindAccessory>, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                // an in-flight read must not hold up cancellation
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    result = accessory.refresh() => {
                        if let Err(e) = result {
                            warn!(mac = %accessory.mac(), error = %e, "status poll failed");
                        }
                    }
                }
            }
        }
    }

    debug!(mac = %accessory.mac(), "poller stopped");
}
