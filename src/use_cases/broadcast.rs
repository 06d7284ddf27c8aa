// Best-effort fan-out of the per-tick snapshot.

use super::registry::ConnectionRegistry;
use super::types::{EncodeSnapshot, WorldUpdate};
use crate::domain::GameState;
use axum::extract::ws::Utf8Bytes;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, error};

/// Result of one non-blocking send attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Delivered,
    // Outbound queue is full; the frame is dropped for this tick only.
    SkippedNotReady,
    // Receiver is gone; the connection was purged from the registry.
    FailedRemoved,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    pub delivered: usize,
    pub skipped: usize,
    pub removed: Vec<u64>,
}

impl PublishReport {
    fn record(&mut self, conn_id: u64, outcome: SendOutcome) {
        match outcome {
            SendOutcome::Delivered => self.delivered += 1,
            SendOutcome::SkippedNotReady => self.skipped += 1,
            SendOutcome::FailedRemoved => self.removed.push(conn_id),
        }
    }
}

/// Attempts to queue `frame` without waiting.
pub fn try_deliver(outbound: &mpsc::Sender<Utf8Bytes>, frame: &Utf8Bytes) -> SendOutcome {
    match outbound.try_send(frame.clone()) {
        Ok(()) => SendOutcome::Delivered,
        Err(TrySendError::Full(_)) => SendOutcome::SkippedNotReady,
        Err(TrySendError::Closed(_)) => SendOutcome::FailedRemoved,
    }
}

/// Serializes the snapshot once and offers it to every live connection.
///
/// Does nothing at all when nobody is connected.
pub fn publish(
    state: &GameState,
    registry: &mut ConnectionRegistry,
    encode: EncodeSnapshot,
) -> PublishReport {
    let mut report = PublishReport::default();
    if registry.is_empty() {
        return report;
    }

    let update = WorldUpdate {
        state: state.clone(),
        player_count: registry.len(),
        active_sides: registry.active_sides(),
    };
    let frame = match encode(&update) {
        Ok(frame) => frame,
        Err(e) => {
            error!(error = ?e, "failed to serialize world update");
            return report;
        }
    };

    for (conn_id, entry) in registry.entries() {
        report.record(conn_id, try_deliver(&entry.outbound, &frame));
    }

    for &conn_id in &report.removed {
        registry.disconnect(conn_id);
        debug!(conn_id, "dropped dead connection during broadcast");
    }

    report
}
