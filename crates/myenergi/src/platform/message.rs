//! Messages FROM entity adapters TO the host.

use tokio::sync::mpsc;
use tracing::warn;

/// Channel the host listens on for re-render requests (unbounded - adapters must not block)
pub type StateUpdateSender = mpsc::UnboundedSender<StateRefresh>;
pub type StateUpdateReceiver = mpsc::UnboundedReceiver<StateRefresh>;

/// Ask the host to re-render an entity's displayed state.
///
/// This is not a data refetch: the coordinator's cached snapshot is reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateRefresh {
    pub unique_id: String,
}

/// Fire-and-forget send; a closed channel only means the host is going away.
pub fn schedule_update(tx: &StateUpdateSender, unique_id: &str) {
    let msg = StateRefresh {
        unique_id: unique_id.to_string(),
    };
    if let Err(e) = tx.send(msg) {
        warn!("Failed to send StateRefresh for {}: {}", unique_id, e);
    }
}
