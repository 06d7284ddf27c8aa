use crate::use_cases::GameEvent;
use tokio::sync::mpsc;

#[derive(Clone)]
pub struct AppState {
    // Connects, disconnects and moves flowing into the world task.
    pub event_tx: mpsc::Sender<GameEvent>,
    // Per-connection outbound queue depth; a full queue skips snapshots.
    pub outbound_capacity: usize,
}
