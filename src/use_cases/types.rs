// Use-case level inputs/outputs for the world task.

use super::registry::Assignment;
use crate::domain::{GameState, Side};
use axum::extract::ws::Utf8Bytes;
use tokio::sync::{mpsc, oneshot};

#[derive(Debug)]
pub enum GameEvent {
    // A socket was accepted; the world replies with the id and role it assigned.
    Connect {
        outbound: mpsc::Sender<Utf8Bytes>,
        reply: oneshot::Sender<Assignment>,
    },
    Disconnect {
        conn_id: u64,
    },
    Move {
        conn_id: u64,
        side: Side,
        y: f32,
    },
}

/// Snapshot handed to the encoder once per tick.
#[derive(Debug, Clone)]
pub struct WorldUpdate {
    pub state: GameState,
    pub player_count: usize,
    pub active_sides: Vec<Side>,
}

/// Serializes a snapshot into the text frame every connection receives.
pub type EncodeSnapshot = fn(&WorldUpdate) -> Result<Utf8Bytes, serde_json::Error>;
