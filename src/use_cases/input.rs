// Applies paddle move requests, gated by side ownership.

use super::registry::ConnectionRegistry;
use crate::domain::{GameState, Role, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Applied,
    // Connection controls the other side, or none at all.
    NotOwner,
    UnknownConnection,
    InvalidValue,
}

/// Moves `side`'s paddle to `y` (clamped) if `conn_id` controls that side.
pub fn apply_move(
    state: &mut GameState,
    registry: &ConnectionRegistry,
    conn_id: u64,
    side: Side,
    y: f32,
) -> MoveOutcome {
    let Some(role) = registry.role_of(conn_id) else {
        return MoveOutcome::UnknownConnection;
    };
    if role != Role::Player(side) {
        return MoveOutcome::NotOwner;
    }
    if !y.is_finite() {
        return MoveOutcome::InvalidValue;
    }

    state.paddles.set_y(side, y);
    MoveOutcome::Applied
}
