use super::broadcast::{PublishReport, publish};
use super::input::{MoveOutcome, apply_move};
use super::registry::{ConnectionRegistry, SidePolicy};
use super::types::{EncodeSnapshot, GameEvent};
use crate::domain::systems::ball;
use crate::domain::tuning::ball::BallTuning;
use crate::domain::{GameState, ServeRng};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, trace};

const REJECTED_MOVE_LOG_THROTTLE: Duration = Duration::from_secs(2);

// At most one rejected-move log line per throttle window; the rest are counted.
#[derive(Debug, Default)]
struct RejectedMoveLog {
    last: Option<Instant>,
    suppressed: u64,
}

impl RejectedMoveLog {
    // Returns how many rejections were swallowed since the last logged one,
    // or `None` when this one should stay quiet too.
    fn admit(&mut self, now: Instant) -> Option<u64> {
        let due = self
            .last
            .is_none_or(|last| now.duration_since(last) >= REJECTED_MOVE_LOG_THROTTLE);
        if due {
            self.last = Some(now);
            Some(std::mem::take(&mut self.suppressed))
        } else {
            self.suppressed += 1;
            None
        }
    }
}

/// Settings for spawning the world task.
#[derive(Debug, Clone)]
pub struct WorldSettings {
    /// Fixed tick interval for the game loop.
    pub tick_interval: Duration,
    /// Role assignment once both sides are held.
    pub side_policy: SidePolicy,
    pub ball: BallTuning,
}

/// Everything the tick mutates, owned by exactly one task.
pub struct GameWorld<R> {
    state: GameState,
    registry: ConnectionRegistry,
    tuning: BallTuning,
    rng: R,
    encode: EncodeSnapshot,
    tick: u64,
    rejected_moves: RejectedMoveLog,
}

impl<R: ServeRng> GameWorld<R> {
    pub fn new(policy: SidePolicy, tuning: BallTuning, mut rng: R, encode: EncodeSnapshot) -> Self {
        let state = GameState::new(&tuning, &mut rng);
        Self {
            state,
            registry: ConnectionRegistry::new(policy),
            tuning,
            rng,
            encode,
            tick: 0,
            rejected_moves: RejectedMoveLog::default(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    pub fn handle_event(&mut self, ev: GameEvent) {
        match ev {
            GameEvent::Connect { outbound, reply } => {
                let assignment = self.registry.connect(outbound);
                if reply.send(assignment).is_err() {
                    // Socket task gave up before hearing back.
                    self.registry.disconnect(assignment.conn_id);
                    return;
                }
                debug!(
                    conn_id = assignment.conn_id,
                    role = ?assignment.role,
                    connections = self.registry.len(),
                    "connection registered"
                );
            }
            GameEvent::Disconnect { conn_id } => {
                if self.registry.disconnect(conn_id) {
                    debug!(conn_id, connections = self.registry.len(), "connection removed");
                }
            }
            GameEvent::Move { conn_id, side, y } => {
                let outcome = apply_move(&mut self.state, &self.registry, conn_id, side, y);
                if outcome == MoveOutcome::Applied {
                    return;
                }
                if let Some(suppressed) = self.rejected_moves.admit(Instant::now()) {
                    debug!(conn_id, side = side.as_str(), ?outcome, suppressed, "move ignored");
                }
            }
        }
    }

    /// One physics step followed by one broadcast.
    pub fn tick(&mut self) -> PublishReport {
        self.tick += 1;

        let events = ball::step(&mut self.state, &self.tuning, &mut self.rng);
        if events.wall_bounce {
            trace!(tick = self.tick, "ball bounced off a wall");
        }
        if let Some(side) = events.paddle_hit {
            trace!(tick = self.tick, paddle = side.as_str(), vy = self.state.ball.vy, "paddle hit");
        }
        if let Some(side) = events.scored {
            info!(
                tick = self.tick,
                scorer = side.as_str(),
                left = self.state.score.left,
                right = self.state.score.right,
                "point scored"
            );
        }

        publish(&self.state, &mut self.registry, self.encode)
    }
}

/// Drives the world on a fixed interval until every event sender is gone.
///
/// Events are applied between ticks; a tick always runs to completion first.
pub async fn world_task<R: ServeRng>(
    mut event_rx: mpsc::Receiver<GameEvent>,
    mut world: GameWorld<R>,
    tick_interval: Duration,
) {
    let mut interval = tokio::time::interval(tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            ev = event_rx.recv() => match ev {
                Some(ev) => world.handle_event(ev),
                None => {
                    info!("event channel closed; world task exiting");
                    break;
                }
            },
            _ = interval.tick() => {
                world.tick();
            }
        }
    }
}
