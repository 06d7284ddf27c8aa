// Wire protocol DTOs and conversions for the public WebSocket endpoint.

use crate::domain::{GameState, Role, Side};
use crate::use_cases::WorldUpdate;
use axum::extract::ws::Utf8Bytes;
use serde::{Deserialize, Serialize};

/// Messages the server sends to connected clients over the WebSocket.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage {
    // Sent once, right after the connection is registered.
    Assignment {
        side: RoleDto,
    },
    // Per-tick snapshot of the match.
    State {
        state: GameStateDto,
        #[serde(rename = "playerCount")]
        player_count: usize,
        #[serde(rename = "activeSides")]
        active_sides: Vec<SideDto>,
    },
}

/// Messages the client sends to the server over the WebSocket.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    Move { side: SideDto, y: f64 },
}

/// Narrows a requested paddle offset to `f32`, saturating at the type's range.
///
/// Returns `None` for NaN and infinities. Anything finite still reaches the
/// paddle clamp, so `1e39` lands on the bottom edge instead of being dropped.
pub fn paddle_offset(y: f64) -> Option<f32> {
    if !y.is_finite() {
        return None;
    }
    Some(y.clamp(f64::from(f32::MIN), f64::from(f32::MAX)) as f32)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SideDto {
    Left,
    Right,
}

impl From<Side> for SideDto {
    fn from(side: Side) -> Self {
        match side {
            Side::Left => SideDto::Left,
            Side::Right => SideDto::Right,
        }
    }
}

impl From<SideDto> for Side {
    fn from(side: SideDto) -> Self {
        match side {
            SideDto::Left => Side::Left,
            SideDto::Right => Side::Right,
        }
    }
}

/// Role as announced in the assignment message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleDto {
    Left,
    Right,
    Spectator,
}

impl From<Role> for RoleDto {
    fn from(role: Role) -> Self {
        match role {
            Role::Player(Side::Left) => RoleDto::Left,
            Role::Player(Side::Right) => RoleDto::Right,
            Role::Spectator => RoleDto::Spectator,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GameStateDto {
    pub ball: BallDto,
    pub paddles: PaddlesDto,
    pub score: ScoreDto,
}

#[derive(Debug, Clone, Serialize)]
pub struct BallDto {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaddlesDto {
    pub left: PaddleDto,
    pub right: PaddleDto,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaddleDto {
    pub y: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreDto {
    pub left: u32,
    pub right: u32,
}

impl From<&GameState> for GameStateDto {
    fn from(state: &GameState) -> Self {
        Self {
            ball: BallDto {
                x: state.ball.x,
                y: state.ball.y,
                vx: state.ball.vx,
                vy: state.ball.vy,
            },
            paddles: PaddlesDto {
                left: PaddleDto {
                    y: state.paddles.y(Side::Left),
                },
                right: PaddleDto {
                    y: state.paddles.y(Side::Right),
                },
            },
            score: ScoreDto {
                left: state.score.left,
                right: state.score.right,
            },
        }
    }
}

impl From<&WorldUpdate> for ServerMessage {
    fn from(update: &WorldUpdate) -> Self {
        ServerMessage::State {
            state: GameStateDto::from(&update.state),
            player_count: update.player_count,
            active_sides: update.active_sides.iter().copied().map(SideDto::from).collect(),
        }
    }
}

/// Encodes a tick snapshot into the shared text frame.
pub fn encode_world_update(update: &WorldUpdate) -> Result<Utf8Bytes, serde_json::Error> {
    let txt = serde_json::to_string(&ServerMessage::from(update))?;
    Ok(Utf8Bytes::from(txt))
}
