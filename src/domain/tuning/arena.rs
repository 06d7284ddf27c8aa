//! Fixed arena geometry shared by the simulation and the wire contract.
//!
//! Clients render against these numbers, so changing any of them is a protocol change.

/// Playfield width in pixels.
pub const CANVAS_WIDTH: f32 = 600.0;

/// Playfield height in pixels.
pub const CANVAS_HEIGHT: f32 = 400.0;

pub const PADDLE_WIDTH: f32 = 10.0;
pub const PADDLE_HEIGHT: f32 = 80.0;

/// Horizontal gap between each wall and the outer edge of its paddle.
pub const PADDLE_OFFSET: f32 = 20.0;

pub const BALL_RADIUS: f32 = 8.0;

/// Highest paddle `y` that keeps the whole paddle on the canvas.
pub const PADDLE_MAX_Y: f32 = CANVAS_HEIGHT - PADDLE_HEIGHT;

/// X of the face the ball strikes on the left paddle.
pub const LEFT_PADDLE_FACE: f32 = PADDLE_OFFSET + PADDLE_WIDTH;

/// X of the face the ball strikes on the right paddle.
pub const RIGHT_PADDLE_FACE: f32 = CANVAS_WIDTH - PADDLE_OFFSET - PADDLE_WIDTH;
