/// Gameplay tuning for the ball.
///
/// Velocities are in pixels per tick; the simulation has no `dt`.

#[derive(Debug, Clone, Copy)]
pub struct BallTuning {
    /// Horizontal speed of every serve.
    pub serve_speed: f32,

    /// Largest vertical speed a serve can start with (drawn from `-max..=max`).
    pub max_serve_vy: f32,

    /// Vertical speed added by a hit on the very edge of a paddle.
    pub spin_factor: f32,
}

impl Default for BallTuning {
    fn default() -> Self {
        Self {
            serve_speed: 5.0,
            max_serve_vy: 3.0,
            spin_factor: 3.0,
        }
    }
}
