// Domain-level game state: ball, paddles and score.

use super::ports::ServeRng;
use super::tuning::arena::{CANVAS_HEIGHT, CANVAS_WIDTH, PADDLE_HEIGHT, PADDLE_MAX_Y};
use super::tuning::ball::BallTuning;

/// One of the two controllable paddles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// What a connection is allowed to do in the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Player(Side),
    Spectator,
}

impl Role {
    pub fn side(self) -> Option<Side> {
        match self {
            Role::Player(side) => Some(side),
            Role::Spectator => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
}

/// Vertical offsets of both paddles (top edge, in pixels).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paddles {
    left: f32,
    right: f32,
}

impl Paddles {
    pub fn y(&self, side: Side) -> f32 {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    /// Stores a paddle offset, clamped so the paddle never leaves the canvas.
    ///
    /// NaN and infinities are ignored and the paddle keeps its position.
    pub fn set_y(&mut self, side: Side, y: f32) {
        if !y.is_finite() {
            return;
        }
        let y = clamp_paddle_y(y);
        match side {
            Side::Left => self.left = y,
            Side::Right => self.right = y,
        }
    }
}

impl Default for Paddles {
    fn default() -> Self {
        let centered = (CANVAS_HEIGHT - PADDLE_HEIGHT) / 2.0;
        Self {
            left: centered,
            right: centered,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub left: u32,
    pub right: u32,
}

impl Score {
    pub fn get(&self, side: Side) -> u32 {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn award(&mut self, side: Side) {
        let counter = match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        };
        *counter = counter.saturating_add(1);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub ball: Ball,
    pub paddles: Paddles,
    pub score: Score,
}

impl GameState {
    /// Fresh match: centered paddles, zero score and a ball already served.
    pub fn new(tuning: &BallTuning, rng: &mut dyn ServeRng) -> Self {
        let mut state = Self {
            ball: Ball {
                x: CANVAS_WIDTH / 2.0,
                y: CANVAS_HEIGHT / 2.0,
                vx: 0.0,
                vy: 0.0,
            },
            paddles: Paddles::default(),
            score: Score::default(),
        };
        state.serve(tuning, rng);
        state
    }

    /// Puts the ball back at the center with a random direction.
    pub fn serve(&mut self, tuning: &BallTuning, rng: &mut dyn ServeRng) {
        let direction = if rng.serve_right() { 1.0 } else { -1.0 };
        self.ball = Ball {
            x: CANVAS_WIDTH / 2.0,
            y: CANVAS_HEIGHT / 2.0,
            vx: direction * tuning.serve_speed,
            vy: rng.unit_spread() * tuning.max_serve_vy,
        };
    }
}

/// Clamps a requested paddle offset into `[0, CANVAS_HEIGHT - PADDLE_HEIGHT]`.
pub fn clamp_paddle_y(y: f32) -> f32 {
    y.clamp(0.0, PADDLE_MAX_Y)
}


#[cfg(test)]
mod tests {
    use super::test_support::FixedServe;
    use super::*;

    #[test]
    fn when_paddle_y_is_out_of_range_then_it_is_clamped_on_write() {
        let mut paddles = Paddles::default();

        paddles.set_y(Side::Left, -50.0);
        paddles.set_y(Side::Right, 1000.0);

        assert_eq!(paddles.y(Side::Left), 0.0);
        assert_eq!(paddles.y(Side::Right), 320.0);
    }

    #[test]
    fn when_paddle_y_is_not_finite_then_previous_offset_is_kept() {
        let mut paddles = Paddles::default();
        paddles.set_y(Side::Left, 42.0);

        paddles.set_y(Side::Left, f32::NAN);
        paddles.set_y(Side::Right, f32::INFINITY);
        paddles.set_y(Side::Right, f32::NEG_INFINITY);

        assert_eq!(paddles.y(Side::Left), 42.0);
        assert_eq!(paddles.y(Side::Right), 160.0);
    }

    #[test]
    fn when_paddle_y_is_in_range_then_it_is_stored_unchanged() {
        let mut paddles = Paddles::default();

        paddles.set_y(Side::Left, 123.5);

        assert_eq!(paddles.y(Side::Left), 123.5);
        assert_eq!(paddles.y(Side::Right), 160.0);
    }

    #[test]
    fn when_serving_then_ball_starts_at_center_with_serve_speed() {
        let tuning = BallTuning::default();
        let mut rng = FixedServe {
            right: false,
            spread: 0.5,
        };

        let state = GameState::new(&tuning, &mut rng);

        assert_eq!(state.ball.x, 300.0);
        assert_eq!(state.ball.y, 200.0);
        assert_eq!(state.ball.vx, -tuning.serve_speed);
        assert_eq!(state.ball.vy, 0.5 * tuning.max_serve_vy);
        assert_eq!(state.score, Score::default());
    }

    #[test]
    fn when_awarding_a_point_then_only_that_side_changes() {
        let mut score = Score::default();

        score.award(Side::Right);
        score.award(Side::Right);

        assert_eq!(score.get(Side::Right), 2);
        assert_eq!(score.get(Side::Left), 0);
    }
}
