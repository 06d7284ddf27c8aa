use crate::domain::ports::ServeRng;
use crate::domain::state::{GameState, Side};
use crate::domain::tuning::arena::{
    BALL_RADIUS, CANVAS_HEIGHT, CANVAS_WIDTH, LEFT_PADDLE_FACE, PADDLE_HEIGHT, RIGHT_PADDLE_FACE,
};
use crate::domain::tuning::ball::BallTuning;

/// What happened to the ball during a single step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepEvents {
    pub wall_bounce: bool,
    pub paddle_hit: Option<Side>,
    pub scored: Option<Side>,
}

/// Advances the ball by one tick: integrate, bounce, paddle hits, scoring.
///
/// Collision is discrete. A ball faster than a paddle is wide can pass
/// through it between ticks; that is accepted. The ball is also never pushed
/// back inside the walls after a bounce.
pub fn step(state: &mut GameState, tuning: &BallTuning, rng: &mut dyn ServeRng) -> StepEvents {
    let mut events = StepEvents::default();
    let ball = &mut state.ball;

    ball.x += ball.vx;
    ball.y += ball.vy;

    if ball.y - BALL_RADIUS < 0.0 || ball.y + BALL_RADIUS > CANVAS_HEIGHT {
        ball.vy = -ball.vy;
        events.wall_bounce = true;
    }

    let left_y = state.paddles.y(Side::Left);
    if ball.x - BALL_RADIUS < LEFT_PADDLE_FACE && within_paddle(ball.y, left_y) && ball.vx < 0.0 {
        ball.vx = -ball.vx;
        ball.vy += spin(ball.y, left_y, tuning.spin_factor);
        events.paddle_hit = Some(Side::Left);
    }

    let right_y = state.paddles.y(Side::Right);
    if ball.x + BALL_RADIUS > RIGHT_PADDLE_FACE && within_paddle(ball.y, right_y) && ball.vx > 0.0
    {
        ball.vx = -ball.vx;
        ball.vy += spin(ball.y, right_y, tuning.spin_factor);
        events.paddle_hit = Some(Side::Right);
    }

    let scorer = if ball.x < 0.0 {
        Some(Side::Right)
    } else if ball.x > CANVAS_WIDTH {
        Some(Side::Left)
    } else {
        None
    };

    if let Some(side) = scorer {
        state.score.award(side);
        state.serve(tuning, rng);
        events.scored = Some(side);
    }

    events
}

fn within_paddle(ball_y: f32, paddle_y: f32) -> bool {
    (paddle_y..=paddle_y + PADDLE_HEIGHT).contains(&ball_y)
}

// Zero at the paddle center, +/- spin_factor at its edges.
fn spin(ball_y: f32, paddle_y: f32, spin_factor: f32) -> f32 {
    let half = PADDLE_HEIGHT / 2.0;
    ((ball_y - paddle_y - half) / half) * spin_factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::GameRng;
    use crate::domain::state::test_support::FixedServe;
    use crate::domain::state::{Ball, Score};

    fn state_with_ball(ball: Ball) -> GameState {
        let mut rng = FixedServe {
            right: true,
            spread: 0.0,
        };
        let mut state = GameState::new(&BallTuning::default(), &mut rng);
        state.ball = ball;
        state
    }

    fn serve_left() -> FixedServe {
        FixedServe {
            right: false,
            spread: -1.0,
        }
    }

    #[test]
    fn when_ball_is_in_open_field_then_position_integrates_velocity() {
        let mut state = state_with_ball(Ball {
            x: 300.0,
            y: 200.0,
            vx: 4.0,
            vy: -2.0,
        });

        let events = step(&mut state, &BallTuning::default(), &mut serve_left());

        assert_eq!(events, StepEvents::default());
        assert_eq!(state.ball.x, 304.0);
        assert_eq!(state.ball.y, 198.0);
        assert_eq!(state.ball.vx, 4.0);
        assert_eq!(state.ball.vy, -2.0);
    }

    #[test]
    fn when_ball_touches_top_wall_then_vy_flips_and_vx_is_kept() {
        let mut state = state_with_ball(Ball {
            x: 300.0,
            y: 10.0,
            vx: -4.0,
            vy: -3.0,
        });

        let events = step(&mut state, &BallTuning::default(), &mut serve_left());

        assert!(events.wall_bounce);
        assert_eq!(state.ball.vy, 3.0);
        assert_eq!(state.ball.vx, -4.0);
        // Not pushed back inside the canvas.
        assert_eq!(state.ball.y, 7.0);
    }

    #[test]
    fn when_ball_touches_bottom_wall_then_vy_flips() {
        let mut state = state_with_ball(Ball {
            x: 300.0,
            y: 390.0,
            vx: 4.0,
            vy: 3.0,
        });

        let events = step(&mut state, &BallTuning::default(), &mut serve_left());

        assert!(events.wall_bounce);
        assert_eq!(state.ball.vy, -3.0);
        assert_eq!(state.ball.vx, 4.0);
    }

    #[test]
    fn when_ball_hits_left_paddle_center_then_vx_reverses_without_spin() {
        let mut state = state_with_ball(Ball {
            x: 40.0,
            y: 200.0,
            vx: -5.0,
            vy: 0.0,
        });
        state.paddles.set_y(Side::Left, 160.0);

        let events = step(&mut state, &BallTuning::default(), &mut serve_left());

        assert_eq!(events.paddle_hit, Some(Side::Left));
        assert_eq!(state.ball.vx, 5.0);
        assert_eq!(state.ball.vy, 0.0);
    }

    #[test]
    fn when_ball_hits_left_paddle_bottom_edge_then_full_spin_is_added() {
        let tuning = BallTuning::default();
        let mut state = state_with_ball(Ball {
            x: 40.0,
            y: 240.0,
            vx: -5.0,
            vy: 0.0,
        });
        state.paddles.set_y(Side::Left, 160.0);

        step(&mut state, &tuning, &mut serve_left());

        assert_eq!(state.ball.vx, 5.0);
        assert_eq!(state.ball.vy, tuning.spin_factor);
    }

    #[test]
    fn when_ball_hits_right_paddle_top_edge_then_negative_spin_is_added() {
        let tuning = BallTuning::default();
        let mut state = state_with_ball(Ball {
            x: 560.0,
            y: 100.0,
            vx: 5.0,
            vy: 0.0,
        });
        state.paddles.set_y(Side::Right, 100.0);

        let events = step(&mut state, &tuning, &mut serve_left());

        assert_eq!(events.paddle_hit, Some(Side::Right));
        assert_eq!(state.ball.vx, -5.0);
        assert_eq!(state.ball.vy, -tuning.spin_factor);
    }

    #[test]
    fn when_ball_overlaps_left_paddle_moving_away_then_it_is_not_reflected() {
        let mut state = state_with_ball(Ball {
            x: 30.0,
            y: 200.0,
            vx: 5.0,
            vy: 0.0,
        });
        state.paddles.set_y(Side::Left, 160.0);

        let events = step(&mut state, &BallTuning::default(), &mut serve_left());

        assert_eq!(events.paddle_hit, None);
        assert_eq!(state.ball.vx, 5.0);
    }

    #[test]
    fn when_ball_misses_left_paddle_vertically_then_it_keeps_travelling() {
        let mut state = state_with_ball(Ball {
            x: 40.0,
            y: 50.0,
            vx: -5.0,
            vy: 0.0,
        });
        state.paddles.set_y(Side::Left, 200.0);

        let events = step(&mut state, &BallTuning::default(), &mut serve_left());

        assert_eq!(events.paddle_hit, None);
        assert_eq!(state.ball.vx, -5.0);
    }

    #[test]
    fn when_ball_crosses_left_edge_then_right_scores_and_ball_is_served_from_center() {
        let tuning = BallTuning::default();
        let mut state = state_with_ball(Ball {
            x: 2.0,
            y: 50.0,
            vx: -5.0,
            vy: 0.0,
        });
        state.paddles.set_y(Side::Left, 300.0);
        let mut rng = FixedServe {
            right: true,
            spread: 0.5,
        };

        let events = step(&mut state, &tuning, &mut rng);

        assert_eq!(events.scored, Some(Side::Right));
        assert_eq!(state.score, Score { left: 0, right: 1 });
        assert_eq!(state.ball.x, 300.0);
        assert_eq!(state.ball.y, 200.0);
        assert_eq!(state.ball.vx, tuning.serve_speed);
        assert_eq!(state.ball.vy, 0.5 * tuning.max_serve_vy);
    }

    #[test]
    fn when_ball_crosses_right_edge_then_left_scores_once() {
        let tuning = BallTuning::default();
        let mut state = state_with_ball(Ball {
            x: 598.0,
            y: 50.0,
            vx: 5.0,
            vy: 0.0,
        });
        state.paddles.set_y(Side::Right, 300.0);

        let events = step(&mut state, &tuning, &mut serve_left());

        assert_eq!(events.scored, Some(Side::Left));
        assert_eq!(state.score, Score { left: 1, right: 0 });
        assert_eq!(state.ball.vx, -tuning.serve_speed);
        assert_eq!(state.ball.vy, -tuning.max_serve_vy);
    }

    #[test]
    fn when_running_many_unattended_ticks_then_ball_stays_finite_and_score_never_drops() {
        let tuning = BallTuning::default();
        let mut rng = GameRng::new(42);
        let mut state = GameState::new(&tuning, &mut rng);
        let mut last = state.score;

        for _ in 0..20_000 {
            step(&mut state, &tuning, &mut rng);
            let b = state.ball;
            assert!(b.x.is_finite() && b.y.is_finite() && b.vx.is_finite() && b.vy.is_finite());
            assert!(state.score.left >= last.left && state.score.right >= last.right);
            let gained = (state.score.left - last.left) + (state.score.right - last.right);
            assert!(gained <= 1);
            last = state.score;
        }
    }
}
