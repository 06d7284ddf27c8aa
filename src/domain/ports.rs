use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// Port for the randomness used when serving the ball.
pub trait ServeRng: Send {
    /// Returns true when the serve should travel toward the right wall.
    fn serve_right(&mut self) -> bool;

    /// Uniform sample in `[-1.0, 1.0]`.
    fn unit_spread(&mut self) -> f32;
}

/// Production serve randomness backed by a seedable `StdRng`.
pub struct GameRng(StdRng);

impl GameRng {
    pub fn new(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }
}

impl ServeRng for GameRng {
    fn serve_right(&mut self) -> bool {
        self.0.gen_bool(0.5)
    }

    fn unit_spread(&mut self) -> f32 {
        self.0.gen_range(-1.0..=1.0)
    }
}
