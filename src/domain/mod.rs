// Domain layer: arena rules, game state and the simulation step.

pub mod ports;
pub mod state;
pub mod systems;
pub mod tuning;

pub use ports::{GameRng, ServeRng};
pub use state::{Ball, GameState, Paddles, Role, Score, Side};
