// Gameplay tuning, kept apart from runtime/server configuration.

pub mod arena;
pub mod ball;
