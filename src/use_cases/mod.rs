// Use cases layer: the authoritative world and everything that mutates it.

pub mod broadcast;
pub mod game;
pub mod input;
pub mod registry;
pub mod types;

pub use broadcast::{PublishReport, SendOutcome};
pub use game::{GameWorld, WorldSettings, world_task};
pub use input::MoveOutcome;
pub use registry::{Assignment, ConnectionRegistry, SidePolicy};
pub use types::{EncodeSnapshot, GameEvent, WorldUpdate};
