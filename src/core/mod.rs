pub mod ecs;
pub mod world;

pub use ecs::{create_schedule, create_world, TickSet};
pub use world::{ActionIntent, ActionQueue, CurrentRun, Game, Snapshot};
