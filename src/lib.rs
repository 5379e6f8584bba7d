// Re-export core modules for use by the binary or other consumers
pub mod core;
pub mod data;
pub mod persistence;
pub mod rules;
pub mod simulation;
pub mod systems;

// Expose the main Game wrapper and types needed for interaction
pub use crate::core::world::{ActionIntent, Game, Snapshot};
pub use crate::persistence::{FileStore, MemoryStore, SaveStore};
