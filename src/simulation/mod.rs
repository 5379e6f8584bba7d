pub mod combat;
pub mod decision;
pub mod dice;
pub mod items;
pub mod meta;
pub mod run;

pub use combat::ActiveEnemy;
pub use decision::{DecisionKind, PendingDecision};
pub use dice::{pick, weighted_pick, Dice, GameDice};
pub use items::{GearInstance, GearKind, GearSource, ItemEntry};
pub use meta::MetaState;
pub use run::{Equipped, Pos, RunState};
