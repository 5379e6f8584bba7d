use bevy_ecs::prelude::*;
use bevy_ecs::schedule::SystemSet;

use crate::core::world::{ActionQueue, CurrentRun, DiceResource, StoreResource};
use crate::data::{tuning, Catalogs};
use crate::persistence::SaveStore;
use crate::simulation::dice::Dice;
use crate::simulation::meta::MetaState;
use crate::systems::combat::CombatLog;
use crate::systems::shop::TraderStock;
use crate::systems::{begin_tick_system, intent_system, run_end_system, AdventureLog};

/// Canonical tick ordering for the simulation.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum TickSet {
    Intake,
    Simulation,
    Cleanup,
}

/// Build the ECS world with baseline resources. Meta progression is read
/// from the store up front; a missing or corrupt file starts fresh.
pub fn create_world(store: Box<dyn SaveStore>, dice: Box<dyn Dice>) -> World {
    let meta: MetaState = store.load_meta().unwrap_or_default();
    let tuning = tuning::load_or_default("./assets/data/tuning.json");

    let mut world = World::new();
    world.insert_resource(ActionQueue::default());
    world.insert_resource(CurrentRun::default());
    world.insert_resource(meta);
    world.insert_resource(Catalogs::load_default());
    world.insert_resource(tuning);
    world.insert_resource(DiceResource(dice));
    world.insert_resource(StoreResource(store));
    world.insert_resource(AdventureLog::default());
    world.insert_resource(CombatLog::default());
    world.insert_resource(TraderStock::default());
    world
}

/// Build the system schedule in the canonical order.
pub fn create_schedule() -> Schedule {
    let mut schedule = Schedule::default();

    schedule.configure_sets((TickSet::Intake, TickSet::Simulation, TickSet::Cleanup).chain());

    schedule.add_systems((
        begin_tick_system.in_set(TickSet::Intake),
        intent_system.in_set(TickSet::Simulation),
        run_end_system.in_set(TickSet::Cleanup),
    ));

    schedule
}
