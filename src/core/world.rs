use bevy_ecs::prelude::*;

use crate::core::ecs::{create_schedule, create_world};
use crate::data::{Tuning, UpgradeKind};
use crate::persistence::SaveStore;
use crate::simulation::dice::{Dice, GameDice};
use crate::simulation::meta::MetaState;
use crate::simulation::run::RunState;
use crate::systems::combat::CombatLog;
use crate::systems::shop::{TraderOffer, TraderStock};
use crate::systems::AdventureLog;

/// Intent-driven commands fed into the ECS each tick.
#[derive(Debug, Clone)]
pub enum ActionIntent {
    Move { dx: i32, dy: i32 },
    Rest,
    Wait,
    Scout,
    Attack,
    Flee,
    UseItem { key: String },
    Equip { gear_id: u64 },
    Buy { slot: usize },
    SellGear { gear_id: u64 },
    SellStack { key: String },
    Resolve { accepted: bool },
}

/// Resource storing the intents for the next tick.
#[derive(Resource, Default, Debug)]
pub struct ActionQueue(pub Vec<ActionIntent>);

/// The expedition in progress, if any.
#[derive(Resource, Default)]
pub struct CurrentRun(pub Option<RunState>);

/// Injectable randomness, boxed so tests can swap in scripted dice.
#[derive(Resource)]
pub struct DiceResource(pub Box<dyn Dice>);

/// Save backend shared by every system that persists.
#[derive(Resource)]
pub struct StoreResource(pub Box<dyn SaveStore>);

/// Data snapshot returned to the UI layer after each tick.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub tokens: u64,
    pub run: Option<RunState>,
    /// Journal entries produced by this tick.
    pub journal: Vec<String>,
    /// Blow-by-blow combat entries produced by this tick.
    pub combat_log: Vec<String>,
    pub trader_title: String,
    pub trader_offers: Vec<TraderOffer>,
}

impl Snapshot {
    fn capture(world: &World) -> Self {
        let stock = world.resource::<TraderStock>();
        Snapshot {
            tokens: world.resource::<MetaState>().tokens,
            run: world.resource::<CurrentRun>().0.clone(),
            journal: world.resource::<AdventureLog>().0.clone(),
            combat_log: world.resource::<CombatLog>().0.clone(),
            trader_title: stock.title.clone(),
            trader_offers: stock.offers.clone(),
        }
    }
}

/// Wrapper around the ECS world and schedule.
pub struct Game {
    world: World,
    schedule: Schedule,
}

impl Game {
    /// Create a game backed by `store` with entropy-seeded dice.
    pub fn new(store: Box<dyn SaveStore>) -> Self {
        Self::with_dice(store, Box::new(GameDice::from_entropy()))
    }

    /// Deterministic variant used by tests and replay.
    pub fn seeded(store: Box<dyn SaveStore>, seed: u64) -> Self {
        Self::with_dice(store, Box::new(GameDice::seeded(seed)))
    }

    pub fn with_dice(store: Box<dyn SaveStore>, dice: Box<dyn Dice>) -> Self {
        let world = create_world(store, dice);
        let schedule = create_schedule();
        Self { world, schedule }
    }

    /// Run a simulation tick with the provided intents and return a
    /// snapshot for rendering.
    pub fn tick(&mut self, intents: Vec<ActionIntent>) -> Snapshot {
        {
            let mut queue = self.world.resource_mut::<ActionQueue>();
            queue.0 = intents;
        }

        self.schedule.run(&mut self.world);
        Snapshot::capture(&self.world)
    }

    /// Current state without advancing the simulation.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.world)
    }

    /// Begins a fresh expedition, replacing any run in progress.
    pub fn start_run(&mut self, name: &str) -> Snapshot {
        let run = self
            .world
            .resource_scope(|world, mut dice: Mut<DiceResource>| {
                let meta = world.resource::<MetaState>().clone();
                let tuning = world.resource::<Tuning>().clone();
                RunState::new_run(name, &meta, &tuning, dice.0.as_mut())
            });
        self.world.resource::<StoreResource>().0.save_run(&run);
        self.world
            .resource_mut::<AdventureLog>()
            .0
            .push(format!("{} descends into the gloom. Depth 1.", run.name));
        self.world.resource_mut::<CurrentRun>().0 = Some(run);
        self.world.resource_mut::<TraderStock>().offers.clear();
        Snapshot::capture(&self.world)
    }

    /// True when the store holds a run that could be resumed.
    pub fn has_saved_run(&self) -> bool {
        self.world.resource::<StoreResource>().0.load_run().is_some()
    }

    /// Loads and sanitizes the stored run. Returns false when no usable
    /// save exists.
    pub fn resume_run(&mut self) -> bool {
        let Some(mut run) = self.world.resource::<StoreResource>().0.load_run() else {
            return false;
        };
        self.world
            .resource_scope(|world, mut dice: Mut<DiceResource>| {
                let tuning = world.resource::<Tuning>().clone();
                run.sanitize(&tuning, dice.0.as_mut());
            });
        self.world
            .resource_mut::<AdventureLog>()
            .0
            .push(format!(
                "{} picks up the trail at Depth {}.",
                run.name, run.depth
            ));
        self.world.resource_mut::<CurrentRun>().0 = Some(run);
        true
    }

    /// Drops the current run without awarding tokens and wipes its save.
    pub fn abandon_run(&mut self) {
        self.world.resource::<StoreResource>().0.clear_run();
        self.world.resource_mut::<CurrentRun>().0 = None;
        self.world.resource_mut::<TraderStock>().offers.clear();
        self.world
            .resource_mut::<AdventureLog>()
            .0
            .push("The expedition is abandoned.".to_string());
    }

    pub fn purchase_upgrade(&mut self, kind: UpgradeKind) {
        self.world
            .resource_scope(|world, mut meta: Mut<MetaState>| {
                let store = world.resource::<StoreResource>();
                meta.purchase(kind, store.0.as_ref());
            });
    }

    pub fn respec_upgrades(&mut self) {
        self.world
            .resource_scope(|world, mut meta: Mut<MetaState>| {
                let store = world.resource::<StoreResource>();
                meta.respec(store.0.as_ref());
            });
    }

    pub fn meta(&self) -> MetaState {
        self.world.resource::<MetaState>().clone()
    }
}
