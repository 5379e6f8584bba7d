pub mod combat;
pub mod encounter;
pub mod movement;
pub mod shop;

use bevy_ecs::prelude::*;

use crate::core::world::{ActionIntent, ActionQueue, CurrentRun, DiceResource, StoreResource};
use crate::data::{Catalogs, Tuning};
use crate::simulation::dice::Dice;
use crate::simulation::meta::MetaState;
use crate::persistence::SaveStore;
use crate::systems::combat::CombatLog;
use crate::systems::shop::TraderStock;

/// Resource capturing the adventure journal shown to the player.
#[derive(Resource, Default, Debug)]
pub struct AdventureLog(pub Vec<String>);

/// Shared view of everything a turn can touch, so the per-action
/// functions stay free of resource plumbing.
pub struct TurnContext<'a> {
    pub meta: &'a mut MetaState,
    pub catalogs: &'a Catalogs,
    pub tuning: &'a Tuning,
    pub dice: &'a mut dyn Dice,
    pub store: &'a dyn SaveStore,
    pub log: &'a mut Vec<String>,
    pub combat_log: &'a mut Vec<String>,
    pub stock: &'a mut TraderStock,
}

/// System: wipes the per-tick logs so a snapshot only carries what this
/// tick produced.
pub fn begin_tick_system(mut log: ResMut<AdventureLog>, mut combat_log: ResMut<CombatLog>) {
    log.0.clear();
    combat_log.0.clear();
}

/// System: drains the intent queue and applies each action to the
/// current run in order.
#[allow(clippy::too_many_arguments)]
pub fn intent_system(
    mut intents: ResMut<ActionQueue>,
    mut current: ResMut<CurrentRun>,
    mut meta: ResMut<MetaState>,
    catalogs: Res<Catalogs>,
    tuning: Res<Tuning>,
    mut dice: ResMut<DiceResource>,
    store: Res<StoreResource>,
    mut log: ResMut<AdventureLog>,
    mut combat_log: ResMut<CombatLog>,
    mut stock: ResMut<TraderStock>,
) {
    let queue = std::mem::take(&mut intents.0);
    let Some(run) = current.0.as_mut() else {
        if !queue.is_empty() {
            log.0.push("No expedition is underway.".to_string());
        }
        return;
    };

    let mut ctx = TurnContext {
        meta: &mut meta,
        catalogs: &catalogs,
        tuning: &tuning,
        dice: dice.0.as_mut(),
        store: store.0.as_ref(),
        log: &mut log.0,
        combat_log: &mut combat_log.0,
        stock: &mut stock,
    };

    for intent in queue {
        if run.dead {
            ctx.log.push("The run is over.".to_string());
            break;
        }
        if run.pending.is_some() && !matches!(intent, ActionIntent::Resolve { .. }) {
            ctx.log
                .push("A choice hangs in the air; answer it first.".to_string());
            continue;
        }
        match intent {
            ActionIntent::Move { dx, dy } => movement::try_move(run, &mut ctx, dx, dy),
            ActionIntent::Rest => movement::rest(run, &mut ctx),
            ActionIntent::Wait => movement::wait_turn(run, &mut ctx),
            ActionIntent::Scout => movement::scout_pulse(run, &mut ctx),
            ActionIntent::Attack => combat::player_attack(run, &mut ctx),
            ActionIntent::Flee => combat::try_flee(run, &mut ctx),
            ActionIntent::UseItem { key } => combat::use_item(run, &mut ctx, &key),
            ActionIntent::Equip { gear_id } => movement::equip_gear(run, &mut ctx, gear_id),
            ActionIntent::Buy { slot } => shop::buy(run, &mut ctx, slot),
            ActionIntent::SellGear { gear_id } => shop::sell_gear(run, &mut ctx, gear_id),
            ActionIntent::SellStack { key } => shop::sell_stack(run, &mut ctx, &key),
            ActionIntent::Resolve { accepted } => {
                encounter::resolve_decision(run, &mut ctx, accepted)
            }
        }
    }
}

/// System: end-of-tick bookkeeping. Converts a death into tokens and a
/// wiped save exactly once, and autosaves a living run.
pub fn run_end_system(
    mut current: ResMut<CurrentRun>,
    mut meta: ResMut<MetaState>,
    tuning: Res<Tuning>,
    store: Res<StoreResource>,
    mut log: ResMut<AdventureLog>,
) {
    let Some(run) = current.0.as_mut() else {
        return;
    };
    if run.dead {
        if !run.death_resolved {
            run.death_resolved = true;
            store.0.clear_run();
            let earned = meta.award_run_tokens(
                run.depth,
                run.level,
                run.gold,
                tuning.token_multiplier,
                store.0.as_ref(),
            );
            log.0.push(format!(
                "You are dead. Depth {}, level {}. The gloom grants {} tokens.",
                run.depth, run.level, earned
            ));
        }
        return;
    }
    store.0.save_run(run);
}
