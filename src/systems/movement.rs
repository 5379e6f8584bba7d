use crate::data::rooms::describe_room;
use crate::simulation::decision::{DecisionKind, PendingDecision};
use crate::simulation::items::ItemEntry;
use crate::simulation::run::RunState;
use crate::systems::encounter::{roll_encounter, EncounterOpts};
use crate::systems::TurnContext;

/// One step of exploration. Clamps to the floor bounds, ticks the trader
/// cooldown, then either raises the stairwell prompt, notes a quiet
/// revisit, or rolls a fresh encounter.
pub fn try_move(run: &mut RunState, ctx: &mut TurnContext, dx: i32, dy: i32) {
    if run.in_combat() {
        ctx.log
            .push("You cannot move while engaged! Flee or finish the fight.".to_string());
        return;
    }

    let max = run.map_size as i32 - 1;
    let nx = (run.pos.x as i32 + dx).clamp(0, max) as usize;
    let ny = (run.pos.y as i32 + dy).clamp(0, max) as usize;
    let revisiting = run.map[ny][nx];

    run.pos.x = nx;
    run.pos.y = ny;
    run.map[ny][nx] = true;

    if run.trader_cooldown > 0 {
        run.trader_cooldown -= 1;
    }

    ctx.log
        .push(format!("You enter {}.", describe_room(ctx.dice)));

    if check_exit_contact(run, ctx) {
        return;
    }

    if revisiting {
        ctx.log
            .push("You return to a room you already explored. It's quiet.".to_string());
        return;
    }

    roll_encounter(run, ctx, EncounterOpts::default());
}

/// Stepping onto the stairwell reveals it and asks whether to descend.
fn check_exit_contact(run: &mut RunState, ctx: &mut TurnContext) -> bool {
    let Some(exit) = run.exit_pos else {
        return false;
    };
    if exit != run.pos {
        return false;
    }
    if !run.exit_discovered {
        run.exit_discovered = true;
        ctx.log
            .push("You discover a hidden stairwell!".to_string());
    }
    run.pending = Some(PendingDecision::new(
        DecisionKind::Descend,
        "Hidden Stairwell",
        format!(
            "Descend to Depth {}? Who knows what lurks below.",
            run.depth + 1
        ),
        "Descend",
        "Stay Here",
    ));
    true
}

/// Resting heals a die roll scaled by the heal multiplier, but repeated
/// rests on one floor decay toward a single point, and each rest risks
/// an ambush.
pub fn rest(run: &mut RunState, ctx: &mut TurnContext) {
    if run.in_combat() {
        ctx.log
            .push("No rest with an enemy bearing down on you.".to_string());
        return;
    }

    let (lo, hi) = ctx.tuning.rest_heal_die;
    let die = ctx.dice.int_range(lo, hi);
    let decay = ctx
        .tuning
        .rest_decay
        .powf((run.rests_this_floor as f64).sqrt());
    let heal = ((die as f64 * ctx.meta.heal_multiplier() * decay).ceil() as i32).max(1);
    let healed = run.heal(heal);
    run.rests_this_floor += 1;
    ctx.log.push(format!(
        "You rest, patching wounds (+{} HP). Risk: you might be ambushed.",
        healed
    ));

    if ctx.dice.chance(ctx.tuning.rest_ambush_chance) {
        ctx.log.push("You hear something behind you!".to_string());
        roll_encounter(
            run,
            ctx,
            EncounterOpts {
                forbid_loot: true,
                forbid_events: true,
            },
        );
    }
}

/// Passing a turn in place. Occasionally something finds you anyway.
pub fn wait_turn(run: &mut RunState, ctx: &mut TurnContext) {
    if run.in_combat() {
        ctx.log
            .push("The enemy gives you no such luxury.".to_string());
        return;
    }
    ctx.log
        .push("You wait, knowing the only way out is to keep moving.".to_string());
    if ctx.dice.chance(ctx.tuning.wait_encounter_chance) {
        ctx.log.push("Something approaches!".to_string());
        roll_encounter(run, ctx, EncounterOpts::default());
    }
}

/// Spends one scout charge to chart the current cell and up to three
/// orthogonal neighbors, undiscovered cells first. Charted cells are
/// quiet on arrival, and the pulse itself never stirs anything.
pub fn scout_pulse(run: &mut RunState, ctx: &mut TurnContext) {
    if run.in_combat() {
        ctx.log.push("Not while you are fighting.".to_string());
        return;
    }
    if run.scout_charges == 0 {
        ctx.log.push("Your scouting sense is spent.".to_string());
        return;
    }
    run.scout_charges -= 1;

    let dirs = [(0i32, -1i32), (1, 0), (0, 1), (-1, 0)];
    let mut neighbors: Vec<(usize, usize)> = dirs
        .iter()
        .filter_map(|(dx, dy)| {
            let x = run.pos.x as i32 + dx;
            let y = run.pos.y as i32 + dy;
            if x >= 0 && y >= 0 && (x as usize) < run.map_size && (y as usize) < run.map_size {
                Some((x as usize, y as usize))
            } else {
                None
            }
        })
        .collect();
    neighbors.sort_by_key(|&(x, y)| run.map[y][x]);

    run.map[run.pos.y][run.pos.x] = true;
    for &(x, y) in neighbors.iter().take(3) {
        run.map[y][x] = true;
    }

    ctx.log.push(
        "You survey the area; nearby rooms are now charted (no threats stirred).".to_string(),
    );
}

/// Swaps a piece of inventory gear into its slot, returning whatever was
/// equipped to the inventory.
pub fn equip_gear(run: &mut RunState, ctx: &mut TurnContext, gear_id: u64) {
    let idx = run.inventory.iter().position(
        |entry| matches!(entry, ItemEntry::Gear(gear) if gear.id == gear_id),
    );
    let Some(idx) = idx else {
        ctx.log.push("You fumble for gear you don't have.".to_string());
        return;
    };
    let ItemEntry::Gear(gear) = run.inventory.remove(idx) else {
        return;
    };

    let slot = match gear.kind {
        crate::simulation::items::GearKind::Weapon => &mut run.equipped.weapon,
        crate::simulation::items::GearKind::Shield => &mut run.equipped.shield,
    };
    let description = match gear.kind {
        crate::simulation::items::GearKind::Weapon => format!("(+{} ATK)", gear.power),
        crate::simulation::items::GearKind::Shield => {
            format!("({} DEF, {}% block)", gear.power, gear.block_chance)
        }
    };
    let name = gear.name.clone();
    if let Some(previous) = slot.replace(gear) {
        run.inventory.push(ItemEntry::Gear(previous));
    }
    ctx.log.push(format!("You equip {} {}.", name, description));
}
