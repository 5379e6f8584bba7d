use crate::simulation::decision::{DecisionKind, PendingDecision};
use crate::simulation::dice::pick;
use crate::simulation::items::add_stack;
use crate::simulation::run::RunState;
use crate::rules::progression::{gain_gold, gain_xp, scaled_reward};
use crate::systems::combat::{
    apply_player_damage, drop_shield, drop_weapon, engage, spawn_boss_for_depth,
    spawn_enemy_for_depth,
};
use crate::systems::shop;
use crate::systems::TurnContext;

/// Restrictions applied when the roll happens during a rest: no loot,
/// no modal prompts, no traders. Hostile outcomes still land.
#[derive(Debug, Clone, Copy, Default)]
pub struct EncounterOpts {
    pub forbid_loot: bool,
    pub forbid_events: bool,
}

const KEEP_STILL: &str = "You keep still; nothing turns up while you rest.";

/// Rolls the d100 encounter table for a freshly entered cell and plays
/// out the selected band.
pub fn roll_encounter(run: &mut RunState, ctx: &mut TurnContext, opts: EncounterOpts) {
    let w = &ctx.tuning.encounter;
    let r = ctx.dice.int_range(1, 100);
    let mut edge = 0;
    let mut band = |width: i32| {
        edge += width;
        r <= edge
    };

    if band(w.enemy) {
        if let Some(enemy) = spawn_enemy_for_depth(ctx, run.depth) {
            let intro = format!(
                "A {} emerges from the dark! (HP {})",
                enemy.name, enemy.hp
            );
            engage(run, ctx, enemy, &intro);
        } else {
            ctx.log.push("This room appears empty.".to_string());
        }
    } else if band(w.loot) {
        if opts.forbid_loot {
            ctx.log.push(KEEP_STILL.to_string());
        } else {
            grant_loot(run, ctx);
        }
    } else if band(w.trap) {
        let dmg = ctx.dice.int_range(1, 4 + run.depth as i32 / 2);
        ctx.log
            .push(format!("A hidden trap damages you for {}.", dmg));
        apply_player_damage(run, ctx, dmg);
    } else if band(w.chest) {
        if opts.forbid_events {
            // The chest still gets its teeth.
            if ctx.dice.chance(ctx.tuning.mimic_chance) {
                mimic_attack(run, ctx);
            } else {
                ctx.log.push(KEEP_STILL.to_string());
            }
        } else {
            run.pending = Some(PendingDecision::new(
                DecisionKind::OpenChest,
                "Iron-Banded Chest",
                "A heavy chest sits half-buried in rubble. It could be a jackpot, or a trap.",
                "Open the Chest",
                "Leave It",
            ));
        }
    } else if band(w.fountain) {
        if opts.forbid_events {
            ctx.log.push(KEEP_STILL.to_string());
        } else {
            run.pending = Some(PendingDecision::new(
                DecisionKind::DrinkFountain,
                "Glowing Fountain",
                "Waters shimmer with faint magic. Drink to risk boon or bane.",
                "Drink",
                "Do Not Drink",
            ));
        }
    } else if band(w.campfire) {
        if opts.forbid_events {
            if ctx.dice.chance(ctx.tuning.campfire_ambush_chance) {
                ambush(run, ctx);
            } else {
                ctx.log.push(KEEP_STILL.to_string());
            }
        } else {
            run.pending = Some(PendingDecision::new(
                DecisionKind::RestAtCampfire,
                "Smoldering Campfire",
                "The embers still glow. Resting here could restore you, or draw attention.",
                "Rest",
                "Move On",
            ));
        }
    } else if band(w.ore) {
        if opts.forbid_events {
            ctx.log.push(KEEP_STILL.to_string());
        } else {
            run.pending = Some(PendingDecision::new(
                DecisionKind::MineOre,
                "Glittering Ore Vein",
                "Rich veins snake through the rock. Mining might pay, or cause a cave-in.",
                "Mine Ore",
                "Leave It",
            ));
        }
    } else if band(w.secret) {
        if opts.forbid_events {
            ctx.log.push(KEEP_STILL.to_string());
        } else {
            run.pending = Some(PendingDecision::new(
                DecisionKind::PullLever,
                "Hidden Lever",
                "A loose stone reveals a concealed lever. It might expose new routes.",
                "Pull the Lever",
                "Leave It",
            ));
        }
    } else if band(w.tablet) {
        if opts.forbid_events {
            ctx.log.push(KEEP_STILL.to_string());
        } else {
            run.pending = Some(PendingDecision::new(
                DecisionKind::StudyTablet,
                "Ancient Tablet",
                "Runes spiral in a forgotten script. Study them to glean hidden lore.",
                "Study",
                "Ignore",
            ));
        }
    } else if band(w.weapon_trader) {
        if opts.forbid_events || run.trader_cooldown > 0 {
            ctx.log.push("This room appears empty.".to_string());
        } else {
            run.trader_cooldown = ctx.tuning.trader_cooldown;
            shop::stock_weapon_trader(run, ctx);
        }
    } else if band(w.trader) {
        if opts.forbid_events || run.trader_cooldown > 0 {
            ctx.log.push("This room appears empty.".to_string());
        } else {
            run.trader_cooldown = ctx.tuning.trader_cooldown;
            shop::stock_general_trader(ctx);
        }
    } else {
        ctx.log.push("This room appears empty.".to_string());
    }
}

/// Commits the one pending prompt. Outcomes roll here, not when the
/// prompt was raised, so declining genuinely costs nothing.
pub fn resolve_decision(run: &mut RunState, ctx: &mut TurnContext, accepted: bool) {
    let Some(decision) = run.pending.take() else {
        ctx.log.push("Nothing awaits your answer.".to_string());
        return;
    };
    match (decision.kind, accepted) {
        (DecisionKind::Descend, true) => {
            run.descend(ctx.meta, ctx.tuning, ctx.dice);
            enter_floor(run, ctx);
        }
        (DecisionKind::Descend, false) => {
            ctx.log
                .push("You decide to explore a bit longer.".to_string());
        }
        (DecisionKind::OpenChest, true) => open_chest(run, ctx),
        (DecisionKind::OpenChest, false) => {
            ctx.log.push("You leave the chest untouched.".to_string());
        }
        (DecisionKind::DrinkFountain, true) => drink_fountain(run, ctx),
        (DecisionKind::DrinkFountain, false) => {
            ctx.log
                .push("You decide against it and move on.".to_string());
        }
        (DecisionKind::RestAtCampfire, true) => rest_at_campfire(run, ctx),
        (DecisionKind::RestAtCampfire, false) => {
            ctx.log.push("You keep your distance.".to_string());
        }
        (DecisionKind::MineOre, true) => mine_ore(run, ctx),
        (DecisionKind::MineOre, false) => {
            ctx.log.push("You move on, pockets unfilled.".to_string());
        }
        (DecisionKind::PullLever, true) => pull_lever(run, ctx),
        (DecisionKind::PullLever, false) => {
            ctx.log.push("You resist the urge to meddle.".to_string());
        }
        (DecisionKind::StudyTablet, true) => study_tablet(run, ctx),
        (DecisionKind::StudyTablet, false) => {
            ctx.log
                .push("You avert your eyes from the unsettling glyphs.".to_string());
        }
    }
}

/// Arrival on a new floor: boss floors skip straight to the fight,
/// everything else just announces the depth.
pub fn enter_floor(run: &mut RunState, ctx: &mut TurnContext) {
    ctx.log
        .push(format!("You descend to Depth {}.", run.depth));
    if run.scout_charges > 0 {
        ctx.log
            .push(format!("[Scout charges refreshed: {}]", run.scout_charges));
    }
    if !ctx.tuning.is_boss_depth(run.depth) {
        return;
    }
    if let Some(boss) = spawn_boss_for_depth(ctx, run.depth) {
        let intro = format!(
            "The floor narrows to a single lair. {} awaits! (HP {})",
            boss.name, boss.hp
        );
        engage(run, ctx, boss, &intro);
    }
}

/// Loot band: usually a consumable, sometimes a loose gold stash, and
/// occasionally a cache holding a piece of gear from the depth pool.
fn grant_loot(run: &mut RunState, ctx: &mut TurnContext) {
    let roll = ctx.dice.int_range(1, 100);
    if roll <= 50 {
        grant_random_consumable(run, ctx);
    } else if roll <= 85 {
        let d = run.depth as i32;
        let gold = ctx.dice.int_range(3 + d, 10 + 2 * d);
        let gained = apply_gold(run, ctx, gold);
        ctx.log
            .push(format!("A loose stash holds {}g.", gained));
    } else {
        ctx.log
            .push("A toppled crate hides a gear cache!".to_string());
        if ctx.dice.chance(50) {
            drop_weapon(run, ctx);
        } else {
            drop_shield(run, ctx);
        }
    }
}

fn grant_random_consumable(run: &mut RunState, ctx: &mut TurnContext) {
    let pool = &ctx.catalogs.consumables.consumables;
    if pool.is_empty() {
        ctx.log.push("This room appears empty.".to_string());
        return;
    }
    let loot = pick(ctx.dice, pool);
    add_stack(&mut run.inventory, &loot.key, 1);
    ctx.log.push(format!("You find {}.", loot.name));
}

fn mimic_attack(run: &mut RunState, ctx: &mut TurnContext) {
    if let Some(enemy) = spawn_enemy_for_depth(ctx, run.depth) {
        let intro = format!(
            "The chest sprouts fangs! It's a {}! (HP {})",
            enemy.name, enemy.hp
        );
        engage(run, ctx, enemy, &intro);
    }
}

fn ambush(run: &mut RunState, ctx: &mut TurnContext) {
    ctx.log
        .push("Shadows stir beyond the light.".to_string());
    if let Some(enemy) = spawn_enemy_for_depth(ctx, run.depth) {
        let intro = format!(
            "Ambush! A {} lunges from the dark! (HP {})",
            enemy.name, enemy.hp
        );
        engage(run, ctx, enemy, &intro);
    }
}

fn open_chest(run: &mut RunState, ctx: &mut TurnContext) {
    let roll = ctx.dice.int_range(1, 100);
    if roll <= ctx.tuning.mimic_chance {
        mimic_attack(run, ctx);
    } else if roll <= 80 {
        let d = run.depth as i32;
        let gold = ctx.dice.int_range(10 + d, 25 + 2 * d);
        let gained = apply_gold(run, ctx, gold);
        ctx.log.push(format!("Inside: {}g.", gained));
    } else {
        grant_random_consumable(run, ctx);
    }
}

fn drink_fountain(run: &mut RunState, ctx: &mut TurnContext) {
    let roll = ctx.dice.int_range(1, 100);
    let d = run.depth as i32;
    if roll <= 40 {
        let heal = (((8 + d / 3) as f64) * ctx.meta.heal_multiplier()).ceil() as i32;
        let healed = run.heal(heal);
        ctx.log
            .push(format!("The water is rejuvenating. +{} HP.", healed));
    } else if roll <= 70 {
        let heal = (((3 + d / 5) as f64) * ctx.meta.heal_multiplier()).ceil() as i32;
        let healed = run.heal(heal);
        ctx.log
            .push(format!("Cool and refreshing. +{} HP.", healed));
    } else if roll <= 90 {
        ctx.log
            .push("Nothing happens. Perhaps its magic is spent.".to_string());
    } else {
        let dmg = ctx.dice.int_range(2, 5);
        ctx.log.push(format!("Ugh, tainted! -{} HP.", dmg));
        apply_player_damage(run, ctx, dmg);
    }
}

fn rest_at_campfire(run: &mut RunState, ctx: &mut TurnContext) {
    let heal = ((ctx.dice.int_range(3, 7) as f64) * ctx.meta.heal_multiplier()).ceil() as i32;
    let healed = run.heal(heal);
    ctx.log
        .push(format!("You warm your bones. +{} HP.", healed));
    if ctx.dice.chance(ctx.tuning.campfire_ambush_chance) {
        ambush(run, ctx);
    }
}

fn mine_ore(run: &mut RunState, ctx: &mut TurnContext) {
    let d = run.depth as i32;
    let gold = ctx.dice.int_range(5 + d, 15 + 2 * d);
    let gained = apply_gold(run, ctx, gold);
    ctx.log.push(format!("You chip free {}g.", gained));
    if ctx.dice.chance(ctx.tuning.ore_collapse_chance) {
        let dmg = ctx.dice.int_range(1, 4);
        ctx.log
            .push(format!("The ceiling sheds rubble! -{} HP.", dmg));
        apply_player_damage(run, ctx, dmg);
    }
}

fn pull_lever(run: &mut RunState, ctx: &mut TurnContext) {
    ctx.log.push("Hidden passages grind open.".to_string());
    run.exit_discovered = true;
    for dy in -1i32..=1 {
        for dx in -1i32..=1 {
            let x = run.pos.x as i32 + dx;
            let y = run.pos.y as i32 + dy;
            if x >= 0 && y >= 0 && (x as usize) < run.map_size && (y as usize) < run.map_size {
                run.map[y as usize][x as usize] = true;
            }
        }
    }
    ctx.log
        .push("You mark the route to a hidden stairwell.".to_string());
}

fn study_tablet(run: &mut RunState, ctx: &mut TurnContext) {
    let xp = ctx.dice.int_range(3, 9) + run.depth as i32 / 3;
    award_xp(run, ctx, xp);
}

/// Applies the gold multiplier and credits the run. Returns the amount
/// actually gained.
pub fn apply_gold(run: &mut RunState, ctx: &mut TurnContext, base: i32) -> i32 {
    let gained = ((base as f64 * ctx.meta.gold_multiplier()).floor() as i32).max(0);
    gain_gold(run, gained);
    gained
}

/// Applies the xp multiplier, credits the run, and logs any level-ups.
pub fn award_xp(run: &mut RunState, ctx: &mut TurnContext, base: i32) {
    let gained = scaled_reward(base, ctx.meta.xp_multiplier());
    ctx.log.push(format!("You gain {} XP.", gained));
    let levels = gain_xp(run, gained, ctx.tuning) as i32;
    for i in 0..levels {
        let reached = run.level - (levels - 1 - i);
        ctx.log
            .push(format!("Level Up! You are now Lv. {}.", reached));
    }
}
