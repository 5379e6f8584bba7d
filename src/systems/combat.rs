use bevy_ecs::prelude::*;

use crate::data::ConsumableEffect;
use crate::rules::progression::player_damage_range;
use crate::simulation::combat::ActiveEnemy;
use crate::simulation::dice::weighted_pick;
use crate::simulation::items::{add_stack, remove_one, GearInstance, GearSource, ItemEntry};
use crate::simulation::run::RunState;
use crate::systems::encounter::{apply_gold, award_xp, enter_floor};
use crate::systems::TurnContext;

/// Resource capturing blow-by-blow combat entries.
#[derive(Resource, Default, Debug)]
pub struct CombatLog(pub Vec<String>);

/// Picks a wanderer for `depth`. Enemies over the floor's hp ceiling are
/// set aside when anything smaller qualifies; the survivors are weighted
/// toward freshly unlocked entries, with oversized stragglers damped.
pub fn spawn_enemy_for_depth(ctx: &mut TurnContext, depth: u32) -> Option<ActiveEnemy> {
    let eligible = ctx.catalogs.enemies.eligible_at(depth);
    if eligible.is_empty() {
        return None;
    }
    let ceiling = ctx.tuning.hp_ceiling(depth);
    let scaled: Vec<_> = eligible
        .iter()
        .copied()
        .filter(|e| e.hp <= ceiling)
        .collect();
    let pool = if scaled.is_empty() { eligible } else { scaled };

    let tuning = ctx.tuning;
    let template = weighted_pick(ctx.dice, &pool, |e| {
        let mut weight = tuning.spawn_weight_base;
        if e.min_depth + 1 >= depth {
            weight += tuning.recent_unlock_bonus;
        }
        if e.hp > tuning.elite_hp_threshold {
            weight /= tuning.elite_weight_divisor.max(1);
        }
        weight
    });
    Some(ActiveEnemy::from_template(template))
}

pub fn spawn_boss_for_depth(ctx: &mut TurnContext, depth: u32) -> Option<ActiveEnemy> {
    ctx.catalogs
        .bosses
        .boss_for_depth(depth)
        .map(ActiveEnemy::from_boss)
}

/// Puts an enemy in front of the player and announces it in both logs.
pub fn engage(run: &mut RunState, ctx: &mut TurnContext, enemy: ActiveEnemy, intro: &str) {
    ctx.log.push(intro.to_string());
    ctx.combat_log.push(intro.to_string());
    run.enemy = Some(enemy);
}

/// One swing. Defeat pays out; a survivor immediately counter-attacks.
pub fn player_attack(run: &mut RunState, ctx: &mut TurnContext) {
    if run.enemy.is_none() {
        ctx.log.push("There is nothing to strike.".to_string());
        return;
    }

    let weapon_atk = run
        .equipped
        .weapon
        .as_ref()
        .map(|w| w.power)
        .unwrap_or(0);
    let (lo, hi) = player_damage_range(run.level, weapon_atk, ctx.tuning);
    let dmg = ctx.dice.int_range(lo, hi);

    let defeated = {
        let Some(enemy) = run.enemy.as_mut() else {
            return;
        };
        enemy.take_damage(dmg);
        enemy.is_defeated()
    };
    let weapon_text = run
        .equipped
        .weapon
        .as_ref()
        .map(|w| format!(" with your {}", w.name))
        .unwrap_or_default();
    ctx.combat_log
        .push(format!("You strike{} for {}.", weapon_text, dmg));

    if defeated {
        resolve_enemy_defeat(run, ctx);
    } else {
        enemy_attack(run, ctx);
    }
}

/// Pays out a defeated enemy: gold, xp, drops, and the occasional pull
/// deeper. Boss kills roll their drop table and always take the stairs.
pub fn resolve_enemy_defeat(run: &mut RunState, ctx: &mut TurnContext) {
    let Some(enemy) = run.enemy.take() else {
        return;
    };

    let gold = ctx.dice.int_range(enemy.gold.0, enemy.gold.1);
    let gained = apply_gold(run, ctx, gold);
    let line = format!("The {} is defeated! You loot {}g.", enemy.name, gained);
    ctx.log.push(line.clone());
    ctx.combat_log.push(line);
    award_xp(run, ctx, enemy.xp);

    if enemy.is_boss {
        roll_boss_drops(run, ctx);
        ctx.log
            .push("With its warden gone, the way down stands open.".to_string());
        run.descend(ctx.meta, ctx.tuning, ctx.dice);
        enter_floor(run, ctx);
        return;
    }

    maybe_drop_weapon(run, ctx);
    maybe_drop_shield(run, ctx);

    if ctx.dice.chance(ctx.tuning.bonus_descent_chance) {
        ctx.log
            .push("You feel the dungeon pull you deeper within...".to_string());
        run.descend(ctx.meta, ctx.tuning, ctx.dice);
        enter_floor(run, ctx);
    }
}

fn roll_boss_drops(run: &mut RunState, ctx: &mut TurnContext) {
    let Some(boss) = ctx.catalogs.bosses.boss_for_depth(run.depth) else {
        return;
    };
    let drops = boss.drops.clone();

    for entry in &drops.items {
        if !ctx.dice.chance(entry.chance) {
            continue;
        }
        if let Some(item) = ctx.catalogs.consumables.by_key(&entry.key) {
            add_stack(&mut run.inventory, &item.key, 1);
            ctx.log
                .push(format!("The hoard yields {}.", item.name));
        }
    }
    for entry in &drops.weapons {
        if !ctx.dice.chance(entry.chance) {
            continue;
        }
        if let Some(template) = ctx.catalogs.gear.weapon_by_key(&entry.key) {
            let id = run.alloc_gear_id();
            let gear = GearInstance::weapon_drop(id, template, run.depth, GearSource::Boss);
            ctx.log
                .push(format!("The hoard yields {} (+{})!", gear.name, gear.power));
            run.inventory.push(ItemEntry::Gear(gear));
        }
    }
    for entry in &drops.shields {
        if !ctx.dice.chance(entry.chance) {
            continue;
        }
        if let Some(template) = ctx.catalogs.gear.shield_by_key(&entry.key) {
            let id = run.alloc_gear_id();
            let gear = GearInstance::shield_drop(id, template, run.depth, GearSource::Boss);
            ctx.log.push(format!(
                "The hoard yields {} ({} DEF, {}% block)!",
                gear.name, gear.power, gear.block_chance
            ));
            run.inventory.push(ItemEntry::Gear(gear));
        }
    }
}

fn maybe_drop_weapon(run: &mut RunState, ctx: &mut TurnContext) {
    if ctx.dice.chance(ctx.tuning.weapon_drop_chance) {
        drop_weapon(run, ctx);
    }
}

fn maybe_drop_shield(run: &mut RunState, ctx: &mut TurnContext) {
    if ctx.dice.chance(ctx.tuning.shield_drop_chance) {
        drop_shield(run, ctx);
    }
}

/// Grants one weapon from the depth pool, weighted by template weight.
pub fn drop_weapon(run: &mut RunState, ctx: &mut TurnContext) {
    let pool = ctx.catalogs.gear.weapons_at(run.depth);
    if pool.is_empty() {
        return;
    }
    let template = weighted_pick(ctx.dice, &pool, |w| w.weight);
    let id = run.alloc_gear_id();
    let gear = GearInstance::weapon_drop(id, template, run.depth, GearSource::Drop);
    ctx.log
        .push(format!("You find a {} (+{})!", gear.name, gear.power));
    run.inventory.push(ItemEntry::Gear(gear));
}

/// Grants one shield from the depth pool, weighted by template weight.
pub fn drop_shield(run: &mut RunState, ctx: &mut TurnContext) {
    let pool = ctx.catalogs.gear.shields_at(run.depth);
    if pool.is_empty() {
        return;
    }
    let template = weighted_pick(ctx.dice, &pool, |s| s.weight);
    let id = run.alloc_gear_id();
    let gear = GearInstance::shield_drop(id, template, run.depth, GearSource::Drop);
    ctx.log.push(format!(
        "You find a {} ({} DEF, {}% block)!",
        gear.name, gear.power, gear.block_chance
    ));
    run.inventory.push(ItemEntry::Gear(gear));
}

/// The enemy's counter-swing. An equipped shield rolls its block chance
/// to shave off up to its defense.
pub fn enemy_attack(run: &mut RunState, ctx: &mut TurnContext) {
    let Some(enemy) = run.enemy.as_ref() else {
        return;
    };
    let name = enemy.name.clone();
    let mut dmg = ctx.dice.int_range(enemy.atk.0, enemy.atk.1);

    if let Some(shield) = run.equipped.shield.as_ref() {
        if ctx.dice.chance(shield.block_chance) {
            let reduced = dmg.min(shield.power);
            dmg -= reduced;
            if reduced > 0 {
                ctx.combat_log.push(format!(
                    "Your {} reduces damage by {}.",
                    shield.name, reduced
                ));
            }
        }
    }

    ctx.combat_log
        .push(format!("{} strikes for {}.", name, dmg));
    apply_player_damage(run, ctx, dmg);
}

/// Fleeing is a coin weighted by tuning, never offered against a boss,
/// and a failed (or forbidden) attempt hands the enemy a free swing.
pub fn try_flee(run: &mut RunState, ctx: &mut TurnContext) {
    let Some(enemy) = run.enemy.as_ref() else {
        ctx.log.push("There is nothing to run from.".to_string());
        return;
    };
    if enemy.is_boss {
        ctx.combat_log
            .push("The lair is sealed. There is no way out but through.".to_string());
        enemy_attack(run, ctx);
        return;
    }
    if ctx.dice.chance(ctx.tuning.flee_chance) {
        ctx.combat_log
            .push("You slip away into the shadows.".to_string());
        ctx.log
            .push("You slip away into the shadows.".to_string());
        run.enemy = None;
    } else {
        ctx.combat_log.push("You fail to escape!".to_string());
        enemy_attack(run, ctx);
    }
}

/// Consumes one unit of a consumable. Heals work anywhere but concede a
/// counter-attack in combat; bombs only make sense with a target.
pub fn use_item(run: &mut RunState, ctx: &mut TurnContext, key: &str) {
    let Some(template) = ctx.catalogs.consumables.by_key(key) else {
        ctx.log.push("You rummage for something you don't carry.".to_string());
        return;
    };
    let name = template.name.clone();
    let effect = template.effect;

    match effect {
        ConsumableEffect::Heal { amount } => {
            if !remove_one(&mut run.inventory, key) {
                ctx.log.push(format!("No {} left.", name));
                return;
            }
            let heal = ((amount as f64) * ctx.meta.heal_multiplier()).ceil() as i32;
            let healed = run.heal(heal);
            let line = format!("You drink {} and restore {} HP.", name, healed);
            ctx.log.push(line.clone());
            if run.in_combat() {
                ctx.combat_log.push(line);
                enemy_attack(run, ctx);
            }
        }
        ConsumableEffect::Damage { amount } => {
            if run.enemy.is_none() {
                ctx.log
                    .push("You consider lighting a bomb... but decide against it.".to_string());
                return;
            }
            if !remove_one(&mut run.inventory, key) {
                ctx.log.push(format!("No {} left.", name));
                return;
            }
            let defeated = {
                let Some(enemy) = run.enemy.as_mut() else {
                    return;
                };
                enemy.take_damage(amount);
                enemy.is_defeated()
            };
            ctx.combat_log
                .push(format!("You hurl {} for {}!", name, amount));
            if defeated {
                resolve_enemy_defeat(run, ctx);
            } else {
                enemy_attack(run, ctx);
            }
        }
    }
}

/// Removes hp, flooring at zero; zero marks the run dead for the
/// cleanup pass to settle.
pub fn apply_player_damage(run: &mut RunState, ctx: &mut TurnContext, amount: i32) {
    run.hp = (run.hp - amount.max(0)).max(0);
    if run.hp == 0 && !run.dead {
        run.dead = true;
        run.enemy = None;
        run.pending = None;
        ctx.combat_log.push("You collapse...".to_string());
        ctx.log.push("You collapse...".to_string());
    }
}
