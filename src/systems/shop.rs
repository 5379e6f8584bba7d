use bevy_ecs::prelude::*;

use crate::rules::pricing::sell_price;
use crate::simulation::dice::{pick, weighted_pick};
use crate::simulation::items::{add_stack, remove_one, GearInstance, ItemEntry};
use crate::simulation::run::RunState;
use crate::systems::TurnContext;

/// One line of trader stock.
#[derive(Debug, Clone)]
pub enum TraderOffer {
    Gear(GearInstance),
    Consumable { key: String, name: String, price: i32 },
}

/// Resource holding whatever the last trader laid out. Buying a piece of
/// gear removes it; consumables restock freely.
#[derive(Resource, Default, Debug)]
pub struct TraderStock {
    pub title: String,
    pub offers: Vec<TraderOffer>,
}

/// Weapon trader: two weighted picks scaled down to replica strength,
/// plus a marked-up bomb.
pub fn stock_weapon_trader(run: &mut RunState, ctx: &mut TurnContext) {
    let candidates = ctx.catalogs.gear.weapons_at(run.depth);
    let mut offers = Vec::new();
    if !candidates.is_empty() {
        for _ in 0..2 {
            let template = weighted_pick(ctx.dice, &candidates, |w| w.weight);
            let factor = ctx.dice.int_range(70, 85) as f64 / 100.0;
            let id = run.alloc_gear_id();
            offers.push(TraderOffer::Gear(GearInstance::weapon_offer(
                id, template, run.depth, factor,
            )));
        }
    }
    if let Some(bomb) = ctx.catalogs.consumables.by_key("bomb") {
        offers.push(TraderOffer::Consumable {
            key: bomb.key.clone(),
            name: bomb.name.clone(),
            price: bomb.price + 10,
        });
    }
    ctx.stock.title = "A Weapon Trader".to_string();
    ctx.stock.offers = offers;
    ctx.log
        .push("A weapon trader unrolls a cloth of wares.".to_string());
}

/// General trader: three random consumables at list price.
pub fn stock_general_trader(ctx: &mut TurnContext) {
    let pool = &ctx.catalogs.consumables.consumables;
    let mut offers = Vec::new();
    if !pool.is_empty() {
        for _ in 0..3 {
            let item = pick(ctx.dice, pool);
            offers.push(TraderOffer::Consumable {
                key: item.key.clone(),
                name: item.name.clone(),
                price: item.price,
            });
        }
    }
    ctx.stock.title = "A Wandering Trader".to_string();
    ctx.stock.offers = offers;
    ctx.log
        .push("A wandering trader beckons you over.".to_string());
}

/// Buys the offer at `slot`. Gear leaves the stock once bought so its id
/// stays unique; consumables can be bought again.
pub fn buy(run: &mut RunState, ctx: &mut TurnContext, slot: usize) {
    let Some(offer) = ctx.stock.offers.get(slot).cloned() else {
        ctx.log.push("The trader has no such ware.".to_string());
        return;
    };
    match offer {
        TraderOffer::Consumable { key, name, price } => {
            if run.gold < price {
                ctx.log.push("Not enough gold to trade.".to_string());
                return;
            }
            run.gold -= price;
            add_stack(&mut run.inventory, &key, 1);
            ctx.log
                .push(format!("Purchased {} for {}g.", name, price));
        }
        TraderOffer::Gear(gear) => {
            if run.gold < gear.price {
                ctx.log.push("Not enough gold to trade.".to_string());
                return;
            }
            run.gold -= gear.price;
            ctx.log
                .push(format!("Purchased {} for {}g.", gear.name, gear.price));
            run.inventory.push(ItemEntry::Gear(gear));
            ctx.stock.offers.remove(slot);
        }
    }
}

/// Sells an inventory piece for half its value. Equipped gear has to be
/// unequipped first, and nothing is ever auto-equipped to replace it.
pub fn sell_gear(run: &mut RunState, ctx: &mut TurnContext, gear_id: u64) {
    let idx = run.inventory.iter().position(
        |entry| matches!(entry, ItemEntry::Gear(gear) if gear.id == gear_id),
    );
    let Some(idx) = idx else {
        ctx.log.push("You have nothing like that to sell.".to_string());
        return;
    };
    let ItemEntry::Gear(gear) = run.inventory.remove(idx) else {
        return;
    };
    let price = sell_price(gear.price);
    run.gold += price;
    ctx.log
        .push(format!("Sold {} for {}g.", gear.name, price));
}

/// Sells one unit from a consumable stack.
pub fn sell_stack(run: &mut RunState, ctx: &mut TurnContext, key: &str) {
    let Some(template) = ctx.catalogs.consumables.by_key(key) else {
        ctx.log.push("No one wants that.".to_string());
        return;
    };
    let name = template.name.clone();
    let price = sell_price(template.price);
    if !remove_one(&mut run.inventory, key) {
        ctx.log.push(format!("No {} left to sell.", name));
        return;
    }
    run.gold += price;
    ctx.log.push(format!("Sold {} for {}g.", name, price));
}
