use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

use gloomdelve::core::world::{ActionIntent, Snapshot};
use gloomdelve::data::{upgrade_defs, UpgradeKind};
use gloomdelve::persistence::FileStore;
use gloomdelve::simulation::items::{GearKind, ItemEntry};
use gloomdelve::simulation::run::RunState;
use gloomdelve::systems::shop::TraderOffer;
use gloomdelve::Game;

const HELP: &str = "Commands: start [name] | resume | abandon | n/s/e/w | rest | wait | scout | attack | flee | use <key> | equip <id> | buy <slot> | sell <id|key> | yes | no | map | inv | shop | status | meta | upgrade <track> | respec | quit";

fn main() {
    println!("Gloomdelve (debug console)");
    let save_dir = parse_save_dir(env::args().collect());
    let mut game = Game::new(Box::new(FileStore::new(save_dir)));

    if game.has_saved_run() {
        println!("A saved expedition exists. `resume` to continue it.");
    }
    println!("{}", HELP);

    loop {
        print!("> ");
        if io::stdout().flush().is_err() {
            break;
        }

        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() {
            break;
        }
        let trimmed = input.trim();
        if trimmed.is_empty() {
            continue;
        }

        let mut parts = trimmed.split_whitespace();
        let cmd = parts.next().unwrap_or("").to_lowercase();

        match cmd.as_str() {
            "quit" | "exit" => break,
            "help" => println!("{}", HELP),
            "start" => {
                let name = parts.next().unwrap_or("Adventurer");
                let snap = game.start_run(name);
                print_snapshot(&snap);
            }
            "resume" => {
                if game.resume_run() {
                    print_snapshot(&game.snapshot());
                } else {
                    println!("No saved expedition to resume.");
                }
            }
            "abandon" => {
                game.abandon_run();
                println!("Expedition abandoned.");
            }
            "meta" => print_meta(&game),
            "upgrade" => {
                let Some(kind) = parts.next().and_then(parse_upgrade) else {
                    println!("Usage: upgrade <xp|gold|vitality|explorer>");
                    continue;
                };
                game.purchase_upgrade(kind);
                print_meta(&game);
            }
            "respec" => {
                game.respec_upgrades();
                print_meta(&game);
            }
            "map" => {
                let snap = game.snapshot();
                match snap.run.as_ref() {
                    Some(run) => print_map(run),
                    None => println!("No expedition is underway."),
                }
            }
            "inv" => {
                let snap = game.snapshot();
                match snap.run.as_ref() {
                    Some(run) => print_inventory(run),
                    None => println!("No expedition is underway."),
                }
            }
            "shop" => print_stock(&game.snapshot()),
            "status" => {
                let snap = game.snapshot();
                match snap.run.as_ref() {
                    Some(run) => print_status(run),
                    None => println!("No expedition is underway."),
                }
            }
            _ => match parse_intent(&cmd, &mut parts) {
                Some(intent) => {
                    let snap = game.tick(vec![intent]);
                    print_snapshot(&snap);
                }
                None => println!("Unknown command. Type 'help'."),
            },
        }
    }
}

fn parse_save_dir(args: Vec<String>) -> PathBuf {
    let mut iter = args.iter();
    let mut dir = PathBuf::from("./saves");
    while let Some(arg) = iter.next() {
        if arg == "--saves" {
            if let Some(value) = iter.next() {
                dir = PathBuf::from(value);
            }
        }
    }
    dir
}

fn parse_intent(cmd: &str, parts: &mut std::str::SplitWhitespace) -> Option<ActionIntent> {
    match cmd {
        "n" | "north" => Some(ActionIntent::Move { dx: 0, dy: -1 }),
        "s" | "south" => Some(ActionIntent::Move { dx: 0, dy: 1 }),
        "e" | "east" => Some(ActionIntent::Move { dx: 1, dy: 0 }),
        "w" | "west" => Some(ActionIntent::Move { dx: -1, dy: 0 }),
        "rest" => Some(ActionIntent::Rest),
        "wait" => Some(ActionIntent::Wait),
        "scout" => Some(ActionIntent::Scout),
        "attack" | "a" => Some(ActionIntent::Attack),
        "flee" => Some(ActionIntent::Flee),
        "yes" | "y" => Some(ActionIntent::Resolve { accepted: true }),
        "no" => Some(ActionIntent::Resolve { accepted: false }),
        "use" => parts.next().map(|key| ActionIntent::UseItem {
            key: key.to_string(),
        }),
        "equip" => parts
            .next()
            .and_then(|raw| raw.parse::<u64>().ok())
            .map(|gear_id| ActionIntent::Equip { gear_id }),
        "buy" => parts
            .next()
            .and_then(|raw| raw.parse::<usize>().ok())
            .map(|slot| ActionIntent::Buy { slot }),
        "sell" => {
            let raw = parts.next()?;
            match raw.parse::<u64>() {
                Ok(gear_id) => Some(ActionIntent::SellGear { gear_id }),
                Err(_) => Some(ActionIntent::SellStack {
                    key: raw.to_string(),
                }),
            }
        }
        _ => None,
    }
}

fn parse_upgrade(raw: &str) -> Option<UpgradeKind> {
    match raw.to_lowercase().as_str() {
        "xp" => Some(UpgradeKind::XpBoost),
        "gold" => Some(UpgradeKind::GoldBoost),
        "vitality" | "vit" => Some(UpgradeKind::Vitality),
        "explorer" => Some(UpgradeKind::Explorer),
        _ => None,
    }
}

fn print_snapshot(snap: &Snapshot) {
    for line in &snap.journal {
        println!("  {}", line);
    }
    for line in &snap.combat_log {
        println!("  [combat] {}", line);
    }
    let Some(run) = snap.run.as_ref() else {
        return;
    };
    if let Some(pending) = run.pending.as_ref() {
        println!(
            "? {} -- {} [yes: {} | no: {}]",
            pending.title, pending.body, pending.accept_label, pending.decline_label
        );
    }
    if let Some(enemy) = run.enemy.as_ref() {
        println!(
            "! {} ({}/{} HP) blocks your way.",
            enemy.name, enemy.hp, enemy.max_hp
        );
    }
    print_status(run);
}

fn print_status(run: &RunState) {
    println!(
        "{} | Depth {} | Lv {} ({}/{} XP) | {}/{} HP | {}g | scout x{}",
        run.name,
        run.depth,
        run.level,
        run.xp,
        run.xp_to_next,
        run.hp,
        run.max_hp,
        run.gold,
        run.scout_charges
    );
}

fn print_map(run: &RunState) {
    for y in 0..run.map_size {
        let mut row = String::new();
        for x in 0..run.map_size {
            let here = run.pos.x == x && run.pos.y == y;
            let exit = run.exit_discovered
                && run.exit_pos.map(|p| p.x == x && p.y == y).unwrap_or(false);
            row.push(if here {
                '@'
            } else if exit {
                '>'
            } else if run.map[y][x] {
                '.'
            } else {
                '#'
            });
        }
        println!("  {}", row);
    }
}

fn print_inventory(run: &RunState) {
    if let Some(weapon) = run.equipped.weapon.as_ref() {
        println!("  Wielding: {} (+{} ATK)", weapon.name, weapon.power);
    }
    if let Some(shield) = run.equipped.shield.as_ref() {
        println!(
            "  Braced: {} ({} DEF, {}% block)",
            shield.name, shield.power, shield.block_chance
        );
    }
    if run.inventory.is_empty() {
        println!("  Pack: empty");
        return;
    }
    for entry in &run.inventory {
        match entry {
            ItemEntry::Stack { key, qty } => println!("  {} x{}", key, qty),
            ItemEntry::Gear(gear) => {
                let stat = match gear.kind {
                    GearKind::Weapon => format!("+{} ATK", gear.power),
                    GearKind::Shield => {
                        format!("{} DEF, {}% block", gear.power, gear.block_chance)
                    }
                };
                println!(
                    "  [{}] {} ({}, {}) worth {}g",
                    gear.id, gear.name, stat, gear.rarity, gear.price
                );
            }
        }
    }
}

fn print_stock(snap: &Snapshot) {
    if snap.trader_offers.is_empty() {
        println!("No trader is present.");
        return;
    }
    println!("{}:", snap.trader_title);
    for (slot, offer) in snap.trader_offers.iter().enumerate() {
        match offer {
            TraderOffer::Gear(gear) => {
                let stat = match gear.kind {
                    GearKind::Weapon => format!("+{} ATK", gear.power),
                    GearKind::Shield => {
                        format!("{} DEF, {}% block", gear.power, gear.block_chance)
                    }
                };
                println!(
                    "  [{}] {} ({}, {}) -- {}g",
                    slot, gear.name, stat, gear.rarity, gear.price
                );
            }
            TraderOffer::Consumable { name, price, .. } => {
                println!("  [{}] {} -- {}g", slot, name, price);
            }
        }
    }
}

fn print_meta(game: &Game) {
    let meta = game.meta();
    println!("Tokens: {}", meta.tokens);
    for def in upgrade_defs() {
        let tier = meta.tier(def.kind);
        match meta.next_cost(def.kind) {
            Some(cost) => println!(
                "  {} {}/{} (next: {} tokens) -- {}",
                def.label, tier, def.max_tier, cost, def.description
            ),
            None => println!("  {} {}/{} (maxed)", def.label, tier, def.max_tier),
        }
    }
}
