use gloomdelve::core::world::ActionIntent;
use gloomdelve::data::{Catalogs, EnemyTemplate, ShieldTemplate, Tuning, UpgradeKind};
use gloomdelve::persistence::{MemoryStore, SaveStore};
use gloomdelve::rules::progression::player_damage_range;
use gloomdelve::simulation::combat::ActiveEnemy;
use gloomdelve::simulation::dice::{Dice, ScriptedDice, SeededDice};
use gloomdelve::simulation::items::{GearInstance, GearSource, ItemEntry};
use gloomdelve::simulation::meta::MetaState;
use gloomdelve::simulation::run::RunState;
use gloomdelve::systems::shop::{self, TraderOffer, TraderStock};
use gloomdelve::systems::{combat as combat_sys, encounter, movement, TurnContext};
use gloomdelve::Game;

/// Everything a TurnContext borrows, owned in one place so tests can
/// drive the per-action functions without a full ECS world.
struct Harness {
    meta: MetaState,
    catalogs: Catalogs,
    tuning: Tuning,
    dice: Box<dyn Dice>,
    store: MemoryStore,
    log: Vec<String>,
    combat_log: Vec<String>,
    stock: TraderStock,
}

impl Harness {
    fn new(dice: Box<dyn Dice>) -> Self {
        Self {
            meta: MetaState::default(),
            catalogs: Catalogs::builtin(),
            tuning: Tuning::default(),
            dice,
            store: MemoryStore::default(),
            log: Vec::new(),
            combat_log: Vec::new(),
            stock: TraderStock::default(),
        }
    }

    fn run(&mut self) -> RunState {
        RunState::new_run("Delver", &self.meta, &self.tuning, self.dice.as_mut())
    }

    fn ctx(&mut self) -> TurnContext<'_> {
        TurnContext {
            meta: &mut self.meta,
            catalogs: &self.catalogs,
            tuning: &self.tuning,
            dice: self.dice.as_mut(),
            store: &self.store,
            log: &mut self.log,
            combat_log: &mut self.combat_log,
            stock: &mut self.stock,
        }
    }
}

#[test]
fn movement_is_blocked_while_engaged() {
    // Exit lands on (0,0); move east rolls the enemy band and the first
    // weighted pick, so a Mutated Rat is waiting.
    let dice = ScriptedDice::new(&[0, 0, 0, 0, 1, 1]);
    let mut game = Game::with_dice(Box::new(MemoryStore::default()), Box::new(dice));
    game.start_run("Delver");

    let snap = game.tick(vec![ActionIntent::Move { dx: 1, dy: 0 }]);
    let run = snap.run.as_ref().unwrap();
    assert!(run.in_combat());
    let pos = run.pos;

    let snap = game.tick(vec![ActionIntent::Move { dx: 1, dy: 0 }]);
    let run = snap.run.as_ref().unwrap();
    assert_eq!(run.pos, pos);
    assert!(snap
        .journal
        .iter()
        .any(|line| line.contains("You cannot move while engaged")));
}

#[test]
fn revisits_are_quiet_and_the_current_cell_is_discovered() {
    // East into an empty room (roll 99), then back west onto explored
    // ground: no second encounter roll is consumed.
    let dice = ScriptedDice::new(&[0, 0, 0, 0, 99, 0, 0]);
    let mut game = Game::with_dice(Box::new(MemoryStore::default()), Box::new(dice));
    game.start_run("Delver");

    let snap = game.tick(vec![ActionIntent::Move { dx: 1, dy: 0 }]);
    assert!(snap
        .journal
        .iter()
        .any(|line| line.contains("This room appears empty")));

    let snap = game.tick(vec![ActionIntent::Move { dx: -1, dy: 0 }]);
    let run = snap.run.as_ref().unwrap();
    assert!(snap
        .journal
        .iter()
        .any(|line| line.contains("already explored")));
    assert!(run.map[run.pos.y][run.pos.x]);
    assert!(run.map[3][4]);
}

#[test]
fn death_converts_into_tokens_and_wipes_the_save() {
    // Engage a rat, then fail to flee four times while it rolls max
    // damage; 4 x 5 covers the starting 20 hp exactly.
    let mut script = vec![0, 0, 0, 0, 1, 1];
    for _ in 0..4 {
        script.extend_from_slice(&[100, 5]);
    }
    let dice = ScriptedDice::new(&script);
    let mut game = Game::with_dice(Box::new(MemoryStore::default()), Box::new(dice));
    game.start_run("Delver");
    game.tick(vec![ActionIntent::Move { dx: 1, dy: 0 }]);

    let mut snap = game.tick(vec![ActionIntent::Flee]);
    for _ in 0..3 {
        snap = game.tick(vec![ActionIntent::Flee]);
    }

    let run = snap.run.as_ref().unwrap();
    assert!(run.dead);
    assert_eq!(run.hp, 0);
    // Depth 1, level 1, no gold: floor(2 + 1 + 0) tokens.
    assert_eq!(snap.tokens, 3);
    assert!(snap.journal.iter().any(|line| line.contains("You are dead")));
    assert!(!game.has_saved_run());
}

#[test]
fn vitality_tiers_raise_starting_hp() {
    let store = MemoryStore::default();
    let mut meta = MetaState::default();
    meta.upgrades.insert(UpgradeKind::Vitality, 3);
    store.save_meta(&meta);

    let mut game = Game::seeded(Box::new(store), 7);
    let snap = game.start_run("Hardy");
    let run = snap.run.unwrap();
    assert_eq!((run.hp, run.max_hp), (26, 26));
}

#[test]
fn upgrade_purchases_and_respec_settle_the_bank() {
    let store = MemoryStore::default();
    let meta = MetaState {
        tokens: 20,
        ..Default::default()
    };
    store.save_meta(&meta);

    let mut game = Game::seeded(Box::new(store), 1);
    game.purchase_upgrade(UpgradeKind::XpBoost); // 2 tokens
    game.purchase_upgrade(UpgradeKind::Explorer); // 6 tokens
    let meta = game.meta();
    assert_eq!(meta.tokens, 12);
    assert_eq!(meta.tier(UpgradeKind::XpBoost), 1);
    assert_eq!(meta.tier(UpgradeKind::Explorer), 1);

    game.respec_upgrades(); // refund floor(0.75 * 8)
    let meta = game.meta();
    assert_eq!(meta.tokens, 18);
    assert_eq!(meta.tier(UpgradeKind::XpBoost), 0);
    assert_eq!(meta.tier(UpgradeKind::Explorer), 0);

    let mut broke = Game::seeded(Box::new(MemoryStore::default()), 1);
    broke.purchase_upgrade(UpgradeKind::GoldBoost);
    assert_eq!(broke.meta().tier(UpgradeKind::GoldBoost), 0);
}

#[test]
fn boss_defeat_descends_exactly_once_without_a_prompt() {
    let mut harness = Harness::new(Box::new(SeededDice::new(5)));
    let mut run = harness.run();
    run.depth = 4;
    run.max_hp = 400;
    run.hp = 400;
    run.descend(&harness.meta, &harness.tuning, harness.dice.as_mut());
    assert_eq!(run.depth, 5);
    assert_eq!(run.map_size, 1);
    assert!(run.exit_pos.is_none());

    let mut ctx = harness.ctx();
    encounter::enter_floor(&mut run, &mut ctx);
    {
        let enemy = run.enemy.as_ref().expect("boss should engage on arrival");
        assert!(enemy.is_boss);
        assert_eq!(enemy.name, "Crypt Warden");
    }

    combat_sys::try_flee(&mut run, &mut ctx);
    assert!(run.enemy.is_some(), "flee must be refused in a boss lair");
    assert!(ctx
        .combat_log
        .iter()
        .any(|line| line.contains("The lair is sealed")));
    assert!(run.hp > 0);

    run.enemy.as_mut().unwrap().hp = 1;
    combat_sys::player_attack(&mut run, &mut ctx);
    assert_eq!(run.depth, 6, "victory takes the stairs exactly once");
    assert!(run.enemy.is_none());
    assert!(run.pending.is_none());
    assert!(run.exit_pos.is_some());
}

#[test]
fn repeated_rests_decay_and_bottom_out_at_one() {
    let mut script = vec![0, 0];
    for _ in 0..12 {
        script.extend_from_slice(&[6, 100]); // max die, no ambush
    }
    let mut harness = Harness::new(Box::new(ScriptedDice::new(&script)));
    let mut run = harness.run();
    run.max_hp = 500;
    let mut ctx = harness.ctx();

    let mut last = i32::MAX;
    for _ in 0..8 {
        run.hp = 100;
        movement::rest(&mut run, &mut ctx);
        let healed = run.hp - 100;
        assert!(healed >= 1);
        assert!(healed <= last, "heals must never increase within a floor");
        last = healed;
    }

    run.rests_this_floor = 400;
    run.hp = 100;
    movement::rest(&mut run, &mut ctx);
    assert_eq!(run.hp - 100, 1);
}

#[test]
fn shield_blocks_cap_at_incoming_damage() {
    let mut harness = Harness::new(Box::new(ScriptedDice::new(&[0, 0, 3, 1])));
    let mut run = harness.run();

    let template = EnemyTemplate {
        key: "test".into(),
        name: "Test Brute".into(),
        hp: 10,
        atk: (3, 3),
        gold: (1, 1),
        xp: 1,
        min_depth: 1,
    };
    run.enemy = Some(ActiveEnemy::from_template(&template));
    let shield = ShieldTemplate {
        key: "tower".into(),
        name: "Tower Shield".into(),
        def: 4,
        block_chance: 100,
        min_depth: 1,
        weight: 1,
    };
    run.equipped.shield = Some(GearInstance::shield_drop(1, &shield, 1, GearSource::Drop));

    let before = run.hp;
    let mut ctx = harness.ctx();
    combat_sys::enemy_attack(&mut run, &mut ctx);
    assert_eq!(run.hp, before, "a 4 DEF block swallows a 3 damage hit");
    assert!(ctx
        .combat_log
        .iter()
        .any(|line| line.contains("reduces damage by 3")));
}

#[test]
fn weapon_trader_stock_and_purchases() {
    let mut harness = Harness::new(Box::new(ScriptedDice::new(&[0, 0, 1, 85, 1, 85])));
    let mut run = harness.run();
    let mut ctx = harness.ctx();

    shop::stock_weapon_trader(&mut run, &mut ctx);
    assert_eq!(ctx.stock.offers.len(), 3, "two weapons plus a bomb");
    assert!(matches!(ctx.stock.offers[0], TraderOffer::Gear(_)));
    assert!(matches!(ctx.stock.offers[2], TraderOffer::Consumable { .. }));

    shop::buy(&mut run, &mut ctx, 0);
    assert!(ctx
        .log
        .iter()
        .any(|line| line.contains("Not enough gold")));
    assert!(!run
        .inventory
        .iter()
        .any(|entry| matches!(entry, ItemEntry::Gear(_))));

    run.gold = 10_000;
    shop::buy(&mut run, &mut ctx, 0);
    assert!(run
        .inventory
        .iter()
        .any(|entry| matches!(entry, ItemEntry::Gear(_))));
    assert_eq!(ctx.stock.offers.len(), 2, "bought gear leaves the stock");
    assert!(run.gold < 10_000);
}

#[test]
fn selling_gear_pays_half_rounded_down() {
    let mut harness = Harness::new(Box::new(SeededDice::new(2)));
    let mut run = harness.run();
    let template = harness
        .catalogs
        .gear
        .weapon_by_key("iron_saber")
        .expect("catalog weapon")
        .clone();
    let gear = GearInstance::weapon_drop(7, &template, 3, GearSource::Drop);
    let price = gear.price;
    run.inventory.push(ItemEntry::Gear(gear));

    let mut ctx = harness.ctx();
    shop::sell_gear(&mut run, &mut ctx, 7);
    assert_eq!(run.gold, (price / 2).max(1));
    assert!(!run
        .inventory
        .iter()
        .any(|entry| matches!(entry, ItemEntry::Gear(_))));
}

#[test]
fn player_damage_stays_in_bounds_over_many_rolls() {
    let tuning = Tuning::default();
    let mut dice = SeededDice::new(123);
    for _ in 0..10_000 {
        let level = dice.int_range(1, 20);
        let weapon = dice.int_range(0, 10);
        let (lo, hi) = player_damage_range(level, weapon, &tuning);
        assert!(lo <= hi);
        let dmg = dice.int_range(lo, hi);
        assert!((lo..=hi).contains(&dmg));
    }
}
