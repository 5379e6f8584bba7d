use serde::{Deserialize, Serialize};

use crate::data::Tuning;
use crate::simulation::combat::ActiveEnemy;
use crate::simulation::decision::PendingDecision;
use crate::simulation::dice::Dice;
use crate::simulation::items::{GearInstance, ItemEntry};
use crate::simulation::meta::MetaState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

/// Equipped slots. Gear lives here or in the inventory, never both.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Equipped {
    pub weapon: Option<GearInstance>,
    pub shield: Option<GearInstance>,
}

/// Everything a single expedition owns. Serializes losslessly, including
/// a fight in progress, so a reload drops the player back mid-combat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    pub name: String,
    pub level: i32,
    pub xp: i32,
    pub xp_to_next: i32,
    pub gold: i32,
    pub depth: u32,
    pub hp: i32,
    pub max_hp: i32,
    pub pos: Pos,
    pub map_size: usize,
    /// Discovered flags, indexed map[y][x].
    pub map: Vec<Vec<bool>>,
    pub exit_pos: Option<Pos>,
    pub exit_discovered: bool,
    pub inventory: Vec<ItemEntry>,
    pub equipped: Equipped,
    pub enemy: Option<ActiveEnemy>,
    pub trader_cooldown: u32,
    pub scout_charges: u32,
    pub rests_this_floor: u32,
    pub pending: Option<PendingDecision>,
    pub next_gear_id: u64,
    pub dead: bool,
    /// Set once the death bookkeeping (token award, save wipe) has run.
    #[serde(default)]
    pub death_resolved: bool,
}

impl RunState {
    /// Fresh run at depth 1 with meta bonuses applied. The player starts
    /// at the center of the floor with one potion.
    pub fn new_run(name: &str, meta: &MetaState, tuning: &Tuning, dice: &mut dyn Dice) -> Self {
        let size = tuning.map_size.max(1);
        let start_hp = 20 + meta.bonus_max_hp();
        let mut run = Self {
            name: name.to_string(),
            level: 1,
            xp: 0,
            xp_to_next: tuning.xp_to_next_start,
            gold: 0,
            depth: 1,
            hp: start_hp,
            max_hp: start_hp,
            pos: Pos {
                x: size / 2,
                y: size / 2,
            },
            map_size: size,
            map: vec![vec![false; size]; size],
            exit_pos: None,
            exit_discovered: false,
            inventory: vec![ItemEntry::Stack {
                key: "potion".to_string(),
                qty: 1,
            }],
            equipped: Equipped::default(),
            enemy: None,
            trader_cooldown: 0,
            scout_charges: meta.scout_per_floor(),
            rests_this_floor: 0,
            pending: None,
            next_gear_id: 1,
            dead: false,
            death_resolved: false,
        };
        run.map[run.pos.y][run.pos.x] = true;
        run.generate_exit(dice);
        run
    }

    pub fn in_combat(&self) -> bool {
        self.enemy.is_some()
    }

    pub fn alloc_gear_id(&mut self) -> u64 {
        let id = self.next_gear_id;
        self.next_gear_id += 1;
        id
    }

    /// Places the stairwell on a random cell the player is not standing
    /// on, hidden until stepped on.
    pub fn generate_exit(&mut self, dice: &mut dyn Dice) {
        if self.map_size <= 1 {
            self.exit_pos = None;
            self.exit_discovered = false;
            return;
        }
        let max = self.map_size as i32 - 1;
        loop {
            let x = dice.int_range(0, max) as usize;
            let y = dice.int_range(0, max) as usize;
            if x != self.pos.x || y != self.pos.y {
                self.exit_pos = Some(Pos { x, y });
                self.exit_discovered = false;
                return;
            }
        }
    }

    /// Advances to the next floor: fresh fog, player at the origin, new
    /// exit, scout charges refreshed. Boss floors are a single lit cell
    /// with no stairwell; the fight itself is the way down.
    pub fn descend(&mut self, meta: &MetaState, tuning: &Tuning, dice: &mut dyn Dice) {
        self.depth += 1;
        self.rests_this_floor = 0;
        self.scout_charges = meta.scout_per_floor();
        if tuning.is_boss_depth(self.depth) {
            self.map_size = 1;
            self.map = vec![vec![true; 1]; 1];
            self.pos = Pos { x: 0, y: 0 };
            self.exit_pos = None;
            self.exit_discovered = false;
            return;
        }
        self.map_size = tuning.map_size.max(1);
        self.map = vec![vec![false; self.map_size]; self.map_size];
        self.pos = Pos { x: 0, y: 0 };
        self.map[0][0] = true;
        self.generate_exit(dice);
    }

    pub fn heal(&mut self, amount: i32) -> i32 {
        let healed = amount.max(0).min(self.max_hp - self.hp);
        self.hp += healed;
        healed
    }

    /// Fills in anything a hand-edited or older save left missing so the
    /// rest of the engine never has to defend against a malformed run.
    pub fn sanitize(&mut self, tuning: &Tuning, dice: &mut dyn Dice) {
        if self.map_size == 0 {
            self.map_size = tuning.map_size.max(1);
        }
        if self.map.len() != self.map_size || self.map.iter().any(|row| row.len() != self.map_size)
        {
            self.map = vec![vec![false; self.map_size]; self.map_size];
        }
        self.pos.x = self.pos.x.min(self.map_size - 1);
        self.pos.y = self.pos.y.min(self.map_size - 1);
        self.map[self.pos.y][self.pos.x] = true;

        if self.max_hp <= 0 {
            self.max_hp = 20;
        }
        self.hp = self.hp.clamp(0, self.max_hp);
        if self.xp_to_next <= 0 {
            self.xp_to_next = tuning.xp_to_next_start;
        }
        if self.level <= 0 {
            self.level = 1;
        }
        if self.depth == 0 {
            self.depth = 1;
        }
        if let Some(enemy) = &self.enemy {
            if enemy.hp <= 0 || enemy.atk.0 > enemy.atk.1 {
                self.enemy = None;
            }
        }
        if let Some(exit) = self.exit_pos {
            if exit.x >= self.map_size || exit.y >= self.map_size {
                self.exit_pos = None;
            }
        }
        if self.exit_pos.is_none() && !tuning.is_boss_depth(self.depth) {
            self.generate_exit(dice);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::dice::SeededDice;

    fn fresh_run() -> RunState {
        let meta = MetaState::default();
        let tuning = Tuning::default();
        let mut dice = SeededDice::new(11);
        RunState::new_run("Adventurer", &meta, &tuning, &mut dice)
    }

    #[test]
    fn new_run_starts_at_center_with_exit_elsewhere() {
        let run = fresh_run();
        assert_eq!(run.pos, Pos { x: 3, y: 3 });
        assert!(run.map[3][3]);
        let exit = run.exit_pos.unwrap();
        assert_ne!(exit, run.pos);
        assert!(!run.exit_discovered);
        assert_eq!((run.hp, run.max_hp), (20, 20));
    }

    #[test]
    fn descend_resets_floor_and_counters() {
        let meta = MetaState::default();
        let tuning = Tuning::default();
        let mut dice = SeededDice::new(11);
        let mut run = fresh_run();
        run.rests_this_floor = 3;
        run.descend(&meta, &tuning, &mut dice);
        assert_eq!(run.depth, 2);
        assert_eq!(run.pos, Pos { x: 0, y: 0 });
        assert_eq!(run.rests_this_floor, 0);
        assert!(run.map[0][0]);
        assert_eq!(run.map.iter().flatten().filter(|d| **d).count(), 1);
    }

    #[test]
    fn boss_floor_is_a_single_cell_without_exit() {
        let meta = MetaState::default();
        let tuning = Tuning::default();
        let mut dice = SeededDice::new(11);
        let mut run = fresh_run();
        run.depth = 4;
        run.descend(&meta, &tuning, &mut dice);
        assert_eq!(run.depth, 5);
        assert_eq!(run.map_size, 1);
        assert!(run.exit_pos.is_none());
    }

    #[test]
    fn sanitize_repairs_a_mangled_save() {
        let tuning = Tuning::default();
        let mut dice = SeededDice::new(3);
        let mut run = fresh_run();
        run.map = Vec::new();
        run.pos = Pos { x: 99, y: 99 };
        run.hp = 999;
        run.exit_pos = None;
        run.sanitize(&tuning, &mut dice);
        assert_eq!(run.map.len(), run.map_size);
        assert!(run.pos.x < run.map_size && run.pos.y < run.map_size);
        assert!(run.hp <= run.max_hp);
        assert!(run.exit_pos.is_some());
    }

    #[test]
    fn run_round_trips_through_json_mid_combat() {
        use crate::data::EnemyTemplate;
        use crate::simulation::combat::ActiveEnemy;

        let mut run = fresh_run();
        let template = EnemyTemplate {
            key: "rat".into(),
            name: "Mutated Rat".into(),
            hp: 6,
            atk: (1, 5),
            gold: (1, 3),
            xp: 2,
            min_depth: 1,
        };
        let mut enemy = ActiveEnemy::from_template(&template);
        enemy.take_damage(2);
        run.enemy = Some(enemy);

        let raw = serde_json::to_string(&run).unwrap();
        let back: RunState = serde_json::from_str(&raw).unwrap();
        assert_eq!(back.enemy.as_ref().unwrap().hp, 4);
        assert_eq!(back.pos, run.pos);
        assert_eq!(back.map, run.map);
    }
}
