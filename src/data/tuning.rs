use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use super::CatalogError;

/// d100 encounter table widths. Must sum to exactly 100 so every roll
/// lands in a band.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EncounterWeights {
    pub enemy: i32,
    pub loot: i32,
    pub trap: i32,
    pub chest: i32,
    pub fountain: i32,
    pub campfire: i32,
    pub ore: i32,
    pub secret: i32,
    pub tablet: i32,
    pub weapon_trader: i32,
    pub trader: i32,
    pub empty: i32,
}

impl Default for EncounterWeights {
    fn default() -> Self {
        Self {
            enemy: 40,
            loot: 12,
            trap: 10,
            chest: 9,
            fountain: 7,
            campfire: 6,
            ore: 5,
            secret: 3,
            tablet: 3,
            weapon_trader: 2,
            trader: 1,
            empty: 2,
        }
    }
}

impl EncounterWeights {
    pub fn total(&self) -> i32 {
        self.enemy
            + self.loot
            + self.trap
            + self.chest
            + self.fountain
            + self.campfire
            + self.ore
            + self.secret
            + self.tablet
            + self.weapon_trader
            + self.trader
            + self.empty
    }
}

/// Every balance constant in one record, so tests can pin or distort a
/// single knob without touching the systems that read it.
#[derive(Debug, Clone, Resource, Serialize, Deserialize)]
pub struct Tuning {
    pub encounter: EncounterWeights,
    /// Percent chance a defeated enemy drops a weapon / a shield.
    pub weapon_drop_chance: i32,
    pub shield_drop_chance: i32,
    /// Movement steps before a trader can appear again.
    pub trader_cooldown: u32,
    pub flee_chance: i32,
    pub rest_ambush_chance: i32,
    pub wait_encounter_chance: i32,
    /// Percent chance a won fight reveals a shortcut down.
    pub bonus_descent_chance: i32,
    /// Unarmed player damage range before level and weapon bonuses.
    pub base_damage: (i32, i32),
    pub level_up_hp: i32,
    pub xp_growth: f64,
    pub xp_to_next_start: i32,
    pub map_size: usize,
    pub rest_heal_die: (i32, i32),
    /// Exponential decay applied per sqrt(rests) to repeated rest heals.
    pub rest_decay: f64,
    /// Every Nth depth is a boss floor.
    pub boss_interval: u32,
    pub token_multiplier: f64,
    pub mimic_chance: i32,
    pub campfire_ambush_chance: i32,
    pub ore_collapse_chance: i32,
    /// Enemies whose hp exceeds `hp_ceiling_base + hp_ceiling_per_depth * depth`
    /// are filtered from the spawn pool when anything else qualifies.
    pub hp_ceiling_base: i32,
    pub hp_ceiling_per_depth: i32,
    /// Spawn weighting: flat base, bonus for freshly unlocked enemies,
    /// divisor applied to oversized survivors of the hp filter.
    pub spawn_weight_base: i32,
    pub recent_unlock_bonus: i32,
    pub elite_hp_threshold: i32,
    pub elite_weight_divisor: i32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            encounter: EncounterWeights::default(),
            weapon_drop_chance: 12,
            shield_drop_chance: 7,
            trader_cooldown: 8,
            flee_chance: 55,
            rest_ambush_chance: 10,
            wait_encounter_chance: 15,
            bonus_descent_chance: 5,
            base_damage: (2, 6),
            level_up_hp: 4,
            xp_growth: 1.35,
            xp_to_next_start: 10,
            map_size: 7,
            rest_heal_die: (1, 6),
            rest_decay: 0.75,
            boss_interval: 5,
            token_multiplier: 1.0,
            mimic_chance: 15,
            campfire_ambush_chance: 10,
            ore_collapse_chance: 20,
            hp_ceiling_base: 10,
            hp_ceiling_per_depth: 4,
            spawn_weight_base: 10,
            recent_unlock_bonus: 15,
            elite_hp_threshold: 30,
            elite_weight_divisor: 4,
        }
    }
}

impl Tuning {
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.encounter.total() != 100 {
            return Err(CatalogError::Validation(format!(
                "encounter weights sum to {}, expected 100",
                self.encounter.total()
            )));
        }
        if self.map_size == 0 || self.boss_interval == 0 {
            return Err(CatalogError::Validation(
                "map size and boss interval must be positive".to_string(),
            ));
        }
        if self.base_damage.0 > self.base_damage.1 || self.rest_heal_die.0 > self.rest_heal_die.1 {
            return Err(CatalogError::Validation(
                "tuning damage ranges are inverted".to_string(),
            ));
        }
        Ok(())
    }

    /// Hp above which an enemy is pushed out of the spawn pool at `depth`.
    pub fn hp_ceiling(&self, depth: u32) -> i32 {
        self.hp_ceiling_base + self.hp_ceiling_per_depth * depth as i32
    }

    pub fn is_boss_depth(&self, depth: u32) -> bool {
        depth > 0 && depth % self.boss_interval == 0
    }
}

/// Optional override table. A missing file is the normal case and stays
/// quiet; a present but broken one is reported and ignored.
pub fn load_or_default(path: impl AsRef<std::path::Path>) -> Tuning {
    let path = path.as_ref();
    if !path.exists() {
        return Tuning::default();
    }
    let loaded: Result<Tuning, _> = super::read_catalog_file(path);
    match loaded {
        Ok(tuning) => match tuning.validate() {
            Ok(()) => tuning,
            Err(err) => {
                eprintln!("Rejecting tuning override {}: {}", path.display(), err);
                Tuning::default()
            }
        },
        Err(err) => {
            eprintln!("{}", err);
            Tuning::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tuning_is_valid() {
        Tuning::default().validate().unwrap();
    }

    #[test]
    fn boss_floors_fall_on_the_interval() {
        let tuning = Tuning::default();
        assert!(!tuning.is_boss_depth(1));
        assert!(!tuning.is_boss_depth(4));
        assert!(tuning.is_boss_depth(5));
        assert!(tuning.is_boss_depth(10));
    }
}
