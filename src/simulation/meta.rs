use std::collections::BTreeMap;

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::data::{def_for, upgrade_defs, UpgradeKind};
use crate::persistence::SaveStore;

/// Progress that outlives runs: the token bank and permanent upgrade
/// tiers. Every mutation writes through to the save store immediately.
#[derive(Debug, Clone, Default, Resource, Serialize, Deserialize)]
pub struct MetaState {
    pub tokens: u64,
    #[serde(default)]
    pub upgrades: BTreeMap<UpgradeKind, u32>,
}

impl MetaState {
    pub fn tier(&self, kind: UpgradeKind) -> u32 {
        self.upgrades.get(&kind).copied().unwrap_or(0)
    }

    pub fn xp_multiplier(&self) -> f64 {
        (1.0 + 0.1 * self.tier(UpgradeKind::XpBoost) as f64).min(2.0)
    }

    pub fn gold_multiplier(&self) -> f64 {
        (1.0 + 0.1 * self.tier(UpgradeKind::GoldBoost) as f64).min(1.5)
    }

    pub fn heal_multiplier(&self) -> f64 {
        (1.0 + 0.05 * self.tier(UpgradeKind::Vitality) as f64).min(1.25)
    }

    pub fn bonus_max_hp(&self) -> i32 {
        2 * self.tier(UpgradeKind::Vitality) as i32
    }

    pub fn scout_per_floor(&self) -> u32 {
        self.tier(UpgradeKind::Explorer).min(3)
    }

    pub fn next_cost(&self, kind: UpgradeKind) -> Option<u64> {
        let def = def_for(kind);
        let tier = self.tier(kind);
        if tier >= def.max_tier {
            return None;
        }
        Some(def.cost(tier))
    }

    /// Buys one tier. Silently does nothing when the track is capped or
    /// the bank cannot cover it.
    pub fn purchase(&mut self, kind: UpgradeKind, store: &dyn SaveStore) {
        let Some(cost) = self.next_cost(kind) else {
            return;
        };
        if self.tokens < cost {
            return;
        }
        self.tokens -= cost;
        *self.upgrades.entry(kind).or_insert(0) += 1;
        store.save_meta(self);
    }

    /// Refunds 75% of everything ever spent (rounded down) and zeroes
    /// all tiers.
    pub fn respec(&mut self, store: &dyn SaveStore) {
        let mut spent: u64 = 0;
        for def in upgrade_defs() {
            let owned = self.tier(def.kind);
            for tier in 0..owned {
                spent += def.cost(tier);
            }
        }
        self.tokens += (spent as f64 * 0.75).floor() as u64;
        self.upgrades.clear();
        store.save_meta(self);
    }

    /// Converts a finished run into tokens: deeper, higher-level, richer
    /// runs pay more, and even an instant death pays one.
    pub fn award_run_tokens(
        &mut self,
        depth: u32,
        level: i32,
        gold: i32,
        token_multiplier: f64,
        store: &dyn SaveStore,
    ) -> u64 {
        let raw = (2.0 * depth as f64 + level.max(0) as f64 + gold.max(0) as f64 / 50.0)
            * token_multiplier;
        let earned = (raw.floor() as u64).max(1);
        self.tokens += earned;
        store.save_meta(self);
        earned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn purchase_is_a_no_op_when_capped_or_broke() {
        let store = MemoryStore::default();
        let mut meta = MetaState::default();
        meta.purchase(UpgradeKind::XpBoost, &store);
        assert_eq!(meta.tier(UpgradeKind::XpBoost), 0);
        assert_eq!(meta.tokens, 0);

        meta.tokens = 1_000;
        let def = def_for(UpgradeKind::Explorer);
        for _ in 0..10 {
            meta.purchase(UpgradeKind::Explorer, &store);
        }
        assert_eq!(meta.tier(UpgradeKind::Explorer), def.max_tier);
    }

    #[test]
    fn multipliers_cap() {
        let mut meta = MetaState::default();
        meta.upgrades.insert(UpgradeKind::XpBoost, 10);
        meta.upgrades.insert(UpgradeKind::GoldBoost, 5);
        meta.upgrades.insert(UpgradeKind::Vitality, 12);
        meta.upgrades.insert(UpgradeKind::Explorer, 3);
        assert!((meta.xp_multiplier() - 2.0).abs() < 1e-9);
        assert!((meta.gold_multiplier() - 1.5).abs() < 1e-9);
        assert!((meta.heal_multiplier() - 1.25).abs() < 1e-9);
        assert_eq!(meta.bonus_max_hp(), 24);
        assert_eq!(meta.scout_per_floor(), 3);
    }

    #[test]
    fn respec_refunds_three_quarters_of_spend() {
        let store = MemoryStore::default();
        let mut meta = MetaState {
            tokens: 100,
            ..Default::default()
        };
        // Two XpBoost tiers cost 2 then 4.
        meta.purchase(UpgradeKind::XpBoost, &store);
        meta.purchase(UpgradeKind::XpBoost, &store);
        assert_eq!(meta.tokens, 94);
        meta.respec(&store);
        assert_eq!(meta.tier(UpgradeKind::XpBoost), 0);
        assert_eq!(meta.tokens, 94 + 4);
    }

    #[test]
    fn token_award_never_pays_zero() {
        let store = MemoryStore::default();
        let mut meta = MetaState::default();
        let earned = meta.award_run_tokens(0, 0, 0, 1.0, &store);
        assert_eq!(earned, 1);
        let deep = meta.award_run_tokens(10, 8, 250, 1.0, &store);
        assert_eq!(deep, 33);
    }
}
