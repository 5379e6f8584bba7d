use serde::{Deserialize, Serialize};

/// Permanent upgrade tracks bought with tokens between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UpgradeKind {
    XpBoost,
    GoldBoost,
    Vitality,
    Explorer,
}

#[derive(Debug, Clone)]
pub struct UpgradeDef {
    pub kind: UpgradeKind,
    pub label: &'static str,
    pub description: &'static str,
    pub max_tier: u32,
    pub cost_base: u64,
    pub cost_step: u64,
}

impl UpgradeDef {
    /// Token cost to buy the next tier when `tier` are already owned.
    pub fn cost(&self, tier: u32) -> u64 {
        self.cost_base + self.cost_step * tier as u64
    }
}

pub fn upgrade_defs() -> &'static [UpgradeDef] {
    const DEFS: &[UpgradeDef] = &[
        UpgradeDef {
            kind: UpgradeKind::XpBoost,
            label: "Scholar's Insight",
            description: "+10% experience per tier (caps at +100%)",
            max_tier: 10,
            cost_base: 2,
            cost_step: 2,
        },
        UpgradeDef {
            kind: UpgradeKind::GoldBoost,
            label: "Merchant's Luck",
            description: "+10% gold per tier (caps at +50%)",
            max_tier: 5,
            cost_base: 3,
            cost_step: 3,
        },
        UpgradeDef {
            kind: UpgradeKind::Vitality,
            label: "Iron Constitution",
            description: "+2 starting max HP per tier",
            max_tier: 12,
            cost_base: 4,
            cost_step: 3,
        },
        UpgradeDef {
            kind: UpgradeKind::Explorer,
            label: "Pathfinder's Sense",
            description: "One scout pulse per floor per tier (max 3)",
            max_tier: 3,
            cost_base: 6,
            cost_step: 6,
        },
    ];
    DEFS
}

pub fn def_for(kind: UpgradeKind) -> &'static UpgradeDef {
    match kind {
        UpgradeKind::XpBoost => &upgrade_defs()[0],
        UpgradeKind::GoldBoost => &upgrade_defs()[1],
        UpgradeKind::Vitality => &upgrade_defs()[2],
        UpgradeKind::Explorer => &upgrade_defs()[3],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn costs_grow_linearly() {
        let xp = def_for(UpgradeKind::XpBoost);
        assert_eq!(xp.cost(0), 2);
        assert_eq!(xp.cost(1), 4);
        assert_eq!(xp.cost(4), 10);
    }

    #[test]
    fn def_lookup_matches_kind() {
        for def in upgrade_defs() {
            assert_eq!(def_for(def.kind).kind, def.kind);
        }
    }
}
