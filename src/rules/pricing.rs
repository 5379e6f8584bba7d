use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::{ShieldTemplate, WeaponTemplate};

/// Display tier derived from a piece's final stats, never stored in the
/// catalogs. Tuning a template's numbers re-tiers it automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
        };
        write!(f, "{}", label)
    }
}

pub fn weapon_rarity(atk: i32) -> Rarity {
    if atk >= 7 {
        Rarity::Epic
    } else if atk >= 5 {
        Rarity::Rare
    } else if atk >= 3 {
        Rarity::Uncommon
    } else {
        Rarity::Common
    }
}

pub fn shield_rarity(def: i32) -> Rarity {
    if def >= 5 {
        Rarity::Epic
    } else if def >= 3 {
        Rarity::Rare
    } else if def >= 2 {
        Rarity::Uncommon
    } else {
        Rarity::Common
    }
}

/// Shop asking price for a weapon with final attack `atk` at `depth`.
pub fn weapon_shop_price(atk: i32, depth: u32) -> i32 {
    50 + 40 * atk + 10 * depth as i32
}

/// Appraised value of a weapon found as loot. Drops are worth less than
/// shop stock so selling a fresh drop never funds a better purchase.
pub fn weapon_drop_price(atk: i32, depth: u32) -> i32 {
    25 + 25 * atk + 6 * (depth.saturating_sub(1)) as i32
}

fn shield_effectiveness(shield: &ShieldTemplate) -> f64 {
    shield.def as f64 * shield.block_chance as f64 / 100.0
}

pub fn shield_shop_price(shield: &ShieldTemplate, depth: u32) -> i32 {
    (60.0 + 140.0 * shield_effectiveness(shield) + 12.0 * depth as f64).round() as i32
}

pub fn shield_drop_price(shield: &ShieldTemplate, depth: u32) -> i32 {
    (30.0 + 90.0 * shield_effectiveness(shield) + 8.0 * depth.saturating_sub(1) as f64).round()
        as i32
}

/// Weapons sold by a trader are scaled-down replicas; this applies the
/// scale factor with a floor of 1 attack.
pub fn scaled_weapon_power(template: &WeaponTemplate, factor: f64) -> i32 {
    ((template.atk as f64 * factor).floor() as i32).max(1)
}

/// Everything sells for half its listed price, minimum one gold.
pub fn sell_price(price: i32) -> i32 {
    ((price as f64 * 0.5).floor() as i32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rarity_tiers_are_monotonic() {
        assert_eq!(weapon_rarity(1), Rarity::Common);
        assert_eq!(weapon_rarity(3), Rarity::Uncommon);
        assert_eq!(weapon_rarity(5), Rarity::Rare);
        assert_eq!(weapon_rarity(7), Rarity::Epic);
        assert_eq!(shield_rarity(1), Rarity::Common);
        assert_eq!(shield_rarity(5), Rarity::Epic);
    }

    #[test]
    fn sell_price_is_half_rounded_down_with_floor() {
        assert_eq!(sell_price(100), 50);
        assert_eq!(sell_price(25), 12);
        assert_eq!(sell_price(1), 1);
        assert_eq!(sell_price(0), 1);
    }

    #[test]
    fn drop_prices_stay_below_shop_prices() {
        let shield = ShieldTemplate {
            key: "test".into(),
            name: "Test".into(),
            def: 4,
            block_chance: 12,
            min_depth: 1,
            weight: 1,
        };
        for depth in 1..=20 {
            assert!(weapon_drop_price(5, depth) < weapon_shop_price(5, depth));
            assert!(shield_drop_price(&shield, depth) < shield_shop_price(&shield, depth));
        }
    }

    #[test]
    fn scaled_power_never_drops_below_one() {
        let template = WeaponTemplate {
            key: "shiv".into(),
            name: "Shiv".into(),
            atk: 1,
            min_depth: 1,
            weight: 1,
        };
        assert_eq!(scaled_weapon_power(&template, 0.7), 1);
    }
}
