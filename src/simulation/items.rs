use serde::{Deserialize, Serialize};

use crate::data::{ShieldTemplate, WeaponTemplate};
use crate::rules::pricing::{
    scaled_weapon_power, shield_drop_price, shield_rarity, shield_shop_price, weapon_drop_price,
    weapon_rarity, weapon_shop_price, Rarity,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GearKind {
    Weapon,
    Shield,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GearSource {
    Drop,
    Shop,
    Boss,
}

/// A concrete piece of equipment in someone's inventory. Templates stay
/// in the catalogs; an instance owns its own rolled stats and price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GearInstance {
    pub id: u64,
    pub kind: GearKind,
    pub name: String,
    /// Attack for weapons, damage reduction for shields.
    pub power: i32,
    /// Block chance for shields, zero for weapons.
    pub block_chance: i32,
    pub rarity: Rarity,
    pub price: i32,
    pub source: GearSource,
}

impl GearInstance {
    pub fn weapon_drop(id: u64, template: &WeaponTemplate, depth: u32, source: GearSource) -> Self {
        Self {
            id,
            kind: GearKind::Weapon,
            name: template.name.clone(),
            power: template.atk,
            block_chance: 0,
            rarity: weapon_rarity(template.atk),
            price: weapon_drop_price(template.atk, depth),
            source,
        }
    }

    /// Trader stock: attack scaled by `factor`, shop pricing, and a
    /// "(Replica)" suffix when the scaling is steep.
    pub fn weapon_offer(id: u64, template: &WeaponTemplate, depth: u32, factor: f64) -> Self {
        let power = scaled_weapon_power(template, factor);
        let name = if factor < 0.8 {
            format!("{} (Replica)", template.name)
        } else {
            template.name.clone()
        };
        Self {
            id,
            kind: GearKind::Weapon,
            name,
            power,
            block_chance: 0,
            rarity: weapon_rarity(power),
            price: weapon_shop_price(power, depth),
            source: GearSource::Shop,
        }
    }

    pub fn shield_drop(id: u64, template: &ShieldTemplate, depth: u32, source: GearSource) -> Self {
        Self {
            id,
            kind: GearKind::Shield,
            name: template.name.clone(),
            power: template.def,
            block_chance: template.block_chance,
            rarity: shield_rarity(template.def),
            price: shield_drop_price(template, depth),
            source,
        }
    }

    pub fn shield_offer(id: u64, template: &ShieldTemplate, depth: u32) -> Self {
        Self {
            id,
            kind: GearKind::Shield,
            name: template.name.clone(),
            power: template.def,
            block_chance: template.block_chance,
            rarity: shield_rarity(template.def),
            price: shield_shop_price(template, depth),
            source: GearSource::Shop,
        }
    }
}

/// Inventory slot: consumables stack by catalog key, gear is unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ItemEntry {
    Stack { key: String, qty: u32 },
    Gear(GearInstance),
}

/// Adds `qty` of a consumable, merging into an existing stack.
pub fn add_stack(inventory: &mut Vec<ItemEntry>, key: &str, qty: u32) {
    for entry in inventory.iter_mut() {
        if let ItemEntry::Stack { key: k, qty: q } = entry {
            if k == key {
                *q += qty;
                return;
            }
        }
    }
    inventory.push(ItemEntry::Stack {
        key: key.to_string(),
        qty,
    });
}

/// Removes one unit of a consumable stack; drops the slot at zero.
/// Returns false when no such stack exists.
pub fn remove_one(inventory: &mut Vec<ItemEntry>, key: &str) -> bool {
    for (idx, entry) in inventory.iter_mut().enumerate() {
        if let ItemEntry::Stack { key: k, qty } = entry {
            if k == key {
                *qty -= 1;
                if *qty == 0 {
                    inventory.remove(idx);
                }
                return true;
            }
        }
    }
    false
}

pub fn stack_count(inventory: &[ItemEntry], key: &str) -> u32 {
    inventory
        .iter()
        .filter_map(|entry| match entry {
            ItemEntry::Stack { key: k, qty } if k == key => Some(*qty),
            _ => None,
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stacks_merge_and_deplete() {
        let mut inv = Vec::new();
        add_stack(&mut inv, "potion", 1);
        add_stack(&mut inv, "potion", 2);
        assert_eq!(inv.len(), 1);
        assert_eq!(stack_count(&inv, "potion"), 3);

        assert!(remove_one(&mut inv, "potion"));
        assert!(remove_one(&mut inv, "potion"));
        assert!(remove_one(&mut inv, "potion"));
        assert!(inv.is_empty());
        assert!(!remove_one(&mut inv, "potion"));
    }

    #[test]
    fn steep_scaling_marks_replicas() {
        let template = WeaponTemplate {
            key: "iron_saber".into(),
            name: "Iron Saber".into(),
            atk: 5,
            min_depth: 3,
            weight: 11,
        };
        let replica = GearInstance::weapon_offer(1, &template, 4, 0.70);
        assert!(replica.name.ends_with("(Replica)"));
        let clean = GearInstance::weapon_offer(2, &template, 4, 0.85);
        assert_eq!(clean.name, "Iron Saber");
        assert!(replica.power <= clean.power);
    }
}
