use serde::{Deserialize, Serialize};

use super::{parse_builtin, read_catalog_file, CatalogError};

const BUILTIN_GEAR: &str = include_str!("../../assets/data/gear.json");

/// Weapon table entry. Higher power means rarer: selection weight drops
/// as attack climbs, and the depth gate holds strong blades back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponTemplate {
    pub key: String,
    pub name: String,
    pub atk: i32,
    pub min_depth: u32,
    pub weight: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShieldTemplate {
    pub key: String,
    pub name: String,
    pub def: i32,
    /// Percent chance the shield intercepts an incoming hit.
    pub block_chance: i32,
    pub min_depth: u32,
    pub weight: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GearCatalog {
    pub schema_version: u32,
    pub weapons: Vec<WeaponTemplate>,
    pub shields: Vec<ShieldTemplate>,
}

pub fn load_gear_catalog(path: &str) -> Result<GearCatalog, CatalogError> {
    let catalog: GearCatalog = read_catalog_file(path)?;
    catalog.validate()?;
    Ok(catalog)
}

impl GearCatalog {
    pub fn builtin() -> Self {
        parse_builtin("gear", BUILTIN_GEAR)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        for weapon in &self.weapons {
            if weapon.key.trim().is_empty() || weapon.atk <= 0 {
                return Err(CatalogError::Validation(format!(
                    "weapon {} is malformed",
                    weapon.key
                )));
            }
        }
        for shield in &self.shields {
            if shield.key.trim().is_empty() || shield.def <= 0 {
                return Err(CatalogError::Validation(format!(
                    "shield {} is malformed",
                    shield.key
                )));
            }
            if !(0..=100).contains(&shield.block_chance) {
                return Err(CatalogError::Validation(format!(
                    "shield {} block chance out of range",
                    shield.key
                )));
            }
        }
        Ok(())
    }

    pub fn weapons_at(&self, depth: u32) -> Vec<&WeaponTemplate> {
        let pool: Vec<&WeaponTemplate> = self
            .weapons
            .iter()
            .filter(|w| w.min_depth <= depth)
            .collect();
        if !pool.is_empty() {
            return pool;
        }
        let Some(min_req) = self.weapons.iter().map(|w| w.min_depth).min() else {
            return Vec::new();
        };
        self.weapons
            .iter()
            .filter(|w| w.min_depth == min_req)
            .collect()
    }

    pub fn shields_at(&self, depth: u32) -> Vec<&ShieldTemplate> {
        let pool: Vec<&ShieldTemplate> = self
            .shields
            .iter()
            .filter(|s| s.min_depth <= depth)
            .collect();
        if !pool.is_empty() {
            return pool;
        }
        let Some(min_req) = self.shields.iter().map(|s| s.min_depth).min() else {
            return Vec::new();
        };
        self.shields
            .iter()
            .filter(|s| s.min_depth == min_req)
            .collect()
    }

    pub fn weapon_by_key(&self, key: &str) -> Option<&WeaponTemplate> {
        self.weapons.iter().find(|w| w.key == key)
    }

    pub fn shield_by_key(&self, key: &str) -> Option<&ShieldTemplate> {
        self.shields.iter().find(|s| s.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_present_and_valid() {
        let catalog = GearCatalog::builtin();
        assert!(!catalog.weapons.is_empty());
        assert!(!catalog.shields.is_empty());
        catalog.validate().unwrap();
    }

    #[test]
    fn depth_one_offers_only_starter_gear() {
        let catalog = GearCatalog::builtin();
        for weapon in catalog.weapons_at(1) {
            assert_eq!(weapon.min_depth, 1);
        }
    }
}
