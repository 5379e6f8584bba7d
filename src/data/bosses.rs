use serde::{Deserialize, Serialize};

use super::{parse_builtin, read_catalog_file, CatalogError};

const BUILTIN_BOSSES: &str = include_str!("../../assets/data/bosses.json");

/// One boss drop: a catalog key rolled independently against its chance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropEntry {
    pub key: String,
    pub chance: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BossDrops {
    #[serde(default)]
    pub items: Vec<DropEntry>,
    #[serde(default)]
    pub weapons: Vec<DropEntry>,
    #[serde(default)]
    pub shields: Vec<DropEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossTemplate {
    pub depth: u32,
    pub name: String,
    pub hp: i32,
    pub atk: (i32, i32),
    pub gold: (i32, i32),
    pub xp: i32,
    #[serde(default)]
    pub drops: BossDrops,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BossCatalog {
    pub schema_version: u32,
    pub bosses: Vec<BossTemplate>,
}

pub fn load_boss_catalog(path: &str) -> Result<BossCatalog, CatalogError> {
    let catalog: BossCatalog = read_catalog_file(path)?;
    catalog.validate()?;
    Ok(catalog)
}

impl BossCatalog {
    pub fn builtin() -> Self {
        parse_builtin("boss", BUILTIN_BOSSES)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut depths = std::collections::HashSet::new();
        for boss in &self.bosses {
            if !depths.insert(boss.depth) {
                return Err(CatalogError::Validation(format!(
                    "duplicate boss depth {}",
                    boss.depth
                )));
            }
            if boss.hp <= 0 || boss.atk.0 > boss.atk.1 {
                return Err(CatalogError::Validation(format!(
                    "boss {} is malformed",
                    boss.name
                )));
            }
        }
        Ok(())
    }

    /// The boss guarding `depth`: exact match when present, otherwise the
    /// nearest lower-depth definition, otherwise the shallowest boss.
    pub fn boss_for_depth(&self, depth: u32) -> Option<&BossTemplate> {
        if let Some(exact) = self.bosses.iter().find(|b| b.depth == depth) {
            return Some(exact);
        }
        self.bosses
            .iter()
            .filter(|b| b.depth < depth)
            .max_by_key(|b| b.depth)
            .or_else(|| self.bosses.iter().min_by_key(|b| b.depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_present_and_valid() {
        let catalog = BossCatalog::builtin();
        assert!(!catalog.bosses.is_empty());
        catalog.validate().unwrap();
    }

    #[test]
    fn missing_depth_uses_nearest_lower_boss() {
        let catalog = BossCatalog::builtin();
        let shallowest = catalog.bosses.iter().map(|b| b.depth).min().unwrap();
        let boss = catalog.boss_for_depth(shallowest + 1).unwrap();
        assert_eq!(boss.depth, shallowest);
        // Below every definition we still get one rather than nothing.
        assert!(catalog.boss_for_depth(0).is_some());
    }
}
