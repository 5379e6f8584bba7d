use serde::{Deserialize, Serialize};

use super::{parse_builtin, read_catalog_file, CatalogError};

const BUILTIN_ENEMIES: &str = include_str!("../../assets/data/enemies.json");

/// One entry in the wandering-enemy table. Instances fighting the player
/// are explicit copies (`ActiveEnemy::from_template`), never the template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyTemplate {
    pub key: String,
    pub name: String,
    pub hp: i32,
    /// Inclusive damage range per strike.
    pub atk: (i32, i32),
    /// Inclusive gold payout range on defeat.
    pub gold: (i32, i32),
    pub xp: i32,
    pub min_depth: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnemyCatalog {
    pub schema_version: u32,
    pub enemies: Vec<EnemyTemplate>,
}

pub fn load_enemy_catalog(path: &str) -> Result<EnemyCatalog, CatalogError> {
    let catalog: EnemyCatalog = read_catalog_file(path)?;
    catalog.validate()?;
    Ok(catalog)
}

impl EnemyCatalog {
    pub fn builtin() -> Self {
        parse_builtin("enemy", BUILTIN_ENEMIES)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        for enemy in &self.enemies {
            if enemy.key.trim().is_empty() {
                return Err(CatalogError::Validation(
                    "enemy key cannot be empty".to_string(),
                ));
            }
            if enemy.hp <= 0 {
                return Err(CatalogError::Validation(format!(
                    "enemy {} has non-positive hp",
                    enemy.key
                )));
            }
            if enemy.atk.0 > enemy.atk.1 || enemy.gold.0 > enemy.gold.1 {
                return Err(CatalogError::Validation(format!(
                    "enemy {} has an inverted range",
                    enemy.key
                )));
            }
        }
        Ok(())
    }

    /// Enemies whose depth gate is met. An empty result falls back to the
    /// subset sharing the globally lowest `min_depth` rather than failing.
    pub fn eligible_at(&self, depth: u32) -> Vec<&EnemyTemplate> {
        let allowed: Vec<&EnemyTemplate> = self
            .enemies
            .iter()
            .filter(|e| e.min_depth <= depth)
            .collect();
        if !allowed.is_empty() {
            return allowed;
        }
        let Some(min_req) = self.enemies.iter().map(|e| e.min_depth).min() else {
            return Vec::new();
        };
        self.enemies
            .iter()
            .filter(|e| e.min_depth == min_req)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_present_and_valid() {
        let catalog = EnemyCatalog::builtin();
        assert!(!catalog.enemies.is_empty());
        catalog.validate().unwrap();
    }

    #[test]
    fn depth_gate_falls_back_to_lowest_tier() {
        let catalog = EnemyCatalog {
            schema_version: 1,
            enemies: vec![
                EnemyTemplate {
                    key: "deep".into(),
                    name: "Deep One".into(),
                    hp: 10,
                    atk: (1, 2),
                    gold: (1, 2),
                    xp: 1,
                    min_depth: 5,
                },
                EnemyTemplate {
                    key: "deeper".into(),
                    name: "Deeper One".into(),
                    hp: 12,
                    atk: (1, 2),
                    gold: (1, 2),
                    xp: 1,
                    min_depth: 8,
                },
            ],
        };
        let pool = catalog.eligible_at(1);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].key, "deep");
    }

    #[test]
    fn malformed_json_is_rejected() {
        let raw = r#"{"schema_version": 1, "enemies": [{"key": "x"}]}"#;
        assert!(serde_json::from_str::<EnemyCatalog>(raw).is_err());
    }
}
