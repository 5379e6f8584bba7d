use serde::{Deserialize, Serialize};

use super::{parse_builtin, read_catalog_file, CatalogError};

const BUILTIN_CONSUMABLES: &str = include_str!("../../assets/data/consumables.json");

/// What a consumable does when used. Heals apply to the player, damage
/// applies to the current enemy (and fizzles with a message otherwise).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsumableEffect {
    Heal { amount: i32 },
    Damage { amount: i32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumableTemplate {
    pub key: String,
    pub name: String,
    pub effect: ConsumableEffect,
    pub price: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsumableCatalog {
    pub schema_version: u32,
    pub consumables: Vec<ConsumableTemplate>,
}

pub fn load_consumable_catalog(path: &str) -> Result<ConsumableCatalog, CatalogError> {
    let catalog: ConsumableCatalog = read_catalog_file(path)?;
    catalog.validate()?;
    Ok(catalog)
}

impl ConsumableCatalog {
    pub fn builtin() -> Self {
        parse_builtin("consumable", BUILTIN_CONSUMABLES)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        for item in &self.consumables {
            if item.key.trim().is_empty() || item.price < 0 {
                return Err(CatalogError::Validation(format!(
                    "consumable {} is malformed",
                    item.key
                )));
            }
            let magnitude = match item.effect {
                ConsumableEffect::Heal { amount } => amount,
                ConsumableEffect::Damage { amount } => amount,
            };
            if magnitude <= 0 {
                return Err(CatalogError::Validation(format!(
                    "consumable {} has a non-positive effect",
                    item.key
                )));
            }
        }
        Ok(())
    }

    pub fn by_key(&self, key: &str) -> Option<&ConsumableTemplate> {
        self.consumables.iter().find(|c| c.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_present_and_valid() {
        let catalog = ConsumableCatalog::builtin();
        assert!(!catalog.consumables.is_empty());
        catalog.validate().unwrap();
    }

    #[test]
    fn effect_tag_round_trips() {
        let raw = r#"{ "Heal": { "amount": 5 } }"#;
        let effect: ConsumableEffect = serde_json::from_str(raw).unwrap();
        assert_eq!(effect, ConsumableEffect::Heal { amount: 5 });
    }
}
