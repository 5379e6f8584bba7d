pub mod bosses;
pub mod consumables;
pub mod enemies;
pub mod gear;
pub mod rooms;
pub mod tuning;
pub mod upgrades;

use std::path::Path;

use serde::de::DeserializeOwned;

pub use bosses::{BossCatalog, BossDrops, BossTemplate, DropEntry};
pub use consumables::{ConsumableCatalog, ConsumableEffect, ConsumableTemplate};
pub use enemies::{EnemyCatalog, EnemyTemplate};
pub use gear::{GearCatalog, ShieldTemplate, WeaponTemplate};
pub use tuning::{EncounterWeights, Tuning};
pub use upgrades::{def_for, upgrade_defs, UpgradeDef, UpgradeKind};

/// Error raised by any catalog loader.
#[derive(Debug)]
pub enum CatalogError {
    Io { path: String, source: std::io::Error },
    Json { path: String, source: serde_json::Error },
    Validation(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path, source)
            }
            CatalogError::Json { path, source } => {
                write!(f, "failed to parse {}: {}", path, source)
            }
            CatalogError::Validation(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for CatalogError {}

fn read_catalog_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, CatalogError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CatalogError::Json {
        path: path.display().to_string(),
        source,
    })
}

fn parse_builtin<T: DeserializeOwned + Default>(label: &str, raw: &str) -> T {
    match serde_json::from_str(raw) {
        Ok(catalog) => catalog,
        Err(err) => {
            eprintln!("Builtin {} catalog is malformed: {}", label, err);
            T::default()
        }
    }
}

/// All static content tables, loaded once at startup and never mutated.
#[derive(Debug, Clone, Default, bevy_ecs::prelude::Resource)]
pub struct Catalogs {
    pub enemies: EnemyCatalog,
    pub bosses: BossCatalog,
    pub gear: GearCatalog,
    pub consumables: ConsumableCatalog,
}

impl Catalogs {
    /// Compiled-in content shipped with the crate.
    pub fn builtin() -> Self {
        Self {
            enemies: EnemyCatalog::builtin(),
            bosses: BossCatalog::builtin(),
            gear: GearCatalog::builtin(),
            consumables: ConsumableCatalog::builtin(),
        }
    }

    /// Load catalogs from `./assets/data/`, falling back to the builtin
    /// tables per file on any load or validation failure.
    pub fn load_default() -> Self {
        Self {
            enemies: load_or_builtin(
                "./assets/data/enemies.json",
                enemies::load_enemy_catalog,
                EnemyCatalog::builtin,
            ),
            bosses: load_or_builtin(
                "./assets/data/bosses.json",
                bosses::load_boss_catalog,
                BossCatalog::builtin,
            ),
            gear: load_or_builtin(
                "./assets/data/gear.json",
                gear::load_gear_catalog,
                GearCatalog::builtin,
            ),
            consumables: load_or_builtin(
                "./assets/data/consumables.json",
                consumables::load_consumable_catalog,
                ConsumableCatalog::builtin,
            ),
        }
    }
}

fn load_or_builtin<T>(
    path: &str,
    load: fn(&str) -> Result<T, CatalogError>,
    builtin: fn() -> T,
) -> T {
    match load(path) {
        Ok(catalog) => catalog,
        Err(err) => {
            eprintln!("Failed to load catalog from {}: {}", path, err);
            builtin()
        }
    }
}
