use serde::{Deserialize, Serialize};

use crate::data::{BossTemplate, EnemyTemplate};

/// The one enemy currently fighting the player. Always an explicit copy
/// of a catalog template so damage never touches shared data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveEnemy {
    pub name: String,
    pub hp: i32,
    pub max_hp: i32,
    pub atk: (i32, i32),
    pub gold: (i32, i32),
    pub xp: i32,
    pub is_boss: bool,
}

impl ActiveEnemy {
    pub fn from_template(template: &EnemyTemplate) -> Self {
        Self {
            name: template.name.clone(),
            hp: template.hp,
            max_hp: template.hp,
            atk: template.atk,
            gold: template.gold,
            xp: template.xp,
            is_boss: false,
        }
    }

    pub fn from_boss(template: &BossTemplate) -> Self {
        Self {
            name: template.name.clone(),
            hp: template.hp,
            max_hp: template.hp,
            atk: template.atk,
            gold: template.gold,
            xp: template.xp,
            is_boss: true,
        }
    }

    pub fn is_defeated(&self) -> bool {
        self.hp <= 0
    }

    /// Applies damage, clamping hp at zero. Returns the amount actually
    /// removed.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let dealt = amount.max(0).min(self.hp);
        self.hp -= dealt;
        dealt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_clamps_at_zero() {
        let template = EnemyTemplate {
            key: "rat".into(),
            name: "Mutated Rat".into(),
            hp: 6,
            atk: (1, 5),
            gold: (1, 3),
            xp: 2,
            min_depth: 1,
        };
        let mut enemy = ActiveEnemy::from_template(&template);
        assert_eq!(enemy.take_damage(4), 4);
        assert_eq!(enemy.take_damage(10), 2);
        assert_eq!(enemy.hp, 0);
        assert!(enemy.is_defeated());
    }
}
