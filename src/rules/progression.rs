use crate::data::Tuning;
use crate::simulation::run::RunState;

/// Adds experience and processes level-ups, which can chain when a
/// single award covers several thresholds. Each level adds max hp and
/// heals the same amount. Returns how many levels were gained.
pub fn gain_xp(run: &mut RunState, amount: i32, tuning: &Tuning) -> u32 {
    run.xp += amount.max(0);
    let mut levels = 0;
    while run.xp >= run.xp_to_next {
        run.xp -= run.xp_to_next;
        run.level += 1;
        run.max_hp += tuning.level_up_hp;
        run.hp += tuning.level_up_hp;
        run.xp_to_next = (run.xp_to_next as f64 * tuning.xp_growth).round() as i32;
        levels += 1;
    }
    levels
}

pub fn gain_gold(run: &mut RunState, amount: i32) {
    run.gold += amount.max(0);
}

/// Applies a multiplier to a reward, flooring but never below one.
pub fn scaled_reward(base: i32, multiplier: f64) -> i32 {
    ((base as f64 * multiplier).floor() as i32).max(1)
}

/// Player damage bounds at the current level with `weapon_atk` equipped.
pub fn player_damage_range(level: i32, weapon_atk: i32, tuning: &Tuning) -> (i32, i32) {
    let min = tuning.base_damage.0 + level / 2 + weapon_atk;
    let max = tuning.base_damage.1 + (level as f64 / 1.5).floor() as i32 + weapon_atk;
    (min, max.max(min))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::dice::SeededDice;
    use crate::simulation::meta::MetaState;

    fn fresh_run() -> RunState {
        let meta = MetaState::default();
        let tuning = Tuning::default();
        let mut dice = SeededDice::new(5);
        RunState::new_run("Adventurer", &meta, &tuning, &mut dice)
    }

    #[test]
    fn one_award_can_chain_levels() {
        let tuning = Tuning::default();
        let mut run = fresh_run();
        // 10 then round(13.5) = 14 to reach level 3; 30 covers both.
        let levels = gain_xp(&mut run, 30, &tuning);
        assert_eq!(levels, 2);
        assert_eq!(run.level, 3);
        assert_eq!(run.xp, 6);
        assert_eq!(run.xp_to_next, 19);
        assert_eq!(run.max_hp, 28);
        assert_eq!(run.hp, 28);
    }

    #[test]
    fn xp_and_hp_invariants_hold_after_many_awards() {
        let tuning = Tuning::default();
        let mut run = fresh_run();
        let mut dice = SeededDice::new(77);
        for _ in 0..200 {
            use crate::simulation::dice::Dice;
            gain_xp(&mut run, dice.int_range(1, 40), &tuning);
            assert!(run.xp < run.xp_to_next);
            assert!(run.hp <= run.max_hp);
        }
    }

    #[test]
    fn damage_range_grows_with_level_and_weapon() {
        let tuning = Tuning::default();
        assert_eq!(player_damage_range(1, 0, &tuning), (2, 6));
        assert_eq!(player_damage_range(4, 5, &tuning), (9, 13));
        let (low, high) = player_damage_range(9, 2, &tuning);
        assert!(low <= high);
    }

    #[test]
    fn scaled_reward_floors_at_one() {
        assert_eq!(scaled_reward(0, 1.5), 1);
        assert_eq!(scaled_reward(10, 1.35), 13);
    }
}
