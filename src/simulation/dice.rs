use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Injectable randomness source. Everything that rolls goes through this
/// trait so tests can substitute a deterministic or scripted implementation.
pub trait Dice: Send + Sync {
    /// Uniform integer in `[min, max]` inclusive. Returns `min` when the
    /// bounds are inverted or equal.
    fn int_range(&mut self, min: i32, max: i32) -> i32;

    /// True with probability `percent / 100`, clamped to `[0, 100]`.
    fn chance(&mut self, percent: i32) -> bool {
        if percent <= 0 {
            return false;
        }
        self.int_range(1, 100) <= percent.min(100)
    }
}

/// Uniform choice from a non-empty slice.
pub fn pick<'a, T>(dice: &mut dyn Dice, items: &'a [T]) -> &'a T {
    let idx = dice.int_range(0, items.len() as i32 - 1) as usize;
    &items[idx.min(items.len() - 1)]
}

/// Weighted choice: each item is selected with probability proportional to
/// its weight (negative weights count as zero). A zero total weight falls
/// back to the first item; this is a documented contract, not an accident,
/// and callers rely on it for degenerate pools.
pub fn weighted_pick<'a, T, F>(dice: &mut dyn Dice, items: &'a [T], weight: F) -> &'a T
where
    F: Fn(&T) -> i32,
{
    let total: i64 = items.iter().map(|it| weight(it).max(0) as i64).sum();
    if total <= 0 {
        return &items[0];
    }
    let mut roll = dice.int_range(1, total as i32) as i64;
    for item in items {
        roll -= weight(item).max(0) as i64;
        if roll <= 0 {
            return item;
        }
    }
    &items[items.len() - 1]
}

/// Production dice backed by a small PRNG.
pub struct GameDice {
    rng: SmallRng,
}

impl GameDice {
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Dice for GameDice {
    fn int_range(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..=max)
    }
}

/// Cheap deterministic dice for tests: a raw LCG, no external state.
pub struct SeededDice {
    state: u64,
}

impl SeededDice {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1);
        self.state
    }
}

impl Dice for SeededDice {
    fn int_range(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        let span = (max - min + 1) as u64;
        min + (self.next_u64() % span) as i32
    }
}

/// Scripted dice for branch-precise tests: pops queued values, clamping
/// each into the requested range; falls back to `min` when exhausted.
pub struct ScriptedDice {
    queue: std::collections::VecDeque<i32>,
}

impl ScriptedDice {
    pub fn new(values: &[i32]) -> Self {
        Self {
            queue: values.iter().copied().collect(),
        }
    }
}

impl Dice for ScriptedDice {
    fn int_range(&mut self, min: i32, max: i32) -> i32 {
        match self.queue.pop_front() {
            Some(v) => v.clamp(min, max.max(min)),
            None => min,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_range_stays_in_bounds() {
        let mut dice = SeededDice::new(42);
        for _ in 0..10_000 {
            let v = dice.int_range(3, 10);
            assert!((3..=10).contains(&v));
        }
    }

    #[test]
    fn weighted_pick_zero_total_falls_back_to_first() {
        let mut dice = SeededDice::new(7);
        let items = [("a", 0), ("b", 0), ("c", 0)];
        let chosen = weighted_pick(&mut dice, &items, |it| it.1);
        assert_eq!(chosen.0, "a");
    }

    #[test]
    fn weighted_pick_respects_cumulative_order() {
        // A scripted draw of 1 must land on the first positively
        // weighted item in iteration order.
        let mut dice = ScriptedDice::new(&[1]);
        let items = [("a", 0), ("b", 5), ("c", 5)];
        let chosen = weighted_pick(&mut dice, &items, |it| it.1);
        assert_eq!(chosen.0, "b");
    }

    #[test]
    fn chance_zero_never_fires_and_hundred_always_does() {
        let mut dice = SeededDice::new(9);
        for _ in 0..100 {
            assert!(!dice.chance(0));
            assert!(dice.chance(100));
        }
    }

    #[test]
    fn scripted_dice_clamps_and_exhausts_to_min() {
        let mut dice = ScriptedDice::new(&[500]);
        assert_eq!(dice.int_range(1, 100), 100);
        assert_eq!(dice.int_range(1, 100), 1);
    }
}
