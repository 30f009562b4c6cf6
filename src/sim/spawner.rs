//! Item spawner
//!
//! An explicit countdown decremented by the fixed timestep, never a wall-clock
//! comparison, so a seeded run spawns the same items on the same ticks.

use glam::Vec2;
use rand::Rng;

use super::state::FallingItem;
use crate::tuning::{DEFAULT_PALETTE, Tuning};

#[derive(Debug, Clone, PartialEq)]
pub struct Spawner {
    /// Seconds until the next spawn
    countdown: f32,
}

impl Spawner {
    /// Start a countdown with a freshly jittered interval
    pub fn new(tuning: &Tuning, score: u32, rng: &mut impl Rng) -> Self {
        Self {
            countdown: next_interval(tuning, score, rng),
        }
    }

    /// A spawner with a fixed countdown (use `f32::INFINITY` to never spawn)
    pub fn with_countdown(countdown: f32) -> Self {
        Self { countdown }
    }

    pub fn countdown(&self) -> f32 {
        self.countdown
    }

    /// Advance by `dt`. Returns true when an item is due, after rearming the
    /// countdown for the given score.
    pub fn advance(&mut self, dt: f32, score: u32, tuning: &Tuning, rng: &mut impl Rng) -> bool {
        self.countdown -= dt;
        if self.countdown > 0.0 {
            return false;
        }
        self.countdown = next_interval(tuning, score, rng);
        true
    }
}

/// Base interval with symmetric jitter, shortened by score, floored
pub fn next_interval(tuning: &Tuning, score: u32, rng: &mut impl Rng) -> f32 {
    let half = tuning.spawn_variance / 2.0;
    let jitter = if half > 0.0 && half.is_finite() {
        rng.random_range(-half..=half)
    } else {
        0.0
    };
    let interval =
        tuning.spawn_interval + jitter - score as f32 * tuning.spawn_speedup_per_point;
    interval.max(tuning.min_spawn_interval)
}

/// Create an item fully inside the field horizontally, just above its top edge
///
/// Never panics on a `Tuning` that skipped validation: an inverted size range
/// collapses to its minimum, non-finite jitter is dropped and an empty palette
/// falls back to the default colors.
pub fn spawn_item(
    id: u32,
    tuning: &Tuning,
    score: u32,
    field_width: f32,
    rng: &mut impl Rng,
) -> FallingItem {
    let size_max = tuning.item_size_max.max(tuning.item_size_min);
    let size = rng.random_range(tuning.item_size_min..=size_max) as f32;
    let max_x = (field_width - size).max(0.0) as u32;
    let x = rng.random_range(0..=max_x) as f32;

    let jitter = if tuning.fall_speed_jitter > 0.0 && tuning.fall_speed_jitter.is_finite() {
        rng.random_range(0.0..tuning.fall_speed_jitter)
    } else {
        0.0
    };
    let speed = tuning.fall_speed_base + jitter + score as f32 * tuning.fall_speed_per_point;
    let palette: &[[u8; 3]] = if tuning.palette.is_empty() {
        &DEFAULT_PALETTE
    } else {
        &tuning.palette
    };
    let color = palette[rng.random_range(0..palette.len())];

    FallingItem {
        id,
        pos: Vec2::new(x, -size),
        size,
        speed,
        color,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_interval_within_jitter_band() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..500 {
            let interval = next_interval(&tuning, 0, &mut rng);
            assert!((0.8..=1.4).contains(&interval), "{interval}");
        }
    }

    #[test]
    fn test_interval_shrinks_with_score_and_hits_floor() {
        let tuning = Tuning {
            spawn_variance: 0.0,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(1);
        assert!((next_interval(&tuning, 0, &mut rng) - 1.1).abs() < 1e-5);
        assert!((next_interval(&tuning, 100, &mut rng) - 0.6).abs() < 1e-5);
        assert_eq!(next_interval(&tuning, 10_000, &mut rng), 0.25);
    }

    #[test]
    fn test_advance_fires_once_per_interval() {
        let tuning = Tuning {
            spawn_interval: 1.0,
            spawn_variance: 0.0,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(3);
        let mut spawner = Spawner::new(&tuning, 0, &mut rng);

        let dt = 0.25;
        let fired: Vec<usize> = (1..=10)
            .filter(|_| spawner.advance(dt, 0, &tuning, &mut rng))
            .collect();
        assert_eq!(fired, vec![4, 8]);
    }

    #[test]
    fn test_infinite_countdown_never_fires() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut spawner = Spawner::with_countdown(f32::INFINITY);
        assert!(!(0..10_000).any(|_| spawner.advance(1.0, 0, &tuning, &mut rng)));
    }

    #[test]
    fn test_spawned_items_fit_the_field() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(42);
        for id in 0..1000 {
            let item = spawn_item(id, &tuning, 0, 800.0, &mut rng);
            assert!((18.0..=42.0).contains(&item.size));
            assert!(item.pos.x >= 0.0);
            assert!(item.pos.x + item.size <= 800.0);
            assert_eq!(item.pos.y, -item.size);
            assert!((3.5..=6.0).contains(&item.speed));
            assert!(tuning.palette.contains(&item.color));
        }
    }

    #[test]
    fn test_speed_ramps_with_score() {
        let tuning = Tuning {
            fall_speed_jitter: 0.0,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(42);
        let item = spawn_item(1, &tuning, 50, 800.0, &mut rng);
        assert!((item.speed - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_unvalidated_tuning_does_not_panic() {
        let tuning = Tuning {
            spawn_variance: f32::INFINITY,
            fall_speed_jitter: f32::INFINITY,
            item_size_min: 40,
            item_size_max: 20,
            palette: Vec::new(),
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(5);
        let spawner = Spawner::new(&tuning, 0, &mut rng);
        assert!((spawner.countdown() - 1.1).abs() < 1e-5);

        let item = spawn_item(1, &tuning, 0, 800.0, &mut rng);
        assert_eq!(item.size, 40.0);
        assert_eq!(item.speed, 3.5);
        assert!(DEFAULT_PALETTE.contains(&item.color));
    }

    #[test]
    fn test_same_seed_same_items() {
        let tuning = Tuning::default();
        let mut a = Pcg32::seed_from_u64(9);
        let mut b = Pcg32::seed_from_u64(9);
        for id in 0..20 {
            assert_eq!(
                spawn_item(id, &tuning, id, 800.0, &mut a),
                spawn_item(id, &tuning, id, 800.0, &mut b)
            );
        }
    }
}
