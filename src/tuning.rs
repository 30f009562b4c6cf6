//! Data-driven game balance
//!
//! Times are in seconds, speeds in play-field pixels per tick.

use serde::{Deserialize, Serialize};

use crate::consts::STARTING_LIVES;

/// Default item colors (cosmetic only)
pub const DEFAULT_PALETTE: [[u8; 3]; 4] = [
    [255, 80, 80],
    [80, 200, 100],
    [120, 180, 255],
    [255, 215, 80],
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Spawn cadence ===
    /// Mean time between spawns at score 0
    pub spawn_interval: f32,
    /// Full width of the symmetric jitter around the interval
    pub spawn_variance: f32,
    /// Interval reduction per point scored
    pub spawn_speedup_per_point: f32,
    /// Floor on the interval so spawning never runs away
    pub min_spawn_interval: f32,

    // === Items ===
    /// Inclusive item size range (pixels)
    pub item_size_min: u32,
    pub item_size_max: u32,
    pub fall_speed_base: f32,
    /// Uniform extra speed in `[0, fall_speed_jitter)`
    pub fall_speed_jitter: f32,
    /// Extra speed per point scored
    pub fall_speed_per_point: f32,
    pub palette: Vec<[u8; 3]>,

    // === Session ===
    pub starting_lives: u8,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            spawn_interval: 1.1,
            spawn_variance: 0.6,
            spawn_speedup_per_point: 0.005,
            min_spawn_interval: 0.25,

            item_size_min: 18,
            item_size_max: 42,
            fall_speed_base: 3.5,
            fall_speed_jitter: 2.5,
            fall_speed_per_point: 0.03,
            palette: DEFAULT_PALETTE.to_vec(),

            starting_lives: STARTING_LIVES,
        }
    }
}

impl Tuning {
    /// Check internal consistency against the field width
    pub fn validate(&self, field_width: f32) -> Result<(), String> {
        let rates = [
            ("spawn_interval", self.spawn_interval),
            ("spawn_variance", self.spawn_variance),
            ("spawn_speedup_per_point", self.spawn_speedup_per_point),
            ("min_spawn_interval", self.min_spawn_interval),
            ("fall_speed_base", self.fall_speed_base),
            ("fall_speed_jitter", self.fall_speed_jitter),
            ("fall_speed_per_point", self.fall_speed_per_point),
        ];
        if let Some((name, value)) = rates.iter().find(|(_, value)| !value.is_finite()) {
            return Err(format!("{name} must be finite, got {value}"));
        }
        if let Some((name, value)) = rates.iter().find(|(_, value)| *value < 0.0) {
            return Err(format!("{name} must not be negative, got {value}"));
        }
        if self.min_spawn_interval <= 0.0 {
            return Err(format!(
                "min_spawn_interval must be positive, got {}",
                self.min_spawn_interval
            ));
        }
        // Items that never fall are never missed and the round never ends
        if self.fall_speed_base <= 0.0 {
            return Err(format!(
                "fall_speed_base must be positive, got {}",
                self.fall_speed_base
            ));
        }
        if self.item_size_min > self.item_size_max {
            return Err(format!(
                "item size range {}..={} is empty",
                self.item_size_min, self.item_size_max
            ));
        }
        if self.item_size_max as f32 > field_width {
            return Err(format!(
                "item_size_max {} exceeds the field width {}",
                self.item_size_max, field_width
            ));
        }
        if self.palette.is_empty() {
            return Err("palette must contain at least one color".to_string());
        }
        if self.starting_lives == 0 {
            return Err("starting_lives must be at least 1".to_string());
        }
        Ok(())
    }
}
