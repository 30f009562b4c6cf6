//! Game state and core simulation types

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::collision::Rect;
use super::spawner::Spawner;
use crate::consts::*;
use crate::tracking::clamp_paddle_center;
use crate::tuning::Tuning;

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    /// Items spawn and fall
    Playing,
    /// Out of lives; items freeze until restart
    GameOver,
}

/// Things that happened during a tick, in the order they were resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Spawned { id: u32 },
    Caught { id: u32, score: u32 },
    Missed { id: u32, lives: u8 },
    GameOver { score: u32 },
    Restarted,
}

/// The player's paddle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paddle {
    /// Horizontal center (play-field coordinates)
    pub center_x: f32,
    pub width: f32,
    pub height: f32,
    /// Top edge, fixed for the session
    pub y: f32,
}

impl Default for Paddle {
    fn default() -> Self {
        Self {
            center_x: FIELD_WIDTH / 2.0,
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
            y: FIELD_HEIGHT - PADDLE_BOTTOM_OFFSET,
        }
    }
}

impl Paddle {
    pub fn half_width(&self) -> f32 {
        self.width / 2.0
    }

    pub fn rect(&self) -> Rect {
        Rect::new(
            self.center_x - self.half_width(),
            self.y,
            self.width,
            self.height,
        )
    }

    /// Move to `x`, clamped so the paddle never leaves the field
    pub fn move_to(&mut self, x: f32) {
        self.center_x = clamp_paddle_center(x, self.half_width(), FIELD_WIDTH);
    }
}

/// A falling shape
#[derive(Debug, Clone, PartialEq)]
pub struct FallingItem {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    /// Side of the (square) bounding box
    pub size: f32,
    /// Pixels per tick
    pub speed: f32,
    /// Display color, no gameplay meaning
    pub color: [u8; 3],
}

impl FallingItem {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size, self.size)
    }

    pub fn fall(&mut self) {
        self.pos.y += self.speed;
    }
}

/// Complete session state, owned by the tick loop
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the session RNG was created from
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    pub score: u32,
    pub lives: u8,
    pub phase: GamePhase,
    pub paddle: Paddle,
    /// Live items in spawn order
    pub items: Vec<FallingItem>,
    /// Smoothing memory: the last smoothed (unclamped) paddle target
    pub smoothed_x: f32,
    pub spawner: Spawner,
    /// Simulated ticks while Playing
    pub time_ticks: u64,
    next_id: u32,
}

impl GameState {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        if let Err(e) = tuning.validate(FIELD_WIDTH) {
            log::warn!("Session started with invalid tuning: {}", e);
        }
        let mut rng = Pcg32::seed_from_u64(seed);
        let spawner = Spawner::new(&tuning, 0, &mut rng);
        let paddle = Paddle::default();
        Self {
            seed,
            rng,
            score: 0,
            lives: tuning.starting_lives,
            phase: GamePhase::Playing,
            smoothed_x: paddle.center_x,
            paddle,
            items: Vec::new(),
            spawner,
            tuning,
            time_ticks: 0,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// GameOver -> Playing. Ignored (returns false) while Playing.
    ///
    /// The smoothing memory is pinned to the paddle's current center so the
    /// paddle does not jump on the first tick of the new round.
    pub fn restart(&mut self) -> bool {
        if self.phase != GamePhase::GameOver {
            return false;
        }
        self.items.clear();
        self.score = 0;
        self.lives = self.tuning.starting_lives;
        self.phase = GamePhase::Playing;
        self.smoothed_x = self.paddle.center_x;
        self.spawner = Spawner::new(&self.tuning, 0, &mut self.rng);
        self.time_ticks = 0;
        log::info!("Game restarted");
        true
    }
}
