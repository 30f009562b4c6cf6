//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No camera, rendering or platform dependencies

pub mod collision;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::Rect;
pub use spawner::{Spawner, next_interval, spawn_item};
pub use state::{FallingItem, GameEvent, GamePhase, GameState, Paddle};
pub use tick::{TickInput, tick};
