//! Fixed timestep simulation tick
//!
//! One call advances the session by one frame: paddle, spawner, items,
//! then scoring and the terminal transition.

use super::spawner::spawn_item;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Input for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Smoothed paddle target in play-field coordinates. `None` holds the paddle.
    pub paddle_x: Option<f32>,
}

/// Advance the game state by one fixed timestep
///
/// The paddle follows its target in every phase. Spawning, falling and
/// scoring only run while Playing, so a finished round stays frozen on screen.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if let Some(x) = input.paddle_x {
        state.paddle.move_to(x);
    }

    if state.phase != GamePhase::Playing {
        return events;
    }
    state.time_ticks += 1;

    if state
        .spawner
        .advance(dt, state.score, &state.tuning, &mut state.rng)
    {
        let id = state.next_entity_id();
        let item = spawn_item(id, &state.tuning, state.score, FIELD_WIDTH, &mut state.rng);
        log::debug!(
            "Spawned item {} at x={} (size {}, speed {:.2})",
            id,
            item.pos.x,
            item.size,
            item.speed
        );
        state.items.push(item);
        events.push(GameEvent::Spawned { id });
    }

    update_items(state, &mut events);

    if state.lives == 0 {
        state.phase = GamePhase::GameOver;
        log::info!("Game over with score {}", state.score);
        events.push(GameEvent::GameOver { score: state.score });
    }

    events
}

/// Move every item and resolve it in one pass: a catch wins over a miss,
/// survivors keep their spawn order.
fn update_items(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let paddle = state.paddle.rect();
    let mut caught = Vec::new();
    let mut missed = Vec::new();

    state.items.retain_mut(|item| {
        item.fall();
        let rect = item.rect();
        if rect.intersects(&paddle) {
            caught.push(item.id);
            false
        } else if rect.top() >= FIELD_HEIGHT {
            missed.push(item.id);
            false
        } else {
            true
        }
    });

    for id in caught {
        state.score = state.score.saturating_add(1);
        events.push(GameEvent::Caught {
            id,
            score: state.score,
        });
    }
    for id in missed {
        state.lives = state.lives.saturating_sub(1);
        log::debug!("Missed item {} ({} lives left)", id, state.lives);
        events.push(GameEvent::Missed {
            id,
            lives: state.lives,
        });
    }
}
