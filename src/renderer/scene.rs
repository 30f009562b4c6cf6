//! Per-tick render snapshot
//!
//! The scene is everything a renderer needs for one frame, copied out of the
//! game state so renderers never touch simulation types mutably.

use serde::Serialize;

use crate::Frame;
use crate::consts::*;
use crate::sim::{GamePhase, GameState, Rect};

pub const BACKGROUND_COLOR: [u8; 3] = [18, 20, 30];
pub const PADDLE_COLOR: [u8; 3] = [240, 240, 240];
pub const PADDLE_CORNER_RADIUS: f32 = 8.0;

/// An item as drawn: its bounding box and fill color
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ItemSprite {
    pub rect: Rect,
    pub color: [u8; 3],
}

/// Primitive drawing operations in back-to-front order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    Clear { color: [u8; 3] },
    /// Ellipse inscribed in `rect`
    Ellipse { rect: Rect, color: [u8; 3] },
    RoundedRect {
        rect: Rect,
        radius: f32,
        color: [u8; 3],
    },
    /// Placement of the camera preview image
    Image { rect: Rect },
}

#[derive(Debug, Clone)]
pub struct Scene {
    /// Loop tick this scene was produced on
    pub tick: u64,
    pub paddle: Rect,
    /// Items in spawn order
    pub items: Vec<ItemSprite>,
    pub score: u32,
    pub lives: u8,
    /// Whether the tracked object was found this tick
    pub detected: bool,
    pub phase: GamePhase,
    /// Downscaled camera frame, when enabled and available
    pub preview: Option<Frame>,
}

impl Scene {
    pub fn from_state(state: &GameState, tick: u64, detected: bool, preview: Option<Frame>) -> Self {
        Self {
            tick,
            paddle: state.paddle.rect(),
            items: state
                .items
                .iter()
                .map(|item| ItemSprite {
                    rect: item.rect(),
                    color: item.color,
                })
                .collect(),
            score: state.score,
            lives: state.lives,
            detected,
            phase: state.phase,
            preview,
        }
    }

    pub fn status_line(&self) -> String {
        format!("Score: {}   Lives: {}", self.score, self.lives)
    }

    /// Where the preview goes: top-right corner, inset by the margin
    pub fn preview_rect(width: u32, height: u32) -> Rect {
        Rect::new(
            FIELD_WIDTH - width as f32 - PREVIEW_MARGIN,
            PREVIEW_MARGIN,
            width as f32,
            height as f32,
        )
    }

    pub fn draw_commands(&self) -> Vec<DrawCommand> {
        let mut commands = Vec::with_capacity(self.items.len() + 3);
        commands.push(DrawCommand::Clear {
            color: BACKGROUND_COLOR,
        });
        commands.extend(self.items.iter().map(|item| DrawCommand::Ellipse {
            rect: item.rect,
            color: item.color,
        }));
        commands.push(DrawCommand::RoundedRect {
            rect: self.paddle,
            radius: PADDLE_CORNER_RADIUS,
            color: PADDLE_COLOR,
        });
        if let Some(preview) = &self.preview {
            commands.push(DrawCommand::Image {
                rect: Self::preview_rect(preview.width(), preview.height()),
            });
        }
        commands
    }
}
