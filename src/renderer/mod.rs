//! Rendering boundary
//!
//! The game produces a [`Scene`] each tick; a [`Renderer`] turns it into
//! output. The bundled renderers are headless: one logs state changes, the
//! other streams JSON lines for an external display.

pub mod preview;
pub mod scene;

use std::io::{self, Write};

use serde::Serialize;

pub use preview::downscale;
pub use scene::{DrawCommand, ItemSprite, Scene};

use crate::sim::GamePhase;

pub trait Renderer {
    fn draw(&mut self, scene: &Scene) -> io::Result<()>;

    /// Whether this renderer displays `Scene::preview`. When false the game
    /// skips downscaling the camera frame.
    fn wants_preview(&self) -> bool {
        false
    }
}

/// Logs score, lives, phase and detection whenever one of them changes
#[derive(Debug, Default)]
pub struct LogRenderer {
    last: Option<(u32, u8, GamePhase, bool)>,
}

impl Renderer for LogRenderer {
    fn draw(&mut self, scene: &Scene) -> io::Result<()> {
        let current = (scene.score, scene.lives, scene.phase, scene.detected);
        let Some(last) = self.last.replace(current) else {
            log::info!("{}", scene.status_line());
            return Ok(());
        };

        if (last.0, last.1) != (current.0, current.1) {
            log::info!("{}", scene.status_line());
        }
        if last.2 != current.2 {
            match current.2 {
                GamePhase::GameOver => log::info!("GAME OVER (press r to restart, q to quit)"),
                GamePhase::Playing => log::info!("New round"),
            }
        }
        if last.3 != current.3 {
            if current.3 {
                log::info!("Target found");
            } else {
                log::info!("Target not detected, show the colored object to the camera");
            }
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct SceneRecord {
    tick: u64,
    status: String,
    score: u32,
    lives: u8,
    detected: bool,
    phase: GamePhase,
    commands: Vec<DrawCommand>,
}

/// Writes one JSON object per scene, newline-delimited
pub struct JsonRenderer<W: Write> {
    out: W,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for JsonRenderer<W> {
    fn draw(&mut self, scene: &Scene) -> io::Result<()> {
        let record = SceneRecord {
            tick: scene.tick,
            status: scene.status_line(),
            score: scene.score,
            lives: scene.lives,
            detected: scene.detected,
            phase: scene.phase,
            commands: scene.draw_commands(),
        };
        serde_json::to_writer(&mut self.out, &record)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}
