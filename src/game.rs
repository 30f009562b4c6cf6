//! Per-tick pipeline
//!
//! Ties the color locator, the position smoother and the simulation together.
//! The binary owns the loop timing and the frame source; `Game` only sees one
//! optional frame per loop iteration. The simulation always advances in fixed
//! `SIM_DT` steps: an accumulator converts the loop's frame time into whole
//! ticks, so the loop rate never changes game speed.

use std::str::FromStr;

use image::imageops;

use crate::Frame;
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::renderer::{Scene, downscale};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, TickInput, tick};
use crate::tracking::PositionSmoother;
use crate::vision::ColorLocator;

/// Discrete player commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    Restart,
}

impl FromStr for InputEvent {
    type Err = String;

    /// Console commands: `q`/`quit` and `r`/`restart`, case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "q" | "quit" => Ok(Self::Quit),
            "r" | "restart" => Ok(Self::Restart),
            other => Err(format!("unknown command {:?} (use r or q)", other)),
        }
    }
}

pub struct Game {
    settings: Settings,
    locator: ColorLocator,
    smoother: PositionSmoother,
    state: GameState,
    running: bool,
    ticks: u64,
    events: Vec<GameEvent>,
    /// Seconds per loop iteration
    frame_dt: f32,
    accumulator: f32,
}

impl Game {
    pub fn new(settings: Settings, seed: u64) -> Self {
        log::info!("Starting session with seed {}", seed);
        Self {
            locator: settings.locator(),
            smoother: settings.smoother(),
            state: GameState::new(seed, settings.tuning.clone()),
            settings,
            running: true,
            ticks: 0,
            events: Vec::new(),
            frame_dt: SIM_DT,
            accumulator: 0.0,
        }
    }

    /// Set the loop rate the binary paces `update` at (defaults to the tick rate)
    pub fn set_frame_rate(&mut self, frames_per_second: u32) {
        self.frame_dt = 1.0 / frames_per_second.max(1) as f32;
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Loop iterations processed so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Events produced by the most recent input or update
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::Quit => {
                log::info!("Quit requested");
                self.running = false;
            }
            InputEvent::Restart => {
                if self.state.restart() {
                    self.events.push(GameEvent::Restarted);
                } else {
                    log::debug!("Restart ignored while playing");
                }
            }
        }
    }

    /// Run one loop iteration. `None` means the source had no frame: detection
    /// and simulation are skipped and the paddle holds its position.
    pub fn update(&mut self, frame: Option<Frame>) -> Scene {
        self.ticks += 1;
        self.events.clear();

        let Some(mut frame) = frame else {
            return Scene::from_state(&self.state, self.ticks, false, None);
        };

        if self.settings.mirror {
            imageops::flip_horizontal_in_place(&mut frame);
        }

        let detection = self.locator.locate(&frame);
        log::trace!(
            "tick {}: centroid {:?}, area {}",
            self.ticks,
            detection.centroid,
            detection.area
        );

        self.state.smoothed_x =
            self.smoother
                .update(&detection, frame.width(), self.state.smoothed_x);
        self.state.paddle.move_to(self.state.smoothed_x);
        let input = TickInput {
            paddle_x: Some(self.state.smoothed_x),
        };

        self.accumulator += self.frame_dt.min(MAX_FRAME_DT);
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let events = tick(&mut self.state, &input, SIM_DT);
            self.events.extend(events);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        let preview = self.preview(&frame);
        Scene::from_state(&self.state, self.ticks, detection.present(), preview)
    }

    fn preview(&self, frame: &Frame) -> Option<Frame> {
        if !self.settings.preview {
            return None;
        }
        match downscale(
            frame,
            self.settings.preview_width,
            self.settings.preview_height,
        ) {
            Ok(preview) => Some(preview),
            Err(e) => {
                log::warn!("Camera preview unavailable: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::{FallingItem, GamePhase, Spawner};
    use crate::vision::{SourceConfig, open_source};
    use glam::Vec2;
    use image::Rgb;

    const BLUE: Rgb<u8> = Rgb([20, 40, 230]);

    fn quiet_game(settings: Settings) -> Game {
        let mut game = Game::new(settings, 42);
        game.state_mut().spawner = Spawner::with_countdown(f32::INFINITY);
        game
    }

    /// Dark frame with a blue square covering columns `x0..x0 + 40`
    fn frame_with_square(x0: u32) -> Frame {
        let mut frame = Frame::from_pixel(CAPTURE_WIDTH, CAPTURE_HEIGHT, Rgb([30, 30, 30]));
        for y in 200..240 {
            for x in x0..x0 + 40 {
                frame.put_pixel(x, y, BLUE);
            }
        }
        frame
    }

    #[test]
    fn test_missing_frames_hold_position() {
        let mut game = quiet_game(Settings::default());
        for _ in 0..10 {
            let scene = game.update(None);
            assert!(!scene.detected);
            assert!(scene.preview.is_none());
        }
        assert_eq!(game.state().paddle.center_x, 400.0);
        assert_eq!(game.state().smoothed_x, 400.0);
        assert_eq!(game.state().time_ticks, 0);
        assert_eq!(game.ticks(), 10);
    }

    #[test]
    fn test_frames_without_target_hold_position() {
        let mut game = quiet_game(Settings::default());
        let empty = Frame::from_pixel(CAPTURE_WIDTH, CAPTURE_HEIGHT, Rgb([30, 30, 30]));
        for _ in 0..10 {
            let scene = game.update(Some(empty.clone()));
            assert!(!scene.detected);
        }
        assert_eq!(game.state().paddle.center_x, 400.0);
    }

    #[test]
    fn test_detection_moves_paddle() {
        let settings = Settings {
            mirror: false,
            ..Default::default()
        };
        let mut game = quiet_game(settings);
        let scene = game.update(Some(frame_with_square(100)));
        assert!(scene.detected);

        // Centroid x 119.5 maps to 149.375 in the field
        let expected = 0.35 * 149.375 + 0.65 * 400.0;
        assert!((game.state().smoothed_x - expected).abs() < 0.5);
        assert_eq!(game.state().paddle.center_x, game.state().smoothed_x);
    }

    #[test]
    fn test_mirror_flips_direction() {
        let mut game = quiet_game(Settings::default());
        // Object on the camera's left is the player's right
        game.update(Some(frame_with_square(100)));
        assert!(game.state().paddle.center_x > 400.0);
    }

    #[test]
    fn test_preview_matches_settings() {
        let mut game = quiet_game(Settings::default());
        let scene = game.update(Some(frame_with_square(100)));
        let preview = scene.preview.unwrap();
        assert_eq!(preview.dimensions(), (PREVIEW_WIDTH, PREVIEW_HEIGHT));

        let mut game = quiet_game(Settings {
            preview: false,
            ..Default::default()
        });
        assert!(game.update(Some(frame_with_square(100))).preview.is_none());
    }

    #[test]
    fn test_game_over_freezes_items_paddle_still_moves() {
        let settings = Settings {
            mirror: false,
            ..Default::default()
        };
        let mut game = quiet_game(settings);
        let state = game.state_mut();
        state.phase = GamePhase::GameOver;
        state.lives = 0;
        let id = state.next_entity_id();
        state.items.push(FallingItem {
            id,
            pos: Vec2::new(100.0, 100.0),
            size: 20.0,
            speed: 5.0,
            color: [255, 80, 80],
        });

        for _ in 0..30 {
            let scene = game.update(Some(frame_with_square(500)));
            assert_eq!(scene.phase, GamePhase::GameOver);
        }
        assert_eq!(game.state().items[0].pos.y, 100.0);
        assert!(game.state().paddle.center_x > 600.0);
    }

    /// Run `frames` loop iterations at `fps` with one slow item in play
    fn run_at_rate(fps: u32, frames: usize) -> Game {
        let mut game = quiet_game(Settings::default());
        game.set_frame_rate(fps);
        let id = game.state_mut().next_entity_id();
        game.state_mut().items.push(FallingItem {
            id,
            pos: Vec2::new(0.0, 0.0),
            size: 20.0,
            speed: 1.0,
            color: [255, 80, 80],
        });
        let empty = Frame::from_pixel(CAPTURE_WIDTH, CAPTURE_HEIGHT, Rgb([30, 30, 30]));
        for _ in 0..frames {
            game.update(Some(empty.clone()));
        }
        game
    }

    #[test]
    fn test_loop_rate_does_not_change_game_speed() {
        // One second of loop time at either rate
        let full = run_at_rate(TICK_RATE, 60);
        let half = run_at_rate(30, 30);

        assert_eq!(full.state().time_ticks, 60);
        assert!((59..=60).contains(&half.state().time_ticks));
        assert_eq!(half.ticks(), 30);

        let fallen = half.state().items[0].pos.y;
        assert_eq!(fallen, half.state().time_ticks as f32);
    }

    #[test]
    fn test_fast_loop_moves_paddle_between_ticks() {
        let settings = Settings {
            mirror: false,
            ..Default::default()
        };
        let mut game = quiet_game(settings);
        game.set_frame_rate(240);
        game.update(Some(frame_with_square(100)));

        // A quarter tick of loop time: no simulation step yet
        assert_eq!(game.state().time_ticks, 0);
        assert!(game.state().paddle.center_x < 400.0);
    }

    #[test]
    fn test_restart_ignored_while_playing() {
        let mut game = quiet_game(Settings::default());
        game.state_mut().score = 5;
        game.handle_event(InputEvent::Restart);
        assert_eq!(game.state().score, 5);
        assert!(game.events().is_empty());
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut game = quiet_game(Settings::default());
        game.state_mut().phase = GamePhase::GameOver;
        game.state_mut().lives = 0;
        game.handle_event(InputEvent::Restart);
        assert_eq!(game.events(), &[GameEvent::Restarted]);
        assert_eq!(game.state().phase, GamePhase::Playing);
        assert_eq!(game.state().lives, STARTING_LIVES);
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("q".parse::<InputEvent>(), Ok(InputEvent::Quit));
        assert_eq!(" R \n".parse::<InputEvent>(), Ok(InputEvent::Restart));
        assert_eq!("restart".parse::<InputEvent>(), Ok(InputEvent::Restart));
        assert!("jump".parse::<InputEvent>().is_err());
    }

    #[test]
    fn test_quit_stops_running() {
        let mut game = quiet_game(Settings::default());
        assert!(game.is_running());
        game.handle_event(InputEvent::Quit);
        assert!(!game.is_running());
    }

    #[test]
    fn test_synthetic_source_session() {
        let config = SourceConfig {
            device: "stub://session".to_string(),
            ..Default::default()
        };
        let mut source = open_source(config).unwrap();
        let mut game = Game::new(Settings::default(), 7);

        let mut detected = 0;
        let mut hidden = 0;
        for _ in 0..300 {
            let frame = source.next_frame().ok();
            if game.update(frame).detected {
                detected += 1;
            } else {
                hidden += 1;
            }
        }
        // The synthetic disc drops out for 30 of every 300 frames
        assert_eq!(hidden, 30);
        assert_eq!(detected, 270);
        assert!(game.state().time_ticks > 0);
    }
}
