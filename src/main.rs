//! Color Catcher entry point
//!
//! Opens the frame source, then runs the fixed-rate loop: drain input, grab a
//! frame, update the game, render, sleep for the rest of the tick.

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, anyhow};
use clap::Parser;

use color_catcher::consts::TICK_RATE;
use color_catcher::renderer::{JsonRenderer, LogRenderer, Renderer};
use color_catcher::vision::{ColorThreshold, SourceConfig, open_source};
use color_catcher::{Game, InputEvent, Settings, SettingsError};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Camera index, V4L2 device path, or `stub://<name>` for a synthetic scene.
    ///
    /// Real cameras need a build with the `camera-v4l` feature; without it only
    /// `stub://` sources open.
    #[arg(long, env = "COLOR_CATCHER_CAMERA", default_value = "0")]
    camera: String,
    /// JSON settings file
    #[arg(long)]
    config: Option<PathBuf>,
    /// HSV band override: h_min,s_min,v_min,h_max,s_max,v_max
    #[arg(long, value_delimiter = ',')]
    threshold: Option<Vec<u8>>,
    /// RNG seed (defaults to the current time)
    #[arg(long)]
    seed: Option<u64>,
    /// Loop rate in frames per second. The simulation always runs at 60 ticks
    /// per second regardless.
    #[arg(long, default_value_t = TICK_RATE)]
    fps: u32,
    /// Stop after this many loop iterations
    #[arg(long)]
    max_ticks: Option<u64>,
    /// Write one JSON scene per tick to stdout instead of logging state changes
    #[arg(long)]
    json: bool,
    /// Skip the camera preview thumbnail
    #[arg(long)]
    no_preview: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    if args.fps == 0 {
        return Err(anyhow!("fps must be >= 1"));
    }

    let mut settings = Settings::load_or_default(args.config.as_deref())
        .context("loading settings")?;
    if let Some(values) = &args.threshold {
        let bounds: [u8; 6] = values
            .as_slice()
            .try_into()
            .map_err(|_| anyhow!("--threshold takes 6 values, got {}", values.len()))?;
        settings.threshold = ColorThreshold::from_bounds(bounds)
            .map_err(SettingsError::from)
            .context("parsing --threshold")?;
    }
    if args.no_preview {
        settings.preview = false;
    }

    let source_config = SourceConfig {
        device: args.camera.clone(),
        width: settings.capture_width,
        height: settings.capture_height,
        target_fps: args.fps,
    };
    let mut source = open_source(source_config)
        .with_context(|| format!("opening camera {}", args.camera))?;
    log::info!("Capturing from {}", source.name());

    let (tx, rx) = mpsc::channel();
    let ctrlc_tx = tx.clone();
    ctrlc::set_handler(move || {
        let _ = ctrlc_tx.send(InputEvent::Quit);
    })
    .context("installing Ctrl-C handler")?;
    spawn_console_reader(tx);

    let mut renderer: Box<dyn Renderer> = if args.json {
        Box::new(JsonRenderer::new(io::stdout()))
    } else {
        Box::new(LogRenderer::default())
    };
    if settings.preview && !renderer.wants_preview() {
        log::debug!("Renderer does not display the camera preview, skipping it");
        settings.preview = false;
    }

    let seed = args.seed.unwrap_or_else(time_seed);
    let mut game = Game::new(settings, seed);
    game.set_frame_rate(args.fps);

    log::info!("Type r + Enter to restart after game over, q + Enter to quit");
    let tick_budget = Duration::from_secs_f64(1.0 / f64::from(args.fps));
    while game.is_running() {
        let started = Instant::now();

        while let Ok(event) = rx.try_recv() {
            game.handle_event(event);
        }
        if !game.is_running() {
            break;
        }

        let frame = match source.next_frame() {
            Ok(frame) => Some(frame),
            Err(e) => {
                log::debug!("No frame this tick: {}", e);
                None
            }
        };
        let scene = game.update(frame);
        if let Err(e) = renderer.draw(&scene) {
            log::warn!("Render failed: {}", e);
        }

        if args.max_ticks.is_some_and(|max| game.ticks() >= max) {
            log::info!("Reached {} ticks", game.ticks());
            break;
        }

        if let Some(rest) = tick_budget.checked_sub(started.elapsed()) {
            thread::sleep(rest);
        }
    }

    let state = game.state();
    log::info!(
        "Session ended after {} ticks: score {}, lives {}",
        game.ticks(),
        state.score,
        state.lives
    );
    Ok(())
}

/// Forward console commands to the loop. Stops at end of input or once the
/// loop has gone away.
fn spawn_console_reader(tx: Sender<InputEvent>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<InputEvent>() {
                Ok(event) => {
                    if tx.send(event).is_err() {
                        break;
                    }
                }
                Err(e) => log::warn!("{}", e),
            }
        }
    });
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
