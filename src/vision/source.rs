//! Frame sources
//!
//! A source yields one fixed-size RGB frame per call or reports that none is
//! available right now. Device names select the backend:
//! - `stub://<name>`: synthetic scene with a moving blue disc (tests, headless runs)
//! - a number such as `0`: shorthand for `/dev/video<N>`
//! - anything else: a V4L2 device path (feature `camera-v4l`)

use std::f32::consts::TAU;

use image::Rgb;

use crate::Frame;
use crate::consts::{CAPTURE_HEIGHT, CAPTURE_WIDTH, TICK_RATE};
use crate::error::SourceError;

/// Something that produces camera frames on demand
pub trait FrameSource {
    /// Acquire the device. Failure here is fatal at startup.
    fn connect(&mut self) -> Result<(), SourceError>;

    /// Capture the next frame. An error means "no frame this tick", not a
    /// broken source: callers skip the tick and try again.
    fn next_frame(&mut self) -> Result<Frame, SourceError>;

    fn name(&self) -> &str;
}

/// Configuration for opening a frame source
#[derive(Clone, Debug)]
pub struct SourceConfig {
    /// Device selector (`stub://...`, an index, or a device path)
    pub device: String,
    pub width: u32,
    pub height: u32,
    pub target_fps: u32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            device: "0".to_string(),
            width: CAPTURE_WIDTH,
            height: CAPTURE_HEIGHT,
            target_fps: TICK_RATE,
        }
    }
}

impl SourceConfig {
    /// Expand a bare camera index into a device path
    pub fn device_path(&self) -> String {
        if self.device.chars().all(|c| c.is_ascii_digit()) && !self.device.is_empty() {
            format!("/dev/video{}", self.device)
        } else {
            self.device.clone()
        }
    }

    pub fn is_synthetic(&self) -> bool {
        self.device.starts_with("stub://")
    }
}

/// Build and connect the source selected by `config.device`
pub fn open_source(config: SourceConfig) -> Result<Box<dyn FrameSource>, SourceError> {
    let mut source: Box<dyn FrameSource> = if config.is_synthetic() {
        Box::new(SyntheticSource::new(config))
    } else {
        open_device(config)?
    };
    source.connect()?;
    Ok(source)
}

#[cfg(feature = "camera-v4l")]
fn open_device(config: SourceConfig) -> Result<Box<dyn FrameSource>, SourceError> {
    Ok(Box::new(super::v4l2::V4l2Source::new(config)))
}

#[cfg(not(feature = "camera-v4l"))]
fn open_device(config: SourceConfig) -> Result<Box<dyn FrameSource>, SourceError> {
    Err(SourceError::Unsupported(config.device_path()))
}

// ----------------------------------------------------------------------------
// Synthetic source (stub://)
// ----------------------------------------------------------------------------

/// Background of the synthetic scene (unsaturated, never in a color band)
const SYNTHETIC_BACKGROUND: Rgb<u8> = Rgb([30, 30, 30]);
/// Color of the synthetic target
const SYNTHETIC_TARGET: Rgb<u8> = Rgb([20, 40, 230]);
const SYNTHETIC_RADIUS: f32 = 40.0;
/// Frames for one left-right sweep of the disc
const SWEEP_FRAMES: u64 = 240;
/// Every `DROPOUT_PERIOD` frames the disc disappears for `DROPOUT_FRAMES`
const DROPOUT_PERIOD: u64 = 300;
const DROPOUT_FRAMES: u64 = 30;

/// A dark scene with a blue disc sweeping side to side, hidden periodically
/// to exercise detection dropouts
pub struct SyntheticSource {
    config: SourceConfig,
    connected: bool,
    frame_count: u64,
}

impl SyntheticSource {
    pub fn new(config: SourceConfig) -> Self {
        Self {
            config,
            connected: false,
            frame_count: 0,
        }
    }

    /// Disc center for frame `n`, or `None` during a dropout
    pub fn target_center(&self, n: u64) -> Option<(f32, f32)> {
        if n % DROPOUT_PERIOD >= DROPOUT_PERIOD - DROPOUT_FRAMES {
            return None;
        }
        let w = self.config.width as f32;
        let h = self.config.height as f32;
        let amplitude = (w / 2.0 - SYNTHETIC_RADIUS - 10.0).max(0.0);
        let phase = (n % SWEEP_FRAMES) as f32 / SWEEP_FRAMES as f32 * TAU;
        Some((w / 2.0 + amplitude * phase.sin(), h / 2.0))
    }

    fn render(&self, n: u64) -> Frame {
        let mut frame = Frame::from_pixel(self.config.width, self.config.height, SYNTHETIC_BACKGROUND);
        let Some((cx, cy)) = self.target_center(n) else {
            return frame;
        };

        let r = SYNTHETIC_RADIUS;
        let x0 = (cx - r).floor().max(0.0) as u32;
        let y0 = (cy - r).floor().max(0.0) as u32;
        let x1 = ((cx + r).ceil() as u32).min(self.config.width);
        let y1 = ((cy + r).ceil() as u32).min(self.config.height);
        for y in y0..y1 {
            for x in x0..x1 {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= r * r {
                    frame.put_pixel(x, y, SYNTHETIC_TARGET);
                }
            }
        }
        frame
    }
}

impl FrameSource for SyntheticSource {
    fn connect(&mut self) -> Result<(), SourceError> {
        self.connected = true;
        log::info!(
            "SyntheticSource: connected to {} ({}x{})",
            self.config.device,
            self.config.width,
            self.config.height
        );
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Frame, SourceError> {
        if !self.connected {
            return Err(SourceError::NotConnected(self.config.device.clone()));
        }
        let frame = self.render(self.frame_count);
        self.frame_count += 1;
        Ok(frame)
    }

    fn name(&self) -> &str {
        &self.config.device
    }
}
