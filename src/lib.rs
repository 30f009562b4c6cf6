//! Color Catcher - a camera-controlled catching game
//!
//! Core modules:
//! - `vision`: Frame sources and the color locator (HSV mask, morphology, blobs)
//! - `tracking`: Camera-to-field mapping, smoothing and paddle clamping
//! - `sim`: Deterministic simulation (spawning, falling items, scoring, lives)
//! - `game`: Per-tick pipeline tying vision and simulation together
//! - `renderer`: Scene snapshot and draw commands for an external renderer
//! - `settings` / `tuning`: Runtime configuration and data-driven game balance

pub mod error;
pub mod game;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tracking;
pub mod tuning;
pub mod vision;

pub use error::{PreviewError, SettingsError, SourceError, ThresholdError};
pub use game::{Game, InputEvent};
pub use settings::Settings;
pub use tuning::Tuning;

/// A camera frame. Owned by whichever pipeline stage is processing it.
pub type Frame = image::RgbImage;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Max simulation ticks per loop iteration (prevents spiral of death)
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest loop iteration the accumulator accepts, in seconds
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Play-field dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 160.0;
    pub const PADDLE_HEIGHT: f32 = 22.0;
    /// Distance from the field bottom to the paddle's top edge
    pub const PADDLE_BOTTOM_OFFSET: f32 = 60.0;

    /// Camera capture resolution
    pub const CAPTURE_WIDTH: u32 = 640;
    pub const CAPTURE_HEIGHT: u32 = 480;

    /// Camera preview thumbnail
    pub const PREVIEW_WIDTH: u32 = 200;
    pub const PREVIEW_HEIGHT: u32 = 150;
    pub const PREVIEW_MARGIN: f32 = 10.0;

    /// Smallest region (in pixels) accepted as the tracked object
    pub const MIN_REGION_AREA: u32 = 600;
    /// Side of the square morphology neighborhood
    pub const MORPH_KERNEL_SIZE: usize = 5;
    /// Default smoothing factor for paddle movement (0..1]
    pub const SMOOTH_ALPHA: f32 = 0.35;

    pub const STARTING_LIVES: u8 = 3;
}
