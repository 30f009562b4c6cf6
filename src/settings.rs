//! Runtime settings
//!
//! Loaded once at startup from an optional JSON file. Every field has a
//! default, so a file only needs the values it overrides:
//!
//! ```json
//! { "threshold": { "lower": [40, 70, 70], "upper": [80, 255, 255] } }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;
use crate::tracking::PositionSmoother;
use crate::tuning::Tuning;
use crate::vision::{ColorLocator, ColorThreshold};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Vision ===
    /// HSV band of the tracked object (from a calibration run)
    pub threshold: ColorThreshold,
    /// Smallest region area accepted as the target
    pub min_region_area: u32,
    /// Morphology neighborhood side (odd)
    pub kernel_size: usize,
    /// Flip frames horizontally so the paddle follows the player's hand
    pub mirror: bool,
    pub capture_width: u32,
    pub capture_height: u32,

    // === Control ===
    /// Weight of the newest position sample, in (0, 1]
    pub smoothing_alpha: f32,

    // === Display ===
    /// Produce a downscaled camera preview each tick
    pub preview: bool,
    pub preview_width: u32,
    pub preview_height: u32,

    // === Balance ===
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            threshold: ColorThreshold::default(),
            min_region_area: MIN_REGION_AREA,
            kernel_size: MORPH_KERNEL_SIZE,
            mirror: true,
            capture_width: CAPTURE_WIDTH,
            capture_height: CAPTURE_HEIGHT,

            smoothing_alpha: SMOOTH_ALPHA,

            preview: true,
            preview_width: PREVIEW_WIDTH,
            preview_height: PREVIEW_HEIGHT,

            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// Load and validate settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self =
            serde_json::from_str(&json).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load from `path` if given, otherwise use the defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, SettingsError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                log::info!("Using default settings");
                Ok(Self::default())
            }
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.smoothing_alpha > 0.0 && self.smoothing_alpha <= 1.0) {
            return Err(SettingsError::Alpha(self.smoothing_alpha));
        }
        if self.kernel_size == 0 || self.kernel_size % 2 == 0 {
            return Err(SettingsError::KernelSize(self.kernel_size));
        }
        if self.capture_width == 0 || self.capture_height == 0 {
            return Err(SettingsError::CaptureSize(
                self.capture_width,
                self.capture_height,
            ));
        }
        self.tuning
            .validate(FIELD_WIDTH)
            .map_err(SettingsError::Tuning)?;
        Ok(())
    }

    pub fn locator(&self) -> ColorLocator {
        ColorLocator::new(self.threshold, self.kernel_size, self.min_region_area)
    }

    pub fn smoother(&self) -> PositionSmoother {
        PositionSmoother::new(self.smoothing_alpha, FIELD_WIDTH)
    }
}
