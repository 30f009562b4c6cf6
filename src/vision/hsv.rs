//! HSV color space and threshold bands
//!
//! Uses the 8-bit convention common to camera tooling: hue in `0..180`
//! (degrees halved), saturation and value in `0..=255`. Calibration tools
//! report bounds in this convention, so thresholds can be pasted in as-is.

use serde::{Deserialize, Serialize};

use crate::error::ThresholdError;

/// Largest valid 8-bit hue value
pub const HUE_MAX: u8 = 179;

/// A color in 8-bit HSV
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl Hsv {
    /// Convert an RGB sample
    pub fn from_rgb([r, g, b]: [u8; 3]) -> Self {
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = (max - min) as f32;

        let s = if max == 0 {
            0
        } else {
            (255.0 * delta / max as f32).round() as u8
        };

        let h = if delta == 0.0 {
            0
        } else {
            let (r, g, b) = (r as f32, g as f32, b as f32);
            let mut degrees = if max as f32 == r {
                60.0 * (g - b) / delta
            } else if max as f32 == g {
                120.0 + 60.0 * (b - r) / delta
            } else {
                240.0 + 60.0 * (r - g) / delta
            };
            if degrees < 0.0 {
                degrees += 360.0;
            }
            // 359.5 degrees rounds to 180, which wraps back to red
            ((degrees / 2.0).round() as u16 % 180) as u8
        };

        Self { h, s, v: max }
    }
}

/// Inclusive lower/upper HSV bounds selecting the tracked color
///
/// Invariant: `lower <= upper` component-wise and both hues are `<= 179`.
/// Hue ranges that wrap through red are not representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ThresholdBounds", into = "ThresholdBounds")]
pub struct ColorThreshold {
    lower: [u8; 3],
    upper: [u8; 3],
}

/// Serialized form: `{"lower": [h, s, v], "upper": [h, s, v]}`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct ThresholdBounds {
    lower: [u8; 3],
    upper: [u8; 3],
}

impl ColorThreshold {
    /// Blue band used when no calibration is supplied
    pub const BLUE: Self = Self {
        lower: [100, 150, 0],
        upper: [140, 255, 255],
    };

    pub fn new(lower: [u8; 3], upper: [u8; 3]) -> Result<Self, ThresholdError> {
        for hue in [lower[0], upper[0]] {
            if hue > HUE_MAX {
                return Err(ThresholdError::HueOutOfRange(hue));
            }
        }
        for (i, channel) in ["hue", "saturation", "value"].into_iter().enumerate() {
            if lower[i] > upper[i] {
                return Err(ThresholdError::Inverted {
                    channel,
                    lower,
                    upper,
                });
            }
        }
        Ok(Self { lower, upper })
    }

    /// Build from the calibration tuple `(h_min, s_min, v_min, h_max, s_max, v_max)`
    pub fn from_bounds(bounds: [u8; 6]) -> Result<Self, ThresholdError> {
        Self::new(
            [bounds[0], bounds[1], bounds[2]],
            [bounds[3], bounds[4], bounds[5]],
        )
    }

    pub fn lower(&self) -> [u8; 3] {
        self.lower
    }

    pub fn upper(&self) -> [u8; 3] {
        self.upper
    }

    /// True if every component lies within the inclusive band
    #[inline]
    pub fn contains(&self, hsv: Hsv) -> bool {
        (self.lower[0]..=self.upper[0]).contains(&hsv.h)
            && (self.lower[1]..=self.upper[1]).contains(&hsv.s)
            && (self.lower[2]..=self.upper[2]).contains(&hsv.v)
    }

    /// Convenience: convert and test an RGB sample
    #[inline]
    pub fn matches_rgb(&self, rgb: [u8; 3]) -> bool {
        self.contains(Hsv::from_rgb(rgb))
    }
}

impl Default for ColorThreshold {
    fn default() -> Self {
        Self::BLUE
    }
}

impl TryFrom<ThresholdBounds> for ColorThreshold {
    type Error = ThresholdError;

    fn try_from(bounds: ThresholdBounds) -> Result<Self, Self::Error> {
        Self::new(bounds.lower, bounds.upper)
    }
}

impl From<ColorThreshold> for ThresholdBounds {
    fn from(threshold: ColorThreshold) -> Self {
        Self {
            lower: threshold.lower,
            upper: threshold.upper,
        }
    }
}
