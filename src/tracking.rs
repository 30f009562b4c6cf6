//! Camera-space to play-field mapping, smoothing and paddle clamping
//!
//! The raw centroid jitters by a few pixels every frame and disappears
//! whenever the object leaves the band. The smoother low-pass filters it and
//! holds the last value through dropouts instead of snapping anywhere.

use crate::consts::{FIELD_WIDTH, SMOOTH_ALPHA};
use crate::vision::DetectionResult;

/// Exponential moving average over the mapped horizontal position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionSmoother {
    /// Weight of the newest sample, in (0, 1]
    pub alpha: f32,
    /// Play-field width the centroid is mapped into
    pub field_width: f32,
}

impl Default for PositionSmoother {
    fn default() -> Self {
        Self {
            alpha: SMOOTH_ALPHA,
            field_width: FIELD_WIDTH,
        }
    }
}

impl PositionSmoother {
    pub fn new(alpha: f32, field_width: f32) -> Self {
        Self { alpha, field_width }
    }

    /// Rescale a frame x coordinate into play-field x
    #[inline]
    pub fn map_to_field(&self, frame_x: f32, frame_width: u32) -> f32 {
        frame_x * self.field_width / frame_width as f32
    }

    /// One filter step
    #[inline]
    pub fn blend(&self, mapped: f32, previous: f32) -> f32 {
        self.alpha * mapped + (1.0 - self.alpha) * previous
    }

    /// Next smoothed position. Without a detection (or with a zero-width
    /// frame) the previous position is returned untouched.
    pub fn update(&self, detection: &DetectionResult, frame_width: u32, previous: f32) -> f32 {
        match detection.centroid {
            Some(centroid) if frame_width > 0 => {
                let mapped = self.map_to_field(centroid.x, frame_width);
                self.blend(mapped, previous)
            }
            _ => previous,
        }
    }
}

/// Clamp a paddle center so the paddle stays inside `[0, field_width]`
///
/// A paddle wider than the field is centered.
#[inline]
pub fn clamp_paddle_center(x: f32, half_width: f32, field_width: f32) -> f32 {
    if field_width <= 2.0 * half_width {
        return field_width / 2.0;
    }
    x.clamp(half_width, field_width - half_width)
}
