//! Library error types

use std::path::PathBuf;

use thiserror::Error;

/// Invalid HSV threshold bounds
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThresholdError {
    #[error("hue bound {0} is outside 0..=179")]
    HueOutOfRange(u8),
    #[error("lower bound {lower:?} exceeds upper bound {upper:?} on the {channel} channel")]
    Inverted {
        channel: &'static str,
        lower: [u8; 3],
        upper: [u8; 3],
    },
}

/// Settings could not be loaded or are inconsistent
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid color threshold")]
    Threshold(#[from] ThresholdError),
    #[error("smoothing alpha must be in (0, 1], got {0}")]
    Alpha(f32),
    #[error("morphology kernel size must be odd and non-zero, got {0}")]
    KernelSize(usize),
    #[error("capture size must be non-zero, got {0}x{1}")]
    CaptureSize(u32, u32),
    #[error("invalid tuning: {0}")]
    Tuning(String),
}

/// Frame source failures
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("camera device {device} could not be opened: {reason}")]
    Open { device: String, reason: String },
    #[error(
        "camera support not compiled in for device {0} (enable the `camera-v4l` feature, or use --camera stub://<name>)"
    )]
    Unsupported(String),
    #[error("frame source {0} is not connected")]
    NotConnected(String),
    #[error("frame unavailable: {0}")]
    Unavailable(String),
    #[error("frame buffer of {len} bytes does not match {width}x{height} RGB")]
    FrameSize { width: u32, height: u32, len: usize },
}

/// Camera preview conversion failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreviewError {
    #[error("source frame is empty")]
    EmptyFrame,
    #[error("preview target size {0}x{1} is empty")]
    EmptyTarget(u32, u32),
}
