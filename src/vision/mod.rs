//! Vision pipeline: frame sources and the color locator
//!
//! Per frame: RGB -> HSV band mask -> opening/closing -> largest 8-connected
//! region -> centroid. Everything here is stateless across frames.

pub mod hsv;
pub mod locator;
pub mod mask;
pub mod regions;
pub mod source;
#[cfg(feature = "camera-v4l")]
pub mod v4l2;

pub use hsv::{ColorThreshold, Hsv};
pub use locator::{ColorLocator, DetectionResult};
pub use mask::Mask;
pub use regions::{Region, find_regions, largest_region};
pub use source::{FrameSource, SourceConfig, SyntheticSource, open_source};
