//! Camera preview thumbnail

use image::imageops::{self, FilterType};

use crate::Frame;
use crate::error::PreviewError;

/// Downscale a frame to the preview size
pub fn downscale(frame: &Frame, width: u32, height: u32) -> Result<Frame, PreviewError> {
    if frame.width() == 0 || frame.height() == 0 {
        return Err(PreviewError::EmptyFrame);
    }
    if width == 0 || height == 0 {
        return Err(PreviewError::EmptyTarget(width, height));
    }
    Ok(imageops::resize(frame, width, height, FilterType::Triangle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_downscale_size_and_color() {
        let frame = Frame::from_pixel(640, 480, Rgb([0, 0, 255]));
        let small = downscale(&frame, 200, 150).unwrap();
        assert_eq!(small.dimensions(), (200, 150));
        assert_eq!(small.get_pixel(100, 75), &Rgb([0, 0, 255]));
    }

    #[test]
    fn test_empty_inputs_rejected() {
        assert_eq!(
            downscale(&Frame::new(0, 0), 200, 150),
            Err(PreviewError::EmptyFrame)
        );
        assert_eq!(
            downscale(&Frame::new(10, 10), 0, 150),
            Err(PreviewError::EmptyTarget(0, 150))
        );
    }
}
