//! Color locator: frame in, tracked-object centroid out

use glam::Vec2;

use super::hsv::ColorThreshold;
use super::mask::Mask;
use super::regions::largest_region;
use crate::Frame;
use crate::consts::{MIN_REGION_AREA, MORPH_KERNEL_SIZE};

/// Outcome of locating the target color in one frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DetectionResult {
    /// Centroid in frame pixel coordinates, when the target was found
    pub centroid: Option<Vec2>,
    /// Area of the largest in-band region (0 when there was none)
    pub area: u32,
}

impl DetectionResult {
    pub fn not_present(area: u32) -> Self {
        Self {
            centroid: None,
            area,
        }
    }

    pub fn present(&self) -> bool {
        self.centroid.is_some()
    }
}

/// Finds the largest blob of the configured color
#[derive(Debug, Clone)]
pub struct ColorLocator {
    threshold: ColorThreshold,
    kernel_size: usize,
    min_area: u32,
}

impl Default for ColorLocator {
    fn default() -> Self {
        Self::new(ColorThreshold::default(), MORPH_KERNEL_SIZE, MIN_REGION_AREA)
    }
}

impl ColorLocator {
    pub fn new(threshold: ColorThreshold, kernel_size: usize, min_area: u32) -> Self {
        Self {
            threshold,
            kernel_size,
            min_area,
        }
    }

    pub fn threshold(&self) -> &ColorThreshold {
        &self.threshold
    }

    /// Threshold, clean up and reduce the mask of `frame` to a single point
    pub fn locate(&self, frame: &Frame) -> DetectionResult {
        let mask = self.mask(frame);
        self.locate_in_mask(&mask)
    }

    /// The cleaned in-band mask (opening, then closing)
    pub fn mask(&self, frame: &Frame) -> Mask {
        Mask::from_frame(frame, &self.threshold)
            .open(self.kernel_size)
            .close(self.kernel_size)
    }

    pub fn locate_in_mask(&self, mask: &Mask) -> DetectionResult {
        let Some(region) = largest_region(mask) else {
            return DetectionResult::not_present(0);
        };

        if region.area < self.min_area {
            log::trace!(
                "largest region too small: {} < {}",
                region.area,
                self.min_area
            );
            return DetectionResult::not_present(region.area);
        }

        // Defensive: find_regions never yields an empty region
        let Some((cx, cy)) = region.centroid() else {
            return DetectionResult::not_present(0);
        };

        DetectionResult {
            centroid: Some(Vec2::new(cx, cy)),
            area: region.area,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    const BACKGROUND: Rgb<u8> = Rgb([30, 30, 30]);
    const BLUE: Rgb<u8> = Rgb([20, 40, 230]);

    fn paint(frame: &mut Frame, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
        for py in y..y + h {
            for px in x..x + w {
                frame.put_pixel(px, py, color);
            }
        }
    }

    #[test]
    fn test_empty_frame_not_present() {
        let frame = Frame::from_pixel(64, 48, BACKGROUND);
        let result = ColorLocator::default().locate(&frame);
        assert!(!result.present());
        assert_eq!(result.area, 0);
    }

    #[test]
    fn test_centroid_of_square() {
        let mut frame = Frame::from_pixel(160, 120, BACKGROUND);
        paint(&mut frame, 40, 30, 30, 30, BLUE);

        let result = ColorLocator::default().locate(&frame);
        assert!(result.present());
        assert_eq!(result.area, 900);
        let centroid = result.centroid.unwrap();
        assert!((centroid.x - 54.5).abs() < 1e-4);
        assert!((centroid.y - 44.5).abs() < 1e-4);
    }

    #[test]
    fn test_small_region_rejected() {
        let mut frame = Frame::from_pixel(160, 120, BACKGROUND);
        // 20x20 = 400 px, below the 600 px minimum
        paint(&mut frame, 10, 10, 20, 20, BLUE);

        let result = ColorLocator::default().locate(&frame);
        assert!(!result.present());
        assert_eq!(result.area, 400);
    }

    #[test]
    fn test_area_at_minimum_is_accepted() {
        let mut frame = Frame::from_pixel(160, 120, BACKGROUND);
        paint(&mut frame, 10, 10, 30, 20, BLUE);

        let result = ColorLocator::default().locate(&frame);
        assert_eq!(result.area, 600);
        assert!(result.present());
    }

    #[test]
    fn test_speckle_is_ignored() {
        let mut frame = Frame::from_pixel(160, 120, BACKGROUND);
        paint(&mut frame, 100, 60, 30, 30, BLUE);
        // Scattered single-pixel noise far from the object
        for i in 0..20 {
            frame.put_pixel(5 + i * 4, 5 + (i % 3) * 7, BLUE);
        }

        let result = ColorLocator::default().locate(&frame);
        let centroid = result.centroid.unwrap();
        assert_eq!(result.area, 900);
        assert!((centroid.x - 114.5).abs() < 1e-4);
    }

    #[test]
    fn test_picks_largest_of_two() {
        let mut frame = Frame::from_pixel(200, 100, BACKGROUND);
        paint(&mut frame, 10, 10, 30, 30, BLUE);
        paint(&mut frame, 120, 20, 40, 40, BLUE);

        let result = ColorLocator::default().locate(&frame);
        assert_eq!(result.area, 1600);
        assert!((result.centroid.unwrap().x - 139.5).abs() < 1e-4);
    }

    #[test]
    fn test_zero_min_area_never_reports_empty_region() {
        let locator = ColorLocator::new(ColorThreshold::BLUE, 5, 0);
        let result = locator.locate_in_mask(&Mask::new(8, 8));
        assert!(!result.present());
    }
}
