//! Binary in-band mask and square-kernel morphology
//!
//! Raw per-pixel thresholding of a camera image is speckled: isolated pixels
//! pass the band and small holes open up inside the object. Opening removes
//! the specks, closing fills the holes.
//!
//! Pixels outside the image never influence the result: erosion treats them as
//! set, dilation as clear.

use super::hsv::ColorThreshold;
use crate::Frame;

/// A width x height grid of in-band flags, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: usize,
    height: usize,
    data: Vec<bool>,
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Erode,
    Dilate,
}

impl Mask {
    /// An all-clear mask
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![false; width * height],
        }
    }

    /// Mark every frame sample whose HSV value lies inside the band
    pub fn from_frame(frame: &Frame, threshold: &ColorThreshold) -> Self {
        let data = frame
            .pixels()
            .map(|pixel| threshold.matches_rgb(pixel.0))
            .collect();
        Self {
            width: frame.width() as usize,
            height: frame.height() as usize,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        self.data[y * self.width + x] = value;
    }

    /// Fill an axis-aligned rectangle, clipped to the mask
    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize) {
        for row in y..(y + h).min(self.height) {
            for col in x..(x + w).min(self.width) {
                self.set(col, row, true);
            }
        }
    }

    /// Number of set pixels
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&set| set).count()
    }

    pub(crate) fn as_slice(&self) -> &[bool] {
        &self.data
    }

    pub fn erode(&self, kernel: usize) -> Self {
        self.apply(kernel, Op::Erode)
    }

    pub fn dilate(&self, kernel: usize) -> Self {
        self.apply(kernel, Op::Dilate)
    }

    /// Erode then dilate: removes foreground specks smaller than the kernel
    pub fn open(&self, kernel: usize) -> Self {
        self.erode(kernel).dilate(kernel)
    }

    /// Dilate then erode: fills background holes smaller than the kernel
    pub fn close(&self, kernel: usize) -> Self {
        self.dilate(kernel).erode(kernel)
    }

    /// A square min/max filter is separable into a row pass and a column pass.
    fn apply(&self, kernel: usize, op: Op) -> Self {
        let radius = kernel / 2;
        if radius == 0 || self.data.is_empty() {
            return self.clone();
        }
        self.pass(radius, op, Axis::Horizontal)
            .pass(radius, op, Axis::Vertical)
    }

    fn pass(&self, radius: usize, op: Op, axis: Axis) -> Self {
        let (lines, len) = match axis {
            Axis::Horizontal => (self.height, self.width),
            Axis::Vertical => (self.width, self.height),
        };
        let width = self.width;
        let mut out = vec![false; self.data.len()];
        let mut prefix = vec![0u32; len + 1];

        for line in 0..lines {
            let index = |i: usize| match axis {
                Axis::Horizontal => line * width + i,
                Axis::Vertical => i * width + line,
            };

            for i in 0..len {
                prefix[i + 1] = prefix[i] + self.data[index(i)] as u32;
            }

            for i in 0..len {
                let lo = i.saturating_sub(radius);
                let hi = (i + radius + 1).min(len);
                let count = (prefix[hi] - prefix[lo]) as usize;
                out[index(i)] = match op {
                    Op::Erode => count == hi - lo,
                    Op::Dilate => count > 0,
                };
            }
        }

        Self {
            width: self.width,
            height: self.height,
            data: out,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_from_frame_marks_in_band_pixels() {
        let mut frame = Frame::from_pixel(4, 3, Rgb([30, 30, 30]));
        frame.put_pixel(1, 2, Rgb([10, 20, 240]));

        let mask = Mask::from_frame(&frame, &ColorThreshold::BLUE);
        assert_eq!(mask.count(), 1);
        assert!(mask.get(1, 2));
    }

    #[test]
    fn test_open_removes_isolated_pixels() {
        let mut mask = Mask::new(20, 20);
        mask.set(3, 3, true);
        mask.set(15, 4, true);
        mask.fill_rect(8, 8, 2, 2);

        assert_eq!(mask.open(5).count(), 0);
    }

    #[test]
    fn test_open_keeps_large_squares() {
        let mut mask = Mask::new(30, 30);
        mask.fill_rect(10, 10, 8, 8);

        assert_eq!(mask.open(5), mask);
    }

    #[test]
    fn test_close_fills_small_holes() {
        let mut mask = Mask::new(30, 30);
        mask.fill_rect(5, 5, 15, 15);
        mask.set(12, 12, false);
        mask.set(13, 12, false);

        let closed = mask.close(5);
        assert!(closed.get(12, 12));
        assert!(closed.get(13, 12));
        assert_eq!(closed.count(), 15 * 15);
    }

    #[test]
    fn test_border_does_not_erode_objects() {
        // An object touching the image edge survives opening intact
        let mut mask = Mask::new(20, 20);
        mask.fill_rect(0, 0, 7, 7);

        assert_eq!(mask.open(5), mask);
    }

    #[test]
    fn test_dilate_grows_by_radius() {
        let mut mask = Mask::new(11, 11);
        mask.set(5, 5, true);

        let grown = mask.dilate(5);
        assert_eq!(grown.count(), 25);
        assert!(grown.get(3, 3));
        assert!(grown.get(7, 7));
        assert!(!grown.get(2, 5));
    }

    #[test]
    fn test_kernel_of_one_is_identity() {
        let mut mask = Mask::new(5, 5);
        mask.set(2, 2, true);

        assert_eq!(mask.open(1), mask);
        assert_eq!(mask.close(1), mask);
    }
}
