//! Connected-component labeling of a binary mask
//!
//! Regions are grown from unvisited seed pixels with an explicit stack (no
//! recursion, so large blobs cannot overflow), visiting all 8 neighbors.
//! While growing, the zeroth and first-order moments are accumulated so the
//! centroid falls out without a second pass.

use super::mask::Mask;

/// 8-connected neighborhood offsets
const NEIGHBORS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// A maximal set of adjacent in-band pixels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    /// Pixel count (zeroth moment)
    pub area: u32,
    /// Sum of pixel x coordinates (first moment in x)
    pub sum_x: u64,
    /// Sum of pixel y coordinates (first moment in y)
    pub sum_y: u64,
    /// Bounding box as (min_x, min_y, max_x, max_y), inclusive
    pub bounds: (u32, u32, u32, u32),
    /// Row-major index of the pixel the region was grown from
    pub seed: usize,
}

impl Region {
    /// Centroid `(sum_x / area, sum_y / area)`, or `None` for a zero-area region
    pub fn centroid(&self) -> Option<(f32, f32)> {
        if self.area == 0 {
            return None;
        }
        let area = self.area as f64;
        Some((
            (self.sum_x as f64 / area) as f32,
            (self.sum_y as f64 / area) as f32,
        ))
    }
}

/// Find every connected region, in raster order of each region's first pixel
pub fn find_regions(mask: &Mask) -> Vec<Region> {
    let width = mask.width();
    let height = mask.height();
    let pixels = mask.as_slice();

    let mut visited = vec![false; pixels.len()];
    let mut regions = Vec::new();
    let mut stack: Vec<usize> = Vec::new();

    for seed in 0..pixels.len() {
        if !pixels[seed] || visited[seed] {
            continue;
        }

        visited[seed] = true;
        stack.push(seed);

        let mut region = Region {
            area: 0,
            sum_x: 0,
            sum_y: 0,
            bounds: (u32::MAX, u32::MAX, 0, 0),
            seed,
        };

        while let Some(index) = stack.pop() {
            let x = index % width;
            let y = index / width;

            region.area += 1;
            region.sum_x += x as u64;
            region.sum_y += y as u64;
            let (min_x, min_y, max_x, max_y) = region.bounds;
            region.bounds = (
                min_x.min(x as u32),
                min_y.min(y as u32),
                max_x.max(x as u32),
                max_y.max(y as u32),
            );

            for (dx, dy) in NEIGHBORS {
                let nx = x as isize + dx;
                let ny = y as isize + dy;
                if nx < 0 || ny < 0 || nx >= width as isize || ny >= height as isize {
                    continue;
                }
                let neighbor = ny as usize * width + nx as usize;
                if pixels[neighbor] && !visited[neighbor] {
                    visited[neighbor] = true;
                    stack.push(neighbor);
                }
            }
        }

        regions.push(region);
    }

    regions
}

/// The region with the greatest area
///
/// Equal areas resolve to the region whose seed pixel comes first in raster
/// order (top-most, then left-most), so the choice is stable frame to frame.
pub fn largest_region(mask: &Mask) -> Option<Region> {
    find_regions(mask)
        .into_iter()
        .reduce(|best, next| if next.area > best.area { next } else { best })
}
