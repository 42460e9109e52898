//! Greyscale pixel buffer with line and rectangle primitives.
//!
//! Always available (no feature gate) so the PNG snapshot path and any
//! in-memory consumer share the same drawing code.

use flowfield_core::FlowError;
use glam::DVec2;

/// A `width x height` greyscale buffer, one byte per pixel, row-major.
///
/// Drawing keeps the brighter of the existing and new intensity, so
/// overlapping strokes never darken each other.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Raster {
    /// Creates a black raster.
    ///
    /// Returns `FlowError::InvalidDimensions` if either side is zero or the
    /// pixel count overflows.
    pub fn new(width: usize, height: usize) -> Result<Self, FlowError> {
        if width == 0 || height == 0 {
            return Err(FlowError::InvalidDimensions);
        }
        let len = width
            .checked_mul(height)
            .ok_or(FlowError::InvalidDimensions)?;
        Ok(Self {
            width,
            height,
            pixels: vec![0; len],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Intensity at `(x, y)`, or `None` outside the raster.
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    /// Brightens the pixel containing world point `(x, y)`. Points off the
    /// raster are ignored.
    pub fn plot(&mut self, x: f64, y: f64, intensity: u8) {
        if !(x >= 0.0 && y >= 0.0) {
            return;
        }
        let (px, py) = (x.floor() as usize, y.floor() as usize);
        if px < self.width && py < self.height {
            let idx = py * self.width + px;
            self.pixels[idx] = self.pixels[idx].max(intensity);
        }
    }

    /// Draws a straight segment with a DDA walk, one sample per pixel step.
    pub fn line(&mut self, from: DVec2, to: DVec2, intensity: u8) {
        if !from.is_finite() || !to.is_finite() {
            return;
        }
        let delta = to - from;
        let steps = delta.x.abs().max(delta.y.abs()).ceil().max(1.0) as usize;
        let inc = delta / steps as f64;
        (0..=steps).for_each(|i| {
            let p = from + inc * i as f64;
            self.plot(p.x, p.y, intensity);
        });
    }

    /// Draws connected segments through `points` in order.
    pub fn polyline<'a>(&mut self, points: impl IntoIterator<Item = &'a DVec2>, intensity: u8) {
        let mut points = points.into_iter();
        let Some(&first) = points.next() else {
            return;
        };
        let mut prev = first;
        self.plot(prev.x, prev.y, intensity);
        for &p in points {
            self.line(prev, p, intensity);
            prev = p;
        }
    }

    /// Fills the axis-aligned rectangle `[x, x + w) x [y, y + h)`, clipped
    /// to the raster. Overwrites rather than brightens.
    pub fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, intensity: u8) {
        let x0 = clip(x, self.width);
        let y0 = clip(y, self.height);
        let x1 = clip(x + w, self.width);
        let y1 = clip(y + h, self.height);
        for py in y0..y1 {
            self.pixels[py * self.width + x0..py * self.width + x1].fill(intensity);
        }
    }

    /// Expands to RGBA8: grey replicated to R, G, B with opaque alpha.
    /// The buffer length is `width * height * 4`.
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|&v| [v, v, v, 255u8]).collect()
    }
}

fn clip(v: f64, limit: usize) -> usize {
    if v.is_nan() || v <= 0.0 {
        0
    } else {
        (v.floor() as usize).min(limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_zero_dimensions() {
        assert!(matches!(Raster::new(0, 4), Err(FlowError::InvalidDimensions)));
        assert!(Raster::new(4, 0).is_err());
        assert!(Raster::new(usize::MAX, 2).is_err());
    }

    #[test]
    fn plot_keeps_brighter_value() {
        let mut r = Raster::new(4, 4).unwrap();
        r.plot(1.5, 2.2, 200);
        r.plot(1.0, 2.0, 50);
        assert_eq!(r.get(1, 2), Some(200));
    }

    #[test]
    fn plot_ignores_points_off_raster() {
        let mut r = Raster::new(4, 4).unwrap();
        r.plot(-1.0, 1.0, 255);
        r.plot(4.0, 1.0, 255);
        r.plot(f64::NAN, 1.0, 255);
        assert!(r.pixels().iter().all(|&v| v == 0));
    }

    #[test]
    fn horizontal_line_covers_every_pixel() {
        let mut r = Raster::new(10, 3).unwrap();
        r.line(DVec2::new(1.0, 1.0), DVec2::new(8.0, 1.0), 255);
        for x in 1..=8 {
            assert_eq!(r.get(x, 1), Some(255), "gap at x={x}");
        }
        assert_eq!(r.get(0, 1), Some(0));
        assert_eq!(r.get(9, 1), Some(0));
    }

    #[test]
    fn diagonal_line_has_no_gaps() {
        let mut r = Raster::new(8, 8).unwrap();
        r.line(DVec2::new(0.5, 0.5), DVec2::new(7.5, 7.5), 100);
        for i in 0..8 {
            assert_eq!(r.get(i, i), Some(100));
        }
    }

    #[test]
    fn polyline_joins_points() {
        let mut r = Raster::new(6, 6).unwrap();
        let points = [DVec2::new(0.0, 0.0), DVec2::new(5.0, 0.0), DVec2::new(5.0, 5.0)];
        r.polyline(&points, 90);
        assert_eq!(r.get(3, 0), Some(90));
        assert_eq!(r.get(5, 3), Some(90));
        assert_eq!(r.get(2, 3), Some(0));
    }

    #[test]
    fn polyline_single_point_plots_it() {
        let mut r = Raster::new(3, 3).unwrap();
        r.polyline(&[DVec2::new(1.0, 1.0)], 60);
        assert_eq!(r.get(1, 1), Some(60));
    }

    #[test]
    fn fill_rect_clips_to_raster() {
        let mut r = Raster::new(5, 5).unwrap();
        r.fill_rect(3.0, -2.0, 10.0, 4.0, 77);
        assert_eq!(r.get(3, 0), Some(77));
        assert_eq!(r.get(4, 1), Some(77));
        assert_eq!(r.get(4, 2), Some(0));
        assert_eq!(r.get(2, 0), Some(0));
    }

    #[test]
    fn to_rgba_replicates_grey_with_opaque_alpha() {
        let mut r = Raster::new(2, 1).unwrap();
        r.plot(1.0, 0.0, 42);
        assert_eq!(r.to_rgba(), vec![0, 0, 0, 255, 42, 42, 42, 255]);
    }
}
