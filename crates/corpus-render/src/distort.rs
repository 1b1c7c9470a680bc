// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Distortion engine — gutter shadows, linear illumination falloff, vignette,
// curved page warp, rotation and rotation-plus-perspective. Photometric steps
// multiply each channel by a mask in f32, clamp to [0, 255] and truncate.
// Geometric steps resample bilinearly and fill uncovered areas with white.

use corpus_core::GutterSide;
use image::{Rgb, RgbImage};
use imageproc::geometric_transformations::{self, Interpolation, Projection};
use tracing::{debug, info, instrument, warn};

const FILL: Rgb<u8> = Rgb([255, 255, 255]);

/// Axis along which a linear illumination gradient runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Left to right.
    X,
    /// Top to bottom.
    Y,
}

/// Distortion pipeline over a single page image.
///
/// Each method consumes `self` and returns the transformed page, so steps
/// chain in the order they are applied:
///
/// ```ignore
/// let page = Distorter::new(page)
///     .shadow_gradient(GutterSide::Left, 140, 0.55)
///     .linear_illumination(Axis::X, 0.95, 1.0)
///     .into_image();
/// ```
pub struct Distorter {
    image: RgbImage,
}

/// `numpy.linspace` in f32: `count` evenly spaced values from `start` to `end`
/// inclusive.
fn linspace(start: f32, end: f32, count: usize) -> Vec<f32> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        n => {
            let step = (end - start) / (n - 1) as f32;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f32 })
                .collect()
        }
    }
}

fn scale(value: u8, factor: f32) -> u8 {
    (value as f32 * factor).clamp(0.0, 255.0) as u8
}

impl Distorter {
    pub fn new(image: RgbImage) -> Self {
        Self { image }
    }

    pub fn as_image(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    /// Darken a band along one vertical edge, strongest at the edge itself.
    ///
    /// `band` is clamped to `[1, page width]`. The band ramps from
    /// `min_factor` at the edge to 1.0 at its inner side. Sides other than
    /// left and right leave the page untouched.
    #[instrument(skip(self), fields(width = self.image.width(), height = self.image.height()))]
    pub fn shadow_gradient(mut self, side: GutterSide, band: u32, min_factor: f32) -> Self {
        let (w, _) = self.image.dimensions();
        let band = band.clamp(1, w.max(1)) as usize;
        let (first_column, ramp) = match side {
            GutterSide::Left => (0, linspace(min_factor, 1.0, band)),
            GutterSide::Right => (w as usize - band, linspace(1.0, min_factor, band)),
            other => {
                debug!(side = %other, "No shadow for this side");
                return self;
            }
        };

        for (x, _, pixel) in self.image.enumerate_pixels_mut() {
            let x = x as usize;
            if x < first_column || x >= first_column + band {
                continue;
            }
            let factor = ramp[x - first_column];
            for channel in pixel.0.iter_mut() {
                *channel = scale(*channel, factor);
            }
        }
        debug!(side = %side, band, min_factor, "Shadow gradient applied");
        self
    }

    /// Multiply the page by a linear ramp running from `start` to `end`
    /// along `axis`.
    #[instrument(skip(self))]
    pub fn linear_illumination(mut self, axis: Axis, start: f32, end: f32) -> Self {
        let (w, h) = self.image.dimensions();
        let ramp = match axis {
            Axis::X => linspace(start, end, w as usize),
            Axis::Y => linspace(start, end, h as usize),
        };
        for (x, y, pixel) in self.image.enumerate_pixels_mut() {
            let factor = match axis {
                Axis::X => ramp[x as usize],
                Axis::Y => ramp[y as usize],
            };
            for channel in pixel.0.iter_mut() {
                *channel = scale(*channel, factor);
            }
        }
        self
    }

    /// Radial falloff from the page centre.
    ///
    /// The mask is `1 - (d / d_max) * (1 - strength)` clamped to
    /// `[strength, 1]`, where `d` is the distance from `(w/2, h/2)` and
    /// `d_max` the distance from the centre to a corner.
    #[instrument(skip(self))]
    pub fn vignette(mut self, strength: f32) -> Self {
        let (w, h) = self.image.dimensions();
        let cx = w as f32 / 2.0;
        let cy = h as f32 / 2.0;
        let max_dist = (cx * cx + cy * cy).sqrt().max(f32::EPSILON);
        let (floor, ceil) = if strength <= 1.0 { (strength, 1.0) } else { (1.0, strength) };

        for (x, y, pixel) in self.image.enumerate_pixels_mut() {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            let dist = (dx * dx + dy * dy).sqrt();
            let factor = (1.0 - (dist / max_dist) * (1.0 - strength)).clamp(floor, ceil);
            for channel in pixel.0.iter_mut() {
                *channel = scale(*channel, factor);
            }
        }
        self
    }

    /// Bend every row along one full sine period across the page width.
    ///
    /// Output pixel `(x, y)` samples the source at
    /// `(x, y + amplitude * sin(2πx / w))`.
    #[instrument(skip(self))]
    pub fn curved_warp(self, amplitude: f32) -> Self {
        let w = self.image.width().max(1) as f32;
        let period = std::f32::consts::TAU / w;
        let warped = geometric_transformations::warp_with(
            &self.image,
            move |x, y| (x, y + amplitude * (period * x).sin()),
            Interpolation::Bilinear,
            FILL,
        );
        info!(amplitude, "Curved warp applied");
        Self { image: warped }
    }

    /// Rotate about the page centre by `degrees`, counter-clockwise for
    /// positive angles. The canvas size is unchanged.
    #[instrument(skip(self))]
    pub fn rotate(self, degrees: f32) -> Self {
        if degrees.abs() < f32::EPSILON {
            return self;
        }
        // imageproc measures angles clockwise in image coordinates.
        let rotated = geometric_transformations::rotate_about_center(
            &self.image,
            -degrees.to_radians(),
            Interpolation::Bilinear,
            FILL,
        );
        info!(degrees, "Rotation applied");
        Self { image: rotated }
    }

    /// Rotate, then apply a fixed keystone projection that pulls the page
    /// corners to `(40, 20)`, `(w-60, 0)`, `(w-20, h-40)` and `(0, h-10)`.
    #[instrument(skip(self))]
    pub fn rotate_perspective(self, degrees: f32) -> Self {
        let rotated = self.rotate(degrees).image;
        let (w, h) = rotated.dimensions();
        let (wf, hf) = (w as f32, h as f32);
        let from = [(0.0, 0.0), (wf - 1.0, 0.0), (wf - 1.0, hf - 1.0), (0.0, hf - 1.0)];
        let to = [(40.0, 20.0), (wf - 60.0, 0.0), (wf - 20.0, hf - 40.0), (0.0, hf - 10.0)];

        let Some(projection) = Projection::from_control_points(from, to) else {
            warn!(width = w, height = h, "Degenerate keystone; keeping rotated page");
            return Self { image: rotated };
        };
        let warped = geometric_transformations::warp(&rotated, &projection, Interpolation::Bilinear, FILL);
        info!(degrees, "Rotation and perspective applied");
        Self { image: warped }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(w: u32, h: u32, v: u8) -> RgbImage {
        RgbImage::from_pixel(w, h, Rgb([v, v, v]))
    }

    #[test]
    fn linspace_matches_endpoints() {
        assert_eq!(linspace(0.55, 1.0, 1), vec![0.55]);
        let ramp = linspace(0.5, 1.0, 6);
        assert_eq!(ramp.len(), 6);
        assert_eq!(ramp[0], 0.5);
        assert_eq!(ramp[5], 1.0);
        assert!((ramp[1] - 0.6).abs() < 1e-6);
    }

    #[test]
    fn left_shadow_darkens_only_the_band() {
        let img = Distorter::new(gray(300, 10, 200))
            .shadow_gradient(GutterSide::Left, 140, 0.55)
            .into_image();
        assert_eq!(img.get_pixel(0, 5).0[0], 110);
        assert!(img.get_pixel(70, 5).0[0] > 110);
        assert!(img.get_pixel(70, 5).0[0] < 200);
        assert_eq!(img.get_pixel(139, 5).0[0], 200);
        assert_eq!(img.get_pixel(200, 5).0[0], 200);
    }

    #[test]
    fn right_shadow_mirrors_left() {
        let img = Distorter::new(gray(300, 10, 200))
            .shadow_gradient(GutterSide::Right, 140, 0.55)
            .into_image();
        assert_eq!(img.get_pixel(299, 5).0[0], 110);
        assert_eq!(img.get_pixel(160, 5).0[0], 200);
        assert_eq!(img.get_pixel(0, 5).0[0], 200);
    }

    #[test]
    fn oversized_shadow_band_is_clamped() {
        let img = Distorter::new(gray(50, 4, 100))
            .shadow_gradient(GutterSide::Left, 500, 0.5)
            .into_image();
        assert_eq!(img.get_pixel(0, 0).0[0], 50);
        assert_eq!(img.get_pixel(49, 0).0[0], 100);
    }

    #[test]
    fn centre_shadow_is_a_no_op() {
        let original = gray(40, 40, 180);
        let img = Distorter::new(original.clone())
            .shadow_gradient(GutterSide::Center, 10, 0.2)
            .into_image();
        assert_eq!(img, original);
    }

    #[test]
    fn illumination_ramps_along_axis() {
        let img = Distorter::new(gray(10, 101, 200))
            .linear_illumination(Axis::Y, 1.25, 0.75)
            .into_image();
        assert_eq!(img.get_pixel(3, 0).0[0], 250);
        assert_eq!(img.get_pixel(3, 100).0[0], 150);
        assert!(img.get_pixel(3, 50).0[0].abs_diff(200) <= 1);
        // Rows are uniform across x.
        assert_eq!(img.get_pixel(0, 50), img.get_pixel(9, 50));
    }

    #[test]
    fn brightening_saturates_at_white() {
        let img = Distorter::new(gray(4, 4, 250))
            .linear_illumination(Axis::X, 1.5, 1.5)
            .into_image();
        assert!(img.pixels().all(|p| p.0 == [255, 255, 255]));
    }

    #[test]
    fn vignette_keeps_centre_and_darkens_corners() {
        let img = Distorter::new(gray(200, 100, 200)).vignette(0.92).into_image();
        assert_eq!(img.get_pixel(100, 50).0[0], 200);
        let corner = img.get_pixel(0, 0).0[0];
        assert!(corner < 200 && corner >= 183, "corner {corner}");
    }

    #[test]
    fn curved_warp_displaces_rows() {
        let mut img = gray(200, 100, 245);
        for x in 0..200 {
            img.put_pixel(x, 50, Rgb([20, 20, 20]));
        }
        let warped = Distorter::new(img).curved_warp(10.0).into_image();
        // At a quarter period the source row sits ten pixels below.
        assert!(warped.get_pixel(50, 40).0[0] < 100);
        // At three quarters it sits ten pixels above.
        assert!(warped.get_pixel(150, 60).0[0] < 100);
        assert_eq!(warped.dimensions(), (200, 100));
    }

    #[test]
    fn zero_rotation_is_identity() {
        let original = gray(30, 20, 77);
        let img = Distorter::new(original.clone()).rotate(0.0).into_image();
        assert_eq!(img, original);
    }

    #[test]
    fn rotation_keeps_size_and_fills_white() {
        let img = Distorter::new(gray(200, 300, 100)).rotate(10.0).into_image();
        assert_eq!(img.dimensions(), (200, 300));
        assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255]);
        assert!(img.get_pixel(100, 150).0[0].abs_diff(100) <= 1);
    }

    #[test]
    fn keystone_exposes_white_corner() {
        let img = Distorter::new(gray(400, 600, 100))
            .rotate_perspective(0.0)
            .into_image();
        assert_eq!(img.dimensions(), (400, 600));
        // The top-left source corner lands at (40, 20); everything left of it is fill.
        assert_eq!(img.get_pixel(5, 5).0, [255, 255, 255]);
        assert!(img.get_pixel(200, 300).0[0].abs_diff(100) <= 1);
    }
}
