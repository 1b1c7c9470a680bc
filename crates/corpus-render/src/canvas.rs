// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Canvas and paper texture synthesis.

use corpus_core::CorpusRng;
use image::{GrayImage, Luma, Rgb, RgbImage};
use tracing::{debug, instrument};

/// Near-white paper tone used by every printed page.
pub const BACKGROUND: u8 = 245;

/// Slightly lighter tone for blank pages.
pub const BLANK_BACKGROUND: u8 = 248;

/// Allocate a uniform RGB page of the given size.
pub fn new_canvas(width: u32, height: u32, base: u8) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb([base, base, base]))
}

/// Add independent Gaussian noise with standard deviation `strength` to every
/// channel of every pixel, clamped to the valid range.
///
/// Draws are taken in row-major pixel order, channel by channel, so the
/// texture is a pure function of the RNG state on entry.
#[instrument(skip(image, rng), fields(width = image.width(), height = image.height()))]
pub fn add_paper_texture(image: &mut RgbImage, rng: &mut CorpusRng, strength: f32) {
    for pixel in image.pixels_mut() {
        for channel in pixel.0.iter_mut() {
            let value = *channel as f32 + rng.standard_normal() * strength;
            *channel = value.clamp(0.0, 255.0) as u8;
        }
    }
    debug!(strength, "Paper texture applied");
}

/// Rec. 601 luma of one pixel: `0.299 R + 0.587 G + 0.114 B`.
pub fn luma(pixel: &Rgb<u8>) -> f64 {
    let [r, g, b] = pixel.0;
    0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64
}

/// Grayscale copy of `image` using [`luma`], rounded to the nearest level.
pub fn to_luma(image: &RgbImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        Luma([luma(image.get_pixel(x, y)).round().clamp(0.0, 255.0) as u8])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_is_uniform() {
        let img = new_canvas(12, 7, BACKGROUND);
        assert_eq!(img.dimensions(), (12, 7));
        assert!(img.pixels().all(|p| p.0 == [245, 245, 245]));
    }

    #[test]
    fn texture_is_reproducible_for_a_seed() {
        let mut a = new_canvas(32, 32, BACKGROUND);
        let mut b = new_canvas(32, 32, BACKGROUND);
        add_paper_texture(&mut a, &mut CorpusRng::new(5), 1.5);
        add_paper_texture(&mut b, &mut CorpusRng::new(5), 1.5);
        assert_eq!(a, b);
    }

    #[test]
    fn texture_stays_close_to_base() {
        let mut img = new_canvas(64, 64, BACKGROUND);
        add_paper_texture(&mut img, &mut CorpusRng::new(11), 1.5);
        let n = (64 * 64 * 3) as f64;
        let mean: f64 = img.as_raw().iter().map(|&v| v as f64).sum::<f64>() / n;
        // Truncation toward zero biases the mean down by about half a level.
        assert!((mean - 244.5).abs() < 0.5, "mean {mean}");
        assert!(img.as_raw().iter().any(|&v| v != BACKGROUND));
    }

    #[test]
    fn texture_clamps_at_white() {
        let mut img = new_canvas(16, 16, 255);
        add_paper_texture(&mut img, &mut CorpusRng::new(3), 40.0);
        assert!(img.as_raw().iter().any(|&v| v == 255));
    }

    #[test]
    fn luma_uses_rec601_weights() {
        assert!((luma(&Rgb([255, 255, 255])) - 255.0).abs() < 1e-9);
        assert!((luma(&Rgb([255, 0, 0])) - 76.245).abs() < 1e-9);
        assert!((luma(&Rgb([0, 255, 0])) - 149.685).abs() < 1e-9);
        assert!((luma(&Rgb([0, 0, 255])) - 29.07).abs() < 1e-9);
    }

    #[test]
    fn grayscale_copy_rounds_each_pixel() {
        let mut img = new_canvas(2, 1, 0);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(1, 0, Rgb([0, 255, 0]));
        let gray = to_luma(&img);
        assert_eq!(gray.get_pixel(0, 0).0, [76]);
        assert_eq!(gray.get_pixel(1, 0).0, [150]);
    }
}
