// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// DCT perceptual hash (pHash) for ornament fingerprints.

use corpus_core::PxRect;
use corpus_core::error::{CorpusError, Result};
use image::imageops::{self, FilterType};
use image::{GrayImage, RgbImage};

use crate::canvas::to_luma;

const SAMPLE: usize = 32;
const LOW_FREQ: usize = 8;

/// 64-bit DCT hash of an image as 16 lowercase hex digits.
///
/// The image is reduced to Rec. 601 luma, resampled to 32x32 with Lanczos3, and
/// transformed with a 2-D DCT-II. Each coefficient of the top-left 8x8 block is
/// compared against the block median; bits are packed row-major, most
/// significant first.
pub fn perceptual_hash(image: &RgbImage) -> String {
    hash_luma(&to_luma(image))
}

/// Hash the region `[x0, x1) × [y0, y1)` of `image`.
///
/// The region is clipped to the image first; an empty region is an error.
pub fn ornament_hash(image: &RgbImage, bbox: PxRect) -> Result<String> {
    let (w, h) = (image.width() as i32, image.height() as i32);
    let x0 = bbox.x0.clamp(0, w);
    let y0 = bbox.y0.clamp(0, h);
    let x1 = bbox.x1.clamp(0, w);
    let y1 = bbox.y1.clamp(0, h);
    if x1 <= x0 || y1 <= y0 {
        return Err(CorpusError::Image(format!(
            "ornament box {:?} does not overlap a {}x{} page",
            bbox, w, h
        )));
    }
    let crop = imageops::crop_imm(image, x0 as u32, y0 as u32, (x1 - x0) as u32, (y1 - y0) as u32).to_image();
    Ok(perceptual_hash(&crop))
}

/// Number of differing bits between two hashes, or `None` if either is not
/// a 16-digit hex string.
pub fn hamming_distance(a: &str, b: &str) -> Option<u32> {
    let parse = |s: &str| {
        if s.len() != 16 {
            return None;
        }
        u64::from_str_radix(s, 16).ok()
    };
    Some((parse(a)? ^ parse(b)?).count_ones())
}

fn hash_luma(luma: &GrayImage) -> String {
    let small = imageops::resize(luma, SAMPLE as u32, SAMPLE as u32, FilterType::Lanczos3);
    let pixels: Vec<f64> = small.as_raw().iter().map(|&v| v as f64).collect();

    // cos(π k (2n + 1) / 2N) for the low-frequency rows only.
    let mut basis = [[0.0f64; SAMPLE]; LOW_FREQ];
    for (k, row) in basis.iter_mut().enumerate() {
        for (n, value) in row.iter_mut().enumerate() {
            *value = (std::f64::consts::PI * k as f64 * (2 * n + 1) as f64 / (2 * SAMPLE) as f64).cos();
        }
    }

    let mut coefficients = Vec::with_capacity(LOW_FREQ * LOW_FREQ);
    for u in 0..LOW_FREQ {
        for v in 0..LOW_FREQ {
            let mut sum = 0.0;
            for y in 0..SAMPLE {
                let row_weight = basis[u][y];
                for x in 0..SAMPLE {
                    sum += pixels[y * SAMPLE + x] * row_weight * basis[v][x];
                }
            }
            coefficients.push(sum);
        }
    }

    let mut sorted = coefficients.clone();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    let median = (sorted[mid - 1] + sorted[mid]) / 2.0;

    let bits = coefficients
        .iter()
        .fold(0u64, |acc, &c| (acc << 1) | u64::from(c > median));
    format!("{bits:016x}")
}
