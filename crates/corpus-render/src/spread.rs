// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Spread gutter confidence — a cheap column-profile heuristic that scores how
// clearly a two-page spread shows a dark gutter near its centre, and the
// calibration loop that tunes a synthetic gutter until the score lands in a
// target band.

use std::ops::Range;

use image::RgbImage;
use tracing::{debug, info, instrument, warn};

use crate::canvas::{BACKGROUND, luma};

/// Images narrower than this aspect ratio are never treated as spreads.
const MIN_SPREAD_ASPECT: f64 = 1.25;
const PREVIEW_WIDTH: u32 = 320;
/// Minimum dip below the global mean, in luma levels, that counts as a gutter.
const MIN_DARKNESS: f64 = 10.0;
/// Darkness at which the darkness term saturates.
const DARKNESS_SCALE: f64 = 35.0;

/// Breakdown of a single gutter estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GutterEstimate {
    /// Final score in `[0, 1]`.
    pub confidence: f64,
    /// Preview column of the darkest point in the central search window.
    pub min_index: usize,
    /// Inclusive preview-column extent of the dark band around `min_index`.
    pub band: (usize, usize),
    pub darkness: f64,
    pub symmetry: f64,
    pub center_distance: f64,
    pub preview_width: usize,
}

impl GutterEstimate {
    fn rejected(preview_width: usize) -> Self {
        Self {
            confidence: 0.0,
            min_index: 0,
            band: (0, 0),
            darkness: 0.0,
            symmetry: 0.0,
            center_distance: 0.0,
            preview_width,
        }
    }
}

/// Score how strongly `image` reads as a spread with a central gutter.
pub fn spread_confidence(image: &RgbImage) -> f64 {
    estimate_gutter(image).confidence
}

/// Estimate the gutter of a spread from its luma column profile.
///
/// The page is reduced to a preview at most 320 columns wide by area
/// averaging. Averaging is linear, so the preview's column means are computed
/// directly from the full-resolution column means without materialising the
/// preview rows.
pub fn estimate_gutter(image: &RgbImage) -> GutterEstimate {
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 || (w as f64 / h as f64) < MIN_SPREAD_ASPECT {
        return GutterEstimate::rejected(0);
    }

    let preview_width = PREVIEW_WIDTH.min(w) as usize;
    let columns = area_average(&luma_column_means(image), preview_width);
    let global_mean = columns.iter().sum::<f64>() / preview_width as f64;

    let search_start = (preview_width as f64 * 0.4) as usize;
    let search_end = (preview_width as f64 * 0.6) as usize;
    let mut min_index = search_start;
    let mut min_value = columns[min_index];
    for (x, &value) in columns.iter().enumerate().take(search_end).skip(search_start) {
        if value < min_value {
            min_value = value;
            min_index = x;
        }
    }

    let darkness = global_mean - min_value;
    if darkness < MIN_DARKNESS {
        return GutterEstimate::rejected(preview_width);
    }

    let threshold = min_value + darkness * 0.5;
    let mut left = min_index;
    let mut right = min_index;
    while left > 0 && columns[left] < threshold {
        left -= 1;
    }
    while right < preview_width - 1 && columns[right] < threshold {
        right += 1;
    }

    let mid = preview_width / 2;
    let center_distance = min_index.abs_diff(mid) as f64 / mid.max(1) as f64;
    let mean = |slice: &[f64]| {
        if slice.is_empty() {
            global_mean
        } else {
            slice.iter().sum::<f64>() / slice.len() as f64
        }
    };
    let left_density = mean(&columns[..mid]);
    let right_density = mean(&columns[mid..]);
    let symmetry = 1.0 - ((left_density - right_density).abs() / global_mean.max(1.0)).min(1.0);

    let confidence = ((darkness / DARKNESS_SCALE) * 0.6 + symmetry * 0.3 + (1.0 - center_distance) * 0.1)
        .clamp(0.0, 1.0);

    GutterEstimate {
        confidence,
        min_index,
        band: (left, right),
        darkness,
        symmetry,
        center_distance,
        preview_width,
    }
}

/// Mean Rec. 601 luma of every column.
fn luma_column_means(image: &RgbImage) -> Vec<f64> {
    let (w, h) = image.dimensions();
    let mut sums = vec![0.0f64; w as usize];
    for (x, _, pixel) in image.enumerate_pixels() {
        sums[x as usize] += luma(pixel);
    }
    for sum in &mut sums {
        *sum /= h as f64;
    }
    sums
}

/// Resample `values` to `target` bins, each the coverage-weighted mean of the
/// source samples it overlaps.
fn area_average(values: &[f64], target: usize) -> Vec<f64> {
    if target == values.len() {
        return values.to_vec();
    }
    let scale = values.len() as f64 / target as f64;
    (0..target)
        .map(|i| {
            let start = i as f64 * scale;
            let end = start + scale;
            let mut acc = 0.0;
            let mut j = start.floor() as usize;
            while (j as f64) < end && j < values.len() {
                let overlap = (end.min(j as f64 + 1.0) - start.max(j as f64)).max(0.0);
                acc += values[j] * overlap;
                j += 1;
            }
            acc / scale
        })
        .collect()
}

// -- Calibration ----------------------------------------------------------------

/// Parameters of a synthetic gutter calibration run.
#[derive(Debug, Clone, PartialEq)]
pub struct GutterCalibration {
    /// First gutter column (inclusive).
    pub band_start: u32,
    /// End gutter column (exclusive).
    pub band_end: u32,
    pub seed_color: u8,
    pub blend_alpha: f32,
    /// Accepted confidence range, `[start, end)`.
    pub target: Range<f64>,
    pub attempts: u32,
    pub step_up: i32,
    pub step_down: i32,
    pub color_min: u8,
    pub color_max: u8,
    /// Tone of the overlay outside the gutter.
    pub background: u8,
}

impl GutterCalibration {
    fn centred(page_width: u32, gutter_width: u32) -> (u32, u32) {
        let half = gutter_width / 2;
        (page_width.saturating_sub(half), page_width + half)
    }

    /// Strong gutter for a spread of two `page_width` pages.
    pub fn dark(page_width: u32) -> Self {
        let (band_start, band_end) = Self::centred(page_width, 220);
        Self {
            band_start,
            band_end,
            seed_color: 225,
            blend_alpha: 0.4,
            target: 0.6..0.7,
            attempts: 6,
            step_up: 2,
            step_down: 3,
            color_min: 200,
            color_max: 240,
            background: BACKGROUND,
        }
    }

    /// Faint gutter that should land in the low-confidence band.
    pub fn light(page_width: u32) -> Self {
        let (band_start, band_end) = Self::centred(page_width, 160);
        Self {
            band_start,
            band_end,
            seed_color: 232,
            blend_alpha: 0.3,
            target: 0.45..0.58,
            attempts: 5,
            step_up: 2,
            step_down: 2,
            color_min: 210,
            color_max: 240,
            background: BACKGROUND,
        }
    }

    /// Gutter width in pixels.
    pub fn width(&self) -> u32 {
        self.band_end.saturating_sub(self.band_start)
    }
}

/// Result of [`calibrate_gutter`].
#[derive(Debug, Clone)]
pub struct CalibrationOutcome {
    /// The last composite produced, accepted or not.
    pub image: RgbImage,
    /// Confidence of `image`.
    pub confidence: f64,
    /// Attempts actually made.
    pub attempts: u32,
    /// Whether the confidence landed inside the target band.
    pub converged: bool,
    /// Gutter tone used by the final attempt.
    pub gutter_color: u8,
}

/// Repeatedly blend a gutter overlay onto `image` until the spread confidence
/// falls inside `calibration.target` or the attempt budget runs out.
///
/// Every attempt composites onto the previous attempt's result. Missing the
/// band is not an error: the last composite is returned with
/// `converged == false`.
#[instrument(skip(image, calibration), fields(width = image.width(), height = image.height()))]
pub fn calibrate_gutter(mut image: RgbImage, calibration: &GutterCalibration) -> CalibrationOutcome {
    let mut color = calibration.seed_color;
    let mut confidence = 0.0;
    let mut attempts = 0;
    let mut converged = false;
    let mut final_color = color;

    while attempts < calibration.attempts {
        attempts += 1;
        final_color = color;
        blend_overlay(&mut image, calibration, color);
        confidence = spread_confidence(&image);
        debug!(attempt = attempts, color, confidence, "Gutter calibration attempt");

        if calibration.target.contains(&confidence) {
            converged = true;
            break;
        }
        let step = if confidence < calibration.target.start {
            calibration.step_up
        } else {
            -calibration.step_down
        };
        color = (color as i32 + step).clamp(calibration.color_min as i32, calibration.color_max as i32) as u8;
    }

    if converged {
        info!(attempts, confidence, color = final_color, "Gutter calibrated");
    } else {
        warn!(
            attempts,
            confidence,
            target = ?calibration.target,
            "Gutter calibration missed its target band; keeping last composite"
        );
    }

    CalibrationOutcome {
        image,
        confidence,
        attempts,
        converged,
        gutter_color: final_color,
    }
}

/// `image + alpha * (overlay - image)`, truncated, where the overlay is
/// `background` everywhere except the gutter columns.
fn blend_overlay(image: &mut RgbImage, calibration: &GutterCalibration, gutter_color: u8) {
    let alpha = calibration.blend_alpha;
    let band = calibration.band_start..calibration.band_end;
    for (x, _, pixel) in image.enumerate_pixels_mut() {
        let target = if band.contains(&x) { gutter_color } else { calibration.background } as f32;
        for channel in pixel.0.iter_mut() {
            let value = *channel as f32;
            *channel = (value + alpha * (target - value)).clamp(0.0, 255.0) as u8;
        }
    }
}
