//! Area-averaging resampler.
//!
//! Every target pixel averages the source pixels it covers, weighted by the
//! covered area. Colour channels are additionally weighted by source alpha, so
//! transparent pixels contribute nothing to the colour and the result is never
//! composited onto a background. Alpha itself is the plain area average.
//!
//! Channel values are truncated to 8 bits, not rounded.

use crate::config::GridConfig;
use image::{Rgba, RgbaImage};

/// Headroom added before truncation so exact averages survive float error
const TRUNCATION_EPSILON: f64 = 1e-6;

/// Source pixels contributing to one target index along an axis
type Span = Vec<(u32, f64)>;

/// Resample `src` to exactly `grid.width x grid.height` pixels
///
/// A zero-sized grid or source yields an empty buffer.
pub fn resample(src: &RgbaImage, grid: GridConfig) -> RgbaImage {
    let (src_width, src_height) = src.dimensions();

    if grid.is_empty() || src_width == 0 || src_height == 0 {
        return RgbaImage::new(0, 0);
    }

    tracing::debug!(
        "Resampling {}x{} -> {}x{}",
        src_width,
        src_height,
        grid.width,
        grid.height
    );

    let x_spans = axis_spans(src_width, grid.width);
    let y_spans = axis_spans(src_height, grid.height);

    RgbaImage::from_fn(grid.width, grid.height, |x, y| {
        average(src, &x_spans[x as usize], &y_spans[y as usize])
    })
}

/// Coverage of source indices for each of `dst_len` target indices
fn axis_spans(src_len: u32, dst_len: u32) -> Vec<Span> {
    let scale = src_len as f64 / dst_len as f64;

    (0..dst_len)
        .map(|d| {
            let start = d as f64 * scale;
            let end = (d + 1) as f64 * scale;

            let first = start.floor() as u32;
            let last = (end.ceil() as u32).min(src_len);

            (first..last)
                .filter_map(|s| {
                    let lo = start.max(s as f64);
                    let hi = end.min((s + 1) as f64);
                    let weight = hi - lo;
                    (weight > 0.0).then_some((s, weight))
                })
                .collect()
        })
        .collect()
}

/// Alpha-weighted area average over the given spans
fn average(src: &RgbaImage, x_span: &Span, y_span: &Span) -> Rgba<u8> {
    let mut color = [0.0f64; 3];
    let mut alpha_weight = 0.0f64;
    let mut alpha = 0.0f64;
    let mut area = 0.0f64;

    for &(sy, wy) in y_span {
        for &(sx, wx) in x_span {
            let [r, g, b, a] = src.get_pixel(sx, sy).0;
            let w = wx * wy;
            let wa = w * a as f64;

            color[0] += r as f64 * wa;
            color[1] += g as f64 * wa;
            color[2] += b as f64 * wa;
            alpha_weight += wa;
            alpha += a as f64 * w;
            area += w;
        }
    }

    // Fully transparent coverage leaves the colour black
    if alpha_weight > 0.0 {
        for c in &mut color {
            *c /= alpha_weight;
        }
    }
    if area > 0.0 {
        alpha /= area;
    }

    Rgba([
        truncate(color[0]),
        truncate(color[1]),
        truncate(color[2]),
        truncate(alpha),
    ])
}

#[inline]
fn truncate(value: f64) -> u8 {
    (value + TRUNCATION_EPSILON).clamp(0.0, 255.0) as u8
}
