//! Grid extraction from a resampled buffer.

use super::pixel::{ColorCell, LogicalGrid};
use image::RgbaImage;

/// Read one [`ColorCell`] per pixel, column by column
pub fn extract_grid(resampled: &RgbaImage) -> LogicalGrid {
    let (width, height) = resampled.dimensions();
    if width == 0 || height == 0 {
        return LogicalGrid::empty();
    }

    let columns = (0..width)
        .map(|x| {
            (0..height)
                .map(|y| ColorCell::from_rgba(resampled.get_pixel(x, y)))
                .collect()
        })
        .collect();

    LogicalGrid::from_columns(columns)
}
