//! Grid data types.
//!
//! Pixel buffers are plain `image::RgbaImage`s. Everything downstream of the
//! resampler works on [`ColorCell`]s arranged in columns.

use serde::Serialize;

/// Alpha-free colour of a single grid cell.
///
/// Serializes as an `[r, g, b]` array.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "[u8; 3]")]
pub struct ColorCell {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorCell {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Drop the alpha channel of a resampled pixel
    pub fn from_rgba(pixel: &image::Rgba<u8>) -> Self {
        let [r, g, b, _] = pixel.0;
        Self { r, g, b }
    }
}

impl From<ColorCell> for [u8; 3] {
    fn from(cell: ColorCell) -> Self {
        [cell.r, cell.g, cell.b]
    }
}

impl From<[u8; 3]> for ColorCell {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

/// Grid in logical orientation, indexed `grid[x][y]`.
///
/// Every column holds the same number of cells, top to bottom.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogicalGrid {
    columns: Vec<Vec<ColorCell>>,
}

impl LogicalGrid {
    /// Build a grid from columns
    ///
    /// # Panics
    ///
    /// Panics if the columns have different lengths.
    pub fn from_columns(columns: Vec<Vec<ColorCell>>) -> Self {
        if let Some(first) = columns.first() {
            let height = first.len();
            assert!(
                columns.iter().all(|c| c.len() == height),
                "all grid columns must have {} cells",
                height
            );
        }
        Self { columns }
    }

    /// Grid with no columns
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn height(&self) -> usize {
        self.columns.first().map(Vec::len).unwrap_or(0)
    }

    pub fn columns(&self) -> &[Vec<ColorCell>] {
        &self.columns
    }

    /// Row-major copy of the grid, indexed `rows[y][x]`
    pub fn rows(&self) -> Vec<Vec<ColorCell>> {
        (0..self.height())
            .map(|y| self.columns.iter().map(|column| column[y]).collect())
            .collect()
    }
}

/// Grid in physical wiring order.
///
/// Column `x` runs top to bottom when `x` is even and bottom to top when odd.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WireSequence {
    columns: Vec<Vec<ColorCell>>,
}

impl WireSequence {
    pub(crate) fn from_columns(columns: Vec<Vec<ColorCell>>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[Vec<ColorCell>] {
        &self.columns
    }

    /// Cells in the order the strip receives them
    pub fn cells(&self) -> impl Iterator<Item = ColorCell> + '_ {
        self.columns.iter().flatten().copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }
}
