//! Serpentine column wiring.
//!
//! The LED strip snakes down the first column, up the second, down the third
//! and so on. For a 3x2 panel the strip positions are:
//!
//! ```text
//!     0  3  4
//!     1  2  5
//! ```

use super::pixel::{LogicalGrid, WireSequence};

/// Reorder a logical grid into strip order
pub fn to_wire(grid: &LogicalGrid) -> WireSequence {
    WireSequence::from_columns(snake_columns(grid.columns()))
}

/// Undo [`to_wire`]
pub fn from_wire(wire: &WireSequence) -> LogicalGrid {
    LogicalGrid::from_columns(snake_columns(wire.columns()))
}

/// Reverse every odd column. Applying it twice is the identity.
fn snake_columns<T: Clone>(columns: &[Vec<T>]) -> Vec<Vec<T>> {
    columns
        .iter()
        .enumerate()
        .map(|(x, column)| {
            if x % 2 == 0 {
                column.clone()
            } else {
                column.iter().rev().cloned().collect()
            }
        })
        .collect()
}
