//! Grid encodings.
//!
//! Two formats leave the pipeline:
//! - hex: every cell as `#rrggbb`, cells of a column joined with `,`
//! - triplets: row-major `[[r, g, b], ...]` arrays, produced by serde
//!
//! The strip payload is the hex columns of the wire sequence joined with `,`.

use super::pixel::{ColorCell, LogicalGrid, WireSequence};
use serde::Serialize;
use thiserror::Error;

/// Hex cell parse errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum HexError {
    #[error("Hex colour must look like #rrggbb, got '{0}'")]
    Malformed(String),

    #[error("Invalid hex digits in '{0}'")]
    Digits(String),
}

impl ColorCell {
    /// `#rrggbb`, lowercase, two digits per channel
    pub fn to_hex(&self) -> String {
        format!("#{}", hex::encode([self.r, self.g, self.b]))
    }

    /// Parse `#rrggbb` (either case, `#` optional)
    pub fn from_hex(s: &str) -> Result<Self, HexError> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 {
            return Err(HexError::Malformed(s.to_string()));
        }

        let mut rgb = [0u8; 3];
        hex::decode_to_slice(digits, &mut rgb).map_err(|_| HexError::Digits(s.to_string()))?;
        Ok(ColorCell::from(rgb))
    }
}

/// One comma-joined hex string per column
pub fn hex_columns(columns: &[Vec<ColorCell>]) -> Vec<String> {
    columns
        .iter()
        .map(|column| {
            column
                .iter()
                .map(ColorCell::to_hex)
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect()
}

/// Flat string sent to the display controller
pub fn wire_payload(wire: &WireSequence) -> String {
    wire.cells()
        .map(|cell| cell.to_hex())
        .collect::<Vec<_>>()
        .join(",")
}

/// Grid as it appears under `grid` in the response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum GridOutput {
    /// Column strings in wiring order
    Hex(Vec<String>),
    /// Row-major colour triplets
    Triplets(Vec<Vec<ColorCell>>),
}

impl GridOutput {
    pub fn empty() -> Self {
        GridOutput::Hex(Vec::new())
    }

    pub fn serpentine(wire: &WireSequence) -> Self {
        GridOutput::Hex(hex_columns(wire.columns()))
    }

    pub fn direct(grid: &LogicalGrid) -> Self {
        GridOutput::Triplets(grid.rows())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            GridOutput::Hex(columns) => columns.is_empty(),
            GridOutput::Triplets(rows) => rows.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_proc::wiring::to_wire;
    use pretty_assertions::assert_eq;

    fn two_by_two() -> LogicalGrid {
        LogicalGrid::from_columns(vec![
            vec![ColorCell::new(255, 0, 0), ColorCell::new(0, 255, 0)],
            vec![ColorCell::new(0, 0, 255), ColorCell::new(255, 255, 255)],
        ])
    }

    #[test]
    fn test_hex_is_zero_padded() {
        assert_eq!(ColorCell::new(5, 0, 171).to_hex(), "#0500ab");
        assert_eq!(ColorCell::default().to_hex(), "#000000");
    }

    #[test]
    fn test_hex_parses_back() {
        let cell = ColorCell::new(5, 128, 255);
        assert_eq!(ColorCell::from_hex(&cell.to_hex()), Ok(cell));
        assert_eq!(ColorCell::from_hex("0580FF"), Ok(cell));
    }

    #[test]
    fn test_hex_rejects_garbage() {
        assert!(matches!(ColorCell::from_hex("#fff"), Err(HexError::Malformed(_))));
        assert!(matches!(ColorCell::from_hex("#gg0000"), Err(HexError::Digits(_))));
    }

    #[test]
    fn test_logical_hex_columns() {
        let grid = two_by_two();
        assert_eq!(
            hex_columns(grid.columns()),
            vec!["#ff0000,#00ff00", "#0000ff,#ffffff"]
        );
    }

    #[test]
    fn test_serpentine_payload() {
        let wire = to_wire(&two_by_two());
        assert_eq!(
            GridOutput::serpentine(&wire),
            GridOutput::Hex(vec![
                "#ff0000,#00ff00".to_string(),
                "#ffffff,#0000ff".to_string()
            ])
        );
        assert_eq!(wire_payload(&wire), "#ff0000,#00ff00,#ffffff,#0000ff");
    }

    #[test]
    fn test_direct_triplets_json() {
        let json = serde_json::to_string(&GridOutput::direct(&two_by_two())).unwrap();
        assert_eq!(json, "[[[255,0,0],[0,0,255]],[[0,255,0],[255,255,255]]]");
    }

    #[test]
    fn test_empty_output_json() {
        let output = GridOutput::empty();
        assert!(output.is_empty());
        assert_eq!(serde_json::to_string(&output).unwrap(), "[]");
        assert_eq!(wire_payload(&WireSequence::default()), "");
    }
}
