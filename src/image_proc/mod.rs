//! Image processing module.
//!
//! Turns an uploaded drawing into an LED grid and forwards it to the display
//! controller.

pub mod data_uri;
pub mod encode;
pub mod grid;
pub mod pixel;
pub mod resample;
pub mod source;
pub mod transport;
pub mod wiring;

pub use data_uri::{decode_data_uri, DataUriError};
pub use encode::{hex_columns, wire_payload, GridOutput};
pub use grid::extract_grid;
pub use pixel::{ColorCell, LogicalGrid, WireSequence};
pub use resample::resample;
pub use source::{decode_image, SourceError, SourceLimits};
pub use transport::{ApiCall, Transport};

use crate::config::{Config, GridConfig, OutputMode};
use serde::Serialize;
use thiserror::Error;

/// Image processing errors
#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("Invalid data URI: {0}")]
    DataUri(#[from] DataUriError),

    #[error("{0}")]
    Source(#[from] SourceError),
}

impl ProcessingError {
    /// True when the image was rejected for its size rather than its content
    pub fn is_too_large(&self) -> bool {
        matches!(self, ProcessingError::Source(SourceError::TooLarge(_)))
    }
}

/// Grid computed from one image, before any forwarding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedGrid {
    /// Logical orientation, `grid[x][y]`
    pub logical: LogicalGrid,
    /// Strip order
    pub wire: WireSequence,
}

impl RenderedGrid {
    fn empty() -> Self {
        Self {
            logical: LogicalGrid::empty(),
            wire: WireSequence::default(),
        }
    }
}

/// Response body of the grid endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridResponse {
    pub grid: GridOutput,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_call: Option<ApiCall>,
}

impl GridResponse {
    /// `{"grid": []}`
    pub fn empty() -> Self {
        Self {
            grid: GridOutput::empty(),
            api_call: None,
        }
    }
}

/// Image processor that handles the full pipeline
///
/// Holds only immutable settings, so one instance serves concurrent requests
/// without sharing any per-request buffers.
#[derive(Debug, Clone)]
pub struct GridProcessor {
    grid: GridConfig,
    output_mode: OutputMode,
    limits: SourceLimits,
    transport: Transport,
}

impl GridProcessor {
    /// Create a new processor from configuration
    pub fn new(config: &Config) -> Self {
        Self {
            grid: config.grid(),
            output_mode: config.output_mode,
            limits: SourceLimits {
                max_dimension: config.max_image_dimension,
            },
            transport: Transport::new(config.endpoint()),
        }
    }

    /// Process an uploaded data URI and forward the result
    ///
    /// Full pipeline:
    /// 1. Decode the data URI and the image inside it
    /// 2. Resample to the grid size
    /// 3. Extract cells and reorder them into strip order
    /// 4. Encode the response grid
    /// 5. Send the strip payload to the controller, if one is configured
    ///
    /// A blank data URI or a zero-sized grid yields an empty grid and no
    /// controller call, whatever the payload holds.
    pub async fn process(
        &self,
        image_data_uri: &str,
        user_agent: Option<&str>,
    ) -> Result<GridResponse, ProcessingError> {
        if image_data_uri.trim().is_empty() {
            tracing::debug!("No image supplied, returning empty grid");
            return Ok(GridResponse::empty());
        }

        if self.grid.is_empty() {
            tracing::debug!(
                "Grid is {}x{}, returning empty grid",
                self.grid.width,
                self.grid.height
            );
            return Ok(GridResponse::empty());
        }

        let bytes = decode_data_uri(image_data_uri)?;
        let rendered = self.render(&bytes)?;

        let grid = match self.output_mode {
            OutputMode::Direct => GridOutput::direct(&rendered.logical),
            OutputMode::SerpentineHex => GridOutput::serpentine(&rendered.wire),
        };

        if grid.is_empty() {
            return Ok(GridResponse::empty());
        }

        let api_call = self
            .transport
            .send(&wire_payload(&rendered.wire), user_agent)
            .await;

        Ok(GridResponse {
            grid,
            api_call: Some(api_call),
        })
    }

    /// Decode image bytes and compute both grid orientations
    ///
    /// A zero-sized grid returns without decoding anything.
    pub fn render(&self, image_bytes: &[u8]) -> Result<RenderedGrid, ProcessingError> {
        if self.grid.is_empty() {
            tracing::debug!(
                "Grid is {}x{}, nothing to render",
                self.grid.width,
                self.grid.height
            );
            return Ok(RenderedGrid::empty());
        }

        let img = decode_image(image_bytes, &self.limits).inspect_err(|e| {
            tracing::warn!("Rejecting upload: {}", e);
        })?;

        let resampled = resample(&img, self.grid);
        let logical = extract_grid(&resampled);
        let wire = wiring::to_wire(&logical);

        tracing::debug!(
            "Rendered {}x{} grid ({} cells)",
            logical.width(),
            logical.height(),
            wire.len()
        );

        Ok(RenderedGrid { logical, wire })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    /// Column 0: red over green, column 1: blue over white
    fn two_by_two_png() -> Vec<u8> {
        let mut img = RgbaImage::new(2, 2);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        img.put_pixel(0, 1, Rgba([0, 255, 0, 255]));
        img.put_pixel(1, 0, Rgba([0, 0, 255, 255]));
        img.put_pixel(1, 1, Rgba([255, 255, 255, 255]));

        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    fn data_uri(bytes: &[u8]) -> String {
        format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(bytes)
        )
    }

    fn processor(mode: OutputMode, width: u32, height: u32) -> GridProcessor {
        GridProcessor::new(&Config {
            grid_width: width,
            grid_height: height,
            output_mode: mode,
            ..Config::default()
        })
    }

    #[tokio::test]
    async fn test_serpentine_response() {
        let response = processor(OutputMode::SerpentineHex, 2, 2)
            .process(&data_uri(&two_by_two_png()), None)
            .await
            .unwrap();

        assert_eq!(
            response.grid,
            GridOutput::Hex(vec![
                "#ff0000,#00ff00".to_string(),
                "#ffffff,#0000ff".to_string()
            ])
        );
        assert_eq!(response.api_call, Some(ApiCall::absent()));
    }

    #[tokio::test]
    async fn test_direct_response() {
        let response = processor(OutputMode::Direct, 2, 2)
            .process(&data_uri(&two_by_two_png()), None)
            .await
            .unwrap();

        assert_eq!(
            response.grid,
            GridOutput::Triplets(vec![
                vec![ColorCell::new(255, 0, 0), ColorCell::new(0, 0, 255)],
                vec![ColorCell::new(0, 255, 0), ColorCell::new(255, 255, 255)],
            ])
        );
    }

    #[tokio::test]
    async fn test_empty_input() {
        let response = processor(OutputMode::SerpentineHex, 2, 2)
            .process("", None)
            .await
            .unwrap();
        assert_eq!(response, GridResponse::empty());
        assert_eq!(serde_json::to_string(&response).unwrap(), r#"{"grid":[]}"#);
    }

    #[tokio::test]
    async fn test_zero_grid_skips_decoding() {
        // Not an image, but a zero-sized grid never looks at the bytes
        let response = processor(OutputMode::SerpentineHex, 0, 5)
            .process(&data_uri(b"not an image"), None)
            .await
            .unwrap();
        assert_eq!(response, GridResponse::empty());
    }

    #[tokio::test]
    async fn test_zero_grid_ignores_bad_base64() {
        for (width, height) in [(0, 4), (4, 0), (0, 0)] {
            let response = processor(OutputMode::Direct, width, height)
                .process("data:image/png;base64,%%%", None)
                .await
                .unwrap();
            assert_eq!(response, GridResponse::empty());
        }
    }

    #[tokio::test]
    async fn test_undecodable_image_fails() {
        let result = processor(OutputMode::SerpentineHex, 2, 2)
            .process(&data_uri(b"not an image"), None)
            .await;
        assert!(matches!(result, Err(ProcessingError::Source(SourceError::Decode(_)))));
    }

    #[tokio::test]
    async fn test_bad_base64_fails() {
        let result = processor(OutputMode::SerpentineHex, 2, 2)
            .process("data:image/png;base64,%%%", None)
            .await;
        assert!(matches!(result, Err(ProcessingError::DataUri(_))));
    }

    #[test]
    fn test_render_dimensions() {
        let rendered = processor(OutputMode::SerpentineHex, 5, 3)
            .render(&two_by_two_png())
            .unwrap();

        assert_eq!(rendered.logical.width(), 5);
        assert_eq!(rendered.logical.height(), 3);
        assert!(rendered.logical.columns().iter().all(|c| c.len() == 3));
        assert_eq!(rendered.wire.len(), 15);
        assert_eq!(wiring::from_wire(&rendered.wire), rendered.logical);
    }

    #[test]
    fn test_too_large_is_flagged() {
        let img = RgbaImage::from_pixel(40, 1, Rgba([0, 0, 0, 255]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();

        let processor = GridProcessor::new(&Config {
            max_image_dimension: 32,
            ..Config::default()
        });
        let err = processor.render(&out.into_inner()).unwrap_err();
        assert!(err.is_too_large());
    }
}
