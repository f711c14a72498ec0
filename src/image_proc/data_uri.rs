//! Data-URI payload extraction.
//!
//! Browsers hand us `data:image/png;base64,<payload>`. Form decoding turns any
//! `+` in the payload into a space, so spaces are mapped back before decoding.

use base64::Engine;
use bytes::Bytes;
use thiserror::Error;

/// Data-URI errors
#[derive(Error, Debug)]
pub enum DataUriError {
    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Data URI carries no payload")]
    EmptyPayload,
}

/// Decode the base64 payload of a data URI into raw image bytes
///
/// Everything up to and including the first `,` is dropped. A string without
/// a comma is treated as a bare base64 payload.
pub fn decode_data_uri(data_uri: &str) -> Result<Bytes, DataUriError> {
    let payload = match data_uri.find(',') {
        Some(idx) => &data_uri[idx + 1..],
        None => data_uri,
    };

    let payload: String = payload
        .chars()
        .filter(|c| !matches!(c, '\r' | '\n' | '\t'))
        .map(|c| if c == ' ' { '+' } else { c })
        .collect();

    if payload.is_empty() {
        return Err(DataUriError::EmptyPayload);
    }

    let bytes = base64::engine::general_purpose::STANDARD.decode(payload.as_bytes())?;
    tracing::debug!("Decoded data URI payload: {} bytes", bytes.len());

    Ok(Bytes::from(bytes))
}
