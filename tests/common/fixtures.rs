//! Test images and encoders.

use base64::Engine;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use std::io::Cursor;
use std::net::TcpListener;

/// Encode an RGBA buffer as PNG bytes
pub fn png(img: RgbaImage) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut out, ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

/// Column 0: red over green, column 1: blue over white
pub fn two_by_two() -> RgbaImage {
    let mut img = RgbaImage::new(2, 2);
    img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
    img.put_pixel(0, 1, Rgba([0, 255, 0, 255]));
    img.put_pixel(1, 0, Rgba([0, 0, 255, 255]));
    img.put_pixel(1, 1, Rgba([255, 255, 255, 255]));
    img
}

/// PNG data URI as produced by `canvas.toDataURL()`
pub fn data_uri(bytes: &[u8]) -> String {
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// Percent-encode a form field value
pub fn form_encode(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}

/// Base URL of a local port nothing is listening on
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}
