//! Preview encoding: `DynamicImage` → PNG bytes, base64 data-URI or file.
//!
//! Presentation layers rarely accept a raw bitmap. PNG keeps rendered text
//! crisp (no JPEG ringing around glyphs), and a data-URI can be dropped
//! straight into an `<img>` tag or a JSON response.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::DynamicImage;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Encode a rendered page as PNG bytes.
pub fn to_png_bytes(img: &DynamicImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;
    Ok(buf)
}

/// Encode a rendered page as a `data:image/png;base64,…` URI.
pub fn to_data_uri(img: &DynamicImage) -> Result<String, image::ImageError> {
    let png = to_png_bytes(img)?;
    let b64 = STANDARD.encode(&png);
    debug!("Encoded preview → {} bytes base64", b64.len());
    Ok(format!("data:image/png;base64,{b64}"))
}

/// Write a rendered page to `path` as PNG, regardless of the extension.
pub fn write_png(img: &DynamicImage, path: &Path) -> Result<(), image::ImageError> {
    img.save_with_format(path, image::ImageFormat::Png)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn red_square() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255])))
    }

    #[test]
    fn png_bytes_have_signature() {
        let bytes = to_png_bytes(&red_square()).expect("encode should succeed");
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn data_uri_decodes_to_png() {
        let uri = to_data_uri(&red_square()).expect("encode should succeed");
        let b64 = uri
            .strip_prefix("data:image/png;base64,")
            .expect("data-URI prefix");
        let decoded = STANDARD.decode(b64).expect("valid base64");
        assert_eq!(&decoded[1..4], b"PNG");
    }

    #[test]
    fn write_png_creates_readable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.png");
        write_png(&red_square(), &path).expect("write should succeed");
        let back = image::open(&path).expect("readable png");
        assert_eq!((back.width(), back.height()), (10, 10));
    }
}
