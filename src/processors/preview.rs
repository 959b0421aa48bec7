//! Base64 preview encoding for uploaded images.
//!
//! This is a display-only side channel: the original bytes are handed back
//! to the caller as a `data:` URI so the web layer can render the uploaded
//! image without persisting it. It has no coupling with the numeric
//! pipeline.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::ImageFormat;

/// Encodes raw image bytes as a `data:<mime>;base64,<payload>` URI.
///
/// The MIME type is derived from the sniffed image format; undetermined or
/// unsupported formats fall back to `image/jpeg`. The payload is the input
/// byte-for-byte, so even bytes that fail to decode still round-trip.
pub fn encode_preview(bytes: &[u8]) -> String {
    let mime = match image::guess_format(bytes) {
        Ok(ImageFormat::Png) => "image/png",
        Ok(ImageFormat::Gif) => "image/gif",
        Ok(ImageFormat::Bmp) => "image/bmp",
        _ => "image/jpeg",
    };

    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use image::{DynamicImage, Rgb, RgbImage};
    use std::io::Cursor;

    fn encoded_bytes(format: ImageFormat) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([1, 2, 3])));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), format).unwrap();
        bytes
    }

    #[test]
    fn test_mime_follows_sniffed_format() {
        for (format, mime) in [
            (ImageFormat::Png, "image/png"),
            (ImageFormat::Jpeg, "image/jpeg"),
            (ImageFormat::Bmp, "image/bmp"),
        ] {
            let bytes = encoded_bytes(format);
            let preview = encode_preview(&bytes);
            assert!(
                preview.starts_with(&format!("data:{};base64,", mime)),
                "format {:?} produced {}",
                format,
                &preview[..40]
            );
        }
    }

    #[test]
    fn test_unknown_bytes_default_to_jpeg() {
        let preview = encode_preview(b"garbage");
        assert!(preview.starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_payload_round_trips() {
        let bytes = encoded_bytes(ImageFormat::Png);
        let preview = encode_preview(&bytes);
        let payload = preview.split_once("base64,").unwrap().1;
        assert_eq!(STANDARD.decode(payload).unwrap(), bytes);
    }
}
