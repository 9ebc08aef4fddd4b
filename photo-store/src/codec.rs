use crate::error::PhotoStoreError;
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use std::io::Cursor;

/// Encodes a pixel buffer to JPEG bytes at the given quality
///
/// Alpha channels are flattened to RGB first; the JPEG encoder does not
/// accept them.
pub fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>, PhotoStoreError> {
    let rgb = image.to_rgb8();
    let mut buffer = Cursor::new(Vec::new());
    let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder
        .encode_image(&rgb)
        .map_err(|e| PhotoStoreError::EncodeError(format!("Failed to encode JPEG: {}", e)))?;
    Ok(buffer.into_inner())
}

/// Decodes stored image bytes back into a pixel buffer
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, PhotoStoreError> {
    image::load_from_memory(bytes)
        .map_err(|e| PhotoStoreError::DecodeError(format!("Failed to decode image: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_encode_preserves_dimensions() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(10, 10, Rgb([255, 0, 0])));
        let bytes = encode_jpeg(&img, 95).unwrap();
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.width(), 10);
        assert_eq!(decoded.height(), 10);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode(b"not an image").is_err());
    }
}
