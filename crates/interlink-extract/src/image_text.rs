//! Image decoding and OCR.

use std::io::Cursor;

use image::ImageFormat;
use interlink_ocr::OcrService;

use crate::error::ExtractionError;

/// Decode any supported image, normalize to PNG and run OCR on it.
pub async fn extract_image_text<O: OcrService>(
    ocr: &O,
    bytes: &[u8],
) -> Result<String, ExtractionError> {
    let png = normalize_to_png(bytes)?;
    let text = ocr
        .extract_text(&png)
        .await
        .map_err(|e| ExtractionError::Image(e.to_string()))?;
    tracing::debug!(input_bytes = bytes.len(), chars = text.len(), "Image OCR complete");
    Ok(text)
}

/// Re-encode image bytes as PNG. Fails when the bytes are not a decodable image.
pub fn normalize_to_png(bytes: &[u8]) -> Result<Vec<u8>, ExtractionError> {
    let decoded =
        image::load_from_memory(bytes).map_err(|e| ExtractionError::Image(e.to_string()))?;
    let mut out = Cursor::new(Vec::new());
    decoded
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| ExtractionError::Image(e.to_string()))?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use interlink_ocr::MockOcrService;

    fn tiny_image(format: ImageFormat) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(4, 4, image::Rgb([255, 255, 255]));
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut out, format)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn test_normalize_png_signature() {
        let png = normalize_to_png(&tiny_image(ImageFormat::Bmp)).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[tokio::test]
    async fn test_extract_runs_ocr() {
        let ocr = MockOcrService::with_text("E = mc^2");
        let text = extract_image_text(&ocr, &tiny_image(ImageFormat::Png))
            .await
            .unwrap();
        assert_eq!(text, "E = mc^2");
    }

    #[tokio::test]
    async fn test_extract_undecodable_image() {
        let ocr = MockOcrService::new();
        let err = extract_image_text(&ocr, b"not an image").await.unwrap_err();
        assert!(matches!(err, ExtractionError::Image(_)));
        assert!(err.to_string().starts_with("Error extracting image text: "));
    }
}
