//! Interlink OCR crate - OCR engine trait and implementations.
//!
//! Provides the OcrService trait for text extraction from images,
//! a MockOcrService for testing, and a TesseractOcrService that pipes
//! images through the `tesseract` command-line engine.

pub mod tesseract_ocr;

use std::sync::atomic::{AtomicUsize, Ordering};

use interlink_core::error::InterlinkError;

pub use tesseract_ocr::{TesseractConfig, TesseractOcrService};

/// Service for extracting text from images.
///
/// Implementations wrap an external recognition engine behind a uniform
/// async interface. An image without readable text yields an empty string,
/// not an error.
pub trait OcrService: Send + Sync {
    /// Extract text from encoded image data (PNG).
    fn extract_text(
        &self,
        image_data: &[u8],
    ) -> impl std::future::Future<Output = Result<String, InterlinkError>> + Send;
}

/// Scripted OCR engine for tests.
///
/// Answers every image with the same text and counts how many images it was
/// asked to read.
#[derive(Debug)]
pub struct MockOcrService {
    text: String,
    calls: AtomicUsize,
}

impl MockOcrService {
    /// Reads `Mock OCR extracted text` from every image.
    pub fn new() -> Self {
        Self::with_text("Mock OCR extracted text")
    }

    pub fn with_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Finds no text in any image.
    pub fn empty() -> Self {
        Self::with_text("")
    }

    /// Number of images passed to `extract_text` so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockOcrService {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrService for MockOcrService {
    async fn extract_text(&self, image_data: &[u8]) -> Result<String, InterlinkError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if image_data.is_empty() {
            return Err(InterlinkError::Ocr("no image data".into()));
        }
        tracing::debug!(bytes = image_data.len(), "Scripted OCR text returned");
        Ok(self.text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_ocr_default() {
        let service = MockOcrService::new();
        let text = service.extract_text(&[1, 2, 3]).await.unwrap();
        assert!(text.contains("Mock OCR"));
        assert_eq!(service.calls(), 1);
    }

    #[tokio::test]
    async fn test_mock_ocr_custom_text() {
        let service = MockOcrService::with_text("Custom extracted text");
        let text = service.extract_text(&[1, 2, 3]).await.unwrap();
        assert_eq!(text, "Custom extracted text");
    }

    #[tokio::test]
    async fn test_mock_ocr_empty_response_is_not_error() {
        let service = MockOcrService::empty();
        let text = service.extract_text(&[1, 2, 3]).await.unwrap();
        assert!(text.is_empty());
    }

    #[tokio::test]
    async fn test_mock_ocr_empty_input() {
        let service = MockOcrService::new();
        let result = service.extract_text(&[]).await;
        assert!(matches!(result, Err(InterlinkError::Ocr(_))));
    }
}
