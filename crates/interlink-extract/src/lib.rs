//! Interlink extract crate - classification and text extraction for uploads.
//!
//! Each uploaded artifact is classified by name, then routed to the matching
//! extractor. Extractor failures are scoped to the artifact that caused them.

pub mod classifier;
pub mod document;
pub mod error;
pub mod image_text;
pub mod structured;

use interlink_core::types::{ContentPart, UploadedArtifact, MAX_UPLOAD_BYTES};
use interlink_ocr::OcrService;

pub use classifier::{detect_file_type, preview_kind};
pub use error::ExtractionError;

// =============================================================================
// Routing
// =============================================================================

/// Which extractor handles a content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractorKind {
    Pdf,
    Docx,
    Image,
    Structured,
}

impl ExtractorKind {
    /// `None` for types with no extractor (video, audio, octet-stream, ...).
    pub fn for_mime(mime_type: &str) -> Option<Self> {
        match mime_type {
            "application/pdf" => Some(Self::Pdf),
            classifier::DOCX_MIME | "application/msword" => Some(Self::Docx),
            m if m.starts_with("image/") => Some(Self::Image),
            "text/plain" | "text/csv" | "application/json" | "application/xml" => {
                Some(Self::Structured)
            }
            _ => None,
        }
    }
}

/// Outcome of running an extractor on one artifact.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub source_name: String,
    pub mime_type: String,
    pub outcome: Result<String, ExtractionError>,
}

impl Extraction {
    /// Extracted text, or the error message standing in for it.
    pub fn text(&self) -> String {
        match &self.outcome {
            Ok(text) => text.clone(),
            Err(e) => e.to_string(),
        }
    }

    /// Convert into a prompt part. Successful but blank extractions yield `None`.
    pub fn into_part(self) -> Option<ContentPart> {
        let text = match self.outcome {
            Ok(text) if text.trim().is_empty() => return None,
            Ok(text) => text,
            Err(e) => e.to_string(),
        };
        Some(ContentPart::Extracted {
            mime_type: self.mime_type,
            text,
            source_name: self.source_name,
        })
    }
}

// =============================================================================
// Extractor
// =============================================================================

/// Routes artifacts to the right extractor.
pub struct ContentExtractor<O: OcrService> {
    ocr: O,
    max_bytes: u64,
}

impl<O: OcrService> ContentExtractor<O> {
    pub fn new(ocr: O) -> Self {
        Self {
            ocr,
            max_bytes: MAX_UPLOAD_BYTES,
        }
    }

    /// Override the size ceiling. Larger artifacts are refused without being read.
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    #[cfg(test)]
    pub(crate) fn ocr(&self) -> &O {
        &self.ocr
    }

    /// Extract one artifact. `None` when its type has no extractor.
    pub async fn extract(&self, artifact: &UploadedArtifact) -> Option<Extraction> {
        let mime_type = detect_file_type(&artifact.name);
        let kind = ExtractorKind::for_mime(&mime_type)?;

        let outcome = if artifact.exceeds(self.max_bytes) {
            Err(ExtractionError::TooLarge {
                size: artifact.byte_size,
                limit: self.max_bytes,
            })
        } else {
            let bytes = artifact.raw_bytes.as_slice();
            match kind {
                ExtractorKind::Pdf => document::extract_pdf_text(bytes),
                ExtractorKind::Docx => document::extract_docx_text(bytes),
                ExtractorKind::Image => image_text::extract_image_text(&self.ocr, bytes).await,
                ExtractorKind::Structured => structured::process_structured_data(bytes, &mime_type),
            }
        };

        match &outcome {
            Ok(text) => tracing::info!(
                file = %artifact.name,
                mime = %mime_type,
                chars = text.len(),
                "Content extracted"
            ),
            Err(e) => tracing::warn!(file = %artifact.name, mime = %mime_type, error = %e, "Extraction failed"),
        }

        Some(Extraction {
            source_name: artifact.name.clone(),
            mime_type,
            outcome,
        })
    }

    /// Extract every artifact in order. One failure never affects the others.
    pub async fn extract_all(&self, artifacts: &[UploadedArtifact]) -> Vec<Extraction> {
        let mut results = Vec::with_capacity(artifacts.len());
        for artifact in artifacts {
            if let Some(extraction) = self.extract(artifact).await {
                results.push(extraction);
            }
        }
        results
    }
}
