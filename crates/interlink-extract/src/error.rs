use thiserror::Error;

/// Failure of a single extractor on a single artifact.
///
/// The display text is what the model sees in place of the extracted content.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Error extracting PDF text: {0}")]
    Pdf(String),

    #[error("Error extracting DOCX text: {0}")]
    Docx(String),

    #[error("Error extracting image text: {0}")]
    Image(String),

    #[error("Error processing structured data: {0}")]
    StructuredData(String),

    #[error("File exceeds upload limit: {size} bytes (limit: {limit} bytes)")]
    TooLarge { size: u64, limit: u64 },
}
