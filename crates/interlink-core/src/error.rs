use thiserror::Error;

/// Top-level error type for Interlink.
///
/// Subsystem crates define their own error enums for the failure kinds callers
/// need to tell apart (extraction, speech, model calls). This type covers the
/// shared plumbing: configuration, collaborator processes, I/O.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InterlinkError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("OCR error: {0}")]
    Ocr(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for InterlinkError {
    fn from(err: toml::de::Error) -> Self {
        InterlinkError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for InterlinkError {
    fn from(err: toml::ser::Error) -> Self {
        InterlinkError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for InterlinkError {
    fn from(err: serde_json::Error) -> Self {
        InterlinkError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Interlink operations.
pub type Result<T> = std::result::Result<T, InterlinkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = InterlinkError::Config("missing field".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing field");
    }

    #[test]
    fn test_error_display_all_variants() {
        let cases: Vec<(InterlinkError, &str)> = vec![
            (
                InterlinkError::Config("bad key".to_string()),
                "Configuration error: bad key",
            ),
            (
                InterlinkError::Ocr("engine missing".to_string()),
                "OCR error: engine missing",
            ),
            (
                InterlinkError::Serialization("invalid json".to_string()),
                "Serialization error: invalid json",
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: InterlinkError = io_err.into();
        assert!(matches!(err, InterlinkError::Io(_)));
        assert!(err.to_string().starts_with("I/O error:"));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_error_from_toml_de() {
        let err: std::result::Result<toml::Value, _> = toml::from_str("invalid = [[[");
        let err: InterlinkError = err.unwrap_err().into();
        assert!(matches!(err, InterlinkError::Config(_)));
    }

    #[test]
    fn test_error_from_serde_json() {
        let err: std::result::Result<serde_json::Value, _> = serde_json::from_str("{ nope }");
        let err: InterlinkError = err.unwrap_err().into();
        assert!(matches!(err, InterlinkError::Serialization(_)));
    }

    #[test]
    fn test_missing_file_propagates_as_io() {
        fn read(path: &str) -> Result<String> {
            Ok(std::fs::read_to_string(path)?)
        }

        let err = read("/nonexistent/interlink.toml").unwrap_err();
        assert!(matches!(err, InterlinkError::Io(_)));
    }
}
