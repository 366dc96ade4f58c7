//! OCR via the `tesseract` command-line engine.
//!
//! The image is streamed to the process on stdin and the recognized text is
//! read back from stdout (`tesseract stdin stdout -l <lang>`).

use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use interlink_core::config::OcrConfig;
use interlink_core::error::InterlinkError;

use crate::OcrService;

/// Configuration for the tesseract OCR service.
#[derive(Debug, Clone)]
pub struct TesseractConfig {
    /// Executable name or path.
    pub executable: String,
    /// Tesseract language pack (e.g., "eng").
    pub language: String,
}

impl Default for TesseractConfig {
    fn default() -> Self {
        Self {
            executable: "tesseract".to_string(),
            language: "eng".to_string(),
        }
    }
}

impl From<&OcrConfig> for TesseractConfig {
    fn from(config: &OcrConfig) -> Self {
        Self {
            executable: config.tesseract_path.clone(),
            language: config.language.clone(),
        }
    }
}

/// OCR service backed by a `tesseract` subprocess.
pub struct TesseractOcrService {
    config: TesseractConfig,
}

impl TesseractOcrService {
    pub fn new(config: TesseractConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TesseractConfig {
        &self.config
    }
}

impl OcrService for TesseractOcrService {
    async fn extract_text(&self, image_data: &[u8]) -> Result<String, InterlinkError> {
        if image_data.is_empty() {
            return Err(InterlinkError::Ocr("Empty image data".into()));
        }

        let mut child = Command::new(&self.config.executable)
            .args(["stdin", "stdout", "-l", &self.config.language])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                InterlinkError::Ocr(format!(
                    "Failed to start {}: {}",
                    self.config.executable, e
                ))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(image_data)
                .await
                .map_err(|e| InterlinkError::Ocr(format!("Failed to send image: {}", e)))?;
            // Dropping stdin closes the pipe so tesseract sees EOF.
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| InterlinkError::Ocr(format!("OCR process failed: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(InterlinkError::Ocr(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!(
            bytes = image_data.len(),
            text_len = text.len(),
            "OCR complete"
        );
        Ok(text)
    }
}
