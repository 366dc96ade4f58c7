//! Input assembly: uploads, camera and prompt into ordered content parts.

use interlink_core::config::UploadConfig;
use interlink_core::types::{CameraCapture, ContentPart, UploadedArtifact};
use interlink_extract::{detect_file_type, ContentExtractor};
use interlink_ocr::OcrService;

use crate::commands::CommandTemplate;
use crate::error::ChatError;

// =============================================================================
// Upload filtering
// =============================================================================

/// Outcome of filtering a batch of uploads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReport {
    pub accepted: Vec<String>,
    pub oversized: Vec<String>,
    pub unsupported: Vec<String>,
    /// Size cap applied, in bytes.
    pub limit_bytes: u64,
}

impl UploadReport {
    /// `"Files exceeding 20MB limit: a, b"`, when anything was too large.
    pub fn oversized_warning(&self) -> Option<String> {
        if self.oversized.is_empty() {
            return None;
        }
        Some(format!(
            "Files exceeding {}MB limit: {}",
            self.limit_bytes / (1024 * 1024),
            self.oversized.join(", ")
        ))
    }

    pub fn unsupported_warning(&self) -> Option<String> {
        if self.unsupported.is_empty() {
            return None;
        }
        Some(format!(
            "Unsupported file type: {}",
            self.unsupported.join(", ")
        ))
    }

    pub fn success_message(&self) -> Option<String> {
        if self.accepted.is_empty() {
            return None;
        }
        Some(format!(
            "{} file(s) uploaded successfully",
            self.accepted.len()
        ))
    }
}

/// Split uploads into the accepted set and a report of what was dropped.
///
/// Oversized artifacts are dropped before anything reads their content.
pub fn partition_uploads(
    artifacts: Vec<UploadedArtifact>,
    config: &UploadConfig,
) -> (Vec<UploadedArtifact>, UploadReport) {
    let mut report = UploadReport {
        limit_bytes: config.max_bytes,
        ..UploadReport::default()
    };
    let mut accepted = Vec::with_capacity(artifacts.len());

    for artifact in artifacts {
        if artifact.exceeds(config.max_bytes) {
            tracing::warn!(file = %artifact.name, size = artifact.byte_size, limit = config.max_bytes, "Upload exceeds size limit");
            report.oversized.push(artifact.name);
        } else if !config.allows(&artifact.declared_extension) {
            tracing::warn!(file = %artifact.name, ext = %artifact.declared_extension, "Upload type not allowed");
            report.unsupported.push(artifact.name);
        } else {
            report.accepted.push(artifact.name.clone());
            accepted.push(artifact);
        }
    }

    (accepted, report)
}

// =============================================================================
// InputAssembler
// =============================================================================

/// Builds the ordered part list for a model call.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputAssembler;

impl InputAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Model-facing prompt text: the command prefix, if any, then the prompt.
    pub fn prompt_text(&self, prompt: &str, command: Option<&CommandTemplate>) -> String {
        match command {
            Some(cmd) => cmd.apply(prompt),
            None => prompt.to_string(),
        }
    }

    /// Parts in order: every artifact inline, then the camera image, then the prompt.
    pub fn assemble(
        &self,
        prompt: &str,
        command: Option<&CommandTemplate>,
        artifacts: &[UploadedArtifact],
        camera: Option<&CameraCapture>,
    ) -> Result<Vec<ContentPart>, ChatError> {
        if prompt.trim().is_empty() {
            return Err(ChatError::EmptyPrompt);
        }

        let mut parts = Vec::with_capacity(artifacts.len() + 2);
        for artifact in artifacts {
            parts.push(ContentPart::Inline {
                mime_type: detect_file_type(&artifact.name),
                data: artifact.raw_bytes.clone(),
                source_name: artifact.name.clone(),
            });
        }
        if let Some(capture) = camera {
            parts.push(ContentPart::Inline {
                mime_type: capture.mime_type.clone(),
                data: capture.data.clone(),
                source_name: "camera".to_string(),
            });
        }
        parts.push(ContentPart::text(self.prompt_text(prompt, command)));

        tracing::debug!(
            parts = parts.len(),
            command = command.map(|c| c.id.as_str()),
            "Input assembled"
        );
        Ok(parts)
    }

    /// Local-analysis alternative: extracted text parts for each artifact that
    /// has an extractor. Failures contribute their error text.
    pub async fn extract_parts<O: OcrService>(
        &self,
        extractor: &ContentExtractor<O>,
        artifacts: &[UploadedArtifact],
    ) -> Vec<ContentPart> {
        extractor
            .extract_all(artifacts)
            .await
            .into_iter()
            .filter_map(|extraction| extraction.into_part())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use interlink_ocr::MockOcrService;

    fn artifact(name: &str, size: usize) -> UploadedArtifact {
        UploadedArtifact::new(name, vec![b'x'; size])
    }

    #[test]
    fn test_partition_drops_oversized() {
        let config = UploadConfig {
            max_bytes: 10,
            ..UploadConfig::default()
        };
        let (accepted, report) = partition_uploads(
            vec![artifact("a.txt", 5), artifact("big.pdf", 11), artifact("b.png", 10)],
            &config,
        );
        let names: Vec<&str> = accepted.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.png"]);
        assert_eq!(report.oversized, vec!["big.pdf"]);
        assert_eq!(report.accepted, vec!["a.txt", "b.png"]);
    }

    #[test]
    fn test_partition_drops_unsupported() {
        let (accepted, report) =
            partition_uploads(vec![artifact("run.exe", 3), artifact("n.txt", 3)], &UploadConfig::default());
        assert_eq!(accepted.len(), 1);
        assert_eq!(report.unsupported, vec!["run.exe"]);
        assert_eq!(
            report.unsupported_warning().as_deref(),
            Some("Unsupported file type: run.exe")
        );
    }

    #[test]
    fn test_report_messages() {
        let report = UploadReport {
            accepted: vec!["a".into(), "b".into()],
            oversized: vec!["x.mp4".into(), "y.mov".into()],
            unsupported: vec![],
            limit_bytes: 20 * 1024 * 1024,
        };
        assert_eq!(
            report.oversized_warning().as_deref(),
            Some("Files exceeding 20MB limit: x.mp4, y.mov")
        );
        assert_eq!(
            report.success_message().as_deref(),
            Some("2 file(s) uploaded successfully")
        );
        assert!(report.unsupported_warning().is_none());
        assert!(UploadReport::default().success_message().is_none());
    }

    #[test]
    fn test_assemble_orders_parts() {
        let assembler = InputAssembler::new();
        let artifacts = vec![artifact("one.pdf", 2), artifact("two.png", 3)];
        let camera = CameraCapture::jpeg(vec![9, 9]);
        let parts = assembler
            .assemble("explain", None, &artifacts, Some(&camera))
            .unwrap();

        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0].source_name(), Some("one.pdf"));
        assert_eq!(parts[0].mime_type(), "application/pdf");
        assert_eq!(parts[1].source_name(), Some("two.png"));
        assert_eq!(parts[1].mime_type(), "image/png");
        assert_eq!(parts[2].mime_type(), "image/jpeg");
        assert_eq!(parts[2].source_name(), Some("camera"));
        assert_eq!(parts[3], ContentPart::text("explain"));
    }

    #[test]
    fn test_assemble_prompt_only() {
        let parts = InputAssembler::new()
            .assemble("hello", None, &[], None)
            .unwrap();
        assert_eq!(parts, vec![ContentPart::text("hello")]);
    }

    #[test]
    fn test_assemble_applies_command_prefix() {
        let cmd = CommandTemplate::new("/c", "d", "Format this:");
        let parts = InputAssembler::new()
            .assemble("my notes", Some(&cmd), &[], None)
            .unwrap();
        assert_eq!(parts, vec![ContentPart::text("Format this:\nmy notes")]);
    }

    #[test]
    fn test_assemble_rejects_blank_prompt() {
        let result = InputAssembler::new().assemble("  \n\t", None, &[], None);
        assert!(matches!(result, Err(ChatError::EmptyPrompt)));
    }

    #[tokio::test]
    async fn test_extract_parts_skips_unsupported_and_keeps_errors() {
        let extractor = ContentExtractor::new(MockOcrService::new());
        let artifacts = vec![
            UploadedArtifact::new("notes.txt", b"osmosis".to_vec()),
            UploadedArtifact::new("clip.mp4", vec![0; 4]),
            UploadedArtifact::new("bad.json", b"{".to_vec()),
            UploadedArtifact::new("empty.txt", Vec::new()),
        ];
        let parts = InputAssembler::new()
            .extract_parts(&extractor, &artifacts)
            .await;

        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].as_text(), Some("osmosis"));
        assert!(parts[1]
            .as_text()
            .unwrap()
            .starts_with("Error processing structured data: "));
    }
}
