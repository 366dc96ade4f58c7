//! Runtime selection of the model and speech collaborators.

use std::path::PathBuf;

use interlink_chat::{ChatModel, GeminiChatSession, ModelError};
use interlink_core::config::SpeechConfig;
use interlink_core::types::ContentPart;
use interlink_speech::{
    SpeechError, TranscriptionResult, TranscriptionService, WhisperConfig, WhisperService,
};

// =============================================================================
// Model
// =============================================================================

/// Local stand-in model that describes what it received.
#[derive(Debug, Default)]
pub struct EchoModel;

impl ChatModel for EchoModel {
    async fn send_message(&mut self, parts: Vec<ContentPart>) -> Result<String, ModelError> {
        let prompt = parts
            .iter()
            .rev()
            .find_map(|p| match p {
                ContentPart::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .unwrap_or_default();
        let attachments: Vec<&str> = parts.iter().filter_map(ContentPart::source_name).collect();

        let mut reply = format!("You said: {}", prompt);
        if !attachments.is_empty() {
            reply.push_str("\nAttachments:");
            for name in attachments {
                reply.push_str(&format!("\n- {}", name));
            }
        }
        Ok(reply)
    }
}

/// The model the session talks to.
pub enum ModelBackend {
    Gemini(GeminiChatSession),
    Echo(EchoModel),
}

impl ChatModel for ModelBackend {
    async fn send_message(&mut self, parts: Vec<ContentPart>) -> Result<String, ModelError> {
        match self {
            ModelBackend::Gemini(session) => session.send_message(parts).await,
            ModelBackend::Echo(echo) => echo.send_message(parts).await,
        }
    }
}

// =============================================================================
// Speech
// =============================================================================

/// Speech-to-text backend. Voice input keeps working as a reported failure
/// when no model can be loaded.
pub enum SpeechBackend {
    Whisper(WhisperService),
    Unavailable(String),
}

impl SpeechBackend {
    pub fn load(config: &SpeechConfig) -> Self {
        let mut whisper = WhisperConfig::from(config);
        whisper.model_path = expand_home(&whisper.model_path)
            .to_string_lossy()
            .to_string();

        match WhisperService::new(whisper) {
            Ok(service) => SpeechBackend::Whisper(service),
            Err(e) => {
                tracing::warn!(error = %e, "Speech recognition unavailable");
                SpeechBackend::Unavailable(e.to_string())
            }
        }
    }
}

impl TranscriptionService for SpeechBackend {
    async fn transcribe(
        &self,
        audio_data: &[f32],
        sample_rate: u32,
    ) -> Result<TranscriptionResult, SpeechError> {
        match self {
            SpeechBackend::Whisper(service) => service.transcribe(audio_data, sample_rate).await,
            SpeechBackend::Unavailable(reason) => Err(SpeechError::Service(reason.clone())),
        }
    }
}

/// Expand a leading `~/` to the user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    let rest = match path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        Some(rest) => rest,
        None => return PathBuf::from(path),
    };
    #[cfg(target_os = "windows")]
    let home = std::env::var("USERPROFILE").unwrap_or_else(|_| ".".to_string());
    #[cfg(not(target_os = "windows"))]
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(rest)
}
