use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{InterlinkError, Result};
use crate::types::MAX_UPLOAD_BYTES;

/// System instruction sent once when a model chat session starts.
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "\
Name: Your name is Interlink AI.
Creator: You were developed by the Interlink team.
Technology: You are powered by Google Gemini.
Platform: You are hosted on the Interlink website.
Website: https://interlinkcvhs.org/.

Behavioral Guidelines:
Be helpful and professional, ensuring accuracy in every response.
Avoid being overly promotional—mention Interlink's features only when relevant or when asked.
Maintain a friendly, approachable tone while providing precise and concise answers.

Interlink's Features for Carnegie Vanguard High School (CVHS) Freshmen:
Customizable Scheduling Tool: Helps students manage assignments and stay organized.
Subject Notes: Comprehensive notes for a variety of subjects.
Question Bank (QBank): Hundreds of practice problems to help students prepare for tests.
Quizlets: Study resources to aid in test preparation.
AP Human Geography Flashcards: Weekly terms and definitions tailored to the curriculum.
Educational Podcasts: Learn on-the-go with study-focused audio content.
Question of the Day (QOTD): A daily random question to reinforce key test topics.
Productivity Tools: General tools to enhance efficiency and focus.
";

/// First assistant turn of every session.
pub const DEFAULT_GREETING: &str = "Hello! I'm Interlink AI, your personal academic assistant for Carnegie Vanguard High School. How can I assist you today?";

/// Top-level configuration for Interlink.
///
/// Loaded from `~/.interlink/config.toml` by default. Every section falls back
/// to its defaults when missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterlinkConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub uploads: UploadConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub ocr: OcrConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

impl InterlinkConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: InterlinkConfig = toml::from_str(&content)?;
        config.validate()?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration, falling back to defaults if the file does not
    /// exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.uploads.max_bytes == 0 {
            return Err(InterlinkError::Config(
                "uploads.max_bytes must be greater than 0".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.model.temperature) {
            return Err(InterlinkError::Config(format!(
                "model.temperature must be within 0.0..=2.0, got {}",
                self.model.temperature
            )));
        }
        if !(0.0..=1.0).contains(&self.model.top_p) {
            return Err(InterlinkError::Config(format!(
                "model.top_p must be within 0.0..=1.0, got {}",
                self.model.top_p
            )));
        }
        if self.model.max_output_tokens == 0 {
            return Err(InterlinkError::Config(
                "model.max_output_tokens must be greater than 0".into(),
            ));
        }
        for command in &self.chat.commands {
            if !command.id.starts_with('/') || command.id.len() < 2 {
                return Err(InterlinkError::Config(format!(
                    "command id '{}' must start with '/'",
                    command.id
                )));
            }
        }
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Hosted model and generation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub model_name: String,
    /// Base URL of the generative language API.
    pub api_base: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
    pub response_mime_type: String,
    pub system_instruction: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_name: "gemini-1.5-flash".to_string(),
            api_base: "https://generativelanguage.googleapis.com".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            temperature: 0.0,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: 8192,
            response_mime_type: "text/plain".to_string(),
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
        }
    }
}

/// Upload intake limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Per-artifact size cap in bytes.
    pub max_bytes: u64,
    /// Accepted file extensions (lowercase, no dot).
    pub allowed_extensions: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: MAX_UPLOAD_BYTES,
            allowed_extensions: [
                "png", "jpg", "jpeg", "gif", "bmp", "webp", "tiff", "mp4", "avi", "mov", "mkv",
                "webm", "mp3", "wav", "ogg", "m4a", "pdf", "doc", "docx", "txt", "csv", "xlsx",
                "json", "xml",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

impl UploadConfig {
    pub fn allows(&self, extension: &str) -> bool {
        self.allowed_extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(extension))
    }
}

/// Typing-effect reveal settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Delay between revealed chunks in milliseconds. 0 disables pacing.
    pub reveal_delay_ms: u64,
    /// Marker shown at the end of a partially revealed reply.
    pub cursor: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            reveal_delay_ms: 20,
            cursor: "▌".to_string(),
        }
    }
}

/// Speech-to-text settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Path to the whisper GGML model file.
    pub whisper_model_path: String,
    /// Language code, or "auto".
    pub language: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            whisper_model_path: "~/.interlink/models/ggml-base.en.bin".to_string(),
            language: "en".to_string(),
        }
    }
}

/// OCR engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Path or name of the tesseract executable.
    pub tesseract_path: String,
    /// Tesseract language pack, e.g. "eng".
    pub language: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            tesseract_path: "tesseract".to_string(),
            language: "eng".to_string(),
        }
    }
}

/// Conversation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Assistant turn that opens every session.
    pub greeting: String,
    /// Extra slash commands merged with the built-in ones at startup.
    pub commands: Vec<CommandConfig>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            greeting: DEFAULT_GREETING.to_string(),
            commands: Vec::new(),
        }
    }
}

/// A user-declared prompt-prefix command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandConfig {
    pub id: String,
    pub description: String,
    pub prompt_prefix: String,
}
