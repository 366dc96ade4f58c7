//! Interlink speech crate - speech-to-text collaborator.
//!
//! Provides a trait-based abstraction for transcription, WAV decoding for
//! recorded clips, a scriptable mock for tests, and a whisper.cpp backed
//! service behind the `whisper` feature.

pub mod error;
pub mod wav;
pub mod whisper_service;

use std::future::Future;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use interlink_core::config::SpeechConfig;

pub use error::SpeechError;
pub use whisper_service::WhisperService;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the Whisper transcription engine.
#[derive(Debug, Clone)]
pub struct WhisperConfig {
    /// Path to the Whisper GGML model file.
    pub model_path: String,
    /// Language code for transcription (e.g., "en", "auto").
    pub language: String,
}

impl Default for WhisperConfig {
    fn default() -> Self {
        Self {
            model_path: String::new(),
            language: "en".to_string(),
        }
    }
}

impl From<&SpeechConfig> for WhisperConfig {
    fn from(config: &SpeechConfig) -> Self {
        Self {
            model_path: config.whisper_model_path.clone(),
            language: config.language.clone(),
        }
    }
}

// =============================================================================
// Result types
// =============================================================================

/// A single time-aligned segment within a transcription.
#[derive(Debug, Clone)]
pub struct Segment {
    pub start: f32,
    pub end: f32,
    pub text: String,
}

/// The complete result of a transcription operation.
#[derive(Debug, Clone)]
pub struct TranscriptionResult {
    pub text: String,
    pub segments: Vec<Segment>,
    pub language: String,
    pub duration_secs: f32,
}

impl TranscriptionResult {
    /// Build a result whose text is the segment texts joined by spaces.
    pub fn from_segments(segments: Vec<Segment>, language: &str, duration_secs: f32) -> Self {
        let text = segments
            .iter()
            .map(|s| s.text.as_str())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            text,
            segments,
            language: language.to_string(),
            duration_secs,
        }
    }
}

/// Reject input no recognizer can work with.
pub(crate) fn check_input(audio_data: &[f32], sample_rate: u32) -> Result<(), SpeechError> {
    if audio_data.is_empty() {
        return Err(SpeechError::InvalidAudio("no samples to transcribe".into()));
    }
    if sample_rate == 0 {
        return Err(SpeechError::InvalidAudio("sample rate is zero".into()));
    }
    Ok(())
}

// =============================================================================
// Trait
// =============================================================================

/// Service for transcribing audio to text.
pub trait TranscriptionService: Send + Sync {
    /// Transcribe mono PCM samples in [-1.0, 1.0].
    fn transcribe(
        &self,
        audio_data: &[f32],
        sample_rate: u32,
    ) -> impl Future<Output = Result<TranscriptionResult, SpeechError>> + Send;

    /// Transcribe a WAV file.
    ///
    /// A transcript that is empty after trimming is reported as
    /// [`SpeechError::Unintelligible`].
    fn transcribe_wav(
        &self,
        path: &Path,
    ) -> impl Future<Output = Result<TranscriptionResult, SpeechError>> + Send {
        async move {
            let bytes = tokio::fs::read(path)
                .await
                .map_err(|e| SpeechError::InvalidAudio(format!("{}: {}", path.display(), e)))?;
            let (samples, sample_rate) = wav::decode_wav(&bytes)?;
            let result = self.transcribe(&samples, sample_rate).await?;
            if result.text.trim().is_empty() {
                return Err(SpeechError::Unintelligible);
            }
            Ok(result)
        }
    }
}

// =============================================================================
// Mock implementation
// =============================================================================

#[derive(Debug, Clone)]
enum MockBehavior {
    Text(String),
    Unintelligible,
    ServiceError(String),
}

/// Mock transcription service with a scripted outcome.
///
/// Counts calls so tests can assert how often recognition actually ran.
#[derive(Debug)]
pub struct MockTranscriptionService {
    behavior: MockBehavior,
    calls: AtomicUsize,
}

impl MockTranscriptionService {
    /// Always returns `[mock transcription]`.
    pub fn new() -> Self {
        Self::with_text("[mock transcription]")
    }

    pub fn with_text(text: &str) -> Self {
        Self {
            behavior: MockBehavior::Text(text.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Always fails as unintelligible audio.
    pub fn unintelligible() -> Self {
        Self {
            behavior: MockBehavior::Unintelligible,
            calls: AtomicUsize::new(0),
        }
    }

    /// Always fails as an unreachable service.
    pub fn failing(cause: &str) -> Self {
        Self {
            behavior: MockBehavior::ServiceError(cause.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `transcribe` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockTranscriptionService {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptionService for MockTranscriptionService {
    async fn transcribe(
        &self,
        audio_data: &[f32],
        sample_rate: u32,
    ) -> Result<TranscriptionResult, SpeechError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        check_input(audio_data, sample_rate)?;

        let duration_secs = audio_data.len() as f32 / sample_rate as f32;
        match &self.behavior {
            MockBehavior::Text(text) => {
                tracing::debug!(duration_secs, sample_rate, "Scripted transcript returned");
                let segment = Segment {
                    start: 0.0,
                    end: duration_secs,
                    text: text.clone(),
                };
                Ok(TranscriptionResult::from_segments(
                    vec![segment],
                    "en",
                    duration_secs,
                ))
            }
            MockBehavior::Unintelligible => Err(SpeechError::Unintelligible),
            MockBehavior::ServiceError(cause) => Err(SpeechError::Service(cause.clone())),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
