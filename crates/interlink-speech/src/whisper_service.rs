//! Local speech recognition through whisper.cpp (`whisper-rs`).
//!
//! Only compiled for real with the `whisper` feature. Without it the service
//! still constructs, but every transcription is a `Service` error, which the
//! audio intake reports the same way as an unreachable recognizer.

use crate::{check_input, SpeechError, TranscriptionResult, TranscriptionService, WhisperConfig};

/// Sample rate whisper models are trained on.
pub const WHISPER_SAMPLE_RATE: u32 = 16_000;

/// Speech recognizer backed by a GGML whisper model.
pub struct WhisperService {
    #[cfg(feature = "whisper")]
    ctx: whisper_rs::WhisperContext,
    config: WhisperConfig,
}

impl WhisperService {
    /// Load the model named by `config.model_path`.
    #[cfg(feature = "whisper")]
    pub fn new(config: WhisperConfig) -> Result<Self, SpeechError> {
        use whisper_rs::{WhisperContext, WhisperContextParameters};

        if !std::path::Path::new(&config.model_path).is_file() {
            return Err(SpeechError::Service(format!(
                "whisper model not found at {}",
                config.model_path
            )));
        }

        let params = WhisperContextParameters::default();
        let ctx = WhisperContext::new_with_params(&config.model_path, params)
            .map_err(|e| SpeechError::Service(format!("cannot load whisper model: {}", e)))?;

        tracing::info!(
            model = %config.model_path,
            language = %config.language,
            "Speech model ready"
        );
        Ok(Self { ctx, config })
    }

    #[cfg(not(feature = "whisper"))]
    pub fn new(config: WhisperConfig) -> Result<Self, SpeechError> {
        tracing::warn!("Built without the `whisper` feature; voice input will report errors");
        Ok(Self { config })
    }

    pub fn config(&self) -> &WhisperConfig {
        &self.config
    }

    /// Language hint for the decoder; `None` lets whisper detect it.
    pub fn language_hint(&self) -> Option<&str> {
        match self.config.language.as_str() {
            "" | "auto" => None,
            lang => Some(lang),
        }
    }

    #[cfg(feature = "whisper")]
    fn run(&self, samples: &[f32]) -> Result<Vec<crate::Segment>, SpeechError> {
        use whisper_rs::{FullParams, SamplingStrategy};

        let service = |stage: &str, e: whisper_rs::WhisperError| {
            SpeechError::Service(format!("whisper {} failed: {}", stage, e))
        };

        let mut state = self.ctx.create_state().map_err(|e| service("state setup", e))?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_language(self.language_hint());
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);

        state.full(params, samples).map_err(|e| service("inference", e))?;

        let count = state.full_n_segments().map_err(|e| service("segment count", e))?;
        (0..count)
            .map(|i| {
                let text = state
                    .full_get_segment_text(i)
                    .map_err(|e| service("segment read", e))?;
                // centiseconds
                let start = state.full_get_segment_t0(i).unwrap_or(0) as f32 / 100.0;
                let end = state.full_get_segment_t1(i).unwrap_or(0) as f32 / 100.0;
                Ok(crate::Segment {
                    start,
                    end,
                    text: text.trim().to_string(),
                })
            })
            .collect()
    }
}

impl TranscriptionService for WhisperService {
    async fn transcribe(
        &self,
        audio_data: &[f32],
        sample_rate: u32,
    ) -> Result<TranscriptionResult, SpeechError> {
        check_input(audio_data, sample_rate)?;
        self.recognize(audio_data, sample_rate)
    }
}

impl WhisperService {
    #[cfg(feature = "whisper")]
    fn recognize(
        &self,
        audio_data: &[f32],
        sample_rate: u32,
    ) -> Result<TranscriptionResult, SpeechError> {
        let samples = crate::wav::resample(audio_data, sample_rate, WHISPER_SAMPLE_RATE);
        let duration_secs = samples.len() as f32 / WHISPER_SAMPLE_RATE as f32;
        let segments = self.run(&samples)?;
        let result = TranscriptionResult::from_segments(
            segments,
            self.language_hint().unwrap_or("auto"),
            duration_secs,
        );
        tracing::info!(
            segments = result.segments.len(),
            duration_secs,
            "Recording transcribed"
        );
        Ok(result)
    }

    #[cfg(not(feature = "whisper"))]
    fn recognize(
        &self,
        _audio_data: &[f32],
        _sample_rate: u32,
    ) -> Result<TranscriptionResult, SpeechError> {
        Err(SpeechError::Service(
            "speech recognition is not available in this build (enable the `whisper` feature)"
                .into(),
        ))
    }
}
