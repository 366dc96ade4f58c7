//! Audio intake: clip hashing and temp-file scoped transcription.

use std::path::Path;

use interlink_core::types::Turn;
use interlink_speech::TranscriptionService;

use crate::error::ChatError;

/// MD5 hex digest of a recording. Identifies repeated submissions of a clip.
pub fn audio_hash(bytes: &[u8]) -> String {
    format!("{:x}", md5::compute(bytes))
}

/// Result of submitting a recording.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioOutcome {
    /// The clip was handled before; nothing happened.
    AlreadyProcessed,
    /// The clip was transcribed and answered.
    Answered { transcript: String, reply: Turn },
}

/// Write the clip to a uniquely named `.wav` file and transcribe it.
///
/// The file is removed when this returns, whatever the outcome.
pub async fn transcribe_clip<T: TranscriptionService>(
    transcriber: &T,
    bytes: &[u8],
) -> Result<String, ChatError> {
    transcribe_clip_in(transcriber, bytes, &std::env::temp_dir()).await
}

pub(crate) async fn transcribe_clip_in<T: TranscriptionService>(
    transcriber: &T,
    bytes: &[u8],
    dir: &Path,
) -> Result<String, ChatError> {
    let file = tempfile::Builder::new()
        .prefix("interlink-audio-")
        .suffix(".wav")
        .tempfile_in(dir)?;
    tokio::fs::write(file.path(), bytes).await?;
    tracing::debug!(path = %file.path().display(), bytes = bytes.len(), "Recording saved");

    let result = transcriber.transcribe_wav(file.path()).await?;
    let transcript = result.text.trim().to_string();
    tracing::info!(
        chars = transcript.len(),
        duration_secs = result.duration_secs,
        "Recording transcribed"
    );
    Ok(transcript)
}

#[cfg(test)]
mod tests {
    use super::*;
    use interlink_speech::wav::encode_wav;
    use interlink_speech::{MockTranscriptionService, SpeechError};

    #[test]
    fn test_audio_hash_deterministic() {
        let clip = b"RIFF....WAVEfmt ";
        assert_eq!(audio_hash(clip), audio_hash(clip));
        assert_eq!(audio_hash(clip).len(), 32);
        assert_ne!(audio_hash(clip), audio_hash(b"other"));
    }

    #[test]
    fn test_audio_hash_known_value() {
        assert_eq!(audio_hash(b""), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[tokio::test]
    async fn test_transcribe_clip() {
        let bytes = encode_wav(&[1000, -1000, 500], 16_000).unwrap();
        let service = MockTranscriptionService::with_text("  define osmosis ");
        let transcript = transcribe_clip(&service, &bytes).await.unwrap();
        assert_eq!(transcript, "define osmosis");
        assert_eq!(service.calls(), 1);
    }

    #[tokio::test]
    async fn test_transcribe_clip_unintelligible() {
        let bytes = encode_wav(&[1, 2, 3], 16_000).unwrap();
        let service = MockTranscriptionService::unintelligible();
        let err = transcribe_clip(&service, &bytes).await.unwrap_err();
        assert!(matches!(err, ChatError::Speech(SpeechError::Unintelligible)));
    }

    #[tokio::test]
    async fn test_transcribe_clip_invalid_audio() {
        let service = MockTranscriptionService::new();
        let err = transcribe_clip(&service, b"not audio").await.unwrap_err();
        assert!(matches!(err, ChatError::Speech(SpeechError::InvalidAudio(_))));
        assert_eq!(service.calls(), 0);
    }

    #[tokio::test]
    async fn test_temp_wav_removed_on_every_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let clip = encode_wav(&[1000, -1000, 500], 16_000).unwrap();
        let leftovers = || std::fs::read_dir(dir.path()).unwrap().count();

        let ok = MockTranscriptionService::with_text("hello");
        assert!(transcribe_clip_in(&ok, &clip, dir.path()).await.is_ok());
        assert_eq!(leftovers(), 0);

        let unintelligible = MockTranscriptionService::unintelligible();
        assert!(transcribe_clip_in(&unintelligible, &clip, dir.path()).await.is_err());
        assert_eq!(leftovers(), 0);

        let down = MockTranscriptionService::failing("recognizer offline");
        assert!(transcribe_clip_in(&down, &clip, dir.path()).await.is_err());
        assert_eq!(leftovers(), 0);

        assert!(transcribe_clip_in(&ok, b"not a wav", dir.path()).await.is_err());
        assert_eq!(leftovers(), 0);
    }
}
