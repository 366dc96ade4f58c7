//! Error types for speech-to-text.

/// Failure kinds of a transcription attempt.
///
/// Callers treat `Unintelligible` differently from `Service`: the first means
/// the recording was heard but not understood, the second that the
/// recognition engine itself could not be reached or failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpeechError {
    #[error("speech recognition could not understand the audio")]
    Unintelligible,
    #[error("could not request results from speech recognition service; {0}")]
    Service(String),
    #[error("invalid audio: {0}")]
    InvalidAudio(String),
}

impl From<hound::Error> for SpeechError {
    fn from(err: hound::Error) -> Self {
        SpeechError::InvalidAudio(err.to_string())
    }
}
