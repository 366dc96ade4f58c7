//! Error types for the chat pipeline.

use interlink_speech::SpeechError;

/// Follow-up shown after a rate-limited model call.
pub const RATE_LIMIT_HINT: &str =
    "The API rate limit has been reached. Please wait a moment before trying again.";
/// Follow-up shown after any other model failure.
pub const RETRY_HINT: &str = "Please try again in a moment.";
/// Follow-up shown after a failed voice question.
pub const AUDIO_HINT: &str = "Please try again or type your question instead.";

/// Failures of the hosted model API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("rate limit exceeded: {0}")]
    RateLimited(String),
    #[error("request failed: {0}")]
    Request(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("API key not set: export {0}")]
    MissingApiKey(String),
}

impl ModelError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ModelError::RateLimited(_))
    }
}

/// Errors from chat operations.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("prompt cannot be empty")]
    EmptyPrompt,
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("camera is disabled")]
    CameraDisabled,
    #[error("model error: {0}")]
    Model(#[from] ModelError),
    #[error("speech error: {0}")]
    Speech(#[from] SpeechError),
    #[error("temporary file error: {0}")]
    TempFile(String),
}

impl ChatError {
    /// User-facing follow-up advice for this failure, if any.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            ChatError::Model(e) if e.is_rate_limited() => Some(RATE_LIMIT_HINT),
            ChatError::Model(_) => Some(RETRY_HINT),
            ChatError::Speech(_) | ChatError::TempFile(_) => Some(AUDIO_HINT),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ChatError {
    fn from(err: std::io::Error) -> Self {
        ChatError::TempFile(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_error_display() {
        assert_eq!(ChatError::EmptyPrompt.to_string(), "prompt cannot be empty");
        assert_eq!(
            ChatError::UnknownCommand("/nope".into()).to_string(),
            "unknown command: /nope"
        );
        assert_eq!(ChatError::CameraDisabled.to_string(), "camera is disabled");

        let err = ChatError::from(ModelError::Request("connection reset".into()));
        assert_eq!(err.to_string(), "model error: request failed: connection reset");
    }

    #[test]
    fn test_hint_rate_limited() {
        let err = ChatError::from(ModelError::RateLimited("429".into()));
        assert_eq!(err.hint(), Some(RATE_LIMIT_HINT));
    }

    #[test]
    fn test_hint_other_model_failures() {
        for e in [
            ModelError::Request("timeout".into()),
            ModelError::InvalidResponse("no candidates".into()),
            ModelError::MissingApiKey("GEMINI_API_KEY".into()),
        ] {
            assert_eq!(ChatError::from(e).hint(), Some(RETRY_HINT));
        }
    }

    #[test]
    fn test_hint_audio_failures() {
        assert_eq!(
            ChatError::from(SpeechError::Unintelligible).hint(),
            Some(AUDIO_HINT)
        );
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err = ChatError::from(io);
        assert!(matches!(err, ChatError::TempFile(_)));
        assert_eq!(err.hint(), Some(AUDIO_HINT));
    }

    #[test]
    fn test_no_hint_for_input_errors() {
        assert_eq!(ChatError::EmptyPrompt.hint(), None);
        assert_eq!(ChatError::CameraDisabled.hint(), None);
    }
}
