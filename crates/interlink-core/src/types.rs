use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default per-artifact upload cap (20 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 20 * 1024 * 1024;

/// MIME type forwarded for camera captures.
pub const CAMERA_MIME_TYPE: &str = "image/jpeg";

// =============================================================================
// Enums
// =============================================================================

/// Author of a conversation turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the presentation layer should preview an uploaded file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewKind {
    Image,
    Video,
    Audio,
    /// Shown as a name + type notice.
    Other,
}

impl PreviewKind {
    /// Pick the preview kind from a MIME type's top-level category.
    pub fn from_mime(mime_type: &str) -> Self {
        if mime_type.starts_with("image/") {
            PreviewKind::Image
        } else if mime_type.starts_with("video/") {
            PreviewKind::Video
        } else if mime_type.starts_with("audio/") {
            PreviewKind::Audio
        } else {
            PreviewKind::Other
        }
    }
}

// =============================================================================
// Conversation
// =============================================================================

/// One role-tagged message in the conversation log.
///
/// Turns are never edited after they are appended; the log order is the
/// display order and the model context order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

// =============================================================================
// Inputs
// =============================================================================

/// A file received from the user. Read-only once constructed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadedArtifact {
    pub name: String,
    pub byte_size: u64,
    pub raw_bytes: Vec<u8>,
    /// Lowercase extension without the leading dot; empty when absent.
    pub declared_extension: String,
}

impl UploadedArtifact {
    pub fn new(name: impl Into<String>, raw_bytes: Vec<u8>) -> Self {
        let name = name.into();
        let declared_extension = extension_of(&name);
        Self {
            byte_size: raw_bytes.len() as u64,
            name,
            raw_bytes,
            declared_extension,
        }
    }

    pub fn exceeds(&self, limit: u64) -> bool {
        self.byte_size > limit
    }
}

/// Lowercase extension of a file name, without the dot.
///
/// Dotfiles such as `.bashrc` have no extension.
pub fn extension_of(name: &str) -> String {
    let base = name.rsplit(|c| c == '/' || c == '\\').next().unwrap_or(name);
    match base.rfind('.') {
        Some(idx) if idx > 0 => base[idx + 1..].to_lowercase(),
        _ => String::new(),
    }
}

/// Image captured from the camera. At most one is held per session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CameraCapture {
    pub data: Vec<u8>,
    pub mime_type: String,
}

impl CameraCapture {
    pub fn jpeg(data: Vec<u8>) -> Self {
        Self {
            data,
            mime_type: CAMERA_MIME_TYPE.to_string(),
        }
    }
}

/// Something pasted from the clipboard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClipboardContent {
    Text(String),
    Image { data: Vec<u8>, mime_type: String },
}

// =============================================================================
// Model input
// =============================================================================

/// One typed unit of input forwarded to the model for a turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentPart {
    /// Raw bytes passed opaquely to the model.
    Inline {
        mime_type: String,
        #[serde(skip)]
        data: Vec<u8>,
        source_name: String,
    },
    /// Text derived from an artifact by an extractor.
    Extracted {
        mime_type: String,
        text: String,
        source_name: String,
    },
    Text { text: String },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    /// MIME type of the part; plain text parts report `text/plain`.
    pub fn mime_type(&self) -> &str {
        match self {
            ContentPart::Inline { mime_type, .. } | ContentPart::Extracted { mime_type, .. } => {
                mime_type
            }
            ContentPart::Text { .. } => "text/plain",
        }
    }

    pub fn source_name(&self) -> Option<&str> {
        match self {
            ContentPart::Inline { source_name, .. }
            | ContentPart::Extracted { source_name, .. } => Some(source_name),
            ContentPart::Text { .. } => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentPart::Text { text } | ContentPart::Extracted { text, .. } => Some(text),
            ContentPart::Inline { .. } => None,
        }
    }
}
