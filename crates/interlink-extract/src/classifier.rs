//! File type classification by name.

use interlink_core::types::{extension_of, PreviewKind};

/// Fallback when nothing else matches.
pub const OCTET_STREAM: &str = "application/octet-stream";

pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Extensions the upload path knows about, with the type forwarded to the model.
static MIME_TABLE: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("webp", "image/webp"),
    ("tiff", "image/tiff"),
    ("mp4", "video/mp4"),
    ("avi", "video/x-msvideo"),
    ("mov", "video/quicktime"),
    ("mkv", "video/x-matroska"),
    ("webm", "video/webm"),
    ("mp3", "audio/mpeg"),
    ("wav", "audio/wav"),
    ("ogg", "audio/ogg"),
    ("m4a", "audio/mp4"),
    ("pdf", "application/pdf"),
    ("doc", "application/msword"),
    ("docx", DOCX_MIME),
    ("txt", "text/plain"),
    ("csv", "text/csv"),
    (
        "xlsx",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    ),
    ("json", "application/json"),
    ("xml", "application/xml"),
];

/// Exact lookup in the static extension table.
pub fn lookup_extension(extension: &str) -> Option<&'static str> {
    let ext = extension.trim_start_matches('.').to_lowercase();
    MIME_TABLE
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
}

/// First table extension registered for a content type.
pub fn extension_for_mime(mime_type: &str) -> Option<&'static str> {
    MIME_TABLE
        .iter()
        .find(|(_, mime)| mime.eq_ignore_ascii_case(mime_type))
        .map(|(ext, _)| *ext)
}

/// Map a file name to a content type. Never fails.
///
/// Order: static table, then extension guessing, then `application/octet-stream`.
pub fn detect_file_type(name: &str) -> String {
    if let Some(mime) = lookup_extension(&extension_of(name)) {
        return mime.to_string();
    }

    match mime_guess::from_path(name).first() {
        Some(mime) => {
            tracing::trace!(name, mime = %mime, "content type guessed");
            mime.essence_str().to_string()
        }
        None => OCTET_STREAM.to_string(),
    }
}

/// Preview kind for a file name.
pub fn preview_kind(name: &str) -> PreviewKind {
    PreviewKind::from_mime(&detect_file_type(name))
}
