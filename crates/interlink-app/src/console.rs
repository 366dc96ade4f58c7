//! Terminal presentation sink.

use std::io::Write;

use interlink_chat::{PresentationSink, StatusLevel};
use interlink_core::types::{PreviewKind, Role, Turn};

/// Writes conversation output to a terminal-like writer.
///
/// Reveal updates are printed incrementally: only text beyond what is
/// already on screen is written, with the trailing cursor stripped.
pub struct ConsoleSink<W: Write + Send> {
    out: W,
    cursor: String,
    revealed: usize,
}

impl<W: Write + Send> ConsoleSink<W> {
    pub fn new(out: W, cursor: impl Into<String>) -> Self {
        Self {
            out,
            cursor: cursor.into(),
            revealed: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{}", text).and_then(|_| self.out.flush()) {
            tracing::warn!(error = %e, "Failed to write to console");
        }
    }

    fn write_raw(&mut self, text: &str) {
        if let Err(e) = write!(self.out, "{}", text).and_then(|_| self.out.flush()) {
            tracing::warn!(error = %e, "Failed to write to console");
        }
    }
}

impl<W: Write + Send> PresentationSink for ConsoleSink<W> {
    fn turn_appended(&mut self, turn: &Turn) {
        match turn.role {
            Role::User => self.line(&format!("you> {}", turn.content)),
            // already on screen through the reveal
            Role::Assistant => {
                self.revealed = 0;
                self.line("");
            }
        }
    }

    fn preview(&mut self, name: &str, mime_type: &str, kind: PreviewKind) {
        let label = match kind {
            PreviewKind::Image => "image",
            PreviewKind::Video => "video",
            PreviewKind::Audio => "audio",
            PreviewKind::Other => {
                self.line(&format!("Uploaded: {} (Type: {})", name, mime_type));
                return;
            }
        };
        self.line(&format!("[{}] {} ({})", label, name, mime_type));
    }

    fn reveal_update(&mut self, partial: &str) {
        let text = partial.strip_suffix(self.cursor.as_str()).unwrap_or(partial);
        if self.revealed == 0 && !text.is_empty() {
            self.write_raw("interlink> ");
        }
        if let Some(fresh) = text.get(self.revealed..) {
            if !fresh.is_empty() {
                self.write_raw(fresh);
            }
            self.revealed = text.len();
        }
    }

    fn status(&mut self, level: StatusLevel, message: &str) {
        let prefix = match level {
            StatusLevel::Info => "info",
            StatusLevel::Success => "ok",
            StatusLevel::Warning => "warning",
            StatusLevel::Error => "error",
        };
        self.line(&format!("{}: {}", prefix, message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(sink: ConsoleSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn test_reveal_prints_increments_without_cursor() {
        let mut sink = ConsoleSink::new(Vec::new(), "▌");
        sink.reveal_update("Hi ▌");
        sink.reveal_update("Hi there ▌");
        sink.reveal_update("Hi there \n▌");
        sink.reveal_update("Hi there \n");
        sink.turn_appended(&Turn::assistant("Hi there \n"));
        assert_eq!(output(sink), "interlink> Hi there \n\n");
    }

    #[test]
    fn test_status_prefixes() {
        let mut sink = ConsoleSink::new(Vec::new(), "▌");
        sink.status(StatusLevel::Warning, "Please try again in a moment.");
        sink.status(StatusLevel::Success, "Speech converted to text!");
        assert_eq!(
            output(sink),
            "warning: Please try again in a moment.\nok: Speech converted to text!\n"
        );
    }

    #[test]
    fn test_preview_other_matches_upload_notice() {
        let mut sink = ConsoleSink::new(Vec::new(), "▌");
        sink.preview("notes.pdf", "application/pdf", PreviewKind::Other);
        sink.preview("cat.png", "image/png", PreviewKind::Image);
        assert_eq!(
            output(sink),
            "Uploaded: notes.pdf (Type: application/pdf)\n[image] cat.png (image/png)\n"
        );
    }

    #[test]
    fn test_user_turn_echoed() {
        let mut sink = ConsoleSink::new(Vec::new(), "▌");
        sink.turn_appended(&Turn::user("what is osmosis"));
        assert_eq!(output(sink), "you> what is osmosis\n");
    }
}
