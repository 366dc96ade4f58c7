//! Presentation boundary.

use interlink_core::types::{PreviewKind, Turn};

/// Severity of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Receives everything the pipeline wants shown to the user.
pub trait PresentationSink: Send {
    /// A turn was appended to the conversation log.
    fn turn_appended(&mut self, turn: &Turn);

    /// An accepted file (or camera capture) should be previewed.
    fn preview(&mut self, name: &str, mime_type: &str, kind: PreviewKind);

    /// Replace the in-progress assistant message with `partial`.
    fn reveal_update(&mut self, partial: &str);

    fn status(&mut self, level: StatusLevel, message: &str);
}

/// One recorded sink call.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    TurnAppended(Turn),
    Preview {
        name: String,
        mime_type: String,
        kind: PreviewKind,
    },
    Reveal(String),
    Status(StatusLevel, String),
}

/// Sink that records every event in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub events: Vec<SinkEvent>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages emitted at `level`, in order.
    pub fn statuses(&self, level: StatusLevel) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SinkEvent::Status(l, msg) if *l == level => Some(msg.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn reveals(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SinkEvent::Reveal(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn previews(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SinkEvent::Preview { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn appended_turns(&self) -> Vec<&Turn> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SinkEvent::TurnAppended(turn) => Some(turn),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl PresentationSink for MemorySink {
    fn turn_appended(&mut self, turn: &Turn) {
        self.events.push(SinkEvent::TurnAppended(turn.clone()));
    }

    fn preview(&mut self, name: &str, mime_type: &str, kind: PreviewKind) {
        self.events.push(SinkEvent::Preview {
            name: name.to_string(),
            mime_type: mime_type.to_string(),
            kind,
        });
    }

    fn reveal_update(&mut self, partial: &str) {
        self.events.push(SinkEvent::Reveal(partial.to_string()));
    }

    fn status(&mut self, level: StatusLevel, message: &str) {
        self.events
            .push(SinkEvent::Status(level, message.to_string()));
    }
}
