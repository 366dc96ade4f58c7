//! Response rendering: markdown list spacing and the typing reveal.

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use interlink_core::config::RenderConfig;
use regex::Regex;

use crate::sink::PresentationSink;

/// Default cursor appended while a reply is being revealed.
pub const DEFAULT_CURSOR: &str = "▌";

// =============================================================================
// Reformatting
// =============================================================================

fn inline_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"([.!?:])[ \t]+([-*] |\d+\. )").expect("static regex is valid")
    })
}

fn numbered_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+\.").expect("static regex is valid"))
}

fn is_list_line(trimmed: &str) -> bool {
    trimmed.starts_with('*') || trimmed.starts_with('-') || numbered_re().is_match(trimmed)
}

/// Move list markers that follow sentence punctuation onto their own line.
fn split_inline_markers(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = inline_marker_re().replace_all(&current, "$1\n$2").into_owned();
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Put every list item in its own paragraph and normalize blank lines.
///
/// Pure and idempotent.
pub fn reformat_response(text: &str) -> String {
    let split = split_inline_markers(text);
    let mut out: Vec<&str> = Vec::new();
    let mut prev_list = false;

    fn push_blank(out: &mut Vec<&str>) {
        if out.last().is_some_and(|l| !l.is_empty()) {
            out.push("");
        }
    }

    for line in split.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            push_blank(&mut out);
            prev_list = false;
        } else if is_list_line(trimmed) {
            push_blank(&mut out);
            out.push(trimmed);
            prev_list = true;
        } else {
            if prev_list {
                push_blank(&mut out);
            }
            out.push(line);
            prev_list = false;
        }
    }

    out.join("\n").trim().to_string()
}

/// Reveal chunks: each line's space-separated words, then `"\n"`.
pub fn reveal_chunks(formatted: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    for line in formatted.split('\n') {
        chunks.extend(line.split(' '));
        chunks.push("\n");
    }
    chunks
}

// =============================================================================
// Pacing
// =============================================================================

/// Controls the pause between reveal steps.
#[async_trait]
pub trait RevealPacer: Send + Sync {
    async fn pause(&self);
}

/// Sleeps a fixed delay between steps.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for FixedDelay {
    fn default() -> Self {
        Self::new(Duration::from_millis(20))
    }
}

#[async_trait]
impl RevealPacer for FixedDelay {
    async fn pause(&self) {
        tokio::time::sleep(self.delay).await;
    }
}

/// No pause at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct Immediate;

#[async_trait]
impl RevealPacer for Immediate {
    async fn pause(&self) {}
}

// =============================================================================
// ResponseRenderer
// =============================================================================

/// Reformats a model reply and reveals it word by word.
pub struct ResponseRenderer {
    pacer: Box<dyn RevealPacer>,
    cursor: String,
}

impl ResponseRenderer {
    pub fn new(pacer: Box<dyn RevealPacer>, cursor: impl Into<String>) -> Self {
        Self {
            pacer,
            cursor: cursor.into(),
        }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        let pacer: Box<dyn RevealPacer> = if config.reveal_delay_ms == 0 {
            Box::new(Immediate)
        } else {
            Box::new(FixedDelay::new(Duration::from_millis(config.reveal_delay_ms)))
        };
        Self::new(pacer, config.cursor.clone())
    }

    /// Renderer without pacing.
    pub fn immediate() -> Self {
        Self::new(Box::new(Immediate), DEFAULT_CURSOR)
    }

    /// Reveal `reply` to the sink and return the final buffer.
    pub async fn render<S: PresentationSink + ?Sized>(&self, reply: &str, sink: &mut S) -> String {
        let formatted = reformat_response(reply);
        let mut buffer = String::with_capacity(formatted.len() + formatted.len() / 4);

        for chunk in reveal_chunks(&formatted) {
            if chunk == "\n" {
                buffer.push('\n');
            } else {
                buffer.push_str(chunk);
                buffer.push(' ');
            }
            self.pacer.pause().await;
            sink.reveal_update(&format!("{}{}", buffer, self.cursor));
        }

        sink.reveal_update(&buffer);
        buffer
    }
}

impl Default for ResponseRenderer {
    fn default() -> Self {
        Self::from_config(&RenderConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;

    #[test]
    fn test_numbered_items_separated() {
        assert_eq!(reformat_response("1. foo\n2. bar"), "1. foo\n\n2. bar");
    }

    #[test]
    fn test_bullets_get_own_paragraphs() {
        assert_eq!(
            reformat_response("Intro\n- a\n  - b\n* c"),
            "Intro\n\n- a\n\n- b\n\n* c"
        );
    }

    #[test]
    fn test_inline_marker_split() {
        assert_eq!(
            reformat_response("Hi! - point one\n- point two"),
            "Hi!\n\n- point one\n\n- point two"
        );
        assert_eq!(
            reformat_response("Steps: 1. mix 2. bake"),
            "Steps:\n\n1. mix 2. bake"
        );
    }

    #[test]
    fn test_text_after_list_separated() {
        assert_eq!(
            reformat_response("- item\nThat is all."),
            "- item\n\nThat is all."
        );
    }

    #[test]
    fn test_blank_runs_collapse() {
        assert_eq!(reformat_response("a\n\n\n\nb"), "a\n\nb");
        assert_eq!(reformat_response("a\n  \n\t\n \nb"), "a\n\nb");
    }

    #[test]
    fn test_trims_result() {
        assert_eq!(reformat_response("\n\n  hello  \n\n"), "hello");
        assert_eq!(reformat_response(""), "");
    }

    #[test]
    fn test_plain_text_unchanged() {
        let text = "The cell is the basic unit of life.\nIt has a membrane.";
        assert_eq!(reformat_response(text), text);
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "1. foo\n2. bar",
            "Hi! - point one\n- point two",
            "Header:\n* bold item\ntext after\n\n\n\nmore",
            "  indented prose\n-dash\n3.14 is pi",
            "x. 1. - y",
            "Notes:\r\n- one\r\n- two\r\nEnd",
        ];
        for sample in samples {
            let once = reformat_response(sample);
            assert_eq!(reformat_response(&once), once, "not idempotent for {:?}", sample);
        }
    }

    #[test]
    fn test_reveal_chunks() {
        assert_eq!(
            reveal_chunks("a b\n\nc"),
            vec!["a", "b", "\n", "", "\n", "c", "\n"]
        );
    }

    #[tokio::test]
    async fn test_render_reveals_with_cursor() {
        let renderer = ResponseRenderer::immediate();
        let mut sink = MemorySink::new();
        let content = renderer.render("Hi there", &mut sink).await;

        assert_eq!(content, "Hi there \n");
        assert_eq!(
            sink.reveals(),
            vec!["Hi ▌", "Hi there ▌", "Hi there \n▌", "Hi there \n"]
        );
    }

    #[tokio::test]
    async fn test_render_custom_cursor() {
        let renderer = ResponseRenderer::new(Box::new(Immediate), "_");
        let mut sink = MemorySink::new();
        renderer.render("ok", &mut sink).await;
        assert_eq!(sink.reveals()[0], "ok _");
    }

    #[tokio::test(start_paused = true)]
    async fn test_fixed_delay_paces_each_chunk() {
        let renderer = ResponseRenderer::new(
            Box::new(FixedDelay::new(Duration::from_millis(20))),
            DEFAULT_CURSOR,
        );
        let mut sink = MemorySink::new();
        let start = tokio::time::Instant::now();
        renderer.render("one two three", &mut sink).await;
        // three words plus the trailing newline chunk
        assert!(start.elapsed() >= Duration::from_millis(80));
    }

    #[test]
    fn test_from_config_zero_delay() {
        let config = RenderConfig {
            reveal_delay_ms: 0,
            cursor: "|".into(),
        };
        let renderer = ResponseRenderer::from_config(&config);
        assert_eq!(renderer.cursor, "|");
    }
}
