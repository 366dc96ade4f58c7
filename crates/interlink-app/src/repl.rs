//! Line parsing for the interactive session.

use std::path::PathBuf;

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Replace the upload set with these files.
    Upload(Vec<PathBuf>),
    /// Paste text as if from the clipboard.
    Paste(String),
    /// Paste an image file as if from the clipboard.
    PasteImage(PathBuf),
    Camera(bool),
    /// Use an image file as the camera capture.
    Snap(PathBuf),
    /// Submit a WAV recording.
    Record(PathBuf),
    Extract,
    Commands,
    History,
    Help,
    Quit,
    /// Toggle a slash command, optionally submitting a prompt right away.
    Command { id: String, prompt: Option<String> },
    Prompt(String),
    Empty,
    Invalid(String),
}

pub const HELP: &str = "\
Type a question and press enter.
  :upload <file>...   replace uploaded files
  :paste <text>       paste text as a file
  :paste-image <file> paste an image
  :camera on|off      enable or disable the camera
  :snap <file>        use an image as the camera capture
  :record <file.wav>  ask a question by voice
  :extract            show text extracted from uploads
  :commands           list slash commands
  :history            show the conversation
  :quit               exit
  /<command> [text]   toggle a command (and send text with it)";

/// Parse one line of user input.
pub fn parse_line(line: &str) -> ReplCommand {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ReplCommand::Empty;
    }

    if let Some(rest) = trimmed.strip_prefix(':') {
        let (verb, arg) = match rest.split_once(char::is_whitespace) {
            Some((verb, arg)) => (verb, arg.trim()),
            None => (rest, ""),
        };
        return match (verb, arg) {
            ("upload", "") | ("paste-image", "") | ("snap", "") | ("record", "") => {
                ReplCommand::Invalid(format!(":{} needs a file path", verb))
            }
            ("upload", files) => {
                ReplCommand::Upload(files.split_whitespace().map(PathBuf::from).collect())
            }
            ("paste", "") => ReplCommand::Invalid(":paste needs some text".into()),
            ("paste", text) => ReplCommand::Paste(text.to_string()),
            ("paste-image", file) => ReplCommand::PasteImage(PathBuf::from(file)),
            ("camera", "on") => ReplCommand::Camera(true),
            ("camera", "off") => ReplCommand::Camera(false),
            ("camera", _) => ReplCommand::Invalid(":camera takes on or off".into()),
            ("snap", file) => ReplCommand::Snap(PathBuf::from(file)),
            ("record", file) => ReplCommand::Record(PathBuf::from(file)),
            ("extract", _) => ReplCommand::Extract,
            ("commands", _) => ReplCommand::Commands,
            ("history", _) => ReplCommand::History,
            ("help", _) => ReplCommand::Help,
            ("quit", _) | ("exit", _) | ("q", _) => ReplCommand::Quit,
            (other, _) => ReplCommand::Invalid(format!("unknown action :{}", other)),
        };
    }

    if trimmed.starts_with('/') {
        let (id, prompt) = match trimmed.split_once(char::is_whitespace) {
            Some((id, rest)) if !rest.trim().is_empty() => (id, Some(rest.trim().to_string())),
            Some((id, _)) => (id, None),
            None => (trimmed, None),
        };
        return ReplCommand::Command {
            id: id.to_string(),
            prompt,
        };
    }

    ReplCommand::Prompt(trimmed.to_string())
}
