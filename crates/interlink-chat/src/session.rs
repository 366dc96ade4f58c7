//! Explicit per-session conversation state.
//!
//! Every mutation goes through a method here; nothing else holds session data.

use std::collections::HashSet;

use interlink_core::types::{CameraCapture, Turn, UploadedArtifact};

/// State of one conversation session.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    turns: Vec<Turn>,
    armed_command: Option<String>,
    processed_audio: HashSet<String>,
    uploads: Vec<UploadedArtifact>,
    camera_enabled: bool,
    camera_image: Option<CameraCapture>,
    clipboard_pastes: usize,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// New session opened by an assistant greeting.
    pub fn with_greeting(greeting: &str) -> Self {
        let mut state = Self::new();
        state.append_turn(Turn::assistant(greeting));
        state
    }

    // -------------------------------------------------------------------------
    // Turn log (append-only)
    // -------------------------------------------------------------------------

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn append_turn(&mut self, turn: Turn) -> &Turn {
        tracing::debug!(role = %turn.role, chars = turn.content.len(), "Turn appended");
        self.turns.push(turn);
        &self.turns[self.turns.len() - 1]
    }

    // -------------------------------------------------------------------------
    // Armed command
    // -------------------------------------------------------------------------

    pub fn armed_command(&self) -> Option<&str> {
        self.armed_command.as_deref()
    }

    /// Arm `id`, replacing any other armed command. Re-arming the armed
    /// command disarms it. Returns the command armed afterwards.
    pub fn toggle_command(&mut self, id: &str) -> Option<&str> {
        if self.armed_command.as_deref() == Some(id) {
            self.armed_command = None;
        } else {
            self.armed_command = Some(id.to_string());
        }
        self.armed_command.as_deref()
    }

    /// Disarm and return the armed command.
    pub fn take_armed_command(&mut self) -> Option<String> {
        self.armed_command.take()
    }

    // -------------------------------------------------------------------------
    // Processed audio
    // -------------------------------------------------------------------------

    pub fn is_audio_processed(&self, hash: &str) -> bool {
        self.processed_audio.contains(hash)
    }

    /// Returns `false` if the hash was already recorded.
    pub fn mark_audio_processed(&mut self, hash: impl Into<String>) -> bool {
        self.processed_audio.insert(hash.into())
    }

    pub fn processed_audio_count(&self) -> usize {
        self.processed_audio.len()
    }

    // -------------------------------------------------------------------------
    // Uploads
    // -------------------------------------------------------------------------

    pub fn uploads(&self) -> &[UploadedArtifact] {
        &self.uploads
    }

    pub fn replace_uploads(&mut self, uploads: Vec<UploadedArtifact>) {
        self.uploads = uploads;
    }

    /// 1-based index the next accepted clipboard paste will be named with.
    pub fn next_clipboard_index(&self) -> usize {
        self.clipboard_pastes + 1
    }

    /// Append an accepted clipboard paste, consuming its index.
    pub fn push_clipboard_upload(&mut self, upload: UploadedArtifact) {
        self.clipboard_pastes += 1;
        self.uploads.push(upload);
    }

    // -------------------------------------------------------------------------
    // Camera
    // -------------------------------------------------------------------------

    pub fn camera_enabled(&self) -> bool {
        self.camera_enabled
    }

    /// Toggling the camera discards any captured image. Returns whether the
    /// setting changed.
    pub fn set_camera_enabled(&mut self, enabled: bool) -> bool {
        if self.camera_enabled == enabled {
            return false;
        }
        self.camera_enabled = enabled;
        self.camera_image = None;
        true
    }

    pub fn camera_image(&self) -> Option<&CameraCapture> {
        self.camera_image.as_ref()
    }

    pub fn set_camera_image(&mut self, capture: CameraCapture) {
        self.camera_image = Some(capture);
    }

    pub fn clear_camera_image(&mut self) {
        self.camera_image = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use interlink_core::types::Role;

    #[test]
    fn test_greeting_is_first_turn() {
        let state = SessionState::with_greeting("Hello!");
        assert_eq!(state.turns().len(), 1);
        assert_eq!(state.turns()[0].role, Role::Assistant);
        assert_eq!(state.turns()[0].content, "Hello!");
    }

    #[test]
    fn test_turns_keep_insertion_order() {
        let mut state = SessionState::new();
        state.append_turn(Turn::user("one"));
        state.append_turn(Turn::assistant("two"));
        state.append_turn(Turn::user("three"));
        let contents: Vec<&str> = state.turns().iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_toggle_replaces_and_disarms() {
        let mut state = SessionState::new();
        assert_eq!(state.toggle_command("/a"), Some("/a"));
        assert_eq!(state.toggle_command("/b"), Some("/b"));
        assert_eq!(state.armed_command(), Some("/b"));
        assert_eq!(state.toggle_command("/b"), None);
        assert_eq!(state.armed_command(), None);
    }

    #[test]
    fn test_take_armed_command_consumes() {
        let mut state = SessionState::new();
        state.toggle_command("/a");
        assert_eq!(state.take_armed_command().as_deref(), Some("/a"));
        assert_eq!(state.take_armed_command(), None);
    }

    #[test]
    fn test_audio_hashes() {
        let mut state = SessionState::new();
        assert!(!state.is_audio_processed("abc"));
        assert!(state.mark_audio_processed("abc"));
        assert!(!state.mark_audio_processed("abc"));
        assert!(state.is_audio_processed("abc"));
        assert_eq!(state.processed_audio_count(), 1);
    }

    #[test]
    fn test_camera_toggle_clears_image() {
        let mut state = SessionState::new();
        assert!(state.set_camera_enabled(true));
        state.set_camera_image(CameraCapture::jpeg(vec![1, 2, 3]));
        assert!(!state.set_camera_enabled(true));
        assert!(state.camera_image().is_some());
        assert!(state.set_camera_enabled(false));
        assert!(state.camera_image().is_none());
    }

    #[test]
    fn test_clipboard_index_advances_on_push() {
        let mut state = SessionState::new();
        assert_eq!(state.next_clipboard_index(), 1);
        assert_eq!(state.next_clipboard_index(), 1);
        state.push_clipboard_upload(UploadedArtifact::new("clipboard-1.txt", b"x".to_vec()));
        assert_eq!(state.next_clipboard_index(), 2);
        assert_eq!(state.uploads().len(), 1);
    }
}
