//! Chat orchestrator: central coordinator wiring session state, input
//! assembly, audio intake, the model and the renderer.
//!
//! Every mutating operation takes `&mut self`, so one user action completes
//! before the next one starts.

use interlink_core::config::{InterlinkConfig, UploadConfig};
use interlink_core::types::{
    CameraCapture, ClipboardContent, ContentPart, PreviewKind, Turn, UploadedArtifact,
};
use interlink_extract::classifier::extension_for_mime;
use interlink_extract::{detect_file_type, ContentExtractor};
use interlink_ocr::OcrService;
use interlink_speech::TranscriptionService;

use crate::assembler::{partition_uploads, InputAssembler, UploadReport};
use crate::audio::{audio_hash, transcribe_clip, AudioOutcome};
use crate::commands::{CommandRegistry, CommandTemplate};
use crate::error::{ChatError, AUDIO_HINT};
use crate::model::ChatModel;
use crate::response::ResponseRenderer;
use crate::session::SessionState;
use crate::sink::{PresentationSink, StatusLevel};

const CAMERA_SOURCE_NAME: &str = "camera.jpg";

/// Central coordinator for one conversation session.
pub struct ChatOrchestrator<M: ChatModel, T: TranscriptionService, O: OcrService> {
    session: SessionState,
    commands: CommandRegistry,
    assembler: InputAssembler,
    extractor: ContentExtractor<O>,
    renderer: ResponseRenderer,
    model: M,
    transcriber: T,
    uploads: UploadConfig,
}

impl<M: ChatModel, T: TranscriptionService, O: OcrService> ChatOrchestrator<M, T, O> {
    /// Start a session. The greeting is the first turn.
    pub fn new(model: M, transcriber: T, ocr: O, config: &InterlinkConfig) -> Self {
        Self {
            session: SessionState::with_greeting(&config.chat.greeting),
            commands: CommandRegistry::with_extras(&config.chat.commands),
            assembler: InputAssembler::new(),
            extractor: ContentExtractor::new(ocr).with_max_bytes(config.uploads.max_bytes),
            renderer: ResponseRenderer::from_config(&config.render),
            model,
            transcriber,
            uploads: config.uploads.clone(),
        }
    }

    /// Replace the renderer (e.g. with an unpaced one).
    pub fn with_renderer(mut self, renderer: ResponseRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn turns(&self) -> &[Turn] {
        self.session.turns()
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn transcriber(&self) -> &T {
        &self.transcriber
    }

    // =========================================================================
    // Uploads
    // =========================================================================

    /// Replace the active upload set with the acceptable subset of `artifacts`.
    pub fn upload<S: PresentationSink + ?Sized>(
        &mut self,
        artifacts: Vec<UploadedArtifact>,
        sink: &mut S,
    ) -> UploadReport {
        let (accepted, report) = partition_uploads(artifacts, &self.uploads);
        self.report_rejections(&report, sink);

        for artifact in &accepted {
            preview_artifact(artifact, sink);
        }
        if let Some(message) = report.success_message() {
            sink.status(StatusLevel::Success, &message);
        }

        tracing::info!(
            accepted = report.accepted.len(),
            oversized = report.oversized.len(),
            unsupported = report.unsupported.len(),
            "Upload set replaced"
        );
        self.session.replace_uploads(accepted);
        report
    }

    /// Add pasted clipboard content to the active upload set.
    pub fn paste_clipboard<S: PresentationSink + ?Sized>(
        &mut self,
        content: ClipboardContent,
        sink: &mut S,
    ) -> UploadReport {
        let index = self.session.next_clipboard_index();
        let artifact = match content {
            ClipboardContent::Text(text) => {
                UploadedArtifact::new(format!("clipboard-{}.txt", index), text.into_bytes())
            }
            ClipboardContent::Image { data, mime_type } => {
                let ext = extension_for_mime(&mime_type).unwrap_or("bin");
                UploadedArtifact::new(format!("clipboard-{}.{}", index, ext), data)
            }
        };

        let (accepted, report) = partition_uploads(vec![artifact], &self.uploads);
        self.report_rejections(&report, sink);
        for artifact in accepted {
            preview_artifact(&artifact, sink);
            sink.status(
                StatusLevel::Success,
                &format!("Pasted {} from clipboard", artifact.name),
            );
            self.session.push_clipboard_upload(artifact);
        }
        report
    }

    fn report_rejections<S: PresentationSink + ?Sized>(&self, report: &UploadReport, sink: &mut S) {
        if let Some(warning) = report.oversized_warning() {
            sink.status(StatusLevel::Warning, &warning);
        }
        if let Some(warning) = report.unsupported_warning() {
            sink.status(StatusLevel::Warning, &warning);
        }
    }

    /// Extracted text parts for the current uploads (local analysis path).
    pub async fn extract_uploads(&self) -> Vec<ContentPart> {
        self.assembler
            .extract_parts(&self.extractor, self.session.uploads())
            .await
    }

    // =========================================================================
    // Camera
    // =========================================================================

    /// Enable or disable the camera. A change discards the captured image.
    pub fn set_camera_enabled(&mut self, enabled: bool) -> bool {
        let changed = self.session.set_camera_enabled(enabled);
        if changed {
            tracing::info!(enabled, "Camera toggled");
        }
        changed
    }

    /// Store a camera capture. Only possible while the camera is enabled.
    pub fn capture_camera<S: PresentationSink + ?Sized>(
        &mut self,
        data: Vec<u8>,
        sink: &mut S,
    ) -> Result<(), ChatError> {
        if !self.session.camera_enabled() {
            return Err(ChatError::CameraDisabled);
        }
        let capture = CameraCapture::jpeg(data);
        sink.preview(CAMERA_SOURCE_NAME, &capture.mime_type, PreviewKind::Image);
        sink.status(
            StatusLevel::Success,
            "Image captured! You can now ask about the image.",
        );
        self.session.set_camera_image(capture);
        Ok(())
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Toggle a command by id. Returns the command armed afterwards, if any.
    pub fn toggle_command(&mut self, id: &str) -> Result<Option<&CommandTemplate>, ChatError> {
        if !self.commands.contains(id) {
            return Err(ChatError::UnknownCommand(id.to_string()));
        }
        let armed = self.session.toggle_command(id).map(str::to_string);
        tracing::debug!(id, armed = armed.as_deref(), "Command toggled");
        Ok(armed.and_then(|armed| self.commands.get(&armed)))
    }

    // =========================================================================
    // Prompt submission
    // =========================================================================

    /// Send a typed prompt with the current uploads and camera image.
    ///
    /// Returns the assistant turn. On model failure the user turn stays in
    /// the log and the error is reported to the sink with a hint.
    pub async fn submit_prompt<S: PresentationSink + ?Sized>(
        &mut self,
        prompt: &str,
        sink: &mut S,
    ) -> Result<Turn, ChatError> {
        if prompt.trim().is_empty() {
            return Err(ChatError::EmptyPrompt);
        }

        let command = self
            .session
            .take_armed_command()
            .and_then(|id| self.commands.get(&id).cloned());
        let parts = self.assembler.assemble(
            prompt,
            command.as_ref(),
            self.session.uploads(),
            self.session.camera_image(),
        )?;

        let user_turn = self.session.append_turn(Turn::user(prompt));
        sink.turn_appended(user_turn);

        let result = self.respond(parts, sink).await;
        if let Err(ref e) = result {
            sink.status(StatusLevel::Error, &format!("An error occurred: {}", e));
            if let Some(hint) = e.hint() {
                sink.status(StatusLevel::Warning, hint);
            }
        }

        if self.session.camera_image().is_some() && !self.session.camera_enabled() {
            self.session.clear_camera_image();
        }
        result
    }

    /// Call the model, reveal the reply and append the assistant turn.
    async fn respond<S: PresentationSink + ?Sized>(
        &mut self,
        parts: Vec<ContentPart>,
        sink: &mut S,
    ) -> Result<Turn, ChatError> {
        let reply = self.model.send_message(parts).await?;
        let content = self.renderer.render(&reply, sink).await;
        let turn = self.session.append_turn(Turn::assistant(content)).clone();
        sink.turn_appended(&turn);
        Ok(turn)
    }

    // =========================================================================
    // Voice
    // =========================================================================

    /// Transcribe a recording and ask the model about it.
    ///
    /// A clip whose hash was already answered is ignored. Failures before the
    /// answer leave the hash unmarked so the clip can be retried.
    pub async fn submit_recording<S: PresentationSink + ?Sized>(
        &mut self,
        bytes: &[u8],
        sink: &mut S,
    ) -> Result<AudioOutcome, ChatError> {
        let hash = audio_hash(bytes);
        if self.session.is_audio_processed(&hash) {
            tracing::debug!(%hash, "Recording already processed");
            return Ok(AudioOutcome::AlreadyProcessed);
        }

        let result = self.answer_recording(bytes, &hash, sink).await;
        if let Err(ref e) = result {
            tracing::warn!(%hash, error = %e, "Recording not answered");
            sink.status(
                StatusLevel::Error,
                &format!("An error occurred while processing the audio: {}", e),
            );
            sink.status(StatusLevel::Warning, AUDIO_HINT);
        }
        result
    }

    async fn answer_recording<S: PresentationSink + ?Sized>(
        &mut self,
        bytes: &[u8],
        hash: &str,
        sink: &mut S,
    ) -> Result<AudioOutcome, ChatError> {
        sink.status(StatusLevel::Info, "Converting speech to text...");
        let transcript = transcribe_clip(&self.transcriber, bytes).await?;
        sink.status(StatusLevel::Success, "Speech converted to text!");
        sink.status(
            StatusLevel::Info,
            &format!("Transcribed text: {}", transcript),
        );

        let user_turn = self.session.append_turn(Turn::user(transcript.clone()));
        sink.turn_appended(user_turn);

        let reply = self
            .respond(vec![ContentPart::text(transcript.clone())], sink)
            .await?;
        self.session.mark_audio_processed(hash);

        Ok(AudioOutcome::Answered { transcript, reply })
    }
}

fn preview_artifact<S: PresentationSink + ?Sized>(artifact: &UploadedArtifact, sink: &mut S) {
    let mime_type = detect_file_type(&artifact.name);
    let kind = PreviewKind::from_mime(&mime_type);
    sink.preview(&artifact.name, &mime_type, kind);
}
