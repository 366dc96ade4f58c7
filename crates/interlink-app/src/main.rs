//! Interlink terminal client - composition root.
//!
//! 1. Parse CLI flags and load configuration from TOML
//! 2. Build the model, speech and OCR backends
//! 3. Run an interactive session on stdin, rendering to stdout

mod backends;
mod cli;
mod console;
mod repl;

use std::path::Path;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use interlink_chat::{
    ChatError, ChatOrchestrator, GeminiClient, Immediate, PresentationSink, ResponseRenderer,
    StatusLevel,
};
use interlink_core::config::InterlinkConfig;
use interlink_core::types::{ClipboardContent, UploadedArtifact};
use interlink_extract::detect_file_type;
use interlink_ocr::{TesseractConfig, TesseractOcrService};

use backends::{EchoModel, ModelBackend, SpeechBackend};
use cli::CliArgs;
use console::ConsoleSink;
use repl::{parse_line, ReplCommand, HELP};

type Orchestrator = ChatOrchestrator<ModelBackend, SpeechBackend, TesseractOcrService>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let config_file = args.resolve_config_path();
    let config = InterlinkConfig::load_or_default(&config_file);

    // Tracing. RUST_LOG wins over the resolved level.
    let level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting Interlink v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration resolved");

    if args.write_config {
        config.save(&config_file)?;
        println!("Configuration written to {}", config_file.display());
        return Ok(());
    }

    // Model.
    let model = if args.offline {
        tracing::info!("Offline mode: replies come from the local echo model");
        ModelBackend::Echo(EchoModel)
    } else {
        let client = GeminiClient::from_env(&config.model)?;
        tracing::info!(model = client.model_name(), "Hosted model ready");
        ModelBackend::Gemini(client.start_chat())
    };

    // Speech and OCR.
    let transcriber = SpeechBackend::load(&config.speech);
    let ocr = TesseractOcrService::new(TesseractConfig::from(&config.ocr));

    let renderer = if args.no_reveal {
        ResponseRenderer::new(Box::new(Immediate), config.render.cursor.clone())
    } else {
        ResponseRenderer::from_config(&config.render)
    };
    let mut orchestrator =
        ChatOrchestrator::new(model, transcriber, ocr, &config).with_renderer(renderer);
    let mut sink = ConsoleSink::new(std::io::stdout(), config.render.cursor.clone());

    for turn in orchestrator.turns() {
        println!("interlink> {}", turn.content);
    }
    println!("Type :help for actions.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            ReplCommand::Quit => break,
            command => handle(&mut orchestrator, command, &mut sink).await,
        }
    }

    tracing::info!(turns = orchestrator.turns().len(), "Session ended");
    Ok(())
}

/// Run one parsed action against the session.
async fn handle<S: PresentationSink>(
    orchestrator: &mut Orchestrator,
    command: ReplCommand,
    sink: &mut S,
) {
    match command {
        ReplCommand::Empty | ReplCommand::Quit => {}
        ReplCommand::Invalid(message) => sink.status(StatusLevel::Warning, &message),
        ReplCommand::Help => println!("{}", HELP),

        ReplCommand::Upload(paths) => {
            let mut artifacts = Vec::with_capacity(paths.len());
            for path in &paths {
                match read_artifact(path).await {
                    Ok(artifact) => artifacts.push(artifact),
                    Err(e) => sink.status(
                        StatusLevel::Error,
                        &format!("Could not read {}: {}", path.display(), e),
                    ),
                }
            }
            orchestrator.upload(artifacts, sink);
        }
        ReplCommand::Paste(text) => {
            orchestrator.paste_clipboard(ClipboardContent::Text(text), sink);
        }
        ReplCommand::PasteImage(path) => match read_artifact(&path).await {
            Ok(artifact) => {
                let mime_type = detect_file_type(&artifact.name);
                orchestrator.paste_clipboard(
                    ClipboardContent::Image {
                        data: artifact.raw_bytes,
                        mime_type,
                    },
                    sink,
                );
            }
            Err(e) => sink.status(
                StatusLevel::Error,
                &format!("Could not read {}: {}", path.display(), e),
            ),
        },

        ReplCommand::Camera(enabled) => {
            orchestrator.set_camera_enabled(enabled);
            let state = if enabled { "enabled" } else { "disabled" };
            sink.status(StatusLevel::Info, &format!("Camera {}", state));
        }
        ReplCommand::Snap(path) => match tokio::fs::read(&path).await {
            Ok(bytes) => {
                if let Err(e) = orchestrator.capture_camera(bytes, sink) {
                    sink.status(StatusLevel::Warning, &e.to_string());
                }
            }
            Err(e) => sink.status(
                StatusLevel::Error,
                &format!("Could not read {}: {}", path.display(), e),
            ),
        },
        ReplCommand::Record(path) => match tokio::fs::read(&path).await {
            // Failures are reported by the orchestrator.
            Ok(bytes) => {
                let _ = orchestrator.submit_recording(&bytes, sink).await;
            }
            Err(e) => sink.status(
                StatusLevel::Error,
                &format!("Could not read {}: {}", path.display(), e),
            ),
        },

        ReplCommand::Extract => {
            let parts = orchestrator.extract_uploads().await;
            if parts.is_empty() {
                sink.status(StatusLevel::Info, "No text could be extracted from the uploads");
            }
            for part in parts {
                println!(
                    "--- {} ({}) ---",
                    part.source_name().unwrap_or("input"),
                    part.mime_type()
                );
                println!("{}", part.as_text().unwrap_or_default());
            }
        }
        ReplCommand::Commands => {
            for command in orchestrator.commands().iter() {
                println!("{:<20} {}", command.id, command.description);
            }
        }
        ReplCommand::History => {
            for turn in orchestrator.turns() {
                println!("[{}] {}", turn.role, turn.content);
            }
        }

        ReplCommand::Command { id, prompt } => {
            match orchestrator.toggle_command(&id) {
                Ok(Some(command)) => {
                    sink.status(StatusLevel::Info, &format!("{} armed", command.id))
                }
                Ok(None) => sink.status(StatusLevel::Info, &format!("{} cleared", id)),
                Err(e) => {
                    sink.status(StatusLevel::Warning, &e.to_string());
                    return;
                }
            }
            if let Some(prompt) = prompt {
                submit(orchestrator, &prompt, sink).await;
            }
        }
        ReplCommand::Prompt(prompt) => submit(orchestrator, &prompt, sink).await,
    }
}

async fn submit<S: PresentationSink>(
    orchestrator: &mut Orchestrator,
    prompt: &str,
    sink: &mut S,
) {
    match orchestrator.submit_prompt(prompt, sink).await {
        Ok(_) => {}
        // Already reported with a hint.
        Err(ChatError::Model(_)) => {}
        Err(e) => sink.status(StatusLevel::Warning, &e.to_string()),
    }
}

async fn read_artifact(path: &Path) -> std::io::Result<UploadedArtifact> {
    let bytes = tokio::fs::read(path).await?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    Ok(UploadedArtifact::new(name, bytes))
}
