//! Conversational pipeline for Interlink.
//!
//! Normalizes uploads, camera captures, clipboard pastes and recorded voice
//! into ordered content parts, forwards them to the hosted model, and renders
//! the reply with a typing reveal.

pub mod assembler;
pub mod audio;
pub mod commands;
pub mod error;
pub mod gemini;
pub mod model;
pub mod orchestrator;
pub mod response;
pub mod session;
pub mod sink;

pub use assembler::{partition_uploads, InputAssembler, UploadReport};
pub use audio::{audio_hash, AudioOutcome};
pub use commands::{CommandRegistry, CommandTemplate};
pub use error::{ChatError, ModelError};
pub use gemini::{GeminiChatSession, GeminiClient};
pub use model::{ChatModel, MockChatModel};
pub use orchestrator::ChatOrchestrator;
pub use response::{reformat_response, FixedDelay, Immediate, ResponseRenderer, RevealPacer};
pub use session::SessionState;
pub use sink::{MemorySink, PresentationSink, SinkEvent, StatusLevel};
