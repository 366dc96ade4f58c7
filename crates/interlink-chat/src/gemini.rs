//! Gemini `generateContent` client.
//!
//! Keeps the multi-turn history locally and resends it on every call, the
//! way the hosted chat session does.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use interlink_core::config::ModelConfig;
use interlink_core::types::ContentPart;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::model::ChatModel;

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    /// Base64-encoded payload.
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    pub fn inline(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.into(),
                data: BASE64.encode(bytes),
            }),
        }
    }
}

impl From<ContentPart> for Part {
    fn from(part: ContentPart) -> Self {
        match part {
            ContentPart::Inline {
                mime_type, data, ..
            } => Part::inline(mime_type, &data),
            ContentPart::Extracted {
                text, source_name, ..
            } => Part::text(format!("[{}]\n{}", source_name, text)),
            ContentPart::Text { text } => Part::text(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    fn with_role(role: &str, parts: Vec<Part>) -> Self {
        Self {
            role: Some(role.to_string()),
            parts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
    pub response_mime_type: String,
}

impl From<&ModelConfig> for GenerationConfig {
    fn from(config: &ModelConfig) -> Self {
        Self {
            temperature: config.temperature,
            top_p: config.top_p,
            top_k: config.top_k,
            max_output_tokens: config.max_output_tokens,
            response_mime_type: config.response_mime_type.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: &'a [Content],
    system_instruction: &'a Content,
    generation_config: &'a GenerationConfig,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate.
    fn reply_text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        Some(
            content
                .parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect::<String>(),
        )
    }
}

/// Map a non-success HTTP response to a model error.
fn classify_http_error(status: u16, body: &str) -> ModelError {
    let detail = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.status.is_empty() => {
            format!("{}: {}", envelope.error.status, envelope.error.message)
        }
        Ok(envelope) => envelope.error.message,
        Err(_) => body.trim().to_string(),
    };

    let lowered = detail.to_lowercase();
    if status == 429
        || lowered.contains("rate limit")
        || lowered.contains("rate_limit")
        || lowered.contains("resource_exhausted")
    {
        ModelError::RateLimited(detail)
    } else {
        ModelError::Request(format!("HTTP {}: {}", status, detail))
    }
}

// =============================================================================
// Client
// =============================================================================

/// Configured access to a Gemini model.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
    model_name: String,
    generation_config: GenerationConfig,
    system_instruction: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_base", &self.api_base)
            .field("api_key", &"***")
            .field("model_name", &self.model_name)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    pub fn new(config: &ModelConfig, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model_name: config.model_name.clone(),
            generation_config: GenerationConfig::from(config),
            system_instruction: config.system_instruction.clone(),
        }
    }

    /// Read the API key from the environment variable named in the config.
    pub fn from_env(config: &ModelConfig) -> Result<Self, ModelError> {
        match std::env::var(&config.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(config, key.trim())),
            _ => Err(ModelError::MissingApiKey(config.api_key_env.clone())),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base, self.model_name
        )
    }

    /// Open a conversation with empty history.
    pub fn start_chat(&self) -> GeminiChatSession {
        tracing::info!(model = %self.model_name, "Starting chat session");
        GeminiChatSession {
            client: self.clone(),
            history: Vec::new(),
        }
    }
}

/// A conversation against [`GeminiClient`]. History grows only on success.
#[derive(Debug, Clone)]
pub struct GeminiChatSession {
    client: GeminiClient,
    history: Vec<Content>,
}

impl GeminiChatSession {
    pub fn history(&self) -> &[Content] {
        &self.history
    }
}

impl ChatModel for GeminiChatSession {
    async fn send_message(&mut self, parts: Vec<ContentPart>) -> Result<String, ModelError> {
        let user = Content::with_role("user", parts.into_iter().map(Part::from).collect());
        let mut contents = self.history.clone();
        contents.push(user.clone());

        let system_instruction = Content {
            role: None,
            parts: vec![Part::text(self.client.system_instruction.clone())],
        };
        let body = GenerateContentRequest {
            contents: &contents,
            system_instruction: &system_instruction,
            generation_config: &self.client.generation_config,
        };

        tracing::debug!(
            model = %self.client.model_name,
            turns = contents.len(),
            "Sending generateContent request"
        );

        let response = self
            .client
            .http
            .post(self.client.endpoint())
            .header("x-goog-api-key", &self.client.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ModelError::Request(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ModelError::Request(e.to_string()))?;

        if !status.is_success() {
            let err = classify_http_error(status.as_u16(), &text);
            tracing::warn!(status = status.as_u16(), error = %err, "Model request failed");
            return Err(err);
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text)
            .map_err(|e| ModelError::InvalidResponse(e.to_string()))?;
        let reply = parsed
            .reply_text()
            .ok_or_else(|| ModelError::InvalidResponse("response contained no candidates".into()))?;

        self.history.push(user);
        self.history
            .push(Content::with_role("model", vec![Part::text(reply.clone())]));

        tracing::info!(chars = reply.len(), history = self.history.len(), "Model replied");
        Ok(reply)
    }
}
