//! API request and response types.

use serde::{Deserialize, Serialize};

/// Body of `POST /chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model identifier, e.g. "gpt-4o-mini" or "llama3-70b-8192"
    pub model_name: String,

    /// "openai" or "groq", any case
    pub model_provider: String,

    /// Optional system-level instruction
    #[serde(default)]
    pub system_prompt: String,

    /// Query text; several entries are joined into one user message
    pub messages: Vec<String>,

    /// Whether the agent may use web search
    #[serde(default)]
    pub allow_search: bool,
}

/// Body returned by `POST /chat`: exactly one of `response` or `error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatReply {
    Response(String),
    Error(String),
}

/// One provider in the model catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderModels {
    /// Identifier to send as `model_provider`
    pub id: String,

    /// Human-readable name
    pub name: String,

    /// Models offered for this provider
    pub models: Vec<String>,
}

/// Response of `GET /models`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelCatalog {
    pub providers: Vec<ProviderModels>,

    /// Every model name `POST /chat` accepts
    pub allowed: Vec<String>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}
