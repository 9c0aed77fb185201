//! Supported providers and model construction.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::config::Config;
use crate::llm::{ChatMessage, ChatResponse, LlmClient, LlmError, OpenAiCompatibleClient, ToolSchema};

/// Model names the HTTP service accepts.
pub const ALLOWED_MODEL_NAMES: [&str; 4] = [
    "llama3-70b-8192",
    "mixtral-8x7b-32768",
    "llama-3.3-70b-versatile",
    "gpt-4o-mini",
];

pub fn is_allowed_model(model_name: &str) -> bool {
    ALLOWED_MODEL_NAMES.contains(&model_name)
}

/// A hosted LLM provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Groq,
}

/// Static description of a provider.
#[derive(Debug)]
pub struct ProviderSpec {
    pub provider: Provider,
    /// Identifier accepted case-insensitively in requests
    pub id: &'static str,
    pub display_name: &'static str,
    pub api_key_env: &'static str,
    pub base_url_env: &'static str,
    pub default_base_url: &'static str,
    /// Models offered by the clients' model selector
    pub models: &'static [&'static str],
}

/// Provider table, indexed by `Provider as usize`.
static PROVIDERS: [ProviderSpec; 2] = [
    ProviderSpec {
        provider: Provider::OpenAi,
        id: "openai",
        display_name: "OpenAI",
        api_key_env: "OPENAI_API_KEY",
        base_url_env: "OPENAI_BASE_URL",
        default_base_url: "https://api.openai.com/v1",
        models: &["gpt-4o-mini"],
    },
    ProviderSpec {
        provider: Provider::Groq,
        id: "groq",
        display_name: "Groq",
        api_key_env: "GROQ_API_KEY",
        base_url_env: "GROQ_BASE_URL",
        default_base_url: "https://api.groq.com/openai/v1",
        models: &["llama-3.3-70b-versatile", "mixtral-8x7b-32768"],
    },
];

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::OpenAi, Provider::Groq];

    pub fn spec(self) -> &'static ProviderSpec {
        &PROVIDERS[self as usize]
    }

    pub fn id(self) -> &'static str {
        self.spec().id
    }

    pub fn display_name(self) -> &'static str {
        self.spec().display_name
    }

    pub fn models(self) -> &'static [&'static str] {
        self.spec().models
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// The requested provider is not one we support.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid provider! Please choose 'OpenAI' or 'Groq'.")]
pub struct InvalidProviderError {
    pub provider: String,
}

impl FromStr for Provider {
    type Err = InvalidProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        PROVIDERS
            .iter()
            .find(|spec| spec.id.eq_ignore_ascii_case(wanted))
            .map(|spec| spec.provider)
            .ok_or_else(|| InvalidProviderError {
                provider: s.to_string(),
            })
    }
}

/// An LLM client bound to one provider and model.
#[derive(Clone)]
pub struct BoundModel {
    pub provider: Provider,
    pub model: String,
    llm: Arc<dyn LlmClient>,
}

impl BoundModel {
    pub fn new(provider: Provider, model: impl Into<String>, llm: Arc<dyn LlmClient>) -> Self {
        Self {
            provider,
            model: model.into(),
            llm,
        }
    }

    pub async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: Option<&[ToolSchema]>,
    ) -> Result<ChatResponse, LlmError> {
        self.llm.chat_completion(&self.model, messages, tools).await
    }
}

impl fmt::Debug for BoundModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundModel")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

/// Builds a fresh model capability for each request.
#[async_trait]
pub trait ModelFactory: Send + Sync {
    async fn build(&self, provider: Provider, model_name: &str) -> anyhow::Result<BoundModel>;
}

/// Models served by the hosted provider APIs.
#[derive(Debug, Clone)]
pub struct HostedModels {
    config: Config,
}

impl HostedModels {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ModelFactory for HostedModels {
    async fn build(&self, provider: Provider, model_name: &str) -> anyhow::Result<BoundModel> {
        let client = OpenAiCompatibleClient::new(
            provider.display_name(),
            self.config.base_url(provider),
            self.config.api_key(provider),
        );
        Ok(BoundModel::new(provider, model_name, Arc::new(client)))
    }
}
