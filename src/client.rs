//! Interactive client support.
//!
//! A [`ChatForm`] carries the same fields as [`ChatRequest`]. It is submitted
//! either to an in-process [`AgentService`] or to a running server, and the
//! result is always reduced to an [`Outcome`] for display; no failure path
//! escapes [`Backend::submit`].

use serde_json::Value;

use crate::agent::{AgentService, Provider};
use crate::api::types::ChatRequest;

pub const UNEXPECTED_FORMAT_MESSAGE: &str = "⚠️ Unexpected response format";

/// Values collected from the user.
#[derive(Debug, Clone)]
pub struct ChatForm {
    pub system_prompt: String,
    pub provider: Provider,
    pub model_name: String,
    pub allow_search: bool,
    pub query: String,
}

impl ChatForm {
    /// Whether there is anything to send.
    pub fn is_submittable(&self) -> bool {
        !self.query.trim().is_empty()
    }

    pub fn to_request(&self) -> ChatRequest {
        ChatRequest {
            model_name: self.model_name.clone(),
            model_provider: self.provider.id().to_string(),
            system_prompt: self.system_prompt.clone(),
            messages: vec![self.query.clone()],
            allow_search: self.allow_search,
        }
    }
}

/// What to show the user after a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Reply(String),
    Error(String),
}

/// Client for a remote `POST /chat` endpoint.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn chat_url(&self) -> String {
        format!("{}/chat", self.base_url)
    }

    /// Send the request and return the raw JSON body.
    pub async fn chat(&self, request: &ChatRequest) -> anyhow::Result<Value> {
        let response = self
            .client
            .post(self.chat_url())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("HTTP {}: {}", status, text.trim()));
        }

        Ok(response.json().await?)
    }
}

/// Where submissions go.
pub enum Backend {
    InProcess(AgentService),
    Remote(RemoteClient),
}

impl Backend {
    /// Submit the form once and reduce the result to an [`Outcome`].
    pub async fn submit(&self, form: &ChatForm) -> Outcome {
        match self {
            Backend::InProcess(agent) => {
                let result = agent
                    .invoke(
                        &form.model_name,
                        form.query.as_str(),
                        form.allow_search,
                        &form.system_prompt,
                        form.provider.id(),
                    )
                    .await;
                match result {
                    Ok(text) => Outcome::Reply(format_reply(&text)),
                    Err(e) => Outcome::Error(format!("⚠️ Error: {}", e)),
                }
            }
            Backend::Remote(client) => match client.chat(&form.to_request()).await {
                Ok(body) => interpret_body(&body),
                Err(e) => {
                    tracing::debug!("Chat request failed: {:#}", e);
                    Outcome::Error(format!("⚠️ Error: {}", e))
                }
            },
        }
    }
}

/// Interpret a `/chat` response body.
pub fn interpret_body(body: &Value) -> Outcome {
    if let Some(error) = body.get("error") {
        let message = error
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Outcome::Error(message);
    }

    match body.get("response").and_then(Value::as_str) {
        Some(text) => Outcome::Reply(format_reply(text)),
        None => Outcome::Error(UNEXPECTED_FORMAT_MESSAGE.to_string()),
    }
}

/// Turn escaped `\n` sequences into real line breaks.
pub fn format_reply(text: &str) -> String {
    text.replace("\\n", "\n")
}
