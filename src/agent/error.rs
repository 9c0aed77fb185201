//! Classification of agent failures into user-facing messages.

use std::fmt;

use crate::llm::LlmError;

/// Returned when a run completes without any messages.
pub const NO_RESPONSE_MESSAGE: &str = "⚠️ No response received from the agent";

pub const API_KEY_MESSAGE: &str = "⚠️ API key error. Please check your environment variables.";

pub const RATE_LIMIT_MESSAGE: &str = "⚠️ Rate limit reached. Please try again in a moment.";

pub const AGENT_ERROR_PREFIX: &str = "⚠️ Agent Error: ";

/// A failure during model construction or the agent run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentFailure {
    Credential,
    RateLimit,
    Unclassified(String),
}

impl AgentFailure {
    /// Classify a failure.
    ///
    /// HTTP status from an [`LlmError`] in the chain wins. Otherwise the
    /// description is searched for "API key" and then "Rate limit"; matching
    /// on free text is brittle and only kept for errors without a status.
    pub fn classify(err: &anyhow::Error) -> Self {
        let status = err
            .chain()
            .find_map(|cause| cause.downcast_ref::<LlmError>())
            .and_then(LlmError::status);

        match status {
            Some(401) => return Self::Credential,
            Some(429) => return Self::RateLimit,
            _ => {}
        }

        let description = format!("{:#}", err);
        if description.contains("API key") {
            Self::Credential
        } else if description.contains("Rate limit") {
            Self::RateLimit
        } else {
            Self::Unclassified(description)
        }
    }
}

impl fmt::Display for AgentFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Credential => f.write_str(API_KEY_MESSAGE),
            Self::RateLimit => f.write_str(RATE_LIMIT_MESSAGE),
            Self::Unclassified(description) => write!(f, "{}{}", AGENT_ERROR_PREFIX, description),
        }
    }
}
