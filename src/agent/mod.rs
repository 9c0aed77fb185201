//! Agent module - turns a chat request into a model reply.
//!
//! The agent follows a "tools in a loop" pattern:
//! 1. Resolve the provider and bind a model for this request
//! 2. Attach web search when the request allows it and it is available
//! 3. Call the model; if it requests a tool, execute it and feed the result back
//! 4. Repeat until the model produces a final answer or max iterations is reached
//!
//! Failures after provider resolution are folded into a reply string by
//! [`AgentService::invoke`].

mod agent_loop;
mod conversation;
mod error;
mod provider;
mod service;

pub use agent_loop::{AgentState, Orchestrator, ReactAgent, ReactOrchestrator, RunnableAgent};
pub use conversation::{build_conversation, Query};
pub use error::{
    AgentFailure, AGENT_ERROR_PREFIX, API_KEY_MESSAGE, NO_RESPONSE_MESSAGE, RATE_LIMIT_MESSAGE,
};
pub use provider::{
    is_allowed_model, BoundModel, HostedModels, InvalidProviderError, ModelFactory, Provider,
    ProviderSpec, ALLOWED_MODEL_NAMES,
};
pub use service::AgentService;
