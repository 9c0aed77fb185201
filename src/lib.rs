//! # Agent Relay
//!
//! Relays a chat request to a hosted LLM (OpenAI or Groq), optionally letting
//! the model search the web, and returns the reply.
//!
//! This library provides:
//! - An HTTP API (`POST /chat`) plus a browser form served at `/`
//! - A tool-using agent loop over an OpenAI-compatible client
//! - Client helpers for the interactive terminal client
//!
//! ## Architecture
//!
//! Each request is independent:
//! 1. Validate the model name and resolve the provider
//! 2. Bind a model for this request and attach web search if allowed
//! 3. Run the agent loop until the model answers
//! 4. Return the reply, or a readable message describing the failure
//!
//! ## Example
//!
//! ```rust,ignore
//! use agent_relay::{agent::AgentService, config::Config};
//!
//! let config = Config::from_env()?;
//! let agent = AgentService::from_config(&config);
//! let reply = agent
//!     .invoke("gpt-4o-mini", "Summarise today's Rust news", true, "", "openai")
//!     .await?;
//! ```

pub mod agent;
pub mod api;
pub mod client;
pub mod config;
pub mod llm;
pub mod tools;

pub use config::Config;
