//! HTTP API.
//!
//! ## Endpoints
//!
//! - `POST /chat` - Run one chat turn; returns `{"response": ...}` or `{"error": ...}`
//! - `GET /models` - Providers and the models offered for each
//! - `GET /health` - Health check
//! - `GET /` - Browser form for `/chat`

pub mod chat;
mod routes;
pub mod types;
mod ui;

pub use routes::{router, serve, AppState};
