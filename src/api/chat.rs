//! Chat endpoint and model catalog.

use std::sync::Arc;

use axum::{extract::State, Json};

use super::routes::AppState;
use super::types::{ChatReply, ChatRequest, ModelCatalog, ProviderModels};
use crate::agent::{is_allowed_model, Provider, ALLOWED_MODEL_NAMES};

pub const INVALID_MODEL_MESSAGE: &str = "Invalid model name. Please select a valid AI model.";

/// POST /chat - validate the request and forward it to the agent.
///
/// Always answers 200; failures are reported in the `error` key. Bodies that
/// do not match [`ChatRequest`] are rejected by the extractor.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatReply> {
    if !is_allowed_model(&request.model_name) {
        tracing::info!(model = %request.model_name, "Rejected model outside allow-list");
        return Json(ChatReply::Error(INVALID_MODEL_MESSAGE.to_string()));
    }

    let reply = state
        .agent
        .invoke(
            &request.model_name,
            request.messages,
            request.allow_search,
            &request.system_prompt,
            &request.model_provider,
        )
        .await;

    match reply {
        Ok(response) => Json(ChatReply::Response(response)),
        Err(e) => {
            tracing::info!(provider = %e.provider, "Rejected request: {}", e);
            Json(ChatReply::Error(e.to_string()))
        }
    }
}

/// GET /models - providers and the models offered for each.
pub async fn list_models() -> Json<ModelCatalog> {
    Json(model_catalog())
}

pub fn model_catalog() -> ModelCatalog {
    ModelCatalog {
        providers: Provider::ALL
            .iter()
            .map(|p| ProviderModels {
                id: p.id().to_string(),
                name: p.display_name().to_string(),
                models: p.models().iter().map(|m| m.to_string()).collect(),
            })
            .collect(),
        allowed: ALLOWED_MODEL_NAMES.iter().map(|m| m.to_string()).collect(),
    }
}
