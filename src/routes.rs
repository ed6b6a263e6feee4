use axum::{Json, extract::State};
use std::sync::Arc;

use crate::{
    error::AppError,
    generator::CodeGenerator,
    models::{GenerationRequest, GenerationResponse, Greeting, StatusCheck, StatusCheckCreate},
    store::{StatusStore, STATUS_LIST_LIMIT},
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StatusStore>,
    pub generator: Arc<CodeGenerator>,
}

pub async fn root() -> Json<Greeting> {
    Json(Greeting { message: "Hello World".to_string() })
}

pub async fn create_status_check(
    State(state): State<AppState>,
    Json(body): Json<StatusCheckCreate>,
) -> Result<Json<StatusCheck>, AppError> {
    let record = StatusCheck::new(body.client_name);
    state.store.insert(&record).await?;
    tracing::info!(id = %record.id, client = %record.client_name, "📝 Status check recorded");
    Ok(Json(record))
}

pub async fn list_status_checks(State(state): State<AppState>) -> Result<Json<Vec<StatusCheck>>, AppError> {
    let records = state.store.list(STATUS_LIST_LIMIT).await?;
    Ok(Json(records))
}

pub async fn generate_code(
    State(state): State<AppState>,
    Json(body): Json<GenerationRequest>,
) -> Result<Json<GenerationResponse>, AppError> {
    let response = state.generator.generate(&body.prompt).await?;
    tracing::info!("✅ Generated {} chars of code for: {}", response.code.len(), response.title);
    Ok(Json(response))
}
