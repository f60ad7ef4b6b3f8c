//! Health check endpoint.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::web::error::PageError;
use crate::web::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Live sessions in the store
    pub sessions: usize,
}

pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, PageError> {
    let sessions = state.sessions.store().count().await?;

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        sessions,
    }))
}
