use axum::extract::State;
use axum::response::{Json, IntoResponse};
use axum::http::StatusCode;
use std::sync::Arc;
use time::OffsetDateTime;
use crate::{AppState, HealthResponse};

pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "OK",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: OffsetDateTime::now_utc().to_string(),
        partitions: state.table.partitions().count(),
    };

    (StatusCode::OK, Json(response))
}
