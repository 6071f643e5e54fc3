use axum::{
    extract::{State, Query},
    response::Json,
    http::StatusCode,
};
use std::sync::Arc;
use tracing::info;
use crate::{
    AppState, TableQuery, ReferenceTableResponse,
    api::handlers::common::status_for_error,
};

pub async fn get_reference_table(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TableQuery>,
) -> Result<Json<ReferenceTableResponse>, StatusCode> {
    let records = state
        .table
        .partition(params.metric, params.sex)
        .map_err(|e| status_for_error(&e))?;

    info!(
        "Serving {} reference rows for {}/{}",
        records.len(), params.metric, params.sex
    );

    Ok(Json(ReferenceTableResponse {
        metric: params.metric,
        sex: params.sex,
        age_unit: params.metric.age_unit(),
        records: records.to_vec(),
    }))
}
