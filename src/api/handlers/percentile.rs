use axum::{
    extract::{State, Query},
    response::Json,
    http::StatusCode,
};
use std::sync::Arc;
use tracing::info;
use crate::{
    AppState, MeasurementQuery, PercentileQuery, PercentileResponse,
    api::handlers::common::status_for_error,
};

pub async fn get_percentile(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PercentileQuery>,
) -> Result<Json<PercentileResponse>, StatusCode> {
    let query = MeasurementQuery::new(params.metric, params.sex, params.age, params.value);
    let resolver = state.resolver();

    let outcome = if params.clamp.unwrap_or(false) {
        resolver.resolve_clamped(&query)
    } else {
        resolver.resolve(&query)
    };

    match outcome {
        Ok(result) => {
            let message = state.formatter.format(&result);
            info!(
                "Resolved {}/{} age {} value {}: z = {:.2} ({})",
                query.metric, query.sex, query.age, query.value, result.z_score, message.classification
            );
            Ok(Json(PercentileResponse {
                result: Some(result),
                message,
            }))
        }
        Err(e) if params.lenient.unwrap_or(false) => Ok(Json(PercentileResponse {
            result: None,
            message: state.formatter.format_outcome(&Err(e)),
        })),
        Err(e) => Err(status_for_error(&e)),
    }
}
