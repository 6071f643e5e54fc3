use axum::http::StatusCode;
use tracing::{error, warn};
use crate::Error;

/// HTTP status for an engine error. Input and range problems are the
/// caller's; a missing partition is reported as not found.
pub fn status_for_error(err: &Error) -> StatusCode {
    match err {
        Error::InvalidInput(_) => {
            warn!("Rejected measurement: {}", err);
            StatusCode::BAD_REQUEST
        }
        Error::OutOfRange { .. } => {
            warn!("Measurement outside reference range: {}", err);
            StatusCode::UNPROCESSABLE_ENTITY
        }
        Error::UnknownPartition { .. } => {
            warn!("Missing reference partition: {}", err);
            StatusCode::NOT_FOUND
        }
        _ => {
            error!("Failed to resolve measurement: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
