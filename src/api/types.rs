use serde::{Deserialize, Serialize};
use crate::models::{AgeUnit, LmsRecord, MetricKind, PercentileResult, Sex};
use crate::report::DisplayMessage;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
    pub partitions: usize,
}

#[derive(Debug, Deserialize)]
pub struct PercentileQuery {
    pub metric: MetricKind,
    pub sex: Sex,
    pub age: f64,
    pub value: f64,
    /// Substitute the nearest tabulated age when `age` is outside the chart.
    pub clamp: Option<bool>,
    /// Answer errors with an undetermined message instead of an error status.
    pub lenient: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct PercentileResponse {
    pub result: Option<PercentileResult>,
    pub message: DisplayMessage,
}

#[derive(Debug, Deserialize)]
pub struct TableQuery {
    pub metric: MetricKind,
    pub sex: Sex,
}

#[derive(Debug, Serialize)]
pub struct ReferenceTableResponse {
    pub metric: MetricKind,
    pub sex: Sex,
    pub age_unit: AgeUnit,
    pub records: Vec<LmsRecord>,
}
