pub mod writer;

pub use writer::*;

use anyhow::Result;
use async_trait::async_trait;
use crate::models::PercentileResult;

/// Destination for resolved measurements kept for historical charting.
#[async_trait]
pub trait MeasurementSink: Send + Sync {
    async fn persist(&self, results: &[PercentileResult]) -> Result<()>;
}
