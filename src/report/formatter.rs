use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;
use crate::config::ClassificationThresholds;
use crate::models::{PercentileResult, SdBand};
use crate::Error;

const PEDIATRICIAN_ADVICE: &str = "consider discussing this measurement with your pediatrician";

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    BelowNormalRange,
    NormalRange,
    AboveNormalRange,
    Undetermined,
}

impl Classification {
    pub fn label(&self) -> &'static str {
        match self {
            Classification::BelowNormalRange => "below normal range",
            Classification::NormalRange => "normal range",
            Classification::AboveNormalRange => "above normal range",
            Classification::Undetermined => "undetermined",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayMessage {
    pub classification: Classification,
    pub text: String,
    pub z_score: Option<f64>,
    pub percentile: Option<f64>,
    pub band: Option<SdBand>,
    pub approximate: bool,
}

impl DisplayMessage {
    pub fn undetermined() -> Self {
        Self {
            classification: Classification::Undetermined,
            text: "Growth percentile could not be determined".to_string(),
            z_score: None,
            percentile: None,
            band: None,
            approximate: false,
        }
    }
}

/// Turns resolver output into user-facing classifications using per-metric
/// z-score thresholds.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportFormatter {
    thresholds: ClassificationThresholds,
}

impl ReportFormatter {
    pub fn new(thresholds: ClassificationThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &ClassificationThresholds {
        &self.thresholds
    }

    pub fn classify(&self, result: &PercentileResult) -> Classification {
        let bounds = self.thresholds.for_metric(result.query.metric);
        if result.z_score < bounds.lower_z {
            Classification::BelowNormalRange
        } else if result.z_score > bounds.upper_z {
            Classification::AboveNormalRange
        } else {
            Classification::NormalRange
        }
    }

    pub fn format(&self, result: &PercentileResult) -> DisplayMessage {
        let classification = self.classify(result);
        let query = &result.query;

        let mut text = format!(
            "{} of {} {} at {} {} is in the {} (z = {:.2}, percentile {:.1}, {})",
            query.metric.label(),
            query.value,
            query.metric.measurement_unit(),
            query.metric.age_unit(),
            query.age,
            classification,
            result.z_score,
            result.percentile,
            result.band,
        );
        if classification != Classification::NormalRange {
            text.push_str("; ");
            text.push_str(PEDIATRICIAN_ADVICE);
        }
        if result.approximate {
            text.push_str(". Approximate: age is outside the chart and was clamped to its nearest bound");
        }

        DisplayMessage {
            classification,
            text,
            z_score: Some(result.z_score),
            percentile: Some(result.percentile),
            band: Some(result.band),
            approximate: result.approximate,
        }
    }

    /// Degraded path: an error becomes an `Undetermined` message instead of
    /// propagating. Only for callers that explicitly accept that trade.
    pub fn format_outcome(&self, outcome: &Result<PercentileResult, Error>) -> DisplayMessage {
        match outcome {
            Ok(result) => self.format(result),
            Err(e) => {
                warn!("Reporting undetermined growth percentile: {}", e);
                DisplayMessage::undetermined()
            }
        }
    }
}
