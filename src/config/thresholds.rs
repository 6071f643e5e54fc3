use serde::{Deserialize, Serialize};
use std::env;
use crate::constants::{DEFAULT_LOWER_Z, DEFAULT_UPPER_Z};
use crate::models::MetricKind;
use crate::Error;

/// Inclusive z-score bounds of the normal range for one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricThresholds {
    pub lower_z: f64,
    pub upper_z: f64,
}

impl Default for MetricThresholds {
    fn default() -> Self {
        Self {
            lower_z: DEFAULT_LOWER_Z,
            upper_z: DEFAULT_UPPER_Z,
        }
    }
}

impl MetricThresholds {
    pub fn new(lower_z: f64, upper_z: f64) -> Result<Self, Error> {
        if !(lower_z.is_finite() && upper_z.is_finite()) || lower_z >= upper_z {
            return Err(Error::Config(format!(
                "Normal range must satisfy lower < upper, got {}..{}",
                lower_z, upper_z
            )));
        }
        Ok(Self { lower_z, upper_z })
    }

    fn from_env(prefix: &str) -> Result<Self, Error> {
        let lower_z = read_z(&format!("{}_LOWER_Z", prefix), DEFAULT_LOWER_Z)?;
        let upper_z = read_z(&format!("{}_UPPER_Z", prefix), DEFAULT_UPPER_Z)?;
        Self::new(lower_z, upper_z)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationThresholds {
    pub weight: MetricThresholds,
    pub height: MetricThresholds,
    pub head_circumference: MetricThresholds,
}

impl ClassificationThresholds {
    /// Reads `GROWTH_<METRIC>_LOWER_Z` / `GROWTH_<METRIC>_UPPER_Z`; unset
    /// variables keep the defaults.
    pub fn from_env() -> Result<Self, Error> {
        Ok(Self {
            weight: MetricThresholds::from_env("GROWTH_WEIGHT")?,
            height: MetricThresholds::from_env("GROWTH_HEIGHT")?,
            head_circumference: MetricThresholds::from_env("GROWTH_HEAD_CIRCUMFERENCE")?,
        })
    }

    pub fn for_metric(&self, metric: MetricKind) -> MetricThresholds {
        match metric {
            MetricKind::Weight => self.weight,
            MetricKind::Height => self.height,
            MetricKind::HeadCircumference => self.head_circumference,
        }
    }

    pub fn with_metric(mut self, metric: MetricKind, thresholds: MetricThresholds) -> Self {
        match metric {
            MetricKind::Weight => self.weight = thresholds,
            MetricKind::Height => self.height = thresholds,
            MetricKind::HeadCircumference => self.head_circumference = thresholds,
        }
        self
    }
}

fn read_z(name: &str, default: f64) -> Result<f64, Error> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("Invalid {} format: {}", name, raw))),
        Err(_) => Ok(default),
    }
}
