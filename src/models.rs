use serde::{Serialize, Deserialize};
use std::fmt;
use std::str::FromStr;
use crate::Error;
use crate::constants::SD_LEVELS;

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    #[serde(alias = "girl")]
    Female,
    #[serde(alias = "boy")]
    Male,
}

impl Sex {
    pub const ALL: [Sex; 2] = [Sex::Female, Sex::Male];
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::Female => write!(f, "female"),
            Sex::Male => write!(f, "male"),
        }
    }
}

impl FromStr for Sex {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "female" | "girl" | "f" => Ok(Sex::Female),
            "male" | "boy" | "m" => Ok(Sex::Male),
            other => Err(Error::InvalidInput(format!("Unknown sex: {}", other))),
        }
    }
}

/// Unit of the age axis of a reference table.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeUnit {
    Week,
    Month,
}

impl fmt::Display for AgeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgeUnit::Week => write!(f, "week"),
            AgeUnit::Month => write!(f, "month"),
        }
    }
}

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetricKind {
    Weight,
    #[serde(alias = "length")]
    Height,
    #[serde(alias = "head_circumference")]
    HeadCircumference,
}

impl MetricKind {
    pub const ALL: [MetricKind; 3] = [
        MetricKind::Weight,
        MetricKind::Height,
        MetricKind::HeadCircumference,
    ];

    pub fn age_unit(&self) -> AgeUnit {
        match self {
            MetricKind::Weight | MetricKind::Height => AgeUnit::Month,
            MetricKind::HeadCircumference => AgeUnit::Week,
        }
    }

    pub fn measurement_unit(&self) -> &'static str {
        match self {
            MetricKind::Weight => "kg",
            MetricKind::Height | MetricKind::HeadCircumference => "cm",
        }
    }

    /// Human readable name, capitalised for the start of a sentence.
    pub fn label(&self) -> &'static str {
        match self {
            MetricKind::Weight => "Weight",
            MetricKind::Height => "Height",
            MetricKind::HeadCircumference => "Head circumference",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricKind::Weight => write!(f, "weight"),
            MetricKind::Height => write!(f, "height"),
            MetricKind::HeadCircumference => write!(f, "head-circumference"),
        }
    }
}

impl FromStr for MetricKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "weight" => Ok(MetricKind::Weight),
            "height" | "length" => Ok(MetricKind::Height),
            "head-circumference" | "head" => Ok(MetricKind::HeadCircumference),
            other => Err(Error::InvalidInput(format!("Unknown metric: {}", other))),
        }
    }
}

/// Box-Cox power (L), median (M) and coefficient of variation (S).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lms {
    pub l: f64,
    pub m: f64,
    pub s: f64,
}

impl Lms {
    pub fn new(l: f64, m: f64, s: f64) -> Self {
        Self { l, m, s }
    }
}

/// Measurements at SD3neg, SD2neg, SD1neg, SD0, SD1, SD2 and SD3, in that order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SdReference {
    pub points: [f64; 7],
}

impl SdReference {
    pub fn new(points: [f64; 7]) -> Self {
        Self { points }
    }

    pub fn sd0(&self) -> f64 {
        self.points[3]
    }

    pub fn at_level(&self, level: i32) -> Option<f64> {
        SD_LEVELS
            .iter()
            .position(|&l| l == level)
            .map(|idx| self.points[idx])
    }

    pub fn interpolate(&self, upper: &SdReference, fraction: f64) -> SdReference {
        let mut points = [0.0; 7];
        for (idx, point) in points.iter_mut().enumerate() {
            *point = self.points[idx] + fraction * (upper.points[idx] - self.points[idx]);
        }
        SdReference { points }
    }
}

/// Shape of the embedded constant rows: age index, L, M, S and the tabulated SD points.
pub(crate) type LmsRow = (u32, f64, f64, f64, [f64; 7]);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LmsRecord {
    pub age_index: u32,
    pub sex: Sex,
    pub l: f64,
    pub m: f64,
    pub s: f64,
    pub sd: SdReference,
}

impl LmsRecord {
    pub fn new(age_index: u32, sex: Sex, lms: Lms, sd: SdReference) -> Self {
        Self {
            age_index,
            sex,
            l: lms.l,
            m: lms.m,
            s: lms.s,
            sd,
        }
    }

    pub(crate) fn from_row(sex: Sex, row: &LmsRow) -> Self {
        let (age_index, l, m, s, points) = *row;
        Self::new(age_index, sex, Lms::new(l, m, s), SdReference::new(points))
    }

    pub fn lms(&self) -> Lms {
        Lms::new(self.l, self.m, self.s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasurementQuery {
    pub metric: MetricKind,
    pub sex: Sex,
    /// Age in the unit of the metric's table (see [`MetricKind::age_unit`]).
    pub age: f64,
    pub value: f64,
}

impl MeasurementQuery {
    pub fn new(metric: MetricKind, sex: Sex, age: f64, value: f64) -> Self {
        Self { metric, sex, age, value }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !self.value.is_finite() || self.value <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "{} must be a positive number, got {}",
                self.metric.label(),
                self.value
            )));
        }
        if !self.age.is_finite() || self.age < 0.0 {
            return Err(Error::InvalidInput(format!(
                "Age must be a non-negative number of {}s, got {}",
                self.metric.age_unit(),
                self.age
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SdBand {
    BelowSd3Neg,
    Sd3NegToSd2Neg,
    Sd2NegToSd1Neg,
    Sd1NegToSd0,
    Sd0ToSd1,
    Sd1ToSd2,
    Sd2ToSd3,
    AboveSd3,
}

impl SdBand {
    const ORDERED: [SdBand; 8] = [
        SdBand::BelowSd3Neg,
        SdBand::Sd3NegToSd2Neg,
        SdBand::Sd2NegToSd1Neg,
        SdBand::Sd1NegToSd0,
        SdBand::Sd0ToSd1,
        SdBand::Sd1ToSd2,
        SdBand::Sd2ToSd3,
        SdBand::AboveSd3,
    ];

    /// Places `value` among the reference points. A value sitting exactly on a
    /// point belongs to the band above it.
    pub fn classify(value: f64, reference: &SdReference) -> SdBand {
        let passed = reference.points.iter().filter(|&&p| value >= p).count();
        Self::ORDERED[passed]
    }

    pub fn label(&self) -> &'static str {
        match self {
            SdBand::BelowSd3Neg => "below SD3neg",
            SdBand::Sd3NegToSd2Neg => "between SD3neg and SD2neg",
            SdBand::Sd2NegToSd1Neg => "between SD2neg and SD1neg",
            SdBand::Sd1NegToSd0 => "between SD1neg and SD0",
            SdBand::Sd0ToSd1 => "between SD0 and SD1",
            SdBand::Sd1ToSd2 => "between SD1 and SD2",
            SdBand::Sd2ToSd3 => "between SD2 and SD3",
            SdBand::AboveSd3 => "above SD3",
        }
    }
}

impl fmt::Display for SdBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Which tabulated rows produced the parameters of a result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LmsSource {
    Exact(LmsRecord),
    Interpolated {
        lower: LmsRecord,
        upper: LmsRecord,
        fraction: f64,
    },
}

impl LmsSource {
    pub fn is_exact(&self) -> bool {
        matches!(self, LmsSource::Exact(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileResult {
    pub query: MeasurementQuery,
    pub lms: Lms,
    pub sd_reference: SdReference,
    pub z_score: f64,
    /// Standard normal CDF of the z-score, scaled to 0..100.
    pub percentile: f64,
    pub band: SdBand,
    pub source: LmsSource,
    /// Set when the age was clamped to the nearest tabulated bound.
    pub approximate: bool,
}
