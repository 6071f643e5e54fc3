use tracing::{debug, warn};
use crate::constants::REFERENCE_TABLE;
use crate::lms::percentile_from_z;
use crate::models::{LmsSource, MeasurementQuery, MetricKind, PercentileResult, SdBand, Sex};
use crate::tables::{ReferenceTable, TableLookup};
use crate::Error;

/// Computes z-scores and SD bands against a reference table. Holds no state
/// of its own; every call is a pure function of the query and the table.
#[derive(Debug, Clone, Copy)]
pub struct PercentileResolver<'a> {
    table: &'a ReferenceTable,
}

impl Default for PercentileResolver<'static> {
    fn default() -> Self {
        Self::new(&REFERENCE_TABLE)
    }
}

impl<'a> PercentileResolver<'a> {
    pub fn new(table: &'a ReferenceTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'a ReferenceTable {
        self.table
    }

    /// Resolves a query strictly: ages outside the table fail with `OutOfRange`.
    pub fn resolve(&self, query: &MeasurementQuery) -> Result<PercentileResult, Error> {
        query.validate()?;
        let lookup = self.table.lookup(query.metric, query.sex, query.age)?;
        Ok(evaluate(query, lookup, false))
    }

    /// Like [`resolve`](Self::resolve), but an age outside the table is
    /// replaced by the nearest tabulated bound and the result is flagged
    /// approximate.
    pub fn resolve_clamped(&self, query: &MeasurementQuery) -> Result<PercentileResult, Error> {
        query.validate()?;
        match self.table.lookup(query.metric, query.sex, query.age) {
            Ok(lookup) => Ok(evaluate(query, lookup, false)),
            Err(Error::OutOfRange { min, max, .. }) => {
                let nearest = if query.age < min as f64 { min } else { max };
                warn!(
                    "Age {} outside {}..={} for {}/{}, clamping to {}",
                    query.age, min, max, query.metric, query.sex, nearest
                );
                let lookup = self.table.lookup(query.metric, query.sex, nearest as f64)?;
                Ok(evaluate(query, lookup, true))
            }
            Err(e) => Err(e),
        }
    }

    /// Resolves each query independently.
    pub fn resolve_batch(
        &self,
        queries: &[MeasurementQuery],
        clamp: bool,
    ) -> Vec<Result<PercentileResult, Error>> {
        queries
            .iter()
            .map(|query| {
                if clamp {
                    self.resolve_clamped(query)
                } else {
                    self.resolve(query)
                }
            })
            .collect()
    }

    /// Measurement sitting at `z` for the given age, through the same lookup
    /// and interpolation path as [`resolve`](Self::resolve).
    pub fn value_for_z(&self, metric: MetricKind, sex: Sex, age: f64, z: f64) -> Result<f64, Error> {
        if !z.is_finite() {
            return Err(Error::InvalidInput(format!("z-score must be finite, got {}", z)));
        }
        if !age.is_finite() || age < 0.0 {
            return Err(Error::InvalidInput(format!("Age must be non-negative, got {}", age)));
        }

        let lms = match self.table.lookup(metric, sex, age)? {
            TableLookup::Exact(record) => record.lms(),
            TableLookup::Between { lower, upper } => {
                lower.lms().interpolate(&upper.lms(), fraction(age, lower.age_index, upper.age_index))
            }
        };

        lms.value_at_z(z).ok_or_else(|| {
            Error::InvalidInput(format!(
                "No {} measurement corresponds to z = {} at age {}",
                metric, z, age
            ))
        })
    }
}

fn fraction(age: f64, lower: u32, upper: u32) -> f64 {
    (age - lower as f64) / (upper as f64 - lower as f64)
}

fn evaluate(query: &MeasurementQuery, lookup: TableLookup<'_>, approximate: bool) -> PercentileResult {
    let (lms, sd_reference, source) = match lookup {
        TableLookup::Exact(record) => {
            let lms = record.lms();
            (lms, lms.sd_reference(), LmsSource::Exact(*record))
        }
        TableLookup::Between { lower, upper } => {
            let fraction = fraction(query.age, lower.age_index, upper.age_index);
            (
                lower.lms().interpolate(&upper.lms(), fraction),
                lower.sd.interpolate(&upper.sd, fraction),
                LmsSource::Interpolated {
                    lower: *lower,
                    upper: *upper,
                    fraction,
                },
            )
        }
    };

    let z_score = lms.z_score(query.value);
    let band = SdBand::classify(query.value, &sd_reference);

    debug!(
        "{}/{} age {} value {}: z = {:.4}, {}",
        query.metric, query.sex, query.age, query.value, z_score, band
    );

    PercentileResult {
        query: *query,
        lms,
        sd_reference,
        z_score,
        percentile: percentile_from_z(z_score),
        band,
        source,
        approximate,
    }
}
