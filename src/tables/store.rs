use std::collections::BTreeMap;
use itertools::Itertools;
use tracing::debug;
use crate::models::{LmsRecord, LmsRow, MetricKind, Sex};
use crate::Error;
use super::{head_circumference, height, weight};

/// Outcome of a table lookup: the tabulated row itself, or the two rows
/// bracketing an age that falls between tabulated points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TableLookup<'a> {
    Exact(&'a LmsRecord),
    Between {
        lower: &'a LmsRecord,
        upper: &'a LmsRecord,
    },
}

/// Immutable LMS reference data keyed by (metric, sex). Each partition is
/// sorted by strictly ascending age index.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    partitions: BTreeMap<(MetricKind, Sex), Vec<LmsRecord>>,
}

impl ReferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the table from the compiled-in charts.
    pub fn embedded() -> Result<Self, Error> {
        let sources: [(MetricKind, Sex, &[LmsRow]); 5] = [
            (MetricKind::Weight, Sex::Female, weight::WEIGHT_GIRLS),
            (MetricKind::Weight, Sex::Male, weight::WEIGHT_BOYS),
            (MetricKind::Height, Sex::Female, height::HEIGHT_GIRLS),
            (MetricKind::Height, Sex::Male, height::HEIGHT_BOYS),
            (MetricKind::HeadCircumference, Sex::Female, head_circumference::HEAD_CIRCUMFERENCE_GIRLS),
        ];

        let table = sources
            .iter()
            .try_fold(Self::new(), |table, (metric, sex, rows)| {
                let records = rows
                    .iter()
                    .map(|row| LmsRecord::from_row(*sex, row))
                    .collect();
                table.with_partition(*metric, *sex, records)
            })?;

        debug!("Loaded {} reference partitions", table.partitions.len());
        Ok(table)
    }

    /// Adds a partition after checking its invariants.
    pub fn with_partition(
        mut self,
        metric: MetricKind,
        sex: Sex,
        records: Vec<LmsRecord>,
    ) -> Result<Self, Error> {
        if self.partitions.contains_key(&(metric, sex)) {
            return Err(Error::InvalidTable(format!(
                "Duplicate partition {}/{}",
                metric, sex
            )));
        }
        if records.is_empty() {
            return Err(Error::InvalidTable(format!(
                "Partition {}/{} has no records",
                metric, sex
            )));
        }

        for record in &records {
            check_record(metric, sex, record)?;
        }

        if let Some((prev, next)) = records
            .iter()
            .tuple_windows()
            .find(|(prev, next)| prev.age_index >= next.age_index)
        {
            return Err(Error::InvalidTable(format!(
                "Partition {}/{} is not strictly ascending: age {} followed by {}",
                metric, sex, prev.age_index, next.age_index
            )));
        }

        self.partitions.insert((metric, sex), records);
        Ok(self)
    }

    pub fn partition(&self, metric: MetricKind, sex: Sex) -> Result<&[LmsRecord], Error> {
        self.partitions
            .get(&(metric, sex))
            .map(Vec::as_slice)
            .ok_or(Error::UnknownPartition { metric, sex })
    }

    /// Iterates partitions ordered by metric, then sex.
    pub fn partitions(&self) -> impl Iterator<Item = (MetricKind, Sex, &[LmsRecord])> {
        self.partitions
            .iter()
            .map(|((metric, sex), records)| (*metric, *sex, records.as_slice()))
    }

    pub fn contains(&self, metric: MetricKind, sex: Sex) -> bool {
        self.partitions.contains_key(&(metric, sex))
    }

    /// Smallest and largest tabulated age of a partition.
    pub fn bounds(&self, metric: MetricKind, sex: Sex) -> Result<(u32, u32), Error> {
        let records = self.partition(metric, sex)?;
        match (records.first(), records.last()) {
            (Some(first), Some(last)) => Ok((first.age_index, last.age_index)),
            _ => Err(Error::UnknownPartition { metric, sex }),
        }
    }

    pub fn lookup(&self, metric: MetricKind, sex: Sex, age: f64) -> Result<TableLookup<'_>, Error> {
        if !age.is_finite() {
            return Err(Error::InvalidInput(format!("Age must be finite, got {}", age)));
        }

        let records = self.partition(metric, sex)?;
        let (min, max) = self.bounds(metric, sex)?;
        if age < min as f64 || age > max as f64 {
            return Err(Error::OutOfRange { metric, sex, age, min, max });
        }

        // age <= max, so idx always points at a record
        let idx = records.partition_point(|r| (r.age_index as f64) < age);
        let candidate = &records[idx];
        if candidate.age_index as f64 == age {
            return Ok(TableLookup::Exact(candidate));
        }

        Ok(TableLookup::Between {
            lower: &records[idx - 1],
            upper: candidate,
        })
    }
}

fn check_record(metric: MetricKind, sex: Sex, record: &LmsRecord) -> Result<(), Error> {
    let context = || format!("{}/{} age {}", metric, sex, record.age_index);

    if record.sex != sex {
        return Err(Error::InvalidTable(format!(
            "{}: record is tagged {}",
            context(),
            record.sex
        )));
    }
    if !record.l.is_finite() {
        return Err(Error::InvalidTable(format!("{}: L must be finite", context())));
    }
    if !(record.m.is_finite() && record.m > 0.0) {
        return Err(Error::InvalidTable(format!("{}: M must be positive, got {}", context(), record.m)));
    }
    if !(record.s.is_finite() && record.s > 0.0) {
        return Err(Error::InvalidTable(format!("{}: S must be positive, got {}", context(), record.s)));
    }
    if record.sd.points.iter().any(|p| !p.is_finite())
        || record.sd.points.iter().tuple_windows().any(|(a, b)| a > b)
    {
        return Err(Error::InvalidTable(format!(
            "{}: SD reference points must be finite and non-decreasing",
            context()
        )));
    }
    Ok(())
}
