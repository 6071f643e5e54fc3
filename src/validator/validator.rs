use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};
use crate::constants::{SD_LEVELS, SD_ROUNDING_TOLERANCE, SIGNIFICANT_SD_DISCREPANCY_PERCENT};
use crate::models::LmsRecord;
use crate::tables::ReferenceTable;

/// A tabulated SD point that disagrees with the one derived from its row's L/M/S.
#[derive(Debug, Clone, Serialize)]
pub struct SdDiscrepancy {
    pub age_index: u32,
    pub level: i32,
    pub tabulated: f64,
    pub derived: f64,
    pub difference: f64,
    pub difference_percent: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationStats {
    pub records_checked: usize,
    pub points_checked: usize,
    pub max_difference: f64,
    pub max_difference_percent: f64,
    pub discrepancies: Vec<SdDiscrepancy>,
}

impl ValidationStats {
    pub fn is_clean(&self) -> bool {
        self.discrepancies.is_empty()
    }

    pub fn is_significant(&self) -> bool {
        self.discrepancies
            .iter()
            .any(|d| d.difference_percent > SIGNIFICANT_SD_DISCREPANCY_PERCENT)
    }
}

pub struct TableValidator<'a> {
    table: &'a ReferenceTable,
}

impl<'a> TableValidator<'a> {
    pub fn new(table: &'a ReferenceTable) -> Self {
        Self { table }
    }

    /// Stats per partition, keyed `metric/sex`.
    pub fn validate_all(&self) -> BTreeMap<String, ValidationStats> {
        let mut results = BTreeMap::new();

        for (metric, sex, records) in self.table.partitions() {
            let key = format!("{}/{}", metric, sex);
            let stats = validate_partition(records);
            debug!(
                "{}: {} records, max SD difference {:.4} ({:.2}%)",
                key, stats.records_checked, stats.max_difference, stats.max_difference_percent
            );
            results.insert(key, stats);
        }

        info!("Validated {} reference partitions", results.len());
        results
    }
}

pub fn validate_partition(records: &[LmsRecord]) -> ValidationStats {
    let mut stats = ValidationStats::default();

    for record in records {
        let derived = record.lms().sd_reference();
        stats.records_checked += 1;

        for (idx, &level) in SD_LEVELS.iter().enumerate() {
            let tabulated = record.sd.points[idx];
            let expected = derived.points[idx];
            let difference = (tabulated - expected).abs();
            let difference_percent = if expected > 0.0 {
                difference / expected * 100.0
            } else {
                0.0
            };
            stats.points_checked += 1;

            if difference > stats.max_difference {
                stats.max_difference = difference;
            }
            if difference_percent > stats.max_difference_percent {
                stats.max_difference_percent = difference_percent;
            }

            if difference > SD_ROUNDING_TOLERANCE {
                stats.discrepancies.push(SdDiscrepancy {
                    age_index: record.age_index,
                    level,
                    tabulated,
                    derived: expected,
                    difference,
                    difference_percent,
                });
            }
        }
    }

    stats
}
