use lazy_static::lazy_static;
use crate::tables::ReferenceTable;

/// z levels of the tabulated SD reference points, SD3neg first.
pub const SD_LEVELS: [i32; 7] = [-3, -2, -1, 0, 1, 2, 3];

pub const DEFAULT_LOWER_Z: f64 = -2.0;
pub const DEFAULT_UPPER_Z: f64 = 2.0;

/// Below this magnitude L is treated as zero and the log form of the transform is used.
pub const L_ZERO_TOLERANCE: f64 = 1e-12;

/// Tabulated SD points are rounded to one decimal.
pub const SD_ROUNDING_TOLERANCE: f64 = 0.051;
pub const SIGNIFICANT_SD_DISCREPANCY_PERCENT: f64 = 1.0;

lazy_static! {
    pub static ref REFERENCE_TABLE: ReferenceTable =
        ReferenceTable::embedded().expect("embedded reference data violates table invariants");
}
