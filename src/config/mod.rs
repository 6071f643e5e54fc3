pub mod thresholds;

pub use thresholds::*;
