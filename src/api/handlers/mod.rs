pub mod common;
pub mod health;
pub mod percentile;
pub mod tables;

pub use health::health_check;
pub use percentile::get_percentile;
pub use tables::get_reference_table;
