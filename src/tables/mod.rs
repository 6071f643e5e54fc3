pub mod store;
mod weight;
mod height;
mod head_circumference;

pub use store::*;
