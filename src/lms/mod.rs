pub mod transform;
pub mod resolver;

pub use transform::*;
pub use resolver::*;
