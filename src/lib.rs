pub mod api;
pub mod config;
pub mod constants;
pub mod error;
pub mod lms;
pub mod models;
pub mod report;
pub mod tables;
pub mod validator;
pub mod writer;

#[cfg(test)]
mod tests;

pub use api::*;
pub use config::*;
pub use constants::*;
pub use error::Error;
pub use lms::*;
pub use models::*;
pub use report::*;
pub use tables::*;
pub use validator::*;
pub use writer::*;

use tracing::Level;

/// Installs the global fmt subscriber. `LOG_LEVEL` selects the level, `info` by default.
pub fn init_logging() {
    let level = std::env::var("LOG_LEVEL")
        .ok()
        .and_then(|raw| raw.parse::<Level>().ok())
        .unwrap_or(Level::INFO);

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();
}
