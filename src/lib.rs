//! Convert gold-standard spectral scan exports into tidy CSV: one row per
//! (observation, wavelength) pair, enriched with category metadata.

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod tidy;

pub use app::{run, Conversion};
pub use config::TidyConfig;
pub use error::{TidyError, TidyResult};
