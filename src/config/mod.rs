//! Statutory rate configuration for the payroll engine.
//!
//! This module provides the year-specific [`StatutoryRateTable`], built-in
//! tables for recent years, per-employer [`RateOverrides`], and a loader for
//! tables kept in YAML files.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::RateTableLoader;
//!
//! let loader = RateTableLoader::load("./config/rates").unwrap();
//! println!("Loaded tax years: {:?}", loader.years());
//! ```

mod loader;
mod types;

pub use loader::RateTableLoader;
pub use types::{RateOverrides, StatutoryRateTable};
