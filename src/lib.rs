// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod config;
pub mod core;
pub mod error;
pub mod progress;
pub mod record;

pub mod chart;
pub mod compare;
pub mod import;
pub mod remote;
pub mod runner;
pub mod tsv;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::{QualisError, Result};
pub use record::{Record, Tier, TierSet};
