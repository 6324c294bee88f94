// src/lib.rs

#[macro_use]
pub mod macros;

pub mod cli;
pub mod config;
pub mod core;
pub mod csv;
pub mod error;
pub mod file;
pub mod log;
pub mod progress;
pub mod runner;
pub mod scrape;
pub mod session;
pub mod specs;
pub mod store;

pub use error::{Result, ScrapeError};
pub use runner::{run, RunContext, RunSummary};
