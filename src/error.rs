// src/error.rs
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    /// A required element never became visible within the bound.
    #[error("Timed out after {waited:?} waiting for {locator} to become visible")]
    Timeout { locator: String, waited: Duration },

    #[error("No element matches {0}")]
    NotFound(String),

    #[error("Category tab '{0}' not found on the listing page")]
    CategoryNotFound(String),

    #[error("Category '{category}': page {page} still incomplete after {attempts} attempts")]
    RetriesExhausted { category: String, page: u32, attempts: u32 },

    #[error("Browser error: {0:#}")]
    Browser(#[from] anyhow::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
