// src/scrape/mod.rs
//! Driving the live page: pick the category tab, then walk its pages.
pub mod navigator;
pub mod paginate;

pub use navigator::{open_listing, select_category};
pub use paginate::{paginate, PaginationReport, PaginationState};
