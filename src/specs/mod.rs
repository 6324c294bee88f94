// src/specs/mod.rs
//! # Scraping “specs” module
//!
//! Page-specific knowledge of the listing site: *where the ground truth lives
//! in the rendered markup* and *how to read it*.
//!
//! ## What lives here
//! - **Locators** the navigator and paginator hand to the page session (tab
//!   controls, content regions, the "next page" arrow).
//! - **Pure snapshot parsing**: one listing item → one `PaperRecord`, or a
//!   precise list of what was missing.
//!
//! ## What does **not** live here
//! - **Driving the browser** (clicks, waits) – that's `scrape::navigator` and
//!   `scrape::paginate`.
//! - **Retry policy** – specs only report an incomplete page; the paginator
//!   decides what to do with it.
//! - **Persistence** – `file::persist`.
//!
//! ## Typical call chain
//! ```text
//! runner → scrape::paginate → session.current_markup()
//!                          ↘  specs::listing::extract_page(snapshot) → PageOutcome
//! ```
//!
//! ## Testing notes
//! Specs are testable **offline** against markup strings; no session needed.
pub mod listing;
