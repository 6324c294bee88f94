// src/config/consts.rs

// Site
pub const DEFAULT_BASE_URL: &str = "https://openreview.net/group?id=ICLR.cc/2024/Conference#tab-accept-oral";
pub const DEFAULT_CATEGORIES: [&str; 3] = ["accept-oral", "accept-spotlight", "accept-poster"];

// Export
pub const DEFAULT_OUT_DIR: &str = "out";
pub const CSV_EXT: &str = "csv";
pub const PDF_EXT: &str = "pdf";
pub const CSV_HEADER: [&str; 6] = ["status", "Name", "Abstract", "Keywords", "Primary Area", "URL"];

// Waits
pub const LISTING_TIMEOUT_SECS: u64 = 120;
pub const VISIBLE_TIMEOUT_SECS: u64 = 30;
pub const POLL_INTERVAL_MS: u64 = 250;
pub const SETTLE_MS: u64 = 1_000; // after each click, before the next snapshot

// Download
pub const CHUNK_SIZE: usize = 1024;
pub const HTTP_TIMEOUT_SECS: u64 = 60;
