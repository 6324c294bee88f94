// src/config/options.rs
use std::path::PathBuf;
use std::time::Duration;

use super::consts::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrapeOptions {
    pub base_url: String,
    pub out_dir: PathBuf,
    /// Processed in order, one output table each.
    pub categories: Vec<String>,
    pub headless: bool,
    pub timeouts: Timeouts,
    pub retry: RetryPolicy,
    /// Stop the whole run at the first failed category.
    pub fail_fast: bool,
    pub download_pdfs: bool,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            base_url: s!(DEFAULT_BASE_URL),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            categories: DEFAULT_CATEGORIES.iter().map(|c| s!(*c)).collect(),
            headless: true,
            timeouts: Timeouts::default(),
            retry: RetryPolicy::default(),
            fail_fast: false,
            download_pdfs: false,
        }
    }
}

impl ScrapeOptions {
    /// `<out_dir>/<category>.csv`
    pub fn csv_path(&self, category: &str) -> PathBuf {
        self.out_dir.join(join!(category, ".", CSV_EXT))
    }

    /// `<out_dir>/<category>/`, where PDFs for that category land.
    pub fn pdf_dir(&self, category: &str) -> PathBuf {
        self.out_dir.join(category)
    }

    /// Category names double as file stems, so they must be plain names.
    pub fn validate(&self) -> Result<(), String> {
        if self.categories.is_empty() {
            return Err(s!("No categories to process"));
        }
        for c in &self.categories {
            if c.is_empty() || c == "." || c == ".." || c.contains(['/', '\\']) {
                return Err(format!("Invalid category name: {c:?}"));
            }
        }
        Ok(())
    }
}

/// Bounded waits used by the navigator and the paginator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Timeouts {
    /// Initial listing load (the tab container becoming visible).
    pub listing: Duration,
    /// Tab activation and every page change.
    pub visible: Duration,
    pub poll: Duration,
    pub settle: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            listing: Duration::from_secs(LISTING_TIMEOUT_SECS),
            visible: Duration::from_secs(VISIBLE_TIMEOUT_SECS),
            poll: Duration::from_millis(POLL_INTERVAL_MS),
            settle: Duration::from_millis(SETTLE_MS),
        }
    }
}

/// How often an incomplete page may be re-extracted.
///
/// The default has no cap: a page that never renders completely is retried
/// forever. Set `max_page_retries` to turn that into a category failure.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_page_retries: Option<u32>,
}

impl RetryPolicy {
    pub fn unbounded() -> Self {
        Self { max_page_retries: None }
    }

    pub fn capped(max: u32) -> Self {
        Self { max_page_retries: Some(max) }
    }

    /// May the current page be retried once more, given `spent` retries so far?
    pub fn allows(&self, spent: u32) -> bool {
        self.max_page_retries.is_none_or(|max| spent < max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_path_is_named_after_category() {
        let opts = ScrapeOptions { out_dir: PathBuf::from("data"), ..Default::default() };
        assert_eq!(opts.csv_path("accept-poster"), PathBuf::from("data").join("accept-poster.csv"));
    }

    #[test]
    fn validate_rejects_path_like_categories() {
        let mut opts = ScrapeOptions::default();
        assert!(opts.validate().is_ok());
        opts.categories = vec![s!("../escape")];
        assert!(opts.validate().is_err());
        opts.categories = vec![];
        assert!(opts.validate().is_err());
    }

    #[test]
    fn retry_policy_caps() {
        assert!(RetryPolicy::unbounded().allows(u32::MAX - 1));
        let capped = RetryPolicy::capped(2);
        assert!(capped.allows(0));
        assert!(capped.allows(1));
        assert!(!capped.allows(2));
        assert!(!RetryPolicy::capped(0).allows(0));
    }
}
