// src/progress.rs
use std::path::Path;

/// Lightweight progress reporting for a scrape run.
/// The CLI implements this to print status lines; tests use it to observe order.
pub trait Progress {
    /// Called at the start with the number of categories.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// A page snapshot is about to be extracted (also on retries).
    fn page_start(&mut self, _category: &str, _page: u32) {}

    /// A page was committed to the table.
    fn page_done(&mut self, _category: &str, _page: u32, _records: usize) {}

    /// One category finished and its table was written to `path`.
    fn item_done(&mut self, _category: &str, _path: &Path, _records: usize) {}

    /// One category was aborted.
    fn item_failed(&mut self, _category: &str, _reason: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// Prints one line per event to stdout.
#[derive(Default)]
pub struct ConsoleProgress {
    total: usize,
    done: usize,
    failed: usize,
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        println!("Scraping {total} categories");
    }

    fn log(&mut self, msg: &str) {
        println!("{msg}");
    }

    fn page_start(&mut self, category: &str, page: u32) {
        println!("Parsing papers from {category} page {page}");
    }

    fn item_done(&mut self, category: &str, path: &Path, records: usize) {
        self.done += 1;
        println!("[{}/{}] {category}: {records} papers → {}", self.done + self.failed, self.total, path.display());
    }

    fn item_failed(&mut self, category: &str, reason: &str) {
        self.failed += 1;
        println!("[{}/{}] {category}: FAILED ({reason})", self.done + self.failed, self.total);
    }

    fn finish(&mut self) {
        println!("Done: {} written, {} failed", self.done, self.failed);
    }
}
