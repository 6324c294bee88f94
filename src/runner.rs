// src/runner.rs
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};
use url::Url;

use crate::{
    config::consts::PDF_EXT,
    config::options::{RetryPolicy, ScrapeOptions, Timeouts},
    core::{net, sanitize::sanitize_filename},
    error::{Result, ScrapeError},
    file::{ensure_directory, persist, resolve_filename},
    progress::Progress,
    scrape::{self, PaginationReport},
    session::{PageSession, SessionGuard},
    store::CategoryTable,
};

/// Everything one run needs, passed explicitly to navigator and paginator.
#[derive(Clone, Debug)]
pub struct RunContext {
    pub base_url: Url,
    pub timeouts: Timeouts,
    pub retry: RetryPolicy,
}

impl RunContext {
    pub fn from_options(opts: &ScrapeOptions) -> Result<Self> {
        Ok(Self {
            base_url: Url::parse(&opts.base_url)?,
            timeouts: opts.timeouts.clone(),
            retry: opts.retry,
        })
    }
}

/// One category that made it to disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryReport {
    pub category: String,
    pub path: PathBuf,
    pub records: usize,
    pub pages: u32,
    pub retries: u32,
    pub pdfs: usize,
}

/// Summary of what was produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub written: Vec<CategoryReport>,
    /// (category, reason)
    pub failed: Vec<(String, String)>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Top-level runner: every category in order, against one shared session.
///
/// A failing category is logged, reported through `progress`, and skipped;
/// the rest still run unless `opts.fail_fast` is set. The session is closed
/// on every way out of this function.
pub fn run<S: PageSession + ?Sized>(
    session: &mut S,
    opts: &ScrapeOptions,
    mut progress: Option<&mut (dyn Progress + '_)>,
) -> Result<RunSummary> {
    let mut session = SessionGuard::new(session);

    opts.validate().map_err(ScrapeError::Config)?;
    let ctx = RunContext::from_options(opts)?;
    ensure_directory(&opts.out_dir)?;

    if let Some(p) = progress.as_deref_mut() {
        p.begin(opts.categories.len());
    }

    let mut summary = RunSummary::default();
    for category in &opts.categories {
        match scrape_category(&mut *session, &ctx, category, progress.as_deref_mut()) {
            Ok((table, report)) => {
                let path = opts.csv_path(category);
                if let Err(e) = persist(&table, &path) {
                    fail(&mut summary, progress.as_deref_mut(), category, &e);
                    if opts.fail_fast { break; }
                    continue;
                }
                info!(category = %category, records = table.len(), path = %path.display(), "Table written");

                let pdfs = if opts.download_pdfs {
                    let n = download_pdfs(&table, &opts.pdf_dir(category));
                    if let Some(p) = progress.as_deref_mut() {
                        p.log(&format!("{category}: {n}/{} PDFs saved", table.len()));
                    }
                    n
                } else {
                    0
                };

                if let Some(p) = progress.as_deref_mut() {
                    p.item_done(category, &path, table.len());
                }
                summary.written.push(CategoryReport {
                    category: category.clone(),
                    path,
                    records: report.records,
                    pages: report.state.current_page,
                    retries: report.retries,
                    pdfs,
                });
            }
            Err(e) => {
                fail(&mut summary, progress.as_deref_mut(), category, &e);
                if opts.fail_fast {
                    warn!("Stopping after failed category (fail-fast)");
                    break;
                }
            }
        }
    }

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    Ok(summary)
}

/// Fresh load, tab selection, then every page. Nothing is written here.
pub fn scrape_category<S: PageSession + ?Sized>(
    session: &mut S,
    ctx: &RunContext,
    category: &str,
    progress: Option<&mut (dyn Progress + '_)>,
) -> Result<(CategoryTable, PaginationReport)> {
    let mut table = CategoryTable::new(category);
    scrape::open_listing(session, ctx)?;
    scrape::select_category(session, ctx, category)?;
    let report = scrape::paginate(session, ctx, &mut table, progress)?;
    Ok((table, report))
}

fn fail(summary: &mut RunSummary, progress: Option<&mut (dyn Progress + '_)>, category: &str, e: &ScrapeError) {
    error!(category = %category, "Category failed: {e}");
    if let Some(p) = progress {
        p.item_failed(category, &e.to_string());
    }
    summary.failed.push((s!(category), e.to_string()));
}

/// Best effort: a paper whose PDF cannot be fetched is logged and skipped.
fn download_pdfs(table: &CategoryTable, dir: &Path) -> usize {
    let client = match net::http_client() {
        Ok(c) => c,
        Err(e) => {
            error!("HTTP client setup failed, skipping PDFs: {e}");
            return 0;
        }
    };

    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut fetched = 0;
    for (i, record) in table.records().iter().enumerate() {
        let Some(pdf) = net::pdf_url(record.url()) else {
            warn!(url = record.url(), "No PDF link for paper");
            continue;
        };
        let stem = sanitize_filename(record.name(), &format!("paper_{}", i + 1));
        let path = resolve_filename(dir, &stem, &mut seen, PDF_EXT);
        match net::download_to_file(&client, &pdf, &path) {
            Ok(bytes) => {
                fetched += 1;
                info!(bytes, path = %path.display(), "PDF saved");
            }
            Err(e) => warn!(url = %pdf, "PDF download failed: {e}"),
        }
    }
    fetched
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_rejects_bad_base_url() {
        let opts = ScrapeOptions { base_url: s!("not a url"), ..Default::default() };
        assert!(matches!(RunContext::from_options(&opts), Err(ScrapeError::Url(_))));
    }

    #[test]
    fn failed_pdf_only_skips_that_paper() {
        use crate::core::net::local_http::serve;
        use crate::store::PaperRecord;

        let (base, server) = serve(vec![("/pdf?id=1", b"one".to_vec()), ("/pdf?id=3", b"three".to_vec())], 3);
        let mut table = CategoryTable::new("accept-oral");
        for (id, title) in [(1, "Paper A"), (2, "Paper B"), (3, "Paper A")] {
            let url = format!("{base}/forum?id={id}");
            table.append(PaperRecord::new("accept-oral", title, "a", "k", "p", url));
        }
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("accept-oral");

        let fetched = download_pdfs(&table, &dir);

        server.join().unwrap();
        assert_eq!(fetched, 2);
        assert_eq!(std::fs::read(dir.join("Paper_A.pdf")).unwrap(), b"one");
        assert_eq!(std::fs::read(dir.join("Paper_A (2).pdf")).unwrap(), b"three");
        assert!(!dir.join("Paper_B.pdf").exists());
    }
}
