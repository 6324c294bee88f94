// src/scrape/paginate.rs
//! The pagination/extraction loop for one active category.
//!
//! ```text
//! LoadingPage ──snapshot──▶ ExtractingItems ──complete──▶ AdvancingPage ──no next──▶ Done
//!      ▲                        │                            │
//!      └──────── RetryPage ◀────┘ incomplete / stale         └──next clicked──▶ LoadingPage
//! ```
//!
//! A page is committed all-or-nothing: one incomplete item throws the whole
//! snapshot away and the same page is snapshotted again. The page counter only
//! moves after a commit. Timeouts while waiting for the next page propagate and
//! end the category; incomplete pages never do, unless a retry cap is set.

use std::fmt;

use tracing::{debug, info, warn};

use crate::core::Snapshot;
use crate::error::{Result, ScrapeError};
use crate::progress::Progress;
use crate::runner::RunContext;
use crate::session::PageSession;
use crate::specs::listing::{self, MissingField, PageOutcome};
use crate::store::{CategoryTable, PaperRecord};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaginationState {
    /// 1-based; the page currently shown.
    pub current_page: u32,
    pub has_next_page: bool,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self { current_page: 1, has_next_page: false }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaginationReport {
    pub state: PaginationState,
    /// Records committed by this run of the loop.
    pub records: usize,
    /// Snapshots discarded across all pages.
    pub retries: u32,
}

/// Discarded snapshots: on the current page, and across the category.
/// Saturating, since unbounded retry is the default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct RetryCount {
    page: u32,
    total: u32,
}

impl RetryCount {
    fn record(&mut self) {
        self.page = self.page.saturating_add(1);
        self.total = self.total.saturating_add(1);
    }

    fn page_committed(&mut self) {
        self.page = 0;
    }

    /// Snapshots taken of the current page, the failing one included.
    fn attempts(&self) -> u32 {
        self.page.saturating_add(1)
    }
}

enum Step {
    LoadingPage,
    ExtractingItems(String),
    RetryPage(RetryReason),
    AdvancingPage(Vec<PaperRecord>),
    Done,
}

enum RetryReason {
    Incomplete { item: usize, title: String, missing: Vec<MissingField> },
    RegionMissing,
    /// Same records as the page before: the click has not re-rendered yet.
    Stale,
}

impl fmt::Display for RetryReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryReason::Incomplete { item, title, missing } => {
                let fields: Vec<String> = missing.iter().map(ToString::to_string).collect();
                write!(f, "item {} ({title:?}) missing {}", item + 1, fields.join(", "))
            }
            RetryReason::RegionMissing => f.write_str("category region not rendered"),
            RetryReason::Stale => f.write_str("page not re-rendered yet"),
        }
    }
}

/// Walk every page of the active category, appending complete pages to `table`.
/// The category tab must already be selected (`navigator::select_category`).
pub fn paginate<S: PageSession + ?Sized>(
    session: &mut S,
    ctx: &RunContext,
    table: &mut CategoryTable,
    mut progress: Option<&mut (dyn Progress + '_)>,
) -> Result<PaginationReport> {
    let category = s!(table.status());
    let region = listing::content_region(&category);
    let next_control = listing::next_page_control(&category);

    let mut state = PaginationState::default();
    let mut committed = 0usize;
    let mut retries = RetryCount::default();
    let mut previous: Option<Vec<PaperRecord>> = None;

    let mut step = Step::LoadingPage;
    loop {
        step = match step {
            Step::LoadingPage => {
                debug!(category = %category, page = state.current_page, "Snapshotting page");
                if let Some(p) = progress.as_deref_mut() {
                    p.page_start(&category, state.current_page);
                }
                Step::ExtractingItems(session.current_markup()?)
            }

            Step::ExtractingItems(markup) => {
                let snapshot = Snapshot::parse(&markup);
                match listing::extract_page(&snapshot, &category, &ctx.base_url) {
                    PageOutcome::Complete(records)
                        if !records.is_empty() && previous.as_ref() == Some(&records) =>
                    {
                        Step::RetryPage(RetryReason::Stale)
                    }
                    PageOutcome::Complete(records) => Step::AdvancingPage(records),
                    PageOutcome::Incomplete { item, title, missing } => {
                        Step::RetryPage(RetryReason::Incomplete { item, title, missing })
                    }
                    PageOutcome::RegionMissing => Step::RetryPage(RetryReason::RegionMissing),
                }
            }

            Step::RetryPage(reason) => {
                if !ctx.retry.allows(retries.page) {
                    return Err(ScrapeError::RetriesExhausted {
                        category,
                        page: state.current_page,
                        attempts: retries.attempts(),
                    });
                }
                retries.record();
                warn!(category = %category, page = state.current_page, attempt = retries.page, "{reason}; retrying page");
                Step::LoadingPage
            }

            Step::AdvancingPage(records) => {
                let n = records.len();
                table.extend(records.iter().cloned());
                committed += n;
                retries.page_committed();
                if let Some(p) = progress.as_deref_mut() {
                    p.page_done(&category, state.current_page, n);
                }
                debug!(category = %category, page = state.current_page, records = n, "Page committed");
                previous = Some(records);

                // Re-queried every time: the arrow belongs to the page just rendered.
                let arrows = session.find_all(&next_control)?;
                state.has_next_page = !arrows.is_empty();
                match arrows.first() {
                    None => Step::Done,
                    Some(arrow) => {
                        session.click(arrow)?;
                        session.wait_for_visible(&region, ctx.timeouts.visible)?;
                        state.current_page += 1;
                        Step::LoadingPage
                    }
                }
            }

            Step::Done => break,
        };
    }

    info!(category = %category, pages = state.current_page, records = committed, retries = retries.total, "Category exhausted");
    Ok(PaginationReport { state, records: committed, retries: retries.total })
}
