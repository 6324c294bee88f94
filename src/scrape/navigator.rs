// src/scrape/navigator.rs
//! Getting the live page to a category: load the listing, click its tab.
//!
//! A category with no matching tab is an error (`CategoryNotFound`): the run
//! reports it and writes no file, rather than a header-only CSV that would be
//! indistinguishable from a category with no papers.
use tracing::{debug, info};

use crate::error::{Result, ScrapeError};
use crate::runner::RunContext;
use crate::session::{ElementHandle, PageSession};
use crate::specs::listing;

/// Load the listing page and wait until the tab container has rendered.
pub fn open_listing<S: PageSession + ?Sized>(session: &mut S, ctx: &RunContext) -> Result<()> {
    debug!(url = %ctx.base_url, "Opening listing");
    session.open(ctx.base_url.as_str())?;
    session.wait_for_visible(&listing::listing_ready(), ctx.timeouts.listing)?;
    Ok(())
}

/// Activate the tab whose region id is `category` and block until that
/// region is visible. With several matching tabs, the first in document order wins.
pub fn select_category<S: PageSession + ?Sized>(
    session: &mut S,
    ctx: &RunContext,
    category: &str,
) -> Result<()> {
    let tab = find_tab(session, category)?
        .ok_or_else(|| ScrapeError::CategoryNotFound(s!(category)))?;

    session.click(&tab)?;
    session.wait_for_visible(&listing::content_region(category), ctx.timeouts.visible)?;
    info!("Parsing papers from {category}");
    Ok(())
}

fn find_tab<S: PageSession + ?Sized>(session: &mut S, category: &str) -> Result<Option<ElementHandle>> {
    for tab in session.find_all(&listing::tab_controls())? {
        let target = session.attribute(&tab, listing::TAB_TARGET_ATTR)?;
        if target.as_deref() == Some(category) {
            return Ok(Some(tab));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::options::ScrapeOptions;
    use crate::session::scripted::{ScriptedCategory, ScriptedPage, ScriptedSession};

    fn ctx() -> RunContext {
        RunContext::from_options(&ScrapeOptions::default()).unwrap()
    }

    fn session() -> ScriptedSession {
        ScriptedSession::new()
            .with_category(ScriptedCategory::new("accept-oral", vec![ScriptedPage::new("oral items")]))
            .with_category(ScriptedCategory::new("accept-poster", vec![ScriptedPage::new("poster items")]))
            .with_category(ScriptedCategory::new("accept-poster", vec![ScriptedPage::new("shadow tab")]))
            .with_category(ScriptedCategory::new("withdrawn", vec![]).never_visible())
    }

    #[test]
    fn selects_matching_tab() {
        let mut s = session();
        open_listing(&mut s, &ctx()).unwrap();
        select_category(&mut s, &ctx(), "accept-oral").unwrap();
        assert!(s.current_markup().unwrap().contains("oral items"));
    }

    #[test]
    fn first_matching_tab_wins() {
        let mut s = session();
        open_listing(&mut s, &ctx()).unwrap();
        select_category(&mut s, &ctx(), "accept-poster").unwrap();
        let html = s.current_markup().unwrap();
        assert!(html.contains("poster items"));
        assert!(!html.contains("shadow tab"));
    }

    #[test]
    fn unknown_category_is_an_error() {
        let mut s = session();
        open_listing(&mut s, &ctx()).unwrap();
        let err = select_category(&mut s, &ctx(), "reject").unwrap_err();
        assert!(matches!(err, ScrapeError::CategoryNotFound(c) if c == "reject"));
        assert_eq!(s.clicks(), 0);
    }

    #[test]
    fn hidden_region_times_out() {
        let mut s = session();
        open_listing(&mut s, &ctx()).unwrap();
        let err = select_category(&mut s, &ctx(), "withdrawn").unwrap_err();
        assert!(matches!(err, ScrapeError::Timeout { .. }));
    }
}
