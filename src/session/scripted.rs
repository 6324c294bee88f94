// src/session/scripted.rs
//! In-memory page session that replays captured listing pages.
//!
//! Each category holds a list of pages; each page holds one or more snapshots
//! of its region's inner markup, served in order on successive
//! `current_markup` calls (the last one repeats). That lets a test say "the
//! first look at page 2 is half-rendered, the second is complete".

use std::time::Duration;

use crate::error::{Result, ScrapeError};
use crate::specs::listing;

use super::{ElementHandle, Locator, PageSession};

#[derive(Clone, Debug, Default)]
pub struct ScriptedPage {
    snapshots: Vec<String>,
}

impl ScriptedPage {
    /// A page that renders the same way every time.
    pub fn new(region_html: impl Into<String>) -> Self {
        Self { snapshots: vec![region_html.into()] }
    }

    /// A page whose successive snapshots differ; the last one sticks.
    pub fn sequence<I, S>(snapshots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { snapshots: snapshots.into_iter().map(Into::into).collect() }
    }

    fn snapshot(&self, n: usize) -> &str {
        self.snapshots
            .get(n)
            .or_else(|| self.snapshots.last())
            .map(String::as_str)
            .unwrap_or("")
    }
}

#[derive(Clone, Debug)]
pub struct ScriptedCategory {
    id: String,
    pages: Vec<ScriptedPage>,
    never_visible: bool,
    /// 0-based page index from which the region stops showing.
    hidden_from: Option<usize>,
}

impl ScriptedCategory {
    pub fn new(id: impl Into<String>, pages: Vec<ScriptedPage>) -> Self {
        Self { id: id.into(), pages, never_visible: false, hidden_from: None }
    }

    /// The tab exists but its region never shows: every wait on it times out.
    pub fn never_visible(mut self) -> Self {
        self.never_visible = true;
        self
    }

    /// Pages `1..=n` (1-based) render normally; clicking "next" on page `n`
    /// leaves the region hidden, so the wait for page `n + 1` times out.
    pub fn timeout_after_page(mut self, n: usize) -> Self {
        self.hidden_from = Some(n);
        self
    }

    fn shows_page(&self, page: usize) -> bool {
        !self.never_visible && self.hidden_from.is_none_or(|n| page < n)
    }
}

#[derive(Debug, Default)]
pub struct ScriptedSession {
    categories: Vec<ScriptedCategory>,
    opened: bool,
    closed: bool,
    active: Option<usize>,
    page: usize,
    served: usize,
    snapshots: usize,
    clicks: usize,
    opens: usize,
    closes: usize,
}

impl ScriptedSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a category tab (tabs appear in insertion order).
    pub fn with_category(mut self, category: ScriptedCategory) -> Self {
        self.categories.push(category);
        self
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Total `current_markup` calls.
    pub fn snapshots_taken(&self) -> usize {
        self.snapshots
    }

    pub fn clicks(&self) -> usize {
        self.clicks
    }

    pub fn opens(&self) -> usize {
        self.opens
    }

    pub fn close_calls(&self) -> usize {
        self.closes
    }

    fn active_category(&self) -> Option<&ScriptedCategory> {
        self.active.and_then(|i| self.categories.get(i))
    }

    fn has_next_page(&self) -> bool {
        self.active_category().is_some_and(|c| self.page + 1 < c.pages.len())
    }

    fn region_visible(&self, id: &str) -> bool {
        self.active_category().is_some_and(|c| c.id == id && c.shows_page(self.page))
    }

    fn is_next_control(&self, locator: &Locator) -> bool {
        self.active_category()
            .is_some_and(|c| *locator == listing::next_page_control(&c.id))
    }

    fn render(&self) -> String {
        let tabs: String = self
            .categories
            .iter()
            .map(|c| {
                format!(
                    r##"<li role="presentation"><a href="#{0}" aria-controls="{0}" role="tab">{0}</a></li>"##,
                    c.id
                )
            })
            .collect();

        let region = match self.active_category() {
            Some(c) if c.shows_page(self.page) => {
                let inner = c.pages.get(self.page).map_or("", |p| p.snapshot(self.served));
                let arrow = if self.has_next_page() {
                    r#"<ul class="pagination"><li class="right-arrow"><a>&gt;</a></li></ul>"#
                } else {
                    r#"<ul class="pagination"><li class="right-arrow disabled"><a>&gt;</a></li></ul>"#
                };
                format!(r#"<div id="{}" class="tab-pane active">{inner}{arrow}</div>"#, c.id)
            }
            _ => s!(),
        };

        format!(
            r#"<html><body><ul class="nav nav-tabs">{tabs}</ul><div class="tab-content">{region}</div></body></html>"#
        )
    }

    fn timeout(locator: &Locator, waited: Duration) -> ScrapeError {
        ScrapeError::Timeout { locator: locator.to_string(), waited }
    }
}

impl PageSession for ScriptedSession {
    fn open(&mut self, _url: &str) -> Result<()> {
        self.opened = true;
        self.closed = false;
        self.active = None;
        self.page = 0;
        self.served = 0;
        self.opens += 1;
        Ok(())
    }

    fn wait_for_visible(&mut self, locator: &Locator, timeout: Duration) -> Result<ElementHandle> {
        let visible = match locator {
            _ if !self.opened || self.closed => false,
            l if *l == listing::listing_ready() => true,
            Locator::Id(id) => self.region_visible(id),
            _ => false,
        };
        if visible {
            Ok(ElementHandle::new(locator.clone(), 0))
        } else {
            Err(Self::timeout(locator, timeout))
        }
    }

    fn find_all(&mut self, locator: &Locator) -> Result<Vec<ElementHandle>> {
        if !self.opened || self.closed {
            return Ok(Vec::new());
        }
        let count = if *locator == listing::tab_controls() {
            self.categories.len()
        } else if self.is_next_control(locator) {
            usize::from(self.has_next_page())
        } else {
            0
        };
        Ok((0..count).map(|i| ElementHandle::new(locator.clone(), i)).collect())
    }

    fn click(&mut self, element: &ElementHandle) -> Result<()> {
        if element.locator == listing::tab_controls() && element.index < self.categories.len() {
            self.active = Some(element.index);
            self.page = 0;
        } else if self.is_next_control(&element.locator) && self.has_next_page() {
            self.page += 1;
        } else {
            return Err(ScrapeError::NotFound(element.locator.to_string()));
        }
        self.served = 0;
        self.clicks += 1;
        Ok(())
    }

    fn attribute(&mut self, element: &ElementHandle, name: &str) -> Result<Option<String>> {
        if element.locator == listing::tab_controls() && name == listing::TAB_TARGET_ATTR {
            return Ok(self.categories.get(element.index).map(|c| c.id.clone()));
        }
        Ok(None)
    }

    fn current_markup(&mut self) -> Result<String> {
        let html = self.render();
        self.snapshots += 1;
        self.served += 1;
        Ok(html)
    }

    fn close(&mut self) -> Result<()> {
        if !self.closed {
            self.closes += 1;
        }
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_page_session() -> ScriptedSession {
        ScriptedSession::new().with_category(ScriptedCategory::new(
            "accept-oral",
            vec![ScriptedPage::sequence(["first look", "second look"]), ScriptedPage::new("page two")],
        ))
    }

    #[test]
    fn snapshots_are_served_in_order_then_repeat() {
        let mut s = two_page_session();
        s.open("https://example.org").unwrap();
        let tabs = s.find_all(&listing::tab_controls()).unwrap();
        s.click(&tabs[0]).unwrap();
        assert!(s.current_markup().unwrap().contains("first look"));
        assert!(s.current_markup().unwrap().contains("second look"));
        assert!(s.current_markup().unwrap().contains("second look"));
    }

    #[test]
    fn next_control_disappears_on_last_page() {
        let mut s = two_page_session();
        s.open("https://example.org").unwrap();
        let tabs = s.find_all(&listing::tab_controls()).unwrap();
        s.click(&tabs[0]).unwrap();
        let next = listing::next_page_control("accept-oral");
        let arrows = s.find_all(&next).unwrap();
        assert_eq!(arrows.len(), 1);
        s.click(&arrows[0]).unwrap();
        assert!(s.current_markup().unwrap().contains("page two"));
        assert!(s.find_all(&next).unwrap().is_empty());
    }

    #[test]
    fn region_hides_after_configured_page() {
        let mut s = ScriptedSession::new().with_category(
            ScriptedCategory::new("accept-oral", vec![ScriptedPage::new("one"), ScriptedPage::new("two")])
                .timeout_after_page(1),
        );
        s.open("https://example.org").unwrap();
        let tabs = s.find_all(&listing::tab_controls()).unwrap();
        s.click(&tabs[0]).unwrap();
        let region = listing::content_region("accept-oral");
        s.wait_for_visible(&region, Duration::from_secs(30)).unwrap();
        let arrows = s.find_all(&listing::next_page_control("accept-oral")).unwrap();
        s.click(&arrows[0]).unwrap();
        assert!(s.wait_for_visible(&region, Duration::from_secs(30)).is_err());
        assert!(!s.current_markup().unwrap().contains("two"));
    }

    #[test]
    fn hidden_region_times_out() {
        let mut s = ScriptedSession::new()
            .with_category(ScriptedCategory::new("accept-oral", vec![]).never_visible());
        s.open("https://example.org").unwrap();
        let tabs = s.find_all(&listing::tab_controls()).unwrap();
        s.click(&tabs[0]).unwrap();
        let err = s
            .wait_for_visible(&listing::content_region("accept-oral"), Duration::from_secs(30))
            .unwrap_err();
        assert!(matches!(err, ScrapeError::Timeout { .. }));
    }
}
