// src/session/mod.rs
//! # Page sessions
//!
//! A page session is one controllable browser tab: open a URL, wait for an
//! element to become visible, find and click elements, read the rendered
//! markup. The navigator and the paginator only ever see this trait, so the
//! same loop runs against Chromium (`chrome::ChromeSession`) or against
//! captured pages replayed from memory (`scripted::ScriptedSession`).
//!
//! Elements are handed out as owned [`ElementHandle`]s (locator + match index)
//! and re-resolved by the session when used. A handle never outlives a
//! navigation in any meaningful way; callers re-query after every click.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::time::Duration;

use tracing::warn;

use crate::error::Result;

pub mod chrome;
pub mod scripted;

pub use chrome::ChromeSession;
pub use scripted::ScriptedSession;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Locator {
    Css(String),
    Id(String),
    Class(String),
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn id(id: impl Into<String>) -> Self {
        Locator::Id(id.into())
    }

    pub fn class(class: impl Into<String>) -> Self {
        Locator::Class(class.into())
    }

    /// CSS form. Ids and classes go through attribute selectors so names
    /// like `accept-oral` or `2024` need no escaping.
    pub fn to_css(&self) -> String {
        match self {
            Locator::Css(s) => s.clone(),
            Locator::Id(id) => format!("[id='{}']", id.replace('\'', "\\'")),
            Locator::Class(c) => format!("[class~='{}']", c.replace('\'', "\\'")),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(s) => write!(f, "css `{s}`"),
            Locator::Id(id) => write!(f, "#{id}"),
            Locator::Class(c) => write!(f, ".{c}"),
        }
    }
}

/// The `index`-th match of `locator`, as of the query that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementHandle {
    pub locator: Locator,
    pub index: usize,
}

impl ElementHandle {
    pub fn new(locator: Locator, index: usize) -> Self {
        Self { locator, index }
    }
}

pub trait PageSession {
    fn open(&mut self, url: &str) -> Result<()>;

    /// Block until the first match of `locator` is visible, or fail with
    /// `ScrapeError::Timeout` once `timeout` has passed.
    fn wait_for_visible(&mut self, locator: &Locator, timeout: Duration) -> Result<ElementHandle>;

    /// Every current match, in document order. No match is an empty list.
    fn find_all(&mut self, locator: &Locator) -> Result<Vec<ElementHandle>>;

    fn click(&mut self, element: &ElementHandle) -> Result<()>;

    fn attribute(&mut self, element: &ElementHandle, name: &str) -> Result<Option<String>>;

    /// The page's markup as rendered right now.
    fn current_markup(&mut self) -> Result<String>;

    /// Release the browser. Must be safe to call more than once.
    fn close(&mut self) -> Result<()>;
}

/// Closes the wrapped session when dropped, whatever path the caller took out.
pub struct SessionGuard<'a, S: PageSession + ?Sized> {
    session: &'a mut S,
}

impl<'a, S: PageSession + ?Sized> SessionGuard<'a, S> {
    pub fn new(session: &'a mut S) -> Self {
        Self { session }
    }
}

impl<S: PageSession + ?Sized> Deref for SessionGuard<'_, S> {
    type Target = S;
    fn deref(&self) -> &S {
        self.session
    }
}

impl<S: PageSession + ?Sized> DerefMut for SessionGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.session
    }
}

impl<S: PageSession + ?Sized> Drop for SessionGuard<'_, S> {
    fn drop(&mut self) {
        if let Err(e) = self.session.close() {
            warn!("Closing browser session failed: {e}");
        }
    }
}
