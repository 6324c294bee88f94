// src/session/chrome.rs
// Chromium over CDP via headless_chrome. Blocking throughout.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use headless_chrome::browser::tab::NoElementFound;
use headless_chrome::{Browser, Element, LaunchOptions, Tab};
use tracing::{debug, info};

use crate::config::options::Timeouts;
use crate::error::{Result, ScrapeError};

use super::{ElementHandle, Locator, PageSession};

/// Same notion of "visible" as WebDriver's visibility check: rendered, not
/// hidden by style, and with a non-empty box.
const IS_VISIBLE_JS: &str = r#"function() {
    const style = window.getComputedStyle(this);
    const rect = this.getBoundingClientRect();
    return style.display !== 'none'
        && style.visibility !== 'hidden'
        && (rect.width > 0 || rect.height > 0);
}"#;

pub struct ChromeSession {
    // Field order matters: the tab must go before the browser process.
    tab: Option<Arc<Tab>>,
    browser: Option<Browser>,
    poll: Duration,
    settle: Duration,
}

impl ChromeSession {
    pub fn launch(headless: bool, timeouts: &Timeouts) -> Result<Self> {
        let options = LaunchOptions::default_builder()
            .headless(headless)
            .window_size(Some((1280, 1024)))
            .idle_browser_timeout(timeouts.listing.max(Duration::from_secs(300)))
            .build()
            .map_err(|e| ScrapeError::Config(format!("Chrome launch options: {e}")))?;

        let browser = Browser::new(options)?;
        let tab = browser.new_tab()?;
        info!(headless, "Browser launched");

        Ok(Self {
            tab: Some(tab),
            browser: Some(browser),
            poll: timeouts.poll,
            settle: timeouts.settle,
        })
    }

    fn tab(&self) -> Result<&Arc<Tab>> {
        self.tab
            .as_ref()
            .ok_or_else(|| ScrapeError::Config(s!("Browser session already closed")))
    }

    /// `find_elements` reports "no match" as an error; here it is an empty list.
    fn query<'a>(tab: &'a Tab, locator: &Locator) -> Result<Vec<Element<'a>>> {
        match tab.find_elements(&locator.to_css()) {
            Ok(found) => Ok(found),
            Err(e) if e.downcast_ref::<NoElementFound>().is_some() => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn resolve<'a>(tab: &'a Tab, handle: &ElementHandle) -> Result<Element<'a>> {
        Self::query(tab, &handle.locator)?
            .into_iter()
            .nth(handle.index)
            .ok_or_else(|| ScrapeError::NotFound(format!("{} [{}]", handle.locator, handle.index)))
    }

    fn is_visible(element: &Element<'_>) -> bool {
        element
            .call_js_fn(IS_VISIBLE_JS, vec![], false)
            .ok()
            .and_then(|r| r.value)
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }
}

impl PageSession for ChromeSession {
    fn open(&mut self, url: &str) -> Result<()> {
        let tab = self.tab()?;
        debug!(url, "Navigating");
        tab.navigate_to(url)?;
        tab.wait_until_navigated()?;
        Ok(())
    }

    fn wait_for_visible(&mut self, locator: &Locator, timeout: Duration) -> Result<ElementHandle> {
        let tab = self.tab()?;
        let started = Instant::now();
        loop {
            if let Some(first) = Self::query(tab, locator)?.first() {
                if Self::is_visible(first) {
                    return Ok(ElementHandle::new(locator.clone(), 0));
                }
            }
            if started.elapsed() >= timeout {
                return Err(ScrapeError::Timeout { locator: locator.to_string(), waited: timeout });
            }
            thread::sleep(self.poll);
        }
    }

    fn find_all(&mut self, locator: &Locator) -> Result<Vec<ElementHandle>> {
        let tab = self.tab()?;
        let n = Self::query(tab, locator)?.len();
        Ok((0..n).map(|i| ElementHandle::new(locator.clone(), i)).collect())
    }

    fn click(&mut self, element: &ElementHandle) -> Result<()> {
        let tab = self.tab()?;
        Self::resolve(tab, element)?.click()?;
        // The region is usually already visible when the next page starts
        // rendering; give the app a moment before anyone snapshots it.
        thread::sleep(self.settle);
        Ok(())
    }

    fn attribute(&mut self, element: &ElementHandle, name: &str) -> Result<Option<String>> {
        let tab = self.tab()?;
        let attrs = Self::resolve(tab, element)?.get_attributes()?.unwrap_or_default();
        // Flat [name, value, name, value, …]
        Ok(attrs
            .chunks_exact(2)
            .find(|kv| kv[0] == name)
            .map(|kv| kv[1].clone()))
    }

    fn current_markup(&mut self) -> Result<String> {
        Ok(self.tab()?.get_content()?)
    }

    fn close(&mut self) -> Result<()> {
        if let Some(tab) = self.tab.take() {
            // The browser process goes away with `browser` below either way.
            if let Err(e) = tab.close(true) {
                debug!("Tab close: {e:#}");
            }
        }
        if self.browser.take().is_some() {
            info!("Browser closed");
        }
        Ok(())
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
