//! In-memory browser session over static HTML
//!
//! Pages are registered by URL and queried with CSS selectors through
//! `scraper`. A lazily-loaded listing can be simulated: each script run on it
//! renders one more batch of items, the way scrolling to the end does on the
//! live site. Waits never block; a selector with no match fails immediately
//! with the requested bound, and sleeps are only recorded.
//!
//! Faults can be injected per URL, and a [`FixtureProbe`] observes what the
//! crawler did after the session has been handed over.

use crate::browser::{BrowserError, BrowserResult, BrowserSession, ElementHandle};
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Element captured from a fixture page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureElement {
    text: String,
    attributes: HashMap<String, String>,
}

#[async_trait]
impl ElementHandle for FixtureElement {
    async fn text(&self) -> BrowserResult<String> {
        Ok(self.text.clone())
    }

    async fn attribute(&self, name: &str) -> BrowserResult<Option<String>> {
        Ok(self.attributes.get(name).cloned())
    }
}

#[derive(Debug, Clone)]
enum FixturePage {
    Document(String),
    LazyListing {
        items: Vec<String>,
        batch: usize,
        rendered: usize,
    },
}

impl FixturePage {
    fn render(&self) -> String {
        match self {
            Self::Document(html) => html.clone(),
            Self::LazyListing {
                items, rendered, ..
            } => format!(
                "<html><body>{}</body></html>",
                items[..*rendered].concat()
            ),
        }
    }

    fn reset(&mut self) {
        if let Self::LazyListing {
            items,
            batch,
            rendered,
        } = self
        {
            *rendered = (*batch).min(items.len());
        }
    }

    fn load_more(&mut self) {
        if let Self::LazyListing {
            items,
            batch,
            rendered,
        } = self
        {
            *rendered = (*rendered + *batch).min(items.len());
        }
    }
}

#[derive(Debug, Default)]
struct ProbeCounters {
    navigations: AtomicUsize,
    scripts: AtomicUsize,
    releases: AtomicUsize,
    slept_ms: AtomicU64,
    visited: Mutex<Vec<String>>,
}

/// Shared view of what happened to a [`FixtureSession`]
#[derive(Debug, Clone, Default)]
pub struct FixtureProbe {
    counters: Arc<ProbeCounters>,
}

impl FixtureProbe {
    /// Number of navigation attempts, successful or not
    pub fn navigations(&self) -> usize {
        self.counters.navigations.load(Ordering::SeqCst)
    }

    /// Number of scripts run
    pub fn scripts(&self) -> usize {
        self.counters.scripts.load(Ordering::SeqCst)
    }

    /// Number of times `release` was called
    pub fn releases(&self) -> usize {
        self.counters.releases.load(Ordering::SeqCst)
    }

    /// Total time the session was asked to sleep
    pub fn slept(&self) -> Duration {
        Duration::from_millis(self.counters.slept_ms.load(Ordering::SeqCst))
    }

    /// URLs navigated to, in order
    pub fn visited(&self) -> Vec<String> {
        self.counters
            .visited
            .lock()
            .map(|visited| visited.clone())
            .unwrap_or_default()
    }
}

/// Browser session serving registered HTML pages
#[derive(Debug, Default)]
pub struct FixtureSession {
    pages: HashMap<String, FixturePage>,
    failing_urls: HashSet<String>,
    fatal_urls: HashSet<String>,
    current: Option<String>,
    lost: bool,
    released: bool,
    probe: FixtureProbe,
}

impl FixtureSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a static document
    pub fn with_document(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages
            .insert(url.into(), FixturePage::Document(html.into()));
        self
    }

    /// Registers a listing that renders `batch` more of `items` per script run
    ///
    /// Each item is an HTML fragment; the page body is their concatenation.
    pub fn with_lazy_listing(
        mut self,
        url: impl Into<String>,
        items: Vec<String>,
        batch: usize,
    ) -> Self {
        let rendered = batch.min(items.len());
        self.pages.insert(
            url.into(),
            FixturePage::LazyListing {
                items,
                batch,
                rendered,
            },
        );
        self
    }

    /// Makes navigation to `url` fail without harming the session
    pub fn with_failing_navigation(mut self, url: impl Into<String>) -> Self {
        self.failing_urls.insert(url.into());
        self
    }

    /// Makes navigation to `url` lose the session for good
    pub fn with_session_lost_on(mut self, url: impl Into<String>) -> Self {
        self.fatal_urls.insert(url.into());
        self
    }

    /// Returns a probe that stays valid after the session is moved
    pub fn probe(&self) -> FixtureProbe {
        self.probe.clone()
    }

    fn ensure_usable(&self) -> BrowserResult<()> {
        if self.released {
            return Err(BrowserError::SessionLost(
                "session already released".to_string(),
            ));
        }
        if self.lost {
            return Err(BrowserError::SessionLost(
                "browser stopped responding".to_string(),
            ));
        }
        Ok(())
    }

    fn current_page(&self) -> BrowserResult<&FixturePage> {
        self.current
            .as_ref()
            .and_then(|url| self.pages.get(url))
            .ok_or_else(|| BrowserError::Command("no page loaded".to_string()))
    }

    fn select(&self, selector: &str) -> BrowserResult<Vec<FixtureElement>> {
        let html = self.current_page()?.render();
        let parsed = Selector::parse(selector).map_err(|e| {
            BrowserError::Command(format!("invalid selector '{}': {:?}", selector, e))
        })?;
        let document = Html::parse_document(&html);

        let elements = document
            .select(&parsed)
            .map(|element| FixtureElement {
                text: element.text().collect::<String>().trim().to_string(),
                attributes: element
                    .value()
                    .attrs()
                    .map(|(name, value)| (name.to_string(), value.to_string()))
                    .collect(),
            })
            .collect();

        Ok(elements)
    }
}

fn locator_timeout(selector: &str, timeout: Duration) -> BrowserError {
    BrowserError::LocatorTimeout {
        selector: selector.to_string(),
        timeout_ms: timeout.as_millis(),
    }
}

#[async_trait]
impl BrowserSession for FixtureSession {
    type Element = FixtureElement;

    async fn navigate(&mut self, url: &str) -> BrowserResult<()> {
        self.ensure_usable()?;
        self.probe.counters.navigations.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut visited) = self.probe.counters.visited.lock() {
            visited.push(url.to_string());
        }

        if self.fatal_urls.contains(url) {
            self.lost = true;
            return Err(BrowserError::SessionLost(format!(
                "browser crashed while loading {}",
                url
            )));
        }

        if self.failing_urls.contains(url) {
            return Err(BrowserError::Navigation {
                url: url.to_string(),
                message: "target unreachable".to_string(),
            });
        }

        match self.pages.get_mut(url) {
            Some(page) => {
                page.reset();
                self.current = Some(url.to_string());
                Ok(())
            }
            None => Err(BrowserError::Navigation {
                url: url.to_string(),
                message: "no such page".to_string(),
            }),
        }
    }

    async fn wait_for_element(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> BrowserResult<FixtureElement> {
        self.ensure_usable()?;
        self.select(selector)?
            .into_iter()
            .next()
            .ok_or_else(|| locator_timeout(selector, timeout))
    }

    async fn wait_for_elements(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> BrowserResult<Vec<FixtureElement>> {
        self.ensure_usable()?;
        let elements = self.select(selector)?;
        if elements.is_empty() {
            return Err(locator_timeout(selector, timeout));
        }
        Ok(elements)
    }

    async fn run_script(&mut self, _code: &str) -> BrowserResult<()> {
        self.ensure_usable()?;
        self.probe.counters.scripts.fetch_add(1, Ordering::SeqCst);

        let url = self
            .current
            .clone()
            .ok_or_else(|| BrowserError::Command("no page loaded".to_string()))?;
        if let Some(page) = self.pages.get_mut(&url) {
            page.load_more();
        }
        Ok(())
    }

    async fn sleep(&mut self, duration: Duration) {
        self.probe
            .counters
            .slept_ms
            .fetch_add(duration.as_millis() as u64, Ordering::SeqCst);
    }

    async fn release(&mut self) -> BrowserResult<()> {
        self.probe.counters.releases.fetch_add(1, Ordering::SeqCst);
        self.released = true;
        self.current = None;
        Ok(())
    }
}
