//! Browser session seam
//!
//! The crawler talks to exactly one live page through [`BrowserSession`]. Two
//! implementations exist:
//! - `WebDriverSession`: a real Firefox driven over WebDriver (geckodriver)
//! - `FixtureSession`: static HTML documents held in memory, used for tests
//!   and offline replays of saved pages

mod fixture;
mod webdriver;

pub use fixture::{FixtureElement, FixtureProbe, FixtureSession};
pub use webdriver::{WebDriverElement, WebDriverSession};

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by a browser session
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Failed to start browser session: {0}")]
    Connect(String),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("No element matched '{selector}' within {timeout_ms}ms")]
    LocatorTimeout { selector: String, timeout_ms: u128 },

    #[error("Browser command failed: {0}")]
    Command(String),

    #[error("Browser session lost: {0}")]
    SessionLost(String),
}

impl BrowserError {
    /// Returns true if the session can no longer be used for further pages
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::SessionLost(_) | Self::Connect(_))
    }

    /// Returns true if this is a bounded wait running out
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::LocatorTimeout { .. })
    }
}

/// Result type for browser operations
pub type BrowserResult<T> = Result<T, BrowserError>;

/// A handle to one element on the current page
#[async_trait]
pub trait ElementHandle: Send + Sync {
    /// Rendered text content
    async fn text(&self) -> BrowserResult<String>;

    /// Attribute value, `None` when the element has no such attribute
    async fn attribute(&self, name: &str) -> BrowserResult<Option<String>>;
}

/// One navigable viewport
///
/// Every call is a suspension point with its own bound; nothing runs in the
/// background between calls.
#[async_trait]
pub trait BrowserSession: Send {
    type Element: ElementHandle;

    /// Loads `url` into the viewport
    async fn navigate(&mut self, url: &str) -> BrowserResult<()>;

    /// Waits up to `timeout` for one element matching `selector`
    async fn wait_for_element(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> BrowserResult<Self::Element>;

    /// Waits up to `timeout` for at least one match, then returns every match
    async fn wait_for_elements(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> BrowserResult<Vec<Self::Element>>;

    /// Runs a script in the page for its side effect
    async fn run_script(&mut self, code: &str) -> BrowserResult<()>;

    /// Pauses the flow without touching the page
    async fn sleep(&mut self, duration: Duration);

    /// Ends the session; calling it again is a no-op
    async fn release(&mut self) -> BrowserResult<()>;
}
