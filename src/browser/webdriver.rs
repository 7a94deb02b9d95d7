//! WebDriver-backed browser session
//!
//! Drives a Firefox instance through a running geckodriver using `fantoccini`.

use crate::browser::{BrowserError, BrowserResult, BrowserSession, ElementHandle};
use crate::config::BrowserConfig;
use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{json, Map, Value};
use std::time::Duration;

/// Element on a WebDriver-controlled page
pub struct WebDriverElement(Element);

#[async_trait]
impl ElementHandle for WebDriverElement {
    async fn text(&self) -> BrowserResult<String> {
        self.0.text().await.map_err(|e| map_cmd_error(e, None))
    }

    async fn attribute(&self, name: &str) -> BrowserResult<Option<String>> {
        self.0.attr(name).await.map_err(|e| map_cmd_error(e, None))
    }
}

/// Browser session backed by a WebDriver client
pub struct WebDriverSession {
    client: Option<Client>,
}

impl WebDriverSession {
    /// Opens a new Firefox session on the configured WebDriver endpoint
    ///
    /// # Example
    ///
    /// ```no_run
    /// use matchday::browser::WebDriverSession;
    /// use matchday::config::BrowserConfig;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let session = WebDriverSession::connect(&BrowserConfig::default()).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(config: &BrowserConfig) -> BrowserResult<Self> {
        tracing::info!("Connecting to WebDriver at {}", config.webdriver_url);

        let mut builder = ClientBuilder::native();
        builder.capabilities(firefox_capabilities(config));

        let client = builder
            .connect(&config.webdriver_url)
            .await
            .map_err(|e| BrowserError::Connect(e.to_string()))?;

        tracing::info!("WebDriver session established");
        Ok(Self {
            client: Some(client),
        })
    }

    fn client(&self) -> BrowserResult<&Client> {
        self.client
            .as_ref()
            .ok_or_else(|| BrowserError::SessionLost("session already released".to_string()))
    }
}

#[async_trait]
impl BrowserSession for WebDriverSession {
    type Element = WebDriverElement;

    async fn navigate(&mut self, url: &str) -> BrowserResult<()> {
        let client = self.client()?;
        client.goto(url).await.map_err(|e| match map_cmd_error(e, None) {
            fatal @ BrowserError::SessionLost(_) => fatal,
            other => BrowserError::Navigation {
                url: url.to_string(),
                message: other.to_string(),
            },
        })
    }

    async fn wait_for_element(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> BrowserResult<WebDriverElement> {
        let client = self.client()?;
        client
            .wait()
            .at_most(timeout)
            .for_element(Locator::Css(selector))
            .await
            .map(WebDriverElement)
            .map_err(|e| map_cmd_error(e, Some((selector, timeout))))
    }

    async fn wait_for_elements(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> BrowserResult<Vec<WebDriverElement>> {
        let client = self.client()?;

        // Wait for the first match, then collect every match rendered so far
        client
            .wait()
            .at_most(timeout)
            .for_element(Locator::Css(selector))
            .await
            .map_err(|e| map_cmd_error(e, Some((selector, timeout))))?;

        let elements = client
            .find_all(Locator::Css(selector))
            .await
            .map_err(|e| map_cmd_error(e, None))?;

        Ok(elements.into_iter().map(WebDriverElement).collect())
    }

    async fn run_script(&mut self, code: &str) -> BrowserResult<()> {
        let client = self.client()?;
        client
            .execute(code, Vec::new())
            .await
            .map(|_| ())
            .map_err(|e| map_cmd_error(e, None))
    }

    async fn sleep(&mut self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    async fn release(&mut self) -> BrowserResult<()> {
        match self.client.take() {
            Some(client) => {
                tracing::info!("Closing WebDriver session");
                client.close().await.map_err(|e| map_cmd_error(e, None))
            }
            None => Ok(()),
        }
    }
}

/// Builds the `moz:firefoxOptions` capability for the configured browser
pub(crate) fn firefox_capabilities(config: &BrowserConfig) -> Map<String, Value> {
    let mut options = Map::new();

    if config.headless {
        options.insert("args".to_string(), json!(["-headless"]));
    }

    if let Some(binary) = &config.firefox_binary {
        options.insert(
            "binary".to_string(),
            Value::String(binary.display().to_string()),
        );
    }

    let mut capabilities = Map::new();
    capabilities.insert("moz:firefoxOptions".to_string(), Value::Object(options));
    capabilities
}

/// Maps a WebDriver command error onto the session error taxonomy
///
/// `wait` carries the selector and bound when the failing command was a wait.
fn map_cmd_error(error: CmdError, wait: Option<(&str, Duration)>) -> BrowserError {
    if let (CmdError::WaitTimeout, Some((selector, timeout))) = (&error, wait) {
        return BrowserError::LocatorTimeout {
            selector: selector.to_string(),
            timeout_ms: timeout.as_millis(),
        };
    }

    if matches!(error, CmdError::Lost(_)) {
        return BrowserError::SessionLost(error.to_string());
    }

    let message = error.to_string();
    let lowered = message.to_lowercase();
    if lowered.contains("invalid session id") || lowered.contains("no such window") {
        BrowserError::SessionLost(message)
    } else {
        BrowserError::Command(message)
    }
}
