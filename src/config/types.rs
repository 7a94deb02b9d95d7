use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Matchday
///
/// Every section is optional in the TOML file; missing sections fall back to
/// the values used against the live results site.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub browser: BrowserConfig,
    pub timing: TimingConfig,
    pub crawl: CrawlConfig,
    pub output: OutputConfig,
    pub selectors: SelectorConfig,
}

/// Where the listing and detail pages live
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Root of the site, without trailing slash
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path segment of the results listing
    #[serde(rename = "listing-path")]
    pub listing_path: String,

    /// Path segment under which match detail pages are addressed by id
    #[serde(rename = "detail-path")]
    pub detail_path: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.premierleague.com".to_string(),
            listing_path: "results".to_string(),
            detail_path: "match".to_string(),
        }
    }
}

impl SiteConfig {
    /// URL of the results listing
    pub fn listing_url(&self) -> String {
        join_segments(&self.base_url, &[self.listing_path.as_str()])
    }

    /// URL of the detail page for a match id
    pub fn detail_url(&self, id: &str) -> String {
        join_segments(&self.base_url, &[self.detail_path.as_str(), id])
    }
}

fn join_segments(base: &str, segments: &[&str]) -> String {
    let mut url = base.trim_end_matches('/').to_string();
    for segment in segments {
        url.push('/');
        url.push_str(segment.trim_matches('/'));
    }
    url
}

/// WebDriver connection settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Address of the running geckodriver
    #[serde(rename = "webdriver-url")]
    pub webdriver_url: String,

    /// Explicit Firefox binary, when not on the default search path
    #[serde(rename = "firefox-binary")]
    pub firefox_binary: Option<PathBuf>,

    pub headless: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:4444".to_string(),
            firefox_binary: None,
            headless: true,
        }
    }
}

/// Per-call bounds on waits (milliseconds)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// How long to wait for a mandatory field before failing the item
    #[serde(rename = "mandatory-field-ms")]
    pub mandatory_field_ms: u64,

    /// How long to wait for optional markers before defaulting to zero
    #[serde(rename = "optional-field-ms")]
    pub optional_field_ms: u64,

    /// Pause after each load trigger on the listing
    #[serde(rename = "settle-delay-ms")]
    pub settle_delay_ms: u64,

    /// Upper bound on load triggers before discovery gives up
    #[serde(rename = "max-load-triggers")]
    pub max_load_triggers: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            mandatory_field_ms: 10_000,
            optional_field_ms: 5_000,
            settle_delay_ms: 3_000,
            max_load_triggers: 50,
        }
    }
}

impl TimingConfig {
    pub fn mandatory_timeout(&self) -> Duration {
        Duration::from_millis(self.mandatory_field_ms)
    }

    pub fn optional_timeout(&self) -> Duration {
        Duration::from_millis(self.optional_field_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

/// Crawl scope
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Visit at most this many discovered matches; all of them when unset
    #[serde(rename = "max-items")]
    pub max_items: Option<usize>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the CSV files are written into
    pub directory: PathBuf,

    /// File name used when every discovered match was attempted
    #[serde(rename = "full-name")]
    pub full_name: String,

    /// File name used when the crawl aborted early
    #[serde(rename = "partial-name")]
    pub partial_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            full_name: "consolidated.csv".to_string(),
            partial_name: "partial.csv".to_string(),
        }
    }
}

impl OutputConfig {
    pub fn full_path(&self) -> PathBuf {
        self.directory.join(&self.full_name)
    }

    pub fn partial_path(&self) -> PathBuf {
        self.directory.join(&self.partial_name)
    }
}

/// CSS selectors and attribute names for the listing and detail pages
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    #[serde(rename = "listing-item")]
    pub listing_item: String,

    /// Attribute on each listing item holding the match id
    #[serde(rename = "item-id-attribute")]
    pub item_id_attribute: String,

    pub kickoff: String,

    /// Attribute on the kickoff element holding the epoch milliseconds
    #[serde(rename = "kickoff-attribute")]
    pub kickoff_attribute: String,

    pub referee: String,

    #[serde(rename = "home-team")]
    pub home_team: String,

    #[serde(rename = "away-team")]
    pub away_team: String,

    pub score: String,

    #[serde(rename = "yellow-cards-home")]
    pub yellow_cards_home: String,

    #[serde(rename = "yellow-cards-away")]
    pub yellow_cards_away: String,

    #[serde(rename = "red-cards-home")]
    pub red_cards_home: String,

    #[serde(rename = "red-cards-away")]
    pub red_cards_away: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            listing_item: ".matchList .matchFixtureContainer".to_string(),
            item_id_attribute: "data-comp-match-item".to_string(),
            kickoff: ".matchDate.renderMatchDateContainer".to_string(),
            kickoff_attribute: "data-kickoff".to_string(),
            referee: ".referee".to_string(),
            home_team: ".team.home .teamName .long".to_string(),
            away_team: ".team.away .teamName .long".to_string(),
            score: ".matchScoreContainer .score.fullTime".to_string(),
            yellow_cards_home: ".eventLine .event.home .card-yellow".to_string(),
            yellow_cards_away: ".eventLine .event.away .card-yellow".to_string(),
            red_cards_home: ".eventLine .event.home .card-red".to_string(),
            red_cards_away: ".eventLine .event.away .card-red".to_string(),
        }
    }
}

impl SelectorConfig {
    /// All selectors paired with their config key, for validation and display
    pub fn entries(&self) -> [(&'static str, &str); 12] {
        [
            ("listing-item", self.listing_item.as_str()),
            ("item-id-attribute", self.item_id_attribute.as_str()),
            ("kickoff", self.kickoff.as_str()),
            ("kickoff-attribute", self.kickoff_attribute.as_str()),
            ("referee", self.referee.as_str()),
            ("home-team", self.home_team.as_str()),
            ("away-team", self.away_team.as_str()),
            ("score", self.score.as_str()),
            ("yellow-cards-home", self.yellow_cards_home.as_str()),
            ("yellow-cards-away", self.yellow_cards_away.as_str()),
            ("red-cards-home", self.red_cards_home.as_str()),
            ("red-cards-away", self.red_cards_away.as_str()),
        ]
    }
}
