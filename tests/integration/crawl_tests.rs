//! Integration tests for the crawler
//!
//! These tests drive the full crawl cycle end-to-end against an in-memory
//! fixture session serving a lazily-loaded results listing and one detail
//! page per match.

use matchday::browser::FixtureSession;
use matchday::config::{Config, OutputConfig};
use matchday::crawler::{CrawlStatus, Crawler};
use matchday::output::CrawlStatistics;
use matchday::state::ItemRecord;
use tempfile::TempDir;

const BASE_URL: &str = "https://www.premierleague.com";

const HEADER: &str = "id,kickoff,referee,homeTeam,awayTeam,goalsHomeTeam,goalsAwayTeam,yellowCardsHomeTeam,yellowCardsAwayTeam,redCardsHomeTeam,redCardsAwayTeam";

/// Creates a test configuration writing into `dir`
fn create_test_config(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.site.base_url = BASE_URL.to_string();
    config.output = OutputConfig {
        directory: dir.path().to_path_buf(),
        ..OutputConfig::default()
    };
    config
}

fn match_ids(count: usize) -> Vec<String> {
    (1..=count).map(|n| n.to_string()).collect()
}

fn listing_item(id: &str) -> String {
    format!(
        r#"<section class="matchList"><div class="matchFixtureContainer" data-comp-match-item="{}"><span class="teams">fixture {}</span></div></section>"#,
        id, id
    )
}

/// A detail page; even ids get a yellow card for the home side
fn detail_page(id: &str) -> String {
    let number: u64 = id.parse().unwrap();
    let cards = if number % 2 == 0 {
        r#"<div class="event home"><span class="card-yellow"></span></div>"#
    } else {
        ""
    };

    format!(
        r#"<html><body>
        <div class="matchDate renderMatchDateContainer" data-kickoff="{}">kickoff</div>
        <div class="referee">Referee {}</div>
        <div class="team home"><div class="teamName"><span class="long">Home {}</span></div></div>
        <div class="team away"><div class="teamName"><span class="long">Away {}</span></div></div>
        <div class="matchScoreContainer"><div class="score fullTime">{}-{}</div></div>
        <div class="eventLine">{}</div>
        </body></html>"#,
        // one match per day from 2019-08-09T19:00:00Z
        1_565_377_200_000u64 + (number - 1) * 86_400_000,
        id,
        id,
        id,
        number % 4,
        number % 3,
        cards
    )
}

/// A season listing rendered 10 matches per scroll, with every detail page
fn season_session(ids: &[String]) -> FixtureSession {
    let items = ids.iter().map(|id| listing_item(id)).collect();
    let mut session =
        FixtureSession::new().with_lazy_listing(format!("{}/results", BASE_URL), items, 10);
    for id in ids {
        session = session.with_document(format!("{}/match/{}", BASE_URL, id), detail_page(id));
    }
    session
}

fn read_output(dir: &TempDir, name: &str) -> String {
    std::fs::read_to_string(dir.path().join(name)).expect("output file missing")
}

#[tokio::test]
async fn test_full_season_crawl() {
    let dir = TempDir::new().unwrap();
    let ids = match_ids(38);
    let session = season_session(&ids);
    let probe = session.probe();

    let outcome = Crawler::new(create_test_config(&dir), session).crawl().await;

    assert_eq!(outcome.status, CrawlStatus::Completed);
    assert_eq!(outcome.discovered, 38);
    assert_eq!(outcome.records.len(), 38);
    assert_eq!(outcome.complete_count(), 38);

    let recorded: Vec<&str> = outcome.records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(recorded, ids.iter().map(String::as_str).collect::<Vec<_>>());

    // listing + 38 detail pages
    assert_eq!(probe.navigations(), 39);
    assert_eq!(probe.releases(), 1);

    let csv = read_output(&dir, "consolidated.csv");
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 39);
    assert_eq!(lines[0], HEADER);
    assert_eq!(
        lines[1],
        "1,2019-08-09,Referee 1,Home 1,Away 1,1,1,0,0,0,0"
    );
    assert_eq!(
        lines[2],
        "2,2019-08-10,Referee 2,Home 2,Away 2,2,2,1,0,0,0"
    );
    assert!(!dir.path().join("partial.csv").exists());
}

#[tokio::test]
async fn test_navigation_failure_is_isolated() {
    let dir = TempDir::new().unwrap();
    let ids = match_ids(38);
    let session =
        season_session(&ids).with_failing_navigation(format!("{}/match/17", BASE_URL));
    let probe = session.probe();

    let outcome = Crawler::new(create_test_config(&dir), session).crawl().await;

    assert_eq!(outcome.status, CrawlStatus::Completed);
    assert_eq!(outcome.records.len(), 38);
    assert_eq!(outcome.records[16], ItemRecord::id_only("17"));
    assert!(outcome.records[17].is_complete());
    assert_eq!(outcome.complete_count(), 37);
    assert_eq!(outcome.id_only_count(), 1);
    assert!(probe
        .visited()
        .contains(&format!("{}/match/38", BASE_URL)));

    let csv = read_output(&dir, "consolidated.csv");
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 39);
    assert_eq!(lines[17], "17,,,,,,,,,,");
    assert!(lines[18].starts_with("18,2019-08-26,"));
}

#[tokio::test]
async fn test_session_loss_writes_partial_snapshot() {
    let dir = TempDir::new().unwrap();
    let ids = match_ids(38);
    let session = season_session(&ids).with_session_lost_on(format!("{}/match/6", BASE_URL));
    let probe = session.probe();

    let outcome = Crawler::new(create_test_config(&dir), session).crawl().await;

    assert!(matches!(outcome.status, CrawlStatus::Aborted { .. }));
    assert_eq!(outcome.records.len(), 5);
    assert_eq!(outcome.output_path, Some(dir.path().join("partial.csv")));
    assert_eq!(probe.releases(), 1);

    let csv = read_output(&dir, "partial.csv");
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], HEADER);
    assert!(lines[5].starts_with("5,"));
    assert!(!dir.path().join("consolidated.csv").exists());

    let stats = CrawlStatistics::from_outcome(&outcome);
    assert!(stats.headline().starts_with("Aborted with 5 records salvaged"));
}

#[tokio::test]
async fn test_mandatory_field_failure_continues_crawl() {
    let dir = TempDir::new().unwrap();
    let ids = match_ids(4);
    let broken = detail_page("2").replace("fullTime", "halfTime");
    let session =
        season_session(&ids).with_document(format!("{}/match/2", BASE_URL), broken);

    let outcome = Crawler::new(create_test_config(&dir), session).crawl().await;

    assert_eq!(outcome.status, CrawlStatus::Completed);
    assert_eq!(outcome.records[1], ItemRecord::id_only("2"));
    assert!(outcome.records[2].is_complete());
    assert!(outcome.records[3].is_complete());
}

#[tokio::test]
async fn test_limit_is_explicit() {
    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&dir);
    config.crawl.max_items = Some(1);
    let session = season_session(&match_ids(38));

    let outcome = Crawler::new(config, session).crawl().await;

    assert_eq!(outcome.status, CrawlStatus::Completed);
    assert_eq!(outcome.discovered, 38);
    assert_eq!(outcome.records.len(), 1);

    let csv = read_output(&dir, "consolidated.csv");
    assert_eq!(csv.lines().count(), 2);
}

#[tokio::test]
async fn test_empty_listing_writes_header_only() {
    let dir = TempDir::new().unwrap();
    let session = season_session(&[]);

    let outcome = Crawler::new(create_test_config(&dir), session).crawl().await;

    assert_eq!(outcome.status, CrawlStatus::Completed);
    assert!(outcome.records.is_empty());
    assert_eq!(read_output(&dir, "consolidated.csv"), format!("{}\n", HEADER));
}
