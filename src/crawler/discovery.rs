//! Listing discovery
//!
//! The results listing renders more matches as the viewport approaches the end
//! of the content. A single scan undercounts, so the listing is scanned, a load
//! is triggered, and it is scanned again; discovery is done once a trigger
//! produces no growth.

use crate::browser::{BrowserSession, ElementHandle};
use crate::config::{SelectorConfig, TimingConfig};
use crate::MatchdayError;

/// Scrolls the viewport to the end of the content
pub const LOAD_MORE_SCRIPT: &str = "window.scrollTo(0, document.body.scrollHeight);";

/// Drives the listing to a stable state and returns every match id
///
/// The listing is stable when two consecutive scans, taken either side of one
/// load trigger, report the same number of items. Ids are returned in render
/// order; items without the id attribute are skipped.
///
/// # Returns
///
/// * `Ok(Vec<String>)` - Ids from the final scan
/// * `Err(MatchdayError::DiscoveryTimeout)` - Still growing after the trigger budget
/// * `Err(MatchdayError::Browser)` - The session failed while scanning
pub async fn discover_ids<S: BrowserSession>(
    session: &mut S,
    selectors: &SelectorConfig,
    timing: &TimingConfig,
) -> Result<Vec<String>, MatchdayError> {
    let mut scan = scan_listing(session, selectors, timing).await?;
    tracing::debug!("Initial listing scan: {} items", scan.len());

    for trigger in 1..=timing.max_load_triggers {
        let previous_count = scan.len();

        session.run_script(LOAD_MORE_SCRIPT).await?;
        session.sleep(timing.settle_delay()).await;

        scan = scan_listing(session, selectors, timing).await?;
        tracing::debug!(
            "Listing scan after trigger {}: {} items (was {})",
            trigger,
            scan.len(),
            previous_count
        );

        if scan.len() == previous_count {
            return collect_ids(scan, &selectors.item_id_attribute).await;
        }
    }

    Err(MatchdayError::DiscoveryTimeout {
        triggers: timing.max_load_triggers,
        last_count: scan.len(),
    })
}

/// Returns the currently rendered listing items
///
/// A wait that runs out means nothing is rendered yet, which counts as zero.
async fn scan_listing<S: BrowserSession>(
    session: &mut S,
    selectors: &SelectorConfig,
    timing: &TimingConfig,
) -> Result<Vec<S::Element>, MatchdayError> {
    match session
        .wait_for_elements(&selectors.listing_item, timing.mandatory_timeout())
        .await
    {
        Ok(elements) => Ok(elements),
        Err(e) if e.is_timeout() => {
            tracing::warn!("No listing items rendered: {}", e);
            Ok(Vec::new())
        }
        Err(e) => Err(e.into()),
    }
}

async fn collect_ids<E: ElementHandle>(
    elements: Vec<E>,
    attribute: &str,
) -> Result<Vec<String>, MatchdayError> {
    let mut ids = Vec::with_capacity(elements.len());

    for (position, element) in elements.iter().enumerate() {
        match element.attribute(attribute).await? {
            Some(id) if !id.trim().is_empty() => ids.push(id.trim().to_string()),
            _ => tracing::warn!(
                "Listing item {} has no '{}' attribute, skipping",
                position,
                attribute
            ),
        }
    }

    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::FixtureSession;
    use std::time::Duration;

    const LISTING: &str = "https://site/results";

    fn items(count: usize) -> Vec<String> {
        (1..=count)
            .map(|id| {
                format!(
                    r#"<div class="matchList"><li class="matchFixtureContainer" data-comp-match-item="{}"></li></div>"#,
                    id
                )
            })
            .collect()
    }

    fn timing(max_load_triggers: u32) -> TimingConfig {
        TimingConfig {
            max_load_triggers,
            ..TimingConfig::default()
        }
    }

    async fn listing_session(items: Vec<String>, batch: usize) -> FixtureSession {
        let mut session = FixtureSession::new().with_lazy_listing(LISTING, items, batch);
        session.navigate(LISTING).await.unwrap();
        session
    }

    #[tokio::test]
    async fn test_terminates_at_cap() {
        let mut session = listing_session(items(38), 10).await;
        let probe = session.probe();

        let ids = discover_ids(&mut session, &SelectorConfig::default(), &timing(50))
            .await
            .unwrap();

        assert_eq!(ids.len(), 38);
        assert_eq!(ids.first().map(String::as_str), Some("1"));
        assert_eq!(ids.last().map(String::as_str), Some("38"));

        // Scans: 10, 20, 30, 38, 38
        assert_eq!(probe.scripts(), 4);
        assert_eq!(probe.slept(), Duration::from_millis(4 * 3_000));
    }

    #[tokio::test]
    async fn test_fully_rendered_listing_needs_one_trigger() {
        let mut session = listing_session(items(5), 20).await;
        let probe = session.probe();

        let ids = discover_ids(&mut session, &SelectorConfig::default(), &timing(50))
            .await
            .unwrap();

        assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
        assert_eq!(probe.scripts(), 1);
    }

    #[tokio::test]
    async fn test_never_stops_before_equal_scans() {
        // Grows by one per trigger: 1, 2, 3, 3
        let mut session = listing_session(items(3), 1).await;
        let probe = session.probe();

        let ids = discover_ids(&mut session, &SelectorConfig::default(), &timing(50))
            .await
            .unwrap();

        assert_eq!(ids.len(), 3);
        assert_eq!(probe.scripts(), 3);
    }

    #[tokio::test]
    async fn test_unbounded_growth_times_out() {
        let mut session = listing_session(items(1_000), 1).await;

        let err = discover_ids(&mut session, &SelectorConfig::default(), &timing(5))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            MatchdayError::DiscoveryTimeout { triggers: 5, last_count: 6 }
        ));
    }

    #[tokio::test]
    async fn test_empty_listing_yields_no_ids() {
        let mut session = listing_session(Vec::new(), 10).await;

        let ids = discover_ids(&mut session, &SelectorConfig::default(), &timing(50))
            .await
            .unwrap();

        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn test_items_without_id_are_skipped() {
        let mut listing = items(2);
        listing.push(
            r#"<div class="matchList"><li class="matchFixtureContainer"></li></div>"#.to_string(),
        );
        let mut session = listing_session(listing, 10).await;

        let ids = discover_ids(&mut session, &SelectorConfig::default(), &timing(50))
            .await
            .unwrap();

        assert_eq!(ids, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_lost_session_propagates() {
        let mut session = FixtureSession::new().with_session_lost_on(LISTING);
        let _ = session.navigate(LISTING).await;

        let err = discover_ids(&mut session, &SelectorConfig::default(), &timing(50))
            .await
            .unwrap_err();

        assert!(matches!(err, MatchdayError::Browser(ref e) if e.is_fatal()));
    }
}
