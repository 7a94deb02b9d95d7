//! Field extraction from a live detail page
//!
//! A field is described by a [`FieldSpec`]: a selector, what to read off the
//! matching element, whether the field is mandatory, and how long to wait.
//! Mandatory fields that never appear fail the item; optional countable
//! markers that never appear count as zero.

use crate::browser::{BrowserError, BrowserSession, ElementHandle};
use chrono::{TimeZone, Utc};
use std::time::Duration;
use thiserror::Error;

/// Failures that downgrade a single match to an id-only record
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("Navigation failed: {0}")]
    Navigation(BrowserError),

    #[error("Mandatory field '{field}' did not appear ('{selector}', {timeout_ms}ms)")]
    MandatoryFieldTimeout {
        field: &'static str,
        selector: String,
        timeout_ms: u128,
    },

    #[error("Field '{field}' has no '{attribute}' attribute")]
    MissingAttribute {
        field: &'static str,
        attribute: String,
    },

    #[error("Kickoff value '{0}' is not an epoch in milliseconds")]
    InvalidKickoff(String),

    #[error("Score '{0}' is not of the form H-A")]
    MalformedScore(String),

    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),
}

impl ItemError {
    /// Returns true if the failure took the browser session down with it
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Navigation(e) | Self::Browser(e) => e.is_fatal(),
            _ => false,
        }
    }
}

/// What to read off the matched element(s)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Trimmed text of the first match
    Text,
    /// Named attribute of the first match
    Attribute(String),
    /// Number of matches
    Count,
}

/// Describes one field on a detail page
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub selector: String,
    pub kind: FieldKind,
    pub mandatory: bool,
    pub timeout: Duration,
}

impl FieldSpec {
    /// Mandatory text field
    pub fn text(name: &'static str, selector: &str, timeout: Duration) -> Self {
        Self {
            name,
            selector: selector.to_string(),
            kind: FieldKind::Text,
            mandatory: true,
            timeout,
        }
    }

    /// Mandatory attribute field
    pub fn attribute(
        name: &'static str,
        selector: &str,
        attribute: &str,
        timeout: Duration,
    ) -> Self {
        Self {
            name,
            selector: selector.to_string(),
            kind: FieldKind::Attribute(attribute.to_string()),
            mandatory: true,
            timeout,
        }
    }

    /// Optional count of markers, zero when none appear
    pub fn count(name: &'static str, selector: &str, timeout: Duration) -> Self {
        Self {
            name,
            selector: selector.to_string(),
            kind: FieldKind::Count,
            mandatory: false,
            timeout,
        }
    }

    fn failure(&self, error: BrowserError) -> ItemError {
        match error {
            BrowserError::LocatorTimeout { .. } => ItemError::MandatoryFieldTimeout {
                field: self.name,
                selector: self.selector.clone(),
                timeout_ms: self.timeout.as_millis(),
            },
            other => ItemError::Browser(other),
        }
    }
}

/// Value read for one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Count(u32),
    /// Optional field that never appeared
    Absent,
}

impl FieldValue {
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_count(&self) -> u32 {
        match self {
            Self::Count(count) => *count,
            _ => 0,
        }
    }
}

/// Reads one field off the current page
///
/// # Returns
///
/// * `Ok(FieldValue)` - The value, a zero count, or `Absent` for an optional
///   field that timed out
/// * `Err(ItemError)` - A mandatory field timed out or the session failed
pub async fn extract_field<S: BrowserSession>(
    session: &mut S,
    field_spec: &FieldSpec,
) -> Result<FieldValue, ItemError> {
    if field_spec.kind == FieldKind::Count {
        return match session.wait_for_elements(&field_spec.selector, field_spec.timeout).await {
            Ok(elements) => Ok(FieldValue::Count(elements.len() as u32)),
            Err(e) if e.is_timeout() && !field_spec.mandatory => {
                tracing::debug!(
                    "No '{}' markers within {}ms, counting 0",
                    field_spec.name,
                    field_spec.timeout.as_millis()
                );
                Ok(FieldValue::Count(0))
            }
            Err(e) => Err(field_spec.failure(e)),
        };
    }

    let element = match session.wait_for_element(&field_spec.selector, field_spec.timeout).await {
        Ok(element) => element,
        Err(e) if e.is_timeout() && !field_spec.mandatory => {
            tracing::debug!("Optional field '{}' not present", field_spec.name);
            return Ok(FieldValue::Absent);
        }
        Err(e) => return Err(field_spec.failure(e)),
    };

    match &field_spec.kind {
        FieldKind::Attribute(attribute) => match element.attribute(attribute).await? {
            Some(value) => Ok(FieldValue::Text(value)),
            None if field_spec.mandatory => Err(ItemError::MissingAttribute {
                field: field_spec.name,
                attribute: attribute.clone(),
            }),
            None => Ok(FieldValue::Absent),
        },
        _ => Ok(FieldValue::Text(element.text().await?.trim().to_string())),
    }
}

/// Converts a millisecond epoch into a UTC calendar date (`YYYY-MM-DD`)
pub fn kickoff_date(epoch_ms: &str) -> Result<String, ItemError> {
    let millis: i64 = epoch_ms
        .trim()
        .parse()
        .map_err(|_| ItemError::InvalidKickoff(epoch_ms.to_string()))?;

    Utc.timestamp_millis_opt(millis)
        .single()
        .map(|kickoff| kickoff.format("%Y-%m-%d").to_string())
        .ok_or_else(|| ItemError::InvalidKickoff(epoch_ms.to_string()))
}

/// Splits a full-time score token into home and away goals
///
/// Exactly one `-` separator is accepted; anything else, such as an
/// extended-time notation, is rejected rather than guessed at.
pub fn split_score(score: &str) -> Result<(String, String), ItemError> {
    let parts: Vec<&str> = score.split('-').map(str::trim).collect();

    match parts.as_slice() {
        [home, away] if !home.is_empty() && !away.is_empty() => {
            Ok((home.to_string(), away.to_string()))
        }
        _ => Err(ItemError::MalformedScore(score.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::FixtureSession;

    const URL: &str = "https://site/match/1";

    const PAGE: &str = r#"<html><body>
        <div class="matchDate" data-kickoff="1565380800000">Fri 9 Aug</div>
        <div class="referee">  Michael Oliver </div>
        <div class="eventLine">
            <div class="event home"><span class="card-yellow"></span></div>
            <div class="event away"><span class="card-yellow"></span><span class="card-yellow"></span></div>
        </div>
    </body></html>"#;

    async fn session() -> FixtureSession {
        let mut session = FixtureSession::new().with_document(URL, PAGE);
        session.navigate(URL).await.unwrap();
        session
    }

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[tokio::test]
    async fn test_text_field_is_trimmed() {
        let mut session = session().await;
        let field_spec = FieldSpec::text("referee", ".referee", secs(10));
        let value = extract_field(&mut session, &field_spec).await.unwrap();
        assert_eq!(value, FieldValue::Text("Michael Oliver".to_string()));
    }

    #[tokio::test]
    async fn test_attribute_field() {
        let mut session = session().await;
        let field_spec = FieldSpec::attribute("kickoff", ".matchDate", "data-kickoff", secs(10));
        let value = extract_field(&mut session, &field_spec).await.unwrap();
        assert_eq!(value.into_text(), Some("1565380800000".to_string()));
    }

    #[tokio::test]
    async fn test_missing_attribute_fails_mandatory_field() {
        let mut session = session().await;
        let field_spec = FieldSpec::attribute("kickoff", ".matchDate", "data-start", secs(10));
        let err = extract_field(&mut session, &field_spec).await.unwrap_err();
        assert!(matches!(err, ItemError::MissingAttribute { field: "kickoff", .. }));
    }

    #[tokio::test]
    async fn test_mandatory_timeout_is_error() {
        let mut session = session().await;
        let field_spec = FieldSpec::text("score", ".score.fullTime", secs(10));
        let err = extract_field(&mut session, &field_spec).await.unwrap_err();
        assert!(matches!(
            err,
            ItemError::MandatoryFieldTimeout { field: "score", timeout_ms: 10_000, .. }
        ));
        assert!(!err.is_fatal());
    }

    #[tokio::test]
    async fn test_counts_markers() {
        let mut session = session().await;
        let home = FieldSpec::count("yellow home", ".event.home .card-yellow", secs(5));
        let away = FieldSpec::count("yellow away", ".event.away .card-yellow", secs(5));
        assert_eq!(extract_field(&mut session, &home).await.unwrap(), FieldValue::Count(1));
        assert_eq!(extract_field(&mut session, &away).await.unwrap(), FieldValue::Count(2));
    }

    #[tokio::test]
    async fn test_absent_markers_count_zero() {
        let mut session = session().await;
        let field_spec = FieldSpec::count("red home", ".event.home .card-red", secs(5));
        let value = extract_field(&mut session, &field_spec).await.unwrap();
        assert_eq!(value, FieldValue::Count(0));
        assert_eq!(value.as_count(), 0);
    }

    #[tokio::test]
    async fn test_optional_text_absent() {
        let mut session = session().await;
        let field_spec = FieldSpec {
            mandatory: false,
            ..FieldSpec::text("attendance", ".attendance", secs(5))
        };
        let value = extract_field(&mut session, &field_spec).await.unwrap();
        assert_eq!(value, FieldValue::Absent);
        assert_eq!(value.into_text(), None);
    }

    #[tokio::test]
    async fn test_lost_session_is_fatal() {
        let mut session = FixtureSession::new().with_session_lost_on(URL);
        let _ = session.navigate(URL).await;

        let field_spec = FieldSpec::count("red home", ".card-red", secs(5));
        let err = extract_field(&mut session, &field_spec).await.unwrap_err();
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn test_repeat_extraction_is_identical() {
        let mut session = session().await;
        let field_spec = FieldSpec::text("referee", ".referee", secs(10));
        let first = extract_field(&mut session, &field_spec).await.unwrap();
        let second = extract_field(&mut session, &field_spec).await.unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_kickoff_date_truncates_time() {
        // 2019-08-09T19:00:00Z
        assert_eq!(kickoff_date("1565377200000").unwrap(), "2019-08-09");
        // 2019-08-10T23:59:59Z
        assert_eq!(kickoff_date(" 1565481599000 ").unwrap(), "2019-08-10");
    }

    #[test]
    fn test_kickoff_date_rejects_garbage() {
        assert!(matches!(
            kickoff_date("Fri 9 Aug"),
            Err(ItemError::InvalidKickoff(_))
        ));
    }

    #[test]
    fn test_split_score() {
        assert_eq!(
            split_score("4-1").unwrap(),
            ("4".to_string(), "1".to_string())
        );
        assert_eq!(
            split_score(" 0 - 0 ").unwrap(),
            ("0".to_string(), "0".to_string())
        );
    }

    #[test]
    fn test_split_score_is_strict() {
        assert!(matches!(split_score("2-2-4"), Err(ItemError::MalformedScore(_))));
        assert!(matches!(split_score("2"), Err(ItemError::MalformedScore(_))));
        assert!(matches!(split_score("-1"), Err(ItemError::MalformedScore(_))));
    }
}
