//! Builds one [`ItemRecord`] from a loaded detail page

use crate::browser::BrowserSession;
use crate::config::{SelectorConfig, TimingConfig};
use crate::crawler::extractor::{extract_field, kickoff_date, split_score, FieldSpec, ItemError};
use crate::state::ItemRecord;

/// The field descriptors for a detail page, in extraction order
#[derive(Debug, Clone)]
pub struct DetailFields {
    pub kickoff: FieldSpec,
    pub referee: FieldSpec,
    pub home_team: FieldSpec,
    pub away_team: FieldSpec,
    pub score: FieldSpec,
    pub yellow_cards_home: FieldSpec,
    pub yellow_cards_away: FieldSpec,
    pub red_cards_home: FieldSpec,
    pub red_cards_away: FieldSpec,
}

impl DetailFields {
    pub fn new(selectors: &SelectorConfig, timing: &TimingConfig) -> Self {
        let mandatory = timing.mandatory_timeout();
        let optional = timing.optional_timeout();

        Self {
            kickoff: FieldSpec::attribute(
                "kickoff",
                &selectors.kickoff,
                &selectors.kickoff_attribute,
                mandatory,
            ),
            referee: FieldSpec::text("referee", &selectors.referee, mandatory),
            home_team: FieldSpec::text("homeTeam", &selectors.home_team, mandatory),
            away_team: FieldSpec::text("awayTeam", &selectors.away_team, mandatory),
            score: FieldSpec::text("score", &selectors.score, mandatory),
            yellow_cards_home: FieldSpec::count(
                "yellowCardsHomeTeam",
                &selectors.yellow_cards_home,
                optional,
            ),
            yellow_cards_away: FieldSpec::count(
                "yellowCardsAwayTeam",
                &selectors.yellow_cards_away,
                optional,
            ),
            red_cards_home: FieldSpec::count("redCardsHomeTeam", &selectors.red_cards_home, optional),
            red_cards_away: FieldSpec::count("redCardsAwayTeam", &selectors.red_cards_away, optional),
        }
    }
}

/// Extracts every field for match `id` from the page currently loaded
///
/// The first mandatory failure stops extraction and is returned; optional
/// markers that never appear count as zero and never stop it.
pub async fn build_record<S: BrowserSession>(
    session: &mut S,
    id: &str,
    fields: &DetailFields,
) -> Result<ItemRecord, ItemError> {
    let kickoff_ms = mandatory_text(session, &fields.kickoff).await?;
    let kickoff = kickoff_date(&kickoff_ms)?;

    let referee = mandatory_text(session, &fields.referee).await?;
    let home_team = mandatory_text(session, &fields.home_team).await?;
    let away_team = mandatory_text(session, &fields.away_team).await?;

    let score = mandatory_text(session, &fields.score).await?;
    let (goals_home, goals_away) = split_score(&score)?;

    let yellow_cards_home = extract_field(session, &fields.yellow_cards_home).await?.as_count();
    let yellow_cards_away = extract_field(session, &fields.yellow_cards_away).await?.as_count();
    let red_cards_home = extract_field(session, &fields.red_cards_home).await?.as_count();
    let red_cards_away = extract_field(session, &fields.red_cards_away).await?.as_count();

    Ok(ItemRecord {
        id: id.to_string(),
        kickoff: Some(kickoff),
        referee: Some(referee),
        home_team: Some(home_team),
        away_team: Some(away_team),
        goals_home: Some(goals_home),
        goals_away: Some(goals_away),
        yellow_cards_home: Some(yellow_cards_home),
        yellow_cards_away: Some(yellow_cards_away),
        red_cards_home: Some(red_cards_home),
        red_cards_away: Some(red_cards_away),
    })
}

async fn mandatory_text<S: BrowserSession>(
    session: &mut S,
    field_spec: &FieldSpec,
) -> Result<String, ItemError> {
    extract_field(session, field_spec)
        .await?
        .into_text()
        .ok_or_else(|| ItemError::MandatoryFieldTimeout {
            field: field_spec.name,
            selector: field_spec.selector.clone(),
            timeout_ms: field_spec.timeout.as_millis(),
        })
}
