//! One output row per match

/// Column names in output order
pub const COLUMNS: [&str; 11] = [
    "id",
    "kickoff",
    "referee",
    "homeTeam",
    "awayTeam",
    "goalsHomeTeam",
    "goalsAwayTeam",
    "yellowCardsHomeTeam",
    "yellowCardsAwayTeam",
    "redCardsHomeTeam",
    "redCardsAwayTeam",
];

/// Fields extracted for one match
///
/// Only `id` is guaranteed. A record built after a failed visit carries the id
/// and nothing else.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemRecord {
    pub id: String,
    /// Kickoff date as `YYYY-MM-DD` (UTC)
    pub kickoff: Option<String>,
    pub referee: Option<String>,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub goals_home: Option<String>,
    pub goals_away: Option<String>,
    pub yellow_cards_home: Option<u32>,
    pub yellow_cards_away: Option<u32>,
    pub red_cards_home: Option<u32>,
    pub red_cards_away: Option<u32>,
}

impl ItemRecord {
    /// A record for a match whose detail page could not be read
    pub fn id_only(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Returns true if anything beyond the id was recovered
    pub fn is_complete(&self) -> bool {
        self.kickoff.is_some()
    }

    /// Cell values in [`COLUMNS`] order; absent values are empty strings
    pub fn to_row(&self) -> [String; 11] {
        fn text(value: &Option<String>) -> String {
            value.clone().unwrap_or_default()
        }
        fn count(value: &Option<u32>) -> String {
            value.map(|v| v.to_string()).unwrap_or_default()
        }

        [
            self.id.clone(),
            text(&self.kickoff),
            text(&self.referee),
            text(&self.home_team),
            text(&self.away_team),
            text(&self.goals_home),
            text(&self.goals_away),
            count(&self.yellow_cards_home),
            count(&self.yellow_cards_away),
            count(&self.red_cards_home),
            count(&self.red_cards_away),
        ]
    }
}
