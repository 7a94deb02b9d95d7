/// Per-item state definitions for tracking crawl progress
///
/// Every discovered match walks `Pending → Navigating → Extracting` and ends in
/// either `Complete` or `Failed`. Navigation failures skip straight to `Failed`.
use std::fmt;

/// Represents where one match is in the crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemState {
    /// Discovered but not visited yet
    Pending,

    /// The session is loading the detail page
    Navigating,

    /// Fields are being read off the detail page
    Extracting,

    /// A full record was built
    Complete,

    /// Navigation or a mandatory field failed; an id-only record stands in
    Failed,
}

impl ItemState {
    /// Returns true if no further processing happens for this item
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }

    /// Returns true if `next` is a legal successor of this state
    pub fn can_transition_to(&self, next: ItemState) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Navigating)
                | (Self::Navigating, Self::Extracting)
                | (Self::Navigating, Self::Failed)
                | (Self::Extracting, Self::Complete)
                | (Self::Extracting, Self::Failed)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Navigating => "navigating",
            Self::Extracting => "extracting",
            Self::Complete => "complete",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
