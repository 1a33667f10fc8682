use std::fmt;

/// Where a transaction or order sits in the reconciliation lifecycle.
///
/// The matching engine only ever moves entities from `Unmatched` to
/// `SuggestedMatch`; confirming or rejecting a suggestion is a reviewer
/// action outside this system, so those states are read but never written
/// here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconciliationStatus {
    Unmatched,
    SuggestedMatch,
    Confirmed,
    Rejected,
}

impl ReconciliationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReconciliationStatus::Unmatched => "unmatched",
            ReconciliationStatus::SuggestedMatch => "suggested_match",
            ReconciliationStatus::Confirmed => "confirmed",
            ReconciliationStatus::Rejected => "rejected",
        }
    }

    /// Maps stored text back to a status. Unknown values fall back to
    /// `Unmatched` rather than failing a read.
    pub fn parse(value: &str) -> ReconciliationStatus {
        match value {
            "suggested_match" => ReconciliationStatus::SuggestedMatch,
            "confirmed" => ReconciliationStatus::Confirmed,
            "rejected" => ReconciliationStatus::Rejected,
            _ => ReconciliationStatus::Unmatched,
        }
    }
}

impl fmt::Display for ReconciliationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a commission link suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Suggested,
    Confirmed,
    Rejected,
}

impl LinkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkStatus::Suggested => "suggested",
            LinkStatus::Confirmed => "confirmed",
            LinkStatus::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> LinkStatus {
        match value {
            "confirmed" => LinkStatus::Confirmed,
            "rejected" => LinkStatus::Rejected,
            _ => LinkStatus::Suggested,
        }
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_text() {
        for status in [
            ReconciliationStatus::Unmatched,
            ReconciliationStatus::SuggestedMatch,
            ReconciliationStatus::Confirmed,
            ReconciliationStatus::Rejected,
        ] {
            assert_eq!(ReconciliationStatus::parse(status.as_str()), status);
        }
    }

    #[test]
    fn unknown_status_falls_back_to_unmatched() {
        assert_eq!(
            ReconciliationStatus::parse("garbage"),
            ReconciliationStatus::Unmatched
        );
        assert_eq!(
            ReconciliationStatus::parse(""),
            ReconciliationStatus::Unmatched
        );
    }

    #[test]
    fn link_status_round_trips_through_text() {
        for status in [
            LinkStatus::Suggested,
            LinkStatus::Confirmed,
            LinkStatus::Rejected,
        ] {
            assert_eq!(LinkStatus::parse(status.as_str()), status);
        }
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(
            ReconciliationStatus::SuggestedMatch.to_string(),
            "suggested_match"
        );
        assert_eq!(LinkStatus::Suggested.to_string(), "suggested");
    }
}
