// Message serialization and deserialization

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use matchday_models::{Match, MatchResult};

/// Outbound notification published once per completed match. Downstream
/// consumers (budget adjustment and friends) key on the match id; delivery is
/// at-least-once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchResultMessage {
    pub match_guid: Uuid,
    pub home_score: u8,
    pub away_score: u8,
    pub winner_team: Option<Uuid>,
}

impl MatchResultMessage {
    pub fn from_result(result: &MatchResult) -> Self {
        Self {
            match_guid: result.match_guid,
            home_score: result.home_score,
            away_score: result.away_score,
            winner_team: result.winner_team,
        }
    }

    pub fn from_match(match_record: &Match) -> Option<Self> {
        match_record.result.as_ref().map(Self::from_result)
    }
}
