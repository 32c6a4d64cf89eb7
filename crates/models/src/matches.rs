use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::GameError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchKind {
    GroupStage,
    Friendly,
}

impl MatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::GroupStage => "GROUP_STAGE",
            MatchKind::Friendly => "FRIENDLY",
        }
    }
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchKind {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GROUP_STAGE" => Ok(MatchKind::GroupStage),
            "FRIENDLY" => Ok(MatchKind::Friendly),
            other => Err(GameError::InvalidArgument(format!(
                "Unknown match kind '{other}'"
            ))),
        }
    }
}

/// A fixture between two teams. `competition_guid` is empty for friendly
/// matches played outside any competition. `end_at` and `result` stay unset
/// until the match has been simulated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Match {
    pub guid: Uuid,
    pub competition_guid: Option<Uuid>,
    pub arena_guid: Uuid,
    pub home_team: Uuid,
    pub away_team: Uuid,
    pub kind: MatchKind,
    pub start_at: DateTime<FixedOffset>,
    pub end_at: Option<DateTime<FixedOffset>>,
    pub result: Option<MatchResult>,
}

impl Match {
    pub fn is_finished(&self) -> bool {
        self.result.is_some()
    }
}

/// Outcome of a simulated match. `winner_team` is empty on a tie.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchResult {
    pub match_guid: Uuid,
    pub home_score: u8,
    pub away_score: u8,
    pub winner_team: Option<Uuid>,
}

impl MatchResult {
    /// Derives the winner from the scores: the higher-scoring side wins, equal
    /// scores leave the winner unset.
    pub fn from_scores(
        match_guid: Uuid,
        home_team: Uuid,
        away_team: Uuid,
        home_score: u8,
        away_score: u8,
    ) -> Self {
        let winner_team = match home_score.cmp(&away_score) {
            std::cmp::Ordering::Greater => Some(home_team),
            std::cmp::Ordering::Less => Some(away_team),
            std::cmp::Ordering::Equal => None,
        };

        Self {
            match_guid,
            home_score,
            away_score,
            winner_team,
        }
    }

    pub fn is_draw(&self) -> bool {
        self.winner_team.is_none()
    }
}
