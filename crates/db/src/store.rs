use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use matchday_models::{Arena, Competition, Match, MatchResult, Result};

/// Persistence seam for the scheduling engine. The engine only ever queries by
/// id or by time window and saves whole records; transactional isolation per
/// save is the store's responsibility.
#[async_trait]
pub trait MatchStore: Send + Sync {
    async fn save_competition(&self, competition: Competition) -> Result<Competition>;

    async fn competition(&self, competition_guid: Uuid) -> Result<Competition>;

    /// Team ids assigned to the competition, in assignment order.
    async fn assigned_teams(&self, competition_guid: Uuid) -> Result<Vec<Uuid>>;

    async fn save_arena(&self, arena: Arena) -> Result<Arena>;

    async fn arenas(&self) -> Result<Vec<Arena>>;

    async fn save_match(&self, match_record: Match) -> Result<Match>;

    async fn save_matches(&self, matches: Vec<Match>) -> Result<Vec<Match>>;

    async fn match_by_guid(&self, match_guid: Uuid) -> Result<Match>;

    async fn matches_of_competition(&self, competition_guid: Uuid) -> Result<Vec<Match>>;

    /// Matches that still need to be played: no result, no end timestamp, and
    /// a start time at or before `max_start`.
    async fn matches_starting_before(&self, max_start: DateTime<Utc>) -> Result<Vec<Match>>;

    async fn save_result(&self, result: MatchResult) -> Result<MatchResult>;
}
