use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use matchday_models::{Arena, Competition, GameError, Match, MatchResult, Result};

use crate::store::MatchStore;

/// In-memory match store. Used by the demo binary and by tests; the Postgres
/// store is the production counterpart.
#[derive(Default)]
pub struct InMemoryMatchStore {
    competitions: DashMap<Uuid, Competition>,
    arenas: DashMap<Uuid, Arena>,
    matches: DashMap<Uuid, Match>,
}

impl InMemoryMatchStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MatchStore for InMemoryMatchStore {
    async fn save_competition(&self, competition: Competition) -> Result<Competition> {
        competition.validate_window()?;
        self.competitions
            .insert(competition.guid, competition.clone());
        Ok(competition)
    }

    async fn competition(&self, competition_guid: Uuid) -> Result<Competition> {
        self.competitions
            .get(&competition_guid)
            .map(|entry| entry.value().clone())
            .ok_or(GameError::CompetitionNotFound { competition_guid })
    }

    async fn assigned_teams(&self, competition_guid: Uuid) -> Result<Vec<Uuid>> {
        self.competition(competition_guid)
            .await
            .map(|competition| competition.teams)
    }

    async fn save_arena(&self, arena: Arena) -> Result<Arena> {
        self.arenas.insert(arena.guid, arena.clone());
        Ok(arena)
    }

    async fn arenas(&self) -> Result<Vec<Arena>> {
        let mut arenas: Vec<Arena> = self.arenas.iter().map(|e| e.value().clone()).collect();
        arenas.sort_by(|a, b| a.arena_name.cmp(&b.arena_name));
        Ok(arenas)
    }

    async fn save_match(&self, match_record: Match) -> Result<Match> {
        self.matches.insert(match_record.guid, match_record.clone());
        Ok(match_record)
    }

    async fn save_matches(&self, matches: Vec<Match>) -> Result<Vec<Match>> {
        for match_record in &matches {
            self.matches.insert(match_record.guid, match_record.clone());
        }
        Ok(matches)
    }

    async fn match_by_guid(&self, match_guid: Uuid) -> Result<Match> {
        self.matches
            .get(&match_guid)
            .map(|entry| entry.value().clone())
            .ok_or(GameError::MatchNotFound { match_guid })
    }

    async fn matches_of_competition(&self, competition_guid: Uuid) -> Result<Vec<Match>> {
        let mut matches: Vec<Match> = self
            .matches
            .iter()
            .filter(|entry| entry.value().competition_guid == Some(competition_guid))
            .map(|entry| entry.value().clone())
            .collect();
        matches.sort_by_key(|m| m.start_at);
        Ok(matches)
    }

    async fn matches_starting_before(&self, max_start: DateTime<Utc>) -> Result<Vec<Match>> {
        let mut matches: Vec<Match> = self
            .matches
            .iter()
            .filter(|entry| {
                let m = entry.value();
                m.result.is_none()
                    && m.end_at.is_none()
                    && m.start_at.with_timezone(&Utc) <= max_start
            })
            .map(|entry| entry.value().clone())
            .collect();
        matches.sort_by_key(|m| m.start_at);
        Ok(matches)
    }

    async fn save_result(&self, result: MatchResult) -> Result<MatchResult> {
        let match_guid = result.match_guid;
        if !self.matches.contains_key(&match_guid) {
            return Err(GameError::MatchNotFound { match_guid });
        }
        Ok(result)
    }
}
