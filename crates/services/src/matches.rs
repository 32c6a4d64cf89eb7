use std::sync::Arc;

use chrono::{DateTime, Duration, FixedOffset, Local, Utc};
use parking_lot::Mutex;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::debug;
use uuid::Uuid;

use matchday_db::MatchStore;
use matchday_models::{GameError, Match, MatchKind, MatchResult, Result};

use crate::generator;

/// Match orchestration over the store: fixture generation, friendly-match
/// creation, scheduling-window queries and result publication.
pub struct MatchService {
    store: Arc<dyn MatchStore>,
    rng: Mutex<SmallRng>,
    doubles: u32,
}

impl MatchService {
    pub fn new(store: Arc<dyn MatchStore>, doubles: u32) -> Self {
        Self {
            store,
            rng: Mutex::new(SmallRng::from_entropy()),
            doubles,
        }
    }

    /// Replaces the shuffle/arena RNG with a seeded one.
    pub fn with_rng(mut self, rng: SmallRng) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    pub fn store(&self) -> &Arc<dyn MatchStore> {
        &self.store
    }

    /// Generates and persists the round-robin fixture list for a competition.
    /// Generation runs at most once: if the competition already has matches,
    /// the existing ones are returned untouched. Either the whole fixture list
    /// is persisted or nothing is.
    pub async fn generate_matches(&self, competition_guid: Uuid) -> Result<Vec<Match>> {
        let competition = self.store.competition(competition_guid).await?;

        let existing = self.store.matches_of_competition(competition_guid).await?;
        if !existing.is_empty() {
            debug!(
                "Competition {} already has {} matches, skipping generation",
                competition_guid,
                existing.len()
            );
            return Ok(existing);
        }

        debug!(
            "Started generating matches for competition {}",
            competition_guid
        );
        let combinations = generator::create_combinations(&competition.teams, self.doubles)?;
        let arenas = self.store.arenas().await?;

        let matches = {
            let mut rng = self.rng.lock();
            generator::create_matches(
                &competition,
                combinations,
                &arenas,
                *Local::now().offset(),
                &mut *rng,
            )?
        };

        debug!(
            "Generated {} matches for competition {}",
            matches.len(),
            competition_guid
        );
        self.store.save_matches(matches).await
    }

    /// Creates a one-off match outside any competition.
    pub async fn create_friendly(
        &self,
        arena_guid: Uuid,
        home_team: Uuid,
        away_team: Uuid,
        start_at: DateTime<FixedOffset>,
    ) -> Result<Match> {
        if home_team == away_team {
            return Err(GameError::InvalidArgument(
                "A team cannot play against itself".to_string(),
            ));
        }

        let match_record = Match {
            guid: Uuid::new_v4(),
            competition_guid: None,
            arena_guid,
            home_team,
            away_team,
            kind: MatchKind::Friendly,
            start_at,
            end_at: None,
            result: None,
        };

        self.store.save_match(match_record).await
    }

    pub async fn get_match(&self, match_guid: Uuid) -> Result<Match> {
        self.store.match_by_guid(match_guid).await
    }

    pub async fn matches_of_competition(&self, competition_guid: Uuid) -> Result<Vec<Match>> {
        self.store.matches_of_competition(competition_guid).await
    }

    /// Matches that should be armed now: unplayed and starting within
    /// `offset_hours` from the current time.
    pub async fn matches_for_scheduling(&self, offset_hours: i64) -> Result<Vec<Match>> {
        if offset_hours <= 0 {
            return Err(GameError::InvalidArgument(
                "Offset should be a positive number".to_string(),
            ));
        }

        let max_start = Utc::now() + Duration::hours(offset_hours);
        self.store.matches_starting_before(max_start).await
    }

    /// Persists the result and stamps the match's end time, kept in the
    /// match's original zone offset.
    pub async fn publish_result(
        &self,
        result: MatchResult,
        mut match_record: Match,
    ) -> Result<Match> {
        let saved = self.store.save_result(result).await?;

        let offset = *match_record.start_at.offset();
        match_record.result = Some(saved);
        match_record.end_at = Some(Utc::now().with_timezone(&offset));

        self.store.save_match(match_record).await
    }
}
