use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::debug;
use uuid::Uuid;

use matchday_models::{GameError, Match, MatchResult, Result};
use matchday_stream::{MatchResultMessage, ResultSender};

use crate::config::SchedulingConfig;
use crate::matches::MatchService;
use crate::scheduler::TaskScheduler;

/// Highest score either side can roll in a simulated match.
const MAX_GOALS: u8 = 4;

/// Runs matches: arms them on the scheduler and, at fire time, simulates play,
/// persists the result and publishes a notification. This is the only
/// component that attaches a result or an end timestamp to a match.
#[derive(Clone)]
pub struct GameService {
    matches: Arc<MatchService>,
    scheduler: Arc<TaskScheduler>,
    results: ResultSender,
    config: SchedulingConfig,
    rng: Arc<Mutex<SmallRng>>,
}

impl GameService {
    pub fn new(
        matches: Arc<MatchService>,
        scheduler: Arc<TaskScheduler>,
        results: ResultSender,
        config: SchedulingConfig,
    ) -> Self {
        Self {
            matches,
            scheduler,
            results,
            config,
            rng: Arc::new(Mutex::new(SmallRng::from_entropy())),
        }
    }

    /// Replaces the score RNG with a seeded one.
    pub fn with_rng(self, rng: SmallRng) -> Self {
        Self {
            rng: Arc::new(Mutex::new(rng)),
            ..self
        }
    }

    pub fn scheduler(&self) -> &Arc<TaskScheduler> {
        &self.scheduler
    }

    /// Arms the match to run at its start time. Re-arming a match that is
    /// already pending or running is a no-op inside the scheduler.
    pub fn schedule_match(&self, match_record: Match) {
        let match_guid = match_record.guid;
        let start_at = match_record.start_at.with_timezone(&Utc);

        let runner = self.clone();
        self.scheduler.arm(match_guid, start_at, async move {
            runner.run_match(match_record).await
        });
    }

    /// The timer callback for one match. Never panics the worker; any failure
    /// is reported through the returned error, logged by the scheduler, and
    /// the registry entry is removed either way.
    pub async fn run_match(&self, match_record: Match) -> Result<()> {
        let match_guid = match_record.guid;
        debug!("Started match {}", match_guid);

        // Placeholder for a real scoring engine: the game "runs" for a bit.
        tokio::time::sleep(Duration::from_millis(self.config.match_sleep_ms)).await;

        let (home_score, away_score) = {
            let mut rng = self.rng.lock();
            (
                rng.gen_range(0..=MAX_GOALS),
                rng.gen_range(0..=MAX_GOALS),
            )
        };

        let result = MatchResult::from_scores(
            match_guid,
            match_record.home_team,
            match_record.away_team,
            home_score,
            away_score,
        );
        let message = MatchResultMessage::from_result(&result);

        let finished = self
            .matches
            .publish_result(result, match_record)
            .await
            .map_err(|e| GameError::SimulationFailure {
                match_guid,
                reason: e.to_string(),
            })?;

        self.results
            .send(message)
            .map_err(|_| GameError::SimulationFailure {
                match_guid,
                reason: "Result receiver has been dropped".to_string(),
            })?;

        debug!(
            "Ended match {} ({}:{})",
            finished.guid, home_score, away_score
        );
        Ok(())
    }
}
