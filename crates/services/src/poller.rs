use std::sync::Arc;

use tokio::time::{interval, Duration};
use tracing::{debug, error};

use matchday_models::Result;

use crate::config::SchedulingConfig;
use crate::game::GameService;
use crate::matches::MatchService;

/// Recurring discovery job: every `fetch_interval_secs` it asks the store for
/// matches starting within the configured lead time and hands each one to the
/// scheduler. It performs no simulation itself, and a failed lookup only
/// skips the current cycle.
pub struct MatchPoller {
    matches: Arc<MatchService>,
    game: GameService,
    config: SchedulingConfig,
}

impl MatchPoller {
    pub fn new(matches: Arc<MatchService>, game: GameService, config: SchedulingConfig) -> Self {
        Self {
            matches,
            game,
            config,
        }
    }

    pub async fn run(&self) {
        let mut ticker = interval(Duration::from_secs(self.config.fetch_interval_secs));

        loop {
            ticker.tick().await;

            if let Err(e) = self.poll_cycle().await {
                error!("Error in scheduling cycle: {}", e);
                continue;
            }
        }
    }

    async fn poll_cycle(&self) -> Result<()> {
        let due = self
            .matches
            .matches_for_scheduling(self.config.match_schedule_offset_hours)
            .await?;

        if !due.is_empty() {
            debug!("Discovered {} matches to arm", due.len());
        }

        for match_record in due {
            self.game.schedule_match(match_record);
        }

        Ok(())
    }
}
