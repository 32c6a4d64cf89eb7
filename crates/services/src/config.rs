use matchday_models::{GameError, Result};

/// Scheduling knobs shared by the poller, the scheduler and the simulation
/// runner. Validated once at startup; a non-positive interval or offset is a
/// configuration error, not something to discover at poll time.
#[derive(Debug, Clone)]
pub struct SchedulingConfig {
    /// How often the poller asks the store for upcoming matches, in seconds.
    pub fetch_interval_secs: u64,
    /// Lead time for discovery: matches starting within this many hours from
    /// now are armed.
    pub match_schedule_offset_hours: i64,
    /// Placeholder duration of a running match, in milliseconds.
    pub match_sleep_ms: u64,
    /// How many times each unordered team pair plays.
    pub doubles: u32,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            fetch_interval_secs: 5,
            match_schedule_offset_hours: 1,
            match_sleep_ms: 5000,
            doubles: 1,
        }
    }
}

impl SchedulingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.fetch_interval_secs == 0 {
            return Err(GameError::InvalidArgument(
                "Fetch interval must be a positive number of seconds".to_string(),
            ));
        }
        if self.match_schedule_offset_hours <= 0 {
            return Err(GameError::InvalidArgument(
                "Schedule offset must be a positive number of hours".to_string(),
            ));
        }
        if self.doubles < 1 {
            return Err(GameError::InvalidArgument(
                "Number of doubles cannot be lower than 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SchedulingConfig::default().validate().is_ok());
    }

    #[test]
    fn test_non_positive_offset_is_rejected() {
        let config = SchedulingConfig {
            match_schedule_offset_hours: 0,
            ..SchedulingConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(GameError::InvalidArgument(_))
        ));

        let config = SchedulingConfig {
            match_schedule_offset_hours: -3,
            ..SchedulingConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let config = SchedulingConfig {
            fetch_interval_secs: 0,
            ..SchedulingConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_doubles_is_rejected() {
        let config = SchedulingConfig {
            doubles: 0,
            ..SchedulingConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
