use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;

use matchday_services::SchedulingConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub scheduling: SchedulingSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// When true the binary runs against a seeded in-memory store instead of
    /// Postgres.
    pub in_memory: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    pub enabled: bool,
    pub url: String,
    pub stream_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulingSection {
    pub fetch_interval_seconds: u64,
    pub match_schedule_offset_hours: i64,
    pub match_sleep_ms: u64,
    pub doubles: u32,
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default values
            .set_default("database.url", "postgresql://localhost:5432/matchday_dev")?
            .set_default("database.max_connections", 20)?
            .set_default("database.in_memory", true)?
            .set_default("redis.enabled", false)?
            .set_default("redis.url", "redis://localhost:6379")?
            .set_default("redis.stream_key", "match_results")?
            .set_default("scheduling.fetch_interval_seconds", 5)?
            .set_default("scheduling.match_schedule_offset_hours", 1)?
            .set_default("scheduling.match_sleep_ms", 5000)?
            .set_default("scheduling.doubles", 1)?
            // Add in settings from configuration file
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(File::with_name("config/local").required(false))
            // Add in settings from environment variables
            .add_source(Environment::new().separator("_"))
            .build()?;

        config.try_deserialize()
    }

    pub fn scheduling_config(&self) -> SchedulingConfig {
        SchedulingConfig {
            fetch_interval_secs: self.scheduling.fetch_interval_seconds,
            match_schedule_offset_hours: self.scheduling.match_schedule_offset_hours,
            match_sleep_ms: self.scheduling.match_sleep_ms,
            doubles: self.scheduling.doubles,
        }
    }
}
