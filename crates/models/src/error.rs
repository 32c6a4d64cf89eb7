use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Competition not found: {competition_guid}")]
    CompetitionNotFound { competition_guid: Uuid },

    #[error("Match not found: {match_guid}")]
    MatchNotFound { match_guid: Uuid },

    #[error("No arenas are available for match generation")]
    NoArenasAvailable,

    #[error("Simulation failed for match {match_guid}: {reason}")]
    SimulationFailure { match_guid: Uuid, reason: String },

    #[error("Store error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, GameError>;
