use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{GameError, Result};

/// A competition owns a time window and a set of assigned team references.
/// Team details live in another service; only the ids are carried here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Competition {
    pub guid: Uuid,
    pub name: String,
    pub start_at: NaiveDate,
    pub end_at: NaiveDate,
    pub teams: Vec<Uuid>,
}

impl Competition {
    pub fn new(name: String, start_at: NaiveDate, end_at: NaiveDate, teams: Vec<Uuid>) -> Self {
        Self {
            guid: Uuid::new_v4(),
            name,
            start_at,
            end_at,
            teams,
        }
    }

    /// The competition window is inclusive on both ends; the end date may not
    /// precede the start date.
    pub fn validate_window(&self) -> Result<()> {
        if self.end_at < self.start_at {
            return Err(GameError::InvalidArgument(format!(
                "Competition '{}' ends at {} before it starts at {}",
                self.name, self.end_at, self.start_at
            )));
        }
        Ok(())
    }

    /// Whether the competition is already running, i.e. the current date is on
    /// or after the start date. The end date is not considered.
    pub fn is_started(&self) -> bool {
        Local::now().date_naive() >= self.start_at
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Arena {
    pub guid: Uuid,
    pub country_code: String,
    pub city_name: String,
    pub arena_name: String,
}

impl Arena {
    pub fn new(country_code: &str, city_name: &str, arena_name: &str) -> Self {
        Self {
            guid: Uuid::new_v4(),
            country_code: country_code.to_string(),
            city_name: city_name.to_string(),
            arena_name: arena_name.to_string(),
        }
    }
}
