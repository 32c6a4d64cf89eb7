use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use matchday_models::{
    Arena, Competition, GameError, Match, MatchResult, Result,
};

use crate::store::MatchStore;

/// Postgres-backed match store.
pub struct PgMatchStore {
    pool: PgPool,
}

impl PgMatchStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct CompetitionRow {
    guid: Uuid,
    name: String,
    start_at: NaiveDate,
    end_at: NaiveDate,
}

#[derive(Debug, FromRow)]
struct ArenaRow {
    guid: Uuid,
    country_code: String,
    city_name: String,
    arena_name: String,
}

impl From<ArenaRow> for Arena {
    fn from(row: ArenaRow) -> Self {
        Arena {
            guid: row.guid,
            country_code: row.country_code,
            city_name: row.city_name,
            arena_name: row.arena_name,
        }
    }
}

/// Match joined with its optional result row. Timestamps are stored in UTC
/// alongside the original zone offset so the local match window survives a
/// round trip through `timestamptz`.
#[derive(Debug, FromRow)]
struct MatchRow {
    guid: Uuid,
    competition_guid: Option<Uuid>,
    arena_guid: Uuid,
    home_team: Uuid,
    away_team: Uuid,
    match_kind: String,
    start_at: DateTime<Utc>,
    tz_offset_seconds: i32,
    end_at: Option<DateTime<Utc>>,
    home_score: Option<i32>,
    away_score: Option<i32>,
    winner_team: Option<Uuid>,
}

impl TryFrom<MatchRow> for Match {
    type Error = GameError;

    fn try_from(row: MatchRow) -> Result<Self> {
        let offset = FixedOffset::east_opt(row.tz_offset_seconds).ok_or_else(|| {
            GameError::InvalidArgument(format!(
                "Stored zone offset {} is out of range",
                row.tz_offset_seconds
            ))
        })?;

        let result = match (row.home_score, row.away_score) {
            (Some(home_score), Some(away_score)) => Some(MatchResult {
                match_guid: row.guid,
                home_score: score_from_row(home_score)?,
                away_score: score_from_row(away_score)?,
                winner_team: row.winner_team,
            }),
            _ => None,
        };

        Ok(Match {
            guid: row.guid,
            competition_guid: row.competition_guid,
            arena_guid: row.arena_guid,
            home_team: row.home_team,
            away_team: row.away_team,
            kind: row.match_kind.parse()?,
            start_at: row.start_at.with_timezone(&offset),
            end_at: row.end_at.map(|end| end.with_timezone(&offset)),
            result,
        })
    }
}

fn score_from_row(score: i32) -> Result<u8> {
    u8::try_from(score)
        .map_err(|_| GameError::InvalidArgument(format!("Stored score {score} is out of range")))
}

const MATCH_COLUMNS: &str = "m.guid, m.competition_guid, m.arena_guid, m.home_team, \
     m.away_team, m.match_kind, m.start_at, m.tz_offset_seconds, m.end_at, \
     r.home_score, r.away_score, r.winner_team";

async fn upsert_match<'e, E>(executor: E, match_record: &Match) -> Result<()>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query(
        "INSERT INTO matches (guid, competition_guid, arena_guid, home_team, away_team, \
         match_kind, start_at, tz_offset_seconds, end_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         ON CONFLICT (guid) DO UPDATE SET end_at = EXCLUDED.end_at",
    )
    .bind(match_record.guid)
    .bind(match_record.competition_guid)
    .bind(match_record.arena_guid)
    .bind(match_record.home_team)
    .bind(match_record.away_team)
    .bind(match_record.kind.as_str())
    .bind(match_record.start_at.with_timezone(&Utc))
    .bind(match_record.start_at.offset().local_minus_utc())
    .bind(match_record.end_at.map(|end| end.with_timezone(&Utc)))
    .execute(executor)
    .await?;
    Ok(())
}

#[async_trait]
impl MatchStore for PgMatchStore {
    async fn save_competition(&self, competition: Competition) -> Result<Competition> {
        competition.validate_window()?;

        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "INSERT INTO competitions (guid, name, start_at, end_at) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (guid) DO UPDATE SET name = EXCLUDED.name, \
             start_at = EXCLUDED.start_at, end_at = EXCLUDED.end_at",
        )
        .bind(competition.guid)
        .bind(&competition.name)
        .bind(competition.start_at)
        .bind(competition.end_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM competition_teams WHERE competition_guid = $1")
            .bind(competition.guid)
            .execute(&mut *tx)
            .await?;

        for (position, team_guid) in competition.teams.iter().enumerate() {
            sqlx::query(
                "INSERT INTO competition_teams (competition_guid, team_guid, position) \
                 VALUES ($1, $2, $3)",
            )
            .bind(competition.guid)
            .bind(team_guid)
            .bind(position as i32)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(competition)
    }

    async fn competition(&self, competition_guid: Uuid) -> Result<Competition> {
        let row: Option<CompetitionRow> = sqlx::query_as(
            "SELECT guid, name, start_at, end_at FROM competitions WHERE guid = $1",
        )
        .bind(competition_guid)
        .fetch_optional(&self.pool)
        .await?;

        let row = row.ok_or(GameError::CompetitionNotFound { competition_guid })?;
        let teams = self.assigned_teams(competition_guid).await?;

        Ok(Competition {
            guid: row.guid,
            name: row.name,
            start_at: row.start_at,
            end_at: row.end_at,
            teams,
        })
    }

    async fn assigned_teams(&self, competition_guid: Uuid) -> Result<Vec<Uuid>> {
        let teams: Vec<Uuid> = sqlx::query_scalar(
            "SELECT team_guid FROM competition_teams \
             WHERE competition_guid = $1 ORDER BY position",
        )
        .bind(competition_guid)
        .fetch_all(&self.pool)
        .await?;
        Ok(teams)
    }

    async fn save_arena(&self, arena: Arena) -> Result<Arena> {
        sqlx::query(
            "INSERT INTO arenas (guid, country_code, city_name, arena_name) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (guid) DO UPDATE SET country_code = EXCLUDED.country_code, \
             city_name = EXCLUDED.city_name, arena_name = EXCLUDED.arena_name",
        )
        .bind(arena.guid)
        .bind(&arena.country_code)
        .bind(&arena.city_name)
        .bind(&arena.arena_name)
        .execute(&self.pool)
        .await?;
        Ok(arena)
    }

    async fn arenas(&self) -> Result<Vec<Arena>> {
        let rows: Vec<ArenaRow> = sqlx::query_as(
            "SELECT guid, country_code, city_name, arena_name FROM arenas ORDER BY arena_name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Arena::from).collect())
    }

    async fn save_match(&self, match_record: Match) -> Result<Match> {
        upsert_match(&self.pool, &match_record).await?;
        Ok(match_record)
    }

    async fn save_matches(&self, matches: Vec<Match>) -> Result<Vec<Match>> {
        // All-or-nothing: partial fixture lists must not be persisted.
        let mut tx = self.pool.begin().await?;
        for match_record in &matches {
            upsert_match(&mut *tx, match_record).await?;
        }
        tx.commit().await?;
        Ok(matches)
    }

    async fn match_by_guid(&self, match_guid: Uuid) -> Result<Match> {
        let query = format!(
            "SELECT {MATCH_COLUMNS} FROM matches m \
             LEFT JOIN results r ON r.match_guid = m.guid WHERE m.guid = $1"
        );
        let row: Option<MatchRow> = sqlx::query_as(&query)
            .bind(match_guid)
            .fetch_optional(&self.pool)
            .await?;

        row.ok_or(GameError::MatchNotFound { match_guid })?.try_into()
    }

    async fn matches_of_competition(&self, competition_guid: Uuid) -> Result<Vec<Match>> {
        let query = format!(
            "SELECT {MATCH_COLUMNS} FROM matches m \
             LEFT JOIN results r ON r.match_guid = m.guid \
             WHERE m.competition_guid = $1 ORDER BY m.start_at"
        );
        let rows: Vec<MatchRow> = sqlx::query_as(&query)
            .bind(competition_guid)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Match::try_from).collect()
    }

    async fn matches_starting_before(&self, max_start: DateTime<Utc>) -> Result<Vec<Match>> {
        let query = format!(
            "SELECT {MATCH_COLUMNS} FROM matches m \
             LEFT JOIN results r ON r.match_guid = m.guid \
             WHERE r.match_guid IS NULL AND m.end_at IS NULL AND m.start_at <= $1 \
             ORDER BY m.start_at"
        );
        let rows: Vec<MatchRow> = sqlx::query_as(&query)
            .bind(max_start)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Match::try_from).collect()
    }

    async fn save_result(&self, result: MatchResult) -> Result<MatchResult> {
        sqlx::query(
            "INSERT INTO results (match_guid, home_score, away_score, winner_team) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (match_guid) DO UPDATE SET home_score = EXCLUDED.home_score, \
             away_score = EXCLUDED.away_score, winner_team = EXCLUDED.winner_team",
        )
        .bind(result.match_guid)
        .bind(i32::from(result.home_score))
        .bind(i32::from(result.away_score))
        .bind(result.winner_team)
        .execute(&self.pool)
        .await?;
        Ok(result)
    }
}
