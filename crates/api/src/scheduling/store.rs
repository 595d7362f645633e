use chrono::{NaiveDate, NaiveDateTime};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use infra::models::CompetitionMatchRow;
use infra::repos::competition_matches::{self, CreateCompetitionMatch};

use super::types::MatchStatus;

/// A court-time range already taken, either by a league match or a
/// customer booking.
#[derive(Debug, Clone, Copy)]
pub struct OccupiedRange {
    pub court_id: Uuid,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}

/// Insert shape for one match row. Scheduled rows carry a concrete
/// court/time; pending rows carry none.
#[derive(Debug, Clone)]
pub struct NewMatch {
    pub competition_id: Uuid,
    pub category_id: Uuid,
    pub home_team_id: Uuid,
    pub away_team_id: Uuid,
    pub court_id: Option<Uuid>,
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
    pub round: i32,
    pub matchday: i32,
    pub round_week_start: NaiveDate,
    pub status: MatchStatus,
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// The store's no-overlap constraint rejected the insert: another
    /// writer took the slot between our freeness check and the commit.
    /// Recoverable; the assigner moves on to the next court.
    #[error("court slot already taken")]
    SlotConflict,

    /// Any other persistence failure. Fatal to the scheduling pass.
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

/// Persistence contract the greedy assigner runs against.
#[allow(async_fn_in_trait)]
pub trait MatchStore {
    /// Every existing booking/match intersecting [from, to) on any of the
    /// given courts. Over-returning is harmless; omissions cause false
    /// "available" decisions.
    async fn occupied_ranges(
        &self,
        court_ids: &[Uuid],
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Vec<OccupiedRange>, StoreError>;

    async fn insert_match(&self, data: &NewMatch) -> Result<CompetitionMatchRow, StoreError>;
}

/// Production store over Postgres. The server-side exclusion constraint on
/// (court_id, [start_time, end_time)) is what turns true races into
/// `SlotConflict` instead of silent double-bookings.
pub struct PgMatchStore<'a> {
    pool: &'a PgPool,
}

impl<'a> PgMatchStore<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

impl MatchStore for PgMatchStore<'_> {
    async fn occupied_ranges(
        &self,
        court_ids: &[Uuid],
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Vec<OccupiedRange>, StoreError> {
        let rows =
            competition_matches::list_occupying_ranges(self.pool, court_ids, from, to).await?;
        Ok(rows
            .into_iter()
            .map(|row| OccupiedRange {
                court_id: row.court_id,
                start_time: row.start_time,
                end_time: row.end_time,
            })
            .collect())
    }

    async fn insert_match(&self, data: &NewMatch) -> Result<CompetitionMatchRow, StoreError> {
        let create = CreateCompetitionMatch {
            competition_id: data.competition_id,
            category_id: data.category_id,
            home_team_id: data.home_team_id,
            away_team_id: data.away_team_id,
            court_id: data.court_id,
            start_time: data.start_time,
            end_time: data.end_time,
            round: data.round,
            matchday: data.matchday,
            round_week_start: data.round_week_start,
            status: data.status.as_str().to_string(),
        };

        match competition_matches::create(self.pool, create).await {
            Ok(row) => Ok(row),
            Err(e) if is_slot_conflict(&e) => Err(StoreError::SlotConflict),
            Err(e) => Err(StoreError::Db(e)),
        }
    }
}

/// Unique (23505) and exclusion (23P01) violations both mean "that slot is
/// taken"; everything else is a real failure.
fn is_slot_conflict(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .and_then(|db| db.code())
        .map(|code| code == "23505" || code == "23P01")
        .unwrap_or(false)
}
