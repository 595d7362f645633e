use chrono::{NaiveDate, NaiveDateTime};
use sqlx::{FromRow, PgExecutor, Result as SqlxResult};
use uuid::Uuid;

use crate::models::CompetitionMatchRow;

#[derive(Debug, Clone)]
pub struct CreateCompetitionMatch {
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
    pub status: String,
}

/// A court-time range already taken by an existing match or booking.
#[derive(Debug, Clone, FromRow)]
pub struct OccupiedSlotRow {
    pub court_id: Uuid,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}

/// Insert one match row. Scheduled rows hit the exclusion constraint on
/// (court_id, [start_time, end_time)); pending rows carry NULLs and do not.
pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    data: CreateCompetitionMatch,
) -> SqlxResult<CompetitionMatchRow> {
    sqlx::query_as::<_, CompetitionMatchRow>(
        r#"
        INSERT INTO competition_matches (
            competition_id, category_id, home_team_id, away_team_id,
            court_id, start_time, end_time, round, matchday, round_week_start, status
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING id, competition_id, category_id, home_team_id, away_team_id,
                  court_id, start_time, end_time, round, matchday, round_week_start,
                  status, created_at, updated_at
        "#,
    )
    .bind(data.competition_id)
    .bind(data.category_id)
    .bind(data.home_team_id)
    .bind(data.away_team_id)
    .bind(data.court_id)
    .bind(data.start_time)
    .bind(data.end_time)
    .bind(data.round)
    .bind(data.matchday)
    .bind(data.round_week_start)
    .bind(data.status)
    .fetch_one(executor)
    .await
}

pub async fn list_by_competition<'e>(
    executor: impl PgExecutor<'e>,
    competition_id: Uuid,
) -> SqlxResult<Vec<CompetitionMatchRow>> {
    sqlx::query_as::<_, CompetitionMatchRow>(
        r#"
        SELECT id, competition_id, category_id, home_team_id, away_team_id,
               court_id, start_time, end_time, round, matchday, round_week_start,
               status, created_at, updated_at
        FROM competition_matches
        WHERE competition_id = $1
        ORDER BY round ASC, start_time ASC NULLS LAST
        "#,
    )
    .bind(competition_id)
    .fetch_all(executor)
    .await
}

/// Every occupied range on the given courts that intersects [from, to):
/// scheduled league matches plus customer court bookings. Over-returning is
/// harmless to the caller; missing rows would cause false "free" decisions.
pub async fn list_occupying_ranges<'e>(
    executor: impl PgExecutor<'e>,
    court_ids: &[Uuid],
    from: NaiveDateTime,
    to: NaiveDateTime,
) -> SqlxResult<Vec<OccupiedSlotRow>> {
    sqlx::query_as::<_, OccupiedSlotRow>(
        r#"
        SELECT court_id, start_time, end_time
        FROM competition_matches
        WHERE court_id = ANY($1)
          AND status = 'scheduled'
          AND start_time < $3
          AND end_time > $2
        UNION ALL
        SELECT court_id, start_time, end_time
        FROM court_bookings
        WHERE court_id = ANY($1)
          AND start_time < $3
          AND end_time > $2
        "#,
    )
    .bind(court_ids)
    .bind(from)
    .bind(to)
    .fetch_all(executor)
    .await
}
