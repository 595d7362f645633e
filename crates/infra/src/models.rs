use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ClubRow {
    pub id: Uuid,
    pub name: String,
    pub city: Option<String>,
    pub country: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CourtRow {
    pub id: Uuid,
    pub club_id: Uuid,
    pub name: Option<String>,
    pub court_number: i32,
    pub indoor: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One weekly availability window declared by a team. Weekday is
/// 0 = Monday .. 6 = Sunday; times are local wall-clock times.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TeamAvailabilityRow {
    pub id: Uuid,
    pub team_id: Uuid,
    pub weekday: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub created_at: DateTime<Utc>,
}

/// A league match. `court_id`/`start_time`/`end_time` are NULL while the
/// match is pending (no feasible slot was found for it yet).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CompetitionMatchRow {
    pub id: Uuid,
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
