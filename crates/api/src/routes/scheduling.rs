use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use infra::models::CompetitionMatchRow;
use infra::repos::competition_matches;

use crate::error::AppError;
use crate::scheduling::{
    schedule_competition, CategorySchedule, ScheduleRunParams, UnscheduledRecord, WeekdayPolicy,
};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ScheduleRequest {
    pub club_id: Uuid,
    /// Monday of the calendar week round 1 belongs to.
    pub first_round_week_start: NaiveDate,
    pub reference_date: Option<NaiveDate>,
    pub match_duration_minutes: Option<i64>,
    /// Reject availability rows with malformed weekdays instead of
    /// silently ignoring them.
    #[serde(default)]
    pub strict_weekdays: bool,
    pub categories: Vec<CategorySchedule>,
}

#[derive(Serialize)]
pub struct ScheduleResponse {
    pub matches: Vec<CompetitionMatchRow>,
    pub unscheduled: Vec<UnscheduledRecord>,
}

pub async fn schedule_competition_handler(
    State(state): State<AppState>,
    Path(competition_id): Path<Uuid>,
    Json(request): Json<ScheduleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = schedule_competition(
        &state.db,
        ScheduleRunParams {
            competition_id,
            club_id: request.club_id,
            categories: request.categories,
            first_round_week_start: request.first_round_week_start,
            reference_date: request.reference_date,
            match_duration_minutes: request.match_duration_minutes,
            weekday_policy: if request.strict_weekdays {
                WeekdayPolicy::Strict
            } else {
                WeekdayPolicy::Lenient
            },
        },
    )
    .await?;

    Ok(Json(ScheduleResponse {
        matches: outcome.matches,
        unscheduled: outcome.unscheduled,
    }))
}

pub async fn list_matches_handler(
    State(state): State<AppState>,
    Path(competition_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let matches = competition_matches::list_by_competition(&state.db, competition_id).await?;
    Ok(Json(matches))
}
