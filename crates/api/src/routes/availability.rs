use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use infra::repos::team_availability::{self, CreateTeamAvailability};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateAvailabilityRequest {
    /// 0 = Monday .. 6 = Sunday.
    pub weekday: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Serialize)]
pub struct ClearAvailabilityResponse {
    pub deleted: u64,
}

pub async fn create_availability_handler(
    State(state): State<AppState>,
    Path(team_id): Path<Uuid>,
    Json(request): Json<CreateAvailabilityRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !(0..7).contains(&request.weekday) {
        return Err(AppError::BadRequest(format!(
            "weekday must be 0-6, got {}",
            request.weekday
        )));
    }
    if request.start_time >= request.end_time {
        return Err(AppError::BadRequest(
            "start_time must be before end_time".to_string(),
        ));
    }

    let row = team_availability::create(
        &state.db,
        CreateTeamAvailability {
            team_id,
            weekday: request.weekday,
            start_time: request.start_time,
            end_time: request.end_time,
        },
    )
    .await?;

    Ok(Json(row))
}

pub async fn clear_availability_handler(
    State(state): State<AppState>,
    Path(team_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = team_availability::delete_for_team(&state.db, team_id).await?;
    Ok(Json(ClearAvailabilityResponse { deleted }))
}
