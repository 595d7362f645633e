use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use infra::repos::courts::{self, CreateCourt};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateCourtRequest {
    pub name: Option<String>,
    pub court_number: i32,
    #[serde(default)]
    pub indoor: bool,
}

pub async fn create_court_handler(
    State(state): State<AppState>,
    Path(club_id): Path<Uuid>,
    Json(request): Json<CreateCourtRequest>,
) -> Result<impl IntoResponse, AppError> {
    let court = courts::create(
        &state.db,
        CreateCourt {
            club_id,
            name: request.name,
            court_number: request.court_number,
            indoor: request.indoor,
        },
    )
    .await?;

    Ok(Json(court))
}

pub async fn list_courts_handler(
    State(state): State<AppState>,
    Path(club_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let courts = courts::list_active_by_club(&state.db, club_id).await?;
    Ok(Json(courts))
}
