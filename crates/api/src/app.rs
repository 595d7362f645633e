use std::time::Duration;

use axum::{
    extract::State,
    http::{
        header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE},
        Method, StatusCode,
    },
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::error::AppError;
use crate::routes::{availability, courts, scheduling};
use crate::state::AppState;

/// Build the Axum router: health probe plus the league-scheduling surface.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Simple liveness check; also proves DB connectivity.
        .route("/health", get(health))
        .route(
            "/competitions/{competition_id}/schedule",
            post(scheduling::schedule_competition_handler),
        )
        .route(
            "/competitions/{competition_id}/matches",
            get(scheduling::list_matches_handler),
        )
        // Court and availability administration
        .route(
            "/clubs/{club_id}/courts",
            get(courts::list_courts_handler).post(courts::create_court_handler),
        )
        .route(
            "/teams/{team_id}/availability",
            post(availability::create_availability_handler)
                .delete(availability::clear_availability_handler),
        )
        .with_state(state)
        // Useful default middlewares
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer({
            let allowed_origins = std::env::var("ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000,http://localhost:3001".to_string());

            let origins: Vec<HeaderValue> = allowed_origins
                .split(',')
                .filter_map(|o| o.trim().parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([CONTENT_TYPE, AUTHORIZATION])
                .allow_credentials(true)
        })
}

/// Liveness + quick DB probe.
async fn health(State(state): State<AppState>) -> Result<&'static str, AppError> {
    let _one: i32 = sqlx::query_scalar("SELECT 1").fetch_one(&state.db).await?;
    Ok("ok")
}
