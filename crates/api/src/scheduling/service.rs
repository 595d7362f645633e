use std::collections::HashSet;

use chrono::{Duration, Local, NaiveDate};
use sqlx::PgPool;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use infra::repos::{clubs, courts, team_availability};

use super::assigner::{assign_slots, AssignmentOutcome, AssignmentParams};
use super::availability::{
    assign_start_times, AvailabilityError, AvailabilityWindow, WeekdayPolicy,
};
use super::store::{PgMatchStore, StoreError};
use super::types::{CategorySchedule, DEFAULT_MATCH_DURATION_MINUTES};

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("club {0} not found")]
    ClubNotFound(Uuid),

    #[error(transparent)]
    Availability(#[from] AvailabilityError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

/// Parameters for one competition-wide scheduling run (parsed by the route
/// handler).
pub struct ScheduleRunParams {
    pub competition_id: Uuid,
    pub club_id: Uuid,
    /// Round-robin schedules per category, produced upstream.
    pub categories: Vec<CategorySchedule>,
    pub first_round_week_start: NaiveDate,
    /// Anchor for candidate timestamps; defaults to today.
    pub reference_date: Option<NaiveDate>,
    pub match_duration_minutes: Option<i64>,
    pub weekday_policy: WeekdayPolicy,
}

/// Run both scheduling stages for one competition: intersect the teams'
/// weekly availability into candidate start times, then greedily assign
/// club courts to them.
///
/// The caller (route handler) is responsible for request parsing and for
/// presenting the unscheduled records as an actionable follow-up list, not
/// as a failure of the run.
pub async fn schedule_competition(
    pool: &PgPool,
    params: ScheduleRunParams,
) -> Result<AssignmentOutcome, ScheduleError> {
    clubs::get_by_id(pool, params.club_id)
        .await?
        .ok_or(ScheduleError::ClubNotFound(params.club_id))?;

    // Every team that appears in any fixture.
    let team_ids: Vec<Uuid> = params
        .categories
        .iter()
        .flat_map(|category| category.rounds.iter())
        .flat_map(|round| round.iter())
        .flat_map(|fixture| [fixture.home_team_id, fixture.away_team_id])
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    let windows: Vec<AvailabilityWindow> = team_availability::list_for_teams(pool, &team_ids)
        .await?
        .into_iter()
        .map(|row| AvailabilityWindow {
            team_id: row.team_id,
            weekday: row.weekday,
            start: row.start_time,
            end: row.end_time,
        })
        .collect();

    let reference_date = params
        .reference_date
        .unwrap_or_else(|| Local::now().date_naive());
    let candidates = assign_start_times(
        &params.categories,
        &windows,
        reference_date,
        params.weekday_policy,
    )?;

    let court_ids: Vec<Uuid> = courts::list_active_by_club(pool, params.club_id)
        .await?
        .into_iter()
        .map(|court| court.id)
        .collect();
    if court_ids.is_empty() {
        warn!(club_id = %params.club_id, "no active courts; nothing can be scheduled");
    }

    info!(
        competition_id = %params.competition_id,
        categories = candidates.len(),
        courts = court_ids.len(),
        %reference_date,
        "starting assignment pass"
    );

    let store = PgMatchStore::new(pool);
    let outcome = assign_slots(
        &store,
        &candidates,
        &AssignmentParams {
            competition_id: params.competition_id,
            court_ids,
            first_round_week_start: params.first_round_week_start,
            match_duration: Duration::minutes(
                params
                    .match_duration_minutes
                    .unwrap_or(DEFAULT_MATCH_DURATION_MINUTES),
            ),
        },
    )
    .await?;

    Ok(outcome)
}
