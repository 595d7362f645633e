use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

use crate::models::TeamAvailabilityRow;

#[derive(Debug, Clone)]
pub struct CreateTeamAvailability {
    pub team_id: Uuid,
    pub weekday: i16,
    pub start_time: chrono::NaiveTime,
    pub end_time: chrono::NaiveTime,
}

pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    data: CreateTeamAvailability,
) -> SqlxResult<TeamAvailabilityRow> {
    sqlx::query_as::<_, TeamAvailabilityRow>(
        r#"
        INSERT INTO team_availability (team_id, weekday, start_time, end_time)
        VALUES ($1, $2, $3, $4)
        RETURNING id, team_id, weekday, start_time, end_time, created_at
        "#,
    )
    .bind(data.team_id)
    .bind(data.weekday)
    .bind(data.start_time)
    .bind(data.end_time)
    .fetch_one(executor)
    .await
}

pub async fn list_for_teams<'e>(
    executor: impl PgExecutor<'e>,
    team_ids: &[Uuid],
) -> SqlxResult<Vec<TeamAvailabilityRow>> {
    sqlx::query_as::<_, TeamAvailabilityRow>(
        r#"
        SELECT id, team_id, weekday, start_time, end_time, created_at
        FROM team_availability
        WHERE team_id = ANY($1)
        ORDER BY team_id, weekday, start_time ASC
        "#,
    )
    .bind(team_ids)
    .fetch_all(executor)
    .await
}

pub async fn delete_for_team<'e>(executor: impl PgExecutor<'e>, team_id: Uuid) -> SqlxResult<u64> {
    let result = sqlx::query("DELETE FROM team_availability WHERE team_id = $1")
        .bind(team_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}
