use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

use crate::models::CourtRow;

#[derive(Debug, Clone)]
pub struct CreateCourt {
    pub club_id: Uuid,
    pub name: Option<String>,
    pub court_number: i32,
    pub indoor: bool,
}

pub async fn create<'e>(executor: impl PgExecutor<'e>, data: CreateCourt) -> SqlxResult<CourtRow> {
    sqlx::query_as::<_, CourtRow>(
        r#"
        INSERT INTO courts (club_id, name, court_number, indoor)
        VALUES ($1, $2, $3, $4)
        RETURNING id, club_id, name, court_number, indoor, is_active, created_at, updated_at
        "#,
    )
    .bind(data.club_id)
    .bind(data.name)
    .bind(data.court_number)
    .bind(data.indoor)
    .fetch_one(executor)
    .await
}

/// Active courts in court-number order. The scheduling pass relies on this
/// ordering as its court tie-break, so it must stay stable.
pub async fn list_active_by_club<'e>(
    executor: impl PgExecutor<'e>,
    club_id: Uuid,
) -> SqlxResult<Vec<CourtRow>> {
    sqlx::query_as::<_, CourtRow>(
        r#"
        SELECT id, club_id, name, court_number, indoor, is_active, created_at, updated_at
        FROM courts
        WHERE club_id = $1 AND is_active = true
        ORDER BY court_number ASC
        "#,
    )
    .bind(club_id)
    .fetch_all(executor)
    .await
}
