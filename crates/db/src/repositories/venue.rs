use crate::models::DbVenue;
use chrono::Utc;
use eyre::Result;
use sqlx::PgExecutor;
use uuid::Uuid;

// Venue Directory. Venues are authored elsewhere; the engine only reads them
// apart from `create_venue`, which seeds the directory.

pub async fn create_venue<'e, E: PgExecutor<'e>>(
    executor: E,
    owner_id: Uuid,
    title: &str,
    status: &str,
) -> Result<DbVenue> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let venue = sqlx::query_as::<_, DbVenue>(
        r#"
        INSERT INTO venue (id, owner_id, title, status, created_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, owner_id, title, status, created_at
        "#,
    )
    .bind(id)
    .bind(owner_id)
    .bind(title)
    .bind(status)
    .bind(now)
    .fetch_one(executor)
    .await?;

    Ok(venue)
}

pub async fn get_venue_by_id<'e, E: PgExecutor<'e>>(
    executor: E,
    id: Uuid,
) -> Result<Option<DbVenue>> {
    let venue = sqlx::query_as::<_, DbVenue>(
        r#"
        SELECT id, owner_id, title, status, created_at
        FROM venue
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(venue)
}

/// Reads the venue and holds a share lock on its row until the surrounding
/// transaction ends, so it cannot be closed mid-booking.
pub async fn get_venue_for_share<'e, E: PgExecutor<'e>>(
    executor: E,
    id: Uuid,
) -> Result<Option<DbVenue>> {
    let venue = sqlx::query_as::<_, DbVenue>(
        r#"
        SELECT id, owner_id, title, status, created_at
        FROM venue
        WHERE id = $1
        FOR SHARE
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(venue)
}

pub async fn get_venues_by_owner<'e, E: PgExecutor<'e>>(
    executor: E,
    owner_id: Uuid,
    status: Option<&str>,
) -> Result<Vec<DbVenue>> {
    let venues = sqlx::query_as::<_, DbVenue>(
        r#"
        SELECT id, owner_id, title, status, created_at
        FROM venue
        WHERE owner_id = $1
          AND ($2::VARCHAR IS NULL OR status = $2)
        ORDER BY created_at DESC
        "#,
    )
    .bind(owner_id)
    .bind(status)
    .fetch_all(executor)
    .await?;

    Ok(venues)
}
