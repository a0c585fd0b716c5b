use crate::models::DbReservation;
use chrono::{NaiveDate, Utc};
use eyre::Result;
use sqlx::PgExecutor;
use uuid::Uuid;

pub async fn create_reservation<'e, E: PgExecutor<'e>>(
    executor: E,
    venue_id: Uuid,
    requester_id: Uuid,
    event_date: NaiveDate,
) -> Result<DbReservation> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let reservation = sqlx::query_as::<_, DbReservation>(
        r#"
        INSERT INTO reservation (id, venue_id, requester_id, event_date, status, created_at)
        VALUES ($1, $2, $3, $4, 'pending', $5)
        RETURNING id, venue_id, requester_id, event_date, status, created_at
        "#,
    )
    .bind(id)
    .bind(venue_id)
    .bind(requester_id)
    .bind(event_date)
    .bind(now)
    .fetch_one(executor)
    .await?;

    Ok(reservation)
}

pub async fn get_reservation_by_id<'e, E: PgExecutor<'e>>(
    executor: E,
    id: Uuid,
) -> Result<Option<DbReservation>> {
    let reservation = sqlx::query_as::<_, DbReservation>(
        r#"
        SELECT id, venue_id, requester_id, event_date, status, created_at
        FROM reservation
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(reservation)
}

/// Number of reservations holding the slot.
pub async fn count_holding<'e, E: PgExecutor<'e>>(
    executor: E,
    venue_id: Uuid,
    event_date: NaiveDate,
) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM reservation
        WHERE venue_id = $1
          AND event_date = $2
          AND status IN ('pending', 'accepted', 'confirmed')
        "#,
    )
    .bind(venue_id)
    .bind(event_date)
    .fetch_one(executor)
    .await?;

    Ok(count)
}

/// Sets `status` to `to` only while it is still `expected`. Returns whether a
/// row was updated. `created_at` is never touched.
pub async fn update_status_if<'e, E: PgExecutor<'e>>(
    executor: E,
    id: Uuid,
    expected: &str,
    to: &str,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE reservation
        SET status = $3
        WHERE id = $1 AND status = $2
        "#,
    )
    .bind(id)
    .bind(expected)
    .bind(to)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Reservations on venues owned by `owner_id`, newest first. An empty status
/// list matches every status.
pub async fn get_reservations_by_owner<'e, E: PgExecutor<'e>>(
    executor: E,
    owner_id: Uuid,
    statuses: &[String],
) -> Result<Vec<DbReservation>> {
    let reservations = sqlx::query_as::<_, DbReservation>(
        r#"
        SELECT r.id, r.venue_id, r.requester_id, r.event_date, r.status, r.created_at
        FROM reservation r
        JOIN venue v ON r.venue_id = v.id
        WHERE v.owner_id = $1
          AND (cardinality($2::VARCHAR[]) = 0 OR r.status = ANY($2))
        ORDER BY r.created_at DESC
        "#,
    )
    .bind(owner_id)
    .bind(statuses)
    .fetch_all(executor)
    .await?;

    Ok(reservations)
}

pub async fn get_reservations_by_requester<'e, E: PgExecutor<'e>>(
    executor: E,
    requester_id: Uuid,
) -> Result<Vec<DbReservation>> {
    let reservations = sqlx::query_as::<_, DbReservation>(
        r#"
        SELECT id, venue_id, requester_id, event_date, status, created_at
        FROM reservation
        WHERE requester_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(requester_id)
    .fetch_all(executor)
    .await?;

    Ok(reservations)
}
