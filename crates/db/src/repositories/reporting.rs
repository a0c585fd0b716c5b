use crate::models::{DbDashboardCounts, DbReservationSummary};
use eyre::Result;
use sqlx::PgExecutor;
use uuid::Uuid;

// Read-side dashboard queries, always scoped to the venues of one owner

pub async fn count_by_status<'e, E: PgExecutor<'e>>(
    executor: E,
    owner_id: Uuid,
    statuses: &[String],
) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM reservation r
        JOIN venue v ON r.venue_id = v.id
        WHERE v.owner_id = $1 AND r.status = ANY($2)
        "#,
    )
    .bind(owner_id)
    .bind(statuses)
    .fetch_one(executor)
    .await?;

    Ok(count)
}

/// Every dashboard counter in a single aggregate pass.
pub async fn dashboard_counts<'e, E: PgExecutor<'e>>(
    executor: E,
    owner_id: Uuid,
    pending: &[String],
    cancelled: &[String],
) -> Result<DbDashboardCounts> {
    let counts = sqlx::query_as::<_, DbDashboardCounts>(
        r#"
        SELECT
            COUNT(*) AS total_bookings,
            COUNT(*) FILTER (WHERE r.status = ANY($2)) AS pending,
            COUNT(*) FILTER (WHERE r.status = ANY($3)) AS cancelled
        FROM reservation r
        JOIN venue v ON r.venue_id = v.id
        WHERE v.owner_id = $1
        "#,
    )
    .bind(owner_id)
    .bind(pending)
    .bind(cancelled)
    .fetch_one(executor)
    .await?;

    Ok(counts)
}

/// Opens the calling transaction as a read-only snapshot.
pub async fn begin_snapshot<'e, E: PgExecutor<'e>>(executor: E) -> Result<()> {
    sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
        .execute(executor)
        .await?;

    Ok(())
}

pub async fn recent_for_owner<'e, E: PgExecutor<'e>>(
    executor: E,
    owner_id: Uuid,
    limit: i64,
) -> Result<Vec<DbReservationSummary>> {
    let rows = sqlx::query_as::<_, DbReservationSummary>(
        r#"
        SELECT
            r.id, r.event_date, r.status, r.created_at,
            v.id AS venue_id, v.title AS venue_title,
            r.requester_id,
            u.username AS requester_username, u.email AS requester_email
        FROM reservation r
        JOIN venue v ON r.venue_id = v.id
        LEFT JOIN users u ON r.requester_id = u.id
        WHERE v.owner_id = $1
        ORDER BY r.created_at DESC
        LIMIT $2
        "#,
    )
    .bind(owner_id)
    .bind(limit)
    .fetch_all(executor)
    .await?;

    Ok(rows)
}
