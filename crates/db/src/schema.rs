use eyre::Result;
use sqlx::{Executor, Pool, Postgres};
use tracing::info;

/// Name of the partial unique index that allows at most one holding
/// reservation per venue and date.
pub const HOLDING_SLOT_INDEX: &str = "reservation_holding_slot";

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Users are managed by the auth collaborator; only identity columns are read here
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY,
            username VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL,
            role VARCHAR(32) NOT NULL DEFAULT 'guest'
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create venue table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS venue (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            owner_id UUID NOT NULL,
            title VARCHAR(255) NOT NULL,
            status VARCHAR(16) NOT NULL DEFAULT 'open',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT venue_status_valid CHECK (status IN ('open', 'closed'))
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create reservation table; rows are never deleted
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reservation (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            venue_id UUID NOT NULL REFERENCES venue(id),
            requester_id UUID NOT NULL,
            event_date DATE NOT NULL,
            status VARCHAR(32) NOT NULL DEFAULT 'pending',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT reservation_status_valid CHECK (status IN (
                'pending', 'accepted', 'confirmed', 'rejected',
                'cancelled', 'cancellation_requested', 'completed'
            ))
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create unavailable_date table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS unavailable_date (
            venue_id UUID NOT NULL REFERENCES venue(id),
            date DATE NOT NULL,
            PRIMARY KEY (venue_id, date)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // One holding reservation per slot
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS reservation_holding_slot
        ON reservation (venue_id, event_date)
        WHERE status IN ('pending', 'accepted', 'confirmed');
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes (several statements, so sent as a simple query)
    pool.execute(
        r#"
        CREATE INDEX IF NOT EXISTS idx_venue_owner_id ON venue(owner_id);
        CREATE INDEX IF NOT EXISTS idx_reservation_venue_id ON reservation(venue_id);
        CREATE INDEX IF NOT EXISTS idx_reservation_requester_id ON reservation(requester_id);
        CREATE INDEX IF NOT EXISTS idx_reservation_created_at ON reservation(created_at);
        "#,
    )
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
