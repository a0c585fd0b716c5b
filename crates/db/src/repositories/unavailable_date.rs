use chrono::NaiveDate;
use eyre::Result;
use sqlx::PgExecutor;
use uuid::Uuid;

pub async fn insert_unavailable_dates<'e, E: PgExecutor<'e>>(
    executor: E,
    venue_id: Uuid,
    dates: &[NaiveDate],
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO unavailable_date (venue_id, date)
        SELECT $1, d FROM UNNEST($2::DATE[]) AS d
        ON CONFLICT (venue_id, date) DO NOTHING
        "#,
    )
    .bind(venue_id)
    .bind(dates)
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn get_unavailable_dates_by_venue_id<'e, E: PgExecutor<'e>>(
    executor: E,
    venue_id: Uuid,
) -> Result<Vec<NaiveDate>> {
    let dates = sqlx::query_scalar::<_, NaiveDate>(
        r#"
        SELECT date
        FROM unavailable_date
        WHERE venue_id = $1
        ORDER BY date ASC
        "#,
    )
    .bind(venue_id)
    .fetch_all(executor)
    .await?;

    Ok(dates)
}

pub async fn is_date_unavailable<'e, E: PgExecutor<'e>>(
    executor: E,
    venue_id: Uuid,
    date: NaiveDate,
) -> Result<bool> {
    let blocked = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM unavailable_date WHERE venue_id = $1 AND date = $2
        )
        "#,
    )
    .bind(venue_id)
    .bind(date)
    .fetch_one(executor)
    .await?;

    Ok(blocked)
}

pub async fn delete_unavailable_dates_by_venue_id<'e, E: PgExecutor<'e>>(
    executor: E,
    venue_id: Uuid,
) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM unavailable_date
        WHERE venue_id = $1
        "#,
    )
    .bind(venue_id)
    .execute(executor)
    .await?;

    Ok(())
}
