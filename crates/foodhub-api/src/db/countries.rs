//! Country persistence operations.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::state::CountryRecord;

/// Insert a country. A duplicate name surfaces as a unique violation.
pub async fn insert(pool: &PgPool, record: &CountryRecord) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO countries (id, name) VALUES ($1, $2)")
        .bind(record.id)
        .bind(&record.name)
        .execute(pool)
        .await?;
    Ok(())
}

/// List all countries ordered by name.
pub async fn list(pool: &PgPool) -> Result<Vec<CountryRecord>, sqlx::Error> {
    sqlx::query_as::<_, CountryRecord>("SELECT id, name FROM countries ORDER BY name")
        .fetch_all(pool)
        .await
}

/// Load a country by id.
pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<CountryRecord>, sqlx::Error> {
    sqlx::query_as::<_, CountryRecord>("SELECT id, name FROM countries WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Load a country by its unique name.
pub async fn get_by_name(
    conn: &mut PgConnection,
    name: &str,
) -> Result<Option<CountryRecord>, sqlx::Error> {
    sqlx::query_as::<_, CountryRecord>("SELECT id, name FROM countries WHERE name = $1")
        .bind(name)
        .fetch_optional(conn)
        .await
}

/// Delete a country. Returns `false` when no row matched.
///
/// Deleting a country that still has companies fails with a foreign key
/// violation; the caller maps that to a conflict.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM countries WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Fetch the country with this name, creating it if absent.
///
/// Runs on a borrowed connection so the intake workflow can call it inside
/// a transaction. Safe under concurrency: `ON CONFLICT DO NOTHING` followed
/// by a re-select resolves insert races in favor of the first writer.
pub async fn get_or_create(
    conn: &mut PgConnection,
    name: &str,
) -> Result<CountryRecord, sqlx::Error> {
    if let Some(existing) = get_by_name(&mut *conn, name).await? {
        return Ok(existing);
    }

    if let Some(created) = sqlx::query_as::<_, CountryRecord>(
        "INSERT INTO countries (id, name) VALUES ($1, $2)
         ON CONFLICT (name) DO NOTHING
         RETURNING id, name",
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .fetch_optional(&mut *conn)
    .await?
    {
        return Ok(created);
    }

    // Lost the insert race; the winner's row is visible now.
    sqlx::query_as::<_, CountryRecord>("SELECT id, name FROM countries WHERE name = $1")
        .bind(name)
        .fetch_one(&mut *conn)
        .await
}
