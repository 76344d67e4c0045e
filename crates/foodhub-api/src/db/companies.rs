//! Company persistence operations.
//!
//! Reads join the country name so listings can show provenance without a
//! second query.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::state::CompanyRecord;

const SELECT_JOINED: &str = "SELECT co.id, co.name, co.country_id, c.name AS country_name
     FROM companies co
     JOIN countries c ON c.id = co.country_id";

/// Insert a company. A duplicate name surfaces as a unique violation and a
/// missing country as a foreign key violation.
pub async fn insert(pool: &PgPool, record: &CompanyRecord) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO companies (id, name, country_id) VALUES ($1, $2, $3)")
        .bind(record.id)
        .bind(&record.name)
        .bind(record.country_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// List all companies ordered by name.
pub async fn list(pool: &PgPool) -> Result<Vec<CompanyRecord>, sqlx::Error> {
    sqlx::query_as::<_, CompanyRecord>(&format!("{SELECT_JOINED} ORDER BY co.name"))
        .fetch_all(pool)
        .await
}

/// Load a company by id.
pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<CompanyRecord>, sqlx::Error> {
    sqlx::query_as::<_, CompanyRecord>(&format!("{SELECT_JOINED} WHERE co.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Delete a company. Returns `false` when no row matched.
///
/// The company's products go with it (ON DELETE CASCADE).
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM companies WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Total company count, for the metrics endpoint.
pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM companies")
        .fetch_one(pool)
        .await
}

/// Fetch the company with this name, creating it under the given country
/// if absent.
///
/// Companies found by name keep their original country: the name is unique
/// across the catalog, so an importer seeing a different country for an
/// existing company does not reassign it.
pub async fn get_or_create(
    conn: &mut PgConnection,
    name: &str,
    country_id: Uuid,
) -> Result<CompanyRecord, sqlx::Error> {
    if let Some(existing) =
        sqlx::query_as::<_, CompanyRecord>(&format!("{SELECT_JOINED} WHERE co.name = $1"))
            .bind(name)
            .fetch_optional(&mut *conn)
            .await?
    {
        return Ok(existing);
    }

    sqlx::query(
        "INSERT INTO companies (id, name, country_id) VALUES ($1, $2, $3)
         ON CONFLICT (name) DO NOTHING",
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(country_id)
    .execute(&mut *conn)
    .await?;

    // Either our insert landed or a concurrent writer's did; the joined
    // re-select returns the surviving row in both cases.
    sqlx::query_as::<_, CompanyRecord>(&format!("{SELECT_JOINED} WHERE co.name = $1"))
        .bind(name)
        .fetch_one(&mut *conn)
        .await
}
