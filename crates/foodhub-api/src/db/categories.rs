//! Category persistence operations.
//!
//! The expected taste profile links (`category_taste_tags`) live in
//! [`crate::db::taste_tags`] with the rest of the tag queries.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::state::CategoryRecord;

/// Insert a category. A duplicate name surfaces as a unique violation.
pub async fn insert(pool: &PgPool, record: &CategoryRecord) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO categories (id, name) VALUES ($1, $2)")
        .bind(record.id)
        .bind(&record.name)
        .execute(pool)
        .await?;
    Ok(())
}

/// List all categories ordered by name.
pub async fn list(pool: &PgPool) -> Result<Vec<CategoryRecord>, sqlx::Error> {
    sqlx::query_as::<_, CategoryRecord>("SELECT id, name FROM categories ORDER BY name")
        .fetch_all(pool)
        .await
}

/// Load a category by id.
pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<CategoryRecord>, sqlx::Error> {
    sqlx::query_as::<_, CategoryRecord>("SELECT id, name FROM categories WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Delete a category. Returns `false` when no row matched.
///
/// Products in the category go with it (ON DELETE CASCADE).
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Fetch the category with this name, creating it if absent.
pub async fn get_or_create(
    conn: &mut PgConnection,
    name: &str,
) -> Result<CategoryRecord, sqlx::Error> {
    if let Some(existing) =
        sqlx::query_as::<_, CategoryRecord>("SELECT id, name FROM categories WHERE name = $1")
            .bind(name)
            .fetch_optional(&mut *conn)
            .await?
    {
        return Ok(existing);
    }

    if let Some(created) = sqlx::query_as::<_, CategoryRecord>(
        "INSERT INTO categories (id, name) VALUES ($1, $2)
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

    sqlx::query_as::<_, CategoryRecord>("SELECT id, name FROM categories WHERE name = $1")
        .bind(name)
        .fetch_one(&mut *conn)
        .await
}
