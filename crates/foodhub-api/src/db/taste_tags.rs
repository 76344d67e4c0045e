//! Taste tag persistence operations.
//!
//! Polarity is stored as the single-character code (`P`/`N`) and parsed
//! back into [`TastePolarity`] when rows are loaded.

use chrono::{DateTime, Utc};
use foodhub_core::TastePolarity;
use sqlx::PgPool;
use uuid::Uuid;

use crate::state::{TagRef, TasteTagRecord};

/// Insert a taste tag. Duplicate names or slugs surface as unique
/// violations.
pub async fn insert(pool: &PgPool, record: &TasteTagRecord) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO taste_tags (id, name, slug, polarity, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(record.id)
    .bind(&record.name)
    .bind(&record.slug)
    .bind(record.polarity.as_code())
    .bind(record.created_at)
    .bind(record.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// List taste tags ordered by name, optionally restricted to one polarity.
pub async fn list(
    pool: &PgPool,
    polarity: Option<TastePolarity>,
) -> Result<Vec<TasteTagRecord>, sqlx::Error> {
    let rows = match polarity {
        Some(polarity) => {
            sqlx::query_as::<_, TasteTagRow>(
                "SELECT id, name, slug, polarity, created_at, updated_at
                 FROM taste_tags WHERE polarity = $1 ORDER BY name",
            )
            .bind(polarity.as_code())
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, TasteTagRow>(
                "SELECT id, name, slug, polarity, created_at, updated_at
                 FROM taste_tags ORDER BY name",
            )
            .fetch_all(pool)
            .await?
        }
    };

    Ok(rows.into_iter().map(TasteTagRow::into_record).collect())
}

/// Load a taste tag by id.
pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<TasteTagRecord>, sqlx::Error> {
    let row = sqlx::query_as::<_, TasteTagRow>(
        "SELECT id, name, slug, polarity, created_at, updated_at
         FROM taste_tags WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(TasteTagRow::into_record))
}

/// Load a taste tag by its slug.
pub async fn get_by_slug(pool: &PgPool, slug: &str) -> Result<Option<TasteTagRecord>, sqlx::Error> {
    let row = sqlx::query_as::<_, TasteTagRow>(
        "SELECT id, name, slug, polarity, created_at, updated_at
         FROM taste_tags WHERE slug = $1",
    )
    .bind(slug)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(TasteTagRow::into_record))
}

/// Delete a taste tag. Returns `false` when no row matched.
///
/// Links from categories and ratings go with it (ON DELETE CASCADE); the
/// ratings themselves stay.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM taste_tags WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Load abbreviated refs for the given tag ids.
///
/// Unknown ids are simply absent from the result; callers that need all of
/// them to exist compare lengths.
pub async fn get_refs(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<TagRef>, sqlx::Error> {
    let rows = sqlx::query_as::<_, TagRefRow>(
        "SELECT id, name, slug, polarity FROM taste_tags WHERE id = ANY($1) ORDER BY name",
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(TagRefRow::into_ref).collect())
}

/// Replace the expected taste profile of a category with the given tags.
///
/// Runs in its own transaction so a failed insert never leaves the profile
/// half-replaced.
pub async fn set_category_tags(
    pool: &PgPool,
    category_id: Uuid,
    tag_ids: &[Uuid],
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM category_taste_tags WHERE category_id = $1")
        .bind(category_id)
        .execute(tx.as_mut())
        .await?;

    for tag_id in tag_ids {
        sqlx::query(
            "INSERT INTO category_taste_tags (category_id, taste_tag_id) VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(category_id)
        .bind(tag_id)
        .execute(tx.as_mut())
        .await?;
    }

    tx.commit().await
}

/// List the expected taste profile of a category.
pub async fn tags_for_category(
    pool: &PgPool,
    category_id: Uuid,
) -> Result<Vec<TagRef>, sqlx::Error> {
    let rows = sqlx::query_as::<_, TagRefRow>(
        "SELECT t.id, t.name, t.slug, t.polarity
         FROM taste_tags t
         JOIN category_taste_tags ct ON ct.taste_tag_id = t.id
         WHERE ct.category_id = $1
         ORDER BY t.name",
    )
    .bind(category_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(TagRefRow::into_ref).collect())
}

/// Tag counts grouped by polarity code, for the metrics endpoint.
pub async fn count_by_polarity(pool: &PgPool) -> Result<Vec<(String, i64)>, sqlx::Error> {
    sqlx::query_as::<_, (String, i64)>(
        "SELECT polarity, COUNT(*) FROM taste_tags GROUP BY polarity",
    )
    .fetch_all(pool)
    .await
}

/// Parse a stored polarity code, defaulting unrecognized values.
pub(crate) fn parse_polarity(s: &str) -> TastePolarity {
    match TastePolarity::from_code(s) {
        Ok(polarity) => polarity,
        Err(_) => {
            tracing::warn!(
                value = s,
                "unrecognized taste polarity in database, defaulting to positive"
            );
            TastePolarity::Positive
        }
    }
}

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

#[derive(sqlx::FromRow)]
pub(crate) struct TagRefRow {
    pub(crate) id: Uuid,
    pub(crate) name: String,
    pub(crate) slug: String,
    pub(crate) polarity: String,
}

impl TagRefRow {
    pub(crate) fn into_ref(self) -> TagRef {
        TagRef {
            id: self.id,
            name: self.name,
            slug: self.slug,
            polarity: parse_polarity(&self.polarity),
        }
    }
}

#[derive(sqlx::FromRow)]
struct TasteTagRow {
    id: Uuid,
    name: String,
    slug: String,
    polarity: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TasteTagRow {
    fn into_record(self) -> TasteTagRecord {
        TasteTagRecord {
            id: self.id,
            name: self.name,
            slug: self.slug,
            polarity: parse_polarity(&self.polarity),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_polarity_reads_stored_codes() {
        assert_eq!(parse_polarity("P"), TastePolarity::Positive);
        assert_eq!(parse_polarity("N"), TastePolarity::Negative);
    }

    #[test]
    fn parse_polarity_defaults_unrecognized_values() {
        assert_eq!(parse_polarity("X"), TastePolarity::Positive);
        assert_eq!(parse_polarity(""), TastePolarity::Positive);
    }
}
