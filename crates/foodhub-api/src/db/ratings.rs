//! Rating persistence operations.
//!
//! A rating and its taste tag links are written in one transaction. Reads
//! return newest ratings first and batch-load the tag links to avoid a
//! query per rating.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::taste_tags::parse_polarity;
use crate::state::{RatingRecord, TagRef};

/// Insert a rating together with its taste tag links.
pub async fn insert(pool: &PgPool, record: &RatingRecord) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO product_ratings (id, product_id, rate, comment, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(record.id)
    .bind(record.product_id)
    .bind(record.rate)
    .bind(&record.comment)
    .bind(record.created_at)
    .bind(record.updated_at)
    .execute(tx.as_mut())
    .await?;

    for tag in &record.taste_tags {
        sqlx::query(
            "INSERT INTO rating_taste_tags (rating_id, taste_tag_id) VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(record.id)
        .bind(tag.id)
        .execute(tx.as_mut())
        .await?;
    }

    tx.commit().await
}

/// List the ratings of a product, newest first, with their taste tags.
pub async fn list_for_product(
    pool: &PgPool,
    product_id: Uuid,
) -> Result<Vec<RatingRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, RatingRow>(
        "SELECT id, product_id, rate, comment, created_at, updated_at
         FROM product_ratings
         WHERE product_id = $1
         ORDER BY created_at DESC",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;

    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let tag_rows = sqlx::query_as::<_, RatingTagRow>(
        "SELECT rt.rating_id, t.id AS tag_id, t.name, t.slug, t.polarity
         FROM rating_taste_tags rt
         JOIN taste_tags t ON t.id = rt.taste_tag_id
         WHERE rt.rating_id = ANY($1)
         ORDER BY t.name",
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    let mut tags_by_rating: HashMap<Uuid, Vec<TagRef>> = HashMap::new();
    for row in tag_rows {
        let rating_id = row.rating_id;
        tags_by_rating.entry(rating_id).or_default().push(row.into_ref());
    }

    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let taste_tags = tags_by_rating.remove(&row.id).unwrap_or_default();
        records.push(row.into_record(taste_tags));
    }
    Ok(records)
}

/// Delete a rating. Returns `false` when no row matched.
///
/// Tag links go with it (ON DELETE CASCADE).
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM product_ratings WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Total rating count, for the metrics endpoint.
pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM product_ratings")
        .fetch_one(pool)
        .await
}

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

#[derive(sqlx::FromRow)]
struct RatingRow {
    id: Uuid,
    product_id: Uuid,
    rate: i16,
    comment: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RatingRow {
    fn into_record(self, taste_tags: Vec<TagRef>) -> RatingRecord {
        RatingRecord {
            id: self.id,
            product_id: self.product_id,
            rate: self.rate,
            comment: self.comment,
            taste_tags,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct RatingTagRow {
    rating_id: Uuid,
    tag_id: Uuid,
    name: String,
    slug: String,
    polarity: String,
}

impl RatingTagRow {
    fn into_ref(self) -> TagRef {
        TagRef {
            id: self.tag_id,
            name: self.name,
            slug: self.slug,
            polarity: parse_polarity(&self.polarity),
        }
    }
}
