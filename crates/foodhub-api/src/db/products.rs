//! Product persistence operations: listing, tag filtering, full-text
//! search, and the EAN-keyed lookups the intake workflow relies on.
//!
//! All reads join company and category names. Listings are ordered oldest
//! first so the browse view is stable as products are added.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::state::ProductRecord;

/// Text search configurations the search endpoint may use. Values outside
/// this list fall back to `russian` before reaching the query.
pub const SEARCH_LANGUAGES: &[&str] = &["russian", "english", "simple"];

const PRODUCT_COLS: &str = "p.id, p.name, p.ean_code, p.company_id, co.name AS company_name, \
     p.category_id, cat.name AS category_name, p.image_path, p.created_at, p.updated_at";

const PRODUCT_FROM: &str = "FROM products p \
     JOIN companies co ON co.id = p.company_id \
     JOIN categories cat ON cat.id = p.category_id";

/// Insert a product on a borrowed connection.
///
/// The intake workflow calls this inside the same transaction that created
/// the product's country, company, and category, so a duplicate EAN rolls
/// all of them back together.
pub async fn insert(conn: &mut PgConnection, record: &ProductRecord) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO products (id, name, ean_code, company_id, category_id, image_path, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(record.id)
    .bind(&record.name)
    .bind(&record.ean_code)
    .bind(record.company_id)
    .bind(record.category_id)
    .bind(&record.image_path)
    .bind(record.created_at)
    .bind(record.updated_at)
    .execute(conn)
    .await?;
    Ok(())
}

/// List all products, oldest first.
pub async fn list(pool: &PgPool) -> Result<Vec<ProductRecord>, sqlx::Error> {
    sqlx::query_as::<_, ProductRecord>(&format!(
        "SELECT {PRODUCT_COLS} {PRODUCT_FROM} ORDER BY p.created_at"
    ))
    .fetch_all(pool)
    .await
}

/// Load a product by id.
pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<ProductRecord>, sqlx::Error> {
    sqlx::query_as::<_, ProductRecord>(&format!(
        "SELECT {PRODUCT_COLS} {PRODUCT_FROM} WHERE p.id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Load a product by its barcode.
pub async fn get_by_ean(pool: &PgPool, ean: &str) -> Result<Option<ProductRecord>, sqlx::Error> {
    sqlx::query_as::<_, ProductRecord>(&format!(
        "SELECT {PRODUCT_COLS} {PRODUCT_FROM} WHERE p.ean_code = $1"
    ))
    .bind(ean)
    .fetch_optional(pool)
    .await
}

/// List products whose ratings carry the given taste tag, oldest first.
///
/// The filter goes through ratings rather than category profiles: a
/// product is "bitter" because raters said so, not because its category
/// is expected to be.
pub async fn list_by_tag_slug(pool: &PgPool, slug: &str) -> Result<Vec<ProductRecord>, sqlx::Error> {
    sqlx::query_as::<_, ProductRecord>(&format!(
        "SELECT DISTINCT {PRODUCT_COLS} {PRODUCT_FROM}
         JOIN product_ratings r ON r.product_id = p.id
         JOIN rating_taste_tags rt ON rt.rating_id = r.id
         JOIN taste_tags t ON t.id = rt.taste_tag_id
         WHERE t.slug = $1
         ORDER BY p.created_at"
    ))
    .bind(slug)
    .fetch_all(pool)
    .await
}

/// Full-text search over product and company names, best match first.
///
/// The language is bound as a parameter and cast to `regconfig`, never
/// interpolated; unsupported values fall back to `russian` so the cast
/// cannot fail at runtime. A blank query returns no rows without touching
/// the database.
pub async fn search(
    pool: &PgPool,
    language: &str,
    query: &str,
) -> Result<Vec<ProductRecord>, sqlx::Error> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(Vec::new());
    }

    let language = if SEARCH_LANGUAGES.contains(&language) {
        language
    } else {
        "russian"
    };

    sqlx::query_as::<_, ProductRecord>(&format!(
        "SELECT {PRODUCT_COLS},
                ts_rank(to_tsvector($1::regconfig, p.name || ' ' || co.name),
                        plainto_tsquery($1::regconfig, $2)) AS rank
         {PRODUCT_FROM}
         WHERE to_tsvector($1::regconfig, p.name || ' ' || co.name)
               @@ plainto_tsquery($1::regconfig, $2)
         ORDER BY rank DESC, p.created_at"
    ))
    .bind(language)
    .bind(query)
    .fetch_all(pool)
    .await
}

/// Delete a product. Returns `false` when no row matched.
///
/// Its ratings go with it (ON DELETE CASCADE).
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Total product count, for the metrics endpoint.
pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM products")
        .fetch_one(pool)
        .await
}
