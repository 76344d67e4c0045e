//! # Database Persistence Layer
//!
//! Postgres persistence for the FoodHub catalog via SQLx.
//!
//! The database is **required**: every catalog entity (countries,
//! companies, categories, taste tags, products, ratings) lives in
//! Postgres, and product search runs on Postgres full-text primitives.
//!
//! Module per entity, one function per query. Functions take `&PgPool`
//! except the `get_or_create` family used by the barcode intake workflow,
//! which takes `&mut PgConnection` so several of them can share one
//! transaction.

pub mod categories;
pub mod companies;
pub mod countries;
pub mod products;
pub mod ratings;
pub mod taste_tags;

use sqlx::postgres::{PgPool, PgPoolOptions};

/// Initialize the database connection pool and run embedded migrations.
///
/// `DATABASE_URL` must be set; the catalog cannot run without Postgres.
pub async fn init_pool() -> Result<PgPool, sqlx::Error> {
    let url = std::env::var("DATABASE_URL")
        .map_err(|_| sqlx::Error::Configuration("DATABASE_URL must be set".into()))?;

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .min_connections(2)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(&url)
        .await?;

    tracing::info!("connected to Postgres");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("migrations applied");

    Ok(pool)
}

/// True when the error is a Postgres unique violation (SQLSTATE 23505).
///
/// The intake workflow uses this to tell a lost insert race apart from
/// genuine failures.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_are_not_unique_violations() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
        assert!(!is_unique_violation(&sqlx::Error::PoolTimedOut));
    }
}
