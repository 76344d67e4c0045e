//! # Barcode Intake Workflow
//!
//! Turns a scanned EAN-13 code into a catalog product. An already-cataloged
//! barcode short-circuits to the existing product without calling the
//! registry. Otherwise the EAN-DB record is fetched and the product is
//! created together with its country, company, and category in a single
//! transaction, so a failure at any point writes nothing.
//!
//! Registry values skip the catalog name validators: external data is
//! clamped to the column limits rather than rejected, since the operator
//! cannot fix the registry. Tightening follow-up edits go through the
//! regular validated endpoints.

use chrono::Utc;
use foodhub_core::EanCode;
use foodhub_eandb::ProductLookup;
use uuid::Uuid;

use crate::db;
use crate::error::AppError;
use crate::state::{AppState, ProductRecord};

/// Column character limits applied to imported registry values.
const NAME_MAX: usize = 100;
const COMPANY_MAX: usize = 50;
const COUNTRY_MAX: usize = 30;
const CATEGORY_MAX: usize = 50;

/// Outcome of the intake workflow.
#[derive(Debug)]
pub struct IntakeOutcome {
    pub product: ProductRecord,
    /// True when this call created the product, false when the barcode
    /// was already cataloged.
    pub created: bool,
}

/// Add a product to the catalog by its barcode.
///
/// Returns the existing product when the barcode is already cataloged.
/// Answers 503 without writing anything when the lookup client is not
/// configured, the registry is unreachable, or the registry record lacks
/// a required field (name, company, country, or category).
pub async fn add_product_by_ean(
    state: &AppState,
    ean: &EanCode,
) -> Result<IntakeOutcome, AppError> {
    // Already cataloged: answer with the existing product, no registry call.
    if let Some(existing) = db::products::get_by_ean(&state.db, ean.as_str()).await? {
        return Ok(IntakeOutcome {
            product: existing,
            created: false,
        });
    }

    let Some(client) = &state.lookup else {
        return Err(AppError::service_unavailable(
            "product lookup is not configured; set EAN_DB_API_URL and EAN_DB_JWT",
        ));
    };

    let Some(lookup) = client.fetch_product_data(ean, &state.config.media_root).await else {
        return Err(AppError::ServiceUnavailable(format!(
            "product data for {ean} is currently unavailable"
        )));
    };

    let (Some(name), Some(company), Some(country), Some(category)) = (
        lookup.name.as_deref(),
        lookup.company.as_deref(),
        lookup.country.as_deref(),
        lookup.category.as_deref(),
    ) else {
        return Err(AppError::ServiceUnavailable(format!(
            "the registry record for {ean} is missing required fields"
        )));
    };

    create_product(
        state,
        ean,
        &lookup,
        clamp_chars(name, NAME_MAX),
        clamp_chars(company, COMPANY_MAX),
        clamp_chars(country, COUNTRY_MAX),
        clamp_chars(category, CATEGORY_MAX),
    )
    .await
}

/// Create the product and its reference rows in one transaction.
async fn create_product(
    state: &AppState,
    ean: &EanCode,
    lookup: &ProductLookup,
    name: String,
    company_name: String,
    country_name: String,
    category_name: String,
) -> Result<IntakeOutcome, AppError> {
    let mut tx = state.db.begin().await?;

    let country = db::countries::get_or_create(tx.as_mut(), &country_name).await?;
    let company = db::companies::get_or_create(tx.as_mut(), &company_name, country.id).await?;
    let category = db::categories::get_or_create(tx.as_mut(), &category_name).await?;

    let now = Utc::now();
    let product = ProductRecord {
        id: Uuid::new_v4(),
        name,
        ean_code: ean.as_str().to_string(),
        company_id: company.id,
        company_name: company.name,
        category_id: category.id,
        category_name: category.name,
        image_path: lookup.image_path.clone(),
        created_at: now,
        updated_at: now,
    };

    match db::products::insert(tx.as_mut(), &product).await {
        Ok(()) => {
            tx.commit().await?;
            tracing::info!(ean = %ean, product_id = %product.id, "product created from barcode");
            Ok(IntakeOutcome {
                product,
                created: true,
            })
        }
        Err(err) if db::is_unique_violation(&err) => {
            // A concurrent intake claimed this barcode first. Drop our
            // reference rows and answer with the winner.
            tx.rollback().await?;
            match db::products::get_by_ean(&state.db, ean.as_str()).await? {
                Some(winner) => Ok(IntakeOutcome {
                    product: winner,
                    created: false,
                }),
                None => Err(AppError::Conflict(format!(
                    "product for {ean} was not created: it collides with an existing catalog entry"
                ))),
            }
        }
        Err(err) => Err(err.into()),
    }
}

/// Trim and truncate an imported value to a column character limit.
fn clamp_chars(s: &str, max: usize) -> String {
    s.trim().chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_keeps_short_values_intact() {
        assert_eq!(clamp_chars("Alpen Gold", COMPANY_MAX), "Alpen Gold");
    }

    #[test]
    fn clamp_trims_before_truncating() {
        assert_eq!(clamp_chars("  Milka  ", COMPANY_MAX), "Milka");
    }

    #[test]
    fn clamp_counts_characters_not_bytes() {
        // 40 Cyrillic characters are 80 bytes; all 40 fit within a
        // 50-character limit.
        let name = "ш".repeat(40);
        assert_eq!(clamp_chars(&name, COMPANY_MAX), name);

        let long = "ш".repeat(60);
        assert_eq!(clamp_chars(&long, COMPANY_MAX).chars().count(), 50);
    }
}
