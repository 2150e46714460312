use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::models::CustomLinkModel;
use super::schemas::CustomLinkData;

#[tracing::instrument(name = "Get custom link", skip(pool))]
pub async fn get_custom_link(
    pool: &PgPool,
    link_id: Uuid,
) -> Result<Option<CustomLinkData>, anyhow::Error> {
    let row = sqlx::query_as::<_, CustomLinkModel>(
        r#"
        SELECT id, seller_id, title, checkout_enabled, price_cents, discounted_price_cents,
               currency_code, usage_count, is_active, created_on
        FROM custom_link
        WHERE id = $1 AND is_active = TRUE
        "#,
    )
    .bind(link_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e)
            .context("A database failure occurred while fetching custom link from database")
    })?;
    Ok(row.map(|model| model.into_schema()))
}

#[tracing::instrument(name = "Increment custom link usage count", skip(transaction))]
pub async fn increment_usage_count(
    transaction: &mut Transaction<'_, Postgres>,
    link_id: Uuid,
) -> Result<(), anyhow::Error> {
    sqlx::query(
        r#"
        UPDATE custom_link SET usage_count = usage_count + 1, updated_on = NOW()
        WHERE id = $1
        "#,
    )
    .bind(link_id)
    .execute(&mut **transaction)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e)
            .context("A database failure occurred while incrementing custom link usage count")
    })?;
    Ok(())
}
