use bigdecimal::BigDecimal;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::ConnectAccountModel;
use super::schemas::{currency_from_stripe, ConnectAccountData};
use crate::schemas::CurrencyType;
use crate::stripe_client::StripeAccountData;

#[tracing::instrument(name = "Get connect account by user", skip(pool))]
pub async fn get_connect_account_by_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<ConnectAccountData>, anyhow::Error> {
    let row = sqlx::query_as::<_, ConnectAccountModel>(
        r#"
        SELECT id, user_id, account_id, charges_enabled, payouts_enabled, details_submitted,
               requirements_currently_due, currency_code, platform_fee_percentage, is_active,
               onboarding_completed_at
        FROM connect_account
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e)
            .context("A database failure occurred while fetching connect account from database")
    })?;
    Ok(row.map(|model| model.into_schema()))
}

#[tracing::instrument(name = "Get connect account by id", skip(pool))]
pub async fn get_connect_account_by_id(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<ConnectAccountData>, anyhow::Error> {
    let row = sqlx::query_as::<_, ConnectAccountModel>(
        r#"
        SELECT id, user_id, account_id, charges_enabled, payouts_enabled, details_submitted,
               requirements_currently_due, currency_code, platform_fee_percentage, is_active,
               onboarding_completed_at
        FROM connect_account
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e)
            .context("A database failure occurred while fetching connect account from database")
    })?;
    Ok(row.map(|model| model.into_schema()))
}

#[tracing::instrument(name = "Get connect account by account id", skip(pool))]
pub async fn get_connect_account_by_account_id(
    pool: &PgPool,
    account_id: &str,
) -> Result<Option<ConnectAccountData>, anyhow::Error> {
    let row = sqlx::query_as::<_, ConnectAccountModel>(
        r#"
        SELECT id, user_id, account_id, charges_enabled, payouts_enabled, details_submitted,
               requirements_currently_due, currency_code, platform_fee_percentage, is_active,
               onboarding_completed_at
        FROM connect_account
        WHERE account_id = $1
        "#,
    )
    .bind(account_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e)
            .context("A database failure occurred while fetching connect account from database")
    })?;
    Ok(row.map(|model| model.into_schema()))
}

#[tracing::instrument(name = "Save connect account", skip(pool))]
pub async fn save_connect_account(
    pool: &PgPool,
    user_id: Uuid,
    account_id: &str,
    currency_code: &CurrencyType,
    platform_fee_percentage: &BigDecimal,
) -> Result<Uuid, anyhow::Error> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO connect_account (id, user_id, account_id, currency_code,
            platform_fee_percentage, created_on)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(account_id)
    .bind(currency_code)
    .bind(platform_fee_percentage)
    .bind(Utc::now())
    .execute(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e)
            .context("A database failure occurred while saving connect account to database")
    })?;
    Ok(id)
}

/// Overwrite local enablement state with the provider's authoritative account
/// state. `onboarding_completed_at` is stamped the first time the account is
/// fully enabled and never overwritten afterwards, even if the account is
/// later restricted.
#[tracing::instrument(name = "Apply connect account status", skip(executor, stripe_account))]
pub async fn apply_account_status<'e, E>(
    executor: E,
    stripe_account: &StripeAccountData,
) -> Result<Option<ConnectAccountData>, anyhow::Error>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    let currently_due = stripe_account
        .requirements
        .as_ref()
        .map(|requirements| requirements.currently_due.clone())
        .unwrap_or_default();
    let currency_code = stripe_account
        .default_currency
        .as_deref()
        .and_then(currency_from_stripe);
    let row = sqlx::query_as::<_, ConnectAccountModel>(
        r#"
        UPDATE connect_account
        SET charges_enabled = $2,
            payouts_enabled = $3,
            details_submitted = $4,
            requirements_currently_due = $5,
            currency_code = COALESCE($6, currency_code),
            updated_on = $7,
            onboarding_completed_at = COALESCE(
                onboarding_completed_at,
                CASE WHEN $2 AND $3 THEN $7 END
            )
        WHERE account_id = $1
        RETURNING id, user_id, account_id, charges_enabled, payouts_enabled, details_submitted,
                  requirements_currently_due, currency_code, platform_fee_percentage, is_active,
                  onboarding_completed_at
        "#,
    )
    .bind(&stripe_account.id)
    .bind(stripe_account.charges_enabled)
    .bind(stripe_account.payouts_enabled)
    .bind(stripe_account.details_submitted)
    .bind(sqlx::types::Json(currently_due))
    .bind(currency_code)
    .bind(Utc::now())
    .fetch_optional(executor)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e)
            .context("A database failure occurred while updating connect account status")
    })?;
    Ok(row.map(|model| model.into_schema()))
}
