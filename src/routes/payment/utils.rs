use anyhow::anyhow;
use bigdecimal::rounding::RoundingMode;
use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::Utc;
use serde_json::Value;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::errors::RefundError;
use super::models::PaymentTransactionModel;
use super::schemas::{FeeSplit, PaymentStatusType, PaymentTransactionData, RefundData, RefundRequest};
use crate::routes::order::utils::mark_order_cancelled;
use crate::schemas::CurrencyType;
use crate::stripe_client::StripeClient;

/// Split a gross amount in minor units into the platform fee and the seller
/// share. The fee is rounded half-up; the remainder goes to the seller, so
/// the two parts always sum exactly to the gross amount.
pub fn calculate_fee_split(
    gross_amount: i64,
    fee_percentage: &BigDecimal,
) -> Result<FeeSplit, anyhow::Error> {
    if gross_amount < 0 {
        return Err(anyhow!("Gross amount must be non-negative"));
    }
    if fee_percentage < &BigDecimal::from(0) || fee_percentage > &BigDecimal::from(100) {
        return Err(anyhow!("Platform fee percentage must be between 0 and 100"));
    }
    let platform_fee = (BigDecimal::from(gross_amount) * fee_percentage / BigDecimal::from(100))
        .with_scale_round(0, RoundingMode::HalfUp)
        .to_i64()
        .ok_or_else(|| anyhow!("Platform fee does not fit into an integer amount"))?;
    Ok(FeeSplit {
        platform_fee,
        seller_amount: gross_amount - platform_fee,
    })
}

/// Platform-fee share of a refund, proportional to the refunded fraction of
/// the total, rounded with the same rule as the original split.
pub fn calculate_refund_fee_share(platform_fee: i64, refund_amount: i64, total_amount: i64) -> i64 {
    if total_amount == 0 {
        return 0;
    }
    (BigDecimal::from(platform_fee) * BigDecimal::from(refund_amount)
        / BigDecimal::from(total_amount))
    .with_scale_round(0, RoundingMode::HalfUp)
    .to_i64()
    .unwrap_or(0)
}

/// Resolves the requested refund amount against the transaction's remaining
/// balance. Over-refunding is rejected, never clamped.
pub fn validate_refund_amount(
    transaction_data: &PaymentTransactionData,
    requested: Option<i64>,
) -> Result<i64, anyhow::Error> {
    if !transaction_data.payment_status.is_refundable() {
        return Err(anyhow!(
            "Only settled payments can be refunded, current status is {}",
            transaction_data.payment_status
        ));
    }
    let remaining = transaction_data.remaining_refundable();
    let amount = requested.unwrap_or(remaining);
    if amount <= 0 {
        return Err(anyhow!("Refund amount must be positive"));
    }
    if amount > remaining {
        return Err(anyhow!(
            "Refund of {} exceeds the remaining refundable balance of {}",
            amount,
            remaining
        ));
    }
    Ok(amount)
}

#[allow(clippy::too_many_arguments)]
#[tracing::instrument(name = "Save payment transaction", skip(transaction, metadata))]
pub async fn save_payment_transaction(
    transaction: &mut Transaction<'_, Postgres>,
    order_ref: Uuid,
    connect_account_id: Uuid,
    session_id: Option<&str>,
    payment_intent_id: Option<&str>,
    total_amount: i64,
    fee_split: &FeeSplit,
    currency_code: &CurrencyType,
    metadata: &Value,
) -> Result<Uuid, anyhow::Error> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO payment_transaction (id, order_ref, connect_account_id, session_id,
            payment_intent_id, total_amount, platform_fee, seller_amount, currency_code,
            payment_status, metadata, created_on)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'pending', $10, $11)
        "#,
    )
    .bind(id)
    .bind(order_ref)
    .bind(connect_account_id)
    .bind(session_id)
    .bind(payment_intent_id)
    .bind(total_amount)
    .bind(fee_split.platform_fee)
    .bind(fee_split.seller_amount)
    .bind(currency_code)
    .bind(metadata)
    .bind(Utc::now())
    .execute(&mut **transaction)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e)
            .context("A database failure occurred while saving payment transaction to database")
    })?;
    Ok(id)
}

#[tracing::instrument(name = "Get payment transaction by intent", skip(pool))]
pub async fn get_transaction_by_payment_intent(
    pool: &PgPool,
    payment_intent_id: &str,
) -> Result<Option<PaymentTransactionData>, anyhow::Error> {
    let row = sqlx::query_as::<_, PaymentTransactionModel>(
        r#"
        SELECT id, order_ref, connect_account_id, session_id, payment_intent_id, charge_id,
               transfer_id, total_amount, platform_fee, seller_amount, currency_code,
               payment_status, refunded_amount, platform_fee_refunded, metadata, created_on,
               succeeded_on
        FROM payment_transaction
        WHERE payment_intent_id = $1
        "#,
    )
    .bind(payment_intent_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e)
            .context("A database failure occurred while fetching payment transaction from database")
    })?;
    Ok(row.map(|model| model.into_schema()))
}

#[tracing::instrument(name = "Get payment transaction by intent with lock", skip(transaction))]
pub async fn get_transaction_by_payment_intent_with_lock(
    transaction: &mut Transaction<'_, Postgres>,
    payment_intent_id: &str,
) -> Result<Option<PaymentTransactionData>, anyhow::Error> {
    let row = sqlx::query_as::<_, PaymentTransactionModel>(
        r#"
        SELECT id, order_ref, connect_account_id, session_id, payment_intent_id, charge_id,
               transfer_id, total_amount, platform_fee, seller_amount, currency_code,
               payment_status, refunded_amount, platform_fee_refunded, metadata, created_on,
               succeeded_on
        FROM payment_transaction
        WHERE payment_intent_id = $1
        FOR UPDATE
        "#,
    )
    .bind(payment_intent_id)
    .fetch_optional(&mut **transaction)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e)
            .context("A database failure occurred while fetching payment transaction with lock")
    })?;
    Ok(row.map(|model| model.into_schema()))
}

#[tracing::instrument(name = "Get payment transaction by session with lock", skip(transaction))]
pub async fn get_transaction_by_session_with_lock(
    transaction: &mut Transaction<'_, Postgres>,
    session_id: &str,
) -> Result<Option<PaymentTransactionData>, anyhow::Error> {
    let row = sqlx::query_as::<_, PaymentTransactionModel>(
        r#"
        SELECT id, order_ref, connect_account_id, session_id, payment_intent_id, charge_id,
               transfer_id, total_amount, platform_fee, seller_amount, currency_code,
               payment_status, refunded_amount, platform_fee_refunded, metadata, created_on,
               succeeded_on
        FROM payment_transaction
        WHERE session_id = $1
        FOR UPDATE
        "#,
    )
    .bind(session_id)
    .fetch_optional(&mut **transaction)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e)
            .context("A database failure occurred while fetching payment transaction with lock")
    })?;
    Ok(row.map(|model| model.into_schema()))
}

/// Settles a pending transaction. The pending-status guard in the WHERE
/// clause makes a replayed settlement a no-op.
#[tracing::instrument(name = "Mark transaction succeeded", skip(transaction, provider_metadata))]
pub async fn mark_transaction_succeeded(
    transaction: &mut Transaction<'_, Postgres>,
    id: Uuid,
    payment_intent_id: Option<&str>,
    charge_id: Option<&str>,
    provider_metadata: &Value,
) -> Result<bool, anyhow::Error> {
    let result = sqlx::query(
        r#"
        UPDATE payment_transaction
        SET payment_status = 'succeeded',
            payment_intent_id = COALESCE(payment_intent_id, $2),
            charge_id = COALESCE($3, charge_id),
            metadata = COALESCE(metadata, '{}'::jsonb) || $4::jsonb,
            succeeded_on = $5,
            updated_on = $5
        WHERE id = $1 AND payment_status = 'pending'
        "#,
    )
    .bind(id)
    .bind(payment_intent_id)
    .bind(charge_id)
    .bind(provider_metadata)
    .bind(Utc::now())
    .execute(&mut **transaction)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e)
            .context("A database failure occurred while marking payment transaction as succeeded")
    })?;
    Ok(result.rows_affected() == 1)
}

#[tracing::instrument(name = "Mark transaction failed", skip(transaction))]
pub async fn mark_transaction_failed(
    transaction: &mut Transaction<'_, Postgres>,
    id: Uuid,
) -> Result<bool, anyhow::Error> {
    let result = sqlx::query(
        r#"
        UPDATE payment_transaction
        SET payment_status = 'failed', updated_on = $2
        WHERE id = $1 AND payment_status = 'pending'
        "#,
    )
    .bind(id)
    .bind(Utc::now())
    .execute(&mut **transaction)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e)
            .context("A database failure occurred while marking payment transaction as failed")
    })?;
    Ok(result.rows_affected() == 1)
}

#[tracing::instrument(name = "Apply refund amounts", skip(transaction))]
pub async fn apply_refund_amounts(
    transaction: &mut Transaction<'_, Postgres>,
    id: Uuid,
    refunded_amount_total: i64,
    platform_fee_refunded_total: i64,
    payment_status: PaymentStatusType,
) -> Result<(), anyhow::Error> {
    sqlx::query(
        r#"
        UPDATE payment_transaction
        SET refunded_amount = $2, platform_fee_refunded = $3, payment_status = $4, updated_on = $5
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(refunded_amount_total)
    .bind(platform_fee_refunded_total)
    .bind(payment_status)
    .bind(Utc::now())
    .execute(&mut **transaction)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e)
            .context("A database failure occurred while applying refund amounts to transaction")
    })?;
    Ok(())
}

/// Refund orchestration: validates the remaining balance under a row lock,
/// instructs the provider to refund with fee and transfer reversal, then
/// applies the cumulative amounts. A fully refunded transaction also cancels
/// its order inside the same database transaction.
#[tracing::instrument(name = "Execute refund", skip(pool, stripe_client))]
pub async fn execute_refund(
    pool: &PgPool,
    stripe_client: &StripeClient,
    request: &RefundRequest,
) -> Result<RefundData, RefundError> {
    let mut transaction = pool
        .begin()
        .await
        .map_err(|e| RefundError::UnexpectedError(anyhow::Error::new(e)))?;

    let transaction_data =
        get_transaction_by_payment_intent_with_lock(&mut transaction, &request.payment_intent_id)
            .await
            .map_err(|e| {
                RefundError::DatabaseError("Failed to fetch payment transaction".to_string(), e)
            })?
            .ok_or_else(|| {
                RefundError::DataNotFound(format!(
                    "No payment transaction exists for {}",
                    request.payment_intent_id
                ))
            })?;

    if transaction_data.charge_id.is_none() {
        return Err(RefundError::ValidationError(
            "No settled charge exists for this payment".to_string(),
        ));
    }

    let refund_amount = validate_refund_amount(&transaction_data, request.amount)
        .map_err(|e| RefundError::ValidationError(e.to_string()))?;

    let stripe_refund = stripe_client
        .create_refund(
            &request.payment_intent_id,
            Some(refund_amount),
            request.reason.map(|reason| reason.as_str()),
        )
        .await
        .map_err(|e| RefundError::UnexpectedCustomError(e.to_string()))?;
    tracing::info!(
        "Provider refund {} created for {} minor units",
        stripe_refund.id,
        stripe_refund.amount
    );

    let refunded_amount_total = transaction_data.refunded_amount + refund_amount;
    let fee_share = calculate_refund_fee_share(
        transaction_data.platform_fee,
        refund_amount,
        transaction_data.total_amount,
    );
    let platform_fee_refunded_total = std::cmp::min(
        transaction_data.platform_fee_refunded + fee_share,
        transaction_data.platform_fee,
    );
    let payment_status = if refunded_amount_total >= transaction_data.total_amount {
        PaymentStatusType::Refunded
    } else {
        PaymentStatusType::PartiallyRefunded
    };

    apply_refund_amounts(
        &mut transaction,
        transaction_data.id,
        refunded_amount_total,
        platform_fee_refunded_total,
        payment_status,
    )
    .await
    .map_err(|e| RefundError::DatabaseError("Failed to apply refund amounts".to_string(), e))?;

    if payment_status == PaymentStatusType::Refunded {
        mark_order_cancelled(&mut transaction, transaction_data.order_ref)
            .await
            .map_err(|e| {
                RefundError::DatabaseError("Failed to cancel refunded order".to_string(), e)
            })?;
    }

    transaction
        .commit()
        .await
        .map_err(|e| RefundError::UnexpectedError(anyhow::Error::new(e)))?;

    Ok(RefundData {
        refund_id: stripe_refund.id,
        amount_refunded: refund_amount,
        refunded_amount_total,
        platform_fee_refunded_total,
        payment_status,
    })
}
