use chrono::Utc;
use serde_json::Value;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::errors::WebhookError;
use super::schemas::{
    ChargeObject, CheckoutSessionObject, EventKind, FulfillmentNotification, PaymentIntentObject,
    StripeWebhookEvent, WebhookOutcome,
};
use crate::routes::connect::utils::{apply_account_status, get_connect_account_by_account_id};
use crate::routes::order::schemas::OrderStatusType;
use crate::routes::order::utils::{get_order_with_lock, mark_order_cancelled, mark_order_completed};
use crate::routes::payment::schemas::{PaymentStatusType, PaymentTransactionData};
use crate::routes::payment::utils::{
    apply_refund_amounts, calculate_refund_fee_share, get_transaction_by_payment_intent_with_lock,
    get_transaction_by_session_with_lock, mark_transaction_failed, mark_transaction_succeeded,
};
use crate::routes::product::utils::increment_usage_count;
use crate::stripe_client::StripeAccountData;

/// Write-once audit row. The unique constraint on the provider event id is
/// the idempotency gate: a second delivery of the same event inserts zero
/// rows and the caller short-circuits without touching the ledger.
#[tracing::instrument(name = "Insert webhook event", skip(transaction, payload))]
pub async fn insert_webhook_event(
    transaction: &mut Transaction<'_, Postgres>,
    event: &StripeWebhookEvent,
    user_id: Option<Uuid>,
    payload: &Value,
) -> Result<bool, anyhow::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO connect_webhook_event (id, event_id, event_type, account_id, user_id,
            payload, created_on)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (event_id) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&event.id)
    .bind(&event.event_type)
    .bind(event.account.as_deref())
    .bind(user_id)
    .bind(payload)
    .bind(Utc::now())
    .execute(&mut **transaction)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e)
            .context("A database failure occurred while logging webhook event to database")
    })?;
    Ok(result.rows_affected() == 1)
}

/// Settles a transaction and completes its order, all inside the caller's
/// database transaction. The fulfillment notification is returned only when
/// this call performed the pending -> completed transition, so a replayed
/// event can never enqueue a second email.
async fn settle_transaction(
    transaction: &mut Transaction<'_, Postgres>,
    transaction_data: &PaymentTransactionData,
    payment_intent_id: Option<&str>,
    charge_id: Option<&str>,
    provider_metadata: &Value,
) -> Result<Option<FulfillmentNotification>, anyhow::Error> {
    if transaction_data.payment_status == PaymentStatusType::Succeeded {
        tracing::info!(
            "Transaction {} is already settled, treating as replay",
            transaction_data.id
        );
        return Ok(None);
    }
    if !transaction_data
        .payment_status
        .can_transition_to(&PaymentStatusType::Succeeded)
    {
        tracing::warn!(
            "Ignoring settlement for transaction {} in status {}",
            transaction_data.id,
            transaction_data.payment_status
        );
        return Ok(None);
    }

    let settled = mark_transaction_succeeded(
        transaction,
        transaction_data.id,
        payment_intent_id,
        charge_id,
        provider_metadata,
    )
    .await?;
    if !settled {
        return Ok(None);
    }

    let order = match get_order_with_lock(transaction, transaction_data.order_ref).await? {
        Some(order) => order,
        None => {
            tracing::error!(
                "Transaction {} references order {} which does not exist",
                transaction_data.id,
                transaction_data.order_ref
            );
            return Ok(None);
        }
    };

    let completed_now = if order
        .order_status
        .can_transition_to(&OrderStatusType::Completed)
    {
        mark_order_completed(transaction, order.id).await?
    } else {
        false
    };

    if completed_now {
        increment_usage_count(transaction, order.custom_link_id).await?;
        if order.email_automation_enabled {
            if let Some(buyer_email) = order.buyer_email {
                return Ok(Some(FulfillmentNotification {
                    buyer_email,
                    order_id: order.order_id,
                }));
            }
        }
    }

    Ok(None)
}

async fn handle_checkout_session_completed(
    transaction: &mut Transaction<'_, Postgres>,
    session: CheckoutSessionObject,
) -> Result<WebhookOutcome, anyhow::Error> {
    if session.payment_status != "paid" {
        tracing::info!(
            "Checkout session {} completed without payment, ignoring",
            session.id
        );
        return Ok(WebhookOutcome::Ignored);
    }

    let transaction_data = match session.payment_intent.as_deref() {
        Some(payment_intent_id) => {
            match get_transaction_by_payment_intent_with_lock(transaction, payment_intent_id)
                .await?
            {
                Some(data) => Some(data),
                None => get_transaction_by_session_with_lock(transaction, &session.id).await?,
            }
        }
        None => get_transaction_by_session_with_lock(transaction, &session.id).await?,
    };
    let transaction_data = match transaction_data {
        Some(data) => data,
        None => {
            tracing::error!(
                "Webhook references a payment transaction that does not exist locally: session {}",
                session.id
            );
            return Ok(WebhookOutcome::Processed(None));
        }
    };

    let provider_metadata = serde_json::to_value(&session.metadata)?;
    let notification = settle_transaction(
        transaction,
        &transaction_data,
        session.payment_intent.as_deref(),
        None,
        &provider_metadata,
    )
    .await?;
    Ok(WebhookOutcome::Processed(notification))
}

async fn handle_payment_intent_succeeded(
    transaction: &mut Transaction<'_, Postgres>,
    payment_intent: PaymentIntentObject,
) -> Result<WebhookOutcome, anyhow::Error> {
    let transaction_data =
        match get_transaction_by_payment_intent_with_lock(transaction, &payment_intent.id).await? {
            Some(data) => data,
            None => {
                tracing::error!(
                    "Webhook references a payment transaction that does not exist locally: intent {}",
                    payment_intent.id
                );
                return Ok(WebhookOutcome::Processed(None));
            }
        };

    let provider_metadata = serde_json::to_value(&payment_intent.metadata)?;
    let notification = settle_transaction(
        transaction,
        &transaction_data,
        Some(&payment_intent.id),
        payment_intent.latest_charge.as_deref(),
        &provider_metadata,
    )
    .await?;
    Ok(WebhookOutcome::Processed(notification))
}

async fn handle_payment_intent_failed(
    transaction: &mut Transaction<'_, Postgres>,
    payment_intent: PaymentIntentObject,
) -> Result<WebhookOutcome, anyhow::Error> {
    let transaction_data =
        match get_transaction_by_payment_intent_with_lock(transaction, &payment_intent.id).await? {
            Some(data) => data,
            None => {
                tracing::error!(
                    "Webhook references a payment transaction that does not exist locally: intent {}",
                    payment_intent.id
                );
                return Ok(WebhookOutcome::Processed(None));
            }
        };

    let failed = mark_transaction_failed(transaction, transaction_data.id).await?;
    if !failed {
        tracing::info!(
            "Transaction {} is no longer pending, ignoring failure event",
            transaction_data.id
        );
    }
    Ok(WebhookOutcome::Processed(None))
}

/// Re-asserts the provider's cumulative refund state. Amounts only ever move
/// forward; a stale out-of-order event with a smaller cumulative total is
/// ignored rather than applied.
async fn handle_charge_refunded(
    transaction: &mut Transaction<'_, Postgres>,
    charge: ChargeObject,
) -> Result<WebhookOutcome, anyhow::Error> {
    let payment_intent_id = match charge.payment_intent.as_deref() {
        Some(payment_intent_id) => payment_intent_id,
        None => {
            tracing::warn!("Refunded charge {} carries no payment intent", charge.id);
            return Ok(WebhookOutcome::Ignored);
        }
    };

    let transaction_data =
        match get_transaction_by_payment_intent_with_lock(transaction, payment_intent_id).await? {
            Some(data) => data,
            None => {
                tracing::error!(
                    "Webhook references a payment transaction that does not exist locally: intent {}",
                    payment_intent_id
                );
                return Ok(WebhookOutcome::Processed(None));
            }
        };

    if transaction_data.payment_status == PaymentStatusType::Pending
        || transaction_data.payment_status == PaymentStatusType::Failed
    {
        tracing::warn!(
            "Refund event for unsettled transaction {} in status {}, ignoring",
            transaction_data.id,
            transaction_data.payment_status
        );
        return Ok(WebhookOutcome::Ignored);
    }

    let mut refunded_amount_total = charge.amount_refunded;
    if refunded_amount_total > transaction_data.total_amount {
        tracing::error!(
            "Provider reports {} refunded against a total of {} for transaction {}",
            refunded_amount_total,
            transaction_data.total_amount,
            transaction_data.id
        );
        refunded_amount_total = transaction_data.total_amount;
    }
    if refunded_amount_total <= transaction_data.refunded_amount {
        tracing::info!(
            "Refund state for transaction {} is already current, treating as replay",
            transaction_data.id
        );
        return Ok(WebhookOutcome::Ignored);
    }

    let platform_fee_refunded_total = std::cmp::min(
        calculate_refund_fee_share(
            transaction_data.platform_fee,
            refunded_amount_total,
            transaction_data.total_amount,
        ),
        transaction_data.platform_fee,
    );
    let payment_status = if refunded_amount_total >= transaction_data.total_amount {
        PaymentStatusType::Refunded
    } else {
        PaymentStatusType::PartiallyRefunded
    };

    apply_refund_amounts(
        transaction,
        transaction_data.id,
        refunded_amount_total,
        platform_fee_refunded_total,
        payment_status,
    )
    .await?;

    if payment_status == PaymentStatusType::Refunded {
        mark_order_cancelled(transaction, transaction_data.order_ref).await?;
    }

    Ok(WebhookOutcome::Processed(None))
}

async fn handle_account_updated(
    transaction: &mut Transaction<'_, Postgres>,
    stripe_account: &StripeAccountData,
) -> Result<WebhookOutcome, anyhow::Error> {
    let updated = apply_account_status(&mut **transaction, stripe_account).await?;
    if updated.is_none() {
        tracing::warn!(
            "Account update for unknown connect account {}",
            stripe_account.id
        );
    }
    Ok(WebhookOutcome::Processed(None))
}

fn parse_object<T: serde::de::DeserializeOwned>(object: Value) -> Result<T, WebhookError> {
    serde_json::from_value(object)
        .map_err(|e| WebhookError::PayloadError(format!("Malformed event object: {}", e)))
}

/// Ingestion gate: the event-log insert and the handler's ledger mutation
/// commit as one unit. If the handler fails, the event row rolls back with
/// it and the provider's retry re-processes from a clean slate.
#[tracing::instrument(name = "Process webhook event", skip(pool, event, raw_payload), fields(event_id = %event.id, event_type = %event.event_type))]
pub async fn process_webhook_event(
    pool: &PgPool,
    event: StripeWebhookEvent,
    raw_payload: Value,
) -> Result<WebhookOutcome, WebhookError> {
    let user_id = match event.account.as_deref() {
        Some(account_id) => get_connect_account_by_account_id(pool, account_id)
            .await
            .unwrap_or(None)
            .map(|account| account.user_id),
        None => None,
    };

    let mut transaction = pool
        .begin()
        .await
        .map_err(|e| WebhookError::UnexpectedError(anyhow::Error::new(e)))?;

    let inserted = insert_webhook_event(&mut transaction, &event, user_id, &raw_payload)
        .await
        .map_err(|e| WebhookError::DatabaseError("Failed to log webhook event".to_string(), e))?;
    if !inserted {
        tracing::info!("Duplicate webhook delivery for event {}", event.id);
        return Ok(WebhookOutcome::Duplicate);
    }

    let outcome = match EventKind::from_event_type(&event.event_type) {
        EventKind::CheckoutSessionCompleted => {
            let session: CheckoutSessionObject = parse_object(event.data.object)?;
            handle_checkout_session_completed(&mut transaction, session)
                .await
                .map_err(|e| {
                    WebhookError::DatabaseError("Failed to process settlement".to_string(), e)
                })?
        }
        EventKind::PaymentIntentSucceeded => {
            let payment_intent: PaymentIntentObject = parse_object(event.data.object)?;
            handle_payment_intent_succeeded(&mut transaction, payment_intent)
                .await
                .map_err(|e| {
                    WebhookError::DatabaseError("Failed to process settlement".to_string(), e)
                })?
        }
        EventKind::PaymentIntentFailed => {
            let payment_intent: PaymentIntentObject = parse_object(event.data.object)?;
            handle_payment_intent_failed(&mut transaction, payment_intent)
                .await
                .map_err(|e| {
                    WebhookError::DatabaseError("Failed to process payment failure".to_string(), e)
                })?
        }
        EventKind::ChargeRefunded => {
            let charge: ChargeObject = parse_object(event.data.object)?;
            handle_charge_refunded(&mut transaction, charge)
                .await
                .map_err(|e| {
                    WebhookError::DatabaseError("Failed to process refund".to_string(), e)
                })?
        }
        EventKind::AccountUpdated => {
            let stripe_account: StripeAccountData = parse_object(event.data.object)?;
            handle_account_updated(&mut transaction, &stripe_account)
                .await
                .map_err(|e| {
                    WebhookError::DatabaseError("Failed to process account update".to_string(), e)
                })?
        }
        EventKind::Unhandled => {
            tracing::info!("Unhandled webhook event type {}", event.event_type);
            WebhookOutcome::Ignored
        }
    };

    transaction
        .commit()
        .await
        .map_err(|e| WebhookError::UnexpectedError(anyhow::Error::new(e)))?;

    Ok(outcome)
}
