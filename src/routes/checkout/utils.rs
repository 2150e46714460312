use serde_json::json;
use sqlx::PgPool;

use super::errors::CheckoutError;
use super::schemas::{
    CheckoutCreateRequest, CheckoutSessionData, PaymentIntentData, PaymentIntentRequest,
};
use crate::routes::connect::schemas::ConnectAccountData;
use crate::routes::order::utils::save_order;
use crate::routes::payment::utils::{calculate_fee_split, save_payment_transaction};
use crate::routes::product::schemas::CustomLinkData;
use crate::stripe_client::{DestinationChargeParams, StripeClient};

/// A link is purchasable only when checkout is switched on and a price is
/// set. Returns the effective price frozen into the transaction.
pub fn validate_product_for_checkout(link: &CustomLinkData) -> Result<i64, CheckoutError> {
    if !link.checkout_enabled {
        return Err(CheckoutError::ValidationError(format!(
            "Checkout is not enabled for {}",
            link.title
        )));
    }
    link.effective_price().ok_or_else(|| {
        CheckoutError::MissingPrice(format!("No price is configured for {}", link.title))
    })
}

pub fn validate_seller_account(account: &ConnectAccountData) -> Result<(), CheckoutError> {
    if !account.is_active {
        return Err(CheckoutError::SellerNotReady(
            "The seller's payment account is deactivated".to_string(),
        ));
    }
    if !account.charges_enabled {
        return Err(CheckoutError::SellerNotReady(
            "The seller has not completed payment onboarding".to_string(),
        ));
    }
    Ok(())
}

/// Creates the order row, the hosted checkout session and the pending
/// payment transaction. The order exists before the provider session so the
/// session metadata can carry the order id back through the webhook.
#[tracing::instrument(
    name = "Create checkout session",
    skip(pool, stripe_client, link, account, request),
    fields(custom_link_id = %link.id)
)]
pub async fn create_checkout_session(
    pool: &PgPool,
    stripe_client: &StripeClient,
    link: &CustomLinkData,
    account: &ConnectAccountData,
    request: &CheckoutCreateRequest,
) -> Result<CheckoutSessionData, CheckoutError> {
    let effective_price = validate_product_for_checkout(link)?;
    validate_seller_account(account)?;
    let fee_split = calculate_fee_split(effective_price, &account.platform_fee_percentage)
        .map_err(|e| CheckoutError::ValidationError(e.to_string()))?;

    let mut transaction = pool
        .begin()
        .await
        .map_err(|e| CheckoutError::UnexpectedError(anyhow::Error::new(e)))?;

    let (order_ref, order_id) = save_order(
        &mut transaction,
        link.id,
        request.buyer_name.as_deref(),
        request.buyer_email.as_deref(),
        request.buyer_phone.as_deref(),
        request.form_responses.as_ref(),
        request.email_automation_enabled,
    )
    .await
    .map_err(|e| CheckoutError::DatabaseError("Failed to save checkout order".to_string(), e))?;

    let session = stripe_client
        .create_checkout_session(
            &DestinationChargeParams {
                amount: effective_price,
                currency: &link.currency_code,
                application_fee_amount: fee_split.platform_fee,
                destination_account_id: &account.account_id,
                order_id: &order_id,
                product_name: &link.title,
            },
            &request.success_url,
            &request.cancel_url,
            request.buyer_email.as_deref(),
        )
        .await
        .map_err(|e| CheckoutError::UnexpectedCustomError(e.to_string()))?;

    let redirect_url = session.url.clone().ok_or_else(|| {
        CheckoutError::UnexpectedCustomError(
            "The payment provider returned no redirect URL".to_string(),
        )
    })?;

    let metadata = json!({ "order_id": &order_id });
    save_payment_transaction(
        &mut transaction,
        order_ref,
        account.id,
        Some(&session.id),
        session.payment_intent.as_deref(),
        effective_price,
        &fee_split,
        &link.currency_code,
        &metadata,
    )
    .await
    .map_err(|e| {
        CheckoutError::DatabaseError("Failed to save payment transaction".to_string(), e)
    })?;

    transaction
        .commit()
        .await
        .map_err(|e| CheckoutError::UnexpectedError(anyhow::Error::new(e)))?;

    Ok(CheckoutSessionData {
        order_id,
        session_id: session.id,
        redirect_url,
    })
}

/// PaymentIntent variant for the embedded payment element; same ledger side
/// effects as the hosted session flow.
#[tracing::instrument(
    name = "Create payment intent",
    skip(pool, stripe_client, link, account, request),
    fields(custom_link_id = %link.id)
)]
pub async fn create_payment_intent(
    pool: &PgPool,
    stripe_client: &StripeClient,
    link: &CustomLinkData,
    account: &ConnectAccountData,
    request: &PaymentIntentRequest,
) -> Result<PaymentIntentData, CheckoutError> {
    let effective_price = validate_product_for_checkout(link)?;
    validate_seller_account(account)?;
    let fee_split = calculate_fee_split(effective_price, &account.platform_fee_percentage)
        .map_err(|e| CheckoutError::ValidationError(e.to_string()))?;

    let mut transaction = pool
        .begin()
        .await
        .map_err(|e| CheckoutError::UnexpectedError(anyhow::Error::new(e)))?;

    let (order_ref, order_id) = save_order(
        &mut transaction,
        link.id,
        request.buyer_name.as_deref(),
        request.buyer_email.as_deref(),
        request.buyer_phone.as_deref(),
        request.form_responses.as_ref(),
        request.email_automation_enabled,
    )
    .await
    .map_err(|e| CheckoutError::DatabaseError("Failed to save checkout order".to_string(), e))?;

    let payment_intent = stripe_client
        .create_payment_intent(&DestinationChargeParams {
            amount: effective_price,
            currency: &link.currency_code,
            application_fee_amount: fee_split.platform_fee,
            destination_account_id: &account.account_id,
            order_id: &order_id,
            product_name: &link.title,
        })
        .await
        .map_err(|e| CheckoutError::UnexpectedCustomError(e.to_string()))?;

    let client_secret = payment_intent.client_secret.clone().ok_or_else(|| {
        CheckoutError::UnexpectedCustomError(
            "The payment provider returned no client secret".to_string(),
        )
    })?;

    let metadata = json!({ "order_id": &order_id });
    save_payment_transaction(
        &mut transaction,
        order_ref,
        account.id,
        None,
        Some(&payment_intent.id),
        effective_price,
        &fee_split,
        &link.currency_code,
        &metadata,
    )
    .await
    .map_err(|e| {
        CheckoutError::DatabaseError("Failed to save payment transaction".to_string(), e)
    })?;

    transaction
        .commit()
        .await
        .map_err(|e| CheckoutError::UnexpectedError(anyhow::Error::new(e)))?;

    Ok(PaymentIntentData {
        order_id,
        payment_intent_id: payment_intent.id,
        client_secret,
    })
}
