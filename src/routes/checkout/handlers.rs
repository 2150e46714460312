use actix_web::web;
use sqlx::PgPool;
use utoipa::TupleUnit;
use validator::Validate;

use super::errors::CheckoutError;
use super::schemas::{
    CheckoutCreateRequest, CheckoutSessionData, PaymentIntentData, PaymentIntentRequest,
};
use super::utils::{create_checkout_session, create_payment_intent};
use crate::errors::GenericError;
use crate::routes::connect::utils::get_connect_account_by_user;
use crate::routes::product::utils::get_custom_link;
use crate::schemas::GenericResponse;
use crate::stripe_client::StripeClient;

#[utoipa::path(
    post,
    path = "/checkout/create",
    tag = "Checkout",
    description = "Creates a hosted checkout session for a purchasable link and returns the redirect URL.",
    summary = "Checkout Session Creation Request",
    request_body(content = CheckoutCreateRequest, description = "Request Body"),
    responses(
        (status=200, description= "Checkout Session Response", body= GenericResponse<CheckoutSessionData>),
        (status=400, description= "Invalid Request body", body= GenericResponse<TupleUnit>),
        (status=410, description= "Data not found", body= GenericResponse<TupleUnit>),
        (status=500, description= "Internal Server Error", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(
    name = "checkout session creation",
    skip(pool, stripe_client),
    fields(custom_link_id = %body.custom_link_id)
)]
pub async fn checkout_create(
    body: CheckoutCreateRequest,
    pool: web::Data<PgPool>,
    stripe_client: web::Data<StripeClient>,
) -> Result<web::Json<GenericResponse<CheckoutSessionData>>, GenericError> {
    body.validate()
        .map_err(|e| GenericError::ValidationError(e.to_string()))?;

    let link = get_custom_link(&pool, body.custom_link_id)
        .await
        .map_err(|e| CheckoutError::DatabaseError("Failed to fetch custom link".to_string(), e))?
        .ok_or_else(|| {
            CheckoutError::DataNotFound(format!("{} is not found", body.custom_link_id))
        })?;

    let account = get_connect_account_by_user(&pool, link.seller_id)
        .await
        .map_err(|e| {
            CheckoutError::DatabaseError("Failed to fetch connect account".to_string(), e)
        })?
        .ok_or_else(|| {
            CheckoutError::SellerNotReady(
                "The seller has not completed payment onboarding".to_string(),
            )
        })?;

    let session = create_checkout_session(&pool, &stripe_client, &link, &account, &body).await?;

    Ok(web::Json(GenericResponse::success(
        "Successfully created checkout session",
        Some(session),
    )))
}

#[utoipa::path(
    post,
    path = "/checkout/intent",
    tag = "Checkout",
    description = "Creates a payment intent for the embedded payment element and returns the client secret.",
    summary = "Payment Intent Creation Request",
    request_body(content = PaymentIntentRequest, description = "Request Body"),
    responses(
        (status=200, description= "Payment Intent Response", body= GenericResponse<PaymentIntentData>),
        (status=400, description= "Invalid Request body", body= GenericResponse<TupleUnit>),
        (status=410, description= "Data not found", body= GenericResponse<TupleUnit>),
        (status=500, description= "Internal Server Error", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(
    name = "payment intent creation",
    skip(pool, stripe_client),
    fields(custom_link_id = %body.custom_link_id)
)]
pub async fn checkout_intent(
    body: PaymentIntentRequest,
    pool: web::Data<PgPool>,
    stripe_client: web::Data<StripeClient>,
) -> Result<web::Json<GenericResponse<PaymentIntentData>>, GenericError> {
    body.validate()
        .map_err(|e| GenericError::ValidationError(e.to_string()))?;

    let link = get_custom_link(&pool, body.custom_link_id)
        .await
        .map_err(|e| CheckoutError::DatabaseError("Failed to fetch custom link".to_string(), e))?
        .ok_or_else(|| {
            CheckoutError::DataNotFound(format!("{} is not found", body.custom_link_id))
        })?;

    let account = get_connect_account_by_user(&pool, link.seller_id)
        .await
        .map_err(|e| {
            CheckoutError::DatabaseError("Failed to fetch connect account".to_string(), e)
        })?
        .ok_or_else(|| {
            CheckoutError::SellerNotReady(
                "The seller has not completed payment onboarding".to_string(),
            )
        })?;

    let payment_intent = create_payment_intent(&pool, &stripe_client, &link, &account, &body).await?;

    Ok(web::Json(GenericResponse::success(
        "Successfully created payment intent",
        Some(payment_intent),
    )))
}
