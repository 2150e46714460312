use actix_web::web;
use sqlx::PgPool;
use utoipa::TupleUnit;

use super::errors::RefundError;
use super::schemas::{RefundData, RefundRequest};
use super::utils::{execute_refund, get_transaction_by_payment_intent};
use crate::errors::GenericError;
use crate::routes::connect::utils::get_connect_account_by_id;
use crate::schemas::{GenericResponse, UserAccount};
use crate::stripe_client::StripeClient;

#[utoipa::path(
    post,
    path = "/payment/refund",
    tag = "Payment",
    description = "Refunds a settled payment, reversing the platform fee and the seller transfer in proportion.",
    summary = "Payment Refund Request",
    request_body(content = RefundRequest, description = "Request Body"),
    responses(
        (status=200, description= "Refund Response", body= GenericResponse<RefundData>),
        (status=400, description= "Invalid Request body", body= GenericResponse<TupleUnit>),
        (status=401, description= "Invalid Token", body= GenericResponse<TupleUnit>),
        (status=403, description= "Insufficient Privilege", body= GenericResponse<TupleUnit>),
        (status=410, description= "Data not found", body= GenericResponse<TupleUnit>),
        (status=500, description= "Internal Server Error", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(
    name = "payment refund",
    skip(pool, stripe_client),
    fields(payment_intent_id = %body.payment_intent_id, user_id = %user_account.id)
)]
pub async fn payment_refund(
    body: RefundRequest,
    pool: web::Data<PgPool>,
    stripe_client: web::Data<StripeClient>,
    user_account: UserAccount,
) -> Result<web::Json<GenericResponse<RefundData>>, GenericError> {
    let transaction_data = get_transaction_by_payment_intent(&pool, &body.payment_intent_id)
        .await
        .map_err(|e| {
            RefundError::DatabaseError("Failed to fetch payment transaction".to_string(), e)
        })?
        .ok_or_else(|| {
            RefundError::DataNotFound(format!(
                "No payment transaction exists for {}",
                body.payment_intent_id
            ))
        })?;

    let connect_account = get_connect_account_by_id(&pool, transaction_data.connect_account_id)
        .await
        .map_err(|e| {
            RefundError::DatabaseError("Failed to fetch connect account".to_string(), e)
        })?
        .ok_or_else(|| {
            RefundError::UnexpectedCustomError(
                "The connect account for this payment no longer exists".to_string(),
            )
        })?;
    if connect_account.user_id != user_account.id {
        return Err(GenericError::InsufficientPrivilegeError(
            "This payment belongs to another seller".to_string(),
        ));
    }

    let refund = execute_refund(&pool, &stripe_client, &body).await?;

    Ok(web::Json(GenericResponse::success(
        "Successfully processed refund",
        Some(refund),
    )))
}
