use actix_web::{web, HttpRequest};
use serde_json::Value;
use sqlx::PgPool;
use std::sync::Arc;
use utoipa::TupleUnit;

use super::errors::WebhookError;
use super::schemas::{FulfillmentNotification, StripeWebhookEvent, WebhookOutcome};
use super::utils::process_webhook_event;
use crate::email_client::GenericEmailService;
use crate::schemas::GenericResponse;
use crate::stripe_client::StripeClient;

fn dispatch_fulfillment_email(
    email_client: Arc<dyn GenericEmailService>,
    notification: FulfillmentNotification,
) {
    tokio::spawn(async move {
        let subject = format!("Your order {} is confirmed", notification.order_id);
        let body = format!(
            "Thank you for your purchase! Your order {} has been confirmed and the seller has been notified.",
            notification.order_id
        );
        if let Err(e) = email_client
            .send_text_email(&notification.buyer_email, &subject, body)
            .await
        {
            tracing::error!("Failed to send order confirmation email: {:?}", e);
        }
    });
}

#[utoipa::path(
    post,
    path = "/webhook/stripe",
    tag = "Webhook",
    description = "Payment provider event sink. Signature-verified, deduplicated by provider event id.",
    summary = "Stripe Webhook",
    request_body(content = String, description = "Raw Stripe event payload"),
    responses(
        (status=200, description= "Event acknowledged", body= GenericResponse<TupleUnit>),
        (status=400, description= "Invalid signature or payload", body= GenericResponse<TupleUnit>),
        (status=500, description= "Internal Server Error", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(name = "stripe webhook", skip(req, body, pool, stripe_client, email_client))]
pub async fn stripe_webhook(
    req: HttpRequest,
    body: web::Bytes,
    pool: web::Data<PgPool>,
    stripe_client: web::Data<StripeClient>,
    email_client: web::Data<Arc<dyn GenericEmailService>>,
) -> Result<web::Json<GenericResponse<()>>, WebhookError> {
    let signature = req
        .headers()
        .get("Stripe-Signature")
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| {
            WebhookError::SignatureError("Missing Stripe-Signature header".to_string())
        })?;

    let valid = stripe_client
        .verify_webhook_signature(&body, signature)
        .map_err(|e| WebhookError::SignatureError(e.to_string()))?;
    if !valid {
        return Err(WebhookError::SignatureError(
            "Webhook signature verification failed".to_string(),
        ));
    }

    let raw_payload: Value = serde_json::from_slice(&body)
        .map_err(|e| WebhookError::PayloadError(format!("Malformed event payload: {}", e)))?;
    let event: StripeWebhookEvent = serde_json::from_value(raw_payload.clone())
        .map_err(|e| WebhookError::PayloadError(format!("Malformed event envelope: {}", e)))?;

    let outcome = process_webhook_event(&pool, event, raw_payload).await?;

    let message = match outcome {
        WebhookOutcome::Processed(notification) => {
            if let Some(notification) = notification {
                dispatch_fulfillment_email(email_client.get_ref().clone(), notification);
            }
            "Event processed"
        }
        WebhookOutcome::Duplicate => "Event already processed",
        WebhookOutcome::Ignored => "Event acknowledged",
    };

    Ok(web::Json(GenericResponse::success(message, Some(()))))
}
