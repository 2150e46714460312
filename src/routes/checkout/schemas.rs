use actix_http::Payload;
use actix_web::web::Json;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::errors::GenericError;

fn default_email_automation() -> bool {
    true
}

#[derive(Deserialize, Debug, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutCreateRequest {
    #[schema(value_type = String)]
    pub custom_link_id: Uuid,
    pub success_url: String,
    pub cancel_url: String,
    pub buyer_name: Option<String>,
    #[validate(email)]
    pub buyer_email: Option<String>,
    pub buyer_phone: Option<String>,
    #[schema(value_type = Object)]
    pub form_responses: Option<Value>,
    #[serde(default = "default_email_automation")]
    pub email_automation_enabled: bool,
}

impl FromRequest for CheckoutCreateRequest {
    type Error = GenericError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Json::<Self>::from_request(req, payload);

        Box::pin(async move {
            match fut.await {
                Ok(json) => Ok(json.into_inner()),
                Err(e) => Err(GenericError::ValidationError(e.to_string())),
            }
        })
    }
}

#[derive(Deserialize, Debug, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentRequest {
    #[schema(value_type = String)]
    pub custom_link_id: Uuid,
    pub buyer_name: Option<String>,
    #[validate(email)]
    pub buyer_email: Option<String>,
    pub buyer_phone: Option<String>,
    #[schema(value_type = Object)]
    pub form_responses: Option<Value>,
    #[serde(default = "default_email_automation")]
    pub email_automation_enabled: bool,
}

impl FromRequest for PaymentIntentRequest {
    type Error = GenericError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Json::<Self>::from_request(req, payload);

        Box::pin(async move {
            match fut.await {
                Ok(json) => Ok(json.into_inner()),
                Err(e) => Err(GenericError::ValidationError(e.to_string())),
            }
        })
    }
}

#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSessionData {
    pub order_id: String,
    pub session_id: String,
    pub redirect_url: String,
}

#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentData {
    pub order_id: String,
    pub payment_intent_id: String,
    pub client_secret: String,
}
