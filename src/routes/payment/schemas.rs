use actix_http::Payload;
use actix_web::web::Json;
use actix_web::{FromRequest, HttpRequest};
use chrono::{DateTime, Utc};
use futures_util::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::GenericError;
use crate::schemas::CurrencyType;

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_status_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatusType {
    Pending,
    Succeeded,
    Failed,
    Refunded,
    PartiallyRefunded,
}

impl PaymentStatusType {
    /// Monotonic status progression. A settled payment can only move towards
    /// refund states, never back to pending; terminal states stay terminal.
    pub fn can_transition_to(&self, next: &PaymentStatusType) -> bool {
        matches!(
            (self, next),
            (PaymentStatusType::Pending, PaymentStatusType::Succeeded)
                | (PaymentStatusType::Pending, PaymentStatusType::Failed)
                | (PaymentStatusType::Succeeded, PaymentStatusType::PartiallyRefunded)
                | (PaymentStatusType::Succeeded, PaymentStatusType::Refunded)
                | (
                    PaymentStatusType::PartiallyRefunded,
                    PaymentStatusType::PartiallyRefunded
                )
                | (
                    PaymentStatusType::PartiallyRefunded,
                    PaymentStatusType::Refunded
                )
        )
    }

    pub fn is_refundable(&self) -> bool {
        matches!(
            self,
            PaymentStatusType::Succeeded | PaymentStatusType::PartiallyRefunded
        )
    }
}

impl std::fmt::Display for PaymentStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentStatusType::Pending => "pending",
            PaymentStatusType::Succeeded => "succeeded",
            PaymentStatusType::Failed => "failed",
            PaymentStatusType::Refunded => "refunded",
            PaymentStatusType::PartiallyRefunded => "partially_refunded",
        };

        write!(f, "{}", s)
    }
}

/// Exact split of a gross amount in minor units.
#[derive(Debug, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeeSplit {
    pub platform_fee: i64,
    pub seller_amount: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentTransactionData {
    #[schema(value_type = String)]
    pub id: Uuid,
    #[schema(value_type = String)]
    pub order_ref: Uuid,
    #[schema(value_type = String)]
    pub connect_account_id: Uuid,
    pub session_id: Option<String>,
    pub payment_intent_id: Option<String>,
    pub charge_id: Option<String>,
    pub transfer_id: Option<String>,
    pub total_amount: i64,
    pub platform_fee: i64,
    pub seller_amount: i64,
    pub currency_code: CurrencyType,
    pub payment_status: PaymentStatusType,
    pub refunded_amount: i64,
    pub platform_fee_refunded: i64,
    #[schema(value_type = Object)]
    pub metadata: Option<Value>,
    #[schema(value_type = String)]
    pub created_on: DateTime<Utc>,
    #[schema(value_type = Option<String>)]
    pub succeeded_on: Option<DateTime<Utc>>,
}

impl PaymentTransactionData {
    pub fn remaining_refundable(&self) -> i64 {
        self.total_amount - self.refunded_amount
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RefundReason {
    Duplicate,
    Fraudulent,
    RequestedByCustomer,
}

impl RefundReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefundReason::Duplicate => "duplicate",
            RefundReason::Fraudulent => "fraudulent",
            RefundReason::RequestedByCustomer => "requested_by_customer",
        }
    }
}

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefundRequest {
    pub payment_intent_id: String,
    /// Minor units; defaults to the full remaining refundable amount.
    pub amount: Option<i64>,
    pub reason: Option<RefundReason>,
}

impl FromRequest for RefundRequest {
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
pub struct RefundData {
    pub refund_id: String,
    pub amount_refunded: i64,
    pub refunded_amount_total: i64,
    pub platform_fee_refunded_total: i64,
    pub payment_status: PaymentStatusType,
}
