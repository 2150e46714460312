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

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy, sqlx::Type, ToSchema)]
#[sqlx(type_name = "order_status_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatusType {
    Pending,
    Completed,
    Cancelled,
}

impl OrderStatusType {
    /// One-way transitions: an order completes exactly once, and only a
    /// completed or pending order can be cancelled. A stale webhook replay
    /// can never move an order backwards.
    pub fn can_transition_to(&self, next: &OrderStatusType) -> bool {
        matches!(
            (self, next),
            (OrderStatusType::Pending, OrderStatusType::Completed)
                | (OrderStatusType::Pending, OrderStatusType::Cancelled)
                | (OrderStatusType::Completed, OrderStatusType::Cancelled)
        )
    }
}

impl std::fmt::Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatusType::Pending => "pending",
            OrderStatusType::Completed => "completed",
            OrderStatusType::Cancelled => "cancelled",
        };

        write!(f, "{}", s)
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderData {
    #[schema(value_type = String)]
    pub id: Uuid,
    pub order_id: String,
    #[schema(value_type = String)]
    pub custom_link_id: Uuid,
    pub order_status: OrderStatusType,
    pub buyer_name: Option<String>,
    pub buyer_email: Option<String>,
    pub buyer_phone: Option<String>,
    #[schema(value_type = Object)]
    pub form_responses: Option<Value>,
    pub email_automation_enabled: bool,
    #[schema(value_type = String)]
    pub created_on: DateTime<Utc>,
    #[schema(value_type = Option<String>)]
    pub completed_on: Option<DateTime<Utc>>,
    #[schema(value_type = Option<String>)]
    pub cancelled_on: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderListRequest {
    pub order_status: Option<OrderStatusType>,
    #[schema(value_type = Option<String>)]
    pub custom_link_id: Option<Uuid>,
    #[schema(value_type = Option<String>)]
    pub start_date: Option<DateTime<Utc>>,
    #[schema(value_type = Option<String>)]
    pub end_date: Option<DateTime<Utc>>,
    pub offset: i64,
    pub limit: i64,
}

impl FromRequest for OrderListRequest {
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

#[derive(Debug)]
pub struct OrderListFilter {
    pub seller_id: Uuid,
    pub order_status: Option<OrderStatusType>,
    pub custom_link_id: Option<Uuid>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub offset: i64,
    pub limit: i64,
}

impl OrderListFilter {
    pub fn new(request: OrderListRequest, seller_id: Uuid) -> Self {
        Self {
            seller_id,
            order_status: request.order_status,
            custom_link_id: request.custom_link_id,
            start_date: request.start_date,
            end_date: request.end_date,
            offset: request.offset,
            limit: request.limit,
        }
    }
}
