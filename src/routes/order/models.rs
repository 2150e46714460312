use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use super::schemas::{OrderData, OrderStatusType};

#[derive(Deserialize, Debug, FromRow)]
pub struct OrderModel {
    pub id: Uuid,
    pub order_id: String,
    pub custom_link_id: Uuid,
    pub order_status: OrderStatusType,
    pub buyer_name: Option<String>,
    pub buyer_email: Option<String>,
    pub buyer_phone: Option<String>,
    pub form_responses: Option<Value>,
    pub email_automation_enabled: bool,
    pub created_on: DateTime<Utc>,
    pub completed_on: Option<DateTime<Utc>>,
    pub cancelled_on: Option<DateTime<Utc>>,
}

impl OrderModel {
    pub fn into_schema(self) -> OrderData {
        OrderData {
            id: self.id,
            order_id: self.order_id,
            custom_link_id: self.custom_link_id,
            order_status: self.order_status,
            buyer_name: self.buyer_name,
            buyer_email: self.buyer_email,
            buyer_phone: self.buyer_phone,
            form_responses: self.form_responses,
            email_automation_enabled: self.email_automation_enabled,
            created_on: self.created_on,
            completed_on: self.completed_on,
            cancelled_on: self.cancelled_on,
        }
    }
}
