use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::schemas::CustomLinkData;
use crate::schemas::CurrencyType;

#[derive(Deserialize, Debug, FromRow)]
pub struct CustomLinkModel {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub title: String,
    pub checkout_enabled: bool,
    pub price_cents: Option<i64>,
    pub discounted_price_cents: Option<i64>,
    pub currency_code: CurrencyType,
    pub usage_count: i64,
    pub is_active: bool,
    pub created_on: DateTime<Utc>,
}

impl CustomLinkModel {
    pub fn into_schema(self) -> CustomLinkData {
        CustomLinkData {
            id: self.id,
            seller_id: self.seller_id,
            title: self.title,
            checkout_enabled: self.checkout_enabled,
            price_cents: self.price_cents,
            discounted_price_cents: self.discounted_price_cents,
            currency_code: self.currency_code,
            usage_count: self.usage_count,
            is_active: self.is_active,
            created_on: self.created_on,
        }
    }
}
