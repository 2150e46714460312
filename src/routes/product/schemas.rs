use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::schemas::CurrencyType;

/// A seller's purchasable link. Links without checkout fields are plain
/// redirects and never reach the payment flow.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomLinkData {
    #[schema(value_type = String)]
    pub id: Uuid,
    #[schema(value_type = String)]
    pub seller_id: Uuid,
    pub title: String,
    pub checkout_enabled: bool,
    pub price_cents: Option<i64>,
    pub discounted_price_cents: Option<i64>,
    pub currency_code: CurrencyType,
    pub usage_count: i64,
    pub is_active: bool,
    #[schema(value_type = String)]
    pub created_on: DateTime<Utc>,
}

impl CustomLinkData {
    /// Price the buyer is actually charged: the discounted price when one is
    /// set and lower than the base price. Selected once at checkout-creation
    /// time and frozen into the transaction.
    pub fn effective_price(&self) -> Option<i64> {
        match (self.price_cents, self.discounted_price_cents) {
            (Some(base), Some(discounted)) if discounted < base => Some(discounted),
            (Some(base), _) => Some(base),
            (None, _) => None,
        }
    }
}
