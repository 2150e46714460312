use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::schemas::CurrencyType;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConnectAccountData {
    #[schema(value_type = String)]
    pub id: Uuid,
    #[schema(value_type = String)]
    pub user_id: Uuid,
    pub account_id: String,
    pub charges_enabled: bool,
    pub payouts_enabled: bool,
    pub details_submitted: bool,
    pub requirements_currently_due: Vec<String>,
    pub currency_code: CurrencyType,
    #[schema(value_type = String)]
    pub platform_fee_percentage: BigDecimal,
    pub is_active: bool,
    #[schema(value_type = Option<String>)]
    pub onboarding_completed_at: Option<DateTime<Utc>>,
}

impl ConnectAccountData {
    pub fn is_fully_enabled(&self) -> bool {
        self.charges_enabled && self.payouts_enabled
    }
}

#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingLinkData {
    pub account_id: String,
    pub onboarding_url: String,
    pub expires_at: i64,
}

/// Stripe reports currencies as lowercase ISO codes.
pub fn currency_from_stripe(code: &str) -> Option<CurrencyType> {
    match code {
        "usd" => Some(CurrencyType::Usd),
        "eur" => Some(CurrencyType::Eur),
        "gbp" => Some(CurrencyType::Gbp),
        "inr" => Some(CurrencyType::Inr),
        "aud" => Some(CurrencyType::Aud),
        "cad" => Some(CurrencyType::Cad),
        _ => None,
    }
}
