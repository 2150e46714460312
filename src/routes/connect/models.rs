use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::schemas::ConnectAccountData;
use crate::schemas::CurrencyType;

#[derive(Deserialize, Debug, FromRow)]
pub struct ConnectAccountModel {
    pub id: Uuid,
    pub user_id: Uuid,
    pub account_id: String,
    pub charges_enabled: bool,
    pub payouts_enabled: bool,
    pub details_submitted: bool,
    pub requirements_currently_due: Option<sqlx::types::Json<Vec<String>>>,
    pub currency_code: CurrencyType,
    pub platform_fee_percentage: BigDecimal,
    pub is_active: bool,
    pub onboarding_completed_at: Option<DateTime<Utc>>,
}

impl ConnectAccountModel {
    pub fn into_schema(self) -> ConnectAccountData {
        ConnectAccountData {
            id: self.id,
            user_id: self.user_id,
            account_id: self.account_id,
            charges_enabled: self.charges_enabled,
            payouts_enabled: self.payouts_enabled,
            details_submitted: self.details_submitted,
            requirements_currently_due: self
                .requirements_currently_due
                .map(|requirements| requirements.0)
                .unwrap_or_default(),
            currency_code: self.currency_code,
            platform_fee_percentage: self.platform_fee_percentage,
            is_active: self.is_active,
            onboarding_completed_at: self.onboarding_completed_at,
        }
    }
}
