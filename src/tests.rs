#[cfg(test)]
pub mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;
    use chrono::Utc;
    use secrecy::SecretString;
    use uuid::Uuid;

    use crate::configuration::StripeSetting;
    use crate::routes::connect::schemas::ConnectAccountData;
    use crate::routes::payment::schemas::{PaymentStatusType, PaymentTransactionData};
    use crate::routes::product::schemas::CustomLinkData;
    use crate::schemas::CurrencyType;

    pub fn get_dummy_custom_link(
        price_cents: Option<i64>,
        discounted_price_cents: Option<i64>,
    ) -> CustomLinkData {
        CustomLinkData {
            id: Uuid::new_v4(),
            seller_id: Uuid::new_v4(),
            title: "Beat licensing pack".to_owned(),
            checkout_enabled: true,
            price_cents,
            discounted_price_cents,
            currency_code: CurrencyType::Usd,
            usage_count: 0,
            is_active: true,
            created_on: Utc::now(),
        }
    }

    pub fn get_dummy_connect_account(
        charges_enabled: bool,
        payouts_enabled: bool,
    ) -> ConnectAccountData {
        ConnectAccountData {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            account_id: "acct_1Habc2Def3Ghi".to_owned(),
            charges_enabled,
            payouts_enabled,
            details_submitted: charges_enabled,
            requirements_currently_due: vec![],
            currency_code: CurrencyType::Usd,
            platform_fee_percentage: BigDecimal::from_str("4.00").unwrap(),
            is_active: true,
            onboarding_completed_at: None,
        }
    }

    pub fn get_dummy_payment_transaction(
        payment_status: PaymentStatusType,
        total_amount: i64,
        refunded_amount: i64,
        platform_fee: i64,
        platform_fee_refunded: i64,
    ) -> PaymentTransactionData {
        PaymentTransactionData {
            id: Uuid::new_v4(),
            order_ref: Uuid::new_v4(),
            connect_account_id: Uuid::new_v4(),
            session_id: Some("cs_test_abc".to_owned()),
            payment_intent_id: Some("pi_3Oabc".to_owned()),
            charge_id: Some("ch_3Oabc".to_owned()),
            transfer_id: None,
            total_amount,
            platform_fee,
            seller_amount: total_amount - platform_fee,
            currency_code: CurrencyType::Usd,
            payment_status,
            refunded_amount,
            platform_fee_refunded,
            metadata: None,
            created_on: Utc::now(),
            succeeded_on: None,
        }
    }

    pub fn get_dummy_stripe_setting() -> StripeSetting {
        StripeSetting {
            api_base_url: "https://api.stripe.com".to_owned(),
            secret_key: SecretString::from("sk_test_dummy".to_owned()),
            webhook_secret: SecretString::from("whsec_test_secret".to_owned()),
            timeout_milliseconds: 10000,
            default_platform_fee_percentage: BigDecimal::from_str("4.00").unwrap(),
            onboarding_return_url: "https://app.biolink.dev/connect/return".to_owned(),
            onboarding_refresh_url: "https://app.biolink.dev/connect/refresh".to_owned(),
        }
    }
}
