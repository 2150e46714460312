use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use super::schemas::{PaymentStatusType, PaymentTransactionData};
use crate::schemas::CurrencyType;

#[derive(Deserialize, Debug, FromRow)]
pub struct PaymentTransactionModel {
    pub id: Uuid,
    pub order_ref: Uuid,
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
    pub metadata: Option<Value>,
    pub created_on: DateTime<Utc>,
    pub succeeded_on: Option<DateTime<Utc>>,
}

impl PaymentTransactionModel {
    pub fn into_schema(self) -> PaymentTransactionData {
        PaymentTransactionData {
            id: self.id,
            order_ref: self.order_ref,
            connect_account_id: self.connect_account_id,
            session_id: self.session_id,
            payment_intent_id: self.payment_intent_id,
            charge_id: self.charge_id,
            transfer_id: self.transfer_id,
            total_amount: self.total_amount,
            platform_fee: self.platform_fee,
            seller_amount: self.seller_amount,
            currency_code: self.currency_code,
            payment_status: self.payment_status,
            refunded_amount: self.refunded_amount,
            platform_fee_refunded: self.platform_fee_refunded,
            metadata: self.metadata,
            created_on: self.created_on,
            succeeded_on: self.succeeded_on,
        }
    }
}
