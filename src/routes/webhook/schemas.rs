use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Provider event envelope; `data.object` is parsed per event type.
#[derive(Debug, Deserialize)]
pub struct StripeWebhookEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: StripeEventData,
    /// Connected account the event originates from, when applicable.
    pub account: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StripeEventData {
    pub object: Value,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutSessionObject {
    pub id: String,
    pub payment_status: String,
    pub payment_intent: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct PaymentIntentObject {
    pub id: String,
    pub latest_charge: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct ChargeObject {
    pub id: String,
    pub payment_intent: Option<String>,
    pub amount_refunded: i64,
}

#[derive(Debug, PartialEq)]
pub enum EventKind {
    CheckoutSessionCompleted,
    PaymentIntentSucceeded,
    PaymentIntentFailed,
    ChargeRefunded,
    AccountUpdated,
    Unhandled,
}

impl EventKind {
    pub fn from_event_type(event_type: &str) -> EventKind {
        match event_type {
            "checkout.session.completed" => EventKind::CheckoutSessionCompleted,
            "payment_intent.succeeded" => EventKind::PaymentIntentSucceeded,
            "payment_intent.payment_failed" => EventKind::PaymentIntentFailed,
            "charge.refunded" => EventKind::ChargeRefunded,
            "account.updated" => EventKind::AccountUpdated,
            _ => EventKind::Unhandled,
        }
    }
}

/// One-shot fulfillment email, dispatched only on the call that actually
/// completed the order.
#[derive(Debug, PartialEq)]
pub struct FulfillmentNotification {
    pub buyer_email: String,
    pub order_id: String,
}

#[derive(Debug, PartialEq)]
pub enum WebhookOutcome {
    Processed(Option<FulfillmentNotification>),
    Duplicate,
    Ignored,
}
