#[cfg(test)]
mod tests {
    use chrono::Utc;
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    use crate::routes::webhook::schemas::{
        CheckoutSessionObject, EventKind, StripeWebhookEvent,
    };
    use crate::stripe_client::StripeClient;
    use crate::tests::tests::get_dummy_stripe_setting;

    const WEBHOOK_SECRET: &str = "whsec_test_secret";

    fn sign_payload(timestamp: i64, payload: &[u8]) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(WEBHOOK_SECRET.as_bytes()).unwrap();
        mac.update(format!("{}.{}", timestamp, String::from_utf8_lossy(payload)).as_bytes());
        format!("t={},v1={}", timestamp, hex::encode(mac.finalize().into_bytes()))
    }

    #[test]
    fn valid_signature_is_accepted() {
        let client = StripeClient::new(&get_dummy_stripe_setting());
        let payload = br#"{"id":"evt_1","type":"payment_intent.succeeded"}"#;
        let signature = sign_payload(Utc::now().timestamp(), payload);
        assert!(client.verify_webhook_signature(payload, &signature).unwrap());
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let client = StripeClient::new(&get_dummy_stripe_setting());
        let payload = br#"{"id":"evt_1","type":"payment_intent.succeeded"}"#;
        let signature = sign_payload(Utc::now().timestamp(), payload);
        let tampered = br#"{"id":"evt_2","type":"payment_intent.succeeded"}"#;
        assert!(!client
            .verify_webhook_signature(tampered, &signature)
            .unwrap());
    }

    #[test]
    fn stale_timestamp_is_rejected() {
        let client = StripeClient::new(&get_dummy_stripe_setting());
        let payload = br#"{"id":"evt_1"}"#;
        let signature = sign_payload(Utc::now().timestamp() - 3600, payload);
        assert!(!client.verify_webhook_signature(payload, &signature).unwrap());
    }

    #[test]
    fn future_timestamp_is_rejected() {
        let client = StripeClient::new(&get_dummy_stripe_setting());
        let payload = br#"{"id":"evt_1"}"#;
        let signature = sign_payload(Utc::now().timestamp() + 3600, payload);
        assert!(!client.verify_webhook_signature(payload, &signature).unwrap());
    }

    #[test]
    fn malformed_signature_header_is_an_error() {
        let client = StripeClient::new(&get_dummy_stripe_setting());
        let payload = br#"{"id":"evt_1"}"#;
        assert!(client
            .verify_webhook_signature(payload, "not-a-signature")
            .is_err());
    }

    #[test]
    fn event_types_are_classified() {
        assert_eq!(
            EventKind::from_event_type("checkout.session.completed"),
            EventKind::CheckoutSessionCompleted
        );
        assert_eq!(
            EventKind::from_event_type("payment_intent.succeeded"),
            EventKind::PaymentIntentSucceeded
        );
        assert_eq!(
            EventKind::from_event_type("payment_intent.payment_failed"),
            EventKind::PaymentIntentFailed
        );
        assert_eq!(
            EventKind::from_event_type("charge.refunded"),
            EventKind::ChargeRefunded
        );
        assert_eq!(
            EventKind::from_event_type("account.updated"),
            EventKind::AccountUpdated
        );
        assert_eq!(
            EventKind::from_event_type("customer.subscription.updated"),
            EventKind::Unhandled
        );
    }

    #[test]
    fn event_envelope_is_parsed() {
        let payload = r#"{
            "id": "evt_1PabcDEF",
            "type": "checkout.session.completed",
            "created": 1735689600,
            "account": "acct_1Habc",
            "livemode": false,
            "data": {
                "object": {
                    "id": "cs_test_abc",
                    "payment_status": "paid",
                    "payment_intent": "pi_3Oabc",
                    "metadata": {"order_id": "LNK-A1B2C3D4E5"}
                }
            }
        }"#;
        let event: StripeWebhookEvent = serde_json::from_str(payload).unwrap();
        assert_eq!(event.id, "evt_1PabcDEF");
        assert_eq!(event.account.as_deref(), Some("acct_1Habc"));

        let session: CheckoutSessionObject = serde_json::from_value(event.data.object).unwrap();
        assert_eq!(session.payment_status, "paid");
        assert_eq!(session.payment_intent.as_deref(), Some("pi_3Oabc"));
        assert_eq!(
            session.metadata.get("order_id").map(String::as_str),
            Some("LNK-A1B2C3D4E5")
        );
    }

    #[test]
    fn session_without_metadata_still_parses() {
        let object = serde_json::json!({
            "id": "cs_test_abc",
            "payment_status": "unpaid",
            "payment_intent": null
        });
        let session: CheckoutSessionObject = serde_json::from_value(object).unwrap();
        assert!(session.metadata.is_empty());
        assert!(session.payment_intent.is_none());
    }
}
