use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::configuration::StripeSetting;
use crate::constants::{WEBHOOK_CLOCK_SKEW_SECS, WEBHOOK_TIMESTAMP_TOLERANCE_SECS};
use crate::schemas::CurrencyType;

type HmacSha256 = Hmac<Sha256>;

/// Thin client over the Stripe REST API.
///
/// Constructed once from settings and injected through application state so
/// handlers never touch a process-wide API key.
#[derive(Debug)]
pub struct StripeClient {
    http_client: Client,
    base_url: String,
    secret_key: SecretString,
    webhook_secret: SecretString,
}

#[derive(Debug, Deserialize)]
pub struct StripeAccountRequirements {
    #[serde(default)]
    pub currently_due: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct StripeAccountData {
    pub id: String,
    #[serde(default)]
    pub charges_enabled: bool,
    #[serde(default)]
    pub payouts_enabled: bool,
    #[serde(default)]
    pub details_submitted: bool,
    pub default_currency: Option<String>,
    pub requirements: Option<StripeAccountRequirements>,
}

#[derive(Debug, Deserialize)]
pub struct StripeAccountLinkData {
    pub url: String,
    pub expires_at: i64,
}

#[derive(Debug, Deserialize)]
pub struct StripeCheckoutSessionData {
    pub id: String,
    pub url: Option<String>,
    pub payment_intent: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StripePaymentIntentData {
    pub id: String,
    pub client_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StripeRefundData {
    pub id: String,
    pub amount: i64,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    message: Option<String>,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorEnvelope {
    error: StripeErrorDetail,
}

pub struct DestinationChargeParams<'a> {
    pub amount: i64,
    pub currency: &'a CurrencyType,
    pub application_fee_amount: i64,
    pub destination_account_id: &'a str,
    pub order_id: &'a str,
    pub product_name: &'a str,
}

impl StripeClient {
    #[tracing::instrument(skip(settings))]
    pub fn new(settings: &StripeSetting) -> Self {
        tracing::info!("Initialising Stripe API client.");
        let http_client = Client::builder()
            .timeout(settings.timeout())
            .build()
            .expect("Failed to build HTTP client for Stripe");
        Self {
            http_client,
            base_url: settings.api_base_url.clone(),
            secret_key: settings.secret_key.clone(),
            webhook_secret: settings.webhook_secret.clone(),
        }
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<T, anyhow::Error> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.secret_key.expose_secret(), None::<&str>)
            .form(params)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, anyhow::Error> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http_client
            .get(&url)
            .basic_auth(self.secret_key.expose_secret(), None::<&str>)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, anyhow::Error> {
        let status = response.status();
        let body = response.bytes().await?;
        if status.is_success() {
            serde_json::from_slice(&body)
                .map_err(|err| anyhow::anyhow!("Failed to parse Stripe response: {}", err))
        } else {
            let envelope: Result<StripeErrorEnvelope, _> = serde_json::from_slice(&body);
            match envelope {
                Ok(envelope) => Err(anyhow::anyhow!(
                    "Stripe API error ({}): {}",
                    envelope.error.error_type.unwrap_or_else(|| "unknown".to_string()),
                    envelope
                        .error
                        .message
                        .unwrap_or_else(|| "no message".to_string())
                )),
                Err(_) => Err(anyhow::anyhow!("Stripe API error: status {}", status)),
            }
        }
    }

    #[tracing::instrument(name = "Create Stripe express account", skip(self))]
    pub async fn create_express_account(
        &self,
        email: &str,
    ) -> Result<StripeAccountData, anyhow::Error> {
        let params = vec![
            ("type".to_string(), "express".to_string()),
            ("email".to_string(), email.to_string()),
        ];
        self.post_form("/v1/accounts", &params).await
    }

    #[tracing::instrument(name = "Create Stripe account link", skip(self))]
    pub async fn create_account_link(
        &self,
        account_id: &str,
        refresh_url: &str,
        return_url: &str,
    ) -> Result<StripeAccountLinkData, anyhow::Error> {
        let params = vec![
            ("account".to_string(), account_id.to_string()),
            ("refresh_url".to_string(), refresh_url.to_string()),
            ("return_url".to_string(), return_url.to_string()),
            ("type".to_string(), "account_onboarding".to_string()),
        ];
        self.post_form("/v1/account_links", &params).await
    }

    #[tracing::instrument(name = "Retrieve Stripe account", skip(self))]
    pub async fn retrieve_account(
        &self,
        account_id: &str,
    ) -> Result<StripeAccountData, anyhow::Error> {
        self.get(&format!("/v1/accounts/{}", account_id)).await
    }

    /// Hosted checkout session configured as a destination charge: the buyer
    /// is charged the full amount, the platform fee is retained and the
    /// remainder is transferred to the connected account at settlement.
    #[tracing::instrument(name = "Create Stripe checkout session", skip(self, params))]
    pub async fn create_checkout_session(
        &self,
        params: &DestinationChargeParams<'_>,
        success_url: &str,
        cancel_url: &str,
        customer_email: Option<&str>,
    ) -> Result<StripeCheckoutSessionData, anyhow::Error> {
        let mut form = vec![
            ("mode".to_string(), "payment".to_string()),
            ("success_url".to_string(), success_url.to_string()),
            ("cancel_url".to_string(), cancel_url.to_string()),
            ("line_items[0][quantity]".to_string(), "1".to_string()),
            (
                "line_items[0][price_data][currency]".to_string(),
                params.currency.to_string(),
            ),
            (
                "line_items[0][price_data][unit_amount]".to_string(),
                params.amount.to_string(),
            ),
            (
                "line_items[0][price_data][product_data][name]".to_string(),
                params.product_name.to_string(),
            ),
            (
                "payment_intent_data[application_fee_amount]".to_string(),
                params.application_fee_amount.to_string(),
            ),
            (
                "payment_intent_data[transfer_data][destination]".to_string(),
                params.destination_account_id.to_string(),
            ),
            (
                "metadata[order_id]".to_string(),
                params.order_id.to_string(),
            ),
            (
                "payment_intent_data[metadata][order_id]".to_string(),
                params.order_id.to_string(),
            ),
        ];
        if let Some(email) = customer_email {
            form.push(("customer_email".to_string(), email.to_string()));
        }
        self.post_form("/v1/checkout/sessions", &form).await
    }

    /// Bare PaymentIntent for the embedded payment element, same destination
    /// charge configuration as the hosted session.
    #[tracing::instrument(name = "Create Stripe payment intent", skip(self, params))]
    pub async fn create_payment_intent(
        &self,
        params: &DestinationChargeParams<'_>,
    ) -> Result<StripePaymentIntentData, anyhow::Error> {
        let form = vec![
            ("amount".to_string(), params.amount.to_string()),
            ("currency".to_string(), params.currency.to_string()),
            (
                "application_fee_amount".to_string(),
                params.application_fee_amount.to_string(),
            ),
            (
                "transfer_data[destination]".to_string(),
                params.destination_account_id.to_string(),
            ),
            (
                "metadata[order_id]".to_string(),
                params.order_id.to_string(),
            ),
            (
                "automatic_payment_methods[enabled]".to_string(),
                "true".to_string(),
            ),
        ];
        self.post_form("/v1/payment_intents", &form).await
    }

    /// Refund against a payment intent. The application fee is refunded and
    /// the connected-account transfer reversed in proportion, so the platform
    /// and the seller each give back their share.
    #[tracing::instrument(name = "Create Stripe refund", skip(self))]
    pub async fn create_refund(
        &self,
        payment_intent_id: &str,
        amount: Option<i64>,
        reason: Option<&str>,
    ) -> Result<StripeRefundData, anyhow::Error> {
        let mut form = vec![
            ("payment_intent".to_string(), payment_intent_id.to_string()),
            ("refund_application_fee".to_string(), "true".to_string()),
            ("reverse_transfer".to_string(), "true".to_string()),
        ];
        if let Some(amount) = amount {
            form.push(("amount".to_string(), amount.to_string()));
        }
        if let Some(reason) = reason {
            form.push(("reason".to_string(), reason.to_string()));
        }
        self.post_form("/v1/refunds", &form).await
    }

    /// Verify the `Stripe-Signature` header against the raw request body.
    ///
    /// Signature format: `t=timestamp,v1=hex-hmac`. Timestamps outside the
    /// tolerance window are rejected to block replays.
    pub fn verify_webhook_signature(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<bool, anyhow::Error> {
        let mut timestamp = None;
        let mut sig_v1 = None;
        for part in signature.split(',') {
            if let Some(t) = part.strip_prefix("t=") {
                timestamp = Some(t);
            } else if let Some(s) = part.strip_prefix("v1=") {
                sig_v1 = Some(s);
            }
        }

        let timestamp_str =
            timestamp.ok_or_else(|| anyhow::anyhow!("Invalid signature header format"))?;
        let sig_v1 = sig_v1.ok_or_else(|| anyhow::anyhow!("Invalid signature header format"))?;

        let timestamp: i64 = timestamp_str
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid timestamp in signature header"))?;

        let age = Utc::now().timestamp() - timestamp;
        if age > WEBHOOK_TIMESTAMP_TOLERANCE_SECS {
            tracing::warn!(
                "Webhook rejected: timestamp too old (age={}s, max={}s)",
                age,
                WEBHOOK_TIMESTAMP_TOLERANCE_SECS
            );
            return Ok(false);
        }
        if age < -WEBHOOK_CLOCK_SKEW_SECS {
            tracing::warn!("Webhook rejected: timestamp in the future (age={}s)", age);
            return Ok(false);
        }

        let signed_payload = format!("{}.{}", timestamp_str, String::from_utf8_lossy(payload));
        let mut mac = HmacSha256::new_from_slice(self.webhook_secret.expose_secret().as_bytes())
            .map_err(|_| anyhow::anyhow!("Invalid webhook secret"))?;
        mac.update(signed_payload.as_bytes());
        let expected = hex::encode(mac.finalize().into_bytes());

        let expected_bytes = expected.as_bytes();
        let provided_bytes = sig_v1.as_bytes();
        if expected_bytes.len() != provided_bytes.len() {
            return Ok(false);
        }

        Ok(expected_bytes.ct_eq(provided_bytes).into())
    }
}
