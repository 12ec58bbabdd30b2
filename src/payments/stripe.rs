//! Stripe HTTP client and webhook signature verification

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

use crate::error::{ApiError, ApiResult};
use crate::payments::CheckoutSession;

type HmacSha256 = Hmac<Sha256>;

/// Default tolerance for webhook timestamps, matching Stripe's recommendation
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

/// Webhook signature verification errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("malformed signature header")]
    MalformedHeader,

    #[error("signature timestamp outside tolerance")]
    TimestampOutOfTolerance,

    #[error("no matching signature")]
    NoMatchingSignature,
}

/// Verify a `Stripe-Signature` header (`t=<ts>,v1=<hex>,...`) against the
/// raw request body.
pub fn verify_webhook_signature(
    secret: &str,
    payload: &[u8],
    header: &str,
    tolerance_secs: i64,
    now_ts: i64,
) -> Result<(), SignatureError> {
    let mut timestamp: Option<i64> = None;
    let mut signatures: Vec<&str> = Vec::new();

    for part in header.split(',') {
        let (key, value) = part
            .trim()
            .split_once('=')
            .ok_or(SignatureError::MalformedHeader)?;
        match key {
            "t" => {
                timestamp =
                    Some(value.parse().map_err(|_| SignatureError::MalformedHeader)?)
            }
            "v1" => signatures.push(value),
            _ => {} // ignore unknown schemes
        }
    }

    let timestamp = timestamp.ok_or(SignatureError::MalformedHeader)?;
    if signatures.is_empty() {
        return Err(SignatureError::MalformedHeader);
    }

    if (now_ts - timestamp).abs() > tolerance_secs {
        return Err(SignatureError::TimestampOutOfTolerance);
    }

    let expected = compute_signature(secret, timestamp, payload);

    if signatures
        .iter()
        .any(|candidate| constant_time_eq(candidate.as_bytes(), expected.as_bytes()))
    {
        Ok(())
    } else {
        Err(SignatureError::NoMatchingSignature)
    }
}

/// Hex-encoded HMAC-SHA256 over `"{timestamp}.{payload}"`
pub fn compute_signature(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);

    let digest = mac.finalize().into_bytes();
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        out.push_str(&format!("{:02x}", byte));
    }
    out
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

/// Thin client over the Stripe HTTP API
pub struct StripeClient {
    http: reqwest::Client,
    api_url: String,
    secret_key: String,
    webhook_secret: Option<String>,
}

impl StripeClient {
    pub fn new(secret_key: String, webhook_secret: Option<String>) -> Self {
        Self::with_api_url("https://api.stripe.com".to_string(), secret_key, webhook_secret)
    }

    pub fn with_api_url(
        api_url: String,
        secret_key: String,
        webhook_secret: Option<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url,
            secret_key,
            webhook_secret,
        }
    }

    pub fn webhook_secret(&self) -> Option<&str> {
        self.webhook_secret.as_deref()
    }

    /// Fetch a checkout session by id
    pub async fn get_checkout_session(&self, session_id: &str) -> ApiResult<CheckoutSession> {
        let url = format!("{}/v1/checkout/sessions/{}", self.api_url, session_id);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.secret_key)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(
                "Sesión de pago no encontrada".to_string(),
            ));
        }

        if !response.status().is_success() {
            return Err(ApiError::ExternalServiceError(format!(
                "Stripe respondió {}",
                response.status()
            )));
        }

        Ok(response.json::<CheckoutSession>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test_secret";

    #[test]
    fn test_valid_signature() {
        let payload = br#"{"id":"evt_1","type":"checkout.session.completed"}"#;
        let ts = 1_700_000_000;
        let header = format!("t={},v1={}", ts, compute_signature(SECRET, ts, payload));

        assert_eq!(
            verify_webhook_signature(SECRET, payload, &header, 300, ts + 10),
            Ok(())
        );
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let ts = 1_700_000_000;
        let header = format!(
            "t={},v1={}",
            ts,
            compute_signature(SECRET, ts, b"original")
        );

        assert_eq!(
            verify_webhook_signature(SECRET, b"tampered", &header, 300, ts),
            Err(SignatureError::NoMatchingSignature)
        );
    }

    #[test]
    fn test_stale_timestamp_rejected() {
        let payload = b"{}";
        let ts = 1_700_000_000;
        let header = format!("t={},v1={}", ts, compute_signature(SECRET, ts, payload));

        assert_eq!(
            verify_webhook_signature(SECRET, payload, &header, 300, ts + 301),
            Err(SignatureError::TimestampOutOfTolerance)
        );
    }

    #[test]
    fn test_malformed_header_rejected() {
        assert_eq!(
            verify_webhook_signature(SECRET, b"{}", "not-a-header", 300, 0),
            Err(SignatureError::MalformedHeader)
        );
        assert_eq!(
            verify_webhook_signature(SECRET, b"{}", "t=123", 300, 123),
            Err(SignatureError::MalformedHeader)
        );
    }
}
