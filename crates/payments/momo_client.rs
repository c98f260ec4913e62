use anyhow::Result;
use hmac::{Hmac, Mac};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use sha2::Sha256;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error};
use uuid::Uuid;

use crate::domain::value_objects::enums::charge_methods::ChargeMethod;

type HmacSha256 = Hmac<Sha256>;

/// One logical charge attempt as handed to the provider. `client_reference`
/// is the caller-side id for the attempt (the payment row id); the provider
/// echoes it back so charges stay correlatable across both ledgers.
#[derive(Debug, Clone)]
pub struct ChargeRequest {
    pub method: ChargeMethod,
    pub account: Option<String>,
    pub amount_minor: i32,
    pub client_reference: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChargeOutcome {
    Approved { provider_reference: String },
    Declined { reason: String },
}

/// Transport-level charge failures. `Timeout` means the outcome is unknown:
/// the charge may or may not have gone through on the provider side.
#[derive(Debug, Error)]
pub enum ChargeError {
    #[error("charge request timed out")]
    Timeout,
    #[error("payment provider unreachable: {0}")]
    Unreachable(String),
    #[error("payment provider error: {0}")]
    Provider(String),
}

#[derive(Debug, Deserialize)]
struct ChargeResponse {
    status: String,
    provider_reference: Option<String>,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorEnvelope {
    error: ProviderErrorDetails,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorDetails {
    code: Option<String>,
    message: Option<String>,
}

/// Mobile-money aggregator client built on reqwest. One synchronous charge
/// call per attempt; retry policy, if any, lives behind the aggregator.
pub struct MobileMoneyClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    signing_secret: String,
}

impl MobileMoneyClient {
    pub fn new(
        base_url: String,
        api_key: String,
        signing_secret: String,
        timeout_secs: u64,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            signing_secret,
        })
    }

    pub async fn charge(&self, request: ChargeRequest) -> Result<ChargeOutcome, ChargeError> {
        let body = serde_json::json!({
            "reference": request.client_reference,
            "method": request.method.as_str(),
            "msisdn": request.account,
            "amount_minor": request.amount_minor,
        });
        let payload = body.to_string();
        let signature = self.sign_payload(payload.as_bytes());

        debug!(
            reference = %request.client_reference,
            method = %request.method,
            amount_minor = request.amount_minor,
            "momo_client: submitting charge"
        );

        let response = self
            .http
            .post(format!("{}/v1/charges", self.base_url))
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(CONTENT_TYPE, "application/json")
            .header("X-Signature", signature)
            .header("X-Request-Id", Uuid::new_v4().to_string())
            .body(payload)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<ProviderErrorEnvelope>()
                .await
                .map(|envelope| {
                    format!(
                        "{}: {}",
                        envelope.error.code.unwrap_or_else(|| "unknown".to_string()),
                        envelope
                            .error
                            .message
                            .unwrap_or_else(|| "no message".to_string()),
                    )
                })
                .unwrap_or_else(|_| format!("status {}", status));

            error!(
                reference = %request.client_reference,
                status = status.as_u16(),
                detail = %detail,
                "momo_client: charge request rejected"
            );
            return Err(ChargeError::Provider(detail));
        }

        let parsed = response
            .json::<ChargeResponse>()
            .await
            .map_err(|err| ChargeError::Provider(format!("invalid charge response: {err}")))?;

        match parsed.status.as_str() {
            "approved" => {
                let provider_reference = parsed.provider_reference.ok_or_else(|| {
                    ChargeError::Provider("approved charge missing provider reference".to_string())
                })?;
                Ok(ChargeOutcome::Approved { provider_reference })
            }
            "declined" => Ok(ChargeOutcome::Declined {
                reason: parsed
                    .reason
                    .unwrap_or_else(|| "declined by provider".to_string()),
            }),
            other => Err(ChargeError::Provider(format!(
                "unknown charge status: {other}"
            ))),
        }
    }

    fn sign_payload(&self, payload: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(self.signing_secret.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(payload);
        hex::encode(mac.finalize().into_bytes())
    }
}

fn map_transport_error(error: reqwest::Error) -> ChargeError {
    if error.is_timeout() {
        return ChargeError::Timeout;
    }
    if error.is_connect() {
        return ChargeError::Unreachable("connection failed".to_string());
    }
    ChargeError::Unreachable(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_is_stable_for_same_payload() {
        let client = MobileMoneyClient::new(
            "https://pay.example.test".to_string(),
            "key".to_string(),
            "secret".to_string(),
            10,
        )
        .unwrap();

        let first = client.sign_payload(b"{\"reference\":\"41\"}");
        let second = client.sign_payload(b"{\"reference\":\"41\"}");
        let other = client.sign_payload(b"{\"reference\":\"42\"}");

        assert_eq!(first, second);
        assert_ne!(first, other);
        assert_eq!(first.len(), 64);
    }
}
