use async_trait::async_trait;
use serde_json::Value;

use crate::config::CaptchaConfig;

/// Outcome of a single verification round-trip. Produced once per request,
/// never cached or reused.
#[derive(Debug, Clone)]
pub struct VerificationResult {
    pub accepted: bool,
    /// Provider payload, kept opaque for operator diagnostics.
    pub raw: Value,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum VerificationError {
    /// The shared secret is unset. Operator error, not a caller error.
    #[error("Configuración del captcha incompleta")]
    Misconfigured,
    /// Transport or provider outage. Single attempt, no retries.
    #[error("no se pudo verificar el captcha: {0}")]
    Unavailable(String),
    /// The provider evaluated the token and said no.
    #[error("Captcha inválido")]
    Rejected { detail: Value },
}

/// Seam for the human-verification provider so the pipeline can be driven
/// without the network.
#[async_trait]
pub trait CaptchaVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<VerificationResult, VerificationError>;
}

/// Google reCAPTCHA `siteverify` client. One form-encoded POST per request;
/// the caller-supplied `reqwest::Client` carries the outbound timeout.
pub struct RecaptchaVerifier {
    client: reqwest::Client,
    secret: Option<String>,
    verify_url: String,
}

impl RecaptchaVerifier {
    pub fn new(client: reqwest::Client, config: &CaptchaConfig) -> Self {
        Self {
            client,
            secret: config.secret.clone(),
            verify_url: config.verify_url.clone(),
        }
    }
}

#[async_trait]
impl CaptchaVerifier for RecaptchaVerifier {
    async fn verify(&self, token: &str) -> Result<VerificationResult, VerificationError> {
        let secret = self
            .secret
            .as_deref()
            .ok_or(VerificationError::Misconfigured)?;

        let response = self
            .client
            .post(&self.verify_url)
            .form(&[("secret", secret), ("response", token)])
            .send()
            .await
            .map_err(|err| VerificationError::Unavailable(err.to_string()))?;

        let raw: Value = response
            .json()
            .await
            .map_err(|err| VerificationError::Unavailable(err.to_string()))?;

        let accepted = raw
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        if accepted {
            Ok(VerificationResult { accepted, raw })
        } else {
            Err(VerificationError::Rejected { detail: raw })
        }
    }
}
