use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Serialize;
use serde_json::Value;

use crate::config::MailConfig;

use super::compose::OutboundMessage;

/// Opaque provider receipt, kept for logging only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub id: String,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum DeliveryError {
    /// The provider credential is unset. Operator error.
    #[error("Configuración de correo incompleta (RESEND_API_KEY).")]
    Misconfigured,
    /// Auth, network, or provider-side rejection. Single attempt.
    #[error("el proveedor de correo rechazó el envío: {detail}")]
    Failed { detail: String },
}

/// Seam for the email delivery provider.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Credential presence check. The pipeline runs this before composing
    /// the message so a misconfigured mailer costs no composition work.
    fn ensure_ready(&self) -> Result<(), DeliveryError>;

    async fn send(&self, message: OutboundMessage) -> Result<DeliveryReceipt, DeliveryError>;
}

/// Resend HTTP API client. One JSON POST per message; the caller-supplied
/// `reqwest::Client` carries the outbound timeout.
pub struct ResendMailer {
    client: reqwest::Client,
    api_key: Option<String>,
    api_url: String,
}

impl ResendMailer {
    pub fn new(client: reqwest::Client, config: &MailConfig) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            api_url: config.api_url.clone(),
        }
    }
}

/// Wire shape of the provider's send-email call. Attachment bytes are
/// base64-encoded here and only here; the domain model keeps raw bytes.
#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a [String],
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    cc: &'a [String],
    reply_to: &'a str,
    subject: &'a str,
    text: &'a str,
    html: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<AttachmentPayload<'a>>,
}

#[derive(Serialize)]
struct AttachmentPayload<'a> {
    filename: &'a str,
    content: String,
    content_type: &'a str,
}

#[async_trait]
impl Mailer for ResendMailer {
    fn ensure_ready(&self) -> Result<(), DeliveryError> {
        if self.api_key.is_some() {
            Ok(())
        } else {
            Err(DeliveryError::Misconfigured)
        }
    }

    async fn send(&self, message: OutboundMessage) -> Result<DeliveryReceipt, DeliveryError> {
        let api_key = self.api_key.as_deref().ok_or(DeliveryError::Misconfigured)?;

        let attachments = message
            .attachments
            .iter()
            .map(|attachment| AttachmentPayload {
                filename: &attachment.filename,
                content: BASE64.encode(&attachment.content),
                content_type: &attachment.content_type,
            })
            .collect();

        let payload = SendEmailRequest {
            from: &message.from,
            to: &message.to,
            cc: &message.cc,
            reply_to: &message.reply_to,
            subject: &message.subject,
            text: &message.text_body,
            html: &message.html_body,
            attachments,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|err| DeliveryError::Failed {
                detail: err.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|err| DeliveryError::Failed {
            detail: err.to_string(),
        })?;

        if !status.is_success() {
            return Err(DeliveryError::Failed {
                detail: format!("{status}: {body}"),
            });
        }

        let id = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|value| {
                value
                    .get("id")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_default();

        Ok(DeliveryReceipt { id })
    }
}
