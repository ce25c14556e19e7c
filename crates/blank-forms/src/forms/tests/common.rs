use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::{json, Value};

use crate::config::MailConfig;
use crate::forms::captcha::{CaptchaVerifier, VerificationError, VerificationResult};
use crate::forms::compose::OutboundMessage;
use crate::forms::delivery::{DeliveryError, DeliveryReceipt, Mailer};
use crate::forms::domain::{Attachment, CareerSubmission, ContactSubmission};
use crate::forms::router::forms_router;
use crate::forms::service::SubmissionService;

pub(super) fn contact_submission() -> ContactSubmission {
    ContactSubmission {
        first_name: Some("Ana".to_string()),
        last_name: Some("Ruiz".to_string()),
        email: Some("ana@x.com".to_string()),
        phone: Some("555".to_string()),
        message: Some("Hola".to_string()),
        captcha_token: Some("tok".to_string()),
    }
}

pub(super) fn career_submission() -> CareerSubmission {
    CareerSubmission {
        first_name: Some("Luis".to_string()),
        last_name: Some("Mora".to_string()),
        email: Some("luis@x.com".to_string()),
        phone: Some("555-0102".to_string()),
        message: Some("Me interesa la vacante.".to_string()),
        portfolio: Some("https://luismora.dev".to_string()),
        captcha_token: Some("tok".to_string()),
        attachment: Some(pdf_attachment()),
    }
}

pub(super) fn pdf_attachment() -> Attachment {
    Attachment {
        filename: "cv.pdf".to_string(),
        content_type: "application/pdf".to_string(),
        bytes: b"%PDF-1.4 fake".to_vec(),
    }
}

pub(super) fn mail_config() -> MailConfig {
    MailConfig {
        api_key: Some("re_test_key".to_string()),
        api_url: "https://api.resend.com/emails".to_string(),
        contact_to: Some("hola@blank.com.mx".to_string()),
        contact_cc: None,
        careers_to: Some("talento@blank.com.mx".to_string()),
        careers_cc: Some("rh@blank.com.mx".to_string()),
        brand_url: "https://blank.com.mx".to_string(),
    }
}

pub(super) fn unroutable_mail_config() -> MailConfig {
    MailConfig {
        contact_to: None,
        careers_to: None,
        careers_cc: None,
        ..mail_config()
    }
}

/// Captcha fake recording every call so tests can assert the pipeline never
/// reached the provider.
pub(super) struct RecordingVerifier {
    calls: Mutex<u32>,
    failure: Option<VerificationError>,
}

impl RecordingVerifier {
    pub(super) fn accepting() -> Self {
        Self {
            calls: Mutex::new(0),
            failure: None,
        }
    }

    pub(super) fn failing(error: VerificationError) -> Self {
        Self {
            calls: Mutex::new(0),
            failure: Some(error),
        }
    }

    pub(super) fn calls(&self) -> u32 {
        *self.calls.lock().expect("verifier mutex poisoned")
    }
}

#[async_trait]
impl CaptchaVerifier for RecordingVerifier {
    async fn verify(&self, _token: &str) -> Result<VerificationResult, VerificationError> {
        *self.calls.lock().expect("verifier mutex poisoned") += 1;
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(VerificationResult {
                accepted: true,
                raw: json!({ "success": true }),
            }),
        }
    }
}

/// Mailer fake capturing every composed message.
pub(super) struct RecordingMailer {
    sent: Mutex<Vec<OutboundMessage>>,
    configured: bool,
    failure: Option<DeliveryError>,
}

impl RecordingMailer {
    pub(super) fn delivering() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            configured: true,
            failure: None,
        }
    }

    pub(super) fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::delivering()
        }
    }

    pub(super) fn failing(detail: &str) -> Self {
        Self {
            failure: Some(DeliveryError::Failed {
                detail: detail.to_string(),
            }),
            ..Self::delivering()
        }
    }

    pub(super) fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().expect("mailer mutex poisoned").clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    fn ensure_ready(&self) -> Result<(), DeliveryError> {
        if self.configured {
            Ok(())
        } else {
            Err(DeliveryError::Misconfigured)
        }
    }

    async fn send(&self, message: OutboundMessage) -> Result<DeliveryReceipt, DeliveryError> {
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        self.sent
            .lock()
            .expect("mailer mutex poisoned")
            .push(message);
        Ok(DeliveryReceipt {
            id: "rcpt-0001".to_string(),
        })
    }
}

pub(super) type TestService = SubmissionService<RecordingVerifier, RecordingMailer>;

pub(super) fn build_service(
    verifier: RecordingVerifier,
    mailer: RecordingMailer,
) -> (Arc<TestService>, Arc<RecordingVerifier>, Arc<RecordingMailer>) {
    build_service_with(verifier, mailer, mail_config())
}

pub(super) fn build_service_with(
    verifier: RecordingVerifier,
    mailer: RecordingMailer,
    mail: MailConfig,
) -> (Arc<TestService>, Arc<RecordingVerifier>, Arc<RecordingMailer>) {
    let verifier = Arc::new(verifier);
    let mailer = Arc::new(mailer);
    let service = Arc::new(SubmissionService::new(verifier.clone(), mailer.clone(), mail));
    (service, verifier, mailer)
}

pub(super) fn router_with(service: Arc<TestService>) -> axum::Router {
    forms_router(service)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) const MULTIPART_BOUNDARY: &str = "x-blank-form-boundary";

/// Hand-built multipart body for the careers route tests.
pub(super) fn multipart_body(
    fields: &[(&str, &str)],
    file: Option<(&str, &str, &[u8])>,
) -> Vec<u8> {
    let mut body: Vec<u8> = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; \
                 name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((filename, content_type, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; \
                 name=\"cvFile\"; filename=\"{filename}\"\r\nContent-Type: \
                 {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}

pub(super) fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}")
}
