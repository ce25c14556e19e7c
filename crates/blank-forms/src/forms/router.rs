use std::sync::Arc;

use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::{error, warn};

use super::captcha::{CaptchaVerifier, VerificationError};
use super::delivery::{DeliveryError, Mailer};
use super::domain::{Attachment, CareerSubmission, ContactSubmission, Submission, SubmissionKind};
use super::service::{SubmissionError, SubmissionService};

/// Attachment ceiling. Enforced at the transport layer: an oversized upload
/// is rejected with 413 before any pipeline work happens.
pub const MAX_CV_BYTES: usize = 3 * 1024 * 1024;

/// Router exposing the two submission endpoints.
pub fn forms_router<V, M>(service: Arc<SubmissionService<V, M>>) -> Router
where
    V: CaptchaVerifier + 'static,
    M: Mailer + 'static,
{
    Router::new()
        .route("/api/contact", post(contact_handler::<V, M>))
        .route(
            "/api/careers",
            post(careers_handler::<V, M>).layer(DefaultBodyLimit::max(MAX_CV_BYTES)),
        )
        .with_state(service)
}

pub(crate) async fn contact_handler<V, M>(
    State(service): State<Arc<SubmissionService<V, M>>>,
    Json(form): Json<ContactSubmission>,
) -> Response
where
    V: CaptchaVerifier + 'static,
    M: Mailer + 'static,
{
    match service.handle(Submission::Contact(form)).await {
        Ok(_) => success_response("Mensaje enviado correctamente"),
        Err(error) => failure_response(SubmissionKind::Contact, error),
    }
}

pub(crate) async fn careers_handler<V, M>(
    State(service): State<Arc<SubmissionService<V, M>>>,
    multipart: Multipart,
) -> Response
where
    V: CaptchaVerifier + 'static,
    M: Mailer + 'static,
{
    let form = match read_career_form(multipart).await {
        Ok(form) => form,
        Err(response) => return response,
    };

    match service.handle(Submission::Careers(form)).await {
        Ok(_) => success_response("Aplicación enviada correctamente"),
        Err(error) => failure_response(SubmissionKind::Careers, error),
    }
}

/// Pull the text fields and the CV file out of the multipart stream. Unknown
/// fields are ignored, matching the permissive body parsing of the form's
/// previous backend.
async fn read_career_form(mut multipart: Multipart) -> Result<CareerSubmission, Response> {
    let mut form = CareerSubmission::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_rejection)?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "cvFile" {
            let filename = field.file_name().unwrap_or("cv").to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field.bytes().await.map_err(multipart_rejection)?;
            form.attachment = Some(Attachment {
                filename,
                content_type,
                bytes: bytes.to_vec(),
            });
            continue;
        }

        let value = field.text().await.map_err(multipart_rejection)?;
        let slot = match name.as_str() {
            "firstName" => &mut form.first_name,
            "lastName" => &mut form.last_name,
            "email" => &mut form.email,
            "phone" => &mut form.phone,
            "message" => &mut form.message,
            "portfolio" => &mut form.portfolio,
            "captchaToken" => &mut form.captcha_token,
            _ => continue,
        };
        *slot = Some(value);
    }

    Ok(form)
}

/// Transport-level multipart failures (including the body limit) answer in
/// the same JSON envelope as pipeline failures.
fn multipart_rejection(error: MultipartError) -> Response {
    let status = error.status();
    warn!(%status, "rejecting malformed careers upload");
    (
        status,
        Json(json!({ "success": false, "message": error.body_text() })),
    )
        .into_response()
}

fn success_response(message: &str) -> Response {
    (
        StatusCode::OK,
        Json(json!({ "success": true, "message": message })),
    )
        .into_response()
}

const fn internal_message(kind: SubmissionKind) -> &'static str {
    match kind {
        SubmissionKind::Contact => "Error interno al enviar el mensaje",
        SubmissionKind::Careers => "Error interno al enviar la aplicación",
    }
}

/// Translate a pipeline failure into the JSON envelope and status the form
/// frontend expects. 500-class causes are logged as operator-actionable;
/// secret values never reach the response.
fn failure_response(kind: SubmissionKind, error: SubmissionError) -> Response {
    let (status, message, detail): (StatusCode, String, Option<Value>) = match error {
        SubmissionError::Validation(cause) => {
            (StatusCode::BAD_REQUEST, cause.to_string(), None)
        }
        SubmissionError::Verification(VerificationError::Rejected { detail }) => (
            StatusCode::BAD_REQUEST,
            "Captcha inválido".to_string(),
            Some(detail),
        ),
        SubmissionError::Verification(VerificationError::Misconfigured) => {
            error!(kind = kind.label(), "RECAPTCHA_SECRET_KEY is not configured");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                VerificationError::Misconfigured.to_string(),
                None,
            )
        }
        SubmissionError::Verification(VerificationError::Unavailable(detail)) => {
            error!(kind = kind.label(), %detail, "captcha verification call failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                internal_message(kind).to_string(),
                Some(Value::String(detail)),
            )
        }
        SubmissionError::Destination(cause) => {
            error!(kind = kind.label(), "no destination address configured");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                cause.to_string(),
                None,
            )
        }
        SubmissionError::Delivery(DeliveryError::Misconfigured) => {
            error!(kind = kind.label(), "RESEND_API_KEY is not configured");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                DeliveryError::Misconfigured.to_string(),
                None,
            )
        }
        SubmissionError::Delivery(DeliveryError::Failed { detail }) => {
            error!(kind = kind.label(), %detail, "delivery provider call failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                internal_message(kind).to_string(),
                Some(Value::String(detail)),
            )
        }
    };

    let mut body = json!({ "success": false, "message": message });
    if let Some(detail) = detail {
        body["detail"] = detail;
    }

    (status, Json(body)).into_response()
}
