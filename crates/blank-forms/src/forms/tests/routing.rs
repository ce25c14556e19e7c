use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use super::common::{
    build_service, build_service_with, multipart_body, multipart_content_type, read_json_body,
    router_with, unroutable_mail_config, RecordingMailer, RecordingVerifier,
};
use crate::forms::captcha::VerificationError;

fn contact_request(body: serde_json::Value) -> Request<Body> {
    Request::post("/api/contact")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

fn careers_request(fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> Request<Body> {
    Request::post("/api/careers")
        .header(header::CONTENT_TYPE, multipart_content_type())
        .body(Body::from(multipart_body(fields, file)))
        .expect("request builds")
}

fn career_fields<'a>() -> Vec<(&'a str, &'a str)> {
    vec![
        ("firstName", "Luis"),
        ("lastName", "Mora"),
        ("email", "luis@x.com"),
        ("phone", "555-0102"),
        ("message", "Me interesa la vacante."),
        ("portfolio", "https://luismora.dev"),
        ("captchaToken", "tok"),
    ]
}

#[tokio::test]
async fn contact_submission_returns_success_envelope() {
    let (service, _, mailer) =
        build_service(RecordingVerifier::accepting(), RecordingMailer::delivering());
    let router = router_with(service);

    let response = router
        .oneshot(contact_request(json!({
            "firstName": "Ana",
            "lastName": "Ruiz",
            "email": "ana@x.com",
            "phone": "555",
            "message": "Hola",
            "captchaToken": "tok",
        })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["success"], json!(true));
    assert_eq!(payload["message"], json!("Mensaje enviado correctamente"));

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].subject.contains("Ana Ruiz"));
}

#[tokio::test]
async fn contact_with_empty_captcha_is_rejected_before_external_calls() {
    let (service, verifier, mailer) =
        build_service(RecordingVerifier::accepting(), RecordingMailer::delivering());
    let router = router_with(service);

    let response = router
        .oneshot(contact_request(json!({
            "firstName": "Ana",
            "lastName": "Ruiz",
            "email": "ana@x.com",
            "phone": "555",
            "message": "Hola",
            "captchaToken": "",
        })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["success"], json!(false));
    assert_eq!(payload["message"], json!("Captcha requerido"));
    assert_eq!(verifier.calls(), 0);
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn contact_with_missing_fields_is_rejected() {
    let (service, verifier, _) =
        build_service(RecordingVerifier::accepting(), RecordingMailer::delivering());
    let router = router_with(service);

    let response = router
        .oneshot(contact_request(json!({
            "firstName": "Ana",
            "captchaToken": "tok",
        })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["message"], json!("Faltan campos obligatorios"));
    assert_eq!(verifier.calls(), 0);
}

#[tokio::test]
async fn rejected_captcha_returns_the_provider_payload() {
    let detail = json!({ "success": false, "error-codes": ["timeout-or-duplicate"] });
    let (service, _, mailer) = build_service(
        RecordingVerifier::failing(VerificationError::Rejected {
            detail: detail.clone(),
        }),
        RecordingMailer::delivering(),
    );
    let router = router_with(service);

    let response = router
        .oneshot(contact_request(json!({
            "firstName": "Ana",
            "lastName": "Ruiz",
            "email": "ana@x.com",
            "phone": "555",
            "message": "Hola",
            "captchaToken": "tok",
        })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["message"], json!("Captcha inválido"));
    assert_eq!(payload["detail"], detail);
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn careers_submission_returns_success_envelope() {
    let (service, _, mailer) =
        build_service(RecordingVerifier::accepting(), RecordingMailer::delivering());
    let router = router_with(service);

    let response = router
        .oneshot(careers_request(
            &career_fields(),
            Some(("cv.pdf", "application/pdf", b"%PDF-1.4 fake")),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["message"], json!("Aplicación enviada correctamente"));

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].attachments[0].filename, "cv.pdf");
}

#[tokio::test]
async fn careers_with_unsupported_attachment_type_is_rejected() {
    let (service, _, mailer) =
        build_service(RecordingVerifier::accepting(), RecordingMailer::delivering());
    let router = router_with(service);

    let response = router
        .oneshot(careers_request(
            &career_fields(),
            Some(("cv.zip", "application/zip", b"PK\x03\x04")),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload["message"],
        json!("Formato de CV no permitido (usa PDF, JPG o PNG).")
    );
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn careers_without_file_is_rejected() {
    let (service, _, _) =
        build_service(RecordingVerifier::accepting(), RecordingMailer::delivering());
    let router = router_with(service);

    let response = router
        .oneshot(careers_request(&career_fields(), None))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["message"], json!("Debes adjuntar tu CV."));
}

#[tokio::test]
async fn unset_destination_maps_to_a_generic_500() {
    let (service, _, _) = build_service_with(
        RecordingVerifier::accepting(),
        RecordingMailer::delivering(),
        unroutable_mail_config(),
    );
    let router = router_with(service);

    let response = router
        .oneshot(contact_request(json!({
            "firstName": "Ana",
            "lastName": "Ruiz",
            "email": "ana@x.com",
            "phone": "555",
            "message": "Hola",
            "captchaToken": "tok",
        })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload["message"],
        json!("No hay correo de destino configurado")
    );
    assert!(payload.get("detail").is_none());
}

#[tokio::test]
async fn captcha_misconfiguration_maps_to_500_without_internals() {
    let (service, _, _) = build_service(
        RecordingVerifier::failing(VerificationError::Misconfigured),
        RecordingMailer::delivering(),
    );
    let router = router_with(service);

    let response = router
        .oneshot(contact_request(json!({
            "firstName": "Ana",
            "lastName": "Ruiz",
            "email": "ana@x.com",
            "phone": "555",
            "message": "Hola",
            "captchaToken": "tok",
        })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload["message"],
        json!("Configuración del captcha incompleta")
    );
}

#[tokio::test]
async fn delivery_failure_maps_to_500_with_detail() {
    let (service, _, _) = build_service(
        RecordingVerifier::accepting(),
        RecordingMailer::failing("401 Unauthorized"),
    );
    let router = router_with(service);

    let response = router
        .oneshot(careers_request(
            &career_fields(),
            Some(("cv.pdf", "application/pdf", b"%PDF-1.4 fake")),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload["message"],
        json!("Error interno al enviar la aplicación")
    );
    assert_eq!(payload["detail"], json!("401 Unauthorized"));
}
