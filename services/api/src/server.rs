use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_form_routes;
use axum::http::{header, HeaderValue, Method};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use blank_forms::config::{AppConfig, CorsConfig};
use blank_forms::error::AppError;
use blank_forms::forms::{RecaptchaVerifier, ResendMailer, SubmissionService};
use blank_forms::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    // One pooled client for both providers; the configured timeout is the
    // only bound on the outbound calls.
    let client = reqwest::Client::builder()
        .timeout(config.outbound_timeout)
        .build()?;
    let verifier = Arc::new(RecaptchaVerifier::new(client.clone(), &config.captcha));
    let mailer = Arc::new(ResendMailer::new(client, &config.mail));
    let service = Arc::new(SubmissionService::new(
        verifier,
        mailer,
        config.mail.clone(),
    ));

    let app = with_form_routes(service)
        .layer(Extension(app_state))
        .layer(cors_layer(&config.cors))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "form submission backend ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}
