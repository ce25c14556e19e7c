use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

const DEFAULT_VERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";
const DEFAULT_MAIL_API_URL: &str = "https://api.resend.com/emails";
const DEFAULT_BRAND_URL: &str = "https://blank.com.mx";
const DEFAULT_OUTBOUND_TIMEOUT_SECS: u64 = 10;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration, read once at startup and handed to the pipeline
/// constructors. The pipeline itself never touches the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub cors: CorsConfig,
    pub captcha: CaptchaConfig,
    pub mail: MailConfig,
    /// Bound on every outbound provider call. No retries anywhere.
    pub outbound_timeout: Duration,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        // PORT is the deploy platform's convention; APP_PORT wins when both exist.
        let port = env::var("APP_PORT")
            .or_else(|_| env::var("PORT"))
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let mut allowed_origins = vec![
            "http://localhost:5173".to_string(),
            "http://127.0.0.1:5173".to_string(),
            "http://localhost".to_string(),
        ];
        if let Some(origin) = non_empty_var("FRONTEND_ORIGIN") {
            allowed_origins.push(origin);
        }

        let captcha = CaptchaConfig {
            secret: non_empty_var("RECAPTCHA_SECRET_KEY"),
            verify_url: non_empty_var("RECAPTCHA_VERIFY_URL")
                .unwrap_or_else(|| DEFAULT_VERIFY_URL.to_string()),
        };

        let mail = MailConfig {
            api_key: non_empty_var("RESEND_API_KEY"),
            api_url: non_empty_var("RESEND_API_URL")
                .unwrap_or_else(|| DEFAULT_MAIL_API_URL.to_string()),
            contact_to: non_empty_var("CONTACT_TO_EMAIL"),
            contact_cc: non_empty_var("CONTACT_CC_EMAIL"),
            careers_to: non_empty_var("CAREERS_TO_EMAIL"),
            careers_cc: non_empty_var("CAREERS_CC_EMAIL"),
            brand_url: non_empty_var("BRAND_URL").unwrap_or_else(|| DEFAULT_BRAND_URL.to_string()),
        };

        let outbound_timeout = match env::var("OUTBOUND_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(
                raw.trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidTimeout)?,
            ),
            Err(_) => Duration::from_secs(DEFAULT_OUTBOUND_TIMEOUT_SECS),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            cors: CorsConfig { allowed_origins },
            captcha,
            mail,
            outbound_timeout,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Browser origins allowed to call the form endpoints.
#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

/// Captcha provider settings. A missing secret is not a load error; it
/// surfaces per request as an operator-facing verification failure.
#[derive(Debug, Clone)]
pub struct CaptchaConfig {
    pub secret: Option<String>,
    pub verify_url: String,
}

/// Mail provider credential plus the per-pipeline destination addresses.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub contact_to: Option<String>,
    pub contact_cc: Option<String>,
    pub careers_to: Option<String>,
    pub careers_cc: Option<String>,
    pub brand_url: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidTimeout,
    InvalidHost { source: std::net::AddrParseError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT/PORT must be a valid u16"),
            ConfigError::InvalidTimeout => {
                write!(f, "OUTBOUND_TIMEOUT_SECS must be a whole number of seconds")
            }
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidTimeout => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
