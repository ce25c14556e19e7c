//! Submission handling core for the BLANK site forms.
//!
//! Two pipelines (contact form, careers application) share one dispatch
//! sequence: field validation, captcha verification against Google
//! reCAPTCHA, recipient resolution, email composition, and delivery through
//! the Resend API. The external calls sit behind the [`forms::CaptchaVerifier`]
//! and [`forms::Mailer`] traits so the service can be exercised without the
//! network.

pub mod config;
pub mod error;
pub mod forms;
pub mod telemetry;
