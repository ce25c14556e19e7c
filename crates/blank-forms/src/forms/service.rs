use std::sync::Arc;

use chrono::Local;
use tracing::{debug, info};

use crate::config::MailConfig;

use super::captcha::{CaptchaVerifier, VerificationError};
use super::compose::compose;
use super::delivery::{DeliveryError, DeliveryReceipt, Mailer};
use super::destination::{resolve_destination, DestinationError};
use super::domain::Submission;
use super::validate::{validate, ValidationError};

/// Drives one submission through validation, captcha verification,
/// destination resolution, composition, and delivery.
///
/// Forward-only: the first failing step rejects the request. Captcha
/// verification must succeed before any destination or composition work
/// happens, and the mailer credential is checked before composition so a
/// misconfigured mailer wastes nothing.
pub struct SubmissionService<V, M> {
    verifier: Arc<V>,
    mailer: Arc<M>,
    mail: MailConfig,
}

impl<V, M> SubmissionService<V, M>
where
    V: CaptchaVerifier + 'static,
    M: Mailer + 'static,
{
    pub fn new(verifier: Arc<V>, mailer: Arc<M>, mail: MailConfig) -> Self {
        Self {
            verifier,
            mailer,
            mail,
        }
    }

    pub async fn handle(&self, submission: Submission) -> Result<DeliveryReceipt, SubmissionError> {
        let kind = submission.kind();

        let validated = validate(submission)?;

        let verification = self.verifier.verify(validated.captcha_token()).await?;
        debug!(kind = kind.label(), raw = %verification.raw, "captcha accepted");

        self.mailer.ensure_ready()?;

        let destination = resolve_destination(kind, &self.mail)?;

        let message = compose(&validated, &destination, &self.mail.brand_url, Local::now());

        let receipt = self.mailer.send(message).await?;
        info!(
            kind = kind.label(),
            receipt = %receipt.id,
            "notification dispatched"
        );

        Ok(receipt)
    }
}

/// Aggregate of every step's failure, translated to an HTTP response at the
/// router boundary.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Verification(#[from] VerificationError),
    #[error(transparent)]
    Destination(#[from] DestinationError),
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}
