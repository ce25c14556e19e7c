//! Contact and careers submission pipelines.
//!
//! Both pipelines share one forward-only sequence: validate fields, verify
//! the captcha token, resolve the destination addresses, compose the
//! notification email, deliver it. The first failing step rejects the
//! request; there are no retries and nothing is persisted.

pub mod captcha;
pub mod compose;
pub mod delivery;
pub mod destination;
pub mod domain;
pub mod router;
pub mod service;
pub mod validate;

#[cfg(test)]
mod tests;

pub use captcha::{CaptchaVerifier, RecaptchaVerifier, VerificationError, VerificationResult};
pub use compose::{compose, MessageAttachment, OutboundMessage};
pub use delivery::{DeliveryError, DeliveryReceipt, Mailer, ResendMailer};
pub use destination::{resolve_destination, Destination, DestinationError};
pub use domain::{
    Attachment, CareerSubmission, ContactSubmission, Submission, SubmissionKind, ValidatedCareer,
    ValidatedContact, ValidatedSubmission,
};
pub use router::forms_router;
pub use service::{SubmissionError, SubmissionService};
pub use validate::{validate, ValidationError};
