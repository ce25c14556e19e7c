use super::domain::{
    CareerSubmission, ContactSubmission, Submission, ValidatedCareer, ValidatedContact,
    ValidatedSubmission,
};

/// First-failure-wins field checks. The `Display` text of each variant is
/// the user-facing response message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Captcha requerido")]
    MissingCaptcha,
    #[error("Faltan campos obligatorios")]
    MissingRequiredFields,
    #[error("Debes adjuntar tu CV.")]
    MissingAttachment,
    #[error("Formato de CV no permitido (usa PDF, JPG o PNG).")]
    UnsupportedAttachmentType,
}

/// Check required fields and attachment constraints, producing the typed
/// submission the rest of the pipeline consumes. Pure; no external calls.
///
/// The captcha token is checked before everything else so a stale token is
/// reported as such instead of sending the caller back to re-enter data.
/// The 3 MiB attachment ceiling is not enforced here; the careers route's
/// body limit rejects oversized uploads before the pipeline starts.
pub fn validate(submission: Submission) -> Result<ValidatedSubmission, ValidationError> {
    match submission {
        Submission::Contact(contact) => validate_contact(contact).map(ValidatedSubmission::Contact),
        Submission::Careers(career) => validate_career(career).map(ValidatedSubmission::Careers),
    }
}

fn validate_contact(contact: ContactSubmission) -> Result<ValidatedContact, ValidationError> {
    let captcha_token = captcha_token(&contact.captcha_token)?;
    Ok(ValidatedContact {
        first_name: required(contact.first_name)?,
        last_name: required(contact.last_name)?,
        email: required(contact.email)?,
        phone: required(contact.phone)?,
        message: required(contact.message)?,
        captcha_token,
    })
}

fn validate_career(career: CareerSubmission) -> Result<ValidatedCareer, ValidationError> {
    let captcha_token = captcha_token(&career.captcha_token)?;
    let validated = ValidatedCareer {
        first_name: required(career.first_name)?,
        last_name: required(career.last_name)?,
        email: required(career.email)?,
        phone: required(career.phone)?,
        message: optional(career.message),
        portfolio: optional(career.portfolio),
        attachment: career
            .attachment
            .ok_or(ValidationError::MissingAttachment)?,
        captcha_token,
    };

    if !is_allowed_cv_type(&validated.attachment.content_type) {
        return Err(ValidationError::UnsupportedAttachmentType);
    }

    Ok(validated)
}

fn captcha_token(token: &Option<String>) -> Result<String, ValidationError> {
    token
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or(ValidationError::MissingCaptcha)
}

fn required(field: Option<String>) -> Result<String, ValidationError> {
    field
        .filter(|value| !value.trim().is_empty())
        .ok_or(ValidationError::MissingRequiredFields)
}

/// Empty optional fields are normalized away so the composer can render its
/// placeholder text.
fn optional(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.trim().is_empty())
}

fn is_allowed_cv_type(raw: &str) -> bool {
    match raw.parse::<mime::Mime>() {
        Ok(parsed) => matches!(
            (parsed.type_(), parsed.subtype()),
            (mime::APPLICATION, mime::PDF) | (mime::IMAGE, mime::JPEG) | (mime::IMAGE, mime::PNG)
        ),
        Err(_) => false,
    }
}
