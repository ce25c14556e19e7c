use serde::Deserialize;

/// Distinguishes the two form pipelines sharing the dispatch flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionKind {
    Contact,
    Careers,
}

impl SubmissionKind {
    pub const fn label(self) -> &'static str {
        match self {
            SubmissionKind::Contact => "contact",
            SubmissionKind::Careers => "careers",
        }
    }
}

/// Raw contact form payload as it arrives on the wire. Every field is
/// optional here so that absence surfaces as a validation failure rather
/// than a deserialization rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactSubmission {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub captcha_token: Option<String>,
}

/// Raw careers form payload, assembled from the multipart fields.
#[derive(Debug, Clone, Default)]
pub struct CareerSubmission {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub portfolio: Option<String>,
    pub captcha_token: Option<String>,
    pub attachment: Option<Attachment>,
}

/// Uploaded CV held in memory for the lifetime of the request; never
/// persisted, never re-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn size_mb(&self) -> f64 {
        self.bytes.len() as f64 / 1024.0 / 1024.0
    }
}

/// Variant over the two inbound pipelines.
#[derive(Debug, Clone)]
pub enum Submission {
    Contact(ContactSubmission),
    Careers(CareerSubmission),
}

impl Submission {
    pub const fn kind(&self) -> SubmissionKind {
        match self {
            Submission::Contact(_) => SubmissionKind::Contact,
            Submission::Careers(_) => SubmissionKind::Careers,
        }
    }
}

/// Contact submission whose required fields have been checked and unwrapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedContact {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub captcha_token: String,
}

/// Careers submission after validation; the attachment is guaranteed present
/// and of an accepted type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCareer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub message: Option<String>,
    pub portfolio: Option<String>,
    pub attachment: Attachment,
    pub captcha_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatedSubmission {
    Contact(ValidatedContact),
    Careers(ValidatedCareer),
}

impl ValidatedSubmission {
    pub const fn kind(&self) -> SubmissionKind {
        match self {
            ValidatedSubmission::Contact(_) => SubmissionKind::Contact,
            ValidatedSubmission::Careers(_) => SubmissionKind::Careers,
        }
    }

    pub fn captcha_token(&self) -> &str {
        match self {
            ValidatedSubmission::Contact(contact) => &contact.captcha_token,
            ValidatedSubmission::Careers(career) => &career.captcha_token,
        }
    }

    /// Submitter address, used as the notification's reply-to.
    pub fn email(&self) -> &str {
        match self {
            ValidatedSubmission::Contact(contact) => &contact.email,
            ValidatedSubmission::Careers(career) => &career.email,
        }
    }

    pub fn full_name(&self) -> String {
        let (first, last) = match self {
            ValidatedSubmission::Contact(contact) => (&contact.first_name, &contact.last_name),
            ValidatedSubmission::Careers(career) => (&career.first_name, &career.last_name),
        };
        format!("{first} {last}")
    }
}
