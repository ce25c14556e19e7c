use crate::config::MailConfig;

use super::domain::SubmissionKind;

/// Recipient set for one pipeline's notification email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub to: Vec<String>,
    pub cc: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DestinationError {
    #[error("No hay correo de destino configurado")]
    NoDestinationConfigured,
}

/// Pure read of the startup configuration. The careers pipeline falls back
/// to the contact address when it has no dedicated one.
pub fn resolve_destination(
    kind: SubmissionKind,
    mail: &MailConfig,
) -> Result<Destination, DestinationError> {
    let (to, cc) = match kind {
        SubmissionKind::Contact => (mail.contact_to.clone(), mail.contact_cc.clone()),
        SubmissionKind::Careers => (
            mail.careers_to.clone().or_else(|| mail.contact_to.clone()),
            mail.careers_cc.clone(),
        ),
    };

    let to = to.ok_or(DestinationError::NoDestinationConfigured)?;

    Ok(Destination {
        to: vec![to],
        cc: cc.into_iter().collect(),
    })
}
