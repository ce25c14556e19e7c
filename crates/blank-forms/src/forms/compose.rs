use chrono::{DateTime, Local};

use super::destination::Destination;
use super::domain::{ValidatedCareer, ValidatedContact, ValidatedSubmission};

const CONTACT_FROM: &str = "BLANK · Formulario Web <onboarding@resend.dev>";
const CAREERS_FROM: &str = "BLANK · Careers <onboarding@resend.dev>";
const NO_PORTFOLIO: &str = "No especificado";
const NO_MESSAGE: &str = "Sin mensaje adicional.";
const TEXT_RULE: &str = "────────────────────────────";

/// Fully composed notification email, ready for the delivery provider.
/// Built fresh per request and consumed by the send call; never mutated
/// after composition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub from: String,
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub reply_to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
    pub attachments: Vec<MessageAttachment>,
}

/// Attachment carried by raw bytes under its original filename and type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageAttachment {
    pub filename: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

/// Build both renderings of the notification. Pure transform: the timestamp
/// shown in the bodies is supplied by the caller.
///
/// The text and HTML bodies carry the same field set; only formatting
/// differs. Every user-supplied value is entity-escaped before it reaches
/// the HTML rendering.
pub fn compose(
    submission: &ValidatedSubmission,
    destination: &Destination,
    brand_url: &str,
    sent_at: DateTime<Local>,
) -> OutboundMessage {
    match submission {
        ValidatedSubmission::Contact(contact) => {
            compose_contact(contact, destination, brand_url, sent_at)
        }
        ValidatedSubmission::Careers(career) => {
            compose_career(career, destination, brand_url, sent_at)
        }
    }
}

fn compose_contact(
    contact: &ValidatedContact,
    destination: &Destination,
    brand_url: &str,
    sent_at: DateTime<Local>,
) -> OutboundMessage {
    let full_name = format!("{} {}", contact.first_name, contact.last_name);
    let stamp = format_stamp(sent_at);

    let text_body = format!(
        "Has recibido un nuevo mensaje desde el formulario de contacto de blank.com.mx\n\
         \n\
         {rule}\n\
         DATOS DEL CONTACTO\n\
         {rule}\n\
         Nombre:   {full_name}\n\
         Email:    {email}\n\
         Teléfono: {phone}\n\
         \n\
         {rule}\n\
         MENSAJE\n\
         {rule}\n\
         {message}\n\
         \n\
         {rule}\n\
         META\n\
         {rule}\n\
         Fecha:  {stamp}\n\
         Origen: Formulario de contacto (www.blank.com.mx)\n",
        rule = TEXT_RULE,
        email = contact.email,
        phone = contact.phone,
        message = contact.message,
    );

    let rows = [
        data_row("Nombre", &escape_html(&full_name)),
        data_row(
            "Correo",
            &format!(
                "<a href=\"mailto:{0}\" style=\"color:#60a5fa; text-decoration:none;\">{0}</a>",
                escape_html(&contact.email)
            ),
        ),
        data_row(
            "Teléfono",
            &format!(
                "<a href=\"tel:{0}\" style=\"color:#e5e7eb; text-decoration:none;\">{0}</a>",
                escape_html(&contact.phone)
            ),
        ),
    ]
    .concat();

    let card = Card {
        header_label: "Detalles del mensaje",
        header_name_html: &escape_html(&full_name),
        stamp: &stamp,
        origin_chip: "www.blank.com.mx",
        data_label: "Datos del contacto",
        data_rows_html: &rows,
        message_html: &escape_multiline(&contact.message),
        extra_note_html: None,
    }
    .render();

    let html_body = document_html(
        "Nuevo mensaje de contacto",
        "Nuevo mensaje de contacto",
        "Has recibido un mensaje desde el formulario de contacto de blank.com.mx",
        &card,
        "Este correo fue generado automáticamente desde el formulario de contacto de",
        brand_url,
    );

    OutboundMessage {
        from: CONTACT_FROM.to_string(),
        to: destination.to.clone(),
        cc: destination.cc.clone(),
        reply_to: contact.email.clone(),
        subject: format!("[Contacto Web] Nuevo mensaje de {full_name}"),
        text_body,
        html_body,
        attachments: Vec::new(),
    }
}

fn compose_career(
    career: &ValidatedCareer,
    destination: &Destination,
    brand_url: &str,
    sent_at: DateTime<Local>,
) -> OutboundMessage {
    let full_name = format!("{} {}", career.first_name, career.last_name);
    let stamp = format_stamp(sent_at);
    let portfolio = career.portfolio.as_deref().unwrap_or(NO_PORTFOLIO);
    let message = career.message.as_deref().unwrap_or(NO_MESSAGE);
    let attachment = &career.attachment;
    let size_mb = format!("{:.2} MB", attachment.size_mb());

    let text_body = format!(
        "Has recibido una nueva aplicación desde la sección Careers de blank.com.mx\n\
         \n\
         {rule}\n\
         DATOS DEL CANDIDATO\n\
         {rule}\n\
         Nombre:    {full_name}\n\
         Correo:    {email}\n\
         Teléfono:  {phone}\n\
         Portafolio: {portfolio}\n\
         \n\
         {rule}\n\
         MENSAJE\n\
         {rule}\n\
         {message}\n\
         \n\
         {rule}\n\
         CV ADJUNTO\n\
         {rule}\n\
         Archivo: {filename}\n\
         Tipo:    {content_type}\n\
         Tamaño:  {size_mb}\n",
        rule = TEXT_RULE,
        email = career.email,
        phone = career.phone,
        filename = attachment.filename,
        content_type = attachment.content_type,
    );

    let portfolio_html = match career.portfolio.as_deref() {
        Some(url) => format!(
            "<a href=\"{0}\" style=\"color:#60a5fa; text-decoration:none;\">{0}</a>",
            escape_html(url)
        ),
        None => NO_PORTFOLIO.to_string(),
    };

    let rows = [
        data_row("Nombre", &escape_html(&full_name)),
        data_row(
            "Correo",
            &format!(
                "<a href=\"mailto:{0}\" style=\"color:#60a5fa; text-decoration:none;\">{0}</a>",
                escape_html(&career.email)
            ),
        ),
        data_row(
            "Teléfono",
            &format!(
                "<a href=\"tel:{0}\" style=\"color:#e5e7eb; text-decoration:none;\">{0}</a>",
                escape_html(&career.phone)
            ),
        ),
        data_row("Portafolio", &portfolio_html),
    ]
    .concat();

    let cv_note = format!(
        "CV adjunto: <strong>{}</strong> ({})",
        escape_html(&attachment.filename),
        size_mb
    );

    let card = Card {
        header_label: "Candidato",
        header_name_html: &escape_html(&full_name),
        stamp: &stamp,
        origin_chip: "www.blank.com.mx · Careers",
        data_label: "Datos del candidato",
        data_rows_html: &rows,
        message_html: &escape_multiline(message),
        extra_note_html: Some(&cv_note),
    }
    .render();

    let html_body = document_html(
        "Nueva aplicación · Careers",
        "Nueva aplicación · Careers",
        "Has recibido una nueva postulación desde el formulario de Careers.",
        &card,
        "Este correo fue generado automáticamente desde la sección Careers de",
        brand_url,
    );

    OutboundMessage {
        from: CAREERS_FROM.to_string(),
        to: destination.to.clone(),
        cc: destination.cc.clone(),
        reply_to: career.email.clone(),
        subject: format!("[Careers] Nueva aplicación de {full_name}"),
        text_body,
        html_body,
        attachments: vec![MessageAttachment {
            filename: attachment.filename.clone(),
            content_type: attachment.content_type.clone(),
            content: attachment.bytes.clone(),
        }],
    }
}

fn format_stamp(sent_at: DateTime<Local>) -> String {
    sent_at.format("%d/%m/%Y, %H:%M:%S").to_string()
}

/// Entity-escape the five characters that can open markup or break out of
/// an attribute value. Applied to every user-supplied field before HTML
/// interpolation.
fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape first, then turn newlines into line breaks for multi-line fields.
fn escape_multiline(input: &str) -> String {
    escape_html(input).replace('\n', "<br>")
}

fn data_row(label: &str, value_html: &str) -> String {
    format!(
        "<tr>\n\
         <td width=\"28%\" style=\"padding:4px 0; color:#9ca3af;\">{label}</td>\n\
         <td style=\"padding:4px 0;\">{value_html}</td>\n\
         </tr>\n"
    )
}

fn section_label(text: &str) -> String {
    format!(
        "<div style=\"font-size:11px; font-weight:600; text-transform:uppercase; \
         letter-spacing:0.12em; color:#9ca3af; margin-bottom:8px;\">{text}</div>\n"
    )
}

fn separator() -> &'static str {
    "<tr><td style=\"padding-bottom:12px;\">\
     <div style=\"height:1px; background-color:rgba(148,163,184,0.35);\"></div>\
     </td></tr>\n"
}

/// Content slots for the central card shared by both notification layouts.
/// All `*_html` fields must already be escaped.
struct Card<'a> {
    header_label: &'a str,
    header_name_html: &'a str,
    stamp: &'a str,
    origin_chip: &'a str,
    data_label: &'a str,
    data_rows_html: &'a str,
    message_html: &'a str,
    extra_note_html: Option<&'a str>,
}

impl Card<'_> {
    fn render(&self) -> String {
        let Card {
            header_label,
            header_name_html,
            stamp,
            origin_chip,
            data_label,
            data_rows_html,
            message_html,
            extra_note_html,
        } = self;

        let note = extra_note_html
            .map(|note| {
                format!(
                    "<div style=\"margin-top:16px; font-size:12px; color:#9ca3af;\">{note}</div>\n"
                )
            })
            .unwrap_or_default();

        format!(
        "<table width=\"100%\" cellpadding=\"0\" cellspacing=\"0\" style=\"border-radius:18px; \
         background-color:#020617; border:1px solid rgba(148,163,184,0.45); \
         box-shadow:0 18px 38px rgba(15,23,42,0.7); padding:22px 20px 22px 20px; \
         font-family: system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;\">\n\
         <tr><td style=\"padding-bottom:16px;\">\n\
         <table width=\"100%\" cellpadding=\"0\" cellspacing=\"0\"><tr>\n\
         <td style=\"vertical-align:top;\">\n\
         <div style=\"font-size:11px; color:#9ca3af; text-transform:uppercase; \
         letter-spacing:0.12em; margin-bottom:4px;\">{header_label}</div>\n\
         <div style=\"font-size:18px; font-weight:600; color:#f9fafb; line-height:1.3;\">{header_name_html}</div>\n\
         <div style=\"font-size:11px; color:#6b7280; margin-top:4px;\">Enviado el {stamp}</div>\n\
         </td>\n\
         <td style=\"vertical-align:top;\" align=\"right\">\n\
         <div style=\"display:inline-block; padding:6px 12px; border-radius:999px; \
         border:1px solid rgba(148,163,184,0.7); font-size:10px; letter-spacing:0.16em; \
         text-transform:uppercase; color:#e5e7eb; background:rgba(15,23,42,0.85);\">{origin_chip}</div>\n\
         </td>\n\
         </tr></table>\n\
         </td></tr>\n\
         {separator}\
         <tr><td style=\"padding-bottom:12px;\">\n\
         {data_label_html}\
         <table width=\"100%\" cellpadding=\"0\" cellspacing=\"0\" style=\"font-size:13px; color:#e5e7eb;\">\n\
         {data_rows_html}\
         </table>\n\
         </td></tr>\n\
         {separator}\
         <tr><td>\n\
         {message_label_html}\
         <div style=\"font-size:14px; line-height:1.7; color:#e5e7eb; white-space:pre-wrap;\">{message_html}</div>\n\
         {note}\
         </td></tr>\n\
         </table>",
            separator = separator(),
            data_label_html = section_label(data_label),
            message_label_html = section_label("Mensaje"),
        )
    }
}

fn document_html(
    title: &str,
    subtitle: &str,
    intro: &str,
    card_html: &str,
    footer_text: &str,
    brand_url: &str,
) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"es\">\n\
         <head>\n\
         <meta http-equiv=\"Content-Type\" content=\"text/html; charset=UTF-8\" />\n\
         <title>{title}</title>\n\
         </head>\n\
         <body style=\"margin:0; padding:0; background-color:#020617;\">\n\
         <table width=\"100%\" cellpadding=\"0\" cellspacing=\"0\" style=\"background-color:#020617; padding:32px 16px 32px 16px;\">\n\
         <tr><td align=\"center\">\n\
         <table width=\"100%\" cellpadding=\"0\" cellspacing=\"0\" style=\"max-width:720px; width:100%;\">\n\
         <tr><td align=\"center\" style=\"padding-bottom:24px;\">\n\
         <div style=\"font-family: system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; \
         font-size:26px; font-weight:700; letter-spacing:0.28em; text-transform:uppercase; color:#f9fafb;\">BLANK</div>\n\
         <div style=\"margin:14px auto 12px auto; width:72px; height:1px; \
         background:linear-gradient(to right,#4b5563,#9ca3af,#4b5563);\"></div>\n\
         <div style=\"font-family: system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; \
         font-size:12px; letter-spacing:0.16em; text-transform:uppercase; color:#9ca3af;\">{subtitle}</div>\n\
         <div style=\"margin-top:8px; font-family: system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; \
         font-size:13px; color:#9ca3af;\">{intro}</div>\n\
         </td></tr>\n\
         <tr><td>\n\
         {card_html}\n\
         </td></tr>\n\
         <tr><td align=\"center\" style=\"padding-top:16px;\">\n\
         <div style=\"font-family: system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; \
         font-size:11px; color:#6b7280;\">{footer_text} \
         <a href=\"{brand_url}\" style=\"color:#9ca3af; text-decoration:underline;\">blank.com.mx</a>.</div>\n\
         </td></tr>\n\
         </table>\n\
         </td></tr>\n\
         </table>\n\
         </body>\n\
         </html>\n"
    )
}
