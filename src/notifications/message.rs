//! Outbound message composition.
//!
//! Messages are shaped like the transactional-email provider's send payload so the transport
//! can post them as-is.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::config::EmailConfig;
use crate::quoting::SanitizedSubmission;

const NOT_SPECIFIED: &str = "Not specified";

/// Which of the two notifications a message is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Business,
    Acknowledgment,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Business => "business",
            NotificationKind::Acknowledgment => "acknowledgment",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contact {
    pub email: String,
    pub name: String,
}

/// Provider send payload. Either inline content or a template reference is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundEmail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<Contact>,
    pub to: Vec<Contact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<BTreeMap<String, String>>,
}

/// Alert for the operator inbox, with an HTML summary and a plain-text twin.
pub fn business_notification(config: &EmailConfig, s: &SanitizedSubmission) -> OutboundEmail {
    OutboundEmail {
        sender: Some(Contact {
            email: config.sender_email.clone(),
            name: config.sender_name.clone(),
        }),
        to: vec![Contact {
            email: config.business_recipient.clone(),
            name: config.business_name.clone(),
        }],
        subject: Some(format!("New Quote Request from {}", s.full_name())),
        html_content: Some(business_html(config, s)),
        text_content: Some(business_text(config, s)),
        template_id: None,
        params: None,
    }
}

/// Thank-you message to the requester. Uses the provider template when one is configured.
pub fn acknowledgment(config: &EmailConfig, s: &SanitizedSubmission) -> OutboundEmail {
    let to = vec![Contact {
        email: s.email.clone(),
        name: s.full_name(),
    }];

    match config.template_id {
        Some(template_id) => OutboundEmail {
            sender: None,
            to,
            subject: None,
            html_content: None,
            text_content: None,
            template_id: Some(template_id),
            params: Some(BTreeMap::from([
                ("FIRSTNAME".to_string(), s.first_name.clone()),
                ("LASTNAME".to_string(), s.last_name.clone()),
            ])),
        },
        None => OutboundEmail {
            sender: Some(Contact {
                email: config.sender_email.clone(),
                name: config.business_name.clone(),
            }),
            to,
            subject: Some("Thank you for requesting a quote".to_string()),
            html_content: Some(acknowledgment_html(config, s)),
            text_content: None,
            template_id: None,
            params: None,
        },
    }
}

fn or_not_specified(value: &str) -> &str {
    if value.is_empty() {
        NOT_SPECIFIED
    } else {
        value
    }
}

fn business_html(config: &EmailConfig, s: &SanitizedSubmission) -> String {
    let name = escape_html(&s.full_name());
    let email = escape_html(&s.email);
    let phone = escape_html(&s.phone);
    let row = |label: &str, value: &str| {
        format!(
            r#"<tr><td style="padding: 8px 0; font-weight: bold; color: #555; width: 30%;">{label}:</td><td style="padding: 8px 0; color: #333;">{value}</td></tr>"#
        )
    };

    let contact_rows = [
        row("Name", &name),
        row("Email", &format!(r#"<a href="mailto:{email}" style="color: #ea5f00;">{email}</a>"#)),
        row("Phone", &format!(r#"<a href="tel:{phone}" style="color: #ea5f00;">{phone}</a>"#)),
        row("Company", &escape_html(or_not_specified(&s.company))),
        row("Project Location", &escape_html(or_not_specified(&s.address))),
    ]
    .concat();

    let spec_rows = [
        row("Timeline", &escape_html(or_not_specified(&s.timeline))),
        row("Budget Range", &escape_html(or_not_specified(&s.budget))),
    ]
    .concat();

    let details = if s.project_details.is_empty() {
        String::new()
    } else {
        format!(
            r#"<div style="margin-top: 15px;"><p style="font-weight: bold; color: #555;">Project Details:</p><div style="background-color: #f8f9fa; padding: 15px; border-left: 4px solid #ea5f00;"><p style="margin: 0; color: #333; line-height: 1.6;">{}</p></div></div>"#,
            escape_html(&s.project_details)
        )
    };

    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; background-color: #f8f9fa; padding: 20px;">
<div style="background-color: white; padding: 30px; border-radius: 10px;">
<h1 style="color: #ea5f00; text-align: center;">New Quote Request - {business}</h1>
<p>A new potential client, <strong>{name}</strong>, is requesting a quote.</p>
<h3 style="border-bottom: 2px solid #ea5f00;">Client Information</h3>
<table style="width: 100%; border-collapse: collapse;">{contact_rows}</table>
<h3 style="border-bottom: 2px solid #ea5f00;">Services Requested</h3>
<p style="font-weight: 500;">{services}</p>
<h3 style="border-bottom: 2px solid #ea5f00;">Project Specifications</h3>
<table style="width: 100%; border-collapse: collapse;">{spec_rows}</table>
{details}
<p style="font-size: 14px;">Please respond to this client within 4 hours as promised on the website.</p>
</div>
</div>"#,
        business = escape_html(&config.business_name),
        services = escape_html(&s.services_list()),
    )
}

fn business_text(config: &EmailConfig, s: &SanitizedSubmission) -> String {
    let details = if s.project_details.is_empty() {
        "No additional details provided"
    } else {
        s.project_details.as_str()
    };

    format!(
        "New Quote Request - {business}\n\n\
         Client: {name}\n\
         Email: {email}\n\
         Phone: {phone}\n\
         Company: {company}\n\
         Project Location: {address}\n\n\
         Services Requested: {services}\n\
         Timeline: {timeline}\n\
         Budget Range: {budget}\n\n\
         Project Details:\n{details}\n\n\
         Please respond within 4 hours as promised on the website.\n",
        business = config.business_name,
        name = s.full_name(),
        email = s.email,
        phone = s.phone,
        company = or_not_specified(&s.company),
        address = or_not_specified(&s.address),
        services = s.services_list(),
        timeline = or_not_specified(&s.timeline),
        budget = or_not_specified(&s.budget),
    )
}

fn acknowledgment_html(config: &EmailConfig, s: &SanitizedSubmission) -> String {
    let business = escape_html(&config.business_name);
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; background-color: #ffffff; padding: 40px 20px;">
<h1 style="color: #1e5532;">{heading}</h1>
<p>Hi {first},</p>
<p>Thank you for reaching out to us with your project details. We've received your request and will review it as soon as possible.</p>
<p>A member of our team will get back to you shortly to discuss your vision and next steps.</p>
<p>Best regards,<br>{business}<br>{phone}</p>
</div>"#,
        heading = escape_html(&config.business_name.to_uppercase()),
        first = escape_html(&s.first_name),
        phone = escape_html(&config.business_phone),
    )
}

/// Escape text for interpolation into HTML element content and attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
