//! Required-field and format validation.
//!
//! Every text field is sanitized first; checks run against the sanitized values.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use crate::quoting::catalog;
use crate::quoting::sanitize::{sanitize, sanitize_opt};
use crate::quoting::types::{SanitizedSubmission, SubmissionRequest};

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

static PHONE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[\d\s\-()]+$").expect("phone pattern compiles"));

const MIN_PHONE_DIGITS: usize = 10;

/// Reasons a submission is rejected before dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidSubmission {
    /// One or more required fields were absent or empty after sanitization.
    #[error("Missing required fields: firstName, lastName, email, phone, and at least one service")]
    MissingFields(Vec<&'static str>),

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Invalid phone format")]
    InvalidPhone,
}

/// Simple `local@domain.tld` shape check.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

/// Optional leading `+`, then digits, spaces, hyphens and parentheses, with at least ten digits.
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_CHARS.is_match(phone)
        && phone.chars().filter(char::is_ascii_digit).count() >= MIN_PHONE_DIGITS
}

/// Sanitize every field of `request` and validate the result.
pub fn validate(request: &SubmissionRequest) -> Result<SanitizedSubmission, InvalidSubmission> {
    let first_name = sanitize_opt(request.first_name.as_deref());
    let last_name = sanitize_opt(request.last_name.as_deref());
    let email = sanitize_opt(request.email.as_deref());
    let phone = sanitize_opt(request.phone.as_deref());
    let service_ids: Vec<String> = request
        .selected_services
        .iter()
        .map(|s| sanitize(s))
        .filter(|s| !s.is_empty())
        .collect();

    let mut missing = Vec::new();
    for (name, value) in [
        ("firstName", &first_name),
        ("lastName", &last_name),
        ("email", &email),
        ("phone", &phone),
    ] {
        if value.is_empty() {
            missing.push(name);
        }
    }
    if service_ids.is_empty() {
        missing.push("selectedServices");
    }
    if !missing.is_empty() {
        return Err(InvalidSubmission::MissingFields(missing));
    }

    if !is_valid_email(&email) {
        return Err(InvalidSubmission::InvalidEmail);
    }
    if !is_valid_phone(&phone) {
        return Err(InvalidSubmission::InvalidPhone);
    }

    Ok(SanitizedSubmission {
        first_name,
        last_name,
        email,
        phone,
        company: sanitize_opt(request.company.as_deref()),
        address: sanitize_opt(request.address.as_deref()),
        services: service_ids.iter().map(|id| catalog::resolve(id)).collect(),
        timeline: sanitize_opt(request.timeline.as_deref()),
        budget: sanitize_opt(request.budget.as_deref()),
        project_details: sanitize_opt(request.project_details.as_deref()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_request() -> SubmissionRequest {
        SubmissionRequest {
            first_name: Some("Maria".into()),
            last_name: Some("Lopez".into()),
            email: Some("maria@example.com".into()),
            phone: Some("(555) 123-4567".into()),
            selected_services: vec!["renovation".into()],
            ..Default::default()
        }
    }

    #[test]
    fn test_email_format() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.de"));
        assert!(!is_valid_email("a@@b.co"));
    }

    #[test]
    fn test_phone_format() {
        assert!(is_valid_phone("(555) 123-4567"));
        assert!(is_valid_phone("+1 555 123 4567"));
        assert!(is_valid_phone("5551234567"));
        assert!(!is_valid_phone("12345"));
        assert!(!is_valid_phone("(555) 123-456"));
        assert!(!is_valid_phone("555-123-4567 ext 9"));
        assert!(!is_valid_phone("1+5551234567"));
    }

    #[test]
    fn test_valid_request_is_sanitized_and_mapped() {
        let mut req = complete_request();
        req.project_details = Some("New kitchen <script>alert(1)</script>".into());
        req.selected_services = vec!["renovation".into(), " <i>pool-install</i> ".into()];

        let clean = validate(&req).unwrap();
        assert_eq!(clean.project_details, "New kitchen");
        assert_eq!(clean.services, vec!["Renovation & Remodeling", "pool-install"]);
        assert_eq!(clean.company, "");
        assert_eq!(clean.full_name(), "Maria Lopez");
    }

    #[test]
    fn test_empty_services_rejected() {
        let mut req = complete_request();
        req.selected_services.clear();
        assert_eq!(
            validate(&req),
            Err(InvalidSubmission::MissingFields(vec!["selectedServices"]))
        );
    }

    #[test]
    fn test_markup_only_field_counts_as_missing() {
        let mut req = complete_request();
        req.first_name = Some("<b></b>".into());
        req.selected_services = vec!["<script>x</script>".into()];
        assert_eq!(
            validate(&req),
            Err(InvalidSubmission::MissingFields(vec!["firstName", "selectedServices"]))
        );
    }

    #[test]
    fn test_format_errors() {
        let mut req = complete_request();
        req.email = Some("a@b".into());
        assert_eq!(validate(&req), Err(InvalidSubmission::InvalidEmail));

        let mut req = complete_request();
        req.phone = Some("12345".into());
        assert_eq!(validate(&req), Err(InvalidSubmission::InvalidPhone));
    }

    #[test]
    fn test_email_checked_after_sanitization() {
        let mut req = complete_request();
        req.email = Some(" <b>maria@example.com</b> ".into());
        assert_eq!(validate(&req).unwrap().email, "maria@example.com");
    }
}
