//! Quote request types.

use serde::{Deserialize, Serialize};

/// Raw submission payload as posted by the contact form.
///
/// Every field is optional at the wire level so that a missing field surfaces as a
/// validation failure rather than a deserialization error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubmissionRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    /// Project location.
    pub address: Option<String>,
    pub selected_services: Vec<String>,
    pub timeline: Option<String>,
    pub budget: Option<String>,
    pub project_details: Option<String>,
    /// Hidden form field. Humans leave it empty.
    pub honeypot: Option<String>,
    /// Client-side CAPTCHA assertion.
    pub recaptcha_token: Option<String>,
}

/// A submission that passed sanitization and validation.
///
/// Optional fields are empty strings when the requester left them blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedSubmission {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub address: String,
    /// Display names resolved through the service catalog.
    pub services: Vec<String>,
    pub timeline: String,
    pub budget: String,
    pub project_details: String,
}

impl SanitizedSubmission {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Requested services as a readable, comma separated list.
    pub fn services_list(&self) -> String {
        self.services.join(", ")
    }
}
