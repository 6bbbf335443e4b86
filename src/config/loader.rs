//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use secrecy::SecretString;
use thiserror::Error;

use crate::config::schema::IntakeConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable pointing at an optional TOML config file.
pub const CONFIG_PATH_ENV: &str = "INTAKE_CONFIG";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: {reason}")]
    Env { var: &'static str, reason: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Server-held secrets. Only ever read from the environment and never serialized.
#[derive(Debug, Default)]
pub struct Credentials {
    /// Transactional email provider key (`BREVO_API_KEY`).
    pub email_api_key: Option<SecretString>,
    /// CAPTCHA verification secret (`RECAPTCHA_SECRET_KEY`).
    pub captcha_secret: Option<SecretString>,
    /// Bearer token for the admin API (`INTAKE_ADMIN_TOKEN`).
    pub admin_token: Option<SecretString>,
}

impl Credentials {
    /// Read credentials through `lookup`. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = |var: &str| {
            lookup(var)
                .filter(|v| !v.trim().is_empty())
                .map(SecretString::from)
        };
        Self {
            email_api_key: secret("BREVO_API_KEY"),
            captcha_secret: secret("RECAPTCHA_SECRET_KEY"),
            admin_token: secret("INTAKE_ADMIN_TOKEN"),
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }
}

/// Build the runtime configuration: optional file, then environment overrides, then validation.
pub fn load_from_env() -> Result<IntakeConfig, ConfigError> {
    let path = std::env::var(CONFIG_PATH_ENV).ok();
    load_with(path.as_deref().map(Path::new), |var| std::env::var(var).ok())
}

/// Load from `path` (defaults when `None`), overlay values from `lookup`, then validate.
pub fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<IntakeConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let config = match path {
        Some(path) => read_file(path)?,
        None => IntakeConfig::default(),
    };

    let config = apply_env_overrides(config, lookup)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn read_file(path: &Path) -> Result<IntakeConfig, ConfigError> {
    tracing::info!(path = %path.display(), "Loading config file");
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Overlay environment-provided settings onto `config`.
pub fn apply_env_overrides<F>(mut config: IntakeConfig, lookup: F) -> Result<IntakeConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

    if let Some(addr) = value("INTAKE_BIND_ADDRESS") {
        config.listener.bind_address = addr;
    }
    if let Some(sender) = value("BREVO_SENDER_EMAIL") {
        config.email.sender_email = sender;
    }
    if let Some(recipient) = value("INTAKE_BUSINESS_EMAIL") {
        config.email.business_recipient = recipient;
    }
    if let Some(raw) = value("BREVO_TEMPLATE_ID") {
        let id = raw.trim().parse::<u64>().map_err(|e| ConfigError::Env {
            var: "BREVO_TEMPLATE_ID",
            reason: e.to_string(),
        })?;
        config.email.template_id = Some(id);
    }

    Ok(config)
}
