//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional TOML file ($INTAKE_CONFIG)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (environment overrides)
//!     → validation.rs (semantic checks)
//!     → IntakeConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//!
//! Environment secrets
//!     → Credentials (SecretString, never serialized)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow running with no file at all
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{ConfigError, Credentials};
pub use schema::IntakeConfig;
pub use schema::{
    CaptchaConfig, EmailConfig, ListenerConfig, ObservabilityConfig, RateLimitConfig,
    SecurityConfig, TimeoutConfig,
};
