//! Quote request intake service library.

pub mod admin;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod notifications;
pub mod observability;
pub mod quoting;
pub mod security;

pub use config::schema::IntakeConfig;
pub use http::IntakeServer;
pub use lifecycle::Shutdown;
