//! Abuse controls applied before a submission is validated.
//!
//! # Data Flow
//! ```text
//! Request headers + peer address
//!     → client.rs (client key)
//!     → rate_limit.rs (fixed-window quota per key)
//!     → spam.rs (honeypot, then CAPTCHA verification)
//! ```

pub mod client;
pub mod rate_limit;
pub mod spam;

pub use rate_limit::{FixedWindowLimiter, RateDecision, RateLimitStore};
pub use spam::{CaptchaVerifier, RecaptchaClient, SpamCheck, SpamGate};
