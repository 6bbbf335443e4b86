//! Quote request intake service.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────────────┐
//!                         │                    QUOTE INTAKE                       │
//!                         │                                                       │
//!   POST /api/contact     │  ┌────────┐   ┌────────────┐   ┌───────────────┐     │
//!   ──────────────────────┼─▶│  http  │──▶│ rate limit │──▶│ honeypot +    │     │
//!                         │  │ submit │   │ (per IP)   │   │ CAPTCHA gate  │─────┼──▶ CAPTCHA
//!                         │  └────────┘   └────────────┘   └───────┬───────┘     │    provider
//!                         │                                        ▼              │
//!                         │                               ┌───────────────┐      │
//!                         │                               │  sanitize +   │      │
//!                         │                               │  validate     │      │
//!                         │                               └───────┬───────┘      │
//!                         │                                       ▼              │
//!   JSON response         │  ┌──────────┐                 ┌───────────────┐      │
//!   ◀─────────────────────┼──│ response │◀────────────────│  dispatcher   │──────┼──▶ Email
//!                         │  └──────────┘                 │ business+ack  │      │    provider
//!                         │                               └───────────────┘      │
//!                         │  config · observability · admin · lifecycle          │
//!                         └──────────────────────────────────────────────────────┘
//! ```

use tokio::net::TcpListener;

use quote_intake::config::{loader, Credentials};
use quote_intake::lifecycle::{wait_for_termination, Shutdown};
use quote_intake::observability::{logging, metrics};
use quote_intake::IntakeServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = loader::load_from_env()?;
    logging::init_logging(&config.observability);

    tracing::info!("quote-intake v{} starting", env!("CARGO_PKG_VERSION"));

    let credentials = Credentials::from_env();
    if credentials.email_api_key.is_none() {
        tracing::warn!("BREVO_API_KEY is not set; submissions will fail with a configuration error");
    }
    if credentials.captcha_secret.is_none() {
        tracing::warn!("RECAPTCHA_SECRET_KEY is not set; CAPTCHA verification is disabled");
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        window_secs = config.rate_limit.window_secs,
        max_requests = config.rate_limit.max_requests,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    let server = IntakeServer::new(config, credentials)?;
    let server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    wait_for_termination().await;
    shutdown.trigger();
    server_task.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
