//! Sends the business notification and the requester acknowledgment.

use std::sync::Arc;

use thiserror::Error;

use crate::config::EmailConfig;
use crate::notifications::message::{self, NotificationKind, OutboundEmail};
use crate::notifications::transport::{EmailTransport, TransportError};
use crate::observability::metrics;
use crate::quoting::SanitizedSubmission;

#[derive(Debug, Error)]
pub enum DispatchError {
    /// No provider API key is configured.
    #[error("email provider API key is not configured")]
    MissingCredential,

    #[error("{kind} email failed: {source}")]
    Provider {
        kind: NotificationKind,
        #[source]
        source: TransportError,
    },
}

/// Composes and delivers both notifications for an accepted submission.
///
/// The sends run one after the other with no compensation: if the acknowledgment fails the
/// business notification has already gone out.
pub struct Dispatcher {
    transport: Option<Arc<dyn EmailTransport>>,
    config: EmailConfig,
}

impl Dispatcher {
    /// `transport` is `None` when the provider credential is missing.
    pub fn new(transport: Option<Arc<dyn EmailTransport>>, config: EmailConfig) -> Self {
        Self { transport, config }
    }

    pub fn is_configured(&self) -> bool {
        self.transport.is_some()
    }

    pub fn uses_template(&self) -> bool {
        self.config.template_id.is_some()
    }

    pub async fn dispatch(&self, submission: &SanitizedSubmission) -> Result<(), DispatchError> {
        let transport = self.transport.as_deref().ok_or(DispatchError::MissingCredential)?;

        let business = message::business_notification(&self.config, submission);
        send(transport, NotificationKind::Business, &business).await?;

        let ack = message::acknowledgment(&self.config, submission);
        send(transport, NotificationKind::Acknowledgment, &ack).await?;

        Ok(())
    }
}

async fn send(
    transport: &dyn EmailTransport,
    kind: NotificationKind,
    message: &OutboundEmail,
) -> Result<(), DispatchError> {
    match transport.send(message).await {
        Ok(()) => {
            metrics::record_email(kind.as_str(), true);
            tracing::debug!(kind = %kind, "Notification sent");
            Ok(())
        }
        Err(source) => {
            metrics::record_email(kind.as_str(), false);
            tracing::error!(kind = %kind, error = %source, "Notification send failed");
            Err(DispatchError::Provider { kind, source })
        }
    }
}
