//! Publisher: hands outbound events to the channel and absorbs failures.
//!
//! A single bad or unavailable consumer channel must not halt processing of
//! subsequent, unrelated notifications, so `publish` never propagates an
//! error. Failures are recorded to the diagnostic sink with the event's
//! string form and returned as an outcome for the dispatcher's accounting.

use std::sync::Arc;

use tracing::{debug, error};

use lattice_core::{DiagnosticRecord, DiagnosticSink, OutboundChannel, OutboundEvent};

/// Result of one publish attempt. Failed deliveries are terminal; retry, if
/// desired, belongs to the channel transport itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Delivered,
    Failed,
}

/// Delivers events to the outbound channel, recording failures.
pub struct Publisher {
    channel: Arc<dyn OutboundChannel>,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl Publisher {
    pub fn new(channel: Arc<dyn OutboundChannel>, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            channel,
            diagnostics,
        }
    }

    /// Attempt delivery. Never returns an error to the caller.
    pub async fn publish(&self, event: &OutboundEvent) -> PublishOutcome {
        match self.channel.send(event).await {
            Ok(()) => {
                debug!(
                    event_kind = event.event_kind.as_str(),
                    entity_id = %event.subject.id,
                    "Published outbound event"
                );
                PublishOutcome::Delivered
            }
            Err(e) => {
                error!(
                    event_kind = event.event_kind.as_str(),
                    entity_id = %event.subject.id,
                    error = %e,
                    "Outbound channel rejected event"
                );
                let event_form = event
                    .to_wire()
                    .unwrap_or_else(|_| format!("{event:?}"));
                self.diagnostics
                    .record(DiagnosticRecord::new(
                        "publisher/send",
                        Some(event_form),
                        &e,
                    ))
                    .await;
                PublishOutcome::Failed
            }
        }
    }
}
