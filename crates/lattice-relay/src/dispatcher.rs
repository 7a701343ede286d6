//! Relay dispatcher: the per-notification entry point.
//!
//! Every notification kind funnels through the same four-stage pipeline
//! (filter, resolve, transform, publish) with per-kind variation limited to
//! which optional fields are read and which outbound kind is stamped. A
//! notification's processing never raises to the caller and never touches
//! state shared with another notification beyond the immutable policy and
//! the injected collaborators, so `dispatch` is safe to invoke concurrently.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use lattice_core::{
    ChangeNotification, DiagnosticSink, EntityLookup, InterestPolicy, OutboundChannel,
};

use crate::publisher::{PublishOutcome, Publisher};
use crate::resolver::{Resolution, VisibilityResolver};
use crate::transform;

/// Terminal pipeline state of one notification.
///
/// `FilteredOut` and `NotVisible` are both silent drops; the distinction is
/// kept for the embedder's accounting only and is never exposed to
/// consumers. None of the terminal states are retried by the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    /// The notification is missing fields its kind requires.
    Rejected,
    /// The subject's type is outside the interest set.
    FilteredOut,
    /// The lookup failed or denied access.
    NotVisible,
    /// The outbound event was delivered.
    Published,
    /// The outbound channel rejected the event; a diagnostic was recorded.
    PublishFailed,
}

impl RelayOutcome {
    /// Stable lowercase name, used in structured log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            RelayOutcome::Rejected => "rejected",
            RelayOutcome::FilteredOut => "filtered_out",
            RelayOutcome::NotVisible => "not_visible",
            RelayOutcome::Published => "published",
            RelayOutcome::PublishFailed => "publish_failed",
        }
    }
}

/// Point-in-time snapshot of the dispatcher's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RelayStats {
    pub received: u64,
    pub rejected: u64,
    pub filtered_out: u64,
    pub not_visible: u64,
    pub published: u64,
    pub publish_failed: u64,
}

#[derive(Debug, Default)]
struct Counters {
    received: AtomicU64,
    rejected: AtomicU64,
    filtered_out: AtomicU64,
    not_visible: AtomicU64,
    published: AtomicU64,
    publish_failed: AtomicU64,
}

/// Orchestrates filter → resolve → transform → publish for each incoming
/// notification.
pub struct RelayDispatcher {
    resolver: VisibilityResolver,
    publisher: Publisher,
    counters: Counters,
}

impl RelayDispatcher {
    /// Create a dispatcher with injected collaborators. The policy is fixed
    /// for the dispatcher's lifetime.
    pub fn new(
        policy: InterestPolicy,
        lookup: Arc<dyn EntityLookup>,
        channel: Arc<dyn OutboundChannel>,
        diagnostics: Arc<dyn DiagnosticSink>,
    ) -> Self {
        let policy = Arc::new(policy);
        Self {
            resolver: VisibilityResolver::new(lookup, policy),
            publisher: Publisher::new(channel, diagnostics),
            counters: Counters::default(),
        }
    }

    /// Process one notification to a terminal state. Never returns an
    /// error; the worst outcome is an event failing to relay, observable
    /// via diagnostics and the returned outcome.
    pub async fn dispatch(&self, notification: ChangeNotification) -> RelayOutcome {
        self.counters.received.fetch_add(1, Ordering::Relaxed);

        if let Err(e) = notification.validate() {
            warn!(
                change_kind = notification.kind.as_str(),
                entity_id = notification.subject.id(),
                source_name = %notification.source_name,
                error = %e,
                "Dropping malformed notification"
            );
            self.counters.rejected.fetch_add(1, Ordering::Relaxed);
            return RelayOutcome::Rejected;
        }

        let ChangeNotification {
            source_name,
            kind,
            subject,
            previous,
            added_classification,
            removed_classification,
            prior_identifier,
            prior_home_id,
            prior_type,
            ..
        } = notification;

        let current = match self.resolver.resolve(subject).await {
            Resolution::Visible(entity) => entity,
            Resolution::NotInterested => {
                self.counters.filtered_out.fetch_add(1, Ordering::Relaxed);
                return RelayOutcome::FilteredOut;
            }
            Resolution::NotVisible => {
                self.counters.not_visible.fetch_add(1, Ordering::Relaxed);
                return RelayOutcome::NotVisible;
            }
        };

        let mut event = transform::transform(
            kind,
            current,
            previous,
            added_classification,
            removed_classification,
        );
        event.prior_identifier = prior_identifier;
        event.prior_home_id = prior_home_id;
        event.prior_type_name = prior_type.map(|t| t.name);

        match self.publisher.publish(&event).await {
            PublishOutcome::Delivered => {
                info!(
                    change_kind = kind.as_str(),
                    event_kind = event.event_kind.as_str(),
                    entity_id = %event.subject.id,
                    source_name = %source_name,
                    "Relayed change event"
                );
                self.counters.published.fetch_add(1, Ordering::Relaxed);
                RelayOutcome::Published
            }
            PublishOutcome::Failed => {
                debug!(
                    change_kind = kind.as_str(),
                    entity_id = %event.subject.id,
                    "Publish failed, continuing with next notification"
                );
                self.counters.publish_failed.fetch_add(1, Ordering::Relaxed);
                RelayOutcome::PublishFailed
            }
        }
    }

    /// Snapshot the pipeline counters.
    pub fn stats(&self) -> RelayStats {
        RelayStats {
            received: self.counters.received.load(Ordering::Relaxed),
            rejected: self.counters.rejected.load(Ordering::Relaxed),
            filtered_out: self.counters.filtered_out.load(Ordering::Relaxed),
            not_visible: self.counters.not_visible.load(Ordering::Relaxed),
            published: self.counters.published.load(Ordering::Relaxed),
            publish_failed: self.counters.publish_failed.load(Ordering::Relaxed),
        }
    }
}
