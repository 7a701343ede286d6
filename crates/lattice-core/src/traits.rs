//! Collaborator traits for the lattice relay.
//!
//! These traits define the interfaces the relay consumes but does not
//! implement: the cohort-facing entity lookup service, the outbound
//! delivery channel, and the diagnostic sink. All are constructor-injected
//! (`Arc<dyn ...>`), never ambient, so test doubles drop in trivially.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::event::OutboundEvent;
use crate::model::EntityState;

/// Authoritative entity access with organizational visibility enforcement.
///
/// Implementations enforce zone/visibility rules internally; the relay only
/// consumes the verdict. Any error (not found, not authorized, transient
/// failure) causes the relay to drop the notification rather than publish
/// partial or mis-shared state.
#[async_trait]
pub trait EntityLookup: Send + Sync {
    /// Check that `caller` may see the entity whose full state already
    /// arrived with a notification.
    ///
    /// # Errors
    /// - [`Error::NotFound`] if the entity is unknown to the cohort
    /// - [`Error::Unauthorized`] if the caller may not see it
    /// - [`Error::Lookup`] for transient service failures
    async fn validate_visibility(
        &self,
        caller: &str,
        entity_id: &str,
        type_name: &str,
    ) -> Result<()>;

    /// Fetch the authoritative current state of an entity that arrived as a
    /// lightweight reference. Fails with the same taxonomy as
    /// [`validate_visibility`](EntityLookup::validate_visibility).
    async fn fetch_entity(
        &self,
        caller: &str,
        entity_id: &str,
        type_name: &str,
    ) -> Result<EntityState>;
}

/// At-least-once delivery transport for relayed events (the "out topic").
#[async_trait]
pub trait OutboundChannel: Send + Sync {
    /// Deliver one event to the channel.
    ///
    /// # Errors
    /// Returns [`Error::Publish`] when delivery fails; the publisher records
    /// the failure and never propagates it further.
    async fn send(&self, event: &OutboundEvent) -> Result<()>;
}

/// One recorded operational failure.
#[derive(Debug, Clone)]
pub struct DiagnosticRecord {
    /// When the failure was recorded.
    pub occurred_at: DateTime<Utc>,
    /// Component and operation that failed (e.g., `"publisher/send"`).
    pub context: String,
    /// String form of the event involved, when one exists.
    pub event_form: Option<String>,
    /// Display form of the failure.
    pub error: String,
}

impl DiagnosticRecord {
    /// Record a failure that occurred now.
    pub fn new(context: impl Into<String>, event_form: Option<String>, error: &Error) -> Self {
        Self {
            occurred_at: Utc::now(),
            context: context.into(),
            event_form,
            error: error.to_string(),
        }
    }
}

/// Sink for operational failure records.
#[async_trait]
pub trait DiagnosticSink: Send + Sync {
    /// Record one failure. Must not fail; sinks that can themselves fail
    /// should degrade to logging.
    async fn record(&self, record: DiagnosticRecord);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct ZoneLookup;

    #[async_trait]
    impl EntityLookup for ZoneLookup {
        async fn validate_visibility(
            &self,
            caller: &str,
            entity_id: &str,
            _: &str,
        ) -> Result<()> {
            if caller == "relay" {
                Ok(())
            } else {
                Err(Error::Unauthorized(entity_id.to_string()))
            }
        }

        async fn fetch_entity(
            &self,
            _: &str,
            entity_id: &str,
            type_name: &str,
        ) -> Result<EntityState> {
            Ok(EntityState::new(entity_id, type_name))
        }
    }

    struct LastRecordSink {
        last: std::sync::Mutex<Option<DiagnosticRecord>>,
    }

    #[async_trait]
    impl DiagnosticSink for LastRecordSink {
        async fn record(&self, record: DiagnosticRecord) {
            *self.last.lock().unwrap() = Some(record);
        }
    }

    #[tokio::test]
    async fn test_lookup_callable_through_trait_object() {
        let lookup: Arc<dyn EntityLookup> = Arc::new(ZoneLookup);

        assert!(lookup.validate_visibility("relay", "e1", "Asset").await.is_ok());
        assert!(matches!(
            lookup.validate_visibility("stranger", "e1", "Asset").await,
            Err(Error::Unauthorized(_))
        ));

        let entity = lookup.fetch_entity("relay", "e2", "Asset").await.unwrap();
        assert_eq!(entity.id, "e2");
        assert_eq!(entity.type_name, "Asset");
    }

    #[tokio::test]
    async fn test_sink_callable_through_trait_object() {
        let sink = Arc::new(LastRecordSink {
            last: std::sync::Mutex::new(None),
        });
        let dyn_sink: Arc<dyn DiagnosticSink> = sink.clone();

        dyn_sink
            .record(DiagnosticRecord::new(
                "publisher/send",
                None,
                &Error::Publish("topic unavailable".to_string()),
            ))
            .await;

        let record = sink.last.lock().unwrap().take().unwrap();
        assert_eq!(record.context, "publisher/send");
    }

    #[test]
    fn test_diagnostic_record_captures_error_display() {
        let err = Error::Publish("topic unavailable".to_string());
        let record = DiagnosticRecord::new("publisher/send", Some("{...}".to_string()), &err);

        assert_eq!(record.context, "publisher/send");
        assert_eq!(record.event_form.as_deref(), Some("{...}"));
        assert_eq!(record.error, "Publish error: topic unavailable");
    }

    #[test]
    fn test_trait_objects_are_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}

        assert_send_sync::<dyn EntityLookup>();
        assert_send_sync::<dyn OutboundChannel>();
        assert_send_sync::<dyn DiagnosticSink>();
    }
}
