//! Event transformer: maps a resolved notification into an outbound event.
//!
//! Pure construction, no I/O and no failure path. Malformed notifications
//! are rejected by the dispatcher before this stage runs.

use uuid::Uuid;

use lattice_core::{
    ChangeKind, Classification, ElementHeader, EntityState, OutboundEvent, OutboundEventKind,
};

/// Build the outbound event for one relayed notification.
///
/// Field selection rules:
/// - `event_time` is the subject's last-update time when present, else its
///   creation time. Updates always carry the update time; creations, which
///   have no update time yet, carry the creation time.
/// - `previous` header/properties populate only when a pre-change snapshot
///   was supplied (updates, reclassifications).
/// - `classification_name` comes from the added classification when one is
///   present, else from the removed one. A reclassification carrying both
///   names the added classification, and the removed classification's
///   properties are still attached so the "what was removed" detail is not
///   lost.
pub fn transform(
    kind: ChangeKind,
    current: EntityState,
    previous: Option<EntityState>,
    added_classification: Option<Classification>,
    removed_classification: Option<Classification>,
) -> OutboundEvent {
    let event_time = current.updated_at.unwrap_or(current.created_at);

    let classification_name = match (&added_classification, &removed_classification) {
        (Some(added), _) => Some(added.name.clone()),
        (None, Some(removed)) => Some(removed.name.clone()),
        (None, None) => None,
    };

    OutboundEvent {
        event_id: Uuid::new_v4(),
        event_kind: OutboundEventKind::from(kind),
        event_time,
        subject: ElementHeader::from(&current),
        subject_properties: current.properties,
        previous: previous.as_ref().map(ElementHeader::from),
        previous_properties: previous.map(|p| p.properties),
        classification_name,
        removed_classification_properties: removed_classification.map(|c| c.properties),
        prior_identifier: None,
        prior_home_id: None,
        prior_type_name: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn entity_created_at(id: &str, secs: i64) -> EntityState {
        EntityState::new(id, "Asset").with_created_at(Utc.timestamp_opt(secs, 0).unwrap())
    }

    #[test]
    fn test_creation_uses_creation_time() {
        let t0 = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let entity = entity_created_at("e1", 1_700_000_000);

        let event = transform(ChangeKind::Created, entity, None, None, None);
        assert_eq!(event.event_kind, OutboundEventKind::NewElementCreated);
        assert_eq!(event.event_time, t0);
    }

    #[test]
    fn test_update_uses_update_time_regardless_of_creation_time() {
        let u = Utc.timestamp_opt(1_700_000_500, 0).unwrap();
        let entity = entity_created_at("e1", 1_700_000_000).with_updated_at(u);

        let event = transform(ChangeKind::Updated, entity, None, None, None);
        assert_eq!(event.event_time, u);
    }

    #[test]
    fn test_subject_header_and_properties_from_current() {
        let entity = EntityState::new("e1", "Asset").with_property("name", json!("orders"));

        let event = transform(ChangeKind::Refreshed, entity, None, None, None);
        assert_eq!(event.subject.id, "e1");
        assert_eq!(event.subject.type_name, "Asset");
        assert_eq!(event.subject_properties["name"], json!("orders"));
    }

    #[test]
    fn test_previous_populates_only_when_supplied() {
        let current = EntityState::new("e1", "Asset");
        let event = transform(ChangeKind::Updated, current.clone(), None, None, None);
        assert!(event.previous.is_none());
        assert!(event.previous_properties.is_none());

        let previous = EntityState::new("e1", "Asset").with_property("name", json!("old"));
        let event = transform(ChangeKind::Updated, current, Some(previous), None, None);
        assert_eq!(event.previous.unwrap().id, "e1");
        assert_eq!(event.previous_properties.unwrap()["name"], json!("old"));
    }

    #[test]
    fn test_added_classification_names_event() {
        let entity = EntityState::new("e1", "Asset");
        let event = transform(
            ChangeKind::Classified,
            entity,
            None,
            Some(Classification::new("Confidential")),
            None,
        );
        assert_eq!(event.classification_name.as_deref(), Some("Confidential"));
        assert!(event.removed_classification_properties.is_none());
    }

    #[test]
    fn test_removed_classification_names_event_when_alone() {
        let entity = EntityState::new("e1", "Asset");
        let removed = Classification::new("Retired").with_property("reason", json!("stale"));
        let event = transform(ChangeKind::Declassified, entity, None, None, Some(removed));
        assert_eq!(event.classification_name.as_deref(), Some("Retired"));
        assert_eq!(
            event.removed_classification_properties.unwrap()["reason"],
            json!("stale")
        );
    }

    #[test]
    fn test_reclassify_added_name_wins_but_removed_properties_survive() {
        let entity = EntityState::new("e1", "Asset");
        let added = Classification::new("Confidential").with_property("level", json!(3));
        let removed = Classification::new("Public").with_property("since", json!("2021"));

        let event = transform(
            ChangeKind::Reclassified,
            entity,
            None,
            Some(added),
            Some(removed),
        );
        assert_eq!(event.event_kind, OutboundEventKind::ElementReclassified);
        assert_eq!(event.classification_name.as_deref(), Some("Confidential"));
        // The removed classification's properties remain retrievable.
        assert_eq!(
            event.removed_classification_properties.unwrap()["since"],
            json!("2021")
        );
    }

    #[test]
    fn test_reclassify_with_unknown_delta_still_builds_event() {
        let entity = EntityState::new("e1", "Asset");
        let event = transform(ChangeKind::Reclassified, entity, None, None, None);
        assert_eq!(event.event_kind, OutboundEventKind::ElementReclassified);
        assert!(event.classification_name.is_none());
        assert!(event.removed_classification_properties.is_none());
    }

    #[test]
    fn test_prior_fields_left_for_dispatcher() {
        let entity = EntityState::new("e1", "Asset");
        let event = transform(ChangeKind::IdentifierChanged, entity, None, None, None);
        assert!(event.prior_identifier.is_none());
        assert!(event.prior_home_id.is_none());
        assert!(event.prior_type_name.is_none());
    }

    #[test]
    fn test_each_event_gets_fresh_id() {
        let e1 = transform(
            ChangeKind::Created,
            EntityState::new("e1", "Asset"),
            None,
            None,
            None,
        );
        let e2 = transform(
            ChangeKind::Created,
            EntityState::new("e1", "Asset"),
            None,
            None,
            None,
        );
        assert_ne!(e1.event_id, e2.event_id);
    }
}
