//! Outbound event types published on the relay's out topic.
//!
//! An [`OutboundEvent`] is the relay's externally visible artifact: one is
//! constructed per successfully relayed notification, handed to the
//! publisher, and discarded. Event kinds use the consumer vocabulary
//! (`NEW_ELEMENT_CREATED`, `ELEMENT_UPDATED`, ...) rather than the cohort's
//! internal change kinds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::model::{ChangeKind, EntityState, PropertyMap};

/// Outbound event kind, in consumer vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutboundEventKind {
    NewElementCreated,
    ElementUpdated,
    ElementClassified,
    ElementDeclassified,
    ElementReclassified,
    ElementDeleted,
    ElementPurged,
    ElementRestored,
    ElementIdentifierChanged,
    ElementTypeChanged,
    ElementHomeChanged,
    ElementRefreshed,
}

impl OutboundEventKind {
    /// Wire-form name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutboundEventKind::NewElementCreated => "NEW_ELEMENT_CREATED",
            OutboundEventKind::ElementUpdated => "ELEMENT_UPDATED",
            OutboundEventKind::ElementClassified => "ELEMENT_CLASSIFIED",
            OutboundEventKind::ElementDeclassified => "ELEMENT_DECLASSIFIED",
            OutboundEventKind::ElementReclassified => "ELEMENT_RECLASSIFIED",
            OutboundEventKind::ElementDeleted => "ELEMENT_DELETED",
            OutboundEventKind::ElementPurged => "ELEMENT_PURGED",
            OutboundEventKind::ElementRestored => "ELEMENT_RESTORED",
            OutboundEventKind::ElementIdentifierChanged => "ELEMENT_IDENTIFIER_CHANGED",
            OutboundEventKind::ElementTypeChanged => "ELEMENT_TYPE_CHANGED",
            OutboundEventKind::ElementHomeChanged => "ELEMENT_HOME_CHANGED",
            OutboundEventKind::ElementRefreshed => "ELEMENT_REFRESHED",
        }
    }
}

impl From<ChangeKind> for OutboundEventKind {
    fn from(kind: ChangeKind) -> Self {
        match kind {
            ChangeKind::Created => OutboundEventKind::NewElementCreated,
            ChangeKind::Updated => OutboundEventKind::ElementUpdated,
            ChangeKind::Classified => OutboundEventKind::ElementClassified,
            ChangeKind::Declassified => OutboundEventKind::ElementDeclassified,
            ChangeKind::Reclassified => OutboundEventKind::ElementReclassified,
            ChangeKind::Deleted => OutboundEventKind::ElementDeleted,
            ChangeKind::Purged => OutboundEventKind::ElementPurged,
            ChangeKind::Restored => OutboundEventKind::ElementRestored,
            ChangeKind::IdentifierChanged => OutboundEventKind::ElementIdentifierChanged,
            ChangeKind::TypeChanged => OutboundEventKind::ElementTypeChanged,
            ChangeKind::HomeChanged => OutboundEventKind::ElementHomeChanged,
            ChangeKind::Refreshed => OutboundEventKind::ElementRefreshed,
        }
    }
}

/// Identifier and type of the entity an event is about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementHeader {
    /// Entity identifier.
    pub id: String,
    /// Declared type name.
    pub type_name: String,
}

impl ElementHeader {
    pub fn new(id: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            type_name: type_name.into(),
        }
    }
}

impl From<&EntityState> for ElementHeader {
    fn from(entity: &EntityState) -> Self {
        Self {
            id: entity.id.clone(),
            type_name: entity.type_name.clone(),
        }
    }
}

/// One relayed event. Constructed fresh per relay invocation, published,
/// then discarded; the relay never retains it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundEvent {
    /// Unique event identifier, assigned by the relay.
    pub event_id: Uuid,
    /// Event kind in consumer vocabulary.
    pub event_kind: OutboundEventKind,
    /// Last-update time of the subject if present, else its creation time.
    pub event_time: DateTime<Utc>,
    /// Identifier and type of the current entity.
    pub subject: ElementHeader,
    /// Flattened properties of the current entity.
    pub subject_properties: PropertyMap,
    /// Header of the pre-change entity (updates, reclassifications).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<ElementHeader>,
    /// Properties of the pre-change entity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_properties: Option<PropertyMap>,
    /// Name of the classification that was added, removed, or changed.
    /// When a reclassification carries both an added and a removed
    /// classification, the added one's name is carried here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification_name: Option<String>,
    /// Properties of the removed classification, retained so consumers can
    /// still see what was detached even when `classification_name` names the
    /// added one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed_classification_properties: Option<PropertyMap>,
    /// Identifier before an identifier change.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prior_identifier: Option<String>,
    /// Home collection id before a home change.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prior_home_id: Option<String>,
    /// Type name before a type change.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prior_type_name: Option<String>,
}

impl OutboundEvent {
    /// JSON wire form of the event.
    pub fn to_wire(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Classification;
    use serde_json::json;

    #[test]
    fn test_kind_mapping_exhaustive() {
        let pairs = [
            (ChangeKind::Created, OutboundEventKind::NewElementCreated),
            (ChangeKind::Updated, OutboundEventKind::ElementUpdated),
            (ChangeKind::Classified, OutboundEventKind::ElementClassified),
            (
                ChangeKind::Declassified,
                OutboundEventKind::ElementDeclassified,
            ),
            (
                ChangeKind::Reclassified,
                OutboundEventKind::ElementReclassified,
            ),
            (ChangeKind::Deleted, OutboundEventKind::ElementDeleted),
            (ChangeKind::Purged, OutboundEventKind::ElementPurged),
            (ChangeKind::Restored, OutboundEventKind::ElementRestored),
            (
                ChangeKind::IdentifierChanged,
                OutboundEventKind::ElementIdentifierChanged,
            ),
            (
                ChangeKind::TypeChanged,
                OutboundEventKind::ElementTypeChanged,
            ),
            (
                ChangeKind::HomeChanged,
                OutboundEventKind::ElementHomeChanged,
            ),
            (ChangeKind::Refreshed, OutboundEventKind::ElementRefreshed),
        ];
        for (change, outbound) in pairs {
            assert_eq!(OutboundEventKind::from(change), outbound);
        }
    }

    #[test]
    fn test_kind_wire_names() {
        assert_eq!(
            OutboundEventKind::NewElementCreated.as_str(),
            "NEW_ELEMENT_CREATED"
        );
        assert_eq!(
            OutboundEventKind::ElementReclassified.as_str(),
            "ELEMENT_RECLASSIFIED"
        );
        assert_eq!(
            serde_json::to_string(&OutboundEventKind::ElementHomeChanged).unwrap(),
            r#""ELEMENT_HOME_CHANGED""#
        );
    }

    #[test]
    fn test_header_from_entity() {
        let entity = EntityState::new("e1", "Asset");
        let header = ElementHeader::from(&entity);
        assert_eq!(header.id, "e1");
        assert_eq!(header.type_name, "Asset");
    }

    #[test]
    fn test_event_wire_form_skips_absent_fields() {
        let entity = EntityState::new("e1", "Asset").with_property("name", json!("a"));
        let event = OutboundEvent {
            event_id: Uuid::nil(),
            event_kind: OutboundEventKind::NewElementCreated,
            event_time: entity.created_at,
            subject: ElementHeader::from(&entity),
            subject_properties: entity.properties.clone(),
            previous: None,
            previous_properties: None,
            classification_name: None,
            removed_classification_properties: None,
            prior_identifier: None,
            prior_home_id: None,
            prior_type_name: None,
        };

        let wire = event.to_wire().unwrap();
        assert!(wire.contains(r#""event_kind":"NEW_ELEMENT_CREATED"#));
        assert!(wire.contains(r#""id":"e1"#));
        assert!(!wire.contains("previous"));
        assert!(!wire.contains("classification_name"));
        assert!(!wire.contains("prior_identifier"));
    }

    #[test]
    fn test_event_wire_round_trip() {
        let removed = Classification::new("Retired").with_property("reason", json!("stale"));
        let event = OutboundEvent {
            event_id: Uuid::new_v4(),
            event_kind: OutboundEventKind::ElementReclassified,
            event_time: Utc::now(),
            subject: ElementHeader::new("e1", "Asset"),
            subject_properties: PropertyMap::new(),
            previous: None,
            previous_properties: None,
            classification_name: Some("Confidential".to_string()),
            removed_classification_properties: Some(removed.properties),
            prior_identifier: None,
            prior_home_id: None,
            prior_type_name: None,
        };

        let wire = event.to_wire().unwrap();
        let parsed: OutboundEvent = serde_json::from_str(&wire).unwrap();
        assert_eq!(parsed, event);
        assert_eq!(
            parsed.removed_classification_properties.unwrap()["reason"],
            json!("stale")
        );
    }
}
