//! Data model for cohort change notifications.
//!
//! A [`ChangeNotification`] is one unit of work for the relay: a lifecycle
//! event observed somewhere in the cohort, carrying either the full entity
//! state or a lightweight reference that must be resolved before the event
//! can be republished. Entity snapshots are immutable once constructed and
//! owned exclusively by the notification that carries them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{Error, Result};

/// Property map attached to entities and classifications.
///
/// `BTreeMap` keeps property ordering deterministic across serialization,
/// which downstream consumers rely on for diffing.
pub type PropertyMap = BTreeMap<String, JsonValue>;

// =============================================================================
// ENTITY SNAPSHOTS
// =============================================================================

/// A named, typed tag attached to an entity independently of its core
/// properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Classification type name (e.g., `"Confidentiality"`).
    pub name: String,
    /// Classification-specific properties.
    #[serde(default)]
    pub properties: PropertyMap,
}

impl Classification {
    /// Create a classification with no properties.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: PropertyMap::new(),
        }
    }

    /// Attach a property.
    pub fn with_property(mut self, key: impl Into<String>, value: JsonValue) -> Self {
        self.properties.insert(key.into(), value);
        self
    }
}

/// Immutable snapshot of an entity's state at the time a notification was
/// produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityState {
    /// Cohort-wide unique identifier.
    pub id: String,
    /// Declared type name.
    pub type_name: String,
    /// Supertype chain, immediate supertype first, root-most last.
    #[serde(default)]
    pub supertypes: Vec<String>,
    /// When the entity was first created.
    pub created_at: DateTime<Utc>,
    /// When the entity was last updated. Absent for entities that have never
    /// been updated since creation.
    pub updated_at: Option<DateTime<Utc>>,
    /// Entity properties, flattened to name → value.
    #[serde(default)]
    pub properties: PropertyMap,
    /// Classifications currently attached to the entity.
    #[serde(default)]
    pub classifications: Vec<Classification>,
}

impl EntityState {
    /// Create a minimal snapshot created "now" with no supertypes,
    /// properties, or classifications.
    pub fn new(id: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            type_name: type_name.into(),
            supertypes: Vec::new(),
            created_at: Utc::now(),
            updated_at: None,
            properties: PropertyMap::new(),
            classifications: Vec::new(),
        }
    }

    /// Set the supertype chain (immediate supertype first).
    pub fn with_supertypes(mut self, supertypes: Vec<String>) -> Self {
        self.supertypes = supertypes;
        self
    }

    /// Set the creation timestamp.
    pub fn with_created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }

    /// Set the last-update timestamp.
    pub fn with_updated_at(mut self, at: DateTime<Utc>) -> Self {
        self.updated_at = Some(at);
        self
    }

    /// Attach a property.
    pub fn with_property(mut self, key: impl Into<String>, value: JsonValue) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    /// Attach a classification.
    pub fn with_classification(mut self, classification: Classification) -> Self {
        self.classifications.push(classification);
        self
    }
}

/// Lightweight entity reference delivered when the source withholds full
/// state. Carries just enough type metadata for the admission check; the
/// authoritative state must be fetched from the entity lookup service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityReference {
    /// Cohort-wide unique identifier.
    pub id: String,
    /// Declared type name.
    pub type_name: String,
    /// Supertype chain, immediate supertype first, root-most last.
    #[serde(default)]
    pub supertypes: Vec<String>,
}

impl EntityReference {
    /// Create a reference with no supertype chain.
    pub fn new(id: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            type_name: type_name.into(),
            supertypes: Vec::new(),
        }
    }

    /// Set the supertype chain (immediate supertype first).
    pub fn with_supertypes(mut self, supertypes: Vec<String>) -> Self {
        self.supertypes = supertypes;
        self
    }
}

/// The current-state payload of a notification: either the full entity or a
/// reference that requires a follow-up lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "form", rename_all = "snake_case")]
pub enum EntitySubject {
    /// Full entity state arrived with the notification.
    Full(EntityState),
    /// Only a lightweight reference arrived; state must be fetched.
    Reference(EntityReference),
}

impl EntitySubject {
    /// Identifier of the referenced entity.
    pub fn id(&self) -> &str {
        match self {
            EntitySubject::Full(e) => &e.id,
            EntitySubject::Reference(r) => &r.id,
        }
    }

    /// Declared type name.
    pub fn type_name(&self) -> &str {
        match self {
            EntitySubject::Full(e) => &e.type_name,
            EntitySubject::Reference(r) => &r.type_name,
        }
    }

    /// Supertype chain.
    pub fn supertypes(&self) -> &[String] {
        match self {
            EntitySubject::Full(e) => &e.supertypes,
            EntitySubject::Reference(r) => &r.supertypes,
        }
    }
}

/// Summary of an entity's former type, carried by type-change notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeSummary {
    /// Type identifier.
    pub id: String,
    /// Type name.
    pub name: String,
}

impl TypeSummary {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

// =============================================================================
// CHANGE NOTIFICATIONS
// =============================================================================

/// Lifecycle event kind observed in the cohort.
///
/// Every kind funnels through the same relay pipeline; the only per-kind
/// variation is which optional notification fields are populated and which
/// outbound kind gets stamped on the relayed event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// A new entity was created.
    Created,
    /// An existing entity's properties changed.
    Updated,
    /// A classification was attached.
    Classified,
    /// A classification was removed.
    Declassified,
    /// A classification's properties changed.
    Reclassified,
    /// The entity was soft-deleted.
    Deleted,
    /// The entity was permanently purged.
    Purged,
    /// A soft-deleted entity was restored.
    Restored,
    /// The entity was assigned a new identifier.
    IdentifierChanged,
    /// The entity's declared type changed.
    TypeChanged,
    /// The entity moved to a different home repository.
    HomeChanged,
    /// The home repository re-sent the entity's current state.
    Refreshed,
}

impl ChangeKind {
    /// Stable lowercase name, used in structured log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Created => "created",
            ChangeKind::Updated => "updated",
            ChangeKind::Classified => "classified",
            ChangeKind::Declassified => "declassified",
            ChangeKind::Reclassified => "reclassified",
            ChangeKind::Deleted => "deleted",
            ChangeKind::Purged => "purged",
            ChangeKind::Restored => "restored",
            ChangeKind::IdentifierChanged => "identifier_changed",
            ChangeKind::TypeChanged => "type_changed",
            ChangeKind::HomeChanged => "home_changed",
            ChangeKind::Refreshed => "refreshed",
        }
    }
}

/// One incoming unit of work for the relay.
///
/// Constructed through the per-kind constructors below, which populate
/// exactly the optional fields each kind carries. The `previous` entity is
/// present for updates and reclassifications when the source supplies it;
/// the `prior_*` fields are present only for the identity/type/home change
/// kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeNotification {
    /// Name of the cohort member that originated the notification.
    pub source_name: String,
    /// Metadata collection identifier of the originating repository.
    pub collection_id: String,
    /// Lifecycle event kind.
    pub kind: ChangeKind,
    /// Current entity state or reference.
    pub subject: EntitySubject,
    /// Entity state before the change (updates, reclassifications).
    pub previous: Option<EntityState>,
    /// Classification that was added (classify, reclassify).
    pub added_classification: Option<Classification>,
    /// Classification that was removed (declassify, reclassify).
    pub removed_classification: Option<Classification>,
    /// Identifier before an identifier change.
    pub prior_identifier: Option<String>,
    /// Home repository collection id before a home change.
    pub prior_home_id: Option<String>,
    /// Type summary before a type change.
    pub prior_type: Option<TypeSummary>,
}

impl ChangeNotification {
    fn base(
        source_name: impl Into<String>,
        collection_id: impl Into<String>,
        kind: ChangeKind,
        subject: EntitySubject,
    ) -> Self {
        Self {
            source_name: source_name.into(),
            collection_id: collection_id.into(),
            kind,
            subject,
            previous: None,
            added_classification: None,
            removed_classification: None,
            prior_identifier: None,
            prior_home_id: None,
            prior_type: None,
        }
    }

    /// A new entity was created.
    pub fn created(
        source_name: impl Into<String>,
        collection_id: impl Into<String>,
        subject: EntitySubject,
    ) -> Self {
        Self::base(source_name, collection_id, ChangeKind::Created, subject)
    }

    /// An entity's properties changed. `previous` is the pre-change snapshot
    /// when the source supplies one.
    pub fn updated(
        source_name: impl Into<String>,
        collection_id: impl Into<String>,
        subject: EntitySubject,
        previous: Option<EntityState>,
    ) -> Self {
        let mut n = Self::base(source_name, collection_id, ChangeKind::Updated, subject);
        n.previous = previous;
        n
    }

    /// A classification was attached to the entity.
    pub fn classified(
        source_name: impl Into<String>,
        collection_id: impl Into<String>,
        subject: EntitySubject,
        added: Classification,
    ) -> Self {
        let mut n = Self::base(source_name, collection_id, ChangeKind::Classified, subject);
        n.added_classification = Some(added);
        n
    }

    /// A classification was removed from the entity.
    pub fn declassified(
        source_name: impl Into<String>,
        collection_id: impl Into<String>,
        subject: EntitySubject,
        removed: Classification,
    ) -> Self {
        let mut n = Self::base(
            source_name,
            collection_id,
            ChangeKind::Declassified,
            subject,
        );
        n.removed_classification = Some(removed);
        n
    }

    /// A classification's properties changed. Some sources omit the
    /// before/after delta entirely; the relay still emits an event for an
    /// unknown delta.
    pub fn reclassified(
        source_name: impl Into<String>,
        collection_id: impl Into<String>,
        subject: EntitySubject,
        added: Option<Classification>,
        removed: Option<Classification>,
        previous: Option<EntityState>,
    ) -> Self {
        let mut n = Self::base(
            source_name,
            collection_id,
            ChangeKind::Reclassified,
            subject,
        );
        n.added_classification = added;
        n.removed_classification = removed;
        n.previous = previous;
        n
    }

    /// The entity was soft-deleted.
    pub fn deleted(
        source_name: impl Into<String>,
        collection_id: impl Into<String>,
        subject: EntitySubject,
    ) -> Self {
        Self::base(source_name, collection_id, ChangeKind::Deleted, subject)
    }

    /// The entity was permanently purged.
    pub fn purged(
        source_name: impl Into<String>,
        collection_id: impl Into<String>,
        subject: EntitySubject,
    ) -> Self {
        Self::base(source_name, collection_id, ChangeKind::Purged, subject)
    }

    /// A soft-deleted entity was restored.
    pub fn restored(
        source_name: impl Into<String>,
        collection_id: impl Into<String>,
        subject: EntitySubject,
    ) -> Self {
        Self::base(source_name, collection_id, ChangeKind::Restored, subject)
    }

    /// The entity was assigned a new identifier.
    pub fn identifier_changed(
        source_name: impl Into<String>,
        collection_id: impl Into<String>,
        subject: EntitySubject,
        prior_identifier: impl Into<String>,
    ) -> Self {
        let mut n = Self::base(
            source_name,
            collection_id,
            ChangeKind::IdentifierChanged,
            subject,
        );
        n.prior_identifier = Some(prior_identifier.into());
        n
    }

    /// The entity's declared type changed.
    pub fn type_changed(
        source_name: impl Into<String>,
        collection_id: impl Into<String>,
        subject: EntitySubject,
        prior_type: TypeSummary,
    ) -> Self {
        let mut n = Self::base(source_name, collection_id, ChangeKind::TypeChanged, subject);
        n.prior_type = Some(prior_type);
        n
    }

    /// The entity moved to a different home repository.
    pub fn home_changed(
        source_name: impl Into<String>,
        collection_id: impl Into<String>,
        subject: EntitySubject,
        prior_home_id: impl Into<String>,
    ) -> Self {
        let mut n = Self::base(source_name, collection_id, ChangeKind::HomeChanged, subject);
        n.prior_home_id = Some(prior_home_id.into());
        n
    }

    /// The home repository re-sent the entity's current state.
    pub fn refreshed(
        source_name: impl Into<String>,
        collection_id: impl Into<String>,
        subject: EntitySubject,
    ) -> Self {
        Self::base(source_name, collection_id, ChangeKind::Refreshed, subject)
    }

    /// Check that the fields this notification's kind requires are present.
    ///
    /// The constructors above uphold this by construction; the relay
    /// dispatcher re-checks notifications that arrive through other paths
    /// (e.g., deserialized from a wire form) and rejects invalid ones before
    /// transformation.
    pub fn validate(&self) -> Result<()> {
        match self.kind {
            ChangeKind::Classified if self.added_classification.is_none() => {
                Err(Error::InvalidNotification(
                    "classified notification missing added classification".into(),
                ))
            }
            ChangeKind::Declassified if self.removed_classification.is_none() => {
                Err(Error::InvalidNotification(
                    "declassified notification missing removed classification".into(),
                ))
            }
            ChangeKind::IdentifierChanged if self.prior_identifier.is_none() => {
                Err(Error::InvalidNotification(
                    "identifier-change notification missing prior identifier".into(),
                ))
            }
            ChangeKind::TypeChanged if self.prior_type.is_none() => {
                Err(Error::InvalidNotification(
                    "type-change notification missing prior type summary".into(),
                ))
            }
            ChangeKind::HomeChanged if self.prior_home_id.is_none() => {
                Err(Error::InvalidNotification(
                    "home-change notification missing prior home id".into(),
                ))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn subject() -> EntitySubject {
        EntitySubject::Full(EntityState::new("e1", "Asset"))
    }

    #[test]
    fn test_entity_state_builder() {
        let entity = EntityState::new("e1", "Asset")
            .with_supertypes(vec!["Referenceable".to_string()])
            .with_property("displayName", json!("my asset"))
            .with_classification(Classification::new("Confidential"));

        assert_eq!(entity.id, "e1");
        assert_eq!(entity.type_name, "Asset");
        assert_eq!(entity.supertypes, vec!["Referenceable"]);
        assert_eq!(entity.properties["displayName"], json!("my asset"));
        assert_eq!(entity.classifications.len(), 1);
        assert!(entity.updated_at.is_none());
    }

    #[test]
    fn test_subject_accessors_full() {
        let entity =
            EntityState::new("e1", "Asset").with_supertypes(vec!["Referenceable".to_string()]);
        let subject = EntitySubject::Full(entity);

        assert_eq!(subject.id(), "e1");
        assert_eq!(subject.type_name(), "Asset");
        assert_eq!(subject.supertypes(), ["Referenceable".to_string()]);
    }

    #[test]
    fn test_subject_accessors_reference() {
        let reference = EntityReference::new("e2", "GlossaryTerm")
            .with_supertypes(vec!["Referenceable".to_string()]);
        let subject = EntitySubject::Reference(reference);

        assert_eq!(subject.id(), "e2");
        assert_eq!(subject.type_name(), "GlossaryTerm");
        assert_eq!(subject.supertypes(), ["Referenceable".to_string()]);
    }

    #[test]
    fn test_created_populates_no_extras() {
        let n = ChangeNotification::created("cohortA", "coll-1", subject());
        assert_eq!(n.kind, ChangeKind::Created);
        assert!(n.previous.is_none());
        assert!(n.added_classification.is_none());
        assert!(n.removed_classification.is_none());
        assert!(n.prior_identifier.is_none());
        assert!(n.prior_home_id.is_none());
        assert!(n.prior_type.is_none());
        assert!(n.validate().is_ok());
    }

    #[test]
    fn test_updated_carries_previous() {
        let previous = EntityState::new("e1", "Asset");
        let n = ChangeNotification::updated("cohortA", "coll-1", subject(), Some(previous));
        assert_eq!(n.kind, ChangeKind::Updated);
        assert!(n.previous.is_some());
    }

    #[test]
    fn test_classified_carries_added() {
        let n = ChangeNotification::classified(
            "cohortA",
            "coll-1",
            subject(),
            Classification::new("Confidential"),
        );
        assert_eq!(n.kind, ChangeKind::Classified);
        assert_eq!(n.added_classification.unwrap().name, "Confidential");
        assert!(n.removed_classification.is_none());
    }

    #[test]
    fn test_reclassified_may_omit_delta() {
        // Some sources report a reclassification without the before/after
        // classifications; the notification is still well-formed.
        let n = ChangeNotification::reclassified("cohortA", "coll-1", subject(), None, None, None);
        assert_eq!(n.kind, ChangeKind::Reclassified);
        assert!(n.validate().is_ok());
    }

    #[test]
    fn test_identifier_changed_requires_prior() {
        let n = ChangeNotification::identifier_changed("cohortA", "coll-1", subject(), "old-id");
        assert_eq!(n.prior_identifier.as_deref(), Some("old-id"));
        assert!(n.validate().is_ok());

        let mut broken = n;
        broken.prior_identifier = None;
        assert!(matches!(
            broken.validate(),
            Err(Error::InvalidNotification(_))
        ));
    }

    #[test]
    fn test_type_changed_requires_prior_type() {
        let n = ChangeNotification::type_changed(
            "cohortA",
            "coll-1",
            subject(),
            TypeSummary::new("t1", "OldType"),
        );
        assert_eq!(n.prior_type.as_ref().unwrap().name, "OldType");

        let mut broken = n;
        broken.prior_type = None;
        assert!(broken.validate().is_err());
    }

    #[test]
    fn test_home_changed_requires_prior_home() {
        let n = ChangeNotification::home_changed("cohortA", "coll-1", subject(), "coll-0");
        assert_eq!(n.prior_home_id.as_deref(), Some("coll-0"));

        let mut broken = n;
        broken.prior_home_id = None;
        assert!(broken.validate().is_err());
    }

    #[test]
    fn test_classified_validation_rejects_missing_classification() {
        let mut n = ChangeNotification::classified(
            "cohortA",
            "coll-1",
            subject(),
            Classification::new("Confidential"),
        );
        n.added_classification = None;
        assert!(n.validate().is_err());
    }

    #[test]
    fn test_change_kind_as_str() {
        assert_eq!(ChangeKind::Created.as_str(), "created");
        assert_eq!(ChangeKind::IdentifierChanged.as_str(), "identifier_changed");
        assert_eq!(ChangeKind::Refreshed.as_str(), "refreshed");
    }

    #[test]
    fn test_notification_json_round_trip() {
        let n = ChangeNotification::declassified(
            "cohortA",
            "coll-1",
            EntitySubject::Reference(EntityReference::new("e3", "Asset")),
            Classification::new("Retired").with_property("reason", json!("obsolete")),
        );
        let json = serde_json::to_string(&n).unwrap();
        assert!(json.contains(r#""kind":"declassified"#));
        assert!(json.contains(r#""form":"reference"#));

        let parsed: ChangeNotification = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, n);
    }
}
