//! Visibility resolver: turns a notification subject into authoritative,
//! visible entity state, or drops it.
//!
//! Resolution is deliberately lossy about failure causes. Not-found,
//! not-authorized, and transient lookup errors all collapse into
//! [`Resolution::NotVisible`]: the relay has no use for partial results,
//! and mis-sharing metadata after a transient failure is worse than
//! silently dropping the event. The default-deny policy therefore lives in
//! the type signature instead of in suppressed exceptions.

use std::sync::Arc;

use tracing::debug;

use lattice_core::{EntityLookup, EntityState, EntitySubject, InterestPolicy};

use crate::filter;

/// Outcome of resolving a notification subject.
#[derive(Debug)]
pub enum Resolution {
    /// The subject is of interest and visible to the configured caller.
    Visible(EntityState),
    /// The subject's type is outside the interest set; no lookup was made.
    NotInterested,
    /// The lookup failed or denied access. Causes are not distinguished.
    NotVisible,
}

/// Resolves notification subjects against the entity lookup service.
pub struct VisibilityResolver {
    lookup: Arc<dyn EntityLookup>,
    policy: Arc<InterestPolicy>,
}

impl VisibilityResolver {
    pub fn new(lookup: Arc<dyn EntityLookup>, policy: Arc<InterestPolicy>) -> Self {
        Self { lookup, policy }
    }

    /// Resolve a subject to visible entity state.
    ///
    /// The interest check always runs first: subjects outside the interest
    /// set short-circuit to [`Resolution::NotInterested`] without touching
    /// the lookup service.
    pub async fn resolve(&self, subject: EntitySubject) -> Resolution {
        if !filter::subject_of_interest(&subject, &self.policy) {
            debug!(
                entity_id = subject.id(),
                type_name = subject.type_name(),
                "Subject outside interest set, skipping lookup"
            );
            return Resolution::NotInterested;
        }

        let caller = self.policy.caller_identity();
        match subject {
            EntitySubject::Full(entity) => {
                match self
                    .lookup
                    .validate_visibility(caller, &entity.id, &entity.type_name)
                    .await
                {
                    Ok(()) => Resolution::Visible(entity),
                    Err(e) => {
                        debug!(
                            entity_id = %entity.id,
                            caller,
                            error = %e,
                            "Visibility check failed, dropping notification"
                        );
                        Resolution::NotVisible
                    }
                }
            }
            EntitySubject::Reference(reference) => {
                match self
                    .lookup
                    .fetch_entity(caller, &reference.id, &reference.type_name)
                    .await
                {
                    Ok(entity) => Resolution::Visible(entity),
                    Err(e) => {
                        debug!(
                            entity_id = %reference.id,
                            caller,
                            error = %e,
                            "Reference fetch failed, dropping notification"
                        );
                        Resolution::NotVisible
                    }
                }
            }
        }
    }
}
