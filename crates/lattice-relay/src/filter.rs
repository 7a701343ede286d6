//! Interest filter: the first admission gate of the relay pipeline.
//!
//! A pure check with no side effects. It runs before any lookup so that
//! notifications nobody subscribed to never cost a network call.

use lattice_core::{EntitySubject, InterestPolicy};

/// Returns true iff `type_name` or any entry in `supertypes` appears in the
/// policy's interest set.
///
/// A notification whose type metadata is absent is treated as not of
/// interest rather than as an error.
pub fn is_of_interest(
    type_name: Option<&str>,
    supertypes: &[String],
    policy: &InterestPolicy,
) -> bool {
    if let Some(name) = type_name {
        if policy.is_interesting(name) {
            return true;
        }
    }
    supertypes.iter().any(|name| policy.is_interesting(name))
}

/// Interest check for a notification subject, full entity or reference
/// alike.
pub fn subject_of_interest(subject: &EntitySubject, policy: &InterestPolicy) -> bool {
    is_of_interest(Some(subject.type_name()), subject.supertypes(), policy)
}
