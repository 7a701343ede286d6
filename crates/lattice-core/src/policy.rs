//! Interest policy: which entity types the relay republishes, and the
//! caller identity it uses for visibility lookups.
//!
//! Built once at relay start-up and shared read-only across every
//! notification. Different consuming subsystems care about different root
//! types, so the interest set is deployment configuration rather than a
//! hard-coded constant.

use std::collections::HashSet;

use crate::defaults;

/// Static relay configuration.
#[derive(Debug, Clone)]
pub struct InterestPolicy {
    /// Type names considered of interest. An entity is admitted when its
    /// declared type, or any of its supertypes, appears here.
    interesting_types: HashSet<String>,
    /// Caller identity passed to every entity lookup.
    caller_identity: String,
}

impl Default for InterestPolicy {
    fn default() -> Self {
        let mut interesting_types = HashSet::new();
        interesting_types.insert(defaults::INTEREST_ROOT_TYPE.to_string());
        Self {
            interesting_types,
            caller_identity: defaults::CALLER_IDENTITY.to_string(),
        }
    }
}

impl InterestPolicy {
    /// Create a policy from an explicit interest set and caller identity.
    pub fn new<I, S>(interesting_types: I, caller_identity: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            interesting_types: interesting_types.into_iter().map(Into::into).collect(),
            caller_identity: caller_identity.into(),
        }
    }

    /// Create a policy from environment variables (with defaults).
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `RELAY_INTEREST_TYPES` | `Referenceable` | Comma-separated interest set |
    /// | `RELAY_CALLER_IDENTITY` | `lattice-relay` | Identity for lookups |
    pub fn from_env() -> Self {
        let mut policy = Self::default();

        if let Ok(raw) = std::env::var("RELAY_INTEREST_TYPES") {
            let types: HashSet<String> = raw
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from)
                .collect();
            if !types.is_empty() {
                policy.interesting_types = types;
            }
        }

        if let Ok(caller) = std::env::var("RELAY_CALLER_IDENTITY") {
            if !caller.is_empty() {
                policy.caller_identity = caller;
            }
        }

        policy
    }

    /// Replace the interest set.
    pub fn with_interesting_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interesting_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Add a single type name to the interest set.
    pub fn with_interesting_type(mut self, type_name: impl Into<String>) -> Self {
        self.interesting_types.insert(type_name.into());
        self
    }

    /// Set the caller identity used for lookups.
    pub fn with_caller_identity(mut self, caller: impl Into<String>) -> Self {
        self.caller_identity = caller.into();
        self
    }

    /// Whether a single type name is in the interest set.
    pub fn is_interesting(&self, type_name: &str) -> bool {
        self.interesting_types.contains(type_name)
    }

    /// Caller identity for visibility lookups.
    pub fn caller_identity(&self) -> &str {
        &self.caller_identity
    }

    /// Number of type names in the interest set.
    pub fn interest_count(&self) -> usize {
        self.interesting_types.len()
    }
}
