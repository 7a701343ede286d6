//! Centralized default constants for the lattice relay.
//!
//! **This module is the single source of truth** for all shared default
//! values. Both crates reference these constants instead of defining their
//! own magic numbers.

// =============================================================================
// INTEREST POLICY
// =============================================================================

/// Root type that anchors the default interest set. Every entity type in a
/// cohort descends from it, so the default policy admits all entities that
/// carry type metadata.
pub const INTEREST_ROOT_TYPE: &str = "Referenceable";

/// Default caller identity used for visibility lookups when none is
/// configured.
pub const CALLER_IDENTITY: &str = "lattice-relay";

// =============================================================================
// OUT TOPIC
// =============================================================================

/// Broadcast topic buffer capacity.
///
/// Recommended: 256 for production, 32 for tests.
pub const TOPIC_CAPACITY: usize = 256;

// =============================================================================
// RELAY WORKER
// =============================================================================

/// Maximum notifications resolved concurrently. Bounds in-flight calls to
/// the entity lookup service.
pub const RELAY_MAX_CONCURRENT: usize = 4;

/// Inbound notification queue capacity.
pub const RELAY_QUEUE_CAPACITY: usize = 1024;

// =============================================================================
// DIAGNOSTICS
// =============================================================================

/// Maximum records retained by the in-memory diagnostic sink. Older records
/// are discarded first.
pub const DIAGNOSTIC_BUFFER: usize = 128;
