//! Structured logging schema and field name constants for the lattice relay.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation tools can query by standardized field names across
//! every subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Publish failures and other conditions needing operator attention |
//! | WARN  | Recoverable issue, notification dropped or malformed |
//! | INFO  | Lifecycle events (worker start/stop), published events |
//! | DEBUG | Admission decisions, resolve outcomes, config choices |
//! | TRACE | Per-property detail, high-volume data |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "relay", "resolver", "publisher", "worker"
pub const SUBSYSTEM: &str = "subsystem";

/// Logical operation name.
/// Examples: "dispatch", "resolve", "publish"
pub const OPERATION: &str = "op";

/// Caller identity used for visibility lookups.
pub const CALLER: &str = "caller";

/// Name of the cohort member that originated a notification.
pub const SOURCE_NAME: &str = "source_name";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Identifier of the entity a notification refers to.
pub const ENTITY_ID: &str = "entity_id";

/// Declared type name of the entity.
pub const TYPE_NAME: &str = "type_name";

/// Incoming change kind variant.
pub const CHANGE_KIND: &str = "change_kind";

/// Outbound event kind stamped on a relayed event.
pub const EVENT_KIND: &str = "event_kind";

/// Name of the classification that was added, removed, or changed.
pub const CLASSIFICATION: &str = "classification";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of active subscribers on the out topic.
pub const SUBSCRIBER_COUNT: &str = "subscriber_count";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Terminal pipeline state for a notification.
/// Values: "rejected", "filtered_out", "not_visible", "published",
/// "publish_failed"
pub const OUTCOME: &str = "outcome";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
