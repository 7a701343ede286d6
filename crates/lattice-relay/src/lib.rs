//! # lattice-relay
//!
//! Metadata change-event relay for federated metadata cohorts.
//!
//! The relay listens to entity lifecycle notifications from a cohort,
//! admits those whose type (or any supertype) matches a configured
//! interest set, resolves the authoritative visible entity state through
//! an injected lookup service, and republishes each admitted change as an
//! [`OutboundEvent`](lattice_core::OutboundEvent) on an outbound channel.
//!
//! Control flow is synchronous and per-notification:
//!
//! ```text
//! change source → RelayDispatcher → interest filter → visibility resolver
//!               → event transformer → Publisher → outbound channel
//! ```
//!
//! No notification's processing depends on another's, and no error from one
//! notification propagates out of the dispatcher: not-of-interest and
//! not-visible notifications are dropped silently, publish failures are
//! recorded to the diagnostic sink and processing continues.
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use lattice_core::defaults;
//! use lattice_core::{ChangeNotification, EntityLookup, InterestPolicy};
//! use lattice_relay::{
//!     BroadcastTopic, RelayDispatcher, RelayWorker, RelayWorkerConfig, TracingDiagnostics,
//! };
//!
//! # async fn run(lookup: Arc<dyn EntityLookup>) {
//! let topic = Arc::new(BroadcastTopic::default());
//! let mut events = topic.subscribe();
//!
//! let dispatcher = Arc::new(RelayDispatcher::new(
//!     InterestPolicy::from_env(),
//!     lookup,
//!     topic,
//!     Arc::new(TracingDiagnostics),
//! ));
//!
//! let (tx, rx) =
//!     tokio::sync::mpsc::channel::<ChangeNotification>(defaults::RELAY_QUEUE_CAPACITY);
//! let handle = RelayWorker::new(dispatcher, RelayWorkerConfig::from_env()).start(rx);
//! # let _ = (tx, handle, events.recv().await);
//! # }
//! ```

pub mod diagnostics;
pub mod dispatcher;
pub mod filter;
pub mod publisher;
pub mod resolver;
pub mod topic;
pub mod transform;
pub mod worker;

// Re-export commonly used types at crate root
pub use diagnostics::{MemoryDiagnostics, TracingDiagnostics};
pub use dispatcher::{RelayDispatcher, RelayOutcome, RelayStats};
pub use filter::{is_of_interest, subject_of_interest};
pub use publisher::{PublishOutcome, Publisher};
pub use resolver::{Resolution, VisibilityResolver};
pub use topic::BroadcastTopic;
pub use transform::transform;
pub use worker::{RelayWorker, RelayWorkerConfig, RelayWorkerHandle};
