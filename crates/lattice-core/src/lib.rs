//! # lattice-core
//!
//! Core types, traits, and abstractions for the lattice change-event relay.
//!
//! This crate provides the data model for cohort change notifications, the
//! outbound event types, the interest policy, and the collaborator trait
//! definitions that the relay crate depends on.

pub mod defaults;
pub mod error;
pub mod event;
pub mod logging;
pub mod model;
pub mod policy;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use event::{ElementHeader, OutboundEvent, OutboundEventKind};
pub use model::{
    ChangeKind, ChangeNotification, Classification, EntityReference, EntityState, EntitySubject,
    PropertyMap, TypeSummary,
};
pub use policy::InterestPolicy;
pub use traits::{DiagnosticRecord, DiagnosticSink, EntityLookup, OutboundChannel};
