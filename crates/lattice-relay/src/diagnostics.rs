//! Diagnostic sink implementations.
//!
//! [`TracingDiagnostics`] is the production default: publish failures land
//! in the structured log stream. [`MemoryDiagnostics`] keeps a bounded
//! in-memory buffer that embedders can surface over an API and tests can
//! inspect.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::error;

use lattice_core::defaults;
use lattice_core::{DiagnosticRecord, DiagnosticSink};

/// Sink that reports failures through the `tracing` stream at ERROR.
#[derive(Debug, Default)]
pub struct TracingDiagnostics;

#[async_trait]
impl DiagnosticSink for TracingDiagnostics {
    async fn record(&self, record: DiagnosticRecord) {
        error!(
            context = %record.context,
            error = %record.error,
            event = record.event_form.as_deref().unwrap_or("<none>"),
            "Relay diagnostic"
        );
    }
}

/// Sink that retains the most recent records in memory.
///
/// Holds at most `capacity` records; the oldest are discarded first.
pub struct MemoryDiagnostics {
    capacity: usize,
    records: Mutex<VecDeque<DiagnosticRecord>>,
}

impl MemoryDiagnostics {
    /// Create a sink with the given retention capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            records: Mutex::new(VecDeque::new()),
        }
    }

    /// Snapshot of the retained records, oldest first.
    pub fn records(&self) -> Vec<DiagnosticRecord> {
        self.records.lock().unwrap().iter().cloned().collect()
    }

    /// Number of retained records.
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    /// Whether no records are retained.
    pub fn is_empty(&self) -> bool {
        self.records.lock().unwrap().is_empty()
    }
}

impl Default for MemoryDiagnostics {
    fn default() -> Self {
        Self::new(defaults::DIAGNOSTIC_BUFFER)
    }
}

#[async_trait]
impl DiagnosticSink for MemoryDiagnostics {
    async fn record(&self, record: DiagnosticRecord) {
        let mut records = self.records.lock().unwrap();
        if records.len() == self.capacity {
            records.pop_front();
        }
        records.push_back(record);
    }
}
