// packages/agent/src/reporting/reporter.rs
//! Event reporter
//!
//! Serializes an event and hands it to the configured transport. `send`
//! has no result: serialization errors, transport errors and transport
//! panics are counted, logged and swallowed.

use crate::event::Event;
use crate::reporting::transport::{Outbound, Transport};
use crate::utils::errors::Result;
use bytes::Bytes;
use metrics::counter;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Sends events through a [`Transport`]; clones share transport and counters
#[derive(Clone)]
pub struct Reporter {
    transport: Arc<dyn Transport>,
    counters: Arc<Counters>,
}

#[derive(Default)]
struct Counters {
    sent: AtomicU64,
    dropped: AtomicU64,
    failed: AtomicU64,
}

impl Reporter {
    pub fn new<T>(transport: T) -> Self
    where
        T: Transport + 'static,
    {
        Self::from_arc(Arc::new(transport))
    }

    pub fn from_arc(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            counters: Arc::new(Counters::default()),
        }
    }

    /// Transmit `event` to its `report_url`, best effort
    pub fn send(&self, event: Event) {
        let kind = event.kind.as_str();

        if event.report_url.is_empty() {
            debug!("Dropping {} event {}: no report URL", kind, event.id);
            self.counters.dropped.fetch_add(1, Ordering::Relaxed);
            counter!("rum_agent_events_dropped_total", "kind" => kind).increment(1);
            return;
        }

        match panic::catch_unwind(AssertUnwindSafe(|| self.transmit(&event))) {
            Ok(Ok(())) => {
                debug!("Handed {} event {} to transport", kind, event.id);
                self.counters.sent.fetch_add(1, Ordering::Relaxed);
                counter!("rum_agent_events_sent_total", "kind" => kind).increment(1);
            }
            Ok(Err(e)) => {
                debug!("Failed to transmit {} event {}: {}", kind, event.id, e);
                self.counters.failed.fetch_add(1, Ordering::Relaxed);
                counter!("rum_agent_transport_failures_total", "kind" => kind).increment(1);
            }
            Err(_) => {
                warn!("Transport panicked while sending {} event {}", kind, event.id);
                self.counters.failed.fetch_add(1, Ordering::Relaxed);
                counter!("rum_agent_transport_failures_total", "kind" => kind).increment(1);
            }
        }
    }

    fn transmit(&self, event: &Event) -> Result<()> {
        let body = event.to_json()?;

        self.transport.transmit(Outbound {
            url: event.report_url.clone(),
            body: Bytes::from(body),
        })
    }

    pub fn stats(&self) -> ReporterStats {
        ReporterStats {
            sent: self.counters.sent.load(Ordering::Relaxed),
            dropped: self.counters.dropped.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
        }
    }
}

/// Reporter statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReporterStats {
    /// Events accepted by the transport
    pub sent: u64,

    /// Events discarded before transport (no destination)
    pub dropped: u64,

    /// Events the transport refused or panicked on
    pub failed: u64,
}

impl ReporterStats {
    pub fn total(&self) -> u64 {
        self.sent + self.dropped + self.failed
    }
}
