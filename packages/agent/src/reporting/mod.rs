// packages/agent/src/reporting/mod.rs
//! Event reporting
//!
//! - **Reporter**: serialize an event, hand it to a transport, swallow failures
//! - **Transport**: best-effort one-way send (HTTP POST or channel)
//!
//! # Architecture
//!
//! ```text
//! Capture Strategy / Performance Recorder
//!     │
//!     └─ Reporter::send(event) → serde_json → Transport::transmit
//!                                                  │
//!                              ┌───────────────────┴──────────────┐
//!                        HttpTransport                     ChannelTransport
//!                  (tokio::spawn, reqwest POST)      (crossbeam → page binding)
//! ```
//!
//! No retry, no batching, no persistence: an event is either accepted by
//! the transport or dropped.

pub mod reporter;
pub mod transport;

// Re-export commonly used types
pub use reporter::{Reporter, ReporterStats};
pub use transport::{ChannelTransport, HttpTransport, HttpTransportConfig, Outbound, Transport};
