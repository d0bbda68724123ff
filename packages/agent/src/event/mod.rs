// packages/agent/src/event/mod.rs
//! Event model
//!
//! Every captured signal is converted into an [`Event`] before it reaches
//! the reporter. Events are built, sent and dropped; nothing here buffers
//! or replays them.
//!
//! Wire form (JSON):
//!
//! ```text
//! { "id", "kind", "serviceName", "serviceVersion"?, "pagePath"?,
//!   "timestamp", "payload": { "type", ... } }
//! ```

pub mod model;
pub mod payload;

// Re-export commonly used types
pub use model::{Destination, Event, EventKind};
pub use payload::{
    ErrorPayload, FrameworkPayload, NavigationMeta, Payload, PerformancePayload, RequestPayload,
    ResourcePayload, ResourceTimingPayload,
};
