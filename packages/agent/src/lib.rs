// packages/agent/src/lib.rs
//! RUM Agent Library
//!
//! Real-user monitoring for a browser page: captures uncaught errors,
//! unhandled rejections, failed requests, failed sub-resource loads and
//! framework errors, records page-load performance once per page, and
//! reports each as a JSON event to a collector.
//!
//! # Architecture
//!
//! - **agent**: coordinator owning configuration, strategies and the perf schedule
//! - **capture**: one strategy per signal class, each a containment boundary
//! - **event**: event model and wire payloads
//! - **host**: page surface (signals, listeners, ready state, timeline)
//! - **performance**: navigation metrics, paint marks, first meaningful paint
//! - **reporting**: best-effort reporter over a swappable transport
//! - **observability**: tracing subscriber and Prometheus recorder for hosts
//! - **utils**: configuration and errors
//!
//! # Example
//!
//! ```no_run
//! use rum_agent::{Agent, AgentOptions, ChannelTransport, Page, Reporter};
//!
//! let page = Page::new("/");
//! let (transport, _beacons) = ChannelTransport::unbounded();
//! let agent = Agent::new(page.clone(), Reporter::new(transport));
//!
//! agent.register(
//!     AgentOptions::new()
//!         .service_name("storefront")
//!         .report_url("https://collector.example/browser"),
//! );
//! page.fire_load();
//! ```

// Public module exports
pub mod agent;
pub mod capture;
pub mod event;
pub mod host;
pub mod observability;
pub mod performance;
pub mod reporting;
pub mod utils;

// Re-export commonly used types
pub use agent::{Agent, AgentState};
pub use event::{Destination, Event, EventKind};
pub use host::page::Page;
pub use reporting::{ChannelTransport, HttpTransport, Reporter, Transport};
pub use utils::config::{AgentConfig, AgentOptions};
pub use utils::errors::{AgentError, Result};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
