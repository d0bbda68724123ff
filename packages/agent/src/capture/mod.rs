// packages/agent/src/capture/mod.rs
//! Capture strategies
//!
//! One strategy per signal class, each installing exactly one interception
//! point on the page:
//!
//! - **JS errors**: uncaught script errors → `js_error`
//! - **Promise errors**: unhandled rejections → `promise_error`
//! - **Ajax errors**: failed XHR / fetch completions → `ajax_error`
//! - **Resource errors**: failed sub-resource loads → `resource_error`
//!   (plus resource timing when tracing is on)
//! - **Framework errors**: wrapped framework error hook → `framework_error`
//!
//! # Architecture
//!
//! ```text
//! Native signal → Page listener → CaptureContext::capture
//!                                      │  (containment boundary)
//!                                      ├─ build Event
//!                                      └─ Reporter::send
//! ```
//!
//! A fault inside a strategy never reaches the code that raised the signal
//! and never produces an event of its own.

pub mod ajax_errors;
pub mod framework_errors;
pub mod js_errors;
pub mod promise_errors;
pub mod resource_errors;
pub mod strategy;

// Re-export commonly used types
pub use ajax_errors::AjaxErrorStrategy;
pub use framework_errors::FrameworkErrorStrategy;
pub use js_errors::JsErrorStrategy;
pub use promise_errors::PromiseErrorStrategy;
pub use resource_errors::ResourceErrorStrategy;
pub use strategy::{CaptureContext, CaptureStrategy, ListenerHook, SharedDestination};

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::event::{Destination, Event};
    use crate::host::page::Page;
    use crate::reporting::{ChannelTransport, Outbound, Reporter};
    use crossbeam_channel::Receiver;
    use parking_lot::RwLock;
    use std::sync::Arc;

    pub const REPORT_URL: &str = "https://collector.example/browser/errors";

    pub fn context() -> (CaptureContext, Receiver<Outbound>) {
        let (transport, receiver) = ChannelTransport::unbounded();
        let destination = Arc::new(RwLock::new(Destination::new("svc", REPORT_URL)));
        let ctx = CaptureContext::new(Page::new("/shop"), Reporter::new(transport), destination);
        (ctx, receiver)
    }

    /// Decode everything sent so far
    pub fn received(receiver: &Receiver<Outbound>) -> Vec<Event> {
        receiver
            .try_iter()
            .map(|outbound| serde_json::from_slice(&outbound.body).unwrap())
            .collect()
    }
}
