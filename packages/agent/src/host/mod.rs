// packages/agent/src/host/mod.rs
//! Host page surface
//!
//! The agent never talks to a browser directly. A platform binding (wasm
//! shim, headless driver, test harness) owns a [`Page`] and forwards native
//! signals into it:
//!
//! ```text
//! window.onerror          → Page::dispatch_error
//! unhandledrejection      → Page::dispatch_rejection
//! XHR / fetch settled     → Page::complete_request
//! resource load / error   → Page::dispatch_resource
//! readyState / load       → Page::set_ready_state / Page::fire_load
//! Performance API         → Page::update_performance
//! framework errorHandler  → FrameworkHook::emit
//! ```

pub mod framework;
pub mod listeners;
pub mod page;
pub mod signals;
pub mod timing;

// Re-export commonly used types
pub use framework::{FrameworkError, FrameworkErrorHandler, FrameworkHook};
pub use listeners::{ListenerId, ListenerSet};
pub use page::{ListenerCounts, Page};
pub use signals::{
    ErrorSignal, ReadyState, RejectionSignal, RequestClient, RequestCompletion, ResourceOutcome,
    ResourceSignal,
};
pub use timing::{
    LayoutSample, NavigationTiming, NavigationType, PaintEntry, PerformanceTimeline, ResourceTiming,
};
