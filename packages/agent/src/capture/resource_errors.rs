// packages/agent/src/capture/resource_errors.rs
//! Failed sub-resource loads
//!
//! Reports `<img>`, `<script>`, `<link>` (and other element) load failures.
//! With resource tracing switched on it also reports the timing of resources
//! that loaded, as `performance` events.

use crate::capture::strategy::{CaptureContext, CaptureStrategy, ListenerHook};
use crate::event::Event;
use crate::host::signals::{ResourceOutcome, ResourceSignal};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Reports one `resource_error` event per failed load
#[derive(Default)]
pub struct ResourceErrorStrategy {
    hook: Option<ListenerHook>,
    trace_resource: Arc<AtomicBool>,
}

impl ResourceErrorStrategy {
    pub const NAME: &'static str = "resource_errors";

    pub fn new(trace_resource: bool) -> Self {
        Self {
            hook: None,
            trace_resource: Arc::new(AtomicBool::new(trace_resource)),
        }
    }

    /// Toggle the resource timing mode; applies to the installed hook too
    pub fn set_trace_resource(&self, enabled: bool) {
        self.trace_resource.store(enabled, Ordering::Relaxed);
    }

    pub fn trace_resource(&self) -> bool {
        self.trace_resource.load(Ordering::Relaxed)
    }
}

impl CaptureStrategy for ResourceErrorStrategy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn activate(&mut self, ctx: &CaptureContext) {
        if self.hook.is_some() {
            return;
        }

        let trace_resource = Arc::clone(&self.trace_resource);
        let id = ctx.page().on_resource(ctx.watch(
            Self::NAME,
            move |destination, signal: &ResourceSignal| {
                let event = match &signal.outcome {
                    ResourceOutcome::Failed => Some(Event::resource_error(destination, signal)),
                    ResourceOutcome::Loaded { timing: Some(timing) }
                        if trace_resource.load(Ordering::Relaxed) =>
                    {
                        Some(Event::resource_timing(destination, timing))
                    }
                    ResourceOutcome::Loaded { .. } => None,
                };
                Ok(event)
            },
        ));

        self.hook = Some(ListenerHook::new(ctx.page().clone(), id));
        debug!("Activated {} strategy", Self::NAME);
    }

    fn deactivate(&mut self) {
        if let Some(hook) = self.hook.take() {
            hook.detach();
            debug!("Deactivated {} strategy", Self::NAME);
        }
    }

    fn is_active(&self) -> bool {
        self.hook.is_some()
    }
}
