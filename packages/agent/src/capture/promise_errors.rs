// packages/agent/src/capture/promise_errors.rs
//! Unhandled promise rejections

use crate::capture::strategy::{CaptureContext, CaptureStrategy, ListenerHook};
use crate::event::Event;
use crate::host::signals::RejectionSignal;
use tracing::debug;

/// Reports one `promise_error` event per rejection nobody handled
#[derive(Default)]
pub struct PromiseErrorStrategy {
    hook: Option<ListenerHook>,
}

impl PromiseErrorStrategy {
    pub const NAME: &'static str = "promise_errors";

    pub fn new() -> Self {
        Self::default()
    }
}

impl CaptureStrategy for PromiseErrorStrategy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn activate(&mut self, ctx: &CaptureContext) {
        if self.hook.is_some() {
            return;
        }

        let id = ctx.page().on_rejection(ctx.watch(
            Self::NAME,
            |destination, signal: &RejectionSignal| Ok(Some(Event::promise_error(destination, signal))),
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
