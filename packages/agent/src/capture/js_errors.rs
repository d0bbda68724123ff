// packages/agent/src/capture/js_errors.rs
//! Uncaught script errors
//!
//! Attaches a listener to the page's global error channel. The listener sits
//! next to any handler the application registered; it never marks the error
//! as handled.

use crate::capture::strategy::{CaptureContext, CaptureStrategy, ListenerHook};
use crate::event::Event;
use crate::host::signals::ErrorSignal;
use tracing::debug;

/// Reports one `js_error` event per uncaught error
#[derive(Default)]
pub struct JsErrorStrategy {
    hook: Option<ListenerHook>,
}

impl JsErrorStrategy {
    pub const NAME: &'static str = "js_errors";

    pub fn new() -> Self {
        Self::default()
    }
}

impl CaptureStrategy for JsErrorStrategy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn activate(&mut self, ctx: &CaptureContext) {
        if self.hook.is_some() {
            return;
        }

        let id = ctx.page().on_error(ctx.watch(Self::NAME, |destination, signal: &ErrorSignal| {
            Ok(Some(Event::js_error(destination, signal)))
        }));

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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::test_support::{context, received};
    use crate::event::{EventKind, Payload};

    #[test]
    fn test_reports_uncaught_error() {
        let (ctx, receiver) = context();
        let mut strategy = JsErrorStrategy::new();
        strategy.activate(&ctx);

        let signal = ErrorSignal::new("Cannot read properties of undefined")
            .with_location("https://app/bundle.js", 42, 13)
            .with_stack("TypeError: Cannot read properties of undefined\n    at render (bundle.js:42:13)");
        ctx.page().dispatch_error(&signal);

        let events = received(&receiver);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::JsError);
        match &events[0].payload {
            Payload::Error(payload) => {
                assert_eq!(payload.source_url.as_deref(), Some("https://app/bundle.js"));
                assert_eq!(payload.line, Some(42));
                assert!(payload.stack.is_some());
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_activate_is_idempotent() {
        let (ctx, receiver) = context();
        let mut strategy = JsErrorStrategy::new();
        strategy.activate(&ctx);
        strategy.activate(&ctx);

        assert_eq!(ctx.page().listener_counts().errors, 1);

        ctx.page().dispatch_error(&ErrorSignal::new("boom"));
        assert_eq!(received(&receiver).len(), 1);
    }

    #[test]
    fn test_coexists_with_host_handler() {
        let (ctx, receiver) = context();
        let host_calls = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));

        let counter = std::sync::Arc::clone(&host_calls);
        ctx.page().on_error(move |_| {
            counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        });

        let mut strategy = JsErrorStrategy::new();
        strategy.activate(&ctx);

        assert_eq!(ctx.page().dispatch_error(&ErrorSignal::new("boom")), 2);
        assert_eq!(host_calls.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert_eq!(received(&receiver).len(), 1);
    }

    #[test]
    fn test_deactivate_stops_reporting() {
        let (ctx, receiver) = context();
        let mut strategy = JsErrorStrategy::new();
        strategy.activate(&ctx);
        strategy.deactivate();

        assert!(!strategy.is_active());
        assert_eq!(ctx.page().dispatch_error(&ErrorSignal::new("boom")), 0);
        assert!(received(&receiver).is_empty());
    }
}
