// packages/agent/src/capture/framework_errors.rs
//! Framework error hook
//!
//! Only used when the configuration carries a [`FrameworkHook`]. The
//! strategy wraps whatever handler the application installed on that hook:
//! the wrapper reports the error, then calls the previous handler, so the
//! application's own error handling keeps working.

use crate::capture::strategy::{CaptureContext, CaptureStrategy};
use crate::event::Event;
use crate::host::framework::{same_handler, FrameworkError, FrameworkErrorHandler, FrameworkHook};
use std::sync::Arc;
use tracing::debug;

struct Installed {
    wrapper: FrameworkErrorHandler,
    previous: Option<FrameworkErrorHandler>,
}

/// Reports one `framework_error` event per error routed through the hook
pub struct FrameworkErrorStrategy {
    hook: FrameworkHook,
    installed: Option<Installed>,
}

impl FrameworkErrorStrategy {
    pub const NAME: &'static str = "vue_errors";

    pub fn new(hook: FrameworkHook) -> Self {
        Self {
            hook,
            installed: None,
        }
    }

    pub fn hook(&self) -> &FrameworkHook {
        &self.hook
    }
}

impl CaptureStrategy for FrameworkErrorStrategy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn activate(&mut self, ctx: &CaptureContext) {
        if self.installed.is_some() {
            return;
        }

        let previous = self.hook.handler();
        let chained = previous.clone();
        let ctx = ctx.clone();

        let wrapper: FrameworkErrorHandler = Arc::new(move |error: &FrameworkError| {
            ctx.capture(Self::NAME, |destination| {
                Ok(Some(Event::framework_error(destination, error)))
            });

            if let Some(previous) = &chained {
                previous(error);
            }
        });

        self.hook.replace_handler(Some(Arc::clone(&wrapper)));
        self.installed = Some(Installed { wrapper, previous });
        debug!("Activated {} strategy", Self::NAME);
    }

    fn deactivate(&mut self) {
        let Some(installed) = self.installed.take() else {
            return;
        };

        // Only restore if nobody replaced our wrapper in the meantime
        match self.hook.handler() {
            Some(current) if same_handler(&current, &installed.wrapper) => {
                self.hook.replace_handler(installed.previous);
            }
            _ => debug!("Framework handler was replaced after activation; leaving it"),
        }

        debug!("Deactivated {} strategy", Self::NAME);
    }

    fn is_active(&self) -> bool {
        self.installed.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::test_support::{context, received};
    use crate::event::{EventKind, Payload};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_reports_framework_error() {
        let (ctx, receiver) = context();
        let hook = FrameworkHook::new();
        let mut strategy = FrameworkErrorStrategy::new(hook.clone());
        strategy.activate(&ctx);

        assert!(hook.emit(
            &FrameworkError::new("render failed")
                .with_component("CartList")
                .with_info("render function")
        ));

        let events = received(&receiver);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::FrameworkError);
        match &events[0].payload {
            Payload::Framework(payload) => {
                assert_eq!(payload.message, "render failed");
                assert_eq!(payload.component.as_deref(), Some("CartList"));
                assert_eq!(payload.info.as_deref(), Some("render function"));
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_chains_application_handler() {
        let (ctx, receiver) = context();
        let hook = FrameworkHook::new();
        let app_calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&app_calls);
        hook.set_handler(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let mut strategy = FrameworkErrorStrategy::new(hook.clone());
        strategy.activate(&ctx);
        hook.emit(&FrameworkError::new("boom"));

        assert_eq!(app_calls.load(Ordering::SeqCst), 1);
        assert_eq!(received(&receiver).len(), 1);
    }

    #[test]
    fn test_deactivate_restores_application_handler() {
        let (ctx, receiver) = context();
        let hook = FrameworkHook::new();
        let app_calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&app_calls);
        hook.set_handler(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let mut strategy = FrameworkErrorStrategy::new(hook.clone());
        strategy.activate(&ctx);
        strategy.activate(&ctx);
        strategy.deactivate();

        hook.emit(&FrameworkError::new("boom"));

        assert!(!strategy.is_active());
        assert_eq!(app_calls.load(Ordering::SeqCst), 1);
        assert!(received(&receiver).is_empty());
    }

    #[test]
    fn test_deactivate_without_previous_handler_clears_slot() {
        let (ctx, _receiver) = context();
        let hook = FrameworkHook::new();
        let mut strategy = FrameworkErrorStrategy::new(hook.clone());

        strategy.activate(&ctx);
        assert!(hook.has_handler());

        strategy.deactivate();
        assert!(!hook.has_handler());
    }

    #[test]
    fn test_deactivate_leaves_later_handler_alone() {
        let (ctx, _receiver) = context();
        let hook = FrameworkHook::new();
        let mut strategy = FrameworkErrorStrategy::new(hook.clone());
        strategy.activate(&ctx);

        let replacement_calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&replacement_calls);
        hook.set_handler(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        strategy.deactivate();
        hook.emit(&FrameworkError::new("boom"));
        assert_eq!(replacement_calls.load(Ordering::SeqCst), 1);
    }
}
