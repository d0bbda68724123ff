// packages/agent/src/capture/strategy.rs
//! Shared skeleton for capture strategies
//!
//! Every strategy does the same three things when its hook fires: extract
//! data from the native signal, build an [`Event`], call the reporter.
//! [`CaptureContext::capture`] owns the last two steps and the containment
//! boundary around the first: whatever a builder returns as an error, or
//! panics with, is logged and dropped here.

use crate::event::{Destination, Event};
use crate::host::listeners::ListenerId;
use crate::host::page::Page;
use crate::reporting::Reporter;
use crate::utils::errors::Result;
use metrics::counter;
use parking_lot::RwLock;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Destination shared by the agent and every active strategy.
///
/// Read at capture time, so a later registration retargets strategies that
/// are already installed.
pub type SharedDestination = Arc<RwLock<Destination>>;

/// A capture strategy: one interception point for one class of signal
pub trait CaptureStrategy: Send {
    /// Stable name used in logs and metrics
    fn name(&self) -> &'static str;

    /// Install the interception point. Calling it while active does nothing.
    fn activate(&mut self, ctx: &CaptureContext);

    /// Remove the interception point. Calling it while inactive does nothing.
    fn deactivate(&mut self);

    fn is_active(&self) -> bool;
}

/// Everything a strategy needs when its hook fires
#[derive(Clone)]
pub struct CaptureContext {
    page: Page,
    reporter: Reporter,
    destination: SharedDestination,
}

impl CaptureContext {
    pub fn new(page: Page, reporter: Reporter, destination: SharedDestination) -> Self {
        Self {
            page,
            reporter,
            destination,
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    /// Snapshot of the current destination
    pub fn destination(&self) -> Destination {
        self.destination.read().clone()
    }

    /// Build an event and report it.
    ///
    /// `build` returns `Ok(None)` for signals the strategy chooses to ignore.
    /// Returns `true` when an event was handed to the reporter.
    pub fn capture<F>(&self, strategy: &'static str, build: F) -> bool
    where
        F: FnOnce(&Destination) -> Result<Option<Event>>,
    {
        let destination = self.destination();

        match panic::catch_unwind(AssertUnwindSafe(|| build(&destination))) {
            Ok(Ok(Some(event))) => {
                let event = event.with_page_path(self.page.location());
                self.reporter.send(event);
                true
            }
            Ok(Ok(None)) => {
                trace!("{} ignored a signal", strategy);
                false
            }
            Ok(Err(e)) => {
                debug!("{} discarded a signal: {}", strategy, e);
                counter!("rum_agent_capture_faults_total", "strategy" => strategy).increment(1);
                false
            }
            Err(_) => {
                warn!("{} capture logic panicked; signal discarded", strategy);
                counter!("rum_agent_capture_faults_total", "strategy" => strategy).increment(1);
                false
            }
        }
    }

    /// Wrap a per-signal builder into a page listener
    pub fn watch<T, F>(&self, strategy: &'static str, build: F) -> impl Fn(&T) + Send + Sync + 'static
    where
        T: 'static,
        F: Fn(&Destination, &T) -> Result<Option<Event>> + Send + Sync + 'static,
    {
        let ctx = self.clone();
        move |signal: &T| {
            ctx.capture(strategy, |destination| build(destination, signal));
        }
    }
}

/// Listener attached to a page channel, detached on [`ListenerHook::detach`]
pub struct ListenerHook {
    page: Page,
    id: ListenerId,
}

impl ListenerHook {
    pub fn new(page: Page, id: ListenerId) -> Self {
        Self { page, id }
    }

    pub fn detach(self) {
        if !self.page.remove_listener(self.id) {
            debug!("Listener {:?} was already detached", self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::signals::ErrorSignal;
    use crate::reporting::ChannelTransport;
    use crate::utils::errors::AgentError;

    fn context() -> (CaptureContext, crossbeam_channel::Receiver<crate::reporting::Outbound>) {
        let (transport, receiver) = ChannelTransport::unbounded();
        let destination = Arc::new(RwLock::new(Destination::new("svc", "https://x/report")));
        let ctx = CaptureContext::new(Page::new("/cart"), Reporter::new(transport), destination);
        (ctx, receiver)
    }

    #[test]
    fn test_capture_reports_with_page_path() {
        let (ctx, receiver) = context();

        let sent = ctx.capture("test", |dest| {
            Ok(Some(Event::js_error(dest, &ErrorSignal::new("boom"))))
        });

        assert!(sent);
        let body: serde_json::Value = serde_json::from_slice(&receiver.try_recv().unwrap().body).unwrap();
        assert_eq!(body["pagePath"], "/cart");
        assert_eq!(body["serviceName"], "svc");
    }

    #[test]
    fn test_capture_ignored_signal() {
        let (ctx, receiver) = context();
        assert!(!ctx.capture("test", |_| Ok(None)));
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_capture_error_is_contained() {
        let (ctx, receiver) = context();

        let sent = ctx.capture("test", |_| {
            Err(AgentError::MalformedSignal {
                signal: "error",
                reason: "injected".to_string(),
            })
        });

        assert!(!sent);
        assert!(receiver.try_recv().is_err());
        assert_eq!(ctx.reporter().stats().total(), 0);
    }

    #[test]
    fn test_capture_panic_is_contained() {
        let (ctx, receiver) = context();

        let sent = ctx.capture("test", |_| -> Result<Option<Event>> { panic!("injected fault") });

        assert!(!sent);
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_faulty_listener_does_not_reach_dispatcher() {
        let (ctx, receiver) = context();
        let page = ctx.page().clone();

        page.on_error(ctx.watch("faulty", |_, _: &ErrorSignal| -> Result<Option<Event>> {
            panic!("injected fault")
        }));

        // Returns normally: nothing propagates to the signal's dispatcher
        assert_eq!(page.dispatch_error(&ErrorSignal::new("boom")), 1);
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_destination_read_at_capture_time() {
        let (ctx, receiver) = context();
        ctx.destination.write().service_name = "svc-2".to_string();

        ctx.capture("test", |dest| Ok(Some(Event::js_error(dest, &ErrorSignal::new("boom")))));

        let body: serde_json::Value = serde_json::from_slice(&receiver.try_recv().unwrap().body).unwrap();
        assert_eq!(body["serviceName"], "svc-2");
    }

    #[test]
    fn test_listener_hook_detach() {
        let page = Page::default();
        let id = page.on_error(|_| {});
        ListenerHook::new(page.clone(), id).detach();
        assert_eq!(page.listener_counts().errors, 0);
    }
}
