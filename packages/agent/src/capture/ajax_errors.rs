// packages/agent/src/capture/ajax_errors.rs
//! Failed XHR and fetch calls
//!
//! Observes completions from both client styles through one page channel.
//! The observer only reads the completion; the host's own response flows
//! on unchanged. Successful calls and calls to the agent's own collector
//! are ignored.

use crate::capture::strategy::{CaptureContext, CaptureStrategy, ListenerHook};
use crate::event::{Destination, Event};
use crate::host::signals::RequestCompletion;
use crate::utils::errors::{AgentError, Result};
use tracing::debug;

/// Reports one `ajax_error` event per failed request
#[derive(Default)]
pub struct AjaxErrorStrategy {
    hook: Option<ListenerHook>,
}

impl AjaxErrorStrategy {
    pub const NAME: &'static str = "api_errors";

    pub fn new() -> Self {
        Self::default()
    }

    fn build(destination: &Destination, completion: &RequestCompletion) -> Result<Option<Event>> {
        if completion.url.is_empty() {
            return Err(AgentError::MalformedSignal {
                signal: "request",
                reason: "completion without url".to_string(),
            });
        }

        if !completion.is_failure() {
            return Ok(None);
        }

        // The collector's own traffic would otherwise report itself
        if is_collector_url(&completion.url, &destination.report_url) {
            return Ok(None);
        }

        Ok(Some(Event::ajax_error(destination, completion)))
    }
}

/// `url` targets `report_url` itself, optionally followed by a query,
/// fragment or sub-path
fn is_collector_url(url: &str, report_url: &str) -> bool {
    if report_url.is_empty() {
        return false;
    }

    match url.strip_prefix(report_url) {
        Some(rest) => rest.is_empty() || rest.starts_with(['?', '#', '/']),
        None => false,
    }
}

impl CaptureStrategy for AjaxErrorStrategy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn activate(&mut self, ctx: &CaptureContext) {
        if self.hook.is_some() {
            return;
        }

        let id = ctx.page().on_request(ctx.watch(Self::NAME, Self::build));

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
