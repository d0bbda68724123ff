// packages/agent/src/host/signals.rs
//! Native signals a page binding forwards into the agent
//!
//! These mirror what the browser hands to global handlers: the arguments of
//! an uncaught error, the reason of an unhandled rejection, the final state
//! of an XHR/fetch call, and the target of a resource load event.

use crate::host::timing::ResourceTiming;
use serde::{Deserialize, Serialize};

/// Uncaught script error
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorSignal {
    pub message: String,
    pub source_url: Option<String>,
    pub line: Option<u32>,
    pub column: Option<u32>,
    pub stack: Option<String>,
}

impl ErrorSignal {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_location(mut self, source_url: impl Into<String>, line: u32, column: u32) -> Self {
        self.source_url = Some(source_url.into());
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }
}

/// Promise rejection nobody handled
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectionSignal {
    /// Stringified rejection reason
    pub reason: String,
    pub stack: Option<String>,
    /// URL of the request behind the rejection, when the reason carries one
    pub source_url: Option<String>,
}

impl RejectionSignal {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            ..Self::default()
        }
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }
}

/// Which client API issued a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestClient {
    /// Callback-style `XMLHttpRequest`
    Xhr,

    /// Promise-style `fetch`
    Fetch,
}

/// Final state of an outgoing request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestCompletion {
    pub client: RequestClient,
    pub method: String,
    pub url: String,

    /// HTTP status; `None` when the request never got a response
    pub status: Option<u16>,

    pub duration_ms: Option<f64>,

    /// Network-level error text (CORS, DNS, abort, ...)
    pub error: Option<String>,
}

impl RequestCompletion {
    pub fn new(client: RequestClient, method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            client,
            method: method.into(),
            url: url.into(),
            status: None,
            duration_ms: None,
            error: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_duration(mut self, duration_ms: f64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Network failure (no status, or the XHR status 0) or an HTTP error status
    pub fn is_failure(&self) -> bool {
        match self.status {
            None | Some(0) => true,
            Some(status) => status >= 400,
        }
    }
}

/// Outcome of a sub-resource load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ResourceOutcome {
    Failed,
    Loaded { timing: Option<ResourceTiming> },
}

/// Load event of an `<img>`, `<script>`, `<link>`, ... element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSignal {
    /// Lowercased tag name of the element
    pub element: String,

    /// `src` or `href` of the element
    pub url: Option<String>,

    pub outcome: ResourceOutcome,
}

impl ResourceSignal {
    pub fn failed(element: impl Into<String>, url: Option<String>) -> Self {
        Self {
            element: element.into().to_ascii_lowercase(),
            url,
            outcome: ResourceOutcome::Failed,
        }
    }

    pub fn loaded(element: impl Into<String>, url: Option<String>, timing: Option<ResourceTiming>) -> Self {
        Self {
            element: element.into().to_ascii_lowercase(),
            url,
            outcome: ResourceOutcome::Loaded { timing },
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, ResourceOutcome::Failed)
    }
}

/// `document.readyState`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadyState {
    #[default]
    Loading,
    Interactive,
    Complete,
}
