// packages/agent/src/event/model.rs
//! Event: the unit the reporter transmits
//!
//! One constructor per kind. Constructors never fail and never validate the
//! destination; an empty `service_name` or `report_url` is carried as-is and
//! dealt with by the reporter.

use crate::event::payload::{
    ErrorPayload, FrameworkPayload, Payload, PerformancePayload, RequestPayload, ResourcePayload,
    ResourceTimingPayload,
};
use crate::host::framework::FrameworkError;
use crate::host::signals::{ErrorSignal, RejectionSignal, RequestCompletion, ResourceSignal};
use crate::host::timing::ResourceTiming;
use crate::utils::errors::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

/// Event kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    JsError,
    PromiseError,
    AjaxError,
    ResourceError,
    FrameworkError,
    Performance,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::JsError => "js_error",
            EventKind::PromiseError => "promise_error",
            EventKind::AjaxError => "ajax_error",
            EventKind::ResourceError => "resource_error",
            EventKind::FrameworkError => "framework_error",
            EventKind::Performance => "performance",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attribution and destination copied onto every event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Destination {
    pub service_name: String,
    pub service_version: String,
    pub report_url: String,
}

impl Destination {
    pub fn new(service_name: impl Into<String>, report_url: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            service_version: String::new(),
            report_url: report_url.into(),
        }
    }
}

/// Normalized telemetry event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Unique event ID (ULID)
    pub id: String,

    pub kind: EventKind,

    pub service_name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub service_version: String,

    /// Where the event is sent; not part of the body
    #[serde(skip)]
    pub report_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_path: Option<String>,

    /// Capture time
    pub timestamp: DateTime<Utc>,

    pub payload: Payload,
}

impl Event {
    fn new(kind: EventKind, destination: &Destination, payload: Payload) -> Self {
        Self {
            id: Ulid::new().to_string(),
            kind,
            service_name: destination.service_name.clone(),
            service_version: destination.service_version.clone(),
            report_url: destination.report_url.clone(),
            page_path: None,
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Uncaught script error
    pub fn js_error(destination: &Destination, signal: &ErrorSignal) -> Self {
        Self::new(
            EventKind::JsError,
            destination,
            Payload::Error(ErrorPayload {
                message: signal.message.clone(),
                source_url: signal.source_url.clone(),
                line: signal.line,
                column: signal.column,
                stack: signal.stack.clone(),
            }),
        )
    }

    /// Unhandled promise rejection
    pub fn promise_error(destination: &Destination, signal: &RejectionSignal) -> Self {
        Self::new(
            EventKind::PromiseError,
            destination,
            Payload::Error(ErrorPayload {
                message: signal.reason.clone(),
                source_url: signal.source_url.clone(),
                line: None,
                column: None,
                stack: signal.stack.clone(),
            }),
        )
    }

    /// Failed XHR / fetch call
    pub fn ajax_error(destination: &Destination, completion: &RequestCompletion) -> Self {
        let message = match (&completion.error, completion.status) {
            (Some(error), _) => error.clone(),
            (None, None) | (None, Some(0)) => {
                format!("{} {} failed: network error", completion.method, completion.url)
            }
            (None, Some(status)) => {
                format!("{} {} failed with status {}", completion.method, completion.url, status)
            }
        };

        Self::new(
            EventKind::AjaxError,
            destination,
            Payload::Request(RequestPayload {
                client: completion.client,
                method: completion.method.clone(),
                url: completion.url.clone(),
                status: completion.status,
                duration_ms: completion.duration_ms,
                message,
            }),
        )
    }

    /// Failed sub-resource load
    pub fn resource_error(destination: &Destination, signal: &ResourceSignal) -> Self {
        Self::new(
            EventKind::ResourceError,
            destination,
            Payload::Resource(ResourcePayload {
                element: signal.element.clone(),
                url: signal.url.clone(),
                message: format!("failed to load {} resource", signal.element),
            }),
        )
    }

    /// Error routed through a framework error hook
    pub fn framework_error(destination: &Destination, error: &FrameworkError) -> Self {
        Self::new(
            EventKind::FrameworkError,
            destination,
            Payload::Framework(FrameworkPayload {
                message: error.message.clone(),
                component: error.component.clone(),
                info: error.info.clone(),
                stack: error.stack.clone(),
            }),
        )
    }

    /// Page-load performance snapshot
    pub fn performance(destination: &Destination, payload: PerformancePayload) -> Self {
        Self::new(EventKind::Performance, destination, Payload::PagePerf(payload))
    }

    /// Timing of one successfully loaded resource
    pub fn resource_timing(destination: &Destination, timing: &ResourceTiming) -> Self {
        Self::new(
            EventKind::Performance,
            destination,
            Payload::ResourceTiming(ResourceTimingPayload {
                url: timing.name.clone(),
                initiator: timing.initiator_type.clone(),
                start_time: timing.start_time,
                duration_ms: timing.duration,
                transfer_size: timing.transfer_size,
            }),
        )
    }

    pub fn with_page_path(mut self, page_path: impl Into<String>) -> Self {
        self.page_path = Some(page_path.into());
        self
    }

    /// Wire body
    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::signals::RequestClient;

    fn destination() -> Destination {
        Destination::new("svc", "https://x/report")
    }

    #[test]
    fn test_js_error_event() {
        let signal = ErrorSignal::new("x is not defined").with_location("https://app/main.js", 12, 7);
        let event = Event::js_error(&destination(), &signal);

        assert_eq!(event.kind, EventKind::JsError);
        assert_eq!(event.service_name, "svc");
        assert_eq!(event.report_url, "https://x/report");
        assert_eq!(event.id.len(), 26);

        match event.payload {
            Payload::Error(payload) => {
                assert_eq!(payload.message, "x is not defined");
                assert_eq!(payload.line, Some(12));
                assert_eq!(payload.column, Some(7));
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_ajax_error_messages() {
        let failed = RequestCompletion::new(RequestClient::Xhr, "GET", "/api/items").with_status(502);
        let event = Event::ajax_error(&destination(), &failed);
        match &event.payload {
            Payload::Request(payload) => {
                assert_eq!(payload.message, "GET /api/items failed with status 502");
                assert_eq!(payload.status, Some(502));
            }
            other => panic!("unexpected payload: {:?}", other),
        }

        let offline = RequestCompletion::new(RequestClient::Fetch, "POST", "/api/cart");
        let event = Event::ajax_error(&destination(), &offline);
        match &event.payload {
            Payload::Request(payload) => {
                assert_eq!(payload.message, "POST /api/cart failed: network error");
            }
            other => panic!("unexpected payload: {:?}", other),
        }

        let cors = offline.with_error("TypeError: Failed to fetch");
        let event = Event::ajax_error(&destination(), &cors);
        match &event.payload {
            Payload::Request(payload) => assert_eq!(payload.message, "TypeError: Failed to fetch"),
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_empty_destination_is_lenient() {
        let event = Event::promise_error(&Destination::default(), &RejectionSignal::new("nope"));
        assert_eq!(event.kind, EventKind::PromiseError);
        assert!(event.service_name.is_empty());
        assert!(event.report_url.is_empty());
    }

    #[test]
    fn test_wire_shape() {
        let event = Event::resource_error(
            &destination(),
            &ResourceSignal::failed("img", Some("https://cdn/logo.png".to_string())),
        )
        .with_page_path("/home");

        let value: serde_json::Value = serde_json::from_slice(&event.to_json().unwrap()).unwrap();

        assert_eq!(value["kind"], "resource_error");
        assert_eq!(value["serviceName"], "svc");
        assert_eq!(value["pagePath"], "/home");
        assert_eq!(value["payload"]["type"], "resource");
        assert_eq!(value["payload"]["element"], "img");
        assert_eq!(value["payload"]["message"], "failed to load img resource");
        assert!(value.get("timestamp").is_some());
        assert!(value.get("reportUrl").is_none());
        assert!(value.get("serviceVersion").is_none());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(EventKind::FrameworkError.to_string(), "framework_error");
        assert_eq!(
            serde_json::to_string(&EventKind::AjaxError).unwrap(),
            "\"ajax_error\""
        );
    }
}
