// packages/agent/src/host/timing.rs
//! Performance timeline as exposed by the page
//!
//! All times are milliseconds relative to navigation start. A zero value
//! means the phase has not happened (the Navigation Timing convention).

use serde::{Deserialize, Serialize};

/// Navigation Timing marks for the current document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavigationTiming {
    pub redirect_start: f64,
    pub redirect_end: f64,
    pub fetch_start: f64,
    pub domain_lookup_start: f64,
    pub domain_lookup_end: f64,
    pub connect_start: f64,
    pub secure_connection_start: f64,
    pub connect_end: f64,
    pub request_start: f64,
    pub response_start: f64,
    pub response_end: f64,
    pub dom_interactive: f64,
    pub dom_content_loaded_event_end: f64,
    pub load_event_start: f64,
}

/// How the document was reached
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationType {
    #[default]
    Navigate,
    Reload,
    BackForward,
    Prerender,
}

/// `first-paint` / `first-contentful-paint` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaintEntry {
    pub name: String,
    pub start_time: f64,
}

/// Resource Timing entry for one fetched sub-resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTiming {
    /// Resource URL
    pub name: String,
    pub initiator_type: String,
    pub start_time: f64,
    pub duration: f64,
    pub transfer_size: Option<u64>,
}

/// Layout score of the DOM at a point in time; input to FMP
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutSample {
    pub time: f64,
    pub score: f64,
}

/// Everything the performance recorder reads from the page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PerformanceTimeline {
    pub navigation: Option<NavigationTiming>,
    pub navigation_type: NavigationType,
    pub redirect_count: u32,
    pub paints: Vec<PaintEntry>,
    pub layout_samples: Vec<LayoutSample>,
}

impl PerformanceTimeline {
    pub const FIRST_PAINT: &'static str = "first-paint";
    pub const FIRST_CONTENTFUL_PAINT: &'static str = "first-contentful-paint";

    /// Start time of the named paint entry
    pub fn paint(&self, name: &str) -> Option<f64> {
        self.paints
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.start_time)
    }
}
