// packages/agent/src/performance/page_timing.rs
//! Page-load metrics derived from Navigation Timing
//!
//! Each metric is the distance between two marks. A metric whose end mark
//! is still zero (phase not reached) or precedes its start mark is left out
//! rather than reported as a bogus number.

use crate::host::timing::{NavigationTiming, PerformanceTimeline};
use std::collections::BTreeMap;

pub const REDIRECT_TIME: &str = "redirectTime";
pub const DNS_TIME: &str = "dnsTime";
pub const TTFB_TIME: &str = "ttfbTime";
pub const TCP_TIME: &str = "tcpTime";
pub const TRANS_TIME: &str = "transTime";
pub const DOM_ANALYSIS_TIME: &str = "domAnalysisTime";
pub const FPT_TIME: &str = "fptTime";
pub const DOM_READY_TIME: &str = "domReadyTime";
pub const LOAD_PAGE_TIME: &str = "loadPageTime";
pub const RES_TIME: &str = "resTime";
pub const SSL_TIME: &str = "sslTime";
pub const TTL_TIME: &str = "ttlTime";
pub const FIRST_PACK_TIME: &str = "firstPackTime";
pub const FIRST_PAINT: &str = "firstPaint";
pub const FIRST_CONTENTFUL_PAINT: &str = "firstContentfulPaint";
pub const FMP_TIME: &str = "fmpTime";

fn span(start: f64, end: f64) -> Option<f64> {
    if end > 0.0 && end >= start {
        Some(end - start)
    } else {
        None
    }
}

/// Navigation phase durations in milliseconds
pub fn navigation_metrics(timing: &NavigationTiming) -> BTreeMap<String, f64> {
    let t = timing;
    let secure = if t.secure_connection_start > 0.0 {
        span(t.secure_connection_start, t.connect_end)
    } else {
        None
    };

    [
        (REDIRECT_TIME, span(t.redirect_start, t.redirect_end)),
        (DNS_TIME, span(t.domain_lookup_start, t.domain_lookup_end)),
        (TTFB_TIME, span(t.request_start, t.response_start)),
        (TCP_TIME, span(t.connect_start, t.connect_end)),
        (TRANS_TIME, span(t.response_start, t.response_end)),
        (DOM_ANALYSIS_TIME, span(t.response_end, t.dom_interactive)),
        (FPT_TIME, span(t.fetch_start, t.response_end)),
        (DOM_READY_TIME, span(t.fetch_start, t.dom_content_loaded_event_end)),
        (LOAD_PAGE_TIME, span(t.fetch_start, t.load_event_start)),
        (RES_TIME, span(t.dom_content_loaded_event_end, t.load_event_start)),
        (SSL_TIME, secure),
        (TTL_TIME, span(t.fetch_start, t.dom_interactive)),
        (FIRST_PACK_TIME, span(t.domain_lookup_start, t.response_start)),
    ]
    .into_iter()
    .filter_map(|(name, value)| value.map(|v| (name.to_string(), v)))
    .collect()
}

/// `firstPaint` / `firstContentfulPaint` marks present in the timeline
pub fn paint_metrics(timeline: &PerformanceTimeline) -> BTreeMap<String, f64> {
    [
        (FIRST_PAINT, timeline.paint(PerformanceTimeline::FIRST_PAINT)),
        (
            FIRST_CONTENTFUL_PAINT,
            timeline.paint(PerformanceTimeline::FIRST_CONTENTFUL_PAINT),
        ),
    ]
    .into_iter()
    .filter_map(|(name, value)| value.map(|v| (name.to_string(), v)))
    .collect()
}
