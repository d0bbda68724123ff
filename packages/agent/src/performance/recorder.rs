// packages/agent/src/performance/recorder.rs
//! Performance recorder
//!
//! Reads the page's performance timeline, turns it into one `performance`
//! event and reports it. The recorder belongs to one page: `record_once`
//! runs at most one time for its lifetime, however many times the load
//! signal or registration repeats.

use crate::event::{Event, NavigationMeta, PerformancePayload};
use crate::host::page::Page;
use crate::performance::{fmp, page_timing};
use crate::reporting::Reporter;
use crate::utils::config::AgentConfig;
use metrics::counter;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

pub struct PerformanceRecorder {
    page: Page,
    reporter: Reporter,
    recorded: AtomicBool,
}

impl PerformanceRecorder {
    pub fn new(page: Page, reporter: Reporter) -> Self {
        Self {
            page,
            reporter,
            recorded: AtomicBool::new(false),
        }
    }

    /// Metrics the page exposes right now
    pub fn snapshot(&self, config: &AgentConfig) -> PerformancePayload {
        let timeline = self.page.performance();

        let mut metrics = match &timeline.navigation {
            Some(timing) => page_timing::navigation_metrics(timing),
            None => {
                debug!("No navigation timing available");
                Default::default()
            }
        };
        metrics.extend(page_timing::paint_metrics(&timeline));

        if config.use_fmp {
            match fmp::first_meaningful_paint(&timeline.layout_samples) {
                Some(time) => {
                    metrics.insert(page_timing::FMP_TIME.to_string(), time);
                }
                None => debug!("No layout growth observed; fmpTime omitted"),
            }
        }

        PerformancePayload {
            metrics,
            navigation: NavigationMeta {
                page_path: self.page.location(),
                navigation_type: timeline.navigation_type,
                redirect_count: timeline.redirect_count,
            },
        }
    }

    /// Compute page metrics and report them when `auto_trace_perf` is set.
    ///
    /// Returns `true` when an event was handed to the reporter. Faults while
    /// reading the timeline are logged and swallowed.
    pub fn record_perf(&self, config: &AgentConfig) -> bool {
        if !config.auto_trace_perf {
            debug!("Automatic performance tracing disabled");
            return false;
        }

        match panic::catch_unwind(AssertUnwindSafe(|| self.snapshot(config))) {
            Ok(payload) => {
                info!(
                    "Recorded {} performance metrics for {}",
                    payload.metrics.len(),
                    payload.navigation.page_path
                );
                let event = Event::performance(&config.destination(), payload)
                    .with_page_path(self.page.location());
                self.reporter.send(event);
                true
            }
            Err(_) => {
                warn!("Performance recording panicked; no metrics reported");
                counter!("rum_agent_capture_faults_total", "strategy" => "performance").increment(1);
                false
            }
        }
    }

    /// [`record_perf`](Self::record_perf), at most once per recorder
    pub fn record_once(&self, config: &AgentConfig) -> bool {
        if self.recorded.swap(true, Ordering::AcqRel) {
            debug!("Performance already recorded for this page");
            return false;
        }

        self.record_perf(config)
    }

    pub fn has_recorded(&self) -> bool {
        self.recorded.load(Ordering::Acquire)
    }
}
