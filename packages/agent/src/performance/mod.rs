// packages/agent/src/performance/mod.rs
//! Page-load performance
//!
//! - **page_timing**: navigation phase durations and paint marks
//! - **fmp**: first meaningful paint from layout samples
//! - **recorder**: builds and reports the `performance` event once per page

pub mod fmp;
pub mod page_timing;
pub mod recorder;

pub use fmp::first_meaningful_paint;
pub use page_timing::{navigation_metrics, paint_metrics};
pub use recorder::PerformanceRecorder;
