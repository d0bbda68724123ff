// packages/agent/src/performance/fmp.rs
//! First meaningful paint
//!
//! The page binding samples a layout score of the DOM as it mutates (a
//! weighted count of visible elements). FMP is the sample time at which the
//! score grew the most, i.e. when the bulk of the primary content appeared.

use crate::host::timing::LayoutSample;

/// Time of the largest layout-score increase, earliest on ties.
///
/// `None` when there are no samples or the score never grows.
pub fn first_meaningful_paint(samples: &[LayoutSample]) -> Option<f64> {
    let mut ordered: Vec<LayoutSample> = samples
        .iter()
        .copied()
        .filter(|s| s.time.is_finite() && s.score.is_finite())
        .collect();
    ordered.sort_by(|a, b| a.time.total_cmp(&b.time));

    let mut previous_score = 0.0;
    let mut best: Option<(f64, f64)> = None;

    for sample in ordered {
        let delta = sample.score - previous_score;
        previous_score = sample.score;

        if delta <= 0.0 {
            continue;
        }

        match best {
            Some((_, best_delta)) if best_delta >= delta => {}
            _ => best = Some((sample.time, delta)),
        }
    }

    best.map(|(time, _)| time)
}
