// ─────────────────────────────────────────────────────────────────────
// Failure-Aware Vision — Excursion Tracking
// ─────────────────────────────────────────────────────────────────────
//! Tracks trust excursions: contiguous intervals where reliability sat
//! below the entry threshold. While one is open, per-status dwell time
//! accumulates weighted by `dt`; on close the dominant cause is the
//! failure status with the largest dwell share, severity breaking ties.
//!
//! An excursion closes only once reliability recovers past the close
//! threshold, which sits above the entry threshold so a marginal
//! recovery does not flap the event stream.

use serde::{Deserialize, Serialize};

use vistrust_types::{CauseDwell, ExcursionEvent, VisionStatus};

struct OpenExcursion {
    start_ts: f64,
    min_reliability: f64,
    dwell: CauseDwell,
    peak_anomaly: f64,
}

/// Open-excursion state machine. One instance per session.
#[derive(Default)]
pub struct ExcursionTracker {
    open: Option<OpenExcursion>,
}

impl ExcursionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while an excursion is in progress.
    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Feed one tick. Returns a closed event when the recovery threshold
    /// is crossed.
    pub fn observe(
        &mut self,
        timestamp: f64,
        status: VisionStatus,
        reliability: f64,
        anomaly: f64,
        dt: f64,
        entry_below: f64,
        close_at: f64,
    ) -> Option<ExcursionEvent> {
        if let Some(open) = &mut self.open {
            open.dwell.add(status, dt);
            open.min_reliability = open.min_reliability.min(reliability);
            open.peak_anomaly = open.peak_anomaly.max(anomaly);
        } else {
            if reliability < entry_below {
                let mut dwell = CauseDwell::default();
                dwell.add(status, dt);
                self.open = Some(OpenExcursion {
                    start_ts: timestamp,
                    min_reliability: reliability,
                    dwell,
                    peak_anomaly: anomaly,
                });
                log::info!("excursion opened at {timestamp:.3} ({status})");
            }
            return None;
        }

        if reliability < close_at {
            return None;
        }

        self.open.take().map(|open| {
            let event = ExcursionEvent {
                start_ts: open.start_ts,
                end_ts: timestamp,
                min_reliability: open.min_reliability,
                dominant_cause: open.dwell.dominant(),
                cause_histogram: open.dwell,
                peak_anomaly: open.peak_anomaly,
            };
            log::info!(
                "excursion closed: {:.3}s, min reliability {:.4}, cause {}",
                event.duration_s(),
                event.min_reliability,
                event.dominant_cause
            );
            event
        })
    }

    pub fn reset(&mut self) {
        self.open = None;
    }
}

/// Closed-excursion counts per dominant cause.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CauseCounts {
    pub ok: u64,
    pub frozen: u64,
    pub blank: u64,
    pub corrupted: u64,
}

impl CauseCounts {
    fn bump(&mut self, status: VisionStatus) {
        match status {
            VisionStatus::Ok => self.ok += 1,
            VisionStatus::Frozen => self.frozen += 1,
            VisionStatus::Blank => self.blank += 1,
            VisionStatus::Corrupted => self.corrupted += 1,
        }
    }
}

/// Aggregate view over a session's closed excursions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ExcursionSummary {
    pub total: u64,
    pub by_cause: CauseCounts,
    pub mean_duration_s: f64,
    pub worst_min_reliability: f64,
}

/// Summarize closed excursions. An empty slice yields the zero summary
/// with `worst_min_reliability` pinned to 1.0.
pub fn summarize(events: &[ExcursionEvent]) -> ExcursionSummary {
    if events.is_empty() {
        return ExcursionSummary {
            worst_min_reliability: 1.0,
            ..ExcursionSummary::default()
        };
    }
    let mut by_cause = CauseCounts::default();
    let mut duration_sum = 0.0;
    let mut worst = 1.0f64;
    for event in events {
        by_cause.bump(event.dominant_cause);
        duration_sum += event.duration_s();
        worst = worst.min(event.min_reliability);
    }
    ExcursionSummary {
        total: events.len() as u64,
        by_cause,
        mean_duration_s: duration_sum / events.len() as f64,
        worst_min_reliability: worst,
    }
}
