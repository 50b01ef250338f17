// ─────────────────────────────────────────────────────────────────────
// Failure-Aware Vision — Session Recorder
// ─────────────────────────────────────────────────────────────────────
//! Append-only sink for tick snapshots and excursion events, exported
//! as two stable CSV streams.
//!
//! The engine is the sole writer. An exporter may read concurrently:
//! every read takes the lock briefly, clones what it needs, and formats
//! outside the critical section, so recording stays O(1) and never
//! blocks on an export in progress.

use std::collections::VecDeque;
use std::fmt::Write as _;

use parking_lot::Mutex;

use vistrust_types::{ExcursionEvent, SupervisorConfig, TickSnapshot};

const TICK_HEADER: &str = "timestamp,reliability,policy_state,anomaly,anomaly_integral\n";
const EXCURSION_HEADER: &str =
    "start_ts,end_ts,duration_s,min_reliability,dominant_cause,peak_anomaly\n";

struct Buffers {
    ticks: VecDeque<TickSnapshot>,
    events: Vec<ExcursionEvent>,
    dropped_events: u64,
}

/// Bounded in-memory session log.
///
/// Tick snapshots live in a ring buffer (oldest evicted when full);
/// excursion events are retained up to a hard cap, past which the
/// newest are dropped and counted.
pub struct SessionRecorder {
    tick_capacity: usize,
    event_capacity: usize,
    inner: Mutex<Buffers>,
}

impl SessionRecorder {
    pub fn new(config: &SupervisorConfig) -> Self {
        Self {
            tick_capacity: config.tick_capacity,
            event_capacity: config.event_capacity,
            inner: Mutex::new(Buffers {
                ticks: VecDeque::with_capacity(config.tick_capacity),
                events: Vec::new(),
                dropped_events: 0,
            }),
        }
    }

    /// Append one tick snapshot, evicting the oldest when full.
    pub fn record_tick(&self, snapshot: &TickSnapshot) {
        let mut inner = self.inner.lock();
        if inner.ticks.len() == self.tick_capacity {
            inner.ticks.pop_front();
        }
        inner.ticks.push_back(snapshot.clone());
    }

    /// Append one closed excursion event.
    pub fn record_event(&self, event: &ExcursionEvent) {
        let mut inner = self.inner.lock();
        if inner.events.len() >= self.event_capacity {
            inner.dropped_events += 1;
            log::warn!(
                "excursion log full ({} events), dropping newest",
                self.event_capacity
            );
            return;
        }
        inner.events.push(event.clone());
    }

    pub fn tick_count(&self) -> usize {
        self.inner.lock().ticks.len()
    }

    pub fn event_count(&self) -> usize {
        self.inner.lock().events.len()
    }

    pub fn dropped_events(&self) -> u64 {
        self.inner.lock().dropped_events
    }

    /// Copy of the retained excursion events, in insertion order.
    pub fn events(&self) -> Vec<ExcursionEvent> {
        self.inner.lock().events.clone()
    }

    /// Render both logs as CSV byte streams: `(tick_csv, excursion_csv)`.
    ///
    /// Row formats are stable: timestamps carry millisecond precision,
    /// reliability six fractional digits, anomaly terms six.
    pub fn export(&self) -> (String, String) {
        let (ticks, events) = {
            let inner = self.inner.lock();
            (inner.ticks.clone(), inner.events.clone())
        };

        let mut tick_csv = String::with_capacity(TICK_HEADER.len() + ticks.len() * 48);
        tick_csv.push_str(TICK_HEADER);
        for s in &ticks {
            let _ = writeln!(
                tick_csv,
                "{:.3},{:.6},{},{:.6},{:.6}",
                s.timestamp,
                s.reliability,
                s.policy.as_str(),
                s.anomaly,
                s.anomaly_integral
            );
        }

        let mut event_csv = String::with_capacity(EXCURSION_HEADER.len() + events.len() * 48);
        event_csv.push_str(EXCURSION_HEADER);
        for e in &events {
            let _ = writeln!(
                event_csv,
                "{:.3},{:.3},{:.3},{:.4},{},{:.6}",
                e.start_ts,
                e.end_ts,
                e.duration_s(),
                e.min_reliability,
                e.dominant_cause.as_str(),
                e.peak_anomaly
            );
        }

        (tick_csv, event_csv)
    }

    /// Clear both buffers and the drop counter.
    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        inner.ticks.clear();
        inner.events.clear();
        inner.dropped_events = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vistrust_types::{CauseDwell, PolicyState, VisionStatus};

    fn snapshot(timestamp: f64, reliability: f64) -> TickSnapshot {
        TickSnapshot {
            timestamp,
            tick_count: 1,
            status: VisionStatus::Ok,
            reliability,
            anomaly: 0.019,
            anomaly_integral: 0.0123456,
            policy: PolicyState::Allowed,
            previous_policy: PolicyState::Allowed,
            trust_velocity: 0.0,
            declining: false,
            recovery_debt: 0.0,
            recovery_coeff: 0.10,
            ml_influence_active: true,
            contradiction_detected: false,
            contradiction_count: 0,
            clock_regressions: 0,
            bad_anomaly_values: 0,
            dt: 1.0 / 30.0,
        }
    }

    fn event(start: f64, end: f64) -> ExcursionEvent {
        ExcursionEvent {
            start_ts: start,
            end_ts: end,
            min_reliability: 0.1234,
            dominant_cause: VisionStatus::Frozen,
            cause_histogram: CauseDwell::default(),
            peak_anomaly: 0.456789,
        }
    }

    fn small_recorder(ticks: usize, events: usize) -> SessionRecorder {
        let config = SupervisorConfig {
            tick_capacity: ticks,
            event_capacity: events,
            ..SupervisorConfig::default()
        };
        SessionRecorder::new(&config)
    }

    #[test]
    fn test_tick_csv_format() {
        let r = small_recorder(16, 16);
        r.record_tick(&snapshot(1700000000.5004, 0.987654));
        let (tick_csv, _) = r.export();
        let mut lines = tick_csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "timestamp,reliability,policy_state,anomaly,anomaly_integral"
        );
        assert_eq!(
            lines.next().unwrap(),
            "1700000000.500,0.987654,VISION_ALLOWED,0.019000,0.012346"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_excursion_csv_format() {
        let r = small_recorder(16, 16);
        r.record_event(&event(10.0, 13.5));
        let (_, event_csv) = r.export();
        let mut lines = event_csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "start_ts,end_ts,duration_s,min_reliability,dominant_cause,peak_anomaly"
        );
        assert_eq!(
            lines.next().unwrap(),
            "10.000,13.500,3.500,0.1234,FROZEN,0.456789"
        );
    }

    #[test]
    fn test_ring_buffer_evicts_oldest() {
        let r = small_recorder(3, 16);
        for i in 0..5 {
            r.record_tick(&snapshot(f64::from(i), 1.0));
        }
        assert_eq!(r.tick_count(), 3);
        let (tick_csv, _) = r.export();
        let rows: Vec<&str> = tick_csv.lines().skip(1).collect();
        assert!(rows[0].starts_with("2.000,"));
        assert!(rows[2].starts_with("4.000,"));
    }

    #[test]
    fn test_event_cap_drops_newest() {
        let r = small_recorder(16, 2);
        r.record_event(&event(0.0, 1.0));
        r.record_event(&event(2.0, 3.0));
        r.record_event(&event(4.0, 5.0));
        assert_eq!(r.event_count(), 2);
        assert_eq!(r.dropped_events(), 1);
        let events = r.events();
        assert_eq!(events[0].start_ts, 0.0);
        assert_eq!(events[1].start_ts, 2.0);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let r = small_recorder(16, 16);
        for i in 0..10 {
            r.record_tick(&snapshot(f64::from(i) * 0.1, 1.0));
        }
        let (tick_csv, _) = r.export();
        let stamps: Vec<f64> = tick_csv
            .lines()
            .skip(1)
            .map(|l| l.split(',').next().unwrap().parse().unwrap())
            .collect();
        for pair in stamps.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_reset_clears_everything() {
        let r = small_recorder(16, 16);
        r.record_tick(&snapshot(0.0, 1.0));
        r.record_event(&event(0.0, 1.0));
        r.reset();
        assert_eq!(r.tick_count(), 0);
        assert_eq!(r.event_count(), 0);
        assert_eq!(r.dropped_events(), 0);
        let (tick_csv, event_csv) = r.export();
        assert_eq!(tick_csv, TICK_HEADER);
        assert_eq!(event_csv, EXCURSION_HEADER);
    }
}
