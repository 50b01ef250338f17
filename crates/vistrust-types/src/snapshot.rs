// ─────────────────────────────────────────────────────────────────────
// Failure-Aware Vision — Snapshot and Event Records
// ─────────────────────────────────────────────────────────────────────
//! Per-tick state snapshots and the two event records the engine emits:
//! edge-triggered policy transitions and closed trust excursions.

use serde::{Deserialize, Serialize};

use crate::status::{PolicyState, VisionStatus};

/// Clamp a value to [lo, hi], mapping NaN to lo and Inf to the nearest bound.
#[inline]
pub fn clamp_unit(value: f64, lo: f64, hi: f64) -> f64 {
    if value.is_nan() {
        log::warn!("clamp_unit: NaN detected, clamping to {lo:.4}");
        return lo;
    }
    if value.is_infinite() {
        let boundary = if value > 0.0 { hi } else { lo };
        log::warn!("clamp_unit: Inf detected, clamping to {boundary:.4}");
        return boundary;
    }
    value.clamp(lo, hi)
}

/// Full engine state after one tick.
///
/// This is the outbound telemetry unit: one snapshot per tick, totally
/// ordered by the timestamps fed to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickSnapshot {
    /// Timestamp handed to `tick` (epoch seconds).
    pub timestamp: f64,
    /// Ticks since session start or last reset.
    pub tick_count: u64,
    /// Classification driving this tick's dynamics.
    pub status: VisionStatus,
    /// Trust scalar in [0, 1] after this tick.
    pub reliability: f64,
    /// Anomaly input after sanitization (bad values read as 0).
    pub anomaly: f64,
    /// Leaky anomaly integral; zero whenever the status is a failure.
    pub anomaly_integral: f64,
    /// Gate derived from the clamped reliability.
    pub policy: PolicyState,
    /// Gate before this tick, for edge detection downstream.
    pub previous_policy: PolicyState,
    /// d(reliability)/dt over this tick (zero when dt is clamped to zero).
    pub trust_velocity: f64,
    /// True while `Allowed` with trust velocity below the declining
    /// epsilon. Informational only; never gates.
    pub declining: bool,
    /// Accumulated recovery debt from time spent failing below the
    /// degraded threshold.
    pub recovery_debt: f64,
    /// Effective recovery rate after debt scaling (per second).
    pub recovery_coeff: f64,
    /// True iff the status is `Ok` and the anomaly integral is charged.
    pub ml_influence_active: bool,
    /// ML anomaly score is a strong outlier versus its recent per-status
    /// distribution while the rules say `Ok`.
    pub contradiction_detected: bool,
    /// Rising edges of `contradiction_detected` this session.
    pub contradiction_count: u64,
    /// Clock regressions observed (dt clamped to zero).
    pub clock_regressions: u64,
    /// NaN/negative/infinite anomaly values coerced to zero.
    pub bad_anomaly_values: u64,
    /// Time step actually applied, after regression and gap clamping.
    pub dt: f64,
}

/// Edge-triggered policy transition. Emitted exactly once per crossing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolicyChanged {
    pub from: PolicyState,
    pub to: PolicyState,
    pub timestamp: f64,
}

/// Per-status dwell time accumulated inside one excursion (seconds).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CauseDwell {
    pub ok: f64,
    pub frozen: f64,
    pub blank: f64,
    pub corrupted: f64,
}

impl CauseDwell {
    pub fn add(&mut self, status: VisionStatus, dt: f64) {
        match status {
            VisionStatus::Ok => self.ok += dt,
            VisionStatus::Frozen => self.frozen += dt,
            VisionStatus::Blank => self.blank += dt,
            VisionStatus::Corrupted => self.corrupted += dt,
        }
    }

    pub fn get(&self, status: VisionStatus) -> f64 {
        match status {
            VisionStatus::Ok => self.ok,
            VisionStatus::Frozen => self.frozen,
            VisionStatus::Blank => self.blank,
            VisionStatus::Corrupted => self.corrupted,
        }
    }

    /// Failure status with the largest dwell, severity breaking ties.
    /// `Ok` dwell never attributes: an excursion with no failure dwell
    /// was a pure ML dip and reads as `Ok`.
    pub fn dominant(&self) -> VisionStatus {
        let mut best = VisionStatus::Ok;
        let mut best_dwell = 0.0;
        for status in VisionStatus::ALL {
            if !status.is_failure() {
                continue;
            }
            let dwell = self.get(status);
            if dwell > best_dwell
                || (dwell > 0.0 && dwell == best_dwell && status.severity() > best.severity())
            {
                best = status;
                best_dwell = dwell;
            }
        }
        best
    }
}

/// A closed trust excursion: one contiguous dip below the entry threshold,
/// immutable once emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcursionEvent {
    pub start_ts: f64,
    pub end_ts: f64,
    pub min_reliability: f64,
    pub dominant_cause: VisionStatus,
    pub cause_histogram: CauseDwell,
    pub peak_anomaly: f64,
}

impl ExcursionEvent {
    pub fn duration_s(&self) -> f64 {
        self.end_ts - self.start_ts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_nan() {
        assert_eq!(clamp_unit(f64::NAN, 0.0, 1.0), 0.0);
    }

    #[test]
    fn test_clamp_pos_inf() {
        assert_eq!(clamp_unit(f64::INFINITY, 0.0, 1.0), 1.0);
    }

    #[test]
    fn test_clamp_neg_inf() {
        assert_eq!(clamp_unit(f64::NEG_INFINITY, 0.0, 1.0), 0.0);
    }

    #[test]
    fn test_clamp_normal() {
        assert_eq!(clamp_unit(0.42, 0.0, 1.0), 0.42);
        assert_eq!(clamp_unit(1.7, 0.0, 1.0), 1.0);
        assert_eq!(clamp_unit(-0.2, 0.0, 1.0), 0.0);
    }

    #[test]
    fn test_dominant_largest_dwell_wins() {
        let mut dwell = CauseDwell::default();
        dwell.add(VisionStatus::Frozen, 2.0);
        dwell.add(VisionStatus::Blank, 0.5);
        dwell.add(VisionStatus::Ok, 10.0);
        assert_eq!(dwell.dominant(), VisionStatus::Frozen);
    }

    #[test]
    fn test_dominant_tie_breaks_by_severity() {
        let mut dwell = CauseDwell::default();
        dwell.add(VisionStatus::Frozen, 1.5);
        dwell.add(VisionStatus::Corrupted, 1.5);
        assert_eq!(dwell.dominant(), VisionStatus::Corrupted);
    }

    #[test]
    fn test_dominant_pure_ml_dip_reads_ok() {
        let mut dwell = CauseDwell::default();
        dwell.add(VisionStatus::Ok, 4.0);
        assert_eq!(dwell.dominant(), VisionStatus::Ok);
    }

    #[test]
    fn test_excursion_duration() {
        let event = ExcursionEvent {
            start_ts: 10.0,
            end_ts: 13.5,
            min_reliability: 0.2,
            dominant_cause: VisionStatus::Blank,
            cause_histogram: CauseDwell::default(),
            peak_anomaly: 0.08,
        };
        assert!((event.duration_s() - 3.5).abs() < 1e-12);
    }
}
