// ─────────────────────────────────────────────────────────────────────
// Failure-Aware Vision — Contradiction Detector
// ─────────────────────────────────────────────────────────────────────
//! Flags ticks where the ML anomaly score is a strong outlier against
//! its own recent per-status distribution while the rule-based
//! classifier says `Ok`: the two channels disagree about the scene.
//!
//! Purely informational. The flag never feeds back into reliability.

use std::collections::VecDeque;

use vistrust_types::VisionStatus;

/// Rolling sample window (≈2 s at 30 Hz).
const BUFFER_CAP: usize = 60;
/// Samples needed before any baseline exists.
const MIN_SAMPLES: usize = 30;
/// Samples of the current status needed for a per-status baseline.
const MIN_STATUS_SAMPLES: usize = 10;
/// Z-score above which an `Ok` tick counts as a contradiction.
const Z_THRESHOLD: f64 = 3.0;
/// Floor on the sample deviation.
const SIGMA_FLOOR: f64 = 1e-3;

/// Rolling z-score outlier detector over `(status, anomaly)` pairs.
#[derive(Default)]
pub struct ContradictionDetector {
    buffer: VecDeque<(VisionStatus, f64)>,
    detected: bool,
    count: u64,
}

impl ContradictionDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn detected(&self) -> bool {
        self.detected
    }

    /// Rising edges observed this session.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Feed one tick. An unavailable anomaly clears the flag and leaves
    /// the baseline untouched.
    pub fn observe(&mut self, status: VisionStatus, anomaly: Option<f64>) {
        let score = match anomaly {
            Some(s) => s,
            None => {
                self.detected = false;
                return;
            }
        };

        self.buffer.push_back((status, score));
        if self.buffer.len() > BUFFER_CAP {
            self.buffer.pop_front();
        }

        if self.buffer.len() < MIN_SAMPLES {
            self.detected = false;
            return;
        }

        let same_status: Vec<f64> = self
            .buffer
            .iter()
            .filter(|(st, _)| *st == status)
            .map(|&(_, s)| s)
            .collect();
        if same_status.len() < MIN_STATUS_SAMPLES {
            self.detected = false;
            return;
        }

        let n = same_status.len() as f64;
        let mean = same_status.iter().sum::<f64>() / n;
        let var = same_status
            .iter()
            .map(|s| (s - mean) * (s - mean))
            .sum::<f64>()
            / (n - 1.0);
        let sigma = var.sqrt().max(SIGMA_FLOOR);
        let z = (score - mean) / sigma;

        if status == VisionStatus::Ok && z > Z_THRESHOLD {
            if !self.detected {
                self.count += 1;
                log::warn!(
                    "contradiction: rules say OK but anomaly {score:.4} is z={z:.2} above baseline {mean:.4}"
                );
            }
            self.detected = true;
        } else {
            self.detected = false;
        }
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
        self.detected = false;
        self.count = 0;
    }
}
