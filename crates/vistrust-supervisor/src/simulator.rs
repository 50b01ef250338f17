// ─────────────────────────────────────────────────────────────────────
// Failure-Aware Vision — Simulation Sources
// ─────────────────────────────────────────────────────────────────────
//! Operator-driven simulation inputs: a mode-driven status source and a
//! proxy for the autoencoder anomaly channel.
//!
//! The proxy reproduces the score distribution observed from the real
//! model (nominal baseline ≈ 0.019) without any learning framework, so
//! the whole trust pipeline can be exercised deterministically under a
//! fixed seed.

use serde::{Deserialize, Serialize};

use vistrust_types::{clamp_unit, VisionStatus};

use crate::synth::SimpleRng;

/// Operator-selected failure mode for a simulated session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureMode {
    Normal,
    Frozen,
    Blank,
    Corrupted,
}

/// Maps operator controls to a vision status.
///
/// An explicit failure mode always dominates the noise and brightness
/// levels, matching the rule-based classifier's behaviour on real frames.
#[derive(Debug, Clone)]
pub struct VisionSimulator {
    mode: FailureMode,
    noise_level: f64,
    brightness: f64,
}

impl Default for VisionSimulator {
    fn default() -> Self {
        Self {
            mode: FailureMode::Normal,
            noise_level: 0.0,
            brightness: 0.5,
        }
    }
}

impl VisionSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn set_mode(&mut self, mode: FailureMode) {
        self.mode = mode;
    }

    /// Gaussian noise level in [0, 1]; out-of-range input is clamped.
    pub fn set_noise(&mut self, level: f64) {
        self.noise_level = clamp_unit(level, 0.0, 1.0);
    }

    /// Scene brightness in [0, 1]; out-of-range input is clamped.
    pub fn set_brightness(&mut self, level: f64) {
        self.brightness = clamp_unit(level, 0.0, 1.0);
    }

    pub fn mode(&self) -> FailureMode {
        self.mode
    }

    pub fn noise_level(&self) -> f64 {
        self.noise_level
    }

    pub fn brightness(&self) -> f64 {
        self.brightness
    }

    pub fn status(&self) -> VisionStatus {
        match self.mode {
            FailureMode::Normal => VisionStatus::Ok,
            FailureMode::Frozen => VisionStatus::Frozen,
            FailureMode::Blank => VisionStatus::Blank,
            FailureMode::Corrupted => VisionStatus::Corrupted,
        }
    }
}

/// Baseline reconstruction error of the reference model on clean frames.
const BASELINE_NORMAL: f64 = 0.019;
const BASELINE_JITTER: f64 = 0.0005;
/// Scores never report below this floor.
const SCORE_FLOOR: f64 = 0.001;

/// Proxy for the autoencoder anomaly channel.
///
/// Failure modes produce their characteristic score patterns: frozen
/// frames reconstruct well (score drops), blank frames reconstruct
/// almost perfectly, corrupted frames blow the error up.
pub struct ProxyAnomaly {
    rng: SimpleRng,
    ticks: f64,
}

impl ProxyAnomaly {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SimpleRng::new(seed),
            ticks: 0.0,
        }
    }

    pub fn reset(&mut self, seed: u64) {
        self.rng = SimpleRng::new(seed);
        self.ticks = 0.0;
    }

    /// Compute a simulated anomaly score for one tick.
    pub fn compute(&mut self, noise_level: f64, brightness: f64, status: VisionStatus) -> f64 {
        self.ticks += 1.0;

        let base = BASELINE_NORMAL + self.rng.next_normal() * BASELINE_JITTER;
        let noise_contribution = 0.015 * noise_level.powf(1.5);
        let brightness_deviation = (brightness - 0.5).abs();
        let brightness_contribution = 0.008 * brightness_deviation * brightness_deviation;
        // Subtle model-uncertainty drift over time.
        let temporal_drift = 0.001 * (self.ticks * 0.05).sin();

        let score = match status {
            // Frozen frames: reconstruction converges, error drops.
            VisionStatus::Frozen => base * 0.5 + temporal_drift,
            // Blank reconstructs blank almost perfectly.
            VisionStatus::Blank => 0.005 + self.rng.next_normal() * 0.001,
            // Corruption blows the reconstruction error up.
            VisionStatus::Corrupted => {
                base * 3.0 + noise_contribution + self.rng.next_normal() * 0.005
            }
            VisionStatus::Ok => {
                base + noise_contribution + brightness_contribution + temporal_drift
            }
        };
        score.max(SCORE_FLOOR)
    }
}
