// ─────────────────────────────────────────────────────────────────────
// Failure-Aware Vision — Supervisor Configuration
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::{TrustError, TrustResult};

/// Runtime configuration for the trust supervisor.
///
/// Every design-time constant lives here with its reference value as the
/// default. The trust dynamics are per second, not per tick: a session
/// running at 15 Hz and one at 60 Hz decay at the same rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupervisorConfig {
    /// Reliability recovery rate under `Ok` (per second), before debt scaling.
    pub recover_rate: f64,
    /// Reliability decay rate under `Frozen` (per second).
    pub frozen_rate: f64,
    /// Reliability decay rate under `Blank` (per second).
    pub blank_rate: f64,
    /// Reliability decay rate under `Corrupted` (per second).
    pub corrupt_rate: f64,

    /// Leak rate of the anomaly integral (fraction per second).
    pub anomaly_leak: f64,
    /// Reliability penalty per unit of anomaly integral (per second).
    pub anomaly_gain: f64,

    /// Upper bound on a single tick's time step (seconds). Long gaps are
    /// treated as this much elapsed dynamics, never more.
    pub dt_max: f64,

    /// Reliability below this gates to `Degraded`; also the excursion
    /// entry threshold.
    pub degraded_below: f64,
    /// Reliability below this gates to `Blocked`.
    pub blocked_below: f64,
    /// An open excursion closes once reliability recovers to this level.
    /// Higher than the entry threshold so marginal recoveries don't flap.
    pub excursion_close: f64,
    /// Trust velocity below `-declining_epsilon` annotates an `Allowed`
    /// snapshot as declining (per second).
    pub declining_epsilon: f64,

    /// Cap on accumulated recovery debt.
    pub debt_max: f64,
    /// How much each unit of debt slows the recovery rate.
    pub debt_gain: f64,
    /// Debt drain rate during `Ok` (per second).
    pub debt_drain: f64,
    /// Floor on the debt-scaled recovery rate (per second).
    pub recovery_min: f64,

    /// Laplacian variance of a sharp frame; lower variance reads blurrier.
    pub blur_var_ref: f64,
    /// Inter-frame mean absolute difference of a live scene.
    pub freeze_diff_ref: f64,
    /// Luminance histogram entropy of a healthy frame (bits).
    pub entropy_ref_bits: f64,
    /// Mean luminance below this classifies `Blank` (0-255 scale).
    pub blank_luma_below: f64,
    /// Inter-frame mean absolute difference below this counts as a frozen
    /// frame (0-255 scale).
    pub freeze_diff_below: f64,
    /// Consecutive low-difference frames required to declare `Frozen`.
    pub freeze_confirm_frames: u32,

    /// Ring-buffer capacity for tick snapshots (18 000 ≈ 10 min at 30 Hz).
    pub tick_capacity: usize,
    /// Retention cap for closed excursion events.
    pub event_capacity: usize,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            recover_rate: 0.10,
            frozen_rate: 0.30,
            blank_rate: 0.60,
            corrupt_rate: 1.00,
            anomaly_leak: 0.5,
            anomaly_gain: 0.15,
            dt_max: 0.5,
            degraded_below: 0.7,
            blocked_below: 0.3,
            excursion_close: 0.95,
            declining_epsilon: 0.02,
            debt_max: 10.0,
            debt_gain: 0.008,
            debt_drain: 0.10,
            recovery_min: 0.03,
            blur_var_ref: 100.0,
            freeze_diff_ref: 20.0,
            entropy_ref_bits: 7.5,
            blank_luma_below: 5.0,
            freeze_diff_below: 1.0,
            freeze_confirm_frames: 5,
            tick_capacity: 18_000,
            event_capacity: 1024,
        }
    }
}

impl SupervisorConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> TrustResult<()> {
        if !(0.0..=1.0).contains(&self.degraded_below) {
            return Err(TrustError::Config(format!(
                "degraded_below must be in [0, 1], got {}",
                self.degraded_below
            )));
        }
        if !(0.0..=1.0).contains(&self.blocked_below) {
            return Err(TrustError::Config(format!(
                "blocked_below must be in [0, 1], got {}",
                self.blocked_below
            )));
        }
        if self.blocked_below >= self.degraded_below {
            return Err(TrustError::Config(format!(
                "blocked_below must be below degraded_below, got {} >= {}",
                self.blocked_below, self.degraded_below
            )));
        }
        if self.excursion_close < self.degraded_below || self.excursion_close > 1.0 {
            return Err(TrustError::Config(format!(
                "excursion_close must be in [degraded_below, 1], got {}",
                self.excursion_close
            )));
        }
        for (name, rate) in [
            ("recover_rate", self.recover_rate),
            ("frozen_rate", self.frozen_rate),
            ("blank_rate", self.blank_rate),
            ("corrupt_rate", self.corrupt_rate),
            ("anomaly_leak", self.anomaly_leak),
            ("anomaly_gain", self.anomaly_gain),
        ] {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(TrustError::Config(format!(
                    "{name} must be a positive finite rate, got {rate}"
                )));
            }
        }
        if !self.dt_max.is_finite() || self.dt_max <= 0.0 {
            return Err(TrustError::Config(format!(
                "dt_max must be > 0, got {}",
                self.dt_max
            )));
        }
        if self.recovery_min <= 0.0 || self.recovery_min > self.recover_rate {
            return Err(TrustError::Config(format!(
                "recovery_min must be in (0, recover_rate], got {}",
                self.recovery_min
            )));
        }
        if self.freeze_confirm_frames == 0 {
            return Err(TrustError::Config(
                "freeze_confirm_frames must be >= 1".to_string(),
            ));
        }
        if self.tick_capacity == 0 || self.event_capacity == 0 {
            return Err(TrustError::Config(
                "tick_capacity and event_capacity must be > 0".to_string(),
            ));
        }
        for (name, v) in [
            ("blur_var_ref", self.blur_var_ref),
            ("freeze_diff_ref", self.freeze_diff_ref),
            ("entropy_ref_bits", self.entropy_ref_bits),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(TrustError::Config(format!(
                    "{name} must be a positive reference value, got {v}"
                )));
            }
        }
        Ok(())
    }

    /// Load from JSON string.
    pub fn from_json(json: &str) -> TrustResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| TrustError::Config(format!("JSON parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}
