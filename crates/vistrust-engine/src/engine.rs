// ─────────────────────────────────────────────────────────────────────
// Failure-Aware Vision — Reliability Dynamics
// ─────────────────────────────────────────────────────────────────────
//! The temporal trust engine. Each tick folds the rule-based status,
//! the ML anomaly score, and elapsed time into the reliability scalar,
//! derives the policy gate, and emits edge-triggered transitions plus
//! closed excursion events.
//!
//! Update order per tick:
//!   1. Clamp `dt` (clock regressions to 0, long gaps to `dt_max`).
//!   2. Sanitize the anomaly input (NaN/negative/infinite read as 0).
//!   3. Base term from the status; anomaly integral only under `Ok`.
//!   4. Clamp reliability to [0, 1].
//!   5. Derive the gate from the clamped scalar alone; edge-detect.
//!   6. Excursion and contradiction bookkeeping.
//!
//! The engine never fails on the value stream and stays live across
//! arbitrary adversarial inputs.

use serde::{Deserialize, Serialize};

use vistrust_types::{
    clamp_unit, ExcursionEvent, PolicyChanged, PolicyState, SupervisorConfig, TickSnapshot,
    TrustResult, VisionStatus,
};

use crate::contradiction::ContradictionDetector;
use crate::excursion::ExcursionTracker;

/// The engine's sole long-lived state. Owned exclusively by the engine;
/// constructed at session start, replaced wholesale on reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReliabilityState {
    pub reliability: f64,
    pub anomaly_integral: f64,
    pub policy: PolicyState,
    pub previous_policy: PolicyState,
    pub recovery_debt: f64,
    pub recovery_coeff: f64,
    pub trust_velocity: f64,
    pub tick_count: u64,
    pub last_timestamp: Option<f64>,
    pub clock_regressions: u64,
    pub bad_anomaly_values: u64,
}

impl ReliabilityState {
    fn initial(config: &SupervisorConfig) -> Self {
        Self {
            reliability: 1.0,
            anomaly_integral: 0.0,
            policy: PolicyState::Allowed,
            previous_policy: PolicyState::Allowed,
            recovery_debt: 0.0,
            recovery_coeff: config.recover_rate,
            trust_velocity: 0.0,
            tick_count: 0,
            last_timestamp: None,
            clock_regressions: 0,
            bad_anomaly_values: 0,
        }
    }
}

/// Everything one tick produces: the snapshot plus any events that
/// edge-triggered on this tick.
#[derive(Debug, Clone)]
pub struct TickOutcome {
    pub snapshot: TickSnapshot,
    pub policy_change: Option<PolicyChanged>,
    pub excursion: Option<ExcursionEvent>,
}

/// Temporal trust engine with bounded ML influence.
pub struct TrustEngine {
    config: SupervisorConfig,
    state: ReliabilityState,
    excursions: ExcursionTracker,
    contradiction: ContradictionDetector,
}

impl TrustEngine {
    /// # Errors
    ///
    /// Returns [`vistrust_types::TrustError::Config`] when the
    /// configuration fails validation.
    pub fn new(config: SupervisorConfig) -> TrustResult<Self> {
        config.validate()?;
        let state = ReliabilityState::initial(&config);
        Ok(Self {
            config,
            state,
            excursions: ExcursionTracker::new(),
            contradiction: ContradictionDetector::new(),
        })
    }

    pub fn config(&self) -> &SupervisorConfig {
        &self.config
    }

    pub fn state(&self) -> &ReliabilityState {
        &self.state
    }

    /// True while a trust excursion is in progress.
    pub fn excursion_open(&self) -> bool {
        self.excursions.is_open()
    }

    /// Reinitialize to session defaults, keeping the configuration.
    pub fn reset(&mut self) {
        self.state = ReliabilityState::initial(&self.config);
        self.excursions.reset();
        self.contradiction.reset();
        log::info!("trust engine reset");
    }

    /// Advance the engine by one tick.
    ///
    /// Never fails: a regressed clock clamps `dt` to zero, a long gap
    /// clamps it to `dt_max`, and a bad anomaly value reads as zero.
    /// An unavailable anomaly (`None`) also reads as zero but is not
    /// counted as a fault.
    pub fn tick(
        &mut self,
        timestamp: f64,
        status: VisionStatus,
        anomaly: Option<f64>,
    ) -> TickOutcome {
        self.state.tick_count += 1;

        let dt = match self.state.last_timestamp {
            None => 0.0,
            Some(last) => {
                let raw = timestamp - last;
                if raw < 0.0 {
                    self.state.clock_regressions += 1;
                    log::warn!(
                        "clock regression: {timestamp:.3} behind {last:.3}, dt clamped to 0"
                    );
                    0.0
                } else {
                    raw.min(self.config.dt_max)
                }
            }
        };
        self.state.last_timestamp = Some(timestamp);

        let sanitized = match anomaly {
            None => 0.0,
            Some(a) if !a.is_finite() || a < 0.0 => {
                self.state.bad_anomaly_values += 1;
                log::warn!("bad anomaly value {a}, coerced to 0");
                0.0
            }
            Some(a) => a,
        };

        let prev_reliability = self.state.reliability;

        match status {
            VisionStatus::Ok => {
                // Drain recovery debt passively, then scale the recovery
                // rate by what remains: severe failures leave slow starts.
                self.state.recovery_debt =
                    (self.state.recovery_debt - self.config.debt_drain * dt).max(0.0);
                self.state.recovery_coeff = (self.config.recover_rate
                    - self.config.debt_gain * self.state.recovery_debt)
                    .max(self.config.recovery_min);
                self.state.reliability += self.state.recovery_coeff * dt;

                // ML-influenced decay, only while the rules agree the
                // frame is healthy. Penalty only; never a credit.
                self.state.anomaly_integral += sanitized * dt;
                self.state.anomaly_integral -=
                    self.config.anomaly_leak * self.state.anomaly_integral * dt;
                self.state.anomaly_integral = self.state.anomaly_integral.max(0.0);
                self.state.reliability -=
                    self.config.anomaly_gain * self.state.anomaly_integral * dt;
            }
            failure => {
                let decay = match failure {
                    VisionStatus::Frozen => self.config.frozen_rate,
                    VisionStatus::Blank => self.config.blank_rate,
                    VisionStatus::Corrupted => self.config.corrupt_rate,
                    VisionStatus::Ok => unreachable!("handled above"),
                };
                let debt_rate = (self.config.degraded_below - self.state.reliability).max(0.0);
                self.state.recovery_debt =
                    (self.state.recovery_debt + debt_rate * dt).min(self.config.debt_max);
                self.state.reliability -= decay * dt;
                // Explicit failures dominate: the ML channel is silenced.
                self.state.anomaly_integral = 0.0;
            }
        }

        self.state.reliability = clamp_unit(self.state.reliability, 0.0, 1.0);
        self.state.trust_velocity = if dt > 0.0 {
            (self.state.reliability - prev_reliability) / dt
        } else {
            0.0
        };

        let previous_policy = self.state.policy;
        let policy = PolicyState::from_reliability(
            self.state.reliability,
            self.config.degraded_below,
            self.config.blocked_below,
        );
        self.state.previous_policy = previous_policy;
        self.state.policy = policy;

        let policy_change = if policy != previous_policy {
            if policy == PolicyState::Blocked {
                log::error!(
                    "policy {previous_policy} -> {policy} at reliability {:.4}",
                    self.state.reliability
                );
            } else {
                log::info!("policy {previous_policy} -> {policy}");
            }
            Some(PolicyChanged {
                from: previous_policy,
                to: policy,
                timestamp,
            })
        } else {
            None
        };

        let declining = policy == PolicyState::Allowed
            && self.state.trust_velocity < -self.config.declining_epsilon;

        let excursion = self.excursions.observe(
            timestamp,
            status,
            self.state.reliability,
            sanitized,
            dt,
            self.config.degraded_below,
            self.config.excursion_close,
        );

        self.contradiction.observe(status, anomaly.map(|_| sanitized));

        let snapshot = TickSnapshot {
            timestamp,
            tick_count: self.state.tick_count,
            status,
            reliability: self.state.reliability,
            anomaly: sanitized,
            anomaly_integral: self.state.anomaly_integral,
            policy,
            previous_policy,
            trust_velocity: self.state.trust_velocity,
            declining,
            recovery_debt: self.state.recovery_debt,
            recovery_coeff: self.state.recovery_coeff,
            ml_influence_active: status == VisionStatus::Ok && self.state.anomaly_integral > 0.0,
            contradiction_detected: self.contradiction.detected(),
            contradiction_count: self.contradiction.count(),
            clock_regressions: self.state.clock_regressions,
            bad_anomaly_values: self.state.bad_anomaly_values,
            dt,
        };

        TickOutcome {
            snapshot,
            policy_change,
            excursion,
        }
    }
}
