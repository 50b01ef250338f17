// ─────────────────────────────────────────────────────────────────────
// Failure-Aware Vision — Trust Engine
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Temporal trust engine for the vision trust supervisor: reliability
//! dynamics, policy gating, excursion attribution, and session recording.
//!
//! The tick hot path performs only arithmetic and fixed-capacity buffer
//! writes; it never blocks and never fails on the value stream.
//!
//! # Trust Invariants
//!
//! 1. **Explicit failures dominate**: on any tick whose status is not
//!    `Ok` the anomaly integral is hard-reset to zero and the base decay
//!    for that status applies unconditionally. The ML channel cannot
//!    mask a rule-based failure.
//!
//! 2. **Bounded ML influence**: the anomaly term only ever *reduces*
//!    reliability. No anomaly value, however small, restores trust;
//!    recovery comes exclusively from `Ok` dwell time.
//!
//! 3. **Time-scaled dynamics**: every increment is proportional to `dt`,
//!    never to a frame count. Variable tick cadence changes resolution,
//!    not trajectory. A single step's effect is bounded by `dt_max`.
//!
//! 4. **Edge-triggered transitions**: policy-changed events are in
//!    bijection with threshold crossings of the reliability sequence.

pub mod anomaly;
pub mod contradiction;
pub mod engine;
pub mod excursion;
pub mod recorder;

pub use anomaly::{AnomalySource, ConstantAnomaly, ExternalAnomaly};
pub use contradiction::ContradictionDetector;
pub use engine::{ReliabilityState, TickOutcome, TrustEngine};
pub use excursion::{summarize, CauseCounts, ExcursionSummary, ExcursionTracker};
pub use recorder::SessionRecorder;
