// ─────────────────────────────────────────────────────────────────────
// Failure-Aware Vision — Session Supervisor
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Composition root for the vision trust supervisor.
//!
//! A [`Supervisor`] owns one engine, analyzer, recorder, simulator,
//! and anomaly source per session, and applies control commands through
//! the same `&mut self` serialization as ticks: there is exactly one
//! writer, and at most one tick in flight at any instant.

pub mod session;
pub mod simulator;
pub mod synth;

pub use session::{Command, SourceMode, Supervisor};
pub use simulator::{FailureMode, ProxyAnomaly, VisionSimulator};
pub use synth::{FrameSynth, SimpleRng};
