// ─────────────────────────────────────────────────────────────────────
// Failure-Aware Vision — Signal Analysis
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Pixel-level signal analysis for the vision trust supervisor.
//!
//! Given a decoded frame and the immediately preceding one, this crate
//! produces a rule-based `VisionStatus` plus four normalized signal
//! channels (blur, brightness, freeze, entropy). The analyzer is pure
//! per frame apart from an owned previous-frame slot and the frozen-run
//! counter; it performs no I/O and suspends on nothing.

pub mod analyzer;
pub mod frame;
pub mod metrics;

pub use analyzer::SignalAnalyzer;
pub use frame::Frame;
pub use metrics::{RawSignals, SignalMetrics};
