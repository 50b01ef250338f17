// ─────────────────────────────────────────────────────────────────────
// Failure-Aware Vision — Rule-Based Signal Analyzer
// ─────────────────────────────────────────────────────────────────────
//! Per-frame classifier and signal extractor.
//!
//! Classification rules, first match wins:
//!   1. Unexpected channel count, or pixel dimensions differ from the
//!      previous frame → `Corrupted`.
//!   2. Mean luminance below the blank threshold → `Blank`.
//!   3. Inter-frame difference near zero for the confirmation run
//!      (current frame plus four preceding) → `Frozen`.
//!   4. Otherwise → `Ok`.
//!
//! On the very first frame no previous exists, so only `Blank` vs `Ok`
//! are considered. Invalid input (zero-sized frames, inconsistent
//! buffers) is rejected at [`Frame`] construction; a caller that skips
//! such a frame leaves the analyzer state untouched.

use vistrust_types::{SupervisorConfig, VisionStatus};

use crate::frame::Frame;
use crate::metrics::{histogram_entropy, laplacian_variance, mean_abs_diff, RawSignals, SignalMetrics};

/// Luminance plane retained between calls.
struct PrevFrame {
    width: usize,
    height: usize,
    luma: Vec<f64>,
}

/// Stateless-except-for-previous-frame signal analyzer.
pub struct SignalAnalyzer {
    config: SupervisorConfig,
    prev: Option<PrevFrame>,
    consecutive_low_diff: u32,
    frame_count: u64,
}

impl SignalAnalyzer {
    pub fn new(config: SupervisorConfig) -> Self {
        Self {
            config,
            prev: None,
            consecutive_low_diff: 0,
            frame_count: 0,
        }
    }

    /// Frames analyzed since construction or the last reset.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Clear the previous-frame slot and the frozen-run counter.
    pub fn reset(&mut self) {
        self.prev = None;
        self.consecutive_low_diff = 0;
        self.frame_count = 0;
    }

    /// Classify one frame and extract its signal channels.
    pub fn analyze(&mut self, frame: &Frame) -> (VisionStatus, SignalMetrics) {
        self.frame_count += 1;

        let (width, height) = frame.dims();
        let luma = frame.luminance();
        let mean_luminance = luma.iter().sum::<f64>() / luma.len() as f64;
        let laplacian_var = laplacian_variance(&luma, width, height);
        let entropy_bits = histogram_entropy(&luma);

        // Inter-frame difference. Undefined on the first frame and across
        // a geometry change; the reference diff stands in so the freeze
        // channel normalizes to zero.
        let shape_mismatch;
        let frame_diff;
        match &self.prev {
            Some(prev) if prev.width == width && prev.height == height => {
                shape_mismatch = false;
                let diff = mean_abs_diff(&prev.luma, &luma);
                if diff < self.config.freeze_diff_below {
                    self.consecutive_low_diff += 1;
                } else {
                    self.consecutive_low_diff = 0;
                }
                frame_diff = diff;
            }
            Some(_) => {
                shape_mismatch = true;
                self.consecutive_low_diff = 0;
                frame_diff = self.config.freeze_diff_ref;
            }
            None => {
                shape_mismatch = false;
                self.consecutive_low_diff = 0;
                frame_diff = self.config.freeze_diff_ref;
            }
        }

        let status = if !frame.has_expected_channels() || shape_mismatch {
            VisionStatus::Corrupted
        } else if mean_luminance < self.config.blank_luma_below {
            VisionStatus::Blank
        } else if self.consecutive_low_diff >= self.config.freeze_confirm_frames {
            VisionStatus::Frozen
        } else {
            VisionStatus::Ok
        };

        if status.is_failure() {
            log::debug!(
                "frame {} classified {status}: mean_luma={mean_luminance:.1} diff={frame_diff:.2}",
                self.frame_count
            );
        }

        self.prev = Some(PrevFrame {
            width,
            height,
            luma,
        });

        let raw = RawSignals {
            laplacian_var,
            mean_luminance,
            frame_diff,
            entropy_bits,
        };
        (status, SignalMetrics::from_raw(raw, &self.config))
    }
}
