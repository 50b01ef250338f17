// ─────────────────────────────────────────────────────────────────────
// Failure-Aware Vision — Anomaly Source Interface
// ─────────────────────────────────────────────────────────────────────
//! The ML anomaly channel, reduced to a scalar-in-time contract.
//!
//! In production an autoencoder scores each frame by reconstruction
//! error behind this trait, either embedded (ONNX) or over RPC to an
//! inference server. The engine treats the score as an opaque sensor:
//! non-negative, unbounded above, no threshold semantics. A source may
//! be unavailable for a tick, in which case its influence is naturally
//! zero.

use vistrust_signal::Frame;

/// Trait for per-frame anomaly scorers.
///
/// Returns a non-negative reconstruction-error style score, or `None`
/// when no score is available for this frame. Nominal input sits around
/// a small positive baseline (≈0.019 for the reference autoencoder).
pub trait AnomalySource: Send {
    fn score(&mut self, frame: &Frame) -> Option<f64>;
}

/// Fixed-score source for tests and dry runs.
pub struct ConstantAnomaly(pub f64);

impl AnomalySource for ConstantAnomaly {
    fn score(&mut self, _frame: &Frame) -> Option<f64> {
        Some(self.0)
    }
}

/// Anomaly source backed by a scoring function pointer.
///
/// Lets an embedding application delegate scoring to whatever hosts the
/// model while the trust pipeline stays self-contained.
type ScoreFn = Box<dyn FnMut(&Frame) -> Option<f64> + Send>;

pub struct ExternalAnomaly {
    score_fn: ScoreFn,
}

impl ExternalAnomaly {
    pub fn new(score_fn: impl FnMut(&Frame) -> Option<f64> + Send + 'static) -> Self {
        Self {
            score_fn: Box::new(score_fn),
        }
    }
}

impl AnomalySource for ExternalAnomaly {
    fn score(&mut self, frame: &Frame) -> Option<f64> {
        (self.score_fn)(frame)
    }
}
