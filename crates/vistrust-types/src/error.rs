// ─────────────────────────────────────────────────────────────────────
// Failure-Aware Vision — Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for all trust supervisor failures.
///
/// Nothing here is fatal to a session: an `InvalidFrame` skips the tick,
/// everything else surfaces a misconfiguration before the session starts.
#[derive(Error, Debug)]
pub enum TrustError {
    /// Frame rejected before analysis (empty, zero-sized, or length
    /// inconsistent with its declared geometry).
    #[error("invalid frame: {0}")]
    InvalidFrame(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),
}

pub type TrustResult<T> = Result<T, TrustError>;
