// ─────────────────────────────────────────────────────────────────────
// Failure-Aware Vision — Status and Policy Variants
// ─────────────────────────────────────────────────────────────────────
//! Closed variant sets for the per-frame classification and the policy
//! gate. Both are deliberately tagged enums, not open hierarchies: the
//! severity ordering is a property of the variant itself.

use serde::{Deserialize, Serialize};

/// Per-frame classification produced by the signal analyzer.
///
/// Strict priority order when multiple conditions match:
/// `Corrupted > Blank > Frozen > Ok`. The most severe explicit failure
/// wins, so a shape mismatch dominates darkness, which dominates staleness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisionStatus {
    Ok,
    Frozen,
    Blank,
    Corrupted,
}

impl VisionStatus {
    pub const ALL: [VisionStatus; 4] = [
        VisionStatus::Ok,
        VisionStatus::Frozen,
        VisionStatus::Blank,
        VisionStatus::Corrupted,
    ];

    /// Severity rank used for cause-attribution tie-breaks. Higher wins.
    pub fn severity(self) -> u8 {
        match self {
            VisionStatus::Ok => 0,
            VisionStatus::Frozen => 1,
            VisionStatus::Blank => 2,
            VisionStatus::Corrupted => 3,
        }
    }

    /// Tag name used in the excursion log.
    pub fn as_str(self) -> &'static str {
        match self {
            VisionStatus::Ok => "OK",
            VisionStatus::Frozen => "FROZEN",
            VisionStatus::Blank => "BLANK",
            VisionStatus::Corrupted => "CORRUPTED",
        }
    }

    pub fn is_failure(self) -> bool {
        self != VisionStatus::Ok
    }
}

impl std::fmt::Display for VisionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discrete actuation gate derived from reliability alone.
///
/// No hysteresis: thresholds are sharp so the gate stays deterministic
/// and auditable. Downstream consumers may debounce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyState {
    Allowed,
    Degraded,
    Blocked,
}

impl PolicyState {
    /// Derive the gate from clamped reliability and the two thresholds.
    ///
    /// This is the entire gating function; the engine adds nothing to it.
    pub fn from_reliability(reliability: f64, degraded_below: f64, blocked_below: f64) -> Self {
        if reliability >= degraded_below {
            PolicyState::Allowed
        } else if reliability >= blocked_below {
            PolicyState::Degraded
        } else {
            PolicyState::Blocked
        }
    }

    /// Wire name used in the tick log.
    pub fn as_str(self) -> &'static str {
        match self {
            PolicyState::Allowed => "VISION_ALLOWED",
            PolicyState::Degraded => "VISION_DEGRADED",
            PolicyState::Blocked => "VISION_BLOCKED",
        }
    }
}

impl std::fmt::Display for PolicyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
