// ─────────────────────────────────────────────────────────────────────
// Failure-Aware Vision — Trust Supervisor Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Type definitions, configuration, and error hierarchy for the
//! vision trust supervisor: the real-time reliability gate that sits
//! between a camera and anything that would act on its output.

pub mod config;
pub mod error;
pub mod snapshot;
pub mod status;

pub use config::SupervisorConfig;
pub use error::{TrustError, TrustResult};
pub use snapshot::{clamp_unit, CauseDwell, ExcursionEvent, PolicyChanged, TickSnapshot};
pub use status::{PolicyState, VisionStatus};
