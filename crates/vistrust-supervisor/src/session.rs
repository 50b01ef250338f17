// ─────────────────────────────────────────────────────────────────────
// Failure-Aware Vision — Session Driver
// ─────────────────────────────────────────────────────────────────────
//! One [`Supervisor`] per session: it owns the engine, analyzer,
//! recorder, simulator, and anomaly source, and is the single writer
//! for all of them. Control commands travel through the same `&mut`
//! serialization as ticks, so a command never lands mid-tick.
//!
//! Two source modes:
//! - **Simulation**: the operator drives a status directly and the
//!   proxy anomaly source stands in for the autoencoder.
//! - **Live**: decoded frames run through the signal analyzer; the
//!   anomaly score comes from an attached ML source, or from the fused
//!   signal score when none is attached.

use serde::{Deserialize, Serialize};

use vistrust_engine::{
    summarize, AnomalySource, ExcursionSummary, SessionRecorder, TickOutcome, TrustEngine,
};
use vistrust_signal::{Frame, SignalAnalyzer};
use vistrust_types::{SupervisorConfig, TrustResult, VisionStatus};

use crate::simulator::{FailureMode, ProxyAnomaly, VisionSimulator};

/// Seed for the proxy anomaly source; fixed so simulated sessions replay
/// byte-identically.
const PROXY_SEED: u64 = 42;

/// Where this session's status and anomaly inputs come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceMode {
    Simulation,
    Live,
}

/// Control commands, serialized with ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Reinitialize the whole session: engine, analyzer, recorder,
    /// simulator, and proxy.
    Reset,
    /// Switch input source. Resets the engine and analyzer for a clean
    /// state; the recorder keeps its history.
    SetSourceMode(SourceMode),
    /// Simulation-mode only; ignored in live mode.
    SetFailureMode(FailureMode),
    /// Simulation-mode only; ignored in live mode.
    SetNoise(f64),
    /// Simulation-mode only; ignored in live mode.
    SetBrightness(f64),
}

/// Per-session composition of the trust pipeline.
pub struct Supervisor {
    engine: TrustEngine,
    analyzer: SignalAnalyzer,
    recorder: SessionRecorder,
    simulator: VisionSimulator,
    proxy: ProxyAnomaly,
    ml_source: Option<Box<dyn AnomalySource>>,
    source_mode: SourceMode,
}

impl Supervisor {
    /// # Errors
    ///
    /// Returns [`vistrust_types::TrustError::Config`] when the
    /// configuration fails validation.
    pub fn new(config: SupervisorConfig) -> TrustResult<Self> {
        let engine = TrustEngine::new(config.clone())?;
        Ok(Self {
            engine,
            analyzer: SignalAnalyzer::new(config.clone()),
            recorder: SessionRecorder::new(&config),
            simulator: VisionSimulator::new(),
            proxy: ProxyAnomaly::new(PROXY_SEED),
            ml_source: None,
            source_mode: SourceMode::Simulation,
        })
    }

    /// Attach an ML anomaly source for live sessions. Replaces the
    /// fused-signal fallback from the next frame on.
    pub fn attach_ml_source(&mut self, source: Box<dyn AnomalySource>) {
        self.ml_source = Some(source);
    }

    pub fn source_mode(&self) -> SourceMode {
        self.source_mode
    }

    pub fn engine(&self) -> &TrustEngine {
        &self.engine
    }

    pub fn recorder(&self) -> &SessionRecorder {
        &self.recorder
    }

    /// Apply one control command between ticks.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Reset => {
                self.engine.reset();
                self.analyzer.reset();
                self.recorder.reset();
                self.simulator.reset();
                self.proxy.reset(PROXY_SEED);
                log::info!("session reset");
            }
            Command::SetSourceMode(mode) => {
                self.engine.reset();
                self.analyzer.reset();
                self.source_mode = mode;
                log::info!("source mode -> {mode:?}");
            }
            Command::SetFailureMode(mode) => {
                if self.source_mode == SourceMode::Simulation {
                    self.simulator.set_mode(mode);
                }
            }
            Command::SetNoise(level) => {
                if self.source_mode == SourceMode::Simulation {
                    self.simulator.set_noise(level);
                }
            }
            Command::SetBrightness(level) => {
                if self.source_mode == SourceMode::Simulation {
                    self.simulator.set_brightness(level);
                }
            }
        }
    }

    /// Advance one simulated tick: status from the simulator, anomaly
    /// from the proxy.
    pub fn tick_simulated(&mut self, timestamp: f64) -> TickOutcome {
        let status = self.simulator.status();
        let anomaly = self.proxy.compute(
            self.simulator.noise_level(),
            self.simulator.brightness(),
            status,
        );
        self.drive(timestamp, status, Some(anomaly))
    }

    /// Advance one live tick from a decoded frame.
    pub fn tick_frame(&mut self, frame: &Frame) -> TickOutcome {
        let (status, metrics) = self.analyzer.analyze(frame);
        let anomaly = match &mut self.ml_source {
            Some(source) => source.score(frame),
            None => Some(metrics.fused_score()),
        };
        self.drive(frame.timestamp, status, anomaly)
    }

    fn drive(&mut self, timestamp: f64, status: VisionStatus, anomaly: Option<f64>) -> TickOutcome {
        let outcome = self.engine.tick(timestamp, status, anomaly);
        self.recorder.record_tick(&outcome.snapshot);
        if let Some(event) = &outcome.excursion {
            self.recorder.record_event(event);
        }
        outcome
    }

    /// Render the session logs as `(tick_csv, excursion_csv)`.
    pub fn export(&self) -> (String, String) {
        self.recorder.export()
    }

    /// Aggregate view over this session's closed excursions.
    pub fn summary(&self) -> ExcursionSummary {
        summarize(&self.recorder.events())
    }
}
