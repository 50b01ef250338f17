// ─────────────────────────────────────────────────────────────────────
// Failure-Aware Vision — Synthetic Frame Generation
// ─────────────────────────────────────────────────────────────────────
//! Deterministic synthetic frames for exercising the live pipeline
//! without a camera: a drifting gradient scene, a static scene, blank
//! frames, and noise bursts.

use vistrust_signal::Frame;

/// Minimal xorshift64 RNG for jitter and noise (no external dep).
pub struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 0xDEAD_BEEF_CAFE_BABE } else { seed },
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Approximate standard normal via Box-Muller.
    pub fn next_normal(&mut self) -> f64 {
        let u1 = self.next_f64().max(1e-300);
        let u2 = self.next_f64();
        (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
    }
}

/// Synthetic single-channel frame factory at a fixed geometry.
pub struct FrameSynth {
    width: usize,
    height: usize,
    rng: SimpleRng,
}

impl FrameSynth {
    pub fn new(width: usize, height: usize, seed: u64) -> Self {
        assert!(width > 0 && height > 0, "frame geometry must be non-zero");
        Self {
            width,
            height,
            rng: SimpleRng::new(seed),
        }
    }

    /// Reference processing geometry of the capture path.
    pub fn qvga(seed: u64) -> Self {
        Self::new(320, 240, seed)
    }

    fn build(&self, data: Vec<u8>, timestamp: f64) -> Frame {
        Frame::from_luma(self.width, self.height, data, timestamp)
            .expect("synthetic geometry is always consistent")
    }

    /// A textured scene drifting with `shift`: bright enough to never
    /// read blank, different enough frame-to-frame to never read frozen.
    pub fn moving(&self, shift: u32, timestamp: f64) -> Frame {
        let data = (0..self.height)
            .flat_map(|y| {
                (0..self.width)
                    .map(move |x| (((x * 7 + y * 3) as u32 + shift * 16) % 256) as u8)
            })
            .collect();
        self.build(data, timestamp)
    }

    /// The same textured scene, pinned: replays read frozen.
    pub fn static_scene(&self, timestamp: f64) -> Frame {
        self.moving(0, timestamp)
    }

    /// All-dark frame: reads blank.
    pub fn blank(&self, timestamp: f64) -> Frame {
        self.build(vec![0; self.width * self.height], timestamp)
    }

    /// Uniform random pixels: maximal entropy, never frozen.
    pub fn noisy(&mut self, timestamp: f64) -> Frame {
        let data = (0..self.width * self.height)
            .map(|_| (self.rng.next_u64() & 0xFF) as u8)
            .collect();
        self.build(data, timestamp)
    }
}
