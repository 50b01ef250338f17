// ─────────────────────────────────────────────────────────────────────
// Failure-Aware Vision — Signal Metrics
// ─────────────────────────────────────────────────────────────────────
//! The four normalized signal channels and the pixel statistics behind
//! them. All channels map to [0, 1] with 1 = worst; the raw values are
//! kept alongside for telemetry.

use serde::{Deserialize, Serialize};

use vistrust_types::{clamp_unit, SupervisorConfig};

/// Fusion weights for the single-scalar signal score.
const W_BLUR: f64 = 0.35;
const W_BRIGHTNESS: f64 = 0.25;
// Freeze gets the smallest share: a low inter-frame diff false-positives
// on genuinely static scenes.
const W_FREEZE: f64 = 0.15;
const W_ENTROPY: f64 = 0.25;

/// Pre-normalization pixel statistics, retained for telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawSignals {
    /// Variance of the Laplacian response over the luminance plane.
    pub laplacian_var: f64,
    /// Mean luminance on the 0-255 scale.
    pub mean_luminance: f64,
    /// Mean absolute per-pixel difference to the previous frame.
    pub frame_diff: f64,
    /// Shannon entropy of the luminance histogram (bits).
    pub entropy_bits: f64,
}

/// The four normalized channels plus their raw sources.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalMetrics {
    /// 1 − clamp(laplacian_var / V₀): defocus reads high.
    pub blur: f64,
    /// |μ − 128| / 128: both darkness and overexposure read high.
    pub brightness: f64,
    /// 1 − clamp(δ / D₀): a static stream reads high.
    pub freeze: f64,
    /// 1 − clamp(H / H₀): a collapsed histogram reads high.
    pub entropy: f64,
    pub raw: RawSignals,
}

impl SignalMetrics {
    /// Normalize raw pixel statistics against the configured references.
    pub fn from_raw(raw: RawSignals, config: &SupervisorConfig) -> Self {
        Self {
            blur: 1.0 - clamp_unit(raw.laplacian_var / config.blur_var_ref, 0.0, 1.0),
            brightness: clamp_unit((raw.mean_luminance - 128.0).abs() / 128.0, 0.0, 1.0),
            freeze: 1.0 - clamp_unit(raw.frame_diff / config.freeze_diff_ref, 0.0, 1.0),
            entropy: 1.0 - clamp_unit(raw.entropy_bits / config.entropy_ref_bits, 0.0, 1.0),
            raw,
        }
    }

    /// Weighted fusion of the four channels into one scalar in [0, 1].
    ///
    /// Stands in for the autoencoder reconstruction error when no ML
    /// source is attached to a live session.
    pub fn fused_score(&self) -> f64 {
        clamp_unit(
            W_BLUR * self.blur
                + W_BRIGHTNESS * self.brightness
                + W_FREEZE * self.freeze
                + W_ENTROPY * self.entropy,
            0.0,
            1.0,
        )
    }
}

/// Variance of the 4-neighbour Laplacian response over the interior of
/// the luminance plane. Frames thinner than 3 px in either dimension
/// have no interior and read as variance 0 (maximally blurred).
pub fn laplacian_variance(luma: &[f64], width: usize, height: usize) -> f64 {
    if width < 3 || height < 3 {
        return 0.0;
    }
    let n = ((width - 2) * (height - 2)) as f64;
    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let i = y * width + x;
            let response = luma[i - width] + luma[i + width] + luma[i - 1] + luma[i + 1]
                - 4.0 * luma[i];
            sum += response;
            sum_sq += response * response;
        }
    }
    let mean = sum / n;
    (sum_sq / n - mean * mean).max(0.0)
}

/// Shannon entropy of the 256-bin luminance histogram, in bits.
pub fn histogram_entropy(luma: &[f64]) -> f64 {
    if luma.is_empty() {
        return 0.0;
    }
    let mut counts = [0u32; 256];
    for &v in luma {
        let bin = clamp_unit(v, 0.0, 255.0) as usize;
        counts[bin.min(255)] += 1;
    }
    let total = luma.len() as f64;
    let mut entropy = 0.0;
    for &c in &counts {
        if c > 0 {
            let p = f64::from(c) / total;
            entropy -= p * p.log2();
        }
    }
    entropy
}

/// Mean absolute per-pixel difference between two equal-length planes.
pub fn mean_abs_diff(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    if a.is_empty() {
        return 0.0;
    }
    let sum: f64 = a.iter().zip(b.iter()).map(|(&x, &y)| (x - y).abs()).sum();
    sum / a.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SupervisorConfig {
        SupervisorConfig::default()
    }

    #[test]
    fn test_flat_plane_zero_laplacian() {
        let luma = vec![100.0; 25];
        assert!(laplacian_variance(&luma, 5, 5).abs() < 1e-12);
    }

    #[test]
    fn test_textured_plane_positive_laplacian() {
        let luma: Vec<f64> = (0..64).map(|i| if i % 2 == 0 { 0.0 } else { 255.0 }).collect();
        assert!(laplacian_variance(&luma, 8, 8) > 0.0);
    }

    #[test]
    fn test_thin_plane_reads_blurred() {
        let luma = vec![0.0, 255.0, 0.0, 255.0];
        assert_eq!(laplacian_variance(&luma, 2, 2), 0.0);
    }

    #[test]
    fn test_uniform_histogram_max_entropy() {
        let luma: Vec<f64> = (0..256).map(f64::from).collect();
        let h = histogram_entropy(&luma);
        assert!((h - 8.0).abs() < 1e-9, "uniform 256-bin entropy should be 8 bits, got {h}");
    }

    #[test]
    fn test_constant_plane_zero_entropy() {
        let luma = vec![42.0; 100];
        assert!(histogram_entropy(&luma).abs() < 1e-12);
    }

    #[test]
    fn test_mean_abs_diff() {
        let a = vec![0.0, 10.0, 20.0];
        let b = vec![5.0, 10.0, 10.0];
        assert!((mean_abs_diff(&a, &b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_sharp_bright_live_frame_reads_clean() {
        let raw = RawSignals {
            laplacian_var: 400.0,
            mean_luminance: 128.0,
            frame_diff: 25.0,
            entropy_bits: 7.5,
        };
        let m = SignalMetrics::from_raw(raw, &config());
        assert_eq!(m.blur, 0.0);
        assert_eq!(m.brightness, 0.0);
        assert_eq!(m.freeze, 0.0);
        assert_eq!(m.entropy, 0.0);
        assert_eq!(m.fused_score(), 0.0);
    }

    #[test]
    fn test_dark_static_frame_reads_bad() {
        let raw = RawSignals {
            laplacian_var: 0.0,
            mean_luminance: 0.0,
            frame_diff: 0.0,
            entropy_bits: 0.0,
        };
        let m = SignalMetrics::from_raw(raw, &config());
        assert_eq!(m.blur, 1.0);
        assert_eq!(m.brightness, 1.0);
        assert_eq!(m.freeze, 1.0);
        assert_eq!(m.entropy, 1.0);
        assert!((m.fused_score() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_fusion_weights_sum_to_one() {
        assert!((W_BLUR + W_BRIGHTNESS + W_FREEZE + W_ENTROPY - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_raw_values_retained() {
        let raw = RawSignals {
            laplacian_var: 57.3,
            mean_luminance: 91.0,
            frame_diff: 3.4,
            entropy_bits: 6.1,
        };
        let m = SignalMetrics::from_raw(raw, &config());
        assert_eq!(m.raw, raw);
    }
}
