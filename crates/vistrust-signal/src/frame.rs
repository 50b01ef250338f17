// ─────────────────────────────────────────────────────────────────────
// Failure-Aware Vision — Frame Buffer
// ─────────────────────────────────────────────────────────────────────
//! Owned, immutable frame buffer with a luminance projection.
//!
//! The analyzer is colour-space-agnostic given that projection: 8-bit
//! single-channel frames pass through, 3-channel frames are projected
//! with BT.601 weights, and anything else falls back to a per-pixel
//! channel mean so the metrics stay defined while the classifier flags
//! the frame as corrupted.

use vistrust_types::{TrustError, TrustResult};

/// Channel counts the classifier treats as well-formed.
pub const EXPECTED_CHANNELS: [usize; 2] = [1, 3];

/// An immutable 2-D pixel array with a monotonic timestamp in seconds.
///
/// Frames are ephemeral: read once by the analyzer, kept only as the
/// previous-frame luminance plane until the next call.
#[derive(Debug, Clone)]
pub struct Frame {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<u8>,
    /// Capture timestamp (epoch seconds).
    pub timestamp: f64,
}

impl Frame {
    /// Build a frame from raw interleaved pixel data.
    ///
    /// # Errors
    ///
    /// Returns [`TrustError::InvalidFrame`] when the frame is zero-sized
    /// or the buffer length disagrees with the declared geometry. An
    /// unexpected channel count is NOT an error here; the analyzer
    /// classifies such frames as corrupted instead.
    pub fn new(
        width: usize,
        height: usize,
        channels: usize,
        data: Vec<u8>,
        timestamp: f64,
    ) -> TrustResult<Self> {
        if width == 0 || height == 0 {
            return Err(TrustError::InvalidFrame(format!(
                "zero-sized frame: {width}x{height}"
            )));
        }
        if channels == 0 {
            return Err(TrustError::InvalidFrame("zero channels".to_string()));
        }
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(channels))
            .ok_or_else(|| TrustError::InvalidFrame("geometry overflow".to_string()))?;
        if data.len() != expected {
            return Err(TrustError::InvalidFrame(format!(
                "buffer length {} does not match {width}x{height}x{channels}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
            timestamp,
        })
    }

    /// Single-channel 8-bit frame; the data is already luminance.
    pub fn from_luma(width: usize, height: usize, data: Vec<u8>, timestamp: f64) -> TrustResult<Self> {
        Self::new(width, height, 1, data, timestamp)
    }

    /// Interleaved RGB, 8 bits per channel.
    pub fn from_rgb8(width: usize, height: usize, data: Vec<u8>, timestamp: f64) -> TrustResult<Self> {
        Self::new(width, height, 3, data, timestamp)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn has_expected_channels(&self) -> bool {
        EXPECTED_CHANNELS.contains(&self.channels)
    }

    /// Project the frame to a luminance plane on the 0-255 scale.
    ///
    /// BT.601 for 3-channel frames, identity for single-channel, channel
    /// mean otherwise.
    pub fn luminance(&self) -> Vec<f64> {
        match self.channels {
            1 => self.data.iter().map(|&v| f64::from(v)).collect(),
            3 => self
                .data
                .chunks_exact(3)
                .map(|px| {
                    0.299 * f64::from(px[0]) + 0.587 * f64::from(px[1]) + 0.114 * f64::from(px[2])
                })
                .collect(),
            c => self
                .data
                .chunks_exact(c)
                .map(|px| px.iter().map(|&v| f64::from(v)).sum::<f64>() / c as f64)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_sized_rejected() {
        assert!(Frame::from_luma(0, 4, vec![], 0.0).is_err());
        assert!(Frame::from_luma(4, 0, vec![], 0.0).is_err());
    }

    #[test]
    fn test_length_mismatch_rejected() {
        assert!(Frame::from_luma(4, 4, vec![0; 15], 0.0).is_err());
        assert!(Frame::from_rgb8(4, 4, vec![0; 16], 0.0).is_err());
    }

    #[test]
    fn test_luma_identity() {
        let frame = Frame::from_luma(2, 2, vec![10, 20, 30, 40], 0.0).unwrap();
        assert_eq!(frame.luminance(), vec![10.0, 20.0, 30.0, 40.0]);
    }

    #[test]
    fn test_rgb_projection_bt601() {
        let frame = Frame::from_rgb8(1, 1, vec![255, 0, 0], 0.0).unwrap();
        let luma = frame.luminance();
        assert!((luma[0] - 0.299 * 255.0).abs() < 1e-9);
    }

    #[test]
    fn test_grey_rgb_projects_to_itself() {
        let frame = Frame::from_rgb8(1, 1, vec![128, 128, 128], 0.0).unwrap();
        assert!((frame.luminance()[0] - 128.0).abs() < 1e-6);
    }

    #[test]
    fn test_unexpected_channels_constructible() {
        let frame = Frame::new(2, 1, 2, vec![0, 100, 200, 50], 0.0).unwrap();
        assert!(!frame.has_expected_channels());
        // Channel-mean fallback keeps the projection defined.
        assert_eq!(frame.luminance(), vec![50.0, 125.0]);
    }
}
