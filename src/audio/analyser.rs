//! Byte spectrum in the style of a browser analyser node.

use std::f32::consts::PI;
use std::fmt;
use std::sync::Arc;

use realfft::{RealFftPlanner, RealToComplex, num_complex::Complex32};

pub const FFT_SIZE: usize = 256;
pub const BIN_COUNT: usize = FFT_SIZE / 2;

pub const MIN_DECIBELS: f32 = -100.0;
pub const MAX_DECIBELS: f32 = -30.0;
pub const SMOOTHING: f32 = 0.8;

/// Windowed FFT with temporal smoothing, producing `0..=255` magnitudes per bin.
pub struct SpectrumAnalyser {
    fft: FftResources,
    window: Vec<f32>,
    smoothed: Vec<f32>,
}

struct FftResources {
    plan: Arc<dyn RealToComplex<f32>>,
    scratch: Vec<Complex32>,
    spectrum: Vec<Complex32>,
    input: Vec<f32>,
}

impl fmt::Debug for SpectrumAnalyser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpectrumAnalyser")
            .field("fft_size", &FFT_SIZE)
            .finish_non_exhaustive()
    }
}

impl Default for SpectrumAnalyser {
    fn default() -> Self {
        Self::new()
    }
}

impl SpectrumAnalyser {
    pub fn new() -> Self {
        let mut planner = RealFftPlanner::<f32>::new();
        let plan = planner.plan_fft_forward(FFT_SIZE);
        let fft = FftResources {
            scratch: plan.make_scratch_vec(),
            spectrum: plan.make_output_vec(),
            input: plan.make_input_vec(),
            plan,
        };
        Self {
            fft,
            window: (0..FFT_SIZE).map(|i| blackman(i, FFT_SIZE)).collect(),
            smoothed: vec![0.0; BIN_COUNT],
        }
    }

    /// Forget the smoothing history.
    pub fn reset(&mut self) {
        self.smoothed.fill(0.0);
    }

    /// Analyse the most recent [`FFT_SIZE`] samples of `block` into `out`.
    ///
    /// Shorter blocks are zero-padded at the front. `out` receives at most [`BIN_COUNT`] bytes.
    pub fn process(&mut self, block: &[f32], out: &mut [u8]) {
        let tail = &block[block.len().saturating_sub(FFT_SIZE)..];
        let pad = FFT_SIZE - tail.len();
        let input = &mut self.fft.input;
        input[..pad].fill(0.0);
        for (i, s) in tail.iter().enumerate() {
            let s = if s.is_finite() { *s } else { 0.0 };
            input[pad + i] = s * self.window[pad + i];
        }

        if let Err(err) = self.fft.plan.process_with_scratch(
            &mut self.fft.input,
            &mut self.fft.spectrum,
            &mut self.fft.scratch,
        ) {
            tracing::debug!(%err, "fft failed, emitting silence");
            out.fill(0);
            return;
        }

        let scale = 1.0 / FFT_SIZE as f32;
        let range = MAX_DECIBELS - MIN_DECIBELS;
        for (k, byte) in out.iter_mut().take(BIN_COUNT).enumerate() {
            let magnitude = self.fft.spectrum[k].norm() * scale;
            let s = SMOOTHING * self.smoothed[k] + (1.0 - SMOOTHING) * magnitude;
            self.smoothed[k] = s;

            let db = if s > 0.0 { 20.0 * s.log10() } else { f32::NEG_INFINITY };
            let scaled = (255.0 / range) * (db - MIN_DECIBELS);
            *byte = scaled.clamp(0.0, 255.0).floor() as u8;
        }
    }
}

fn blackman(index: usize, len: usize) -> f32 {
    const ALPHA: f32 = 0.16;
    let a0 = 0.5 * (1.0 - ALPHA);
    let a1 = 0.5;
    let a2 = 0.5 * ALPHA;
    let x = index as f32 / len as f32;
    a0 - a1 * (2.0 * PI * x).cos() + a2 * (4.0 * PI * x).cos()
}

#[cfg(test)]
#[path = "../../tests/unit/audio/analyser.rs"]
mod tests;
