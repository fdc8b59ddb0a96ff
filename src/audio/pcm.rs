use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::audio::analyser::{FFT_SIZE, SpectrumAnalyser};
use crate::audio::resonance::SpectrumSource;
use crate::clock::time_source::{ManualTime, MonotonicTime, TimeSource};
use crate::foundation::error::{LoopError, LoopResult};

/// Read interleaved little-endian `f32` PCM and downmix it to mono.
pub fn read_f32le_pcm(path: &Path, channels: u16) -> LoopResult<Vec<f32>> {
    if channels == 0 {
        return Err(LoopError::validation("pcm channel count must be non-zero"));
    }
    let bytes = std::fs::read(path).with_context(|| format!("read pcm '{}'", path.display()))?;
    if bytes.len() % 4 != 0 {
        return Err(LoopError::validation(format!(
            "pcm file '{}' length is not a multiple of 4 bytes",
            path.display()
        )));
    }
    let samples = bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]));
    Ok(downmix(samples, usize::from(channels)))
}

fn downmix(samples: impl Iterator<Item = f32>, channels: usize) -> Vec<f32> {
    if channels == 1 {
        return samples.collect();
    }
    let interleaved: Vec<f32> = samples.collect();
    interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}

/// Looping mono PCM buffer played against a [`TimeSource`].
pub struct PcmSpectrumSource {
    samples: Arc<[f32]>,
    sample_rate: u32,
    analyser: SpectrumAnalyser,
    time: Box<dyn TimeSource>,
    /// Wall time at which playback (re)started, while playing.
    started_at: Option<f64>,
    offset_ms: f64,
    window: Vec<f32>,
}

impl std::fmt::Debug for PcmSpectrumSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PcmSpectrumSource")
            .field("samples", &self.samples.len())
            .field("sample_rate", &self.sample_rate)
            .field("playing", &self.started_at.is_some())
            .field("offset_ms", &self.offset_ms)
            .finish()
    }
}

impl PcmSpectrumSource {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> LoopResult<Self> {
        Self::with_time_source(samples, sample_rate, Box::new(MonotonicTime::new()))
    }

    pub fn with_time_source(
        samples: Vec<f32>,
        sample_rate: u32,
        time: Box<dyn TimeSource>,
    ) -> LoopResult<Self> {
        if sample_rate == 0 {
            return Err(LoopError::validation("pcm sample_rate must be non-zero"));
        }
        if samples.is_empty() {
            return Err(LoopError::empty_input("pcm buffer has no samples"));
        }
        Ok(Self::from_shared(samples.into(), sample_rate, time))
    }

    fn from_shared(samples: Arc<[f32]>, sample_rate: u32, time: Box<dyn TimeSource>) -> Self {
        Self {
            samples,
            sample_rate,
            analyser: SpectrumAnalyser::new(),
            time,
            started_at: None,
            offset_ms: 0.0,
            window: vec![0.0; FFT_SIZE],
        }
    }

    pub fn play(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(self.time.now_ms());
        }
    }

    pub fn pause(&mut self) {
        self.offset_ms = self.position_ms();
        self.started_at = None;
    }

    /// Toggle playback, returning whether it is now playing.
    pub fn toggle(&mut self) -> bool {
        if self.started_at.is_some() {
            self.pause();
            false
        } else {
            self.play();
            true
        }
    }

    pub fn position_ms(&self) -> f64 {
        match self.started_at {
            Some(start) => self.offset_ms + (self.time.now_ms() - start).max(0.0),
            None => self.offset_ms,
        }
    }

    pub fn duration_ms(&self) -> f64 {
        self.samples.len() as f64 * 1000.0 / f64::from(self.sample_rate)
    }

    fn fill_window(&mut self) {
        let len = self.samples.len();
        let pos = (self.position_ms() * f64::from(self.sample_rate) / 1000.0).floor();
        let end = if pos.is_finite() && pos > 0.0 {
            pos as usize % len
        } else {
            0
        };
        for (i, slot) in self.window.iter_mut().enumerate() {
            // Samples leading up to `end`, wrapping because the buffer loops.
            let back = FFT_SIZE - i;
            let idx = (end + len * (back / len + 1) - back) % len;
            *slot = self.samples[idx];
        }
    }
}

impl SpectrumSource for PcmSpectrumSource {
    fn is_playing(&self) -> bool {
        self.started_at.is_some()
    }

    fn frequency_bytes(&mut self, out: &mut [u8]) {
        self.fill_window();
        self.analyser.process(&self.window, out);
    }

    fn seek_ms(&mut self, ms: f64) {
        if !ms.is_finite() {
            return;
        }
        self.offset_ms = ms.max(0.0);
        if self.started_at.is_some() {
            self.started_at = Some(self.time.now_ms());
        }
    }

    fn fork(&self) -> Option<Box<dyn SpectrumSource>> {
        // Frozen clock: the copy only moves when seeked.
        let mut copy = Self::from_shared(
            Arc::clone(&self.samples),
            self.sample_rate,
            Box::new(ManualTime::new(0.0)),
        );
        copy.play();
        Some(Box::new(copy))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/pcm.rs"]
mod tests;
