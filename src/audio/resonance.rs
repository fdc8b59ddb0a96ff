use crate::audio::analyser::BIN_COUNT;

/// Bin ranges averaged into each band.
const BASS_BINS: std::ops::Range<usize> = 0..10;
const MID_BINS: std::ops::Range<usize> = 10..40;
const TREBLE_BINS: std::ops::Range<usize> = 40..100;

pub const DEFAULT_SENSITIVITY: f64 = 0.5;
pub const MAX_SENSITIVITY: f64 = 2.0;

/// Per-frame audio energy in three bands, each normally in `[0, sensitivity]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Resonance {
    pub bass: f64,
    pub mid: f64,
    pub treble: f64,
}

impl Resonance {
    pub const SILENT: Self = Self {
        bass: 0.0,
        mid: 0.0,
        treble: 0.0,
    };

    /// Average the band ranges of an analyser byte spectrum.
    pub fn from_frequency_bytes(bytes: &[u8], sensitivity: f64) -> Self {
        let band = |range: std::ops::Range<usize>| {
            let len = range.len() as f64;
            let sum: u32 = bytes
                .get(range)
                .map(|b| b.iter().map(|&v| u32::from(v)).sum())
                .unwrap_or(0);
            f64::from(sum) / len / 255.0 * sensitivity
        };
        Self {
            bass: band(BASS_BINS),
            mid: band(MID_BINS),
            treble: band(TREBLE_BINS),
        }
    }
}

/// Live frequency data provider.
pub trait SpectrumSource: Send {
    fn is_playing(&self) -> bool;

    /// Fill `out` with the current byte spectrum.
    fn frequency_bytes(&mut self, out: &mut [u8]);

    /// Position playback at `ms`. Used by fixed-rate drivers such as export.
    fn seek_ms(&mut self, _ms: f64) {}

    /// Independent, playing copy positioned only by [`seek_ms`](Self::seek_ms), with fresh
    /// analysis state. `None` when the source cannot be replayed offline.
    fn fork(&self) -> Option<Box<dyn SpectrumSource>> {
        None
    }
}

/// Turns the attached [`SpectrumSource`] into a [`Resonance`] once per frame.
pub struct ResonanceSampler {
    source: Option<Box<dyn SpectrumSource>>,
    sensitivity: f64,
    bins: [u8; BIN_COUNT],
}

impl std::fmt::Debug for ResonanceSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResonanceSampler")
            .field("has_source", &self.source.is_some())
            .field("sensitivity", &self.sensitivity)
            .finish()
    }
}

impl Default for ResonanceSampler {
    fn default() -> Self {
        Self::new(DEFAULT_SENSITIVITY)
    }
}

impl ResonanceSampler {
    pub fn new(sensitivity: f64) -> Self {
        let mut sampler = Self {
            source: None,
            sensitivity: DEFAULT_SENSITIVITY,
            bins: [0; BIN_COUNT],
        };
        sampler.set_sensitivity(sensitivity);
        sampler
    }

    pub fn set_source(&mut self, source: Box<dyn SpectrumSource>) {
        self.source = Some(source);
    }

    pub fn clear_source(&mut self) -> Option<Box<dyn SpectrumSource>> {
        self.source.take()
    }

    pub fn source(&self) -> Option<&(dyn SpectrumSource + 'static)> {
        self.source.as_deref()
    }

    pub fn source_mut(&mut self) -> Option<&mut (dyn SpectrumSource + 'static)> {
        self.source.as_deref_mut()
    }

    pub fn sensitivity(&self) -> f64 {
        self.sensitivity
    }

    /// Clamped to `[0, MAX_SENSITIVITY]`; non-finite input is ignored.
    pub fn set_sensitivity(&mut self, sensitivity: f64) {
        match crate::foundation::math::clamp_finite(sensitivity, 0.0, MAX_SENSITIVITY) {
            Some(s) => self.sensitivity = s,
            None => tracing::warn!(sensitivity, "ignoring non-finite audio sensitivity"),
        }
    }

    /// Current resonance; silent unless a source is attached and playing.
    pub fn sample(&mut self) -> Resonance {
        let Some(source) = self.source.as_mut().filter(|s| s.is_playing()) else {
            return Resonance::SILENT;
        };
        source.frequency_bytes(&mut self.bins);
        Resonance::from_frequency_bytes(&self.bins, self.sensitivity)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/resonance.rs"]
mod tests;
