//! Audio reactivity: spectrum analysis and per-frame band resonance.

pub(crate) mod analyser;
pub(crate) mod pcm;
pub(crate) mod resonance;
