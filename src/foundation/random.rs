//! Seeded pseudo-random streams.
//!
//! Every stochastic element of a stroke is drawn from a [`SeededRandom`] keyed by the stroke's
//! seed, so replaying a stroke at the same loop time reproduces the same pixels.

/// Upper bound used when deriving a child seed from a parent draw.
const CHILD_SEED_SPAN: f64 = 1_000_000_007.0;

/// Integer-mixing hash generator producing floats in `[0, 1)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeededRandom {
    state: u32,
}

impl SeededRandom {
    pub fn new(seed: u32) -> Self {
        Self {
            state: seed.wrapping_add(0x6d2b_79f5),
        }
    }

    /// Next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        let mut v = self.state;
        v = (v ^ (v >> 15)).wrapping_mul(v | 1);
        v ^= v.wrapping_add((v ^ (v >> 7)).wrapping_mul(v | 61));
        self.state = v;
        f64::from(v ^ (v >> 14)) / 4_294_967_296.0
    }

    /// Uniform value in `[min, max)`.
    pub fn pick_in_range(&mut self, min: f64, max: f64) -> f64 {
        let v = self.next_f64();
        min + v * (max - min)
    }

    /// `value` displaced by up to `amplitude` in either direction.
    pub fn jitter_around(&mut self, value: f64, amplitude: f64) -> f64 {
        value + (self.next_f64() - 0.5) * amplitude * 2.0
    }

    /// Derive an independent stream from this stream's next draw.
    ///
    /// The parent advances by exactly one value, so sub-effects can own a jitter stream without
    /// shifting the parent's remaining sequence by more than that single draw.
    pub fn clone_stream(&mut self) -> Self {
        Self::new(self.next_seed())
    }

    /// Draw a seed suitable for a new stroke.
    pub fn next_seed(&mut self) -> u32 {
        (self.next_f64() * CHILD_SEED_SPAN).floor() as u32
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/random.rs"]
mod tests;
