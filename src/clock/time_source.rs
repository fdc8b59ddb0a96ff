use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Source of monotonic wall-clock milliseconds for the [`LoopClock`](crate::LoopClock).
pub trait TimeSource: Send {
    fn now_ms(&self) -> f64;
}

/// Real monotonic time measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicTime {
    origin: Instant,
}

impl MonotonicTime {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicTime {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicTime {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Manually driven time, shared between clones.
///
/// Used by tests and by offline drivers that simulate frame callbacks.
#[derive(Debug, Clone, Default)]
pub struct ManualTime {
    bits: Arc<AtomicU64>,
}

impl ManualTime {
    pub fn new(start_ms: f64) -> Self {
        Self {
            bits: Arc::new(AtomicU64::new(start_ms.to_bits())),
        }
    }

    pub fn set(&self, ms: f64) {
        self.bits.store(ms.to_bits(), Ordering::Relaxed);
    }

    pub fn advance(&self, delta_ms: f64) {
        self.set(self.now_ms() + delta_ms);
    }
}

impl TimeSource for ManualTime {
    fn now_ms(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }
}
