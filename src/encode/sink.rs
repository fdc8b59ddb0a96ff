use crate::foundation::core::{Fps, FrameIndex, FrameRgba};
use crate::foundation::error::LoopResult;
use std::path::PathBuf;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
    /// Optional raw PCM soundtrack muxed alongside the frames.
    pub audio: Option<AudioInputConfig>,
}

/// Raw PCM audio input for sinks that support audio encoding.
#[derive(Debug, Clone)]
pub struct AudioInputConfig {
    /// Path to interleaved `f32le` PCM data.
    pub path: PathBuf,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
}

/// Sink contract for consuming export frames.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> LoopResult<()>;
    /// Push one frame in strictly increasing order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRgba) -> LoopResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> LoopResult<()>;
    /// Release resources after a failed or cancelled export. Must be safe to call at any time.
    fn abort(&mut self) {}
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRgba)>,
    finished: bool,
    aborted: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg.clone()
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(FrameIndex, FrameRgba)] {
        &self.frames
    }

    /// `true` once `end` completed.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// `true` if the export gave up after `begin`.
    pub fn is_aborted(&self) -> bool {
        self.aborted
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> LoopResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        self.aborted = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRgba) -> LoopResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> LoopResult<()> {
        self.finished = true;
        Ok(())
    }

    fn abort(&mut self) {
        self.aborted = true;
    }
}
