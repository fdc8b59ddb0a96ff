//! loopbrush is a looping generative-drawing engine.
//!
//! Gestures are captured as timestamped strokes, replayed forever on a loop clock and rendered
//! through per-tool procedural brushes that are fully determined by each stroke's seed:
//!
//! - Drive a [`LoopEngine`] with pointer events and one [`LoopEngine::tick`] per frame
//! - Render onto any [`Surface`] ([`CpuSurface`] rasterizes with `vello_cpu`)
//! - Export a whole cycle at a fixed frame rate with [`export_loop`] into a [`FrameSink`]
//! - Persist drawings as [`SessionSnapshot`]s through a [`SessionStore`]
#![forbid(unsafe_code)]

mod assets;
mod audio;
mod camera;
mod clock;
mod config;
mod engine;
mod export;
mod foundation;
mod render;
mod session;
mod stroke;

/// Encoding sinks.
pub mod encode;

pub use crate::foundation::core::{
    Affine, BezPath, DEFAULT_INK, Fps, FrameIndex, FrameRgba, PALETTE, Point, Rect, Rgba8, Vec2,
};
pub use crate::foundation::error::{LoopError, LoopResult};
pub use crate::foundation::geometry::{
    CLOSURE_THRESHOLD, MIN_CLOSED_AREA, centroid, is_closed_shape, polygon_area,
};
pub use crate::foundation::random::SeededRandom;

pub use crate::assets::decode::{DecodedImage, decode_image};
pub use crate::assets::stamps::{StampImage, StampImageStore};
pub use crate::audio::analyser::{BIN_COUNT, FFT_SIZE, SpectrumAnalyser};
pub use crate::audio::pcm::{PcmSpectrumSource, read_f32le_pcm};
pub use crate::audio::resonance::{Resonance, ResonanceSampler, SpectrumSource};
pub use crate::camera::{Camera, CameraModel, MAX_ZOOM, MIN_ZOOM};
pub use crate::clock::loop_clock::{
    Direction, DurationChange, Folded, LoopClock, LoopState, MAX_SPEED, MIN_DURATION_MS,
    MIN_SPEED, fold_loop_time,
};
pub use crate::clock::time_source::{ManualTime, MonotonicTime, TimeSource};
pub use crate::config::{EngineConfig, ExportConfig};
pub use crate::encode::ffmpeg::{Container, FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::sink::{AudioInputConfig, FrameSink, InMemorySink, SinkConfig};
pub use crate::engine::LoopEngine;
pub use crate::export::{
    ExportCancel, ExportOptions, ExportPlan, ExportStats, MAX_EXPORT_FRAMES, export_loop,
};
pub use crate::render::cpu::CpuSurface;
pub use crate::render::pipeline::{
    FrameInput, MAX_SYMMETRY, RenderSettings, render_frame, render_loop, render_overlay,
};
pub use crate::render::surface::{Composite, LineStyle, RecordingSurface, Surface, SurfaceOp};
pub use crate::render::text::FontSource;
pub use crate::render::tools::{ToolEnv, ToolRenderer, compute_alpha, renderer_for};
pub use crate::session::snapshot::SessionSnapshot;
pub use crate::session::store::{JsonDirStore, MemorySessionStore, SessionRecord, SessionStore};
pub use crate::stroke::capture::{
    CaptureEvent, StrokeCapture, ToolSettings, close_region, generate_particles, sanitize_text,
};
pub use crate::stroke::history::StrokeHistory;
pub use crate::stroke::model::{Particle, Stroke, StrokePoint, ToolKind};
