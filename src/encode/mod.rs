//! Encoding sinks.
//!
//! Sinks consume rendered export frames in order and are driven by
//! [`export_loop`](crate::export_loop).

/// `ffmpeg`-based sinks (MP4/WebM output via system `ffmpeg`).
pub mod ffmpeg;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
