use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex, FrameRgba};
use crate::foundation::error::{LoopError, LoopResult};
use crate::foundation::math::mul_div255_u16;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

/// Output container, chosen from the output file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Container {
    /// H.264 in MP4.
    Mp4,
    /// VP9 in WebM.
    WebM,
}

impl Container {
    /// Container for `path`, matched case-insensitively on the extension.
    pub fn from_path(path: &Path) -> LoopResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("mp4") => Ok(Self::Mp4),
            Some("webm") => Ok(Self::WebM),
            _ => Err(LoopError::unsupported(format!(
                "cannot infer video container from '{}' (use .mp4 or .webm)",
                path.display()
            ))),
        }
    }

    fn video_args(self) -> &'static [&'static str] {
        match self {
            Self::Mp4 => &[
                "-c:v",
                "libx264",
                "-pix_fmt",
                "yuv420p",
                "-movflags",
                "+faststart",
            ],
            Self::WebM => &[
                "-c:v",
                "libvpx-vp9",
                "-pix_fmt",
                "yuv420p",
                "-b:v",
                "0",
                "-crf",
                "32",
            ],
        }
    }

    fn audio_codec(self) -> &'static str {
        match self {
            Self::Mp4 => "aac",
            Self::WebM => "libopus",
        }
    }
}

/// Options for [`FfmpegSink`].
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output file path; the extension picks the container.
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
    /// Background color used to flatten alpha (RGBA8, straight alpha).
    pub bg_rgba: [u8; 4],
}

impl FfmpegSinkOpts {
    /// Create options for writing to `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            bg_rgba: [0, 0, 0, 255],
        }
    }
}

/// Sink that spawns the system `ffmpeg` and streams raw frames to stdin.
///
/// Audio is optional and provided through `SinkConfig.audio`.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    scratch: Vec<u8>,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
}

impl FfmpegSink {
    /// Create a new sink that streams into `ffmpeg`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            scratch: Vec::new(),
            cfg: None,
            last_idx: None,
        }
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> LoopResult<()> {
        if cfg.fps.num == 0 || cfg.fps.den == 0 {
            return Err(LoopError::validation("fps must be non-zero"));
        }
        if cfg.width == 0 || cfg.height == 0 {
            return Err(LoopError::validation(
                "ffmpeg sink width/height must be non-zero",
            ));
        }
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            return Err(LoopError::validation(
                "ffmpeg sink width/height must be even (required for yuv420p output)",
            ));
        }
        let container = Container::from_path(&self.opts.out_path)?;

        if !is_ffmpeg_on_path() {
            return Err(LoopError::unsupported(
                "ffmpeg is required for video export, but was not found on PATH",
            ));
        }

        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(LoopError::validation(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        if self.opts.overwrite {
            cmd.arg("-y");
        } else {
            cmd.arg("-n");
        }

        // Input: raw RGBA8 frames, flattened to opaque in push_frame.
        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
        ]);
        push_input_fps(&mut cmd, cfg.fps);
        cmd.args(["-i", "pipe:0"]);

        if let Some(audio) = cfg.audio.as_ref() {
            if audio.sample_rate == 0 {
                return Err(LoopError::validation(
                    "audio sample_rate must be non-zero when audio is enabled",
                ));
            }
            if audio.channels == 0 {
                return Err(LoopError::validation(
                    "audio channels must be non-zero when audio is enabled",
                ));
            }
            cmd.args([
                "-f",
                "f32le",
                "-ar",
                &audio.sample_rate.to_string(),
                "-ac",
                &audio.channels.to_string(),
                "-i",
            ])
            .arg(&audio.path)
            .args(container.video_args())
            .args(["-c:a", container.audio_codec(), "-shortest"]);
        } else {
            cmd.arg("-an").args(container.video_args());
        }
        cmd.arg(&self.opts.out_path);

        let mut child = cmd.spawn().map_err(|e| {
            LoopError::unsupported(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| LoopError::encode("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| LoopError::encode("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        tracing::debug!(
            out = %self.opts.out_path.display(),
            ?container,
            width = cfg.width,
            height = cfg.height,
            "ffmpeg started"
        );
        self.scratch = vec![0u8; (cfg.width * cfg.height * 4) as usize];
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRgba) -> LoopResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| LoopError::encode("ffmpeg sink not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(LoopError::encode(
                "ffmpeg sink received out-of-order frame index",
            ));
        }
        self.last_idx = Some(idx);

        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(LoopError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        if frame.data.len() != self.scratch.len() {
            return Err(LoopError::validation(
                "frame.data size mismatch with width*height*4",
            ));
        }

        if frame.premultiplied {
            flatten_premul_over_bg_to_opaque_rgba8(&mut self.scratch, &frame.data, self.opts.bg_rgba)?;
        } else {
            let premul = premultiply(&frame.data);
            flatten_premul_over_bg_to_opaque_rgba8(&mut self.scratch, &premul, self.opts.bg_rgba)?;
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(LoopError::encode("ffmpeg sink is already finalized"));
        };

        use std::io::Write as _;
        stdin.write_all(&self.scratch).map_err(|e| {
            LoopError::encode(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        Ok(())
    }

    fn end(&mut self) -> LoopResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| LoopError::encode("ffmpeg sink not started"))?;

        let status = child
            .wait()
            .map_err(|e| LoopError::encode(format!("failed to wait for ffmpeg to finish: {e}")))?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| LoopError::encode("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| LoopError::encode(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(LoopError::encode(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }

        self.cfg = None;
        Ok(())
    }

    fn abort(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            if let Err(err) = child.kill() {
                tracing::debug!(%err, "ffmpeg already exited");
            }
            let _ = child.wait();
        }
        if let Some(handle) = self.stderr_drain.take() {
            let _ = handle.join();
        }
        self.cfg = None;
        tracing::warn!(out = %self.opts.out_path.display(), "ffmpeg export aborted");
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        if self.child.is_some() {
            self.abort();
        }
    }
}

fn push_input_fps(cmd: &mut Command, fps: Fps) {
    // For rawvideo input, `-r` before `-i` sets the input framerate.
    cmd.args(["-r", &format!("{}/{}", fps.num, fps.den)]);
}

fn premultiply(straight: &[u8]) -> Vec<u8> {
    let mut out = straight.to_vec();
    for px in out.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        for c in &mut px[..3] {
            *c = mul_div255_u16(u16::from(*c), a) as u8;
        }
    }
    out
}

pub(crate) fn flatten_premul_over_bg_to_opaque_rgba8(
    dst: &mut [u8],
    src_premul: &[u8],
    bg_rgba: [u8; 4],
) -> LoopResult<()> {
    if dst.len() != src_premul.len() || !dst.len().is_multiple_of(4) {
        return Err(LoopError::validation(
            "flatten_premul_over_bg_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let bg = [
        u16::from(bg_rgba[0]),
        u16::from(bg_rgba[1]),
        u16::from(bg_rgba[2]),
    ];

    for (d, s) in dst.chunks_exact_mut(4).zip(src_premul.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }
        let inv = 255 - a;
        for i in 0..3 {
            d[i] = (u16::from(s[i]) + mul_div255_u16(bg[i], inv)).min(255) as u8;
        }
        d[3] = 255;
    }

    Ok(())
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> LoopResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
