use crate::foundation::error::{LoopError, LoopResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Index of a frame produced by a fixed-rate sampler (export).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    pub fn new(num: u32, den: u32) -> LoopResult<Self> {
        if den == 0 {
            return Err(LoopError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(LoopError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Wall-clock length of one frame in milliseconds.
    pub fn frame_interval_ms(self) -> f64 {
        1000.0 * f64::from(self.den) / f64::from(self.num)
    }

    pub fn frames_to_ms(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_interval_ms()
    }
}

/// Straight-alpha RGBA8 colour as authored by the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Default ink colour, also used when a stroke carries an unparseable colour.
pub const DEFAULT_INK: Rgba8 = Rgba8::rgb(0x1e, 0x29, 0x3b);

/// Preset palette offered by the tool chrome.
pub const PALETTE: [&str; 7] = [
    "#1e293b", "#0ea5e9", "#10b981", "#f59e0b", "#ef4444", "#a855f7", "#facc15",
];

impl Rgba8 {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (leading `#` optional, case-insensitive).
    pub fn parse_hex(s: &str) -> LoopResult<Self> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if !s.is_ascii() {
            return Err(LoopError::validation(format!("invalid hex colour \"{s}\"")));
        }

        fn hex_byte(pair: &str) -> LoopResult<u8> {
            u8::from_str_radix(pair, 16)
                .map_err(|_| LoopError::validation(format!("invalid hex byte \"{pair}\"")))
        }

        match s.len() {
            3 => {
                let nibble = |i: usize| hex_byte(&s[i..i + 1]).map(|v| v * 17);
                Ok(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            6 => Ok(Self::rgb(
                hex_byte(&s[0..2])?,
                hex_byte(&s[2..4])?,
                hex_byte(&s[4..6])?,
            )),
            8 => Ok(Self {
                r: hex_byte(&s[0..2])?,
                g: hex_byte(&s[2..4])?,
                b: hex_byte(&s[4..6])?,
                a: hex_byte(&s[6..8])?,
            }),
            _ => Err(LoopError::validation(
                "hex colour must be #RGB, #RRGGBB or #RRGGBBAA",
            )),
        }
    }

    /// Parse a stroke colour, falling back to [`DEFAULT_INK`].
    pub fn parse_or_default(s: &str) -> Self {
        Self::parse_hex(s).unwrap_or(DEFAULT_INK)
    }

    /// Scale the alpha channel by `alpha` (clamped to `[0, 1]`).
    pub fn with_alpha(self, alpha: f32) -> Self {
        let alpha = if alpha.is_finite() {
            alpha.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            a: (f32::from(self.a) * alpha).round() as u8,
            ..self
        }
    }

    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl serde::Serialize for Rgba8 {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Rgba8 {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// A rendered frame as tightly packed, row-major RGBA8 bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRgba {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRgba {
    /// Convert to straight alpha, e.g. before writing a PNG.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if !self.premultiplied {
            return out;
        }
        for px in out.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        out
    }

    /// Stable FNV-1a digest of the pixel bytes.
    pub fn fingerprint(&self) -> u64 {
        let mut h = crate::foundation::math::Fnv1a64::new_default();
        h.write_u64(u64::from(self.width));
        h.write_u64(u64::from(self.height));
        h.write_bytes(&self.data);
        h.finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
