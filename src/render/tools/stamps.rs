use kurbo::Shape as _;

use crate::foundation::core::{Affine, Rect};
use crate::render::surface::{LineStyle, Surface};
use crate::render::tools::ToolEnv;
use crate::stroke::capture::DEFAULT_EMOJI;
use crate::stroke::model::{Stroke, StrokePoint};

pub(crate) fn emoji_font_px(size: f64) -> f64 {
    (size * 2.4).max(12.0)
}

pub(crate) fn text_font_px(size: f64) -> f64 {
    (size * 2.2).max(14.0)
}

/// Glyph at each point with a faint rocking rotation.
pub(crate) fn render_emoji(
    surface: &mut dyn Surface,
    stroke: &Stroke,
    points: &[StrokePoint],
    env: &ToolEnv<'_>,
) {
    let emoji = stroke.emoji.as_deref().unwrap_or(DEFAULT_EMOJI);
    let font_px = emoji_font_px(stroke.size);
    let color = stroke.paint();
    for p in points {
        let rock = (env.time_limit * 0.002 + p.t * 0.01).sin() * 0.03;
        surface.save();
        surface.transform(Affine::translate(p.pos().to_vec2()) * Affine::rotate(stroke.rotation + rock));
        surface.fill_text(emoji, font_px, color);
        surface.restore();
    }
}

pub(crate) fn render_text(
    surface: &mut dyn Surface,
    stroke: &Stroke,
    points: &[StrokePoint],
    _env: &ToolEnv<'_>,
) {
    let Some(text) = stroke.text.as_deref().filter(|t| !t.is_empty()) else {
        return;
    };
    let font_px = text_font_px(stroke.size);
    let color = stroke.paint();
    for p in points {
        surface.save();
        surface.transform(Affine::translate(p.pos().to_vec2()));
        surface.fill_text(text, font_px, color);
        surface.restore();
    }
}

/// Image clipped to a disc, with an optional ring in the stroke colour.
pub(crate) fn render_image(
    surface: &mut dyn Surface,
    stroke: &Stroke,
    points: &[StrokePoint],
    env: &ToolEnv<'_>,
) {
    let Some(image) = stroke.image.as_deref().and_then(|k| env.images.get(k)) else {
        tracing::trace!(key = ?stroke.image, "stamp image not loaded");
        return;
    };
    let r = stroke.size * 1.6;
    let disc = kurbo::Circle::new((0.0, 0.0), r).to_path(0.1);
    let color = stroke.paint();

    for p in points {
        surface.save();
        surface.transform(Affine::translate(p.pos().to_vec2()) * Affine::rotate(stroke.rotation * 0.2));
        surface.save();
        surface.clip(&disc);
        surface.draw_image(image, Rect::new(-r, -r, r, r));
        surface.restore();
        if stroke.outline {
            surface.stroke_path(&disc, &LineStyle::new((stroke.size * 0.12).max(1.5)), color);
        }
        surface.restore();
    }
}
