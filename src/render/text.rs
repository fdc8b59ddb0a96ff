use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{LoopError, LoopResult};

/// RGBA8 brush colour carried through Parley layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TextBrush {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

/// Raw font file shared between surfaces (display and export).
#[derive(Clone, Debug)]
pub struct FontSource {
    bytes: Arc<Vec<u8>>,
}

impl FontSource {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Arc::new(bytes),
        }
    }

    pub fn from_path(path: &Path) -> LoopResult<Self> {
        let bytes = std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        Ok(Self::from_bytes(bytes))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Parley contexts bound to a single registered font family.
pub(crate) struct TextShaper {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrush>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
}

impl std::fmt::Debug for TextShaper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextShaper")
            .field("family_name", &self.family_name)
            .finish_non_exhaustive()
    }
}

impl TextShaper {
    pub(crate) fn new(source: &FontSource) -> LoopResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(source.bytes().to_vec()),
            None,
        );
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| LoopError::validation("no font families registered from font bytes"))?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| LoopError::validation("registered font family has no name"))?
            .to_string();

        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(source.bytes().to_vec()),
            0,
        );

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font,
        })
    }

    pub(crate) fn font(&self) -> &vello_cpu::peniko::FontData {
        &self.font
    }

    /// Shape a single unbroken line of text.
    pub(crate) fn layout_line(
        &mut self,
        text: &str,
        size_px: f32,
        brush: TextBrush,
    ) -> LoopResult<parley::Layout<TextBrush>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(LoopError::validation("font size must be finite and > 0"));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrush> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}
