use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::assets::decode::{DecodedImage, decode_image};
use crate::foundation::error::{LoopError, LoopResult};

/// Image ready to be painted by an image-stamp stroke.
#[derive(Clone, Debug)]
pub struct StampImage {
    pixmap: Arc<vello_cpu::Pixmap>,
}

impl StampImage {
    pub fn from_decoded(img: &DecodedImage) -> LoopResult<Self> {
        let w: u16 = img
            .width
            .try_into()
            .map_err(|_| LoopError::validation("stamp image width exceeds u16"))?;
        let h: u16 = img
            .height
            .try_into()
            .map_err(|_| LoopError::validation("stamp image height exceeds u16"))?;
        if img.rgba8_premul.len() != img.width as usize * img.height as usize * 4 {
            return Err(LoopError::validation("stamp image byte length mismatch"));
        }

        let mut may_have_opacities = false;
        let pixels = img
            .rgba8_premul
            .chunks_exact(4)
            .map(|px| {
                may_have_opacities |= px[3] != 255;
                vello_cpu::peniko::color::PremulRgba8 {
                    r: px[0],
                    g: px[1],
                    b: px[2],
                    a: px[3],
                }
            })
            .collect();

        Ok(Self {
            pixmap: Arc::new(vello_cpu::Pixmap::from_parts_with_opacity(
                pixels,
                w,
                h,
                may_have_opacities,
            )),
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> LoopResult<Self> {
        Self::from_decoded(&decode_image(bytes)?)
    }

    pub fn width(&self) -> u32 {
        u32::from(self.pixmap.width())
    }

    pub fn height(&self) -> u32 {
        u32::from(self.pixmap.height())
    }

    pub(crate) fn paint(&self) -> vello_cpu::Image {
        vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::clone(&self.pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        }
    }
}

/// Named stamp images referenced by [`Stroke::image`](crate::Stroke::image).
#[derive(Clone, Debug, Default)]
pub struct StampImageStore {
    images: HashMap<String, StampImage>,
}

impl StampImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, image: StampImage) {
        self.images.insert(key.into(), image);
    }

    pub fn load_bytes(&mut self, key: impl Into<String>, bytes: &[u8]) -> LoopResult<()> {
        let key = key.into();
        let image = StampImage::from_bytes(bytes)?;
        tracing::debug!(%key, w = image.width(), h = image.height(), "stamp image loaded");
        self.images.insert(key, image);
        Ok(())
    }

    /// Load an image file, keyed by its file name.
    pub fn load_path(&mut self, path: &Path) -> LoopResult<String> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read stamp image '{}'", path.display()))?;
        let key = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| LoopError::validation("stamp image path has no file name"))?;
        self.load_bytes(key.clone(), &bytes)?;
        Ok(key)
    }

    pub fn get(&self, key: &str) -> Option<&StampImage> {
        self.images.get(key)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/stamps.rs"]
mod tests;
