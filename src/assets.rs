//! Image-stamp sources.

pub(crate) mod decode;
pub(crate) mod stamps;
