//! Rasterization: the drawing surface contract, the CPU surface, tool renderers and the per-frame
//! pipeline.

pub(crate) mod cpu;
pub(crate) mod pipeline;
pub(crate) mod surface;
pub(crate) mod text;
pub(crate) mod tools;
