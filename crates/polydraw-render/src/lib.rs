//! Polydraw Render Library
//!
//! Renderer abstraction shared by every drawing backend, plus a tiny-skia
//! raster backend used for PNG snapshots.

mod raster;
mod renderer;

pub use raster::{PngRenderResult, RasterRenderer, encode_png};
pub use renderer::{
    LABEL_FONT_SIZE, LabelKind, RenderContext, RenderResult, Renderer, RendererError,
};
