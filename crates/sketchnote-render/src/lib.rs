//! Sketchnote Render Library
//!
//! Renderer abstraction and a tiny-skia CPU implementation used for live
//! previews and export rasters.

mod renderer;
mod skia_impl;

pub use renderer::{RenderContext, RenderResult, Renderer, RendererError, css_to_color};
pub use skia_impl::{PngRenderResult, SkiaRenderer};
