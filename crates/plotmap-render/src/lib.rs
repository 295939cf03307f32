//! PlotMap Render Library
//!
//! Renderer abstraction for boundary maps and a tiny-skia implementation
//! that draws into an in-memory pixel surface.

pub mod glyphs;
mod renderer;
mod skia_impl;

pub use renderer::{MapStyle, RenderContext, RenderResult, Renderer, RendererError};
pub use skia_impl::{PngRenderResult, SkiaRenderer};
