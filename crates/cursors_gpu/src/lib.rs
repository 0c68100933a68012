//! Cursors GPU Renderer
//!
//! Rasterizes a [`cursors_core::DrawList`] with wgpu. Every command,
//! including text, is tessellated into triangles with lyon and drawn by a
//! single pipeline.

pub mod path;
pub mod renderer;
pub mod shaders;
pub mod text;

pub use path::{tessellate_draw_list, FrameMesh, PathVertex};
pub use renderer::{FrameStatus, GpuRenderer, RendererConfig, RendererError};
pub use text::{FontError, FontFace, LineExtent};
