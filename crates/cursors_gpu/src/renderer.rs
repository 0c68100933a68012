//! GPU renderer implementation
//!
//! Owns the wgpu surface, device and the single path pipeline. Each frame the
//! draw list is tessellated, uploaded into growable vertex/index buffers and
//! drawn in one render pass.

use std::sync::Arc;

use crate::path::{tessellate_draw_list, PathVertex};
use crate::shaders::PATH_SHADER;
use crate::text::FontFace;
use cursors_core::{Color, DrawList};
use thiserror::Error;

/// Error type for renderer operations
#[derive(Error, Debug)]
pub enum RendererError {
    /// Failed to request GPU adapter
    #[error("No suitable GPU adapter found")]
    AdapterNotFound,
    /// Failed to request GPU device
    #[error("Failed to request GPU device: {0}")]
    DeviceError(#[from] wgpu::RequestDeviceError),
    /// Failed to create surface
    #[error("Failed to create surface: {0}")]
    SurfaceError(#[from] wgpu::CreateSurfaceError),
    /// The surface reports no usable texture format
    #[error("Surface is incompatible with the selected adapter")]
    IncompatibleSurface,
    /// The GPU ran out of memory while acquiring a frame
    #[error("Out of GPU memory")]
    OutOfMemory,
}

/// Result type for renderer operations
pub type Result<T> = std::result::Result<T, RendererError>;

/// Configuration for creating a renderer
#[derive(Clone, Debug)]
pub struct RendererConfig {
    pub present_mode: wgpu::PresentMode,
    /// Override the surface format; by default a non-sRGB format is preferred
    /// so colors are written as authored
    pub texture_format: Option<wgpu::TextureFormat>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            present_mode: wgpu::PresentMode::AutoVsync,
            texture_format: None,
        }
    }
}

/// What happened to a frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameStatus {
    Presented,
    /// No frame was acquired; the surface was reconfigured or timed out
    Skipped,
}

/// Uniform buffer for viewport information
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms {
    viewport_size: [f32; 2],
    _padding: [f32; 2],
}

/// The GPU renderer
pub struct GpuRenderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    uniforms: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    vertices: Option<wgpu::Buffer>,
    indices: Option<wgpu::Buffer>,
    /// Label font; text commands are dropped without one
    font: Option<FontFace>,
}

impl GpuRenderer {
    /// Create a renderer drawing into `window`
    pub async fn with_surface<W>(
        window: Arc<W>,
        size: (u32, u32),
        config: RendererConfig,
    ) -> Result<Self>
    where
        W: raw_window_handle::HasWindowHandle
            + raw_window_handle::HasDisplayHandle
            + Send
            + Sync
            + 'static,
    {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: Self::preferred_backends(),
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RendererError::AdapterNotFound)?;
        tracing::debug!(adapter = ?adapter.get_info(), "selected GPU adapter");

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Cursors GPU Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_defaults()
                        .using_resolution(adapter.limits()),
                    memory_hints: wgpu::MemoryHints::MemoryUsage,
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        tracing::debug!("Surface capabilities - formats: {:?}", surface_caps.formats);

        let format = config
            .texture_format
            .or_else(|| choose_surface_format(&surface_caps.formats))
            .ok_or(RendererError::IncompatibleSurface)?;
        tracing::debug!("Selected texture format: {:?}", format);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.0.max(1),
            height: size.1.max(1),
            present_mode: config.present_mode,
            alpha_mode: wgpu::CompositeAlphaMode::Opaque,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let uniforms = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Viewport Uniforms"),
            size: std::mem::size_of::<Uniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Path Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Path Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniforms.as_entire_binding(),
            }],
        });

        let pipeline = Self::create_pipeline(&device, &bind_group_layout, format);

        let font = match FontFace::system_sans_serif() {
            Ok(font) => {
                tracing::debug!(family = font.family(), "label font ready");
                Some(font)
            }
            Err(e) => {
                tracing::warn!("labels disabled: {}", e);
                None
            }
        };

        tracing::info!(width = size.0, height = size.1, "renderer initialized");

        Ok(Self {
            surface,
            device,
            queue,
            surface_config,
            pipeline,
            uniforms,
            bind_group,
            vertices: None,
            indices: None,
            font,
        })
    }

    /// Blocking variant of [`GpuRenderer::with_surface`]
    pub fn with_surface_blocking<W>(
        window: Arc<W>,
        size: (u32, u32),
        config: RendererConfig,
    ) -> Result<Self>
    where
        W: raw_window_handle::HasWindowHandle
            + raw_window_handle::HasDisplayHandle
            + Send
            + Sync
            + 'static,
    {
        pollster::block_on(Self::with_surface(window, size, config))
    }

    fn preferred_backends() -> wgpu::Backends {
        #[cfg(target_os = "macos")]
        {
            wgpu::Backends::METAL
        }
        #[cfg(target_os = "windows")]
        {
            wgpu::Backends::DX12
        }
        #[cfg(target_os = "linux")]
        {
            wgpu::Backends::VULKAN
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
        {
            wgpu::Backends::PRIMARY
        }
    }

    fn create_pipeline(
        device: &wgpu::Device,
        bind_group_layout: &wgpu::BindGroupLayout,
        format: wgpu::TextureFormat,
    ) -> wgpu::RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Path Shader"),
            source: wgpu::ShaderSource::Wgsl(PATH_SHADER.into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Path Pipeline Layout"),
            bind_group_layouts: &[bind_group_layout],
            push_constant_ranges: &[],
        });

        // PathVertex layout (24 bytes total):
        //   position: [f32; 2] - 8 bytes, offset 0
        //   color: [f32; 4]    - 16 bytes, offset 8
        let vertex_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PathVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 0,
                    shader_location: 0,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x4,
                    offset: 8,
                    shader_location: 1,
                },
            ],
        };

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Path Pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[vertex_layout],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }

    /// Current surface size in physical pixels
    pub fn size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    /// Reconfigure the surface for a new size
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.device, &self.surface_config);
    }

    fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.surface_config);
    }

    fn upload(&mut self, vertices: &[PathVertex], indices: &[u32]) {
        let vertex_bytes: &[u8] = bytemuck::cast_slice(vertices);
        if let Some(size) = grown_buffer_size(
            self.vertices.as_ref().map(|b| b.size()),
            vertex_bytes.len() as u64,
        ) {
            self.vertices = Some(self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Path Vertex Buffer"),
                size,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
        }
        if let Some(vb) = &self.vertices {
            self.queue.write_buffer(vb, 0, vertex_bytes);
        }

        let index_bytes: &[u8] = bytemuck::cast_slice(indices);
        if let Some(size) = grown_buffer_size(
            self.indices.as_ref().map(|b| b.size()),
            index_bytes.len() as u64,
        ) {
            self.indices = Some(self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Path Index Buffer"),
                size,
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
        }
        if let Some(ib) = &self.indices {
            self.queue.write_buffer(ib, 0, index_bytes);
        }
    }

    /// Draw one frame
    ///
    /// A lost or outdated surface is reconfigured and the frame skipped.
    /// Running out of memory is fatal.
    pub fn render(&mut self, list: &DrawList) -> Result<FrameStatus> {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::warn!("surface lost or outdated, reconfiguring");
                self.reconfigure();
                return Ok(FrameStatus::Skipped);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RendererError::OutOfMemory),
            Err(e) => {
                tracing::warn!("failed to acquire frame: {}", e);
                return Ok(FrameStatus::Skipped);
            }
        };

        let mesh = tessellate_draw_list(list, self.font.as_ref());
        let uniforms = Uniforms {
            viewport_size: [
                self.surface_config.width as f32,
                self.surface_config.height as f32,
            ],
            _padding: [0.0; 2],
        };
        self.queue
            .write_buffer(&self.uniforms, 0, bytemuck::bytes_of(&uniforms));
        if !mesh.is_empty() {
            self.upload(&mesh.vertices, &mesh.indices);
        }

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Cursors Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Cursors Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(to_wgpu_color(
                            mesh.clear_color.unwrap_or(Color::BLACK),
                        )),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let (false, Some(vb), Some(ib)) = (mesh.is_empty(), &self.vertices, &self.indices) {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_bind_group(0, &self.bind_group, &[]);
                render_pass.set_vertex_buffer(0, vb.slice(..));
                render_pass.set_index_buffer(ib.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.indices.len() as u32, 0, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(FrameStatus::Presented)
    }
}

/// Prefer a non-sRGB format so authored colors are not gamma-corrected
fn choose_surface_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .find(|f| !f.is_srgb())
        .or_else(|| formats.first())
        .copied()
}

/// New buffer size when `needed` bytes do not fit, rounded up to a power of two
fn grown_buffer_size(current: Option<u64>, needed: u64) -> Option<u64> {
    if needed == 0 {
        return None;
    }
    match current {
        Some(size) if size >= needed => None,
        _ => Some(needed.next_power_of_two().max(wgpu::COPY_BUFFER_ALIGNMENT)),
    }
}

fn to_wgpu_color(color: Color) -> wgpu::Color {
    wgpu::Color {
        r: color.r as f64,
        g: color.g as f64,
        b: color.b as f64,
        a: color.a as f64,
    }
}
