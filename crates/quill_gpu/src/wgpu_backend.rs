//! wgpu backend
//!
//! Draw calls are recorded into CPU vertex arrays during the frame and
//! replayed in a single render pass at [`end_frame`](RenderBackend::end_frame).
//! Texture writes go straight to the queue, so they land before the frame's
//! command buffer is submitted.

use std::ops::Range;
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use quill_paint::{Color, Rect};
use slotmap::SlotMap;

use crate::backend::{QuadVertex, RenderBackend, ShadowVertex, TextureFormat, TextureId};
use crate::error::{RendererError, Result};
use crate::shaders::{QUAD_SHADER, SHADOW_SHADER};

/// Initial vertex buffer size in bytes
const INITIAL_VERTEX_BYTES: u64 = 64 * 1024;

const QUAD_ATTRIBUTES: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2, 2 => Float32x4];

const SHADOW_ATTRIBUTES: [wgpu::VertexAttribute; 4] = [
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x2,
        offset: 0,
        shader_location: 0,
    },
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32,
        offset: 8,
        shader_location: 1,
    },
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x4,
        offset: 16,
        shader_location: 2,
    },
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x4,
        offset: 32,
        shader_location: 3,
    },
];

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct ScreenUniform {
    size: [f32; 2],
    _padding: [f32; 2],
}

struct GpuTexture {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    format: TextureFormat,
}

enum DrawCall {
    Quads {
        texture: TextureId,
        vertices: Range<u32>,
    },
    Shadows {
        vertices: Range<u32>,
    },
}

struct VertexBuffer {
    buffer: wgpu::Buffer,
    capacity: u64,
    label: &'static str,
}

impl VertexBuffer {
    fn new(device: &wgpu::Device, label: &'static str) -> Self {
        Self {
            buffer: Self::allocate(device, label, INITIAL_VERTEX_BYTES),
            capacity: INITIAL_VERTEX_BYTES,
            label,
        }
    }

    fn allocate(device: &wgpu::Device, label: &'static str, size: u64) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, data: &[u8]) {
        if data.is_empty() {
            return;
        }
        let needed = data.len() as u64;
        if needed > self.capacity {
            self.capacity = needed.next_power_of_two();
            self.buffer = Self::allocate(device, self.label, self.capacity);
            tracing::debug!("{} grown to {} bytes", self.label, self.capacity);
        }
        queue.write_buffer(&self.buffer, 0, data);
    }
}

struct Pipelines {
    quad_alpha: wgpu::RenderPipeline,
    quad_rgba: wgpu::RenderPipeline,
    shadow: wgpu::RenderPipeline,
}

/// Backend drawing to a window surface through wgpu
pub struct WgpuBackend {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    screen_buffer: wgpu::Buffer,
    screen_bind_group: wgpu::BindGroup,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    pipelines: Pipelines,
    textures: SlotMap<TextureId, GpuTexture>,
    quad_vertices: Vec<QuadVertex>,
    shadow_vertices: Vec<ShadowVertex>,
    calls: Vec<DrawCall>,
    quad_buffer: VertexBuffer,
    shadow_buffer: VertexBuffer,
    clear_color: wgpu::Color,
}

impl WgpuBackend {
    /// Get the preferred backend for the current platform
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
            wgpu::Backends::VULKAN | wgpu::Backends::GL
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
        {
            wgpu::Backends::PRIMARY
        }
    }

    /// Create a backend drawing into `window`
    pub async fn with_surface<W>(window: Arc<W>, size: (u32, u32)) -> Result<Self>
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
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RendererError::AdapterNotFound)?;
        tracing::info!("Using GPU adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Quill Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                        .using_resolution(adapter.limits()),
                    memory_hints: wgpu::MemoryHints::MemoryUsage,
                },
                None,
            )
            .await?;

        let caps = surface.get_capabilities(&adapter);
        tracing::debug!("Surface capabilities - formats: {:?}", caps.formats);
        // theme colors are authored for blending without gamma conversion
        let format = caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .or_else(|| caps.formats.first())
            .copied()
            .ok_or(RendererError::SurfaceUnsupported)?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.0.max(1),
            height: size.1.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            desired_maximum_frame_latency: 2,
            alpha_mode,
            view_formats: vec![],
        };
        surface.configure(&device, &surface_config);
        tracing::debug!("Selected surface format: {:?}", format);

        Self::create(device, queue, surface, surface_config).await
    }

    /// Blocking variant of [`with_surface`](Self::with_surface)
    pub fn with_surface_blocking<W>(window: Arc<W>, size: (u32, u32)) -> Result<Self>
    where
        W: raw_window_handle::HasWindowHandle
            + raw_window_handle::HasDisplayHandle
            + Send
            + Sync
            + 'static,
    {
        pollster::block_on(Self::with_surface(window, size))
    }

    async fn create(
        device: wgpu::Device,
        queue: wgpu::Queue,
        surface: wgpu::Surface<'static>,
        surface_config: wgpu::SurfaceConfiguration,
    ) -> Result<Self> {
        let screen_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Screen Bind Group Layout"),
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
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Texture Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let screen_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Screen Uniform"),
            size: std::mem::size_of::<ScreenUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let screen_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Screen Bind Group"),
            layout: &screen_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: screen_buffer.as_entire_binding(),
            }],
        });

        // pixel aligned quads sample texel centers exactly
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Quad Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipelines = Self::create_pipelines(
            &device,
            &screen_layout,
            &texture_layout,
            surface_config.format,
        );
        if let Some(err) = device.pop_error_scope().await {
            return Err(RendererError::Shader(err.to_string()));
        }

        let quad_buffer = VertexBuffer::new(&device, "Quad Vertex Buffer");
        let shadow_buffer = VertexBuffer::new(&device, "Shadow Vertex Buffer");

        Ok(Self {
            device: Arc::new(device),
            queue: Arc::new(queue),
            surface,
            surface_config,
            screen_buffer,
            screen_bind_group,
            texture_layout,
            sampler,
            pipelines,
            textures: SlotMap::with_key(),
            quad_vertices: Vec::new(),
            shadow_vertices: Vec::new(),
            calls: Vec::new(),
            quad_buffer,
            shadow_buffer,
            clear_color: wgpu::Color::BLACK,
        })
    }

    fn create_pipelines(
        device: &wgpu::Device,
        screen_layout: &wgpu::BindGroupLayout,
        texture_layout: &wgpu::BindGroupLayout,
        format: wgpu::TextureFormat,
    ) -> Pipelines {
        let quad_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Quad Shader"),
            source: wgpu::ShaderSource::Wgsl(QUAD_SHADER.into()),
        });
        let shadow_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Shadow Shader"),
            source: wgpu::ShaderSource::Wgsl(SHADOW_SHADER.into()),
        });

        let quad_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Quad Pipeline Layout"),
            bind_group_layouts: &[screen_layout, texture_layout],
            push_constant_ranges: &[],
        });
        let shadow_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Shadow Pipeline Layout"),
            bind_group_layouts: &[screen_layout],
            push_constant_ranges: &[],
        });

        let color_targets = &[Some(wgpu::ColorTargetState {
            format,
            blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
            write_mask: wgpu::ColorWrites::ALL,
        })];
        let quad_buffers = &[wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &QUAD_ATTRIBUTES,
        }];
        let shadow_buffers = &[wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ShadowVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &SHADOW_ATTRIBUTES,
        }];

        let pipeline = |label: &str,
                        layout: &wgpu::PipelineLayout,
                        module: &wgpu::ShaderModule,
                        buffers: &[wgpu::VertexBufferLayout<'_>],
                        fragment: &str| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(layout),
                vertex: wgpu::VertexState {
                    module,
                    entry_point: Some("vs_main"),
                    buffers,
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module,
                    entry_point: Some(fragment),
                    targets: color_targets,
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
        };

        Pipelines {
            quad_alpha: pipeline(
                "Alpha Quad Pipeline",
                &quad_layout,
                &quad_shader,
                quad_buffers,
                "fs_alpha",
            ),
            quad_rgba: pipeline(
                "RGBA Quad Pipeline",
                &quad_layout,
                &quad_shader,
                quad_buffers,
                "fs_rgba",
            ),
            shadow: pipeline(
                "Shadow Pipeline",
                &shadow_layout,
                &shadow_shader,
                shadow_buffers,
                "fs_main",
            ),
        }
    }

    pub fn device(&self) -> &Arc<wgpu::Device> {
        &self.device
    }

    pub fn queue(&self) -> &Arc<wgpu::Queue> {
        &self.queue
    }

    /// Current surface size in pixels
    pub fn size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    /// Color the surface is cleared to before each frame
    pub fn set_clear_color(&mut self, color: Color) {
        let [r, g, b, a] = color.to_f32_array();
        self.clear_color = wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: a as f64,
        };
    }

    /// Reconfigure the surface for a new window size
    pub fn resize(&mut self, width: u32, height: u32) {
        let (width, height) = (width.max(1), height.max(1));
        if (width, height) == self.size() {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.device, &self.surface_config);
        tracing::debug!("Surface resized to {}x{}", width, height);
    }

    fn present(&mut self) -> Result<()> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let (w, h) = self.size();
        let screen = ScreenUniform {
            size: [w as f32, h as f32],
            _padding: [0.0; 2],
        };
        self.queue
            .write_buffer(&self.screen_buffer, 0, bytemuck::bytes_of(&screen));
        self.quad_buffer.upload(
            &self.device,
            &self.queue,
            bytemuck::cast_slice(&self.quad_vertices),
        );
        self.shadow_buffer.upload(
            &self.device,
            &self.queue,
            bytemuck::cast_slice(&self.shadow_vertices),
        );

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Quill Frame Encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Quill Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_bind_group(0, &self.screen_bind_group, &[]);

            for call in &self.calls {
                match call {
                    DrawCall::Quads { texture, vertices } => {
                        // textures destroyed mid-frame are skipped
                        let Some(tex) = self.textures.get(*texture) else {
                            continue;
                        };
                        let pipeline = match tex.format {
                            TextureFormat::Alpha => &self.pipelines.quad_alpha,
                            TextureFormat::Rgba => &self.pipelines.quad_rgba,
                        };
                        pass.set_pipeline(pipeline);
                        pass.set_bind_group(1, &tex.bind_group, &[]);
                        pass.set_vertex_buffer(0, self.quad_buffer.buffer.slice(..));
                        pass.draw(vertices.clone(), 0..1);
                    }
                    DrawCall::Shadows { vertices } => {
                        pass.set_pipeline(&self.pipelines.shadow);
                        pass.set_vertex_buffer(0, self.shadow_buffer.buffer.slice(..));
                        pass.draw(vertices.clone(), 0..1);
                    }
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

impl RenderBackend for WgpuBackend {
    fn create_texture(&mut self, width: u32, height: u32, format: TextureFormat) -> TextureId {
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Quill Texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: match format {
                TextureFormat::Alpha => wgpu::TextureFormat::R8Unorm,
                TextureFormat::Rgba => wgpu::TextureFormat::Rgba8Unorm,
            },
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Quill Texture Bind Group"),
            layout: &self.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });
        self.textures.insert(GpuTexture {
            texture,
            bind_group,
            format,
        })
    }

    fn write_texture(&mut self, texture: TextureId, region: Rect, data: &[u8]) {
        let Some(tex) = self.textures.get(texture) else {
            tracing::warn!("Write to unknown texture {:?}", texture);
            return;
        };
        if region.is_empty() {
            return;
        }
        let (w, h) = (region.width() as u32, region.height() as u32);
        self.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &tex.texture,
                mip_level: 0,
                origin: wgpu::Origin3d {
                    x: region.min.x as u32,
                    y: region.min.y as u32,
                    z: 0,
                },
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(w * tex.format.bytes_per_pixel() as u32),
                rows_per_image: Some(h),
            },
            wgpu::Extent3d {
                width: w,
                height: h,
                depth_or_array_layers: 1,
            },
        );
    }

    fn destroy_texture(&mut self, texture: TextureId) {
        if let Some(tex) = self.textures.remove(texture) {
            tex.texture.destroy();
        }
    }

    fn begin_frame(&mut self, width: u32, height: u32) {
        self.resize(width, height);
        self.quad_vertices.clear();
        self.shadow_vertices.clear();
        self.calls.clear();
    }

    fn draw_quads(&mut self, texture: TextureId, vertices: &[QuadVertex]) {
        let start = self.quad_vertices.len() as u32;
        self.quad_vertices.extend_from_slice(vertices);
        self.calls.push(DrawCall::Quads {
            texture,
            vertices: start..self.quad_vertices.len() as u32,
        });
    }

    fn draw_shadows(&mut self, vertices: &[ShadowVertex]) {
        let start = self.shadow_vertices.len() as u32;
        self.shadow_vertices.extend_from_slice(vertices);
        self.calls.push(DrawCall::Shadows {
            vertices: start..self.shadow_vertices.len() as u32,
        });
    }

    fn end_frame(&mut self) {
        match self.present() {
            Ok(()) => {}
            Err(RendererError::SurfaceTexture(wgpu::SurfaceError::Lost))
            | Err(RendererError::SurfaceTexture(wgpu::SurfaceError::Outdated)) => {
                tracing::debug!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.surface_config);
            }
            Err(RendererError::SurfaceTexture(wgpu::SurfaceError::Timeout)) => {
                tracing::warn!("Surface texture timed out, frame skipped");
            }
            Err(e) => tracing::error!("Frame presentation failed: {}", e),
        }
    }
}
