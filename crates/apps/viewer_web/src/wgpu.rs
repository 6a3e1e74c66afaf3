#[cfg(target_arch = "wasm32")]
mod imp {
    use ::wgpu::util::DeviceExt;
    use std::borrow::Cow;
    use wasm_bindgen::JsCast;

    use crate::config::ViewerError;
    use crate::geometry::{
        GeoVertex, GlobeUniforms, generate_globe_mesh, generate_graticule_lines,
    };

    #[derive(Debug)]
    pub struct WgpuContext {
        pub _instance: &'static ::wgpu::Instance,
        pub surface: ::wgpu::Surface<'static>,
        pub device: ::wgpu::Device,
        pub queue: ::wgpu::Queue,
        pub config: ::wgpu::SurfaceConfiguration,
        pub _canvas: web_sys::HtmlCanvasElement,
        pub globe_pipeline: ::wgpu::RenderPipeline,
        pub graticule_pipeline: ::wgpu::RenderPipeline,
        pub uniform_buffer: ::wgpu::Buffer,
        pub uniform_bind_group: ::wgpu::BindGroup,
        pub vertex_buffer: ::wgpu::Buffer,
        pub index_buffer: ::wgpu::Buffer,
        pub index_count: u32,
        pub graticule_vertex_buffer: ::wgpu::Buffer,
        pub graticule_vertex_count: u32,
    }

    // Vertices carry (lat, lon); projection and lens happen here so the mesh
    // never changes while dragging. Fragments behind the horizon are dropped.
    const GLOBE_SHADER: &str = r#"
struct Globals {
    // sin(lat0), cos(lat0), lon0, lens flag
    view: vec4<f32>,
    scale: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> globals: Globals;

struct VsOut {
    @builtin(position) pos: vec4<f32>,
    @location(0) facing: f32,
    @location(1) lat_lon: vec2<f32>,
};

fn project(lat_lon: vec2<f32>) -> vec3<f32> {
    let sin_lat0 = globals.view.x;
    let cos_lat0 = globals.view.y;
    let sin_lat = sin(lat_lon.x);
    let cos_lat = cos(lat_lon.x);
    let dlon = lat_lon.y - globals.view.z;
    let sin_dlon = sin(dlon);
    let cos_dlon = cos(dlon);
    return vec3<f32>(
        cos_lat * sin_dlon,
        cos_lat0 * sin_lat - sin_lat0 * cos_lat * cos_dlon,
        sin_lat0 * sin_lat + cos_lat0 * cos_lat * cos_dlon,
    );
}

@vertex
fn vs_main(@location(0) lat_lon: vec2<f32>) -> VsOut {
    let p = project(lat_lon);
    var xy = p.xy;
    if (globals.view.w > 0.5) {
        xy = xy * inverseSqrt(max(1.0 + p.z, 1e-4));
    }

    var out: VsOut;
    out.pos = vec4<f32>(xy * globals.scale.xy, 0.5, 1.0);
    out.facing = p.z;
    out.lat_lon = lat_lon;
    return out;
}

@fragment
fn fs_globe(fs_in: VsOut) -> @location(0) vec4<f32> {
    if (fs_in.facing < 0.0) {
        discard;
    }

    // Ocean blue to polar white, darkened toward the limb.
    let polar = abs(fs_in.lat_lon.x) / 1.5707964;
    let ice = smoothstep(0.75, 0.95, polar);
    let base = mix(vec3<f32>(0.08, 0.35, 0.65), vec3<f32>(0.85, 0.9, 0.95), ice);
    let shade = 0.35 + 0.65 * clamp(fs_in.facing, 0.0, 1.0);
    return vec4<f32>(base * shade, 1.0);
}

@fragment
fn fs_graticule(fs_in: VsOut) -> @location(0) vec4<f32> {
    if (fs_in.facing < 0.0) {
        discard;
    }
    return vec4<f32>(0.65, 0.85, 1.0, 0.6);
}
"#;

    const GEO_VERTEX_LAYOUT: ::wgpu::VertexBufferLayout<'static> = ::wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<GeoVertex>() as ::wgpu::BufferAddress,
        step_mode: ::wgpu::VertexStepMode::Vertex,
        attributes: &[::wgpu::VertexAttribute {
            format: ::wgpu::VertexFormat::Float32x2,
            offset: 0,
            shader_location: 0,
        }],
    };

    #[allow(clippy::too_many_arguments)]
    fn create_pipeline(
        device: &::wgpu::Device,
        layout: &::wgpu::PipelineLayout,
        shader: &::wgpu::ShaderModule,
        format: ::wgpu::TextureFormat,
        label: &str,
        fragment_entry: &str,
        topology: ::wgpu::PrimitiveTopology,
        blend: ::wgpu::BlendState,
    ) -> ::wgpu::RenderPipeline {
        device.create_render_pipeline(&::wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(layout),
            vertex: ::wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[GEO_VERTEX_LAYOUT],
            },
            fragment: Some(::wgpu::FragmentState {
                module: shader,
                entry_point: Some(fragment_entry),
                compilation_options: Default::default(),
                targets: &[Some(::wgpu::ColorTargetState {
                    format,
                    blend: Some(blend),
                    write_mask: ::wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: ::wgpu::PrimitiveState {
                topology,
                strip_index_format: None,
                front_face: ::wgpu::FrontFace::Ccw,
                // Back-facing geometry is discarded per fragment instead.
                cull_mode: None,
                polygon_mode: ::wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: ::wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        })
    }

    pub async fn init_wgpu_from_canvas_id(
        canvas_id: &str,
        graticule_step_deg: f64,
    ) -> Result<WgpuContext, ViewerError> {
        let missing = || ViewerError::CanvasMissing(canvas_id.to_string());
        let window = web_sys::window().ok_or_else(missing)?;
        let document = window.document().ok_or_else(missing)?;
        let canvas_elem = document
            .get_element_by_id(canvas_id)
            .ok_or_else(missing)?
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .map_err(|_| missing())?;

        let width = canvas_elem.width();
        let height = canvas_elem.height();

        // IMPORTANT: `wgpu::Surface` must not outlive its `wgpu::Instance`.
        // The instance is leaked for the lifetime of the app.
        let instance: &'static ::wgpu::Instance = Box::leak(Box::new(::wgpu::Instance::new(
            &::wgpu::InstanceDescriptor {
                backends: ::wgpu::Backends::BROWSER_WEBGPU | ::wgpu::Backends::GL,
                ..Default::default()
            },
        )));

        let surface = instance
            .create_surface(::wgpu::SurfaceTarget::Canvas(canvas_elem.clone()))
            .map_err(|e| ViewerError::Gpu(format!("surface error: {e}")))?;

        let adapter = instance
            .request_adapter(&::wgpu::RequestAdapterOptions {
                power_preference: ::wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| ViewerError::Gpu(format!("adapter error: {e}")))?;

        let (device, queue) = adapter
            .request_device(&::wgpu::DeviceDescriptor {
                label: Some("globe-wgpu-device"),
                required_features: ::wgpu::Features::empty(),
                required_limits: ::wgpu::Limits::downlevel_webgl2_defaults(),
                ..Default::default()
            })
            .await
            .map_err(|e| ViewerError::Gpu(format!("device error: {e}")))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| ViewerError::Gpu("surface reports no formats".to_string()))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(::wgpu::CompositeAlphaMode::Auto);

        let config = ::wgpu::SurfaceConfiguration {
            usage: ::wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            desired_maximum_frame_latency: 2,
            present_mode: ::wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(::wgpu::ShaderModuleDescriptor {
            label: Some("globe-shader"),
            source: ::wgpu::ShaderSource::Wgsl(Cow::Borrowed(GLOBE_SHADER)),
        });

        let uniform_buffer = device.create_buffer(&::wgpu::BufferDescriptor {
            label: Some("globe-uniforms"),
            size: std::mem::size_of::<GlobeUniforms>() as u64,
            usage: ::wgpu::BufferUsages::UNIFORM | ::wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&::wgpu::BindGroupLayoutDescriptor {
                label: Some("globe-uniforms-bgl"),
                entries: &[::wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: ::wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: ::wgpu::BindingType::Buffer {
                        ty: ::wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let uniform_bind_group = device.create_bind_group(&::wgpu::BindGroupDescriptor {
            label: Some("globe-uniforms-bg"),
            layout: &uniform_bind_group_layout,
            entries: &[::wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&::wgpu::PipelineLayoutDescriptor {
            label: Some("globe-pipeline-layout"),
            bind_group_layouts: &[&uniform_bind_group_layout],
            immediate_size: 0,
        });

        let globe_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            config.format,
            "globe-pipeline",
            "fs_globe",
            ::wgpu::PrimitiveTopology::TriangleList,
            ::wgpu::BlendState::REPLACE,
        );

        let graticule_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            config.format,
            "globe-graticule-pipeline",
            "fs_graticule",
            ::wgpu::PrimitiveTopology::LineList,
            ::wgpu::BlendState::ALPHA_BLENDING,
        );

        let (vertices, indices) = generate_globe_mesh(64, 128);
        let vertex_buffer = device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
            label: Some("globe-vertices"),
            contents: bytemuck::cast_slice(&vertices),
            usage: ::wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
            label: Some("globe-indices"),
            contents: bytemuck::cast_slice(&indices),
            usage: ::wgpu::BufferUsages::INDEX,
        });

        let graticule_vertices = generate_graticule_lines(graticule_step_deg);
        let graticule_vertex_buffer =
            device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
                label: Some("globe-graticule-vertices"),
                contents: bytemuck::cast_slice(&graticule_vertices),
                usage: ::wgpu::BufferUsages::VERTEX,
            });

        // Initialize uniforms so the first render doesn't read uninitialized memory.
        let uniforms = GlobeUniforms {
            view: [0.0, 1.0, 0.0, 0.0],
            scale: [1.0, 1.0, 0.0, 0.0],
        };
        queue.write_buffer(&uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        Ok(WgpuContext {
            _instance: instance,
            surface,
            device,
            queue,
            config,
            _canvas: canvas_elem,
            globe_pipeline,
            graticule_pipeline,
            uniform_buffer,
            uniform_bind_group,
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            graticule_vertex_buffer,
            graticule_vertex_count: graticule_vertices.len() as u32,
        })
    }

    pub fn resize_wgpu(ctx: &mut WgpuContext, width: u32, height: u32) {
        ctx.config.width = width.max(1);
        ctx.config.height = height.max(1);
        ctx.surface.configure(&ctx.device, &ctx.config);
    }

    pub fn render_globe(ctx: &WgpuContext, uniforms: &GlobeUniforms) -> Result<(), ViewerError> {
        let frame = ctx
            .surface
            .get_current_texture()
            .map_err(|e| ViewerError::Gpu(format!("surface acquire failed: {e}")))?;
        let view = frame
            .texture
            .create_view(&::wgpu::TextureViewDescriptor::default());

        ctx.queue
            .write_buffer(&ctx.uniform_buffer, 0, bytemuck::bytes_of(uniforms));

        let mut encoder = ctx
            .device
            .create_command_encoder(&::wgpu::CommandEncoderDescriptor {
                label: Some("globe-encoder"),
            });

        {
            let mut rpass = encoder.begin_render_pass(&::wgpu::RenderPassDescriptor {
                label: Some("globe-pass"),
                color_attachments: &[Some(::wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: ::wgpu::Operations {
                        load: ::wgpu::LoadOp::Clear(::wgpu::Color::TRANSPARENT),
                        store: ::wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
                multiview_mask: None,
            });

            rpass.set_bind_group(0, &ctx.uniform_bind_group, &[]);

            rpass.set_pipeline(&ctx.globe_pipeline);
            rpass.set_vertex_buffer(0, ctx.vertex_buffer.slice(..));
            rpass.set_index_buffer(ctx.index_buffer.slice(..), ::wgpu::IndexFormat::Uint16);
            rpass.draw_indexed(0..ctx.index_count, 0, 0..1);

            rpass.set_pipeline(&ctx.graticule_pipeline);
            rpass.set_vertex_buffer(0, ctx.graticule_vertex_buffer.slice(..));
            rpass.draw(0..ctx.graticule_vertex_count, 0..1);
        }

        ctx.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod imp {
    use crate::config::ViewerError;
    use crate::geometry::GlobeUniforms;

    #[derive(Debug, Default)]
    pub struct WgpuContext;

    pub async fn init_wgpu_from_canvas_id(
        _canvas_id: &str,
        _graticule_step_deg: f64,
    ) -> Result<WgpuContext, ViewerError> {
        Err(ViewerError::Gpu(
            "wgpu initialization is only available on wasm32 targets".to_string(),
        ))
    }

    pub fn resize_wgpu(_ctx: &mut WgpuContext, _width: u32, _height: u32) {}

    pub fn render_globe(_ctx: &WgpuContext, _uniforms: &GlobeUniforms) -> Result<(), ViewerError> {
        Err(ViewerError::Gpu(
            "wgpu rendering is only available on wasm32 targets".to_string(),
        ))
    }
}

pub use imp::{WgpuContext, init_wgpu_from_canvas_id, render_globe, resize_wgpu};
