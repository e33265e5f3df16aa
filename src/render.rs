use crate::core::{
    BloomSettings, ModelScene, AMBIENT_INTENSITY, CAMERA_FOVY_DEG, CAMERA_ZFAR, CAMERA_ZNEAR,
    KEY_LIGHT_COLOR, KEY_LIGHT_INTENSITY,
};
use glam::{Mat4, Vec3};
use web_sys as web;

mod helpers;
mod mesh;
mod post;
use mesh::ModelResources;
use post::{BloomChain, PostTargets};

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct Globals {
    view_proj: [[f32; 4]; 4],
    eye: [f32; 4],
    ambient: [f32; 4],
    key_color: [f32; 4],
    key_dir: [f32; 4],
}

impl Globals {
    fn for_camera(camera: &CameraView) -> Self {
        let [r, g, b] = KEY_LIGHT_COLOR;
        Self {
            view_proj: camera.view_proj().to_cols_array_2d(),
            eye: camera.eye.extend(1.0).to_array(),
            ambient: [1.0, 1.0, 1.0, AMBIENT_INTENSITY],
            key_color: [r, g, b, KEY_LIGHT_INTENSITY],
            // directional light shining from +Y toward the origin
            key_dir: [0.0, -1.0, 0.0, 0.0],
        }
    }
}

/// Perspective camera matching the scene's fixed lens.
#[derive(Clone, Copy, Debug)]
pub struct CameraView {
    pub eye: Vec3,
    pub target: Vec3,
    pub aspect: f32,
}

impl CameraView {
    pub fn view_proj(&self) -> Mat4 {
        let proj = Mat4::perspective_rh(
            CAMERA_FOVY_DEG.to_radians(),
            self.aspect.max(1e-3),
            CAMERA_ZNEAR,
            CAMERA_ZFAR,
        );
        proj * Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }
}

/// Surface format and alpha mode for a canvas composited over the page.
fn pick_surface_modes(
    caps: &wgpu::SurfaceCapabilities,
) -> anyhow::Result<(wgpu::TextureFormat, wgpu::CompositeAlphaMode)> {
    let format = caps
        .formats
        .iter()
        .copied()
        .find(wgpu::TextureFormat::is_srgb)
        .or_else(|| caps.formats.first().copied())
        .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
    let alpha = if caps
        .alpha_modes
        .contains(&wgpu::CompositeAlphaMode::PreMultiplied)
    {
        wgpu::CompositeAlphaMode::PreMultiplied
    } else {
        caps.alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto)
    };
    Ok((format, alpha))
}

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    _depth_tex: wgpu::Texture,
    depth_view: wgpu::TextureView,

    pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    globals_bg: wgpu::BindGroup,
    object_bgl: wgpu::BindGroupLayout,
    model: Option<ModelResources>,

    targets: PostTargets,
    bloom_chain: BloomChain,
    bloom: Option<BloomSettings>,
}

impl<'a> GpuState<'a> {
    pub async fn new(canvas: &'a web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let (width, height) = (canvas.width().max(1), canvas.height().max(1));

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("no WebGPU adapter for the portal canvas"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("portal_device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!("request_device: {:?}", e))?;

        let (format, alpha_mode) = pick_surface_modes(&surface.get_capabilities(&adapter))?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        let (depth_tex, depth_view) = helpers::create_depth_texture(&device, width, height);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::core::SCENE_WGSL.into()),
        });
        let globals_bgl = helpers::uniform_layout(&device, "globals_bgl");
        let object_bgl = helpers::uniform_layout(&device, "object_bgl");
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pl"),
            bind_group_layouts: &[&globals_bgl, &object_bgl],
            push_constant_ranges: &[],
        });
        // the scene is drawn offscreen and composited by the bloom chain
        let pipeline = helpers::make_scene_pipeline(
            &device,
            &layout,
            &shader,
            mesh::vertex_layout(),
            post::HDR_FORMAT,
        );
        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let globals_bg =
            helpers::uniform_bind_group(&device, "globals_bg", &globals_bgl, &globals_buffer);

        let targets = PostTargets::new(&device, width, height);
        let bloom_chain = BloomChain::new(&device, &targets, format);

        log::info!("[render] WebGPU ready {}x{} {:?}", width, height, format);
        Ok(Self {
            surface,
            device,
            queue,
            config,
            _depth_tex: depth_tex,
            depth_view,
            pipeline,
            globals_buffer,
            globals_bg,
            object_bgl,
            model: None,
            targets,
            bloom_chain,
            bloom: None,
        })
    }

    /// Upload the model's geometry. Replaces any previously uploaded model.
    pub fn set_model(&mut self, scene: &ModelScene) {
        self.model = Some(ModelResources::upload(&self.device, &self.object_bgl, scene));
    }

    /// Switch the glow on (or retune it). It stays on for the rest of the page.
    pub fn set_bloom(&mut self, bloom: BloomSettings) {
        if self.bloom.is_none() {
            log::info!(
                "[render] bloom on (strength {:.2}, radius {:.2}, threshold {:.2})",
                bloom.strength,
                bloom.radius,
                bloom.threshold
            );
        }
        self.bloom = Some(bloom);
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 || (width, height) == (self.config.width, self.config.height)
        {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        (self._depth_tex, self.depth_view) =
            helpers::create_depth_texture(&self.device, width, height);
        self.targets = PostTargets::new(&self.device, width, height);
        self.bloom_chain.retarget(&self.device, &self.targets);
    }

    /// Reconfigure the surface after it was lost or outdated.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Draw one frame. `world` holds the world matrix of every model node.
    pub fn render(&mut self, camera: &CameraView, world: &[Mat4]) -> Result<(), wgpu::SurfaceError> {
        self.queue.write_buffer(
            &self.globals_buffer,
            0,
            bytemuck::bytes_of(&Globals::for_camera(camera)),
        );
        if let Some(model) = &self.model {
            model.write_transforms(&self.queue, world);
        }
        self.bloom_chain
            .write_uniforms(&self.queue, &self.targets, self.bloom);

        let frame = self.surface.get_current_texture()?;
        let output = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("portal_frame"),
            });
        self.encode_scene(&mut encoder);
        self.bloom_chain
            .encode(&mut encoder, &self.targets, &output, self.bloom.is_some());
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    fn encode_scene(&self, encoder: &mut wgpu::CommandEncoder) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("scene_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.targets.scene_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Discard,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        let Some(model) = &self.model else {
            return;
        };
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.globals_bg, &[]);
        model.draw(&mut pass);
    }
}
