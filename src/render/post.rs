use crate::core::BloomSettings;

use super::helpers;

/// Format of the offscreen scene and the bloom buffers.
pub(crate) const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct PostUniforms {
    texel: [f32; 2],
    blur_dir: [f32; 2],
    strength: f32,
    radius: f32,
    threshold: f32,
    _pad: f32,
}

/// Offscreen colour targets: the scene at full size and two half-size
/// ping-pong buffers for the glow.
pub(crate) struct PostTargets {
    _scene_tex: wgpu::Texture,
    pub(crate) scene_view: wgpu::TextureView,
    _glow_a: wgpu::Texture,
    glow_a_view: wgpu::TextureView,
    _glow_b: wgpu::Texture,
    glow_b_view: wgpu::TextureView,
    full: (u32, u32),
    half: (u32, u32),
}

impl PostTargets {
    pub(crate) fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let usage = wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING;
        let full = (width.max(1), height.max(1));
        let half = ((full.0 / 2).max(1), (full.1 / 2).max(1));
        let (scene_tex, scene_view) =
            helpers::create_target(device, "scene_hdr", full, HDR_FORMAT, usage);
        let (glow_a, glow_a_view) = helpers::create_target(device, "glow_a", half, HDR_FORMAT, usage);
        let (glow_b, glow_b_view) = helpers::create_target(device, "glow_b", half, HDR_FORMAT, usage);
        Self {
            _scene_tex: scene_tex,
            scene_view,
            _glow_a: glow_a,
            glow_a_view,
            _glow_b: glow_b,
            glow_b_view,
            full,
            half,
        }
    }
}

struct ChainBindGroups {
    from_scene: wgpu::BindGroup,
    from_glow_a: wgpu::BindGroup,
    from_glow_b: wgpu::BindGroup,
    glow_a_only: wgpu::BindGroup,
}

/// Bloom over the rendered scene: bright pass, horizontal and vertical blur
/// at half size, then a composite onto the swapchain. With bloom off only
/// the composite runs, at zero strength.
pub(crate) struct BloomChain {
    source_bgl: wgpu::BindGroupLayout,
    glow_bgl: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    // one buffer per pass: queued writes all land before the first pass runs
    scene_uniforms: wgpu::Buffer,
    blur_h_uniforms: wgpu::Buffer,
    blur_v_uniforms: wgpu::Buffer,
    bright_pipeline: wgpu::RenderPipeline,
    blur_pipeline: wgpu::RenderPipeline,
    composite_pipeline: wgpu::RenderPipeline,
    groups: ChainBindGroups,
}

impl BloomChain {
    pub(crate) fn new(
        device: &wgpu::Device,
        targets: &PostTargets,
        swap_format: wgpu::TextureFormat,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("post_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::core::POST_WGSL.into()),
        });
        let source_bgl = helpers::sampled_layout(device, "post_source_bgl", true);
        let glow_bgl = helpers::sampled_layout(device, "post_glow_bgl", false);
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("post_linear"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let uniforms = |label: &str| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: std::mem::size_of::<PostUniforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        };
        let scene_uniforms = uniforms("post_scene_uniforms");
        let blur_h_uniforms = uniforms("post_blur_h_uniforms");
        let blur_v_uniforms = uniforms("post_blur_v_uniforms");

        let single = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("post_single_pl"),
            bind_group_layouts: &[&source_bgl],
            push_constant_ranges: &[],
        });
        let composite = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("post_composite_pl"),
            bind_group_layouts: &[&source_bgl, &glow_bgl],
            push_constant_ranges: &[],
        });
        let bright_pipeline =
            helpers::make_post_pipeline(device, &single, &shader, "fs_bright", HDR_FORMAT);
        let blur_pipeline =
            helpers::make_post_pipeline(device, &single, &shader, "fs_blur", HDR_FORMAT);
        let composite_pipeline =
            helpers::make_post_pipeline(device, &composite, &shader, "fs_composite", swap_format);

        let groups = Self::bind_groups(
            device,
            &source_bgl,
            &glow_bgl,
            &sampler,
            [&scene_uniforms, &blur_h_uniforms, &blur_v_uniforms],
            targets,
        );
        Self {
            source_bgl,
            glow_bgl,
            sampler,
            scene_uniforms,
            blur_h_uniforms,
            blur_v_uniforms,
            bright_pipeline,
            blur_pipeline,
            composite_pipeline,
            groups,
        }
    }

    fn bind_groups(
        device: &wgpu::Device,
        source_bgl: &wgpu::BindGroupLayout,
        glow_bgl: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        [scene_u, blur_h_u, blur_v_u]: [&wgpu::Buffer; 3],
        targets: &PostTargets,
    ) -> ChainBindGroups {
        let sampled = |label: &str,
                       layout: &wgpu::BindGroupLayout,
                       view: &wgpu::TextureView,
                       uniforms: Option<&wgpu::Buffer>| {
            helpers::sampled_bind_group(device, label, layout, view, sampler, uniforms)
        };
        ChainBindGroups {
            from_scene: sampled("from_scene", source_bgl, &targets.scene_view, Some(scene_u)),
            from_glow_a: sampled("from_glow_a", source_bgl, &targets.glow_a_view, Some(blur_h_u)),
            from_glow_b: sampled("from_glow_b", source_bgl, &targets.glow_b_view, Some(blur_v_u)),
            glow_a_only: sampled("glow_a_only", glow_bgl, &targets.glow_a_view, None),
        }
    }

    /// Point the bind groups at freshly created targets after a resize.
    pub(crate) fn retarget(&mut self, device: &wgpu::Device, targets: &PostTargets) {
        self.groups = Self::bind_groups(
            device,
            &self.source_bgl,
            &self.glow_bgl,
            &self.sampler,
            [&self.scene_uniforms, &self.blur_h_uniforms, &self.blur_v_uniforms],
            targets,
        );
    }

    pub(crate) fn write_uniforms(
        &self,
        queue: &wgpu::Queue,
        targets: &PostTargets,
        bloom: Option<BloomSettings>,
    ) {
        let settings = bloom.unwrap_or(BloomSettings {
            strength: 0.0,
            radius: 0.0,
            threshold: 1.0,
        });
        let texel = |(w, h): (u32, u32)| [1.0 / w as f32, 1.0 / h as f32];
        let pass = |size, blur_dir| PostUniforms {
            texel: texel(size),
            blur_dir,
            strength: settings.strength,
            radius: settings.radius,
            threshold: settings.threshold,
            _pad: 0.0,
        };
        let writes = [
            (&self.scene_uniforms, pass(targets.full, [0.0, 0.0])),
            (&self.blur_h_uniforms, pass(targets.half, [1.0, 0.0])),
            (&self.blur_v_uniforms, pass(targets.half, [0.0, 1.0])),
        ];
        for (buffer, uniforms) in writes {
            queue.write_buffer(buffer, 0, bytemuck::bytes_of(&uniforms));
        }
    }

    /// Encode the glow passes (when enabled) and the composite into `output`.
    pub(crate) fn encode(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        targets: &PostTargets,
        output: &wgpu::TextureView,
        glow: bool,
    ) {
        if glow {
            let passes = [
                ("bright_pass", &targets.glow_a_view, &self.bright_pipeline, &self.groups.from_scene),
                ("blur_h", &targets.glow_b_view, &self.blur_pipeline, &self.groups.from_glow_a),
                ("blur_v", &targets.glow_a_view, &self.blur_pipeline, &self.groups.from_glow_b),
            ];
            for (label, target, pipeline, source) in passes {
                blit(encoder, label, target, pipeline, source, None);
            }
        }
        blit(
            encoder,
            "composite",
            output,
            &self.composite_pipeline,
            &self.groups.from_scene,
            Some(&self.groups.glow_a_only),
        );
    }
}

fn blit(
    encoder: &mut wgpu::CommandEncoder,
    label: &str,
    target: &wgpu::TextureView,
    pipeline: &wgpu::RenderPipeline,
    group0: &wgpu::BindGroup,
    group1: Option<&wgpu::BindGroup>,
) {
    let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });
    pass.set_pipeline(pipeline);
    pass.set_bind_group(0, group0, &[]);
    if let Some(g1) = group1 {
        pass.set_bind_group(1, g1, &[]);
    }
    pass.draw(0..3, 0..1);
}
