use crate::core::{ModelScene, Vertex};
use glam::Mat4;
use wgpu::util::DeviceExt;

use super::helpers;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct ObjectUniforms {
    pub(crate) model: [[f32; 4]; 4],
    pub(crate) normal_matrix: [[f32; 4]; 4],
}

impl ObjectUniforms {
    pub(crate) fn from_world(world: Mat4) -> Self {
        Self {
            model: world.to_cols_array_2d(),
            normal_matrix: world.inverse().transpose().to_cols_array_2d(),
        }
    }
}

pub(crate) fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRS,
    }
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

/// One mesh drawn with the world matrix of one node.
struct DrawItem {
    node: usize,
    mesh: usize,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// GPU copy of a [`ModelScene`]'s geometry plus one uniform slot per draw.
pub(crate) struct ModelResources {
    meshes: Vec<GpuMesh>,
    draws: Vec<DrawItem>,
}

impl ModelResources {
    pub(crate) fn upload(
        device: &wgpu::Device,
        object_layout: &wgpu::BindGroupLayout,
        scene: &ModelScene,
    ) -> Self {
        let meshes = scene
            .meshes
            .iter()
            .enumerate()
            .map(|(i, m)| GpuMesh {
                vertex_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("mesh{}_vertices", i)),
                    contents: bytemuck::cast_slice(&m.vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                }),
                index_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("mesh{}_indices", i)),
                    contents: bytemuck::cast_slice(&m.indices),
                    usage: wgpu::BufferUsages::INDEX,
                }),
                index_count: m.indices.len() as u32,
            })
            .collect();

        let mut draws = Vec::new();
        for (node_index, node) in scene.nodes.iter().enumerate() {
            for &mesh in &node.meshes {
                let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some("object_uniforms"),
                    size: std::mem::size_of::<ObjectUniforms>() as u64,
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                });
                let bind_group =
                    helpers::uniform_bind_group(device, "object_bg", object_layout, &uniform_buffer);
                draws.push(DrawItem {
                    node: node_index,
                    mesh,
                    uniform_buffer,
                    bind_group,
                });
            }
        }
        Self { meshes, draws }
    }

    pub(crate) fn write_transforms(&self, queue: &wgpu::Queue, world: &[Mat4]) {
        for draw in &self.draws {
            let m = world.get(draw.node).copied().unwrap_or(Mat4::IDENTITY);
            queue.write_buffer(
                &draw.uniform_buffer,
                0,
                bytemuck::bytes_of(&ObjectUniforms::from_world(m)),
            );
        }
    }

    pub(crate) fn draw(&self, rpass: &mut wgpu::RenderPass<'_>) {
        for draw in &self.draws {
            let Some(mesh) = self.meshes.get(draw.mesh) else {
                continue;
            };
            rpass.set_bind_group(1, &draw.bind_group, &[]);
            rpass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            rpass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }
}
