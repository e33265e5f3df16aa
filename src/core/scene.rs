// Platform-free description of the loaded portal model: node hierarchy,
// triangle meshes and the portal clip.

use glam::{Mat4, Vec3};

use super::clip::{AnimationClip, ClipPlayback, NodeTransform};
use super::pick::{ray_aabb, ray_triangle, Aabb, Ray};

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

#[derive(Clone, Debug)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub bounds: Aabb,
}

impl MeshData {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        let mut bounds = Aabb::EMPTY;
        for v in &vertices {
            bounds.extend(Vec3::from_array(v.position));
        }
        Self {
            vertices,
            indices,
            bounds,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SceneNode {
    pub parent: Option<usize>,
    pub rest: NodeTransform,
    pub meshes: Vec<usize>,
}

#[derive(Clone, Debug)]
pub struct ModelScene {
    pub nodes: Vec<SceneNode>,
    pub meshes: Vec<MeshData>,
    pub clip: Option<AnimationClip>,
    /// Placement of the whole model in the world (normalisation + offset).
    pub root: Mat4,
}

impl ModelScene {
    pub fn new(nodes: Vec<SceneNode>, meshes: Vec<MeshData>, clip: Option<AnimationClip>) -> Self {
        Self {
            nodes,
            meshes,
            clip,
            root: Mat4::IDENTITY,
        }
    }

    pub fn rest_poses(&self) -> Vec<NodeTransform> {
        self.nodes.iter().map(|n| n.rest).collect()
    }

    /// World matrix of every node for the given local poses (indexed like
    /// `nodes`; missing entries fall back to the rest transform).
    pub fn world_matrices(&self, poses: &[NodeTransform]) -> Vec<Mat4> {
        let mut world: Vec<Option<Mat4>> = vec![None; self.nodes.len()];
        for i in 0..self.nodes.len() {
            self.resolve(i, poses, &mut world, 0);
        }
        world.into_iter().map(|m| m.unwrap_or(self.root)).collect()
    }

    fn resolve(
        &self,
        i: usize,
        poses: &[NodeTransform],
        world: &mut [Option<Mat4>],
        depth: usize,
    ) -> Mat4 {
        if let Some(m) = world[i] {
            return m;
        }
        let node = &self.nodes[i];
        let local = poses.get(i).unwrap_or(&node.rest).matrix();
        // a malformed hierarchy with a cycle is cut off at the node count
        let parent = match node.parent {
            Some(p) if p < self.nodes.len() && p != i && depth < self.nodes.len() => {
                self.resolve(p, poses, world, depth + 1)
            }
            _ => self.root,
        };
        let m = parent * local;
        world[i] = Some(m);
        m
    }

    /// World-space bounds of all meshes for the given node matrices.
    pub fn bounds(&self, world: &[Mat4]) -> Aabb {
        let mut out = Aabb::EMPTY;
        for (node, m) in self.nodes.iter().zip(world) {
            for &mesh in &node.meshes {
                if let Some(data) = self.meshes.get(mesh) {
                    out = out.union(&data.bounds.transformed(*m));
                }
            }
        }
        out
    }

    /// Distance to the nearest triangle hit by `ray` for the given node
    /// matrices. Meshes whose bounds the ray misses are skipped.
    pub fn raycast(&self, world: &[Mat4], ray: &Ray) -> Option<f32> {
        let mut nearest: Option<f32> = None;
        for (node, m) in self.nodes.iter().zip(world) {
            for data in node.meshes.iter().filter_map(|&i| self.meshes.get(i)) {
                if ray_aabb(ray, &data.bounds.transformed(*m)).is_none() {
                    continue;
                }
                let corner = |i: u32| {
                    data.vertices
                        .get(i as usize)
                        .map(|v| m.transform_point3(Vec3::from_array(v.position)))
                };
                for tri in data.indices.chunks_exact(3) {
                    let corners = (corner(tri[0]), corner(tri[1]), corner(tri[2]));
                    let (Some(a), Some(b), Some(c)) = corners else {
                        continue;
                    };
                    if let Some(t) = ray_triangle(ray, [a, b, c]) {
                        nearest = Some(nearest.map_or(t, |n| n.min(t)));
                    }
                }
            }
        }
        nearest
    }

    /// Uniformly scale the model so its largest rest-pose extent equals
    /// `target_size`, then move it to `offset`.
    pub fn normalize(&mut self, target_size: f32, offset: Vec3) {
        self.root = Mat4::IDENTITY;
        let rest = self.world_matrices(&self.rest_poses());
        let extent = self.bounds(&rest).max_extent();
        let scale = if extent > 0.0 { target_size / extent } else { 1.0 };
        self.root = Mat4::from_translation(offset) * Mat4::from_scale(Vec3::splat(scale));
    }
}

/// A loaded model together with its playback cursor and the pose derived
/// from it.
#[derive(Clone, Debug)]
pub struct ModelInstance {
    pub scene: ModelScene,
    pub playback: ClipPlayback,
    poses: Vec<NodeTransform>,
    world: Vec<Mat4>,
    bounds: Aabb,
}

impl ModelInstance {
    pub fn new(scene: ModelScene) -> Self {
        let duration = scene.clip.as_ref().map(|c| c.duration).unwrap_or(0.0);
        let mut instance = Self {
            poses: scene.rest_poses(),
            world: Vec::new(),
            bounds: Aabb::EMPTY,
            playback: ClipPlayback::new(duration),
            scene,
        };
        instance.refresh_pose();
        instance
    }

    pub fn has_clip(&self) -> bool {
        self.scene.clip.is_some()
    }

    /// Rewind the clip and play it once.
    pub fn play_once(&mut self, time_scale: f32, clamp_when_finished: bool) {
        self.playback.play_once(time_scale, clamp_when_finished);
        self.refresh_pose();
    }

    /// Advance a running clip. Returns `true` on the update that finishes it.
    pub fn advance(&mut self, dt_sec: f32) -> bool {
        if !self.playback.is_running() {
            return false;
        }
        let finished = self.playback.update(dt_sec);
        self.refresh_pose();
        finished
    }

    /// Re-derive node poses, world matrices and bounds from the playback.
    pub fn refresh_pose(&mut self) {
        self.poses.clear();
        self.poses.extend(self.scene.nodes.iter().map(|n| n.rest));
        if let (Some(t), Some(clip)) = (self.playback.pose_time(), self.scene.clip.as_ref()) {
            clip.sample_into(t, &mut self.poses);
        }
        self.world = self.scene.world_matrices(&self.poses);
        self.bounds = self.scene.bounds(&self.world);
    }

    pub fn world(&self) -> &[Mat4] {
        &self.world
    }

    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Nearest triangle of the current pose hit by `ray`.
    pub fn raycast(&self, ray: &Ray) -> Option<f32> {
        ray_aabb(ray, &self.bounds)?;
        self.scene.raycast(&self.world, ray)
    }
}
