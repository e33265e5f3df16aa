// Host-side tests for the model hierarchy, normalisation and posing.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod portal {
    pub mod clip {
        include!("../src/core/clip.rs");
    }
    pub mod pick {
        include!("../src/core/pick.rs");
    }
    pub mod scene {
        include!("../src/core/scene.rs");
    }
}

use glam::{Mat4, Vec3};
use portal::clip::*;
use portal::pick::Ray;
use portal::scene::*;

fn cube_mesh(half: f32) -> MeshData {
    let corners = [
        [-half, -half, -half],
        [half, -half, -half],
        [half, half, -half],
        [-half, half, -half],
        [-half, -half, half],
        [half, -half, half],
        [half, half, half],
        [-half, half, half],
    ];
    let vertices = corners
        .iter()
        .map(|p| Vertex {
            position: *p,
            normal: [0.0, 1.0, 0.0],
        })
        .collect();
    MeshData::new(vertices, vec![0, 1, 2, 0, 2, 3])
}

fn node(parent: Option<usize>, translation: Vec3, meshes: Vec<usize>) -> SceneNode {
    SceneNode {
        parent,
        rest: NodeTransform {
            translation,
            ..Default::default()
        },
        meshes,
    }
}

// root at origin, child offset by +2 on x carrying a cube, lift clip on the root
fn two_node_scene() -> ModelScene {
    let clip = AnimationClip::new(
        "lift",
        vec![Track {
            node: 0,
            times: vec![0.0, 2.0],
            channel: Channel::Translation(vec![Vec3::ZERO, Vec3::new(0.0, 4.0, 0.0)]),
        }],
    );
    ModelScene::new(
        vec![
            node(None, Vec3::ZERO, vec![]),
            node(Some(0), Vec3::new(2.0, 0.0, 0.0), vec![0]),
        ],
        vec![cube_mesh(1.0)],
        Some(clip),
    )
}

#[test]
fn mesh_bounds_cover_vertices() {
    let mesh = cube_mesh(0.5);
    assert_eq!(mesh.bounds.min, Vec3::splat(-0.5));
    assert_eq!(mesh.bounds.max, Vec3::splat(0.5));
}

#[test]
fn child_world_matrix_composes_parent() {
    let scene = two_node_scene();
    let mut poses = scene.rest_poses();
    poses[0].translation = Vec3::new(0.0, 1.0, 0.0);
    let world = scene.world_matrices(&poses);
    let p = world[1].transform_point3(Vec3::ZERO);
    assert!((p - Vec3::new(2.0, 1.0, 0.0)).length() < 1e-6);
}

#[test]
fn cyclic_hierarchy_does_not_recurse_forever() {
    let scene = ModelScene::new(
        vec![
            node(Some(1), Vec3::X, vec![]),
            node(Some(0), Vec3::Y, vec![]),
        ],
        vec![],
        None,
    );
    let world = scene.world_matrices(&scene.rest_poses());
    assert_eq!(world.len(), 2);
    assert!(world.iter().all(|m| m.is_finite()));
}

#[test]
fn normalize_scales_largest_extent_and_offsets() {
    let mut scene = two_node_scene();
    scene.normalize(6.0, Vec3::new(0.0, -1.4, 0.0));
    let world = scene.world_matrices(&scene.rest_poses());
    let bounds = scene.bounds(&world);
    assert!((bounds.max_extent() - 6.0).abs() < 1e-4);
    // cube centred at x=2 scaled by 3 then shifted down
    let centre = (bounds.min + bounds.max) * 0.5;
    assert!((centre - Vec3::new(6.0, -1.4, 0.0)).length() < 1e-4);
}

#[test]
fn normalize_keeps_degenerate_model_unscaled() {
    let mut scene = ModelScene::new(vec![node(None, Vec3::ZERO, vec![])], vec![], None);
    scene.normalize(6.0, Vec3::ZERO);
    assert_eq!(scene.root, Mat4::IDENTITY);
}

#[test]
fn instance_rests_until_played_then_holds_last_frame() {
    let mut instance = ModelInstance::new(two_node_scene());
    assert!(instance.has_clip());
    assert!(!instance.advance(1.0));
    let rest_top = instance.bounds().max.y;
    assert!((rest_top - 1.0).abs() < 1e-6);

    instance.play_once(0.5, true);
    assert!(!instance.advance(2.0));
    assert!((instance.bounds().max.y - 3.0).abs() < 1e-5);
    assert!(instance.advance(2.0));
    assert!((instance.bounds().max.y - 5.0).abs() < 1e-5);

    // clamped: further frames keep the final pose
    assert!(!instance.advance(1.0));
    assert!((instance.bounds().max.y - 5.0).abs() < 1e-5);
    assert_eq!(instance.world().len(), 2);
}

// two triangles in the z=0 plane with an empty gap between x=-1 and x=1
fn split_mesh() -> MeshData {
    let p = |x: f32, y: f32| Vertex {
        position: [x, y, 0.0],
        normal: [0.0, 0.0, 1.0],
    };
    MeshData::new(
        vec![
            p(-3.0, -1.0),
            p(-1.0, -1.0),
            p(-3.0, 1.0),
            p(1.0, -1.0),
            p(3.0, -1.0),
            p(1.0, 1.0),
        ],
        vec![0, 1, 2, 3, 4, 5],
    )
}

fn down_z(x: f32, y: f32) -> Ray {
    Ray {
        origin: Vec3::new(x, y, 5.0),
        dir: Vec3::NEG_Z,
    }
}

#[test]
fn raycast_misses_gap_inside_bounds() {
    let instance = ModelInstance::new(ModelScene::new(
        vec![node(None, Vec3::ZERO, vec![0])],
        vec![split_mesh()],
        None,
    ));
    // the box spans the gap, the triangles do not
    let through_gap = down_z(0.0, 0.0);
    assert!(portal::pick::ray_aabb(&through_gap, instance.bounds()).is_some());
    assert_eq!(instance.raycast(&through_gap), None);

    let t = instance.raycast(&down_z(1.5, -0.5)).unwrap();
    assert!((t - 5.0).abs() < 1e-5);
    assert!(instance.raycast(&down_z(-2.5, -0.5)).is_some());
    assert_eq!(instance.raycast(&down_z(5.0, 0.0)), None);
}

#[test]
fn raycast_follows_node_transforms_and_keeps_nearest() {
    let scene = ModelScene::new(
        vec![
            node(None, Vec3::new(0.0, 0.0, -2.0), vec![0]),
            node(None, Vec3::new(0.0, 0.0, 1.0), vec![0]),
        ],
        vec![split_mesh()],
        None,
    );
    let world = scene.world_matrices(&scene.rest_poses());
    let t = scene.raycast(&world, &down_z(2.0, -0.5)).unwrap();
    assert!((t - 4.0).abs() < 1e-5);

    let mut moved = scene.rest_poses();
    moved[0].translation = Vec3::new(10.0, 0.0, -2.0);
    moved[1].translation = Vec3::new(10.0, 0.0, 1.0);
    let world = scene.world_matrices(&moved);
    assert_eq!(scene.raycast(&world, &down_z(2.0, -0.5)), None);
}
