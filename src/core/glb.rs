// Conversion of a binary glTF into a [`ModelScene`]: triangle primitives of
// the default scene plus the first animation.

use glam::{Quat, Vec3};

use super::assets::AssetError;
use super::clip::{AnimationClip, Channel, NodeTransform, Track};
use super::scene::{MeshData, ModelScene, SceneNode, Vertex};

/// Parse a binary glTF into a [`ModelScene`] holding the default scene's
/// triangle meshes and the first animation.
pub fn parse_glb(url: &str, bytes: &[u8]) -> Result<ModelScene, AssetError> {
    let decode_error = |reason: String| AssetError::Decode {
        url: url.to_string(),
        reason,
    };
    let gltf = gltf::Gltf::from_slice(bytes).map_err(|e| decode_error(e.to_string()))?;
    let document = &gltf.document;
    let blob: &[u8] = gltf.blob.as_deref().unwrap_or(&[]);

    // Meshes: one MeshData per triangle primitive
    let mut meshes = Vec::new();
    let mut slots_per_mesh: Vec<Vec<usize>> = Vec::new();
    for mesh in document.meshes() {
        let mut slots = Vec::new();
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                continue;
            }
            let reader = primitive.reader(|buffer| match buffer.source() {
                gltf::buffer::Source::Bin => Some(blob),
                _ => None,
            });
            let positions: Vec<[f32; 3]> = reader
                .read_positions()
                .map(|it| it.collect())
                .unwrap_or_default();
            if positions.is_empty() {
                continue;
            }
            let indices: Vec<u32> = reader
                .read_indices()
                .map(|it| it.into_u32().collect())
                .unwrap_or_else(|| (0..positions.len() as u32).collect());
            let normals: Vec<[f32; 3]> = reader
                .read_normals()
                .map(|it| it.collect())
                .unwrap_or_else(|| face_normals(&positions, &indices));
            let vertices = positions
                .iter()
                .zip(normals.iter().chain(std::iter::repeat(&[0.0, 1.0, 0.0])))
                .map(|(p, n)| Vertex {
                    position: *p,
                    normal: *n,
                })
                .collect();
            meshes.push(MeshData::new(vertices, indices));
            slots.push(meshes.len() - 1);
        }
        slots_per_mesh.push(slots);
    }
    if meshes.is_empty() {
        return Err(AssetError::Empty {
            url: url.to_string(),
        });
    }

    // Nodes outside the default scene keep their transforms but draw nothing.
    // Validation accepts child lists that loop, so each node is expanded once.
    let mut in_scene = vec![false; document.nodes().len()];
    if let Some(scene) = document.default_scene().or_else(|| document.scenes().next()) {
        let mut stack: Vec<gltf::Node> = scene.nodes().collect();
        while let Some(node) = stack.pop() {
            if std::mem::replace(&mut in_scene[node.index()], true) {
                continue;
            }
            stack.extend(node.children());
        }
    }
    let mut nodes: Vec<SceneNode> = document
        .nodes()
        .map(|node| {
            let (t, r, s) = node.transform().decomposed();
            SceneNode {
                parent: None,
                rest: NodeTransform {
                    translation: Vec3::from(t),
                    rotation: Quat::from_array(r),
                    scale: Vec3::from(s),
                },
                meshes: match node.mesh() {
                    Some(m) if in_scene[node.index()] => slots_per_mesh[m.index()].clone(),
                    _ => Vec::new(),
                },
            }
        })
        .collect();
    for node in document.nodes() {
        for child in node.children() {
            nodes[child.index()].parent = Some(node.index());
        }
    }

    let clip = document
        .animations()
        .next()
        .map(|animation| parse_animation(&animation, blob))
        .ok_or_else(|| AssetError::NoAnimation {
            url: url.to_string(),
        })?;

    Ok(ModelScene::new(nodes, meshes, Some(clip)))
}

fn parse_animation(animation: &gltf::Animation, blob: &[u8]) -> AnimationClip {
    let mut tracks = Vec::new();
    for channel in animation.channels() {
        let reader = channel.reader(|buffer| match buffer.source() {
            gltf::buffer::Source::Bin => Some(blob),
            _ => None,
        });
        let (Some(inputs), Some(outputs)) = (reader.read_inputs(), reader.read_outputs()) else {
            continue;
        };
        let times: Vec<f32> = inputs.collect();
        // cubic spline keys are (in-tangent, value, out-tangent); keep the values
        let cubic =
            channel.sampler().interpolation() == gltf::animation::Interpolation::CubicSpline;
        let pick = |i: usize| !cubic || i % 3 == 1;
        let channel_values = match outputs {
            gltf::animation::util::ReadOutputs::Translations(it) => Channel::Translation(
                it.enumerate()
                    .filter(|(i, _)| pick(*i))
                    .map(|(_, v)| Vec3::from(v))
                    .collect(),
            ),
            gltf::animation::util::ReadOutputs::Rotations(it) => Channel::Rotation(
                it.into_f32()
                    .enumerate()
                    .filter(|(i, _)| pick(*i))
                    .map(|(_, v)| Quat::from_array(v))
                    .collect(),
            ),
            gltf::animation::util::ReadOutputs::Scales(it) => Channel::Scale(
                it.enumerate()
                    .filter(|(i, _)| pick(*i))
                    .map(|(_, v)| Vec3::from(v))
                    .collect(),
            ),
            gltf::animation::util::ReadOutputs::MorphTargetWeights(_) => continue,
        };
        tracks.push(Track {
            node: channel.target().node().index(),
            times,
            channel: channel_values,
        });
    }
    AnimationClip::new(animation.name().unwrap_or("portal"), tracks)
}

/// Area-weighted vertex normals for primitives that ship without any.
pub fn face_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut acc = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        if a >= positions.len() || b >= positions.len() || c >= positions.len() {
            continue;
        }
        let (pa, pb, pc) = (
            Vec3::from(positions[a]),
            Vec3::from(positions[b]),
            Vec3::from(positions[c]),
        );
        let n = (pb - pa).cross(pc - pa);
        acc[a] += n;
        acc[b] += n;
        acc[c] += n;
    }
    acc.into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y).to_array())
        .collect()
}
