// Host-side tests for click picking against model bounds and triangles.
// The main crate is wasm-only, so we include the pure-Rust module directly.

#![allow(dead_code)]
mod pick {
    include!("../src/core/pick.rs");
}

use glam::{Mat4, Vec2, Vec3};
use pick::*;

fn unit_box() -> Aabb {
    Aabb {
        min: Vec3::splat(-1.0),
        max: Vec3::splat(1.0),
    }
}

fn view_proj(eye: Vec3, target: Vec3, aspect: f32) -> Mat4 {
    Mat4::perspective_rh(70f32.to_radians(), aspect, 0.1, 1000.0)
        * Mat4::look_at_rh(eye, target, Vec3::Y)
}

#[test]
fn ndc_maps_rect_corners_and_centre() {
    let at = |x, y| ndc_from_client(x, y, 100.0, 50.0, 800.0, 600.0).unwrap();
    assert_eq!(at(500.0, 350.0), Vec2::ZERO);
    assert_eq!(at(100.0, 50.0), Vec2::new(-1.0, 1.0));
    assert_eq!(at(900.0, 650.0), Vec2::new(1.0, -1.0));
    assert_eq!(ndc_from_client(1.0, 1.0, 0.0, 0.0, 0.0, 600.0), None);
}

#[test]
fn centre_ray_points_at_target() {
    let eye = Vec3::new(0.0, 1.8, 6.8);
    let target = Vec3::new(0.0, 0.8, 0.0);
    let ray = ray_from_ndc(Vec2::ZERO, view_proj(eye, target, 16.0 / 9.0));
    let expected = (target - eye).normalize();
    assert!(ray.dir.dot(expected) > 0.9999);
    // origin sits on the near plane in front of the eye
    assert!((ray.origin - eye).length() < 0.2);
}

#[test]
fn ray_hits_box_in_front_and_misses_beside() {
    let ray = Ray {
        origin: Vec3::new(0.2, 0.1, 10.0),
        dir: Vec3::new(0.0, 0.0, -1.0),
    };
    let t = ray_aabb(&ray, &unit_box()).unwrap();
    assert!((t - 9.0).abs() < 1e-5);

    let beside = Ray {
        origin: Vec3::new(3.0, 0.1, 10.0),
        dir: Vec3::new(0.0, 0.0, -1.0),
    };
    assert_eq!(ray_aabb(&beside, &unit_box()), None);

    let away = Ray {
        origin: Vec3::new(0.2, 0.1, 10.0),
        dir: Vec3::new(0.0, 0.0, 1.0),
    };
    assert_eq!(ray_aabb(&away, &unit_box()), None);
}

#[test]
fn ray_starting_inside_hits_at_zero() {
    let ray = Ray {
        origin: Vec3::new(0.1, 0.2, 0.3),
        dir: Vec3::new(0.3, 0.4, 0.5).normalize(),
    };
    assert_eq!(ray_aabb(&ray, &unit_box()), Some(0.0));
}

#[test]
fn empty_box_is_never_hit() {
    let ray = Ray {
        origin: Vec3::ZERO,
        dir: Vec3::X,
    };
    assert_eq!(ray_aabb(&ray, &Aabb::EMPTY), None);
    assert_eq!(Aabb::EMPTY.size(), Vec3::ZERO);
}

#[test]
fn click_through_screen_centre_picks_model_at_target() {
    let eye = Vec3::new(0.0, 1.8, 6.8);
    let target = Vec3::new(0.0, 0.8, 0.0);
    let vp = view_proj(eye, target, 1.5);
    let model = Aabb {
        min: Vec3::new(-3.0, -1.4, -3.0),
        max: Vec3::new(3.0, 3.0, 3.0),
    };
    let ndc = ndc_from_client(400.0, 300.0, 0.0, 0.0, 800.0, 600.0).unwrap();
    assert!(ray_aabb(&ray_from_ndc(ndc, vp), &model).is_some());
    // top-left corner looks over the model
    let corner = ndc_from_client(0.0, 0.0, 0.0, 0.0, 800.0, 600.0).unwrap();
    assert!(ray_aabb(&ray_from_ndc(corner, vp), &model).is_none());
}

#[test]
fn transformed_box_covers_rotated_corners() {
    let m = Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0))
        * Mat4::from_rotation_y(std::f32::consts::FRAC_PI_4)
        * Mat4::from_scale(Vec3::splat(2.0));
    let b = unit_box().transformed(m);
    let half = 2.0 * std::f32::consts::SQRT_2;
    assert!((b.min.x - (5.0 - half)).abs() < 1e-4);
    assert!((b.max.x - (5.0 + half)).abs() < 1e-4);
    assert!((b.max.y - 2.0).abs() < 1e-4);
    assert!((b.max_extent() - 2.0 * half).abs() < 1e-4);
}

#[test]
fn union_and_extend_grow_bounds() {
    let mut b = Aabb::EMPTY;
    assert!(b.is_empty());
    b.extend(Vec3::new(1.0, 2.0, 3.0));
    assert!(!b.is_empty());
    assert_eq!(b.size(), Vec3::ZERO);
    let u = b.union(&unit_box());
    assert_eq!(u.min, Vec3::splat(-1.0));
    assert_eq!(u.max, Vec3::new(1.0, 2.0, 3.0));
}

fn toward_minus_z(x: f32, y: f32) -> Ray {
    Ray {
        origin: Vec3::new(x, y, 5.0),
        dir: Vec3::NEG_Z,
    }
}

const TRI: [Vec3; 3] = [
    Vec3::new(-1.0, -1.0, 0.0),
    Vec3::new(1.0, -1.0, 0.0),
    Vec3::new(0.0, 1.0, 0.0),
];

#[test]
fn ray_hits_triangle_interior_at_plane_distance() {
    let t = ray_triangle(&toward_minus_z(0.0, 0.0), TRI).unwrap();
    assert!((t - 5.0).abs() < 1e-6);
}

#[test]
fn ray_misses_outside_triangle_edges() {
    assert_eq!(ray_triangle(&toward_minus_z(0.9, 0.9), TRI), None);
    assert_eq!(ray_triangle(&toward_minus_z(0.0, -1.5), TRI), None);
}

#[test]
fn back_face_is_hit_too() {
    let [a, b, c] = TRI;
    let t = ray_triangle(&toward_minus_z(0.0, 0.0), [a, c, b]).unwrap();
    assert!((t - 5.0).abs() < 1e-6);
}

#[test]
fn parallel_or_receding_rays_miss() {
    let grazing = Ray {
        origin: Vec3::new(-5.0, 0.0, 0.0),
        dir: Vec3::X,
    };
    assert_eq!(ray_triangle(&grazing, TRI), None);
    let away = Ray {
        origin: Vec3::new(0.0, 0.0, 5.0),
        dir: Vec3::Z,
    };
    assert_eq!(ray_triangle(&away, TRI), None);
}
