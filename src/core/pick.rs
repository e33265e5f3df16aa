use glam::{Mat4, Vec2, Vec3, Vec4};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::splat(f32::MAX),
        max: Vec3::splat(f32::MIN),
    };

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn extend(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            self.max - self.min
        }
    }

    pub fn max_extent(&self) -> f32 {
        self.size().max_element()
    }

    /// Bounds of this box after transforming all eight corners by `m`.
    pub fn transformed(&self, m: Mat4) -> Aabb {
        if self.is_empty() {
            return *self;
        }
        let mut out = Aabb::EMPTY;
        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            out.extend(m.transform_point3(corner));
        }
        out
    }
}

/// Normalised device coordinates of a client-space point inside an element
/// rect, `None` for a degenerate rect.
#[inline]
pub fn ndc_from_client(
    client_x: f32,
    client_y: f32,
    left: f32,
    top: f32,
    width: f32,
    height: f32,
) -> Option<Vec2> {
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    Some(Vec2::new(
        ((client_x - left) / width) * 2.0 - 1.0,
        -((client_y - top) / height) * 2.0 + 1.0,
    ))
}

/// World-space ray through `ndc` for a camera with the given view-projection.
pub fn ray_from_ndc(ndc: Vec2, view_proj: Mat4) -> Ray {
    let inv = view_proj.inverse();
    let p_near = inv * Vec4::new(ndc.x, ndc.y, 0.0, 1.0);
    let p_far = inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
    let near = p_near.truncate() / p_near.w;
    let far = p_far.truncate() / p_far.w;
    Ray {
        origin: near,
        dir: (far - near).normalize(),
    }
}

/// Distance along `ray` to the entry point of `aabb` (slab test). A ray that
/// starts inside the box hits at 0.
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<f32> {
    if aabb.is_empty() {
        return None;
    }
    let inv = ray.dir.recip();
    let t0 = (aabb.min - ray.origin) * inv;
    let t1 = (aabb.max - ray.origin) * inv;
    let t_near = t0.min(t1).max_element();
    let t_far = t0.max(t1).min_element();
    if t_far < 0.0 || t_near > t_far {
        return None;
    }
    Some(t_near.max(0.0))
}

/// Distance along `ray` to triangle `abc` (Moller-Trumbore). Both faces
/// count, since the portal mesh is drawn without culling.
pub fn ray_triangle(ray: &Ray, [a, b, c]: [Vec3; 3]) -> Option<f32> {
    let e1 = b - a;
    let e2 = c - a;
    let p = ray.dir.cross(e2);
    let det = e1.dot(p);
    if det.abs() < 1e-8 {
        return None;
    }
    let inv = det.recip();
    let s = ray.origin - a;
    let u = s.dot(p) * inv;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(e1);
    let v = ray.dir.dot(q) * inv;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = e2.dot(q) * inv;
    (t >= 0.0).then_some(t)
}
