use glam::{Vec2, Vec3};

use super::constants::{ORBIT_DAMPING, ORBIT_MAX_POLAR, ORBIT_MIN_POLAR, ORBIT_ROTATE_SPEED};

/// Damped rotate-only orbit controls around a fixed target.
///
/// Zoom and pan are not supported; the orbit radius is fixed by the initial
/// eye position. Angles are spherical: `theta` is the azimuth around +Y
/// measured from +Z, `phi` the polar angle from +Y.
#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub enabled: bool,
    target: Vec3,
    radius: f32,
    theta: f32,
    phi: f32,
    delta_theta: f32,
    delta_phi: f32,
}

impl OrbitControls {
    pub fn new(target: Vec3, eye: Vec3) -> Self {
        let mut controls = Self {
            enabled: true,
            target,
            radius: 0.0,
            theta: 0.0,
            phi: 0.0,
            delta_theta: 0.0,
            delta_phi: 0.0,
        };
        controls.reset(target, eye);
        controls
    }

    /// Re-centre on `target` with the eye at `eye`, dropping any momentum.
    pub fn reset(&mut self, target: Vec3, eye: Vec3) {
        let offset = eye - target;
        self.target = target;
        self.radius = offset.length();
        self.theta = offset.x.atan2(offset.z);
        self.phi = if self.radius > 0.0 {
            (offset.y / self.radius).clamp(-1.0, 1.0).acos()
        } else {
            ORBIT_MAX_POLAR
        }
        .clamp(ORBIT_MIN_POLAR, ORBIT_MAX_POLAR);
        self.delta_theta = 0.0;
        self.delta_phi = 0.0;
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn polar_angle(&self) -> f32 {
        self.phi
    }

    pub fn azimuth(&self) -> f32 {
        self.theta
    }

    /// Feed a pointer drag of `dx`, `dy` CSS pixels over an element
    /// `element_height` pixels tall. Ignored while disabled.
    pub fn rotate_by_pixels(&mut self, dx: f32, dy: f32, element_height: f32) {
        if !self.enabled || element_height <= 0.0 {
            return;
        }
        let k = std::f32::consts::TAU * ORBIT_ROTATE_SPEED / element_height;
        self.delta_theta -= dx * k;
        self.delta_phi -= dy * k;
    }

    /// Apply damped momentum and return the eye offset from the target.
    ///
    /// Runs every frame, including while disabled, so that momentum gathered
    /// before disabling still settles.
    pub fn update(&mut self) -> Vec3 {
        self.theta += self.delta_theta * ORBIT_DAMPING;
        self.phi = (self.phi + self.delta_phi * ORBIT_DAMPING).clamp(ORBIT_MIN_POLAR, ORBIT_MAX_POLAR);
        self.delta_theta *= 1.0 - ORBIT_DAMPING;
        self.delta_phi *= 1.0 - ORBIT_DAMPING;
        self.offset()
    }

    pub fn offset(&self) -> Vec3 {
        let sin_phi_r = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_r * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_r * self.theta.cos(),
        )
    }
}

/// A click at the end of a drag longer than this is not a pick.
pub const CLICK_SLOP_PX: f32 = 4.0;

/// Pointer drag feeding the orbit controls.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DragState {
    pub active: bool,
    pub pointer_id: i32,
    pub last: Vec2,
    /// Distance covered by the current (or last) drag, in CSS pixels.
    pub travel: f32,
}

impl DragState {
    pub fn begin(&mut self, pointer_id: i32, at: Vec2) {
        self.active = true;
        self.pointer_id = pointer_id;
        self.last = at;
        self.travel = 0.0;
    }

    /// Movement since the previous call, `None` when not dragging with this pointer.
    pub fn step(&mut self, pointer_id: i32, at: Vec2) -> Option<Vec2> {
        if !self.active || pointer_id != self.pointer_id {
            return None;
        }
        let delta = at - self.last;
        self.last = at;
        self.travel += delta.length();
        Some(delta)
    }

    pub fn end(&mut self, pointer_id: i32) {
        if pointer_id == self.pointer_id {
            self.active = false;
        }
    }

    pub fn was_click(&self) -> bool {
        self.travel <= CLICK_SLOP_PX
    }
}
