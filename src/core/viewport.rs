use glam::Vec3;

use super::constants::*;
use super::effects::{BloomSettings, ShakeTuning};

/// Layout values that depend on the browser viewport.
///
/// Narrow viewports (below `MOBILE_BREAKPOINT_PX`) get a closer camera,
/// gentler shakes and a lower pixel ratio cap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportProfile {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
    pub mobile: bool,
}

impl ViewportProfile {
    pub fn for_size(width: f32, height: f32, device_pixel_ratio: f32) -> Self {
        let mobile = width < MOBILE_BREAKPOINT_PX;
        let cap = if mobile {
            PIXEL_RATIO_CAP_MOBILE
        } else {
            PIXEL_RATIO_CAP_DESKTOP
        };
        Self {
            width,
            height,
            pixel_ratio: device_pixel_ratio.min(cap).max(0.5),
            mobile,
        }
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.width.max(1.0) / self.height.max(1.0)
    }

    /// Backing-store size of the canvas in device pixels.
    pub fn backing_size(&self) -> (u32, u32) {
        (
            ((self.width * self.pixel_ratio) as u32).max(1),
            ((self.height * self.pixel_ratio) as u32).max(1),
        )
    }

    /// Resting position of the camera rig.
    pub fn rig_rest(&self) -> Vec3 {
        Vec3::from_array(if self.mobile {
            RIG_REST_MOBILE
        } else {
            RIG_REST_DESKTOP
        })
    }

    #[inline]
    pub fn orbit_target(&self) -> Vec3 {
        Vec3::from_array(ORBIT_TARGET)
    }

    pub fn shake_tuning(&self) -> ShakeTuning {
        if self.mobile {
            ShakeTuning {
                entry: ENTRY_SHAKE_MOBILE,
                terminal: TERMINAL_SHAKE_MOBILE,
            }
        } else {
            ShakeTuning {
                entry: ENTRY_SHAKE_DESKTOP,
                terminal: TERMINAL_SHAKE_DESKTOP,
            }
        }
    }

    #[inline]
    pub fn bloom(&self) -> BloomSettings {
        BloomSettings::for_viewport(self.mobile)
    }
}
