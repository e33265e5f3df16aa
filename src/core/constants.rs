// Portal transition tuning constants.
//
// Times are milliseconds when they feed wall-clock ramps (blur, redirect)
// and seconds when they are consumed by the per-frame delta (shake, clip).

// Destination opened once the transition completes
pub const PORTAL_DESTINATION: &str = "/portal";

// Animation playback
pub const PORTAL_TIME_SCALE: f32 = 0.5; // slow, dramatic playback of the portal clip
pub const PORTAL_CLAMP_WHEN_FINISHED: bool = true;

// Entry effects (launched by enter_portal)
pub const ENTRY_SHAKE_SEC: f32 = 0.7;
pub const ENTRY_SHAKE_DESKTOP: f32 = 0.12;
pub const ENTRY_SHAKE_MOBILE: f32 = 0.05;
pub const ENTRY_BLUR_FROM_PX: f32 = 0.0;
pub const ENTRY_BLUR_TO_PX: f32 = 6.0;
pub const ENTRY_BLUR_MS: f64 = 2000.0;

// Terminal effects (launched once both completions arrived)
pub const TERMINAL_SHAKE_SEC: f32 = 0.4;
pub const TERMINAL_SHAKE_DESKTOP: f32 = 0.18;
pub const TERMINAL_SHAKE_MOBILE: f32 = 0.08;
pub const TERMINAL_BLUR_TO_PX: f32 = 18.0;
pub const TERMINAL_BLUR_MS: f64 = 300.0;

// Bloom switched on when the transition starts
pub const BLOOM_STRENGTH_DESKTOP: f32 = 1.1;
pub const BLOOM_STRENGTH_MOBILE: f32 = 0.6;
pub const BLOOM_RADIUS: f32 = 0.4;
pub const BLOOM_THRESHOLD: f32 = 0.85; // luminance above which pixels glow

// Delay between the flash and navigation, long enough for the flash to show
pub const REDIRECT_DELAY_MS: f64 = 350.0;

// Camera return after a shake burst: new = lerp(old, rest, factor) per frame
pub const SHAKE_SETTLE_LERP: f32 = 0.15;

// Viewport layout
pub const MOBILE_BREAKPOINT_PX: f32 = 768.0;
pub const RIG_REST_DESKTOP: [f32; 3] = [0.0, 1.8, 6.8];
pub const RIG_REST_MOBILE: [f32; 3] = [0.0, 1.6, 5.2];
pub const ORBIT_TARGET: [f32; 3] = [0.0, 0.8, 0.0];
pub const PIXEL_RATIO_CAP_DESKTOP: f32 = 1.5;
pub const PIXEL_RATIO_CAP_MOBILE: f32 = 1.2;

// Camera projection
pub const CAMERA_FOVY_DEG: f32 = 70.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 1000.0;

// Orbit controls
pub const ORBIT_DAMPING: f32 = 0.05;
pub const ORBIT_MIN_POLAR: f32 = std::f32::consts::PI / 3.0;
pub const ORBIT_MAX_POLAR: f32 = std::f32::consts::PI / 2.1;
pub const ORBIT_ROTATE_SPEED: f32 = 1.0;

// Model placement
pub const MODEL_TARGET_SIZE: f32 = 6.0; // largest extent after normalisation
pub const MODEL_OFFSET: [f32; 3] = [0.0, -1.4, 0.0];

// Lighting
pub const AMBIENT_INTENSITY: f32 = 0.6;
pub const KEY_LIGHT_COLOR: [f32; 3] = [0.0, 0.667, 1.0]; // 0x00aaff
pub const KEY_LIGHT_INTENSITY: f32 = 2.0;

// Assets
pub const MODEL_URL: &str = "/assets/animated.glb";
pub const AUDIO_URL: &str = "/assets/portal.mp3";
