pub mod assets;
pub mod clip;
pub mod constants;
pub mod effects;
pub mod glb;
pub mod orbit;
pub mod pick;
pub mod scene;
pub mod transition;
pub mod viewport;

pub use assets::*;
pub use clip::*;
pub use constants::*;
pub use effects::*;
pub use glb::*;
pub use orbit::*;
pub use pick::*;
pub use scene::*;
pub use transition::*;
pub use viewport::*;

// Shaders bundled as string constants
pub static SCENE_WGSL: &str = include_str!("../../shaders/scene.wgsl");
pub static POST_WGSL: &str = include_str!("../../shaders/post.wgsl");
