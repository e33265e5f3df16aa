// DOM contract of the host page (index.html) and its CSS timings.

// Elements
pub const CANVAS_ID: &str = "webgl";
pub const BLUR_LAYER_ID: &str = "blurLayer";
pub const FLASH_ID: &str = "flash";
pub const OVERLAY_ID: &str = "overlay";
pub const POPUP_ID: &str = "popup";
pub const POPUP_STATUS_ID: &str = "popup-status";
pub const LOADER_ID: &str = "loader";
pub const LOADER_BAR_ID: &str = "loader-progress";
pub const LOADER_TEXT_ID: &str = "loader-text";
pub const WELCOME_MODAL_ID: &str = "welcomeModal";

// Buttons wired at startup
pub const PORTAL_ENTER_BUTTON_ID: &str = "portal-enter";
pub const PORTAL_CANCEL_BUTTON_ID: &str = "portal-cancel";
pub const WELCOME_CLOSE_BUTTON_ID: &str = "welcome-close";

// Class toggled on the popup and the flash to run their CSS transitions
pub const ACTIVE_CLASS: &str = "active";

// Delays matching the CSS transitions (ms)
pub const LOADER_FADE_MS: i32 = 500;
pub const WELCOME_FADE_MS: i32 = 500;
pub const MODAL_CLOSE_MS: i32 = 250;
pub const MODAL_CLOSE_ON_ENTER_MS: i32 = 200;
