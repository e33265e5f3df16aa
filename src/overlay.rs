//! DOM overlays around the canvas: loader bar, welcome modal, confirm
//! modal, backdrop blur layer and the exit flash.

use crate::constants::*;
use crate::dom;
use web_sys as web;

// ---------------- Loader ----------------

pub fn update_loader(document: &web::Document, percent: u32) {
    if let Some(bar) = dom::element(document, LOADER_BAR_ID) {
        dom::set_style(&bar, "width", &format!("{}%", percent));
    }
    if let Some(text) = document.get_element_by_id(LOADER_TEXT_ID) {
        text.set_text_content(Some(&crate::core::loader_label(percent)));
    }
}

/// Fade the loader out and remove it once the fade finished.
pub fn hide_loader(document: &web::Document) {
    if let Some(loader) = dom::element(document, LOADER_ID) {
        dom::set_style(&loader, "opacity", "0");
        dom::set_timeout(LOADER_FADE_MS, move || loader.remove());
    }
}

/// Leave the loader up with a failure message.
pub fn show_loader_error(document: &web::Document, message: &str) {
    if let Some(text) = document.get_element_by_id(LOADER_TEXT_ID) {
        text.set_text_content(Some(message));
    }
}

// ---------------- Welcome modal ----------------

pub fn close_welcome(document: &web::Document) {
    if let Some(modal) = dom::element(document, WELCOME_MODAL_ID) {
        dom::set_style(&modal, "opacity", "0");
        dom::set_style(&modal, "transform", "scale(0.8)");
        dom::set_timeout(WELCOME_FADE_MS, move || dom::set_style(&modal, "display", "none"));
    }
}

// ---------------- Confirm modal ----------------

pub fn open_confirm(document: &web::Document) {
    let (Some(overlay), Some(popup)) = (
        dom::element(document, OVERLAY_ID),
        dom::element(document, POPUP_ID),
    ) else {
        return;
    };
    set_popup_status(document, None);
    dom::set_style(&overlay, "display", "block");
    dom::set_style(&popup, "display", "flex");
    // class added a frame later so the CSS transition starts from the hidden state
    dom::next_frame(move || {
        _ = popup.class_list().add_1(ACTIVE_CLASS);
    });
}

/// Show `message` under the popup's question, or clear it.
pub fn set_popup_status(document: &web::Document, message: Option<&str>) {
    if let Some(status) = document.get_element_by_id(POPUP_STATUS_ID) {
        status.set_text_content(message);
    }
}

/// Start the popup's exit transition and hide both elements after `delay_ms`.
pub fn close_confirm(document: &web::Document, delay_ms: i32) {
    let (Some(overlay), Some(popup)) = (
        dom::element(document, OVERLAY_ID),
        dom::element(document, POPUP_ID),
    ) else {
        return;
    };
    _ = popup.class_list().remove_1(ACTIVE_CLASS);
    dom::set_timeout(delay_ms, move || {
        dom::set_style(&popup, "display", "none");
        dom::set_style(&overlay, "display", "none");
    });
}

// ---------------- Effects ----------------

/// Apply a backdrop blur radius; 0 clears the filter.
pub fn set_blur(document: &web::Document, px: f32) {
    let Some(layer) = dom::element(document, BLUR_LAYER_ID) else {
        return;
    };
    let value = if px <= 0.0 {
        "none".to_string()
    } else {
        format!("blur({:.2}px)", px)
    };
    dom::set_style(&layer, "backdrop-filter", &value);
    dom::set_style(&layer, "-webkit-backdrop-filter", &value);
}

pub fn flash(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(FLASH_ID) {
        _ = el.class_list().add_1(ACTIVE_CLASS);
    }
}
