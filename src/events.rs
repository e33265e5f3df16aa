use crate::core::{ndc_from_client, ray_from_ndc, ViewportProfile};
use crate::dom;
use crate::frame::{FrameContext, SharedFrame};
use crate::portal;
use glam::Vec2;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
fn client_pos(ev: &web::MouseEvent) -> Vec2 {
    Vec2::new(ev.client_x() as f32, ev.client_y() as f32)
}

pub fn wire_input_handlers(shared: &SharedFrame, canvas: &web::HtmlCanvasElement) {
    wire_pointerdown(shared, canvas);
    wire_pointermove(shared);
    wire_pointerup(shared);
    wire_click(shared, canvas);
}

/// Whether a click at `client` lands on the portal model.
fn hits_model(ctx: &FrameContext<'_>, client: Vec2) -> bool {
    let Some(model) = &ctx.model else {
        return false;
    };
    let rect = ctx.canvas.get_bounding_client_rect();
    let Some(ndc) = ndc_from_client(
        client.x,
        client.y,
        rect.left() as f32,
        rect.top() as f32,
        rect.width() as f32,
        rect.height() as f32,
    ) else {
        return false;
    };
    let ray = ray_from_ndc(ndc, ctx.camera().view_proj());
    model.raycast(&ray).is_some()
}

fn wire_pointerdown(shared: &SharedFrame, canvas: &web::HtmlCanvasElement) {
    let shared = shared.clone();
    let canvas_capture = canvas.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let mut ctx = shared.borrow_mut();
        if !ctx.orbit.enabled {
            return;
        }
        ctx.drag.begin(ev.pointer_id(), client_pos(&ev));
        _ = canvas_capture.set_pointer_capture(ev.pointer_id());
    }) as Box<dyn FnMut(_)>);
    _ = canvas.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_pointermove(shared: &SharedFrame) {
    let shared = shared.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let mut ctx = shared.borrow_mut();
        let Some(delta) = ctx.drag.step(ev.pointer_id(), client_pos(&ev)) else {
            return;
        };
        let height = ctx.canvas.client_height() as f32;
        ctx.orbit.rotate_by_pixels(delta.x, delta.y, height);
    }) as Box<dyn FnMut(_)>);
    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

fn wire_pointerup(shared: &SharedFrame) {
    let shared = shared.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        shared.borrow_mut().drag.end(ev.pointer_id());
    }) as Box<dyn FnMut(_)>);
    if let Some(wnd) = web::window() {
        for name in ["pointerup", "pointercancel"] {
            _ = wnd.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
        }
    }
    closure.forget();
}

fn wire_click(shared: &SharedFrame, canvas: &web::HtmlCanvasElement) {
    let shared = shared.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::MouseEvent| {
        let hit = {
            let ctx = shared.borrow();
            ctx.drag.was_click() && hits_model(&ctx, client_pos(&ev))
        };
        if hit {
            log::info!("[click] portal model picked");
            portal::open_modal(&shared);
        }
    }) as Box<dyn FnMut(_)>);
    _ = canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();
}

pub fn wire_resize(shared: &SharedFrame) {
    let shared = shared.clone();
    let closure = Closure::wrap(Box::new(move || {
        let (w, h, dpr) = dom::viewport_size();
        shared
            .borrow_mut()
            .apply_layout(ViewportProfile::for_size(w, h, dpr));
    }) as Box<dyn FnMut()>);
    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}
