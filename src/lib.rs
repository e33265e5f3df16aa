#![cfg(target_arch = "wasm32")]
use crate::constants::*;
use crate::core::{
    loader_percent, AssetError, AssetStatus, ModelInstance, ViewportProfile, AUDIO_URL, MODEL_OFFSET,
    MODEL_TARGET_SIZE, MODEL_URL,
};
use crate::frame::{FrameContext, SharedFrame};
use glam::Vec3;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod assets;
mod audio;
mod constants;
mod core;
mod dom;
mod events;
mod frame;
mod overlay;
mod portal;
mod render;

thread_local! {
    static APP: RefCell<Option<SharedFrame>> = const { RefCell::new(None) };
}

fn with_app(action: &str, f: impl FnOnce(&SharedFrame)) {
    let app = APP.with(|a| a.borrow().clone());
    match app {
        Some(app) => f(&app),
        None => log::warn!("[portal] {} before initialisation finished", action),
    }
}

/// Start the portal transition. No-op until both assets are loaded.
#[wasm_bindgen(js_name = enterPortal)]
pub fn enter_portal() {
    with_app("enterPortal", |app| {
        _ = app.borrow().audio_ctx.resume();
        portal::enter_portal(app);
    });
}

#[wasm_bindgen(js_name = openModal)]
pub fn open_modal() {
    with_app("openModal", portal::open_modal);
}

#[wasm_bindgen(js_name = closeModal)]
pub fn close_modal() {
    with_app("closeModal", portal::close_modal);
}

#[wasm_bindgen(js_name = closeWelcomeModal)]
pub fn close_welcome_modal() {
    if let Some(document) = dom::window_document() {
        overlay::close_welcome(&document);
    }
}

fn wire_overlay_buttons(document: &web::Document) {
    dom::add_click_listener(document, PORTAL_ENTER_BUTTON_ID, enter_portal);
    dom::add_click_listener(document, PORTAL_CANCEL_BUTTON_ID, close_modal);
    dom::add_click_listener(document, WELCOME_CLOSE_BUTTON_ID, close_welcome_modal);
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("portal-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", CANVAS_ID))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    // stays suspended until the confirm click resumes it; decoding works meanwhile
    let audio_ctx = web::AudioContext::new().map_err(|e| anyhow::anyhow!("{:?}", e))?;

    let (w, h, dpr) = dom::viewport_size();
    let profile = ViewportProfile::for_size(w, h, dpr);
    let (bw, bh) = profile.backing_size();
    dom::sync_canvas_backing_size(&canvas, bw, bh);

    let shared: SharedFrame = Rc::new(RefCell::new(FrameContext::new(
        document.clone(),
        canvas.clone(),
        audio_ctx,
        profile,
    )));
    APP.with(|a| *a.borrow_mut() = Some(shared.clone()));

    wire_overlay_buttons(&document);
    events::wire_input_handlers(&shared, &canvas);
    events::wire_resize(&shared);

    spawn_local(load_model(shared.clone()));
    spawn_local(load_sound(shared.clone()));

    let gpu = frame::init_gpu(&canvas).await;
    shared.borrow_mut().gpu = gpu;
    // a model that finished loading before the device came up still needs uploading
    {
        let mut ctx = shared.borrow_mut();
        let ctx = &mut *ctx;
        if let (Some(gpu), Some(model)) = (&mut ctx.gpu, &ctx.model) {
            gpu.set_model(&model.scene);
        }
    }

    frame::start_loop(shared);
    Ok(())
}

async fn load_model(shared: SharedFrame) {
    let document = shared.borrow().document.clone();
    shared.borrow_mut().assets.model = AssetStatus::Loading { progress: None };

    let weak = Rc::downgrade(&shared);
    let progress_doc = document.clone();
    let fetched = assets::fetch_array_buffer(MODEL_URL, move |loaded, total| {
        let Some(percent) = loader_percent(loaded, total) else {
            return;
        };
        overlay::update_loader(&progress_doc, percent);
        if let Some(shared) = weak.upgrade() {
            shared.borrow_mut().assets.model = AssetStatus::Loading {
                progress: Some(percent as f32 / 100.0),
            };
        }
    })
    .await;

    let parsed = fetched.and_then(|buffer| {
        let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
        crate::core::parse_glb(MODEL_URL, &bytes)
    });
    let mut scene = match parsed {
        Ok(scene) => scene,
        Err(e) => {
            log::error!("[assets] {}", e);
            overlay::show_loader_error(&document, "Failed to load the portal");
            shared.borrow_mut().assets.model = AssetStatus::Failed(e);
            return;
        }
    };
    scene.normalize(MODEL_TARGET_SIZE, Vec3::from_array(MODEL_OFFSET));

    let mut ctx = shared.borrow_mut();
    if let Some(gpu) = &mut ctx.gpu {
        gpu.set_model(&scene);
    }
    log::info!(
        "[assets] model ready: {} nodes, {} meshes, clip {:.2}s",
        scene.nodes.len(),
        scene.meshes.len(),
        scene.clip.as_ref().map(|c| c.duration).unwrap_or(0.0)
    );
    ctx.model = Some(ModelInstance::new(scene));
    ctx.assets.model = AssetStatus::Ready;
    let profile = ctx.profile;
    ctx.apply_layout(profile);
    overlay::update_loader(&document, 100);
    overlay::hide_loader(&document);
}

async fn load_sound(shared: SharedFrame) {
    let audio_ctx = shared.borrow().audio_ctx.clone();
    shared.borrow_mut().assets.audio = AssetStatus::Loading { progress: None };

    let result = async {
        let buffer = assets::fetch_array_buffer(AUDIO_URL, |_, _| {}).await?;
        assets::decode_audio(&audio_ctx, AUDIO_URL, &buffer).await
    }
    .await;
    let decoded = match result {
        Ok(decoded) => decoded,
        Err(e) => {
            log::error!("[assets] {}", e);
            shared.borrow_mut().assets.audio = AssetStatus::Failed(e);
            return;
        }
    };
    match audio::PortalSound::new(&audio_ctx, decoded) {
        Ok(sound) => {
            log::info!("[audio] portal sound ready ({:.2}s)", sound.duration_sec());
            let mut ctx = shared.borrow_mut();
            ctx.sound = Some(sound);
            ctx.assets.audio = AssetStatus::Ready;
        }
        Err(e) => {
            log::error!("[audio] {:?}", e);
            shared.borrow_mut().assets.audio = AssetStatus::Failed(AssetError::Decode {
                url: AUDIO_URL.to_string(),
                reason: e.to_string(),
            });
        }
    }
}
