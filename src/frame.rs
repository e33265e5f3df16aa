use crate::audio::PortalSound;
use crate::core::{
    AssetBoard, CameraRig, Cues, DragState, EffectsDriver, Generation, ModelInstance,
    OrbitControls, PortalSequencer, Readiness, ViewportProfile,
};
use crate::dom;
use crate::overlay;
use crate::portal;
use crate::render;
use instant::Instant;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub type SharedFrame = Rc<RefCell<FrameContext<'static>>>;

pub struct FrameContext<'a> {
    pub document: web::Document,
    pub canvas: web::HtmlCanvasElement,
    pub audio_ctx: web::AudioContext,
    pub gpu: Option<render::GpuState<'a>>,

    pub assets: AssetBoard,
    pub model: Option<ModelInstance>,
    pub sound: Option<PortalSound>,

    pub sequencer: PortalSequencer,
    /// Transition generation the running clip was started for.
    pub clip_generation: Generation,
    pub effects: EffectsDriver,
    pub rig: CameraRig,
    pub orbit: OrbitControls,
    pub profile: ViewportProfile,
    pub drag: DragState,

    pub rng: StdRng,
    pub last_instant: Instant,
}

impl<'a> FrameContext<'a> {
    pub fn new(
        document: web::Document,
        canvas: web::HtmlCanvasElement,
        audio_ctx: web::AudioContext,
        profile: ViewportProfile,
    ) -> Self {
        let rest = profile.rig_rest();
        let mut sequencer = PortalSequencer::new(profile.shake_tuning());
        sequencer.set_bloom(profile.bloom());
        Self {
            document,
            canvas,
            audio_ctx,
            gpu: None,
            assets: AssetBoard::default(),
            model: None,
            sound: None,
            sequencer,
            clip_generation: Generation::default(),
            effects: EffectsDriver::new(),
            rig: CameraRig::new(rest),
            orbit: OrbitControls::new(profile.orbit_target(), rest),
            profile,
            drag: DragState::default(),
            rng: StdRng::from_entropy(),
            last_instant: Instant::now(),
        }
    }

    /// Which transition preconditions currently hold.
    pub fn readiness(&self) -> Readiness {
        Readiness {
            model: self.assets.model.is_ready() && self.model.as_ref().is_some_and(|m| m.has_clip()),
            audio: self.assets.audio.is_ready() && self.sound.is_some(),
        }
    }

    /// Re-derive everything that depends on the viewport size.
    pub fn apply_layout(&mut self, profile: ViewportProfile) {
        self.profile = profile;
        let (w, h) = profile.backing_size();
        dom::sync_canvas_backing_size(&self.canvas, w, h);
        if let Some(gpu) = &mut self.gpu {
            gpu.resize_if_needed(w, h);
        }
        self.rig.place(profile.rig_rest());
        self.orbit.reset(profile.orbit_target(), profile.rig_rest());
        self.sequencer.set_shake_tuning(profile.shake_tuning());
        self.sequencer.set_bloom(profile.bloom());
        log::info!(
            "[portal] layout {}x{} mobile={} dpr={:.2}",
            profile.width,
            profile.height,
            profile.mobile,
            profile.pixel_ratio
        );
    }

    pub fn camera(&self) -> render::CameraView {
        let target = self.orbit.target();
        render::CameraView {
            eye: target + self.orbit.offset() + self.rig.offset(),
            target,
            aspect: self.profile.aspect(),
        }
    }

    /// Advance the clip, the transition and the effects by one frame.
    /// Cues raised along the way are collected into `out`.
    pub fn step(&mut self, now_ms: f64, dt_sec: f32, out: &mut Cues) {
        if let Some(model) = &mut self.model {
            if model.advance(dt_sec) {
                log::info!("[portal] animation finished");
                self.sequencer
                    .on_animation_finished(self.clip_generation, now_ms, out);
            }
        }
        self.sequencer.tick(now_ms, out);

        if let Some(px) = self
            .effects
            .tick(now_ms, dt_sec, &mut self.rng, &mut self.rig)
        {
            overlay::set_blur(&self.document, px);
        }
        self.orbit.update();
    }

    fn draw(&mut self) {
        let camera = self.camera();
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        let (w, h) = self.profile.backing_size();
        gpu.resize_if_needed(w, h);
        let world = self.model.as_ref().map(|m| m.world()).unwrap_or(&[]);
        match gpu.render(&camera, world) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("[render] surface lost, reconfiguring");
                gpu.reconfigure();
            }
            Err(e) => log::error!("[render] frame error: {:?}", e),
        }
    }
}

/// One animation frame: simulate, apply raised cues, draw.
pub fn frame(shared: &SharedFrame) {
    let mut ctx = shared.borrow_mut();
    let now = Instant::now();
    let dt_sec = (now - ctx.last_instant).as_secs_f32();
    ctx.last_instant = now;
    let now_ms = dom::now_ms();

    let mut cues = Cues::new();
    ctx.step(now_ms, dt_sec, &mut cues);
    portal::apply_cues(shared, &mut ctx, &cues, now_ms);
    ctx.draw();
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("[render] WebGPU init error: {:?}", e);
            None
        }
    }
}

pub fn start_loop(shared: SharedFrame) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame(&shared);
        if let (Some(w), Some(cb)) = (web::window(), tick_clone.borrow().as_ref()) {
            _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut()>));
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
