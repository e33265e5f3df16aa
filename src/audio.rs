use std::cell::RefCell;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

const PORTAL_SOUND_GAIN: f32 = 1.0;

fn create_gain(audio_ctx: &web::AudioContext, value: f32, label: &str) -> anyhow::Result<web::GainNode> {
    let g = web::GainNode::new(audio_ctx)
        .map_err(|e| anyhow::anyhow!("{} GainNode error: {:?}", label, e))?;
    g.gain().set_value(value);
    Ok(g)
}

/// One-shot playback of the decoded portal sound.
///
/// Every `play` starts a fresh buffer source. A source still playing is
/// stopped first with its `ended` handler detached, so only the newest
/// playback ever reports completion.
pub struct PortalSound {
    audio_ctx: web::AudioContext,
    buffer: web::AudioBuffer,
    output: web::GainNode,
    current: RefCell<Option<web::AudioBufferSourceNode>>,
}

impl PortalSound {
    pub fn new(audio_ctx: &web::AudioContext, buffer: web::AudioBuffer) -> anyhow::Result<Self> {
        let output = create_gain(audio_ctx, PORTAL_SOUND_GAIN, "Portal sound")?;
        _ = output.connect_with_audio_node(&audio_ctx.destination());
        Ok(Self {
            audio_ctx: audio_ctx.clone(),
            buffer,
            output,
            current: RefCell::new(None),
        })
    }

    pub fn duration_sec(&self) -> f64 {
        self.buffer.duration()
    }

    /// Start playback; `on_ended` runs once when this playback finishes.
    pub fn play(&self, on_ended: impl FnOnce() + 'static) -> anyhow::Result<()> {
        self.stop();
        _ = self.audio_ctx.resume();
        let source = self
            .audio_ctx
            .create_buffer_source()
            .map_err(|e| anyhow::anyhow!("AudioBufferSourceNode error: {:?}", e))?;
        source.set_buffer(Some(&self.buffer));
        source
            .connect_with_audio_node(&self.output)
            .map_err(|e| anyhow::anyhow!("connect error: {:?}", e))?;
        let scheduled: &web::AudioScheduledSourceNode = source.as_ref();
        let ended = Closure::once_into_js(on_ended);
        scheduled.set_onended(Some(ended.unchecked_ref()));
        scheduled
            .start()
            .map_err(|e| anyhow::anyhow!("start error: {:?}", e))?;
        *self.current.borrow_mut() = Some(source);
        Ok(())
    }

    /// Stop the current playback without reporting completion.
    pub fn stop(&self) {
        if let Some(source) = self.current.borrow_mut().take() {
            let scheduled: &web::AudioScheduledSourceNode = source.as_ref();
            scheduled.set_onended(None);
            _ = scheduled.stop();
            _ = source.disconnect();
        }
    }
}
