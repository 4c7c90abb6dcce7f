//! Web Audio output with a single source slot.
//!
//! The `AudioContext` is created lazily on first play (browsers refuse to
//! start audio before a user gesture) at the speech sample rate. Starting a
//! buffer always stops and detaches the previous source first.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{AudioBufferSourceNode, AudioContext, AudioContextOptions, AudioContextState};

use lens_core::ports::{AudioOutputPort, PcmBuffer};
use lens_core::voice::SPEECH_SAMPLE_RATE;
use lens_types::{LensError, Result};

struct ActiveSource {
    node: AudioBufferSourceNode,
    _on_ended: Closure<dyn FnMut()>,
}

pub struct WebAudioOutput {
    context: RefCell<Option<AudioContext>>,
    current: RefCell<Option<ActiveSource>>,
    /// Fired when a buffer plays to the end on its own
    on_ended: Rc<dyn Fn()>,
}

impl WebAudioOutput {
    pub fn new(on_ended: Rc<dyn Fn()>) -> Self {
        Self {
            context: RefCell::new(None),
            current: RefCell::new(None),
            on_ended,
        }
    }

    fn context(&self) -> Result<AudioContext> {
        if let Some(ctx) = self.context.borrow().as_ref() {
            return Ok(ctx.clone());
        }
        let options = AudioContextOptions::new();
        options.set_sample_rate(SPEECH_SAMPLE_RATE as f32);
        let ctx = AudioContext::new_with_context_options(&options)
            .map_err(|e| LensError::Audio(format!("{:?}", e)))?;
        *self.context.borrow_mut() = Some(ctx.clone());
        Ok(ctx)
    }
}

impl AudioOutputPort for WebAudioOutput {
    fn play(&self, buffer: &PcmBuffer) -> Result<()> {
        self.stop();
        let frames = buffer.frame_count();
        if frames == 0 {
            return Err(LensError::Audio("Empty audio buffer".to_string()));
        }

        let ctx = self.context()?;
        if ctx.state() == AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let audio = ctx
            .create_buffer(buffer.channels.len() as u32, frames as u32, buffer.sample_rate as f32)
            .map_err(|e| LensError::Audio(format!("{:?}", e)))?;
        for (index, samples) in buffer.channels.iter().enumerate() {
            let mut samples = samples.clone();
            audio
                .copy_to_channel(&mut samples, index as i32)
                .map_err(|e| LensError::Audio(format!("{:?}", e)))?;
        }

        let node = ctx
            .create_buffer_source()
            .map_err(|e| LensError::Audio(format!("{:?}", e)))?;
        node.set_buffer(Some(&audio));
        node.connect_with_audio_node(&ctx.destination())
            .map_err(|e| LensError::Audio(format!("{:?}", e)))?;

        let notify = self.on_ended.clone();
        let on_ended = Closure::<dyn FnMut()>::new(move || notify());
        node.set_onended(Some(on_ended.as_ref().unchecked_ref()));
        node.start().map_err(|e| LensError::Audio(format!("{:?}", e)))?;

        log::debug!("Playing {:.2}s of audio", buffer.duration_secs());
        *self.current.borrow_mut() = Some(ActiveSource {
            node,
            _on_ended: on_ended,
        });
        Ok(())
    }

    fn stop(&self) {
        if let Some(active) = self.current.borrow_mut().take() {
            // Detach first so a manual stop never reports a natural end
            active.node.set_onended(None);
            let _ = active.node.stop();
            let _ = active.node.disconnect();
        }
    }
}
