//! Microphone capture via `getUserMedia` + `MediaRecorder`.
//!
//! `start` asks for the microphone and begins buffering encoded chunks;
//! `stop` waits for the recorder's `stop` event, releases the microphone
//! tracks and returns the concatenated clip. The tracks are held by a
//! [`MicrophoneGuard`], so every exit path releases the microphone.

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::oneshot;
use js_sys::{Array, Uint8Array};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobEvent, BlobPropertyBag, MediaRecorder, MediaStream, MediaStreamConstraints, MediaStreamTrack};

use lens_core::ports::{AudioClip, RecorderPort};
use lens_core::voice::RECORDING_MIME_TYPE;
use lens_types::{LensError, Result};

/// Stops every track of the stream when dropped.
struct MicrophoneGuard(MediaStream);

impl Drop for MicrophoneGuard {
    fn drop(&mut self) {
        for track in self.0.get_tracks().iter() {
            if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
                track.stop();
            }
        }
        log::debug!("Microphone released");
    }
}

struct ActiveRecording {
    recorder: MediaRecorder,
    microphone: MicrophoneGuard,
    chunks: Rc<RefCell<Vec<Blob>>>,
    _on_data: Closure<dyn FnMut(BlobEvent)>,
}

#[derive(Default)]
pub struct MediaRecorderAdapter {
    active: RefCell<Option<ActiveRecording>>,
}

impl MediaRecorderAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    async fn open_microphone() -> Result<MediaStream> {
        let window = web_sys::window()
            .ok_or_else(|| LensError::Audio("No window object".to_string()))?;
        let devices = window
            .navigator()
            .media_devices()
            .map_err(|e| LensError::Permission(format!("{:?}", e)))?;

        let constraints = MediaStreamConstraints::new();
        constraints.set_audio(&JsValue::TRUE);
        let promise = devices
            .get_user_media_with_constraints(&constraints)
            .map_err(|e| LensError::Permission(format!("{:?}", e)))?;

        JsFuture::from(promise)
            .await
            .map_err(|e| LensError::Permission(format!("{:?}", e)))?
            .dyn_into()
            .map_err(|e| LensError::JsInterop(format!("{:?}", e)))
    }
}

#[async_trait(?Send)]
impl RecorderPort for MediaRecorderAdapter {
    async fn start(&self) -> Result<()> {
        if self.is_recording() {
            return Ok(());
        }
        let microphone = MicrophoneGuard(Self::open_microphone().await?);
        let recorder = MediaRecorder::new_with_media_stream(&microphone.0)
            .map_err(|e| LensError::Audio(format!("{:?}", e)))?;

        let chunks: Rc<RefCell<Vec<Blob>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = chunks.clone();
        let on_data = Closure::<dyn FnMut(BlobEvent)>::new(move |event: BlobEvent| {
            if let Some(blob) = event.data() {
                sink.borrow_mut().push(blob);
            }
        });
        recorder.set_ondataavailable(Some(on_data.as_ref().unchecked_ref()));
        recorder
            .start()
            .map_err(|e| LensError::Audio(format!("{:?}", e)))?;

        log::info!("Recording started");
        *self.active.borrow_mut() = Some(ActiveRecording {
            recorder,
            microphone,
            chunks,
            _on_data: on_data,
        });
        Ok(())
    }

    async fn stop(&self) -> Result<AudioClip> {
        let ActiveRecording {
            recorder,
            microphone,
            chunks,
            _on_data,
        } = self
            .active
            .borrow_mut()
            .take()
            .ok_or_else(|| LensError::Audio("Not recording".to_string()))?;

        let (tx, rx) = oneshot::channel::<()>();
        let tx = RefCell::new(Some(tx));
        let on_stop = Closure::<dyn FnMut()>::new(move || {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(());
            }
        });
        recorder.set_onstop(Some(on_stop.as_ref().unchecked_ref()));
        recorder
            .stop()
            .map_err(|e| LensError::Audio(format!("{:?}", e)))?;
        rx.await
            .map_err(|_| LensError::Audio("Recorder closed before stopping".to_string()))?;
        recorder.set_onstop(None);
        recorder.set_ondataavailable(None);
        drop(microphone);

        let parts = Array::new();
        for chunk in chunks.borrow().iter() {
            parts.push(chunk);
        }
        let bag = BlobPropertyBag::new();
        bag.set_type(RECORDING_MIME_TYPE);
        let blob = Blob::new_with_blob_sequence_and_options(&parts, &bag)
            .map_err(|e| LensError::Audio(format!("{:?}", e)))?;
        let buffer = JsFuture::from(blob.array_buffer())
            .await
            .map_err(|e| LensError::Audio(format!("{:?}", e)))?;
        let bytes = Uint8Array::new(&buffer).to_vec();

        log::info!("Recording stopped: {} bytes", bytes.len());
        Ok(AudioClip {
            bytes,
            mime_type: RECORDING_MIME_TYPE.to_string(),
        })
    }

    fn is_recording(&self) -> bool {
        self.active.borrow().is_some()
    }
}
