//! Voice input/output.
//!
//! Capture: record until stopped, base64 the clip, transcribe, hand the text
//! back verbatim for the input field.
//! Playback: synthesize speech, decode 16-bit little-endian PCM into
//! normalized floats and play it through a single output slot.

use std::cell::{Cell, RefCell};

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use lens_types::{LensError, Result, event::ChatEvent};

use crate::event_bus::EventBus;
use crate::ports::{AudioClip, AudioOutputPort, PcmBuffer, RecorderPort, SpeechPort, TranscriptionPort};

pub const SPEECH_SAMPLE_RATE: u32 = 24_000;
pub const SPEECH_CHANNELS: usize = 1;
pub const RECORDING_MIME_TYPE: &str = "audio/webm";

pub const TRANSCRIBE_PROMPT: &str = "Transcribe this audio clip.";
pub const TRANSCRIBING_PLACEHOLDER: &str = "Transcribing...";
pub const TRANSCRIBE_FAILED_TEXT: &str = "Sorry, I couldn't transcribe that.";
pub const MIC_DENIED_TEXT: &str =
    "Microphone access was denied. Please allow it in your browser settings to use this feature.";

// ─── Byte-format helpers ─────────────────────────────────────

pub fn encode_base64(bytes: &[u8]) -> String {
    BASE64_STANDARD.encode(bytes)
}

pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    BASE64_STANDARD
        .decode(data.trim())
        .map_err(|e| LensError::Audio(format!("invalid base64 audio: {}", e)))
}

/// Decode interleaved 16-bit little-endian PCM into per-channel f32 samples.
pub fn decode_pcm16(bytes: &[u8], sample_rate: u32, channels: usize) -> Result<PcmBuffer> {
    if channels == 0 {
        return Err(LensError::Audio("channel count must be positive".to_string()));
    }
    if bytes.len() % 2 != 0 {
        return Err(LensError::Audio(format!(
            "PCM16 payload has odd length {}",
            bytes.len()
        )));
    }

    let samples: Vec<i16> = bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    let frames = samples.len() / channels;

    let mut out = vec![Vec::with_capacity(frames); channels];
    for frame in 0..frames {
        for (channel, data) in out.iter_mut().enumerate() {
            data.push(samples[frame * channels + channel] as f32 / 32768.0);
        }
    }

    Ok(PcmBuffer {
        sample_rate,
        channels: out,
    })
}

// ─── Capture ─────────────────────────────────────────────────

/// Drives a recorder and the transcription call.
///
/// While a start is waiting on the permission prompt the capture is
/// "starting"; a cancel issued then stops the recorder as soon as the
/// start lands.
pub struct VoiceCapture {
    event_bus: EventBus,
    starting: Cell<bool>,
    cancel_requested: Cell<bool>,
}

impl VoiceCapture {
    pub fn new(event_bus: EventBus) -> Self {
        Self {
            event_bus,
            starting: Cell::new(false),
            cancel_requested: Cell::new(false),
        }
    }

    /// Whether a start is still waiting for the microphone
    pub fn is_starting(&self) -> bool {
        self.starting.get()
    }

    /// Start recording. A permission denial raises a blocking alert.
    /// Returns `Cancelled` if [`cancel`](Self::cancel) ran meanwhile.
    pub async fn start(&self, recorder: &dyn RecorderPort) -> Result<()> {
        self.starting.set(true);
        self.cancel_requested.set(false);
        let result = recorder.start().await;
        self.starting.set(false);

        match result {
            Ok(()) if self.cancel_requested.replace(false) => {
                log::info!("Recording cancelled while starting");
                if let Err(e) = recorder.stop().await {
                    log::warn!("Could not stop cancelled recording: {}", e);
                }
                Err(LensError::Cancelled)
            }
            Ok(()) => Ok(()),
            Err(LensError::Permission(detail)) => {
                log::error!("Microphone access denied: {}", detail);
                self.event_bus.emit(ChatEvent::Alert {
                    message: MIC_DENIED_TEXT.to_string(),
                });
                Err(LensError::Permission(detail))
            }
            Err(e) => {
                log::error!("Failed to start recording: {}", e);
                Err(e)
            }
        }
    }

    /// Abandon the capture without transcribing. Stops a live recording,
    /// or marks a pending start to be stopped when it completes.
    pub async fn cancel(&self, recorder: &dyn RecorderPort) {
        if self.starting.get() {
            self.cancel_requested.set(true);
            return;
        }
        if recorder.is_recording() {
            log::info!("Discarding active recording");
            if let Err(e) = recorder.stop().await {
                log::warn!("Could not stop recording: {}", e);
            }
        }
    }

    /// Stop recording and transcribe. Always yields text for the input
    /// field: the transcription, or a fixed placeholder on any failure.
    pub async fn finish(&self, recorder: &dyn RecorderPort, transcriber: &dyn TranscriptionPort) -> String {
        self.event_bus.emit(ChatEvent::TranscriptionStart);
        let text = match recorder.stop().await {
            Ok(clip) => transcribe_clip(&clip, transcriber).await,
            Err(e) => {
                log::error!("Recording failed: {}", e);
                TRANSCRIBE_FAILED_TEXT.to_string()
            }
        };
        self.event_bus.emit(ChatEvent::TranscriptionDone { text: text.clone() });
        text
    }
}

/// Transcribe one clip; failures become the placeholder text.
pub async fn transcribe_clip(clip: &AudioClip, transcriber: &dyn TranscriptionPort) -> String {
    let encoded = encode_base64(&clip.bytes);
    match transcriber
        .transcribe(&encoded, &clip.mime_type, TRANSCRIBE_PROMPT)
        .await
    {
        Ok(text) => text,
        Err(e) => {
            log::error!("Transcription error: {}", e);
            TRANSCRIBE_FAILED_TEXT.to_string()
        }
    }
}

// ─── Playback ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeakOutcome {
    /// Blank text; nothing happened
    Ignored,
    /// The same message was already playing and has been stopped
    Stopped,
    /// Audio is now playing
    Playing,
    /// No usable audio came back; speaking state cleared
    Aborted,
    /// A newer speak request took over while this one was in flight
    Superseded,
}

/// Owns the single audio output slot.
pub struct PlaybackController {
    speaking: RefCell<Option<String>>,
    request_counter: Cell<u64>,
    event_bus: EventBus,
}

impl PlaybackController {
    pub fn new(event_bus: EventBus) -> Self {
        Self {
            speaking: RefCell::new(None),
            request_counter: Cell::new(0),
            event_bus,
        }
    }

    /// Key of the message currently being spoken
    pub fn speaking_key(&self) -> Option<String> {
        self.speaking.borrow().clone()
    }

    /// Speak `text` for the message identified by `key`, or stop it if that
    /// message is already speaking. Whatever was playing stops first.
    pub async fn speak(
        &self,
        key: &str,
        text: &str,
        speech: &dyn SpeechPort,
        output: &dyn AudioOutputPort,
    ) -> SpeakOutcome {
        if text.trim().is_empty() {
            return SpeakOutcome::Ignored;
        }
        if self.speaking.borrow().as_deref() == Some(key) {
            self.stop(output);
            return SpeakOutcome::Stopped;
        }

        output.stop();
        let request = self.request_counter.get() + 1;
        self.request_counter.set(request);
        *self.speaking.borrow_mut() = Some(key.to_string());
        self.event_bus.emit(ChatEvent::SpeakingStarted { key: key.to_string() });

        let payload = speech.synthesize(text).await;
        if self.request_counter.get() != request {
            log::debug!("Discarding stale speech response for {}", key);
            return SpeakOutcome::Superseded;
        }

        let base64_audio = match payload {
            Ok(Some(data)) => data,
            Ok(None) => {
                log::warn!("Speech response carried no audio");
                self.clear();
                return SpeakOutcome::Aborted;
            }
            Err(e) => {
                log::error!("TTS error: {}", e);
                self.clear();
                return SpeakOutcome::Aborted;
            }
        };

        let played = decode_base64(&base64_audio)
            .and_then(|bytes| decode_pcm16(&bytes, SPEECH_SAMPLE_RATE, SPEECH_CHANNELS))
            .and_then(|buffer| output.play(&buffer));
        match played {
            Ok(()) => SpeakOutcome::Playing,
            Err(e) => {
                log::error!("Playback failed: {}", e);
                self.clear();
                SpeakOutcome::Aborted
            }
        }
    }

    /// Stop playback and forget any in-flight request.
    pub fn stop(&self, output: &dyn AudioOutputPort) {
        output.stop();
        self.request_counter.set(self.request_counter.get() + 1);
        self.clear();
    }

    /// Called by the output adapter when a buffer finishes on its own.
    pub fn playback_ended(&self, key: &str) {
        if self.speaking.borrow().as_deref() == Some(key) {
            self.clear();
        }
    }

    fn clear(&self) {
        if self.speaking.borrow_mut().take().is_some() {
            self.event_bus.emit(ChatEvent::SpeakingStopped);
        }
    }
}
