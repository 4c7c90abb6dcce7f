//! Port traits: the hexagonal architecture boundary.
//!
//! These traits are defined here in `lens-core` (pure Rust).
//! Implementations live in `lens-platform` (browser adapters).
//! The core never imports platform code; it only depends on these traits.

use std::pin::Pin;
use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};
use lens_types::{
    Result,
    message::{GroundingSource, Sender},
};

// ─── Generation Port ─────────────────────────────────────────

/// Streaming event from a generation call
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationEvent {
    /// A partial text fragment
    Delta(String),
    /// Grounding sources reported alongside a chunk
    Sources(Vec<GroundingSource>),
    /// Stream finished
    Done,
    /// Error during streaming
    Error(String),
}

/// Tools the model may be granted for a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tool {
    GoogleSearch,
}

/// Per-call generation settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationConfig {
    /// Extended reasoning budget, in tokens
    pub thinking_budget: Option<u32>,
}

impl GenerationConfig {
    pub fn is_empty(&self) -> bool {
        self.thinking_budget.is_none()
    }
}

/// One role-tagged entry of replayed history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryTurn {
    pub sender: Sender,
    pub text: String,
}

/// Request to send to the generation API
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub model: String,
    pub config: GenerationConfig,
    pub tools: Vec<Tool>,
    pub system_instruction: String,
    /// Every prior message of the thread, oldest first
    pub history: Vec<HistoryTurn>,
    /// The new user message
    pub message: String,
}

pub type GenerationStream = Pin<Box<dyn Stream<Item = GenerationEvent>>>;

pub trait GenerationPort {
    /// Streaming generation; returns a stream of events.
    /// Transport failures surface as `GenerationEvent::Error`.
    fn stream_generate(&self, req: GenerationRequest) -> GenerationStream;

    /// Name of this backend (for logging/debug)
    fn backend_name(&self) -> &str;
}

// ─── Transcription Port ──────────────────────────────────────

/// A finished microphone recording
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

#[async_trait(?Send)]
pub trait TranscriptionPort {
    /// Send base64 audio plus an instruction prompt, get plain text back
    async fn transcribe(&self, base64_audio: &str, mime_type: &str, prompt: &str) -> Result<String>;
}

// ─── Speech Synthesis Port ───────────────────────────────────

#[async_trait(?Send)]
pub trait SpeechPort {
    /// Synthesize `text`; returns base64-encoded 16-bit PCM, or None when
    /// the response carried no audio payload.
    async fn synthesize(&self, text: &str) -> Result<Option<String>>;
}

// ─── Audio Output Port ───────────────────────────────────────

/// Decoded audio ready for playback
#[derive(Debug, Clone, PartialEq)]
pub struct PcmBuffer {
    pub sample_rate: u32,
    /// One vector of normalized samples per channel
    pub channels: Vec<Vec<f32>>,
}

impl PcmBuffer {
    pub fn frame_count(&self) -> usize {
        self.channels.first().map(|c| c.len()).unwrap_or(0)
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frame_count() as f64 / self.sample_rate as f64
    }
}

/// A single output slot. Implementations play at most one buffer at a time.
pub trait AudioOutputPort {
    fn play(&self, buffer: &PcmBuffer) -> Result<()>;

    /// Stop whatever is playing; no-op when idle
    fn stop(&self);
}

// ─── Microphone Port ─────────────────────────────────────────

#[async_trait(?Send)]
pub trait RecorderPort {
    /// Acquire the microphone and begin recording.
    /// Permission denial is `LensError::Permission`.
    async fn start(&self) -> Result<()>;

    /// Stop recording, release the microphone and return the clip
    async fn stop(&self) -> Result<AudioClip>;

    fn is_recording(&self) -> bool;
}

// ─── Storage Port ────────────────────────────────────────────

#[async_trait(?Send)]
pub trait StoragePort {
    /// Get a value by key
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Set a value
    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Delete a value
    async fn delete(&self, key: &str) -> Result<()>;

    /// Check if a key exists
    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }

    /// Name of this backend (for logging/debug)
    fn backend_name(&self) -> &str;
}
