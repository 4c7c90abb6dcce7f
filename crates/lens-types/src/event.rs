use serde::{Deserialize, Serialize};

/// Events emitted by the chat core.
/// UI subscribes to these for reactive updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChatEvent {
    /// A send started streaming into a thread
    TurnStart { thread_id: String, turn_id: u64 },

    /// The selector picked a model for this turn
    ModelSelected { model: String, web_search: bool },

    /// Running concatenation of streamed text so far
    Delta { thread_id: String, text: String },

    /// Deduplicated sources were attached to the finished message
    SourcesAttached { thread_id: String, count: usize },

    /// The turn finished normally
    TurnEnd { thread_id: String, turn_id: u64 },

    /// The remote call failed; the apology text was substituted
    TurnFailed { thread_id: String, message: String },

    /// A newer send to the same thread cancelled this one
    TurnSuperseded { thread_id: String, turn_id: u64 },

    TranscriptionStart,

    /// Text to place into the input field
    TranscriptionDone { text: String },

    /// Playback began for the message identified by `key`
    SpeakingStarted { key: String },

    SpeakingStopped,

    /// Blocking notice for the user (e.g. microphone denied)
    Alert { message: String },

    /// The thread collection changed and was re-persisted
    HistoryChanged,
}
