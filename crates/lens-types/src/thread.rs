use serde::{Deserialize, Serialize};
use crate::message::ChatMessage;

pub const DEFAULT_THREAD_TITLE: &str = "New Conversation";
/// Titles derived from the first user message are cut to this many chars
pub const TITLE_MAX_CHARS: usize = 30;

/// One saved conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationThread {
    pub id: String,
    pub title: String,
    pub messages: Vec<ChatMessage>,
    /// RFC 3339 creation time
    pub date: String,
}

impl ConversationThread {
    pub fn new(id: String) -> Self {
        Self {
            id,
            title: DEFAULT_THREAD_TITLE.to_string(),
            messages: Vec::new(),
            date: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// True while the thread holds nothing beyond the seeded welcome
    pub fn awaiting_first_user_message(&self) -> bool {
        self.messages.len() <= 1
    }

    pub fn summary(&self) -> ThreadSummary {
        ThreadSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            date: self.date.clone(),
            message_count: self.messages.len(),
        }
    }
}

/// Title derived from a user's opening message
pub fn title_from_message(text: &str) -> String {
    text.chars().take(TITLE_MAX_CHARS).collect()
}

/// Summary of a thread for listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadSummary {
    pub id: String,
    pub title: String,
    pub date: String,
    pub message_count: usize,
}
