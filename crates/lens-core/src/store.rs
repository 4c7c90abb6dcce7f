//! Conversation store.
//!
//! `ConversationStore` is the in-memory thread collection (most recent first)
//! plus the active thread id. `SharedStore` wraps it for the single-threaded
//! app: every mutation runs inside one scoped borrow, then the whole
//! collection is serialized and written under a single storage key.

use std::cell::RefCell;
use std::rc::Rc;

use lens_types::{
    LensError, Result,
    event::ChatEvent,
    message::{ChatMessage, Feedback, GroundingSource},
    thread::{title_from_message, ConversationThread},
};
use crate::event_bus::EventBus;
use crate::persona::welcome_message;
use crate::ports::StoragePort;

/// Storage key holding the serialized thread collection
pub const CHAT_HISTORY_KEY: &str = "chatHistory";

/// What a delete request did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The caller did not confirm; nothing changed
    NotConfirmed,
    /// Thread removed; `active` is the active thread afterwards
    Deleted { active: Option<String> },
    /// The last thread was removed and a fresh one created in its place
    Recreated { new_id: String },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationStore {
    threads: Vec<ConversationThread>,
    active_id: Option<String>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a loaded collection; the most recent thread becomes active.
    pub fn from_threads(threads: Vec<ConversationThread>) -> Self {
        let active_id = threads.first().map(|t| t.id.clone());
        Self { threads, active_id }
    }

    pub fn from_blob(data: &[u8]) -> Result<Self> {
        let threads: Vec<ConversationThread> = serde_json::from_slice(data)?;
        Ok(Self::from_threads(threads))
    }

    /// The entire collection as one JSON blob
    pub fn to_blob(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.threads)?)
    }

    pub fn threads(&self) -> &[ConversationThread] {
        &self.threads
    }

    pub fn len(&self) -> usize {
        self.threads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    pub fn active(&self) -> Option<&ConversationThread> {
        self.active_id.as_deref().and_then(|id| self.get(id))
    }

    pub fn get(&self, thread_id: &str) -> Option<&ConversationThread> {
        self.threads.iter().find(|t| t.id == thread_id)
    }

    fn get_mut(&mut self, thread_id: &str) -> Result<&mut ConversationThread> {
        self.threads
            .iter_mut()
            .find(|t| t.id == thread_id)
            .ok_or_else(|| LensError::NotFound(format!("thread {}", thread_id)))
    }

    fn message_mut(&mut self, thread_id: &str, index: usize) -> Result<&mut ChatMessage> {
        self.get_mut(thread_id)?
            .messages
            .get_mut(index)
            .ok_or_else(|| LensError::NotFound(format!("message {} in thread {}", index, thread_id)))
    }

    /// Start a new thread seeded with the welcome message and make it active.
    pub fn create_thread(&mut self, user_name: &str) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        let mut thread = ConversationThread::new(id.clone());
        thread.messages.push(ChatMessage::ai(welcome_message(user_name)));
        self.threads.insert(0, thread);
        self.active_id = Some(id.clone());
        id
    }

    pub fn select(&mut self, thread_id: &str) -> Result<()> {
        if self.get(thread_id).is_none() {
            return Err(LensError::NotFound(format!("thread {}", thread_id)));
        }
        self.active_id = Some(thread_id.to_string());
        Ok(())
    }

    /// Append a message; returns its index within the thread.
    pub fn append(&mut self, thread_id: &str, message: ChatMessage) -> Result<usize> {
        let thread = self.get_mut(thread_id)?;
        thread.messages.push(message);
        Ok(thread.messages.len() - 1)
    }

    /// Overwrite a message's text in place (used for the streaming reply).
    pub fn set_message_text(&mut self, thread_id: &str, index: usize, text: &str) -> Result<()> {
        let message = self.message_mut(thread_id, index)?;
        message.text.clear();
        message.text.push_str(text);
        Ok(())
    }

    /// Remove the message at `index` if it is the thread's trailing, still
    /// empty AI reply. Returns whether anything was removed.
    pub fn discard_placeholder(&mut self, thread_id: &str, index: usize) -> Result<bool> {
        let thread = self.get_mut(thread_id)?;
        let is_placeholder = index + 1 == thread.messages.len()
            && thread.messages[index].is_ai()
            && thread.messages[index].text.is_empty();
        if is_placeholder {
            thread.messages.pop();
        }
        Ok(is_placeholder)
    }

    pub fn set_sources(
        &mut self,
        thread_id: &str,
        index: usize,
        sources: Vec<GroundingSource>,
    ) -> Result<()> {
        self.message_mut(thread_id, index)?.sources = sources;
        Ok(())
    }

    pub fn set_feedback(
        &mut self,
        thread_id: &str,
        index: usize,
        feedback: Option<Feedback>,
    ) -> Result<()> {
        self.message_mut(thread_id, index)?.feedback = feedback;
        Ok(())
    }

    /// Title the thread after its first user message.
    /// Returns false when the thread already has a conversation going.
    pub fn rename_from_first_user_message(&mut self, thread_id: &str, text: &str) -> Result<bool> {
        let thread = self.get_mut(thread_id)?;
        if !thread.awaiting_first_user_message() {
            return Ok(false);
        }
        thread.title = title_from_message(text);
        Ok(true)
    }

    /// Permanently delete a thread. Requires `confirmed`.
    ///
    /// Deleting the active thread activates the most recent remaining one,
    /// or creates a fresh thread when none remain.
    pub fn delete(&mut self, thread_id: &str, confirmed: bool, user_name: &str) -> Result<DeleteOutcome> {
        if !confirmed {
            return Ok(DeleteOutcome::NotConfirmed);
        }
        let position = self
            .threads
            .iter()
            .position(|t| t.id == thread_id)
            .ok_or_else(|| LensError::NotFound(format!("thread {}", thread_id)))?;
        self.threads.remove(position);

        if self.active_id.as_deref() == Some(thread_id) {
            match self.threads.first() {
                Some(next) => self.active_id = Some(next.id.clone()),
                None => {
                    self.active_id = None;
                    let new_id = self.create_thread(user_name);
                    return Ok(DeleteOutcome::Recreated { new_id });
                }
            }
        }
        Ok(DeleteOutcome::Deleted {
            active: self.active_id.clone(),
        })
    }

    /// Threads whose title or any message contains `term`, case-insensitively.
    pub fn search(&self, term: &str) -> Vec<&ConversationThread> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return self.threads.iter().collect();
        }
        self.threads
            .iter()
            .filter(|t| {
                t.title.to_lowercase().contains(&term)
                    || t.messages.iter().any(|m| m.text.to_lowercase().contains(&term))
            })
            .collect()
    }
}

// ─── Shared, persisted store ─────────────────────────────────

/// Clone-cheap handle to the store plus its persistence backend.
#[derive(Clone)]
pub struct SharedStore {
    inner: Rc<RefCell<ConversationStore>>,
    storage: Rc<dyn StoragePort>,
    event_bus: EventBus,
}

impl SharedStore {
    pub fn new(store: ConversationStore, storage: Rc<dyn StoragePort>, event_bus: EventBus) -> Self {
        Self {
            inner: Rc::new(RefCell::new(store)),
            storage,
            event_bus,
        }
    }

    /// Read the persisted collection. A missing key yields an empty store;
    /// an unreadable blob is logged and replaced by an empty store.
    pub async fn open(storage: Rc<dyn StoragePort>, event_bus: EventBus) -> Result<Self> {
        let store = match storage.get(CHAT_HISTORY_KEY).await? {
            Some(data) => match ConversationStore::from_blob(&data) {
                Ok(store) => {
                    log::info!("Restored {} threads from {}", store.len(), storage.backend_name());
                    store
                }
                Err(e) => {
                    log::warn!("Discarding unreadable chat history: {}", e);
                    ConversationStore::new()
                }
            },
            None => ConversationStore::new(),
        };
        Ok(Self::new(store, storage, event_bus))
    }

    /// Run `f` against a shared borrow.
    pub fn read<R>(&self, f: impl FnOnce(&ConversationStore) -> R) -> R {
        f(&self.inner.borrow())
    }

    /// One read-modify-write cycle: mutate inside a scoped borrow, snapshot
    /// the whole collection, release the borrow, then persist the snapshot.
    ///
    /// Mutation errors propagate and nothing is written. Persistence errors
    /// are logged; memory keeps the mutation until the next successful write.
    pub async fn update<R>(&self, f: impl FnOnce(&mut ConversationStore) -> Result<R>) -> Result<R> {
        let (result, snapshot) = {
            let mut store = self.inner.borrow_mut();
            let result = f(&mut store)?;
            let snapshot = if store.is_empty() {
                None
            } else {
                Some(store.to_blob()?)
            };
            (result, snapshot)
        };

        if let Err(e) = self.persist(snapshot).await {
            log::error!("Failed to persist chat history: {}", e);
        }
        self.event_bus.emit(ChatEvent::HistoryChanged);
        Ok(result)
    }

    async fn persist(&self, snapshot: Option<Vec<u8>>) -> Result<()> {
        match snapshot {
            Some(blob) => self.storage.set(CHAT_HISTORY_KEY, &blob).await,
            None => self.storage.delete(CHAT_HISTORY_KEY).await,
        }
    }

    /// Make sure there is an active thread, creating one if the store is empty.
    pub async fn ensure_active(&self, user_name: &str) -> Result<String> {
        if let Some(id) = self.read(|s| s.active_id().map(String::from)) {
            return Ok(id);
        }
        let name = user_name.to_string();
        self.update(move |s| {
            if let Some(first) = s.threads().first().map(|t| t.id.clone()) {
                s.select(&first)?;
                return Ok(first);
            }
            Ok(s.create_thread(&name))
        })
        .await
    }
}
