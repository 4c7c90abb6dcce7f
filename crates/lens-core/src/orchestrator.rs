//! Chat orchestrator: one streamed assistant reply per send.
//!
//! 1. Pick model/tools for the utterance
//! 2. Replay the thread's full history, append the user message and an empty
//!    assistant placeholder
//! 3. Stream fragments into an append-only buffer, overwriting the
//!    placeholder with the running concatenation after each fragment
//! 4. Attach deduplicated grounding sources, or substitute the apology text
//!    if the remote call fails
//!
//! Each in-flight turn holds an abort handle keyed by thread. A new send to
//! the same thread aborts the older stream instead of racing it, and an
//! aborted turn never leaves an empty placeholder behind.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use futures::future::{AbortHandle, Abortable};
use futures::StreamExt;
use lens_types::{
    LensError, Result,
    config::ModelPresets,
    event::ChatEvent,
    message::{ChatMessage, GroundingSource},
    profile::UserProfile,
};

use crate::event_bus::EventBus;
use crate::persona::build_system_instruction;
use crate::ports::{GenerationEvent, GenerationPort, GenerationRequest, HistoryTurn};
use crate::selector::select_model;
use crate::store::SharedStore;

/// In-persona text shown when generation fails
pub const APOLOGY_TEXT: &str =
    "A temporal distortion occurred. I couldn't process that. Please try again.";

#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    Completed {
        text: String,
        sources: Vec<GroundingSource>,
    },
    Failed {
        message: String,
    },
    /// A newer send to the same thread cancelled this one
    Superseded,
}

struct InFlightTurn {
    turn_id: u64,
    handle: AbortHandle,
    reply_index: usize,
}

pub struct ChatOrchestrator {
    store: SharedStore,
    event_bus: EventBus,
    presets: RefCell<ModelPresets>,
    in_flight: RefCell<HashMap<String, InFlightTurn>>,
    turn_counter: Cell<u64>,
}

impl ChatOrchestrator {
    pub fn new(store: SharedStore, event_bus: EventBus, presets: ModelPresets) -> Self {
        Self {
            store,
            event_bus,
            presets: RefCell::new(presets),
            in_flight: RefCell::new(HashMap::new()),
            turn_counter: Cell::new(0),
        }
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn set_presets(&self, presets: ModelPresets) {
        *self.presets.borrow_mut() = presets;
    }

    /// Whether a reply is currently streaming into `thread_id`
    pub fn is_streaming(&self, thread_id: &str) -> bool {
        self.in_flight.borrow().contains_key(thread_id)
    }

    /// Abort the in-flight stream for a thread, if any.
    pub fn cancel(&self, thread_id: &str) -> bool {
        match self.in_flight.borrow_mut().remove(thread_id) {
            Some(turn) => {
                log::info!("Cancelling turn {} on thread {}", turn.turn_id, thread_id);
                turn.handle.abort();
                true
            }
            None => false,
        }
    }

    /// Abort every in-flight stream.
    pub fn cancel_all(&self) {
        for (_, turn) in self.in_flight.borrow_mut().drain() {
            turn.handle.abort();
        }
    }

    /// Send one user message to `thread_id` and stream the reply into it.
    pub async fn send(
        &self,
        thread_id: &str,
        input: &str,
        profile: &UserProfile,
        generation: &dyn GenerationPort,
    ) -> Result<TurnOutcome> {
        if input.trim().is_empty() {
            return Err(LensError::Validation("message is empty".to_string()));
        }
        let text = input.to_string();

        let selection = select_model(&text, &self.presets.borrow());
        self.event_bus.emit(ChatEvent::ModelSelected {
            model: selection.model.clone(),
            web_search: selection.uses_web_search(),
        });

        let turn_id = self.turn_counter.get() + 1;
        self.turn_counter.set(turn_id);
        let (handle, registration) = AbortHandle::new_pair();

        // Supersede, replay and register in one borrow so no other turn can
        // interleave between them.
        let tid = thread_id.to_string();
        let user_text = text.clone();
        let in_flight = &self.in_flight;
        let own_handle = handle.clone();
        let (history, reply_index) = self
            .store
            .update(move |s| {
                if s.get(&tid).is_none() {
                    return Err(LensError::NotFound(format!("thread {}", tid)));
                }
                if let Some(stale) = in_flight.borrow_mut().remove(&tid) {
                    log::info!("Turn {} supersedes turn {} on thread {}", turn_id, stale.turn_id, tid);
                    stale.handle.abort();
                    s.discard_placeholder(&tid, stale.reply_index)?;
                }

                // Full replay of everything said so far; no windowing.
                let history = s
                    .get(&tid)
                    .map(|thread| {
                        thread
                            .messages
                            .iter()
                            .map(|m| HistoryTurn {
                                sender: m.sender,
                                text: m.text.clone(),
                            })
                            .collect::<Vec<_>>()
                    })
                    .unwrap_or_default();

                s.rename_from_first_user_message(&tid, &user_text)?;
                s.append(&tid, ChatMessage::user(user_text.as_str()))?;
                let reply_index = s.append(&tid, ChatMessage::ai(""))?;
                in_flight.borrow_mut().insert(
                    tid,
                    InFlightTurn {
                        turn_id,
                        handle: own_handle,
                        reply_index,
                    },
                );
                Ok((history, reply_index))
            })
            .await?;

        self.event_bus.emit(ChatEvent::TurnStart {
            thread_id: thread_id.to_string(),
            turn_id,
        });

        let request = GenerationRequest {
            model: selection.model,
            config: selection.config,
            tools: selection.tools,
            system_instruction: build_system_instruction(profile),
            history,
            message: text,
        };
        log::info!(
            "Turn {}: streaming from {} via {}",
            turn_id,
            request.model,
            generation.backend_name()
        );

        let mut stream = Abortable::new(generation.stream_generate(request), registration);
        let mut buffer = String::new();
        let mut collected: Vec<GroundingSource> = Vec::new();
        let mut failure: Option<String> = None;

        while let Some(event) = stream.next().await {
            match event {
                GenerationEvent::Delta(fragment) => {
                    if fragment.is_empty() {
                        continue;
                    }
                    buffer.push_str(&fragment);
                    self.write_reply(thread_id, reply_index, &buffer).await;
                    self.event_bus.emit(ChatEvent::Delta {
                        thread_id: thread_id.to_string(),
                        text: buffer.clone(),
                    });
                }
                GenerationEvent::Sources(sources) => collected.extend(sources),
                GenerationEvent::Done => break,
                GenerationEvent::Error(message) => {
                    failure = Some(message);
                    break;
                }
            }
        }

        if handle.is_aborted() {
            self.discard_placeholder(thread_id, reply_index).await;
            self.event_bus.emit(ChatEvent::TurnSuperseded {
                thread_id: thread_id.to_string(),
                turn_id,
            });
            return Ok(TurnOutcome::Superseded);
        }
        self.release(thread_id, turn_id);

        if let Some(message) = failure {
            log::error!("Generation error on turn {}: {}", turn_id, message);
            self.write_reply(thread_id, reply_index, APOLOGY_TEXT).await;
            self.event_bus.emit(ChatEvent::TurnFailed {
                thread_id: thread_id.to_string(),
                message: message.clone(),
            });
            return Ok(TurnOutcome::Failed { message });
        }

        let sources = dedupe_sources(collected);
        if !sources.is_empty() {
            let tid = thread_id.to_string();
            let attached = sources.clone();
            if let Err(e) = self
                .store
                .update(move |s| s.set_sources(&tid, reply_index, attached))
                .await
            {
                log::warn!("Could not attach sources: {}", e);
            }
            self.event_bus.emit(ChatEvent::SourcesAttached {
                thread_id: thread_id.to_string(),
                count: sources.len(),
            });
        }

        self.event_bus.emit(ChatEvent::TurnEnd {
            thread_id: thread_id.to_string(),
            turn_id,
        });
        Ok(TurnOutcome::Completed {
            text: buffer,
            sources,
        })
    }

    /// Overwrite the reply placeholder. The thread may have been deleted
    /// mid-stream, in which case the write is dropped.
    async fn write_reply(&self, thread_id: &str, index: usize, text: &str) {
        let tid = thread_id.to_string();
        let text = text.to_string();
        if let Err(e) = self
            .store
            .update(move |s| s.set_message_text(&tid, index, &text))
            .await
        {
            log::warn!("Dropping reply update: {}", e);
        }
    }

    /// Drop an aborted turn's reply if nothing was streamed into it.
    async fn discard_placeholder(&self, thread_id: &str, index: usize) {
        let tid = thread_id.to_string();
        if let Err(e) = self
            .store
            .update(move |s| s.discard_placeholder(&tid, index))
            .await
        {
            log::debug!("Placeholder already gone: {}", e);
        }
    }

    fn release(&self, thread_id: &str, turn_id: u64) {
        let mut in_flight = self.in_flight.borrow_mut();
        if in_flight.get(thread_id).map(|turn| turn.turn_id) == Some(turn_id) {
            in_flight.remove(thread_id);
        }
    }
}

/// One entry per URI, in first-seen order, carrying the last title seen.
/// Sources without a URI are dropped.
pub fn dedupe_sources(sources: Vec<GroundingSource>) -> Vec<GroundingSource> {
    let mut unique: Vec<GroundingSource> = Vec::new();
    for source in sources.into_iter().filter(|s| !s.uri.is_empty()) {
        match unique.iter_mut().find(|existing| existing.uri == source.uri) {
            Some(existing) => *existing = source,
            None => unique.push(source),
        }
    }
    unique
}
