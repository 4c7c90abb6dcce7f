//! UI-level state that drives rendering.
//! Conversation content is read from the store each frame; this struct only
//! holds what the store does not: screen flow, form drafts, transient
//! status, updated by draining the EventBus.

use lens_core::voice::TRANSCRIBING_PLACEHOLDER;
use lens_types::{
    Result,
    event::ChatEvent,
    profile::UserProfile,
};

/// Which page is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Profile,
    Chat,
}

/// State visible to UI panels
pub struct UiState {
    pub screen: Screen,
    pub login_name: String,
    pub login_email: String,
    /// Profile being filled in on the onboarding form
    pub profile_draft: UserProfile,
    /// Set once onboarding completes; immutable afterwards
    pub profile: Option<UserProfile>,
    /// Validation message shown under the onboarding forms
    pub form_error: Option<String>,
    /// Input field content
    pub input_text: String,
    pub search_term: String,
    /// A reply is streaming into the active thread
    pub busy: bool,
    pub recording: bool,
    pub transcribing: bool,
    /// Key of the message currently being spoken
    pub speaking_key: Option<String>,
    /// Model chosen for the latest turn, and whether it searches the web
    pub model_badge: Option<(String, bool)>,
    /// Thread waiting on delete confirmation
    pub pending_delete: Option<String>,
    /// Blocking alert text
    pub alert: Option<String>,
    pub show_settings: bool,
    pub show_about: bool,
    pub sidebar_open: bool,
    /// Status line text
    pub status_text: String,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            screen: Screen::Login,
            login_name: String::new(),
            login_email: String::new(),
            profile_draft: UserProfile::default(),
            profile: None,
            form_error: None,
            input_text: String::new(),
            search_term: String::new(),
            busy: false,
            recording: false,
            transcribing: false,
            speaking_key: None,
            model_badge: None,
            pending_delete: None,
            alert: None,
            show_settings: false,
            show_about: false,
            sidebar_open: true,
            status_text: "Ready".to_string(),
        }
    }

    /// Process events from the EventBus and update UI state
    pub fn process_events(&mut self, events: Vec<ChatEvent>) {
        for event in events {
            match event {
                ChatEvent::TurnStart { .. } => {
                    self.busy = true;
                    self.status_text = "Consulting your future self...".to_string();
                }
                ChatEvent::ModelSelected { model, web_search } => {
                    self.model_badge = Some((model, web_search));
                }
                ChatEvent::Delta { .. } | ChatEvent::HistoryChanged => {}
                ChatEvent::SourcesAttached { count, .. } => {
                    self.status_text = format!("{} sources attached", count);
                }
                ChatEvent::TurnEnd { .. } => {
                    self.busy = false;
                    self.status_text = "Ready".to_string();
                }
                ChatEvent::TurnFailed { message, .. } => {
                    self.busy = false;
                    self.status_text = format!("Error: {}", message);
                }
                // A newer turn owns the thread and will end it
                ChatEvent::TurnSuperseded { .. } => {}
                ChatEvent::TranscriptionStart => {
                    self.transcribing = true;
                    self.busy = true;
                    self.input_text = TRANSCRIBING_PLACEHOLDER.to_string();
                }
                ChatEvent::TranscriptionDone { text } => {
                    self.transcribing = false;
                    self.busy = false;
                    self.input_text = text;
                }
                ChatEvent::SpeakingStarted { key } => {
                    self.speaking_key = Some(key);
                }
                ChatEvent::SpeakingStopped => {
                    self.speaking_key = None;
                }
                ChatEvent::Alert { message } => {
                    self.recording = false;
                    self.alert = Some(message);
                }
            }
        }
    }

    /// Validate the login form and move on to the profile form.
    pub fn submit_login(&mut self) -> Result<()> {
        let draft = UserProfile::from_login(&self.login_name, &self.login_email);
        if let Err(e) = draft.validate_login() {
            self.form_error = Some(e.to_string());
            return Err(e);
        }
        self.profile_draft = draft;
        self.form_error = None;
        self.screen = Screen::Profile;
        Ok(())
    }

    /// Validate the profile form and open the chat.
    pub fn submit_profile(&mut self) -> Result<UserProfile> {
        if let Err(e) = self.profile_draft.validate() {
            self.form_error = Some(e.to_string());
            return Err(e);
        }
        let profile = self.profile_draft.clone();
        log::info!("Profile accepted for {}", profile.name);
        self.profile = Some(profile.clone());
        self.form_error = None;
        self.screen = Screen::Chat;
        Ok(profile)
    }

    /// Forget the profile and return to login. Stored threads are kept.
    pub fn start_over(&mut self) {
        *self = Self {
            sidebar_open: self.sidebar_open,
            ..Self::new()
        };
    }

    pub fn can_send(&self) -> bool {
        !self.busy && !self.recording && !self.input_text.trim().is_empty()
    }

    /// Take the input exactly as typed, leaving the field empty.
    pub fn take_input(&mut self) -> Option<String> {
        if !self.can_send() {
            return None;
        }
        Some(std::mem::take(&mut self.input_text))
    }

    pub fn request_delete(&mut self, thread_id: &str) {
        log::debug!("Delete requested for thread {}", thread_id);
        self.pending_delete = Some(thread_id.to_string());
    }

    /// The thread the user just confirmed for deletion
    pub fn confirm_delete(&mut self) -> Option<String> {
        self.pending_delete.take()
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    pub fn open_about(&mut self) {
        self.show_about = true;
    }

    pub fn close_about(&mut self) {
        self.show_about = false;
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn is_speaking(&self, key: &str) -> bool {
        self.speaking_key.as_deref() == Some(key)
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

/// Identity of a message for the speak toggle
pub fn message_key(thread_id: &str, index: usize) -> String {
    format!("{}:{}", thread_id, index)
}
