//! Main egui application. Composes all panels and owns the chat services.

use std::cell::RefCell;
use std::rc::Rc;

use egui::{self, CentralPanel, RichText, SidePanel};

use lens_core::event_bus::EventBus;
use lens_core::orchestrator::{ChatOrchestrator, TurnOutcome};
use lens_core::ports::StoragePort;
use lens_core::store::{ConversationStore, DeleteOutcome, SharedStore};
use lens_core::transcript::{render_transcript, transcript_file_name};
use lens_core::voice::{PlaybackController, SpeakOutcome, VoiceCapture};
use lens_platform::audio::{MediaRecorderAdapter, WebAudioOutput};
use lens_platform::download::download_text;
use lens_platform::llm::GeminiClient;
use lens_platform::storage::open_storage;
use lens_types::{
    LensError,
    config::{AppConfig, StorageBackendType, Theme},
    event::ChatEvent,
    profile::UserProfile,
    thread::ThreadSummary,
};
use lens_ui::panels::{chat, onboarding, settings, sidebar};
use lens_ui::state::{Screen, UiState};
use lens_ui::theme;

const CONFIG_STORAGE_KEY: &str = "future_lens:config";

/// Result of the async startup: restored config plus the opened history
struct Boot {
    config: AppConfig,
    store: SharedStore,
}

/// The main application state
pub struct LensApp {
    ui_state: UiState,
    config: AppConfig,
    event_bus: EventBus,
    /// Settings always live in the browser's default backend
    config_storage: Rc<dyn StoragePort>,
    boot: Rc<RefCell<Option<Boot>>>,
    orchestrator: Option<Rc<ChatOrchestrator>>,
    gemini: Rc<GeminiClient>,
    recorder: Rc<MediaRecorderAdapter>,
    output: Rc<WebAudioOutput>,
    player: Rc<PlaybackController>,
    capture: Rc<VoiceCapture>,
    save_feedback: Option<settings::SaveFeedback>,
    /// Backend the history was opened with; changes apply on reload
    opened_backend: StorageBackendType,
    first_frame: bool,
}

impl LensApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let config = AppConfig::default();
        let event_bus = EventBus::new();
        let config_storage = open_storage(StorageBackendType::Auto);

        let player = Rc::new(PlaybackController::new(event_bus.clone()));
        let on_ended: Rc<dyn Fn()> = {
            let player = player.clone();
            let ctx = cc.egui_ctx.clone();
            Rc::new(move || {
                if let Some(key) = player.speaking_key() {
                    player.playback_ended(&key);
                }
                ctx.request_repaint();
            })
        };

        let boot = Rc::new(RefCell::new(None));
        Self::boot(config_storage.clone(), event_bus.clone(), boot.clone(), cc.egui_ctx.clone());

        Self {
            ui_state: UiState::new(),
            gemini: Rc::new(GeminiClient::new(config.llm.clone(), config.models.clone())),
            opened_backend: config.storage.backend,
            config,
            capture: Rc::new(VoiceCapture::new(event_bus.clone())),
            event_bus,
            config_storage,
            boot,
            orchestrator: None,
            recorder: Rc::new(MediaRecorderAdapter::new()),
            output: Rc::new(WebAudioOutput::new(on_ended)),
            player,
            save_feedback: None,
            first_frame: true,
        }
    }

    /// Restore config, then open the chat history on the configured backend.
    fn boot(
        config_storage: Rc<dyn StoragePort>,
        event_bus: EventBus,
        slot: Rc<RefCell<Option<Boot>>>,
        ctx: egui::Context,
    ) {
        wasm_bindgen_futures::spawn_local(async move {
            let config = match config_storage.get(CONFIG_STORAGE_KEY).await {
                Ok(Some(data)) => match serde_json::from_slice::<AppConfig>(&data) {
                    Ok(config) => {
                        log::info!("Config restored from storage");
                        config
                    }
                    Err(e) => {
                        log::warn!("Ignoring unreadable config: {}", e);
                        AppConfig::default()
                    }
                },
                Ok(None) => AppConfig::default(),
                Err(e) => {
                    log::warn!("Could not read config: {}", e);
                    AppConfig::default()
                }
            };

            let storage = open_storage(config.storage.backend);
            let store = match SharedStore::open(storage.clone(), event_bus.clone()).await {
                Ok(store) => store,
                Err(e) => {
                    log::error!("Could not open chat history: {}", e);
                    SharedStore::new(ConversationStore::new(), storage, event_bus)
                }
            };

            *slot.borrow_mut() = Some(Boot { config, store });
            ctx.request_repaint();
        });
    }

    /// Save config to storage (async, fire-and-forget)
    fn save_config(storage: Rc<dyn StoragePort>, config: &AppConfig) -> Result<(), LensError> {
        let json = serde_json::to_vec(config)?;
        wasm_bindgen_futures::spawn_local(async move {
            match storage.set(CONFIG_STORAGE_KEY, &json).await {
                Ok(()) => log::info!("Config saved to storage"),
                Err(e) => log::error!("Failed to save config: {}", e),
            }
        });
        Ok(())
    }

    /// Pick up the boot result once it lands.
    fn poll_boot(&mut self) {
        let Some(boot) = self.boot.borrow_mut().take() else {
            return;
        };
        self.config = boot.config;
        self.opened_backend = self.config.storage.backend;
        self.rebuild_gemini();
        self.orchestrator = Some(Rc::new(ChatOrchestrator::new(
            boot.store,
            self.event_bus.clone(),
            self.config.models.clone(),
        )));
        self.first_frame = true;
    }

    fn rebuild_gemini(&mut self) {
        self.gemini = Rc::new(GeminiClient::new(self.config.llm.clone(), self.config.models.clone()));
        if let Some(orchestrator) = &self.orchestrator {
            orchestrator.set_presets(self.config.models.clone());
        }
    }

    fn store(&self) -> Option<SharedStore> {
        self.orchestrator.as_ref().map(|o| o.store().clone())
    }

    fn user_name(&self) -> String {
        self.ui_state
            .profile
            .as_ref()
            .map(|p| p.name.clone())
            .unwrap_or_default()
    }

    /// Run a store mutation in the background, logging failures.
    fn spawn_update<F>(&self, ctx: &egui::Context, what: &'static str, f: F)
    where
        F: FnOnce(&mut ConversationStore) -> lens_types::Result<()> + 'static,
    {
        let Some(store) = self.store() else {
            return;
        };
        let ctx = ctx.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = store.update(f).await {
                log::warn!("{} failed: {}", what, e);
            }
            ctx.request_repaint();
        });
    }
}

impl eframe::App for LensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_boot();

        if self.first_frame {
            theme::apply_theme(ctx, self.config.theme);
            self.first_frame = false;
        }

        // Drain events from the chat core
        let events = self.event_bus.drain();
        if !events.is_empty() {
            self.ui_state.process_events(events);
            ctx.request_repaint();
        }

        if self.ui_state.busy {
            ctx.request_repaint();
        }

        let palette = theme::palette(self.config.theme);

        if self.orchestrator.is_none() {
            CentralPanel::default().show(ctx, |ui| {
                ui.centered_and_justified(|ui| {
                    ui.label(RichText::new("Opening the lens...").color(theme::TEXT_SECONDARY));
                });
            });
            return;
        }

        match self.ui_state.screen {
            Screen::Login => {
                CentralPanel::default().show(ctx, |ui| {
                    ui.add_space(ui.available_height() * 0.15);
                    onboarding::login_panel(ui, &mut self.ui_state, &palette);
                });
            }
            Screen::Profile => {
                let mut accepted = false;
                CentralPanel::default().show(ctx, |ui| {
                    ui.add_space(24.0);
                    accepted = onboarding::profile_panel(ui, &mut self.ui_state, &palette);
                });
                if accepted {
                    self.enter_chat(ctx);
                }
            }
            Screen::Chat => self.chat_screen(ctx, &palette),
        }

        if let Some(thread_id) = sidebar::delete_confirm_dialog(ctx, &mut self.ui_state) {
            self.delete_thread(thread_id, ctx);
        }
        sidebar::about_dialog(ctx, &mut self.ui_state, &palette);
        sidebar::alert_dialog(ctx, &mut self.ui_state);
    }
}

impl LensApp {
    fn chat_screen(&mut self, ctx: &egui::Context, palette: &theme::Palette) {
        let Some(store) = self.store() else {
            return;
        };
        let Some(profile) = self.ui_state.profile.clone() else {
            self.ui_state.screen = Screen::Login;
            return;
        };

        // ── Sidebar ──────────────────────────────────────────
        let (summaries, active_id): (Vec<ThreadSummary>, Option<String>) = store.read(|s| {
            (
                s.search(&self.ui_state.search_term)
                    .into_iter()
                    .map(|t| t.summary())
                    .collect(),
                s.active_id().map(String::from),
            )
        });
        let mut sidebar_action = None;
        SidePanel::left("sidebar")
            .min_width(230.0)
            .max_width(300.0)
            .show(ctx, |ui| {
                sidebar_action = sidebar::sidebar_panel(
                    ui,
                    &mut self.ui_state,
                    &profile,
                    &summaries,
                    active_id.as_deref(),
                    self.config.theme,
                    palette,
                );
            });
        if let Some(action) = sidebar_action {
            self.handle_sidebar(action, ctx);
        }

        // ── Settings side panel ──────────────────────────────
        if self.ui_state.show_settings {
            let mut action = settings::SettingsAction::None;
            SidePanel::right("settings_panel")
                .min_width(280.0)
                .max_width(350.0)
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        action = settings::settings_panel(
                            ui,
                            &mut self.config,
                            palette,
                            self.save_feedback.as_ref(),
                        );
                    });
                });
            self.handle_settings(action);
        }

        // ── Chat ─────────────────────────────────────────────
        let thread = store.read(|s| s.active().cloned());
        let mut chat_action = None;
        CentralPanel::default().show(ctx, |ui| {
            chat_action = chat::chat_panel(
                ui,
                &mut self.ui_state,
                thread.as_ref(),
                palette,
                chrono::Utc::now(),
            );
        });
        if let (Some(action), Some(thread)) = (chat_action, thread) {
            self.handle_chat(action, thread.id, profile, ctx);
        }
    }

    /// Profile accepted: make sure there is a thread to talk in.
    fn enter_chat(&self, ctx: &egui::Context) {
        let Some(store) = self.store() else {
            return;
        };
        let name = self.user_name();
        let ctx = ctx.clone();
        wasm_bindgen_futures::spawn_local(async move {
            match store.ensure_active(&name).await {
                Ok(id) => log::info!("Chat opened on thread {}", id),
                Err(e) => log::error!("Could not open a thread: {}", e),
            }
            ctx.request_repaint();
        });
    }

    fn handle_sidebar(&mut self, action: sidebar::SidebarAction, ctx: &egui::Context) {
        match action {
            sidebar::SidebarAction::NewChat => {
                let name = self.user_name();
                self.spawn_update(ctx, "New chat", move |s| {
                    s.create_thread(&name);
                    Ok(())
                });
            }
            sidebar::SidebarAction::Select(id) => {
                self.spawn_update(ctx, "Select thread", move |s| s.select(&id));
            }
            sidebar::SidebarAction::SaveTranscript => {
                let Some(thread) = self.store().and_then(|s| s.read(|s| s.active().cloned())) else {
                    return;
                };
                if let Err(e) = download_text(&transcript_file_name(&thread), &render_transcript(&thread)) {
                    log::error!("Transcript download failed: {}", e);
                    self.event_bus.emit(ChatEvent::Alert {
                        message: format!("Could not save the transcript: {}", e),
                    });
                }
            }
            sidebar::SidebarAction::StartOver => {
                if let Some(orchestrator) = &self.orchestrator {
                    orchestrator.cancel_all();
                }
                let capture = self.capture.clone();
                let recorder = self.recorder.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    capture.cancel(recorder.as_ref()).await;
                });
                self.player.stop(self.output.as_ref());
                self.ui_state.start_over();
                log::info!("Started over");
            }
            sidebar::SidebarAction::SetTheme(theme) => {
                self.apply_theme(theme, ctx);
            }
            sidebar::SidebarAction::ToggleSettings => {
                self.ui_state.show_settings = !self.ui_state.show_settings;
                self.save_feedback = None;
            }
        }
    }

    fn apply_theme(&mut self, theme: Theme, ctx: &egui::Context) {
        self.config.theme = theme;
        theme::apply_theme(ctx, theme);
        if let Err(e) = Self::save_config(self.config_storage.clone(), &self.config) {
            log::error!("Failed to save theme: {}", e);
        }
    }

    fn handle_settings(&mut self, action: settings::SettingsAction) {
        match action {
            settings::SettingsAction::None => {}
            settings::SettingsAction::Changed => {
                self.rebuild_gemini();
                if let Err(e) = Self::save_config(self.config_storage.clone(), &self.config) {
                    log::error!("Failed to save settings: {}", e);
                }
                self.save_feedback = None;
            }
            settings::SettingsAction::SaveClicked => {
                self.rebuild_gemini();
                let feedback = match Self::save_config(self.config_storage.clone(), &self.config) {
                    Ok(()) if self.config.storage.backend != self.opened_backend => settings::SaveFeedback {
                        message: "Saved. Storage change applies after reload.".to_string(),
                        success: true,
                    },
                    Ok(()) => settings::SaveFeedback {
                        message: "Saved".to_string(),
                        success: true,
                    },
                    Err(e) => settings::SaveFeedback {
                        message: format!("Save failed: {}", e),
                        success: false,
                    },
                };
                self.save_feedback = Some(feedback);
            }
        }
    }

    fn handle_chat(&mut self, action: chat::ChatAction, thread_id: String, profile: UserProfile, ctx: &egui::Context) {
        match action {
            chat::ChatAction::Send(text) => self.dispatch_message(thread_id, text, profile, ctx),
            chat::ChatAction::ToggleMic => self.toggle_mic(ctx),
            chat::ChatAction::Speak { key, text } => {
                let player = self.player.clone();
                let gemini = self.gemini.clone();
                let output = self.output.clone();
                let ctx = ctx.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    let outcome = player.speak(&key, &text, gemini.as_ref(), output.as_ref()).await;
                    if outcome == SpeakOutcome::Aborted {
                        log::warn!("Speech for {} was aborted", key);
                    }
                    ctx.request_repaint();
                });
            }
            chat::ChatAction::Feedback { index, feedback } => {
                self.spawn_update(ctx, "Feedback", move |s| {
                    s.set_feedback(&thread_id, index, feedback)
                });
            }
        }
    }

    /// Dispatch a user message to the orchestrator (async)
    fn dispatch_message(&self, thread_id: String, text: String, profile: UserProfile, ctx: &egui::Context) {
        let Some(orchestrator) = self.orchestrator.clone() else {
            return;
        };
        let gemini = self.gemini.clone();
        let ctx = ctx.clone();

        wasm_bindgen_futures::spawn_local(async move {
            match orchestrator.send(&thread_id, &text, &profile, gemini.as_ref()).await {
                Ok(TurnOutcome::Completed { sources, .. }) => {
                    log::debug!("Turn completed with {} sources", sources.len());
                }
                Ok(TurnOutcome::Failed { message }) => log::warn!("Turn failed: {}", message),
                Ok(TurnOutcome::Superseded) => log::debug!("Turn superseded"),
                Err(e) => log::error!("Send error: {}", e),
            }
            ctx.request_repaint();
        });
    }

    /// Start recording, or stop and transcribe into the input field.
    /// Clicks are ignored while the microphone prompt is still open.
    fn toggle_mic(&mut self, ctx: &egui::Context) {
        if self.capture.is_starting() {
            log::debug!("Ignoring mic toggle while recording starts");
            return;
        }
        let capture = self.capture.clone();
        let recorder = self.recorder.clone();
        let ctx = ctx.clone();

        if self.ui_state.recording {
            self.ui_state.recording = false;
            let gemini = self.gemini.clone();
            wasm_bindgen_futures::spawn_local(async move {
                capture.finish(recorder.as_ref(), gemini.as_ref()).await;
                ctx.request_repaint();
            });
            return;
        }

        self.ui_state.recording = true;
        let event_bus = self.event_bus.clone();
        wasm_bindgen_futures::spawn_local(async move {
            match capture.start(recorder.as_ref()).await {
                Ok(()) => log::info!("Recording started"),
                // Permission denials already raised an alert
                Err(LensError::Permission(_)) => {}
                Err(LensError::Cancelled) => log::info!("Recording start cancelled"),
                Err(e) => event_bus.emit(ChatEvent::Alert {
                    message: format!("Could not start recording: {}", e),
                }),
            }
            ctx.request_repaint();
        });
    }

    fn delete_thread(&mut self, thread_id: String, ctx: &egui::Context) {
        let Some(store) = self.store() else {
            return;
        };
        let cancelled = self
            .orchestrator
            .as_ref()
            .is_some_and(|o| o.cancel(&thread_id));
        if cancelled {
            self.ui_state.busy = false;
            self.ui_state.status_text = "Ready".to_string();
        }
        let name = self.user_name();
        let ctx = ctx.clone();
        wasm_bindgen_futures::spawn_local(async move {
            match store.update(move |s| s.delete(&thread_id, true, &name)).await {
                Ok(DeleteOutcome::Recreated { new_id }) => log::info!("Last thread deleted, started {}", new_id),
                Ok(outcome) => log::info!("Delete: {:?}", outcome),
                Err(e) => log::error!("Delete failed: {}", e),
            }
            ctx.request_repaint();
        });
    }
}
