//! Chat panel: displays the active thread and the input row.

use chrono::{DateTime, Utc};
use egui::{self, Align, Layout, RichText, ScrollArea, Vec2};
use lens_core::transcript::format_time_ago;
use lens_types::{
    message::{ChatMessage, Feedback, GroundingSource, Sender},
    thread::ConversationThread,
};
use crate::state::{UiState, message_key};
use crate::theme::*;

/// What the caller should do after rendering the chat panel
#[derive(Debug, Clone, PartialEq)]
pub enum ChatAction {
    Send(String),
    ToggleMic,
    Speak { key: String, text: String },
    Feedback { index: usize, feedback: Option<Feedback> },
}

/// Render the chat panel. Returns an action for the caller to handle.
pub fn chat_panel(
    ui: &mut egui::Ui,
    state: &mut UiState,
    thread: Option<&ConversationThread>,
    palette: &Palette,
    now: DateTime<Utc>,
) -> Option<ChatAction> {
    let mut action = None;

    egui::Frame::default()
        .fill(BG_PRIMARY)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            ui.vertical(|ui| {
                // Header
                ui.horizontal(|ui| {
                    let title = thread.map(|t| t.title.as_str()).unwrap_or("Conversation");
                    ui.heading(RichText::new(title).color(TEXT_PRIMARY).strong());
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        let status_color = if state.busy { WARNING } else { SUCCESS };
                        ui.label(RichText::new(&state.status_text).color(status_color).small());
                        if let Some((model, web_search)) = &state.model_badge {
                            let badge = if *web_search {
                                format!("{} · web", model)
                            } else {
                                model.clone()
                            };
                            ui.label(RichText::new(badge).color(TEXT_SECONDARY).small());
                        }
                    });
                });

                ui.separator();

                // Messages area
                let available_height = ui.available_height() - 60.0;
                ScrollArea::vertical()
                    .max_height(available_height)
                    .auto_shrink([false, false])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        let Some(thread) = thread else {
                            return;
                        };
                        let last = thread.messages.len().saturating_sub(1);
                        for (index, msg) in thread.messages.iter().enumerate() {
                            let pending = state.busy && index == last && msg.is_ai() && msg.text.is_empty();
                            if let Some(a) = render_message(ui, state, thread, index, msg, pending, palette, now) {
                                action = Some(a);
                            }
                            ui.add_space(6.0);
                        }
                    });

                ui.add_space(8.0);

                // Input area
                ui.horizontal(|ui| {
                    let input = egui::TextEdit::singleline(&mut state.input_text)
                        .hint_text("Type your message or use the mic...")
                        .desired_width(ui.available_width() - 110.0)
                        .font(egui::FontId::proportional(14.0))
                        .interactive(!state.transcribing);
                    let response = ui.add(input);

                    let mic_label = if state.recording { "⏹" } else { "🎤" };
                    let mic = ui
                        .add_enabled(
                            !state.busy || state.recording,
                            egui::Button::new(RichText::new(mic_label).color(if state.recording {
                                ERROR
                            } else {
                                TEXT_PRIMARY
                            }))
                            .corner_radius(PANEL_ROUNDING),
                        )
                        .on_hover_text(if state.recording { "Stop recording" } else { "Record voice" });
                    if mic.clicked() {
                        action = Some(ChatAction::ToggleMic);
                    }

                    let send_enabled = state.can_send();
                    let send_btn = ui.add_enabled(
                        send_enabled,
                        egui::Button::new(RichText::new("Send").color(TEXT_PRIMARY))
                            .fill(if send_enabled { palette.accent.linear_multiply(0.6) } else { BG_SURFACE })
                            .corner_radius(PANEL_ROUNDING)
                            .min_size(Vec2::new(60.0, 0.0)),
                    );

                    // Submit on Enter or button click
                    let enter = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if enter || send_btn.clicked() {
                        if let Some(text) = state.take_input() {
                            action = Some(ChatAction::Send(text));
                            response.request_focus();
                        }
                    }
                });
            });
        });

    action
}

#[allow(clippy::too_many_arguments)]
fn render_message(
    ui: &mut egui::Ui,
    state: &UiState,
    thread: &ConversationThread,
    index: usize,
    msg: &ChatMessage,
    pending: bool,
    palette: &Palette,
    now: DateTime<Utc>,
) -> Option<ChatAction> {
    let mut action = None;
    let (layout, bg) = match msg.sender {
        Sender::User => (Layout::right_to_left(Align::Min), palette.user_bubble),
        Sender::Ai => (Layout::left_to_right(Align::Min), palette.ai_bubble),
    };

    ui.with_layout(layout, |ui| {
        egui::Frame::default()
            .fill(bg)
            .corner_radius(PANEL_ROUNDING)
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.set_max_width(520.0);
                ui.vertical(|ui| {
                    if pending {
                        ui.label(RichText::new("● ● ●").color(palette.accent));
                    } else {
                        ui.label(RichText::new(&msg.text).color(TEXT_PRIMARY));
                    }

                    if !msg.sources.is_empty() {
                        ui.separator();
                        ui.label(RichText::new("Sources:").color(TEXT_SECONDARY).small().strong());
                        for source in &msg.sources {
                            ui.hyperlink_to(RichText::new(format!("🌐 {}", source_label(source))).small(), &source.uri)
                                .on_hover_text(&source.title);
                        }
                    }

                    ui.horizontal(|ui| {
                        ui.label(RichText::new(format_time_ago(&msg.timestamp, now)).color(TEXT_SECONDARY).small());
                        if msg.is_ai() && !msg.text.is_empty() {
                            let key = message_key(&thread.id, index);
                            let speaking = state.is_speaking(&key);
                            let icon = if speaking { "⏹" } else { "🔊" };
                            if ui
                                .small_button(icon)
                                .on_hover_text(if speaking { "Stop" } else { "Listen" })
                                .clicked()
                            {
                                action = Some(ChatAction::Speak {
                                    key,
                                    text: msg.text.clone(),
                                });
                            }
                            if index > 0 {
                                if let Some(feedback) = feedback_buttons(ui, msg.feedback, palette) {
                                    action = Some(ChatAction::Feedback { index, feedback });
                                }
                            }
                        }
                    });
                });
            });
    });

    action
}

/// Thumbs up/down; clicking the current choice clears it.
fn feedback_buttons(ui: &mut egui::Ui, current: Option<Feedback>, palette: &Palette) -> Option<Option<Feedback>> {
    let mut changed = None;
    for (choice, icon) in [(Feedback::Up, "👍"), (Feedback::Down, "👎")] {
        let selected = current == Some(choice);
        let color = if selected { palette.accent } else { TEXT_SECONDARY };
        if ui.small_button(RichText::new(icon).color(color)).clicked() {
            changed = Some(if selected { None } else { Some(choice) });
        }
    }
    changed
}

/// Title when present, otherwise the URI's host.
pub fn source_label(source: &GroundingSource) -> String {
    if !source.title.trim().is_empty() {
        return source.title.clone();
    }
    let without_scheme = source
        .uri
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(&source.uri);
    without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or(without_scheme)
        .to_string()
}
