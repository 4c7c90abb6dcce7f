//! Sidebar: user card, new chat, searchable thread list, actions, theme.

use egui::{self, RichText, ScrollArea};
use lens_types::{config::Theme, profile::UserProfile, thread::ThreadSummary};
use crate::state::UiState;
use crate::theme::*;

pub const DELETE_CONFIRM_TEXT: &str =
    "Are you sure you want to permanently delete this conversation?";

pub const ABOUT_TITLE: &str = "About Future Lens AI";
pub const ABOUT_PARAGRAPHS: [&str; 3] = [
    "Welcome to a unique journey of self-reflection. Future Lens AI is not a fortune teller; \
     it's a sophisticated conversational partner designed to act as your future, wiser self.",
    "By understanding the goals, fears, and experiences you share, the AI constructs a persona \
     to guide you. It offers motivation, wisdom, and a fresh perspective on the challenges and \
     opportunities you face today.",
    "Think of it as a mirror, reflecting the strength and potential you already possess, viewed \
     through the clarifying lens of time. Your future is not written, but the wisdom to shape it \
     is already within you.",
];

/// What the caller should do after rendering the sidebar
#[derive(Debug, Clone, PartialEq)]
pub enum SidebarAction {
    NewChat,
    Select(String),
    SaveTranscript,
    StartOver,
    SetTheme(Theme),
    ToggleSettings,
}

/// Render the sidebar. `threads` is already filtered by the search term.
pub fn sidebar_panel(
    ui: &mut egui::Ui,
    state: &mut UiState,
    profile: &UserProfile,
    threads: &[ThreadSummary],
    active_id: Option<&str>,
    theme: Theme,
    palette: &Palette,
) -> Option<SidebarAction> {
    let mut action = None;

    ui.vertical_centered(|ui| {
        ui.label(RichText::new("🌌 Future Lens AI").color(palette.accent).strong().size(18.0));
    });
    ui.add_space(6.0);
    ui.label(RichText::new(&profile.name).color(TEXT_PRIMARY).strong());
    ui.label(RichText::new(&profile.email).color(TEXT_SECONDARY).small());
    ui.separator();

    if ui.button("+ New Chat").clicked() {
        action = Some(SidebarAction::NewChat);
    }
    ui.add(
        egui::TextEdit::singleline(&mut state.search_term)
            .hint_text("🔍 Search conversations...")
            .desired_width(f32::INFINITY),
    );

    ui.add_space(4.0);
    ui.label(RichText::new("PAST CONVERSATIONS").color(TEXT_SECONDARY).small().strong());

    let list_height = (ui.available_height() - 170.0).max(80.0);
    ScrollArea::vertical()
        .max_height(list_height)
        .auto_shrink([false, true])
        .show(ui, |ui| {
            if threads.is_empty() {
                ui.label(RichText::new("No matching conversations").color(TEXT_SECONDARY).italics());
            }
            for thread in threads {
                let is_active = active_id == Some(thread.id.as_str());
                ui.horizontal(|ui| {
                    let title = RichText::new(&thread.title).color(if is_active {
                        palette.accent
                    } else {
                        TEXT_PRIMARY
                    });
                    if ui
                        .selectable_label(is_active, title)
                        .on_hover_text(format!("{} messages", thread.message_count))
                        .clicked()
                    {
                        action = Some(SidebarAction::Select(thread.id.clone()));
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui
                            .small_button(RichText::new("🗑").color(TEXT_SECONDARY))
                            .on_hover_text(format!("Delete conversation titled: {}", thread.title))
                            .clicked()
                        {
                            state.request_delete(&thread.id);
                        }
                    });
                });
            }
        });

    ui.separator();
    if ui.button("💾 Save Transcript").clicked() {
        action = Some(SidebarAction::SaveTranscript);
    }

    ui.label(RichText::new("THEME").color(TEXT_SECONDARY).small().strong());
    ui.horizontal(|ui| {
        for t in Theme::all() {
            if ui.selectable_label(*t == theme, t.label()).clicked() && *t != theme {
                action = Some(SidebarAction::SetTheme(*t));
            }
        }
    });

    ui.separator();
    ui.horizontal(|ui| {
        if ui.button("🔁 Start Over").clicked() {
            action = Some(SidebarAction::StartOver);
        }
        if ui.selectable_label(state.show_settings, "⚙ Settings").clicked() {
            action = Some(SidebarAction::ToggleSettings);
        }
    });

    ui.vertical_centered(|ui| {
        if ui
            .small_button(RichText::new("About Future Lens").color(TEXT_SECONDARY))
            .clicked()
        {
            state.open_about();
        }
    });

    action
}

/// Modal asking to confirm a pending delete.
/// Returns the thread id once the user confirms.
pub fn delete_confirm_dialog(ctx: &egui::Context, state: &mut UiState) -> Option<String> {
    state.pending_delete.as_ref()?;
    let mut confirmed = false;
    let mut cancelled = false;

    egui::Window::new("Delete conversation")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            ui.label(RichText::new(DELETE_CONFIRM_TEXT).color(TEXT_PRIMARY));
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button(RichText::new("Delete").color(ERROR)).clicked() {
                    confirmed = true;
                }
                if ui.button("Cancel").clicked() {
                    cancelled = true;
                }
            });
        });

    if cancelled {
        state.cancel_delete();
    }
    if confirmed {
        return state.confirm_delete();
    }
    None
}

/// What Future Lens is. Closed by its close button or the button below.
pub fn about_dialog(ctx: &egui::Context, state: &mut UiState, palette: &Palette) {
    if !state.show_about {
        return;
    }
    let mut open = true;
    let mut closed = false;
    egui::Window::new(RichText::new(ABOUT_TITLE).color(palette.accent).strong())
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .max_width(520.0)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            for paragraph in ABOUT_PARAGRAPHS {
                ui.label(RichText::new(paragraph).color(TEXT_PRIMARY));
                ui.add_space(6.0);
            }
            if ui.button("Close").clicked() {
                closed = true;
            }
        });
    if !open || closed {
        state.close_about();
    }
}

/// Blocking alert (e.g. microphone denied) until dismissed.
pub fn alert_dialog(ctx: &egui::Context, state: &mut UiState) {
    let Some(message) = state.alert.clone() else {
        return;
    };
    let mut dismissed = false;
    egui::Window::new("Notice")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            ui.label(RichText::new(message).color(TEXT_PRIMARY));
            ui.add_space(8.0);
            if ui.button("OK").clicked() {
                dismissed = true;
            }
        });
    if dismissed {
        state.dismiss_alert();
    }
}
