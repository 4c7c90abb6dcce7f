//! Settings panel: Gemini API key, model presets, storage mode.

use egui::{self, RichText, Vec2};
use lens_types::config::{AppConfig, DEFAULT_API_BASE, ModelPresets, StorageBackendType};
use crate::theme::*;

/// What the caller should do after rendering the settings panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsAction {
    /// Nothing changed
    None,
    /// A field was changed (auto-save)
    Changed,
    /// The user clicked the explicit Save button
    SaveClicked,
}

/// Save feedback passed in from the app layer
#[derive(Debug, Clone)]
pub struct SaveFeedback {
    pub message: String,
    pub success: bool,
}

/// Render the settings panel. Returns an action for the caller to handle.
pub fn settings_panel(
    ui: &mut egui::Ui,
    config: &mut AppConfig,
    palette: &Palette,
    save_feedback: Option<&SaveFeedback>,
) -> SettingsAction {
    let mut changed = false;
    let mut save_clicked = false;

    egui::Frame::default()
        .fill(BG_SECONDARY)
        .inner_margin(PANEL_PADDING)
        .corner_radius(PANEL_ROUNDING)
        .show(ui, |ui| {
            ui.heading(RichText::new("Settings").color(TEXT_PRIMARY));
            ui.separator();

            // ── Gemini Section ───────────────────────────────
            ui.label(RichText::new("Gemini").color(palette.accent).strong());
            ui.add_space(2.0);

            ui.label(RichText::new("API Key").color(TEXT_SECONDARY).small());
            let api_key_edit = egui::TextEdit::singleline(&mut config.llm.api_key)
                .password(true)
                .hint_text("AIza...");
            if ui.add(api_key_edit).changed() {
                changed = true;
            }

            ui.add_space(4.0);

            ui.label(RichText::new("API Base URL (optional)").color(TEXT_SECONDARY).small());
            let mut base_url = config.llm.api_base.clone().unwrap_or_default();
            if ui
                .add(egui::TextEdit::singleline(&mut base_url).hint_text(DEFAULT_API_BASE))
                .changed()
            {
                config.llm.api_base = if base_url.trim().is_empty() {
                    None
                } else {
                    Some(base_url)
                };
                changed = true;
            }

            ui.add_space(8.0);

            // ── Models Section ───────────────────────────────
            ui.collapsing(RichText::new("Models").color(palette.accent).strong(), |ui| {
                if model_fields(ui, &mut config.models) {
                    changed = true;
                }
                if ui.small_button("Reset to defaults").clicked() {
                    config.models = ModelPresets::default();
                    changed = true;
                }
            });

            ui.add_space(8.0);
            ui.separator();
            ui.add_space(4.0);

            // ── Storage Section ──────────────────────────────
            ui.label(RichText::new("Storage").color(palette.accent).strong());
            ui.add_space(2.0);

            ui.label(RichText::new("Backend").color(TEXT_SECONDARY).small());
            egui::ComboBox::from_id_salt("storage_backend")
                .selected_text(storage_label(config.storage.backend))
                .show_ui(ui, |ui| {
                    for backend in STORAGE_OPTIONS {
                        if ui
                            .selectable_value(&mut config.storage.backend, *backend, storage_label(*backend))
                            .changed()
                        {
                            changed = true;
                        }
                    }
                });

            ui.add_space(4.0);
            ui.label(
                RichText::new(storage_description(config.storage.backend))
                    .color(TEXT_SECONDARY)
                    .small()
                    .italics(),
            );

            // ── Save Button ──────────────────────────────────
            ui.add_space(16.0);
            ui.separator();
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                let btn = ui.add(
                    egui::Button::new(RichText::new("Save Settings").color(TEXT_PRIMARY).strong())
                        .fill(palette.accent.linear_multiply(0.6))
                        .corner_radius(PANEL_ROUNDING)
                        .min_size(Vec2::new(120.0, 28.0)),
                );
                if btn.clicked() {
                    save_clicked = true;
                }

                if let Some(fb) = save_feedback {
                    let color = if fb.success { SUCCESS } else { ERROR };
                    ui.label(RichText::new(&fb.message).color(color).small());
                }
            });
        });

    if save_clicked {
        SettingsAction::SaveClicked
    } else if changed {
        SettingsAction::Changed
    } else {
        SettingsAction::None
    }
}

fn model_fields(ui: &mut egui::Ui, models: &mut ModelPresets) -> bool {
    let mut changed = false;
    let fields: [(&str, &mut String); 6] = [
        ("Reasoning", &mut models.reasoning),
        ("Search", &mut models.search),
        ("Fast", &mut models.fast),
        ("Balanced", &mut models.balanced),
        ("Transcription", &mut models.transcription),
        ("Speech", &mut models.speech),
    ];
    for (label, value) in fields {
        ui.label(RichText::new(label).color(TEXT_SECONDARY).small());
        if ui.text_edit_singleline(value).changed() {
            changed = true;
        }
    }
    ui.label(RichText::new("Reasoning budget (tokens)").color(TEXT_SECONDARY).small());
    if ui
        .add(egui::Slider::new(&mut models.reasoning_budget, 0..=32768))
        .changed()
    {
        changed = true;
    }
    changed
}

const STORAGE_OPTIONS: &[StorageBackendType] = &[
    StorageBackendType::Auto,
    StorageBackendType::Memory,
    StorageBackendType::LocalStorage,
];

pub fn storage_label(backend: StorageBackendType) -> &'static str {
    match backend {
        StorageBackendType::Auto => "Auto-detect",
        StorageBackendType::Memory => "Memory",
        StorageBackendType::LocalStorage => "Local Storage",
    }
}

fn storage_description(backend: StorageBackendType) -> &'static str {
    match backend {
        StorageBackendType::Auto => "Uses browser local storage when available, falls back to Memory.",
        StorageBackendType::Memory => "Fast but volatile. All conversations are lost on page reload.",
        StorageBackendType::LocalStorage => "Persistent browser storage. Conversations survive page reloads.",
    }
}
