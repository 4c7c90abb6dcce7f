//! Onboarding: login card, then the "about you" profile form.

use egui::{self, RichText, Vec2};
use lens_types::profile::{Personality, accept_age_input, step_age};
use crate::state::UiState;
use crate::theme::*;

const GENDERS: &[&str] = &["Male", "Female", "Non-binary", "Other", "Prefer not to say"];

/// Multiline profile fields with their hints
const STORY_FIELDS: &[(&str, &str)] = &[
    ("goals", "Goals and Ambitions"),
    ("fears", "Fears or Challenges"),
    ("philosophy", "Beliefs or Philosophy"),
    ("hobbies", "Hobbies or Interests"),
    ("role_models", "Role Models"),
    ("past_experiences", "Significant Past Experiences"),
    ("upcoming_events", "Upcoming Events or Plans"),
];

/// Render the login card. Returns true when the form was accepted.
pub fn login_panel(ui: &mut egui::Ui, state: &mut UiState, palette: &Palette) -> bool {
    let mut accepted = false;

    card(ui, |ui| {
        ui.heading(RichText::new("Future Lens AI").color(palette.accent).strong());
        ui.label(RichText::new("Meet the person you are becoming.").color(TEXT_SECONDARY));
        ui.add_space(12.0);

        ui.add(
            egui::TextEdit::singleline(&mut state.login_name)
                .hint_text("Your Name")
                .desired_width(f32::INFINITY),
        );
        let email = ui.add(
            egui::TextEdit::singleline(&mut state.login_email)
                .hint_text("Email Address")
                .desired_width(f32::INFINITY),
        );

        form_error(ui, state);
        ui.add_space(8.0);

        let enter = email.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if primary_button(ui, "Enter", palette).clicked() || enter {
            accepted = state.submit_login().is_ok();
        }
    });

    accepted
}

/// Render the profile form. Returns true when the profile was accepted.
pub fn profile_panel(ui: &mut egui::Ui, state: &mut UiState, palette: &Palette) -> bool {
    let mut accepted = false;

    card(ui, |ui| {
        ui.heading(
            RichText::new(format!("Tell me about yourself, {}", state.profile_draft.name))
                .color(palette.accent)
                .strong(),
        );
        ui.add_space(8.0);

        egui::ScrollArea::vertical()
            .max_height(ui.available_height() - 80.0)
            .show(ui, |ui| {
                let profile = &mut state.profile_draft;

                // Age: digits only, 1..=150, with step buttons
                ui.horizontal(|ui| {
                    let mut age = profile.age.clone();
                    let edit = ui.add(
                        egui::TextEdit::singleline(&mut age)
                            .hint_text("Age")
                            .desired_width(80.0),
                    );
                    if edit.changed() && accept_age_input(&age) {
                        profile.age = age;
                    }
                    if ui.small_button("▲").on_hover_text("Increase age").clicked() {
                        profile.age = step_age(&profile.age, 1);
                    }
                    if ui.small_button("▼").on_hover_text("Decrease age").clicked() {
                        profile.age = step_age(&profile.age, -1);
                    }
                });

                let gender_text = if profile.gender.is_empty() {
                    "Select Gender...".to_string()
                } else {
                    profile.gender.clone()
                };
                egui::ComboBox::from_id_salt("profile_gender")
                    .selected_text(gender_text)
                    .show_ui(ui, |ui| {
                        for gender in GENDERS {
                            ui.selectable_value(&mut profile.gender, gender.to_string(), *gender);
                        }
                    });

                for (field, hint) in STORY_FIELDS {
                    let value = match *field {
                        "goals" => &mut profile.goals,
                        "fears" => &mut profile.fears,
                        "philosophy" => &mut profile.philosophy,
                        "hobbies" => &mut profile.hobbies,
                        "role_models" => &mut profile.role_models,
                        "past_experiences" => &mut profile.past_experiences,
                        _ => &mut profile.upcoming_events,
                    };
                    ui.add(
                        egui::TextEdit::multiline(value)
                            .hint_text(*hint)
                            .desired_rows(2)
                            .desired_width(f32::INFINITY),
                    );
                }

                ui.label(RichText::new("Personality Tone").color(TEXT_SECONDARY).small());
                egui::ComboBox::from_id_salt("profile_personality")
                    .selected_text(capitalize(profile.personality.label()))
                    .show_ui(ui, |ui| {
                        for p in Personality::all() {
                            ui.selectable_value(&mut profile.personality, *p, capitalize(p.label()));
                        }
                    });
            });

        form_error(ui, state);
        ui.add_space(8.0);
        if primary_button(ui, "Awaken Future Self", palette).clicked() {
            accepted = state.submit_profile().is_ok();
        }
    });

    accepted
}

fn card(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui)) {
    ui.vertical_centered(|ui| {
        ui.set_max_width(460.0);
        egui::Frame::default()
            .fill(BG_SECONDARY)
            .corner_radius(PANEL_ROUNDING)
            .inner_margin(24.0)
            .show(ui, add_contents);
    });
}

fn form_error(ui: &mut egui::Ui, state: &UiState) {
    if let Some(err) = &state.form_error {
        ui.label(RichText::new(err).color(ERROR).small());
    }
}

fn primary_button(ui: &mut egui::Ui, label: &str, palette: &Palette) -> egui::Response {
    ui.add(
        egui::Button::new(RichText::new(label).color(TEXT_PRIMARY).strong())
            .fill(palette.accent.linear_multiply(0.6))
            .corner_radius(PANEL_ROUNDING)
            .min_size(Vec2::new(ui.available_width(), 32.0)),
    )
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
