//! UI theme constants and the three selectable palettes

use egui::{Color32, CornerRadius, Stroke, Vec2};
use lens_types::config::Theme;

pub const BG_PRIMARY: Color32 = Color32::from_rgb(10, 10, 20);
pub const BG_SECONDARY: Color32 = Color32::from_rgb(22, 22, 36);
pub const BG_SURFACE: Color32 = Color32::from_rgb(36, 36, 54);
pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(232, 232, 240);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(156, 163, 175);
pub const SUCCESS: Color32 = Color32::from_rgb(34, 197, 94);
pub const ERROR: Color32 = Color32::from_rgb(239, 68, 68);
pub const WARNING: Color32 = Color32::from_rgb(234, 179, 8);

pub const PANEL_ROUNDING: CornerRadius = CornerRadius::same(10);
pub const PANEL_PADDING: Vec2 = Vec2::new(12.0, 8.0);

/// Per-theme accent colours
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub accent: Color32,
    pub user_bubble: Color32,
    pub ai_bubble: Color32,
}

pub fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::NeonBlue => Palette {
            accent: Color32::from_rgb(34, 211, 238),
            user_bubble: Color32::from_rgb(8, 90, 130),
            ai_bubble: Color32::from_rgb(30, 41, 70),
        },
        Theme::VioletFlux => Palette {
            accent: Color32::from_rgb(192, 132, 252),
            user_bubble: Color32::from_rgb(91, 33, 182),
            ai_bubble: Color32::from_rgb(46, 31, 74),
        },
        Theme::CyberCrimson => Palette {
            accent: Color32::from_rgb(251, 113, 133),
            user_bubble: Color32::from_rgb(159, 18, 57),
            ai_bubble: Color32::from_rgb(64, 24, 36),
        },
    }
}

/// Apply the dark theme with the chosen accent to an egui context
pub fn apply_theme(ctx: &egui::Context, theme: Theme) {
    let colors = palette(theme);
    let mut style = (*ctx.style()).clone();

    style.visuals.dark_mode = true;
    style.visuals.panel_fill = BG_PRIMARY;
    style.visuals.window_fill = BG_SECONDARY;
    style.visuals.extreme_bg_color = BG_PRIMARY;
    style.visuals.hyperlink_color = colors.accent;

    style.visuals.widgets.inactive.bg_fill = BG_SURFACE;
    style.visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, TEXT_SECONDARY);
    style.visuals.widgets.hovered.bg_fill = BG_SURFACE;
    style.visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, TEXT_PRIMARY);
    style.visuals.widgets.active.bg_fill = colors.accent;
    style.visuals.widgets.active.fg_stroke = Stroke::new(1.0, TEXT_PRIMARY);

    style.visuals.selection.bg_fill = colors.accent.linear_multiply(0.4);
    style.visuals.selection.stroke = Stroke::new(1.0, colors.accent);

    style.spacing.item_spacing = Vec2::new(8.0, 6.0);

    ctx.set_style(style);
}
