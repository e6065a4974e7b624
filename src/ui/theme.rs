use egui::{Color32, FontId, Stroke, Visuals};
use gantt_timeline::model::{Priority, Status};

// Palette

pub const BG_DARK: Color32 = Color32::from_rgb(24, 24, 32);
pub const BG_PANEL: Color32 = Color32::from_rgb(30, 30, 40);
pub const BG_HEADER: Color32 = Color32::from_rgb(34, 37, 48);
pub const BG_SELECTED: Color32 = Color32::from_rgba_premultiplied(80, 140, 220, 45);

pub const BORDER_SUBTLE: Color32 = Color32::from_rgb(50, 52, 64);
pub const BORDER_ACCENT: Color32 = Color32::from_rgb(90, 140, 220);

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(230, 232, 240);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(155, 160, 178);
pub const TEXT_DIM: Color32 = Color32::from_rgb(100, 105, 120);
pub const TEXT_ON_BAR: Color32 = Color32::from_rgb(255, 255, 255);

pub const TODAY_LINE: Color32 = Color32::from_rgb(240, 75, 75);
pub const GRID_LINE: Color32 = Color32::from_rgb(44, 46, 58);
pub const HANDLE_COLOR: Color32 = Color32::from_rgb(255, 255, 255);
pub const CONNECTOR: Color32 = Color32::from_rgb(150, 156, 176);
pub const DRAFT_OUTLINE: Color32 = Color32::from_rgb(255, 214, 102);

pub const PROGRESS_OVERLAY: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 55);

// Sizes

pub const ROW_HEIGHT: f32 = 32.0;
pub const HEADER_HEIGHT: f32 = 44.0;
pub const HANDLE_WIDTH: f32 = 7.0;
pub const BAR_ROUNDING: f32 = 5.0;
pub const BAR_INSET: f32 = 5.0; // vertical inset so bars don't touch row edges
pub const INDENT: f32 = 14.0;
pub const SIDE_PANEL_WIDTH: f32 = 280.0;

// Fonts

pub fn font_header() -> FontId {
    FontId::proportional(12.0)
}

pub fn font_sub() -> FontId {
    FontId::proportional(10.5)
}

pub fn font_bar() -> FontId {
    FontId::proportional(11.5)
}

pub fn font_small() -> FontId {
    FontId::proportional(9.5)
}

// Item colours

pub fn status_color(status: Status) -> Color32 {
    match status {
        Status::Todo => Color32::from_rgb(96, 125, 139),
        Status::Doing => Color32::from_rgb(66, 133, 244),
        Status::Review => Color32::from_rgb(171, 71, 188),
        Status::Done => Color32::from_rgb(52, 168, 83),
    }
}

pub fn priority_color(priority: Priority) -> Color32 {
    match priority {
        Priority::Low => Color32::from_rgb(120, 144, 156),
        Priority::Medium => Color32::from_rgb(255, 193, 7),
        Priority::High => Color32::from_rgb(251, 140, 0),
        Priority::Critical => Color32::from_rgb(229, 57, 53),
    }
}

/// Dark visuals for panels, windows and selections. Everything drawn on the
/// chart uses the palette directly.
pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = Visuals::dark();
    visuals.override_text_color = Some(TEXT_PRIMARY);
    visuals.panel_fill = BG_PANEL;
    visuals.window_fill = BG_PANEL;
    visuals.window_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    visuals.selection.bg_fill = BG_SELECTED;
    visuals.selection.stroke = Stroke::new(1.0, BORDER_ACCENT);
    visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, BORDER_ACCENT);
    ctx.set_visuals(visuals);
}
