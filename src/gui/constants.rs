//! GUI-specific constants for layout, colors and intervals

use egui;

/// Main window dimensions
pub const WINDOW_MIN_WIDTH: f32 = 900.0;
pub const WINDOW_MIN_HEIGHT: f32 = 640.0;

/// Layout spacing
pub const PADDING: f32 = 10.0;
pub const SECTION_SPACING: f32 = 15.0;
pub const ITEM_SPACING: f32 = 8.0;
pub const SIDE_PANEL_WIDTH: f32 = 240.0;

/// Board surface
pub const BOARD_BORDER: egui::Color32 = egui::Color32::from_rgb(203, 213, 225);
pub const BOARD_BACKGROUND: egui::Color32 = egui::Color32::WHITE;
pub const TEXT_PANEL: egui::Color32 = egui::Color32::from_rgba_premultiplied(204, 204, 204, 204);
pub const TEXT_COLOR: egui::Color32 = egui::Color32::from_rgb(31, 41, 55);
pub const TEXT_SIZE: f32 = 16.0;
pub const SELECTION_STROKE: egui::Color32 = egui::Color32::from_rgb(139, 92, 246);
pub const ACTIVE_STROKE_WIDTH: f32 = 2.0;
pub const HANDLE_SIZE: f32 = 12.0;
pub const DELETE_BUTTON_SIZE: f32 = 20.0;
pub const BROKEN_IMAGE: egui::Color32 = egui::Color32::from_rgb(254, 226, 226);

/// Notification colors
pub const TOAST_INFO: egui::Color32 = egui::Color32::from_rgb(34, 139, 84);
pub const TOAST_ERROR: egui::Color32 = egui::Color32::from_rgb(200, 40, 40);
pub const TOAST_WIDTH: f32 = 320.0;

/// Repaint cadence while timers (saves, toasts, imports) are pending
pub const POLL_INTERVAL_MS: u64 = 100;
