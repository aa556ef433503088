//! Dismissable toasts in the bottom-right corner

use std::time::{Duration, Instant};

use eframe::egui;

use super::constants::*;
use crate::constants::timing::NOTIFICATION_TTL_MS;
use crate::flows::{Notification, Severity};

struct Toast {
    notification: Notification,
    expires: Instant,
}

#[derive(Default)]
pub struct Toasts {
    toasts: Vec<Toast>,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notification: Notification) {
        self.toasts.push(Toast {
            notification,
            expires: Instant::now() + Duration::from_millis(NOTIFICATION_TTL_MS),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        self.toasts.retain(|t| t.expires > now);
        if self.toasts.is_empty() {
            return;
        }

        let mut dismissed = None;
        egui::Area::new(egui::Id::new("toasts"))
            .anchor(egui::Align2::RIGHT_BOTTOM, [-PADDING, -PADDING])
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                ui.set_max_width(TOAST_WIDTH);
                for (idx, toast) in self.toasts.iter().enumerate() {
                    let color = match toast.notification.severity {
                        Severity::Info => TOAST_INFO,
                        Severity::Error => TOAST_ERROR,
                    };
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.vertical(|ui| {
                                ui.colored_label(
                                    color,
                                    egui::RichText::new(&toast.notification.title).strong(),
                                );
                                ui.label(&toast.notification.description);
                            });
                            if ui.small_button("✕").clicked() {
                                dismissed = Some(idx);
                            }
                        });
                    });
                    ui.add_space(ITEM_SPACING / 2.0);
                }
            });

        if let Some(idx) = dismissed {
            self.toasts.remove(idx);
        }
    }
}
