use std::time::Instant;

use eframe::egui;

use crate::constants::mood;
use crate::flows::{MoodTracker, mood_emoji, mood_label};
use crate::gui::constants::*;

/// Mood slider with optional notes and a save button
pub fn ui(ui: &mut egui::Ui, tracker: &mut MoodTracker) {
    ui.group(|ui| {
        ui.label(egui::RichText::new("How are you feeling today?").strong());
        ui.add_space(ITEM_SPACING);

        ui.horizontal(|ui| {
            let mut value = tracker.value();
            ui.add_enabled(
                !tracker.is_saving(),
                egui::Slider::new(&mut value, mood::MIN_VALUE..=mood::MAX_VALUE).integer(),
            );
            tracker.set_value(value);
            ui.label(
                egui::RichText::new(format!(
                    "{} {}",
                    mood_emoji(tracker.value()),
                    mood_label(tracker.value())
                ))
                .size(18.0),
            );
        });

        ui.add_space(ITEM_SPACING);
        ui.label("Notes (optional):");
        ui.add_enabled(
            !tracker.is_saving(),
            egui::TextEdit::multiline(&mut tracker.notes)
                .hint_text("What's on your mind?")
                .desired_rows(2),
        );

        ui.add_space(ITEM_SPACING);
        ui.horizontal(|ui| {
            let label = if tracker.is_saving() { "Saving..." } else { "Save Mood" };
            if ui
                .add_enabled(!tracker.is_saving(), egui::Button::new(label))
                .clicked()
            {
                tracker.save(Instant::now());
            }
            if tracker.is_saving() {
                ui.spinner();
            }
        });
    });
}
