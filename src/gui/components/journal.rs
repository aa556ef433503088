use std::time::Instant;

use eframe::egui;

use crate::flows::{JournalComposer, Notification};
use crate::gui::constants::*;
use crate::store::JournalEntry;

/// Journal text box; returns a validation notification when submit is refused
pub fn composer_ui(
    ui: &mut egui::Ui,
    composer: &mut JournalComposer,
    rows: usize,
) -> Option<Notification> {
    let mut notification = None;

    ui.group(|ui| {
        ui.label(egui::RichText::new("Journal").strong());
        ui.add_space(ITEM_SPACING);
        ui.add_enabled(
            !composer.is_saving(),
            egui::TextEdit::multiline(&mut composer.content)
                .hint_text("Write your thoughts...")
                .desired_rows(rows)
                .desired_width(f32::INFINITY),
        );
        ui.add_space(ITEM_SPACING);
        ui.horizontal(|ui| {
            let label = if composer.is_saving() { "Saving..." } else { "Save Entry" };
            if ui
                .add_enabled(!composer.is_saving(), egui::Button::new(label))
                .clicked()
            {
                notification = composer.submit(Instant::now());
            }
            if composer.is_saving() {
                ui.spinner();
            }
        });
    });

    notification
}

/// Previous entries, newest first
pub fn entries_ui(ui: &mut egui::Ui, entries: &[JournalEntry]) {
    ui.label(egui::RichText::new("Previous Entries").strong());
    ui.add_space(ITEM_SPACING);

    if entries.is_empty() {
        ui.label("No journal entries yet.");
        return;
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        let mut ordered: Vec<&JournalEntry> = entries.iter().collect();
        ordered.sort_by(|a, b| b.date.cmp(&a.date));
        for entry in ordered {
            ui.group(|ui| {
                ui.set_width(ui.available_width());
                ui.label(
                    egui::RichText::new(entry.date.format("%A, %B %-d, %Y %H:%M").to_string())
                        .small()
                        .weak(),
                );
                ui.label(&entry.content);
            });
            ui.add_space(ITEM_SPACING / 2.0);
        }
    });
}
