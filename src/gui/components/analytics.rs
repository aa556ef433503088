use eframe::egui;

use crate::analytics::{DashboardSummary, MoodStats, TimeRange};
use crate::flows::{mood_emoji, mood_label};
use crate::gui::constants::*;
use crate::store::Mood;

pub fn summary_ui(ui: &mut egui::Ui, summary: &DashboardSummary) {
    ui.horizontal(|ui| {
        stat_card(ui, "Mood entries", summary.total_moods.to_string());
        stat_card(
            ui,
            "Average mood",
            summary
                .average_mood
                .map_or_else(|| "-".to_string(), |avg| format!("{avg:.1}")),
        );
        stat_card(ui, "Mood boards", summary.mood_boards.to_string());
        stat_card(ui, "Journal entries", summary.journal_entries.to_string());
    });
}

/// Range picker plus the stats for the chosen range
pub fn stats_ui(ui: &mut egui::Ui, range: &mut TimeRange, stats: &MoodStats, moods: &[&Mood]) {
    ui.horizontal(|ui| {
        for option in TimeRange::ALL {
            ui.selectable_value(range, option, option.label());
        }
    });
    ui.add_space(SECTION_SPACING);

    if stats.entries == 0 {
        ui.label("No mood data for this period yet.");
        return;
    }

    ui.horizontal(|ui| {
        stat_card(ui, "Entries", stats.entries.to_string());
        stat_card(
            ui,
            "Average",
            stats.average.map_or_else(|| "-".to_string(), |avg| format!("{avg:.1}")),
        );
        stat_card(ui, "Most common", stats.distribution.most_common().to_string());
        stat_card(
            ui,
            "Spread",
            stats.spread.map_or_else(|| "-".to_string(), |s| s.to_string()),
        );
    });

    ui.add_space(SECTION_SPACING);
    ui.label(egui::RichText::new("Distribution").strong());
    egui::Grid::new("mood_distribution")
        .num_columns(3)
        .spacing([ITEM_SPACING * 2.0, ITEM_SPACING / 2.0])
        .show(ui, |ui| {
            for (bucket, count) in stats.distribution.buckets() {
                ui.label(bucket);
                let fraction = count as f32 / stats.entries as f32;
                ui.add(egui::ProgressBar::new(fraction).desired_width(200.0));
                ui.label(count.to_string());
                ui.end_row();
            }
        });

    ui.add_space(SECTION_SPACING);
    ui.label(egui::RichText::new("Recent moods").strong());
    egui::ScrollArea::vertical().max_height(200.0).show(ui, |ui| {
        for mood in moods.iter().rev() {
            ui.horizontal(|ui| {
                ui.label(mood.date.format("%Y-%m-%d %H:%M").to_string());
                ui.label(format!(
                    "{} {} ({})",
                    mood_emoji(mood.value),
                    mood_label(mood.value),
                    mood.value
                ));
                if let Some(notes) = &mood.notes {
                    ui.label(egui::RichText::new(notes).weak());
                }
            });
        }
    });
}

fn stat_card(ui: &mut egui::Ui, title: &str, value: String) {
    ui.group(|ui| {
        ui.vertical(|ui| {
            ui.label(egui::RichText::new(title).small().weak());
            ui.label(egui::RichText::new(value).size(22.0).strong());
        });
    });
}
