use std::path::PathBuf;

use eframe::egui;

use crate::board::DisplayMode;
use crate::constants::board;
use crate::flows::BoardCatalog;
use crate::gui::constants::*;
use crate::store::MoodBoard;

/// What the user asked for on the Mood Boards screen this frame
#[derive(Debug, Clone, PartialEq)]
pub enum BoardAction {
    None,
    CreateBoard,
    OpenBoard(String),
    SaveBoard,
    DeleteBoard(String),
    ImportImage(PathBuf),
    AddText,
    AddColor,
    Export,
    SetMode(DisplayMode),
}

pub struct BoardsPanel {
    show_new_dialog: bool,
    delete_candidate: Option<(String, String)>,
}

impl BoardsPanel {
    pub fn new() -> Self {
        Self {
            show_new_dialog: false,
            delete_candidate: None,
        }
    }

    /// Saved boards with open and delete actions
    pub fn catalog_ui(
        &mut self,
        ui: &mut egui::Ui,
        catalog: &mut BoardCatalog,
        boards: &[MoodBoard],
        open_board: Option<&str>,
    ) -> BoardAction {
        let mut action = BoardAction::None;

        ui.heading("Mood Boards");
        ui.add_space(ITEM_SPACING);

        if ui.button("➕ New Board").clicked() {
            self.show_new_dialog = true;
            catalog.new_board_name.clear();
        }

        ui.add_space(ITEM_SPACING);
        ui.separator();

        if boards.is_empty() {
            ui.label("No boards yet. Create one to save your work.");
        }

        egui::ScrollArea::vertical().show(ui, |ui| {
            for board in boards {
                let is_open = open_board == Some(board.id.as_str());
                ui.group(|ui| {
                    ui.horizontal(|ui| {
                        let name = egui::RichText::new(&board.name);
                        ui.label(if is_open { name.strong() } else { name });
                    });
                    ui.label(format!(
                        "{} item(s) · updated {}",
                        board.items.len(),
                        board.updated_at.format("%Y-%m-%d %H:%M")
                    ));
                    ui.horizontal(|ui| {
                        if ui.button("📂 Open").clicked() {
                            action = BoardAction::OpenBoard(board.id.clone());
                        }
                        if ui.button("🗑 Delete").clicked() {
                            self.delete_candidate = Some((board.id.clone(), board.name.clone()));
                        }
                    });
                });
            }
        });

        if self.show_new_dialog {
            let dialog_action = self.new_board_dialog(ui.ctx(), catalog);
            if dialog_action != BoardAction::None {
                action = dialog_action;
            }
        }

        if self.delete_candidate.is_some() {
            let dialog_action = self.delete_confirm_dialog(ui.ctx());
            if dialog_action != BoardAction::None {
                action = dialog_action;
            }
        }

        action
    }

    /// Editor toolbar above the board surface
    pub fn toolbar_ui(
        &mut self,
        ui: &mut egui::Ui,
        mode: DisplayMode,
        open_board: Option<&MoodBoard>,
        importing: bool,
    ) -> BoardAction {
        let mut action = BoardAction::None;

        ui.horizontal(|ui| {
            let mut selected = mode;
            ui.selectable_value(&mut selected, DisplayMode::Edit, "✏ Edit");
            ui.selectable_value(&mut selected, DisplayMode::Preview, "👁 Preview");
            if selected != mode {
                action = BoardAction::SetMode(selected);
            }

            ui.separator();

            match open_board {
                Some(board) => {
                    ui.label(format!("Board: {}", board.name));
                    if ui.button("💾 Save to Board").clicked() {
                        action = BoardAction::SaveBoard;
                    }
                }
                None => {
                    ui.label("Unsaved board");
                }
            }

            ui.separator();

            if ui.button("⬇ Export PNG").clicked() {
                action = BoardAction::Export;
            }
        });

        if mode == DisplayMode::Edit {
            ui.add_space(ITEM_SPACING);
            ui.horizontal(|ui| {
                if ui.button("🔤 Add Text").clicked() {
                    action = BoardAction::AddText;
                }
                if ui.button("🎨 Add Color").clicked() {
                    action = BoardAction::AddColor;
                }

                ui.separator();

                if ui.button("🖼 Add Image").clicked()
                    && let Some(path) = rfd::FileDialog::new()
                        .add_filter("Images", board::IMPORT_EXTENSIONS)
                        .pick_file()
                {
                    action = BoardAction::ImportImage(path);
                }
                if importing {
                    ui.spinner();
                }
            });
        }

        action
    }

    fn new_board_dialog(&mut self, ctx: &egui::Context, catalog: &mut BoardCatalog) -> BoardAction {
        let mut action = BoardAction::None;

        egui::Window::new("New Mood Board")
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label("Board Name:");
                let response = ui.text_edit_singleline(&mut catalog.new_board_name);
                let submitted =
                    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                ui.add_space(ITEM_SPACING);

                ui.horizontal(|ui| {
                    if ui.button("Create").clicked() || submitted {
                        action = BoardAction::CreateBoard;
                    }

                    if ui.button("Cancel").clicked() {
                        self.show_new_dialog = false;
                    }
                });
            });

        action
    }

    /// Close the new board dialog after a successful create
    pub fn board_created(&mut self) {
        self.show_new_dialog = false;
    }

    fn delete_confirm_dialog(&mut self, ctx: &egui::Context) -> BoardAction {
        let mut action = BoardAction::None;
        let Some((id, name)) = self.delete_candidate.clone() else {
            return action;
        };

        egui::Window::new("Delete Mood Board")
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(format!("Delete \"{name}\"? This cannot be undone."));
                ui.add_space(ITEM_SPACING);
                ui.horizontal(|ui| {
                    if ui.button("Delete").clicked() {
                        action = BoardAction::DeleteBoard(id.clone());
                        self.delete_candidate = None;
                    }
                    if ui.button("Cancel").clicked() {
                        self.delete_candidate = None;
                    }
                });
            });

        action
    }
}
