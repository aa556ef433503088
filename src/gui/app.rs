//! Main window implemented with egui/eframe: screen selector plus the
//! tracker, board editor, journal and analytics screens

use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use anyhow::{Result, anyhow};
use chrono::Utc;
use eframe::{CreationContext, NativeOptions, egui};
use tracing::{debug, error, info, warn};

use super::board_view::BoardView;
use super::components::boards::{BoardAction, BoardsPanel};
use super::components::{analytics, journal, tracker};
use super::constants::*;
use super::notifications::Toasts;
use crate::analytics::{DashboardSummary, TimeRange, dashboard_summary, mood_stats, moods_in_range};
use crate::board::{BoardEngine, BoardError, ImageImporter};
use crate::config::AppConfig;
use crate::export::export_snapshot;
use crate::flows::{BoardCatalog, JournalComposer, MoodTracker, Notification};
use crate::ids::IdGenerator;
use crate::store::{FileStorage, Store, StoreEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Dashboard,
    Boards,
    Journal,
    Analytics,
}

impl Screen {
    const ALL: [Screen; 4] = [
        Screen::Dashboard,
        Screen::Boards,
        Screen::Journal,
        Screen::Analytics,
    ];

    fn label(self) -> &'static str {
        match self {
            Screen::Dashboard => "🏠 Dashboard",
            Screen::Boards => "🖼 Mood Boards",
            Screen::Journal => "📓 Journal",
            Screen::Analytics => "📊 Analytics",
        }
    }
}

struct MoodMuseApp {
    config: AppConfig,
    store: Store<FileStorage>,
    store_events: Receiver<StoreEvent>,
    summary: DashboardSummary,
    ids: IdGenerator,
    screen: Screen,
    tracker: MoodTracker,
    journal: JournalComposer,
    catalog: BoardCatalog,
    engine: BoardEngine,
    board_view: BoardView,
    boards_panel: BoardsPanel,
    importer: ImageImporter,
    /// Board that "Save to Board" writes into
    open_board: Option<String>,
    range: TimeRange,
    toasts: Toasts,
}

impl MoodMuseApp {
    fn new(_cc: &CreationContext<'_>, config: AppConfig, mut store: Store<FileStorage>) -> Self {
        info!("Initializing MoodMuse window");
        let store_events = store.subscribe();
        let summary = dashboard_summary(store.state());

        Self {
            config,
            store,
            store_events,
            summary,
            ids: IdGenerator::new(),
            screen: Screen::Dashboard,
            tracker: MoodTracker::new(),
            journal: JournalComposer::new(),
            catalog: BoardCatalog::new(),
            engine: BoardEngine::new(),
            board_view: BoardView::new(),
            boards_panel: BoardsPanel::new(),
            importer: ImageImporter::new(),
            open_board: None,
            range: TimeRange::default(),
            toasts: Toasts::new(),
        }
    }

    /// Commit simulated saves whose delay has elapsed
    fn poll_flows(&mut self) {
        let now = Instant::now();
        if let Some(note) = self.tracker.poll(now, &mut self.store, &mut self.ids) {
            self.toasts.push(note);
        }
        if let Some(note) = self.journal.poll(now, &mut self.store, &mut self.ids) {
            self.toasts.push(note);
        }
    }

    fn poll_imports(&mut self) {
        for result in self.importer.poll() {
            match result {
                Ok(image) => match self.engine.create_image(image.data_uri) {
                    Ok(id) => debug!(id = %id, source = %image.source.display(), "Placed imported image"),
                    Err(e) => self.report_board_error(e),
                },
                Err(message) => {
                    self.toasts.push(Notification::error("Image import failed", message));
                }
            }
        }
    }

    fn drain_store_events(&mut self) {
        let mut changed = false;
        while let Ok(event) = self.store_events.try_recv() {
            debug!(?event, "Store changed");
            changed = true;
        }
        if changed {
            self.summary = dashboard_summary(self.store.state());
        }
    }

    fn report_board_error(&mut self, error: BoardError) {
        warn!(error = %error, "Board operation rejected");
        self.toasts
            .push(Notification::error("Board not updated", error.to_string()));
    }

    fn is_busy(&self) -> bool {
        self.tracker.is_saving()
            || self.journal.is_saving()
            || self.importer.pending() > 0
            || !self.toasts.is_empty()
    }

    fn handle_board_action(&mut self, action: BoardAction) {
        match action {
            BoardAction::None => {}
            BoardAction::CreateBoard => {
                match self
                    .catalog
                    .create_board(&mut self.store, &mut self.ids, Utc::now())
                {
                    Ok((id, note)) => {
                        self.open_board = Some(id);
                        self.boards_panel.board_created();
                        self.toasts.push(note);
                    }
                    Err(note) => self.toasts.push(note),
                }
            }
            BoardAction::OpenBoard(id) => match BoardCatalog::board_items(&self.store, &id) {
                Some(items) => {
                    self.engine.load_items(items);
                    self.board_view.reset();
                    self.open_board = Some(id);
                }
                None => warn!(id = %id, "Tried to open a board that no longer exists"),
            },
            BoardAction::SaveBoard => {
                if let Some(id) = self.open_board.clone() {
                    let note =
                        self.catalog
                            .save_items(&mut self.store, &id, self.engine.snapshot(), Utc::now());
                    self.toasts.push(note);
                }
            }
            BoardAction::DeleteBoard(id) => {
                self.store.delete_mood_board(&id);
                if self.open_board.as_deref() == Some(id.as_str()) {
                    self.open_board = None;
                }
                info!(id = %id, "Mood board deleted");
            }
            BoardAction::ImportImage(path) => {
                if let Err(e) = self.importer.import(path) {
                    error!(error = ?e, "Failed to start image import");
                    self.toasts
                        .push(Notification::error("Image import failed", format!("{e:#}")));
                }
            }
            BoardAction::AddText => {
                if let Err(e) = self.engine.create_text() {
                    self.report_board_error(e);
                }
            }
            BoardAction::AddColor => {
                if let Err(e) = self.engine.create_color() {
                    self.report_board_error(e);
                }
            }
            BoardAction::Export => {
                let options = self.config.export_options();
                match export_snapshot(&self.engine.paint_order(), &options) {
                    Ok(path) => self.toasts.push(Notification::info(
                        "Mood board exported!",
                        format!("Saved to {}", path.display()),
                    )),
                    Err(e) => {
                        error!(error = %e, "Board export failed");
                        self.toasts
                            .push(Notification::error("Export failed", e.to_string()));
                    }
                }
            }
            BoardAction::SetMode(mode) => self.engine.set_mode(mode),
        }
    }

    fn dashboard_screen(&mut self, ctx: &egui::Context) {
        let mut note = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(PADDING);
                ui.heading("Dashboard");
                ui.add_space(SECTION_SPACING);
                analytics::summary_ui(ui, &self.summary);
                ui.add_space(SECTION_SPACING);
                tracker::ui(ui, &mut self.tracker);
                ui.add_space(SECTION_SPACING);
                note = journal::composer_ui(ui, &mut self.journal, 3);
            });
        });
        if let Some(note) = note {
            self.toasts.push(note);
        }
    }

    fn boards_screen(&mut self, ctx: &egui::Context) {
        let mut catalog_action = BoardAction::None;
        egui::SidePanel::left("board_catalog")
            .default_width(SIDE_PANEL_WIDTH)
            .show(ctx, |ui| {
                ui.add_space(PADDING);
                catalog_action = self.boards_panel.catalog_ui(
                    ui,
                    &mut self.catalog,
                    self.store.mood_boards(),
                    self.open_board.as_deref(),
                );
            });

        let mut toolbar_action = BoardAction::None;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(PADDING);
            let open_board = self
                .open_board
                .as_deref()
                .and_then(|id| self.store.mood_boards().iter().find(|b| b.id == id));
            toolbar_action = self.boards_panel.toolbar_ui(
                ui,
                self.engine.mode(),
                open_board,
                self.importer.pending() > 0,
            );
            ui.add_space(ITEM_SPACING);

            let size = egui::vec2(self.config.board_width as f32, self.config.board_height as f32);
            egui::ScrollArea::both().show(ui, |ui| {
                self.board_view.ui(ui, &mut self.engine, size);
            });
            if self.engine.is_editable() {
                ui.label(
                    egui::RichText::new(
                        "Drag items to move them. Use the handles to resize. Double click text to edit.",
                    )
                    .small()
                    .weak(),
                );
            }
        });

        self.handle_board_action(catalog_action);
        self.handle_board_action(toolbar_action);
    }

    fn journal_screen(&mut self, ctx: &egui::Context) {
        let mut note = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(PADDING);
            ui.heading("Journal");
            ui.add_space(SECTION_SPACING);
            note = journal::composer_ui(ui, &mut self.journal, 8);
            ui.add_space(SECTION_SPACING);
            journal::entries_ui(ui, self.store.journal_entries());
        });
        if let Some(note) = note {
            self.toasts.push(note);
        }
    }

    fn analytics_screen(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(PADDING);
            ui.heading("Analytics");
            ui.add_space(SECTION_SPACING);
            let now = Utc::now();
            let stats = mood_stats(self.store.moods(), self.range, now);
            let moods = moods_in_range(self.store.moods(), self.range, now);
            analytics::stats_ui(ui, &mut self.range, &stats, &moods);
        });
    }
}

impl eframe::App for MoodMuseApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_flows();
        self.poll_imports();
        self.drain_store_events();

        // Window blur or leaving the board screen ends any gesture in flight
        if self.screen != Screen::Boards || !ctx.input(|i| i.focused) {
            self.engine.cancel_gesture();
        }

        egui::TopBottomPanel::top("screens").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("MoodMuse");
                ui.separator();
                for screen in Screen::ALL {
                    ui.selectable_value(&mut self.screen, screen, screen.label());
                }
            });
        });

        match self.screen {
            Screen::Dashboard => self.dashboard_screen(ctx),
            Screen::Boards => self.boards_screen(ctx),
            Screen::Journal => self.journal_screen(ctx),
            Screen::Analytics => self.analytics_screen(ctx),
        }

        self.toasts.show(ctx);

        if self.is_busy() {
            ctx.request_repaint_after(Duration::from_millis(POLL_INTERVAL_MS));
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.engine.cancel_gesture();
        info!(
            moods = self.store.moods().len(),
            boards = self.store.mood_boards().len(),
            "MoodMuse exiting"
        );
    }
}

pub fn run_gui(config: AppConfig, store: Store<FileStorage>) -> Result<()> {
    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width as f32, config.window_height as f32])
            .with_min_inner_size([WINDOW_MIN_WIDTH, WINDOW_MIN_HEIGHT])
            .with_title("MoodMuse"),
        ..Default::default()
    };

    eframe::run_native(
        "MoodMuse",
        options,
        Box::new(move |cc| Ok(Box::new(MoodMuseApp::new(cc, config, store)))),
    )
    .map_err(|err| anyhow!("Failed to launch MoodMuse window: {err}"))
}
