//! Screen flows that write to the store: mood tracking, journaling and
//! creating mood boards
//!
//! Tracker and journal saves are delayed by a fixed, simulated latency.
//! While one is pending the flow is busy and further saves are refused.
//! Time is passed in by the caller so the UI loop drives the delay.

use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::constants::{mood, timing};
use crate::ids::IdGenerator;
use crate::board::BoardItem;
use crate::store::{JournalEntry, LocalStorage, Mood, MoodBoard, MoodBoardPatch, Store};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

/// User-visible, dismissable message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notification {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Info,
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Error,
        }
    }
}

fn save_delay() -> Duration {
    Duration::from_millis(timing::SAVE_DELAY_MS)
}

pub fn mood_label(value: u8) -> &'static str {
    match value {
        0..=2 => "Sad",
        3..=4 => "Down",
        5..=6 => "Neutral",
        7..=8 => "Good",
        _ => "Great",
    }
}

pub fn mood_emoji(value: u8) -> &'static str {
    match value {
        0..=2 => "😢",
        3..=4 => "😕",
        5..=6 => "😐",
        7..=8 => "😊",
        _ => "😁",
    }
}

// === Mood tracker ===

#[derive(Debug)]
struct PendingMood {
    due: Instant,
    value: u8,
    notes: String,
}

#[derive(Debug)]
pub struct MoodTracker {
    value: u8,
    pub notes: String,
    pending: Option<PendingMood>,
}

impl Default for MoodTracker {
    fn default() -> Self {
        Self {
            value: mood::DEFAULT_VALUE,
            notes: String::new(),
            pending: None,
        }
    }
}

impl MoodTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    /// Set the slider value, constrained to the 1..=10 scale
    pub fn set_value(&mut self, value: u8) {
        self.value = value.clamp(mood::MIN_VALUE, mood::MAX_VALUE);
    }

    pub fn is_saving(&self) -> bool {
        self.pending.is_some()
    }

    /// Start a save. Returns false when one is already in flight.
    pub fn save(&mut self, now: Instant) -> bool {
        if self.is_saving() {
            debug!("Mood save already pending");
            return false;
        }
        self.pending = Some(PendingMood {
            due: now + save_delay(),
            value: self.value,
            notes: self.notes.clone(),
        });
        true
    }

    /// Commit the pending save once its delay has elapsed
    pub fn poll<S: LocalStorage>(
        &mut self,
        now: Instant,
        store: &mut Store<S>,
        ids: &mut IdGenerator,
    ) -> Option<Notification> {
        if self.pending.as_ref().is_none_or(|p| now < p.due) {
            return None;
        }
        let pending = self.pending.take()?;
        let date = Utc::now();
        let notes = (!pending.notes.trim().is_empty()).then_some(pending.notes);

        store.add_mood(Mood {
            id: ids.next_at(date),
            date,
            value: pending.value,
            notes,
        });
        info!(value = pending.value, "Mood saved");
        self.notes.clear();

        Some(Notification::info(
            "Mood saved!",
            format!(
                "You're feeling {} today.",
                mood_label(pending.value).to_lowercase()
            ),
        ))
    }
}

// === Journal ===

#[derive(Debug)]
struct PendingEntry {
    due: Instant,
    content: String,
}

#[derive(Debug, Default)]
pub struct JournalComposer {
    pub content: String,
    pending: Option<PendingEntry>,
}

impl JournalComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_saving(&self) -> bool {
        self.pending.is_some()
    }

    /// Start saving the current content. Empty or whitespace-only content is
    /// refused with a validation notification and the input is kept.
    pub fn submit(&mut self, now: Instant) -> Option<Notification> {
        if self.content.trim().is_empty() {
            return Some(Notification::error(
                "Entry cannot be empty",
                "Please write something in your journal entry.",
            ));
        }
        if self.is_saving() {
            debug!("Journal save already pending");
            return None;
        }
        self.pending = Some(PendingEntry {
            due: now + save_delay(),
            content: self.content.clone(),
        });
        None
    }

    pub fn poll<S: LocalStorage>(
        &mut self,
        now: Instant,
        store: &mut Store<S>,
        ids: &mut IdGenerator,
    ) -> Option<Notification> {
        if self.pending.as_ref().is_none_or(|p| now < p.due) {
            return None;
        }
        let pending = self.pending.take()?;
        let date = Utc::now();

        store.add_journal_entry(JournalEntry {
            id: ids.next_at(date),
            date,
            content: pending.content,
            mood_id: None,
        });
        info!("Journal entry saved");
        self.content.clear();

        Some(Notification::info(
            "Journal entry saved!",
            "Your thoughts have been recorded.",
        ))
    }
}

// === Mood boards ===

#[derive(Debug, Default)]
pub struct BoardCatalog {
    pub new_board_name: String,
}

impl BoardCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty, named board from `new_board_name`.
    /// Returns the new board's id, or the notification to show.
    pub fn create_board<S: LocalStorage>(
        &mut self,
        store: &mut Store<S>,
        ids: &mut IdGenerator,
        now: DateTime<Utc>,
    ) -> Result<(String, Notification), Notification> {
        if self.new_board_name.trim().is_empty() {
            return Err(Notification::error(
                "Board name required",
                "Please enter a name for your mood board.",
            ));
        }
        let name = std::mem::take(&mut self.new_board_name);
        let id = ids.next_at(now);
        store.add_mood_board(MoodBoard::new(id.clone(), name.clone(), now));
        info!(id = %id, name = %name, "Mood board created");

        Ok((
            id,
            Notification::info(
                "Mood board created!",
                format!("Your \"{name}\" mood board is ready to use."),
            ),
        ))
    }

    /// Store `items` as the saved snapshot of board `board_id`
    pub fn save_items<S: LocalStorage>(
        &self,
        store: &mut Store<S>,
        board_id: &str,
        items: Vec<BoardItem>,
        now: DateTime<Utc>,
    ) -> Notification {
        let Some(name) = store
            .mood_boards()
            .iter()
            .find(|b| b.id == board_id)
            .map(|b| b.name.clone())
        else {
            return Notification::error("Board not found", "The mood board no longer exists.");
        };
        let count = items.len();
        store.update_mood_board(
            board_id,
            MoodBoardPatch {
                items: Some(items),
                updated_at: Some(now),
                ..MoodBoardPatch::default()
            },
        );
        info!(id = board_id, items = count, "Saved board items");
        Notification::info("Mood board saved!", format!("\"{name}\" now holds {count} item(s)."))
    }

    /// Items of board `board_id`, for opening it in the editor
    pub fn board_items<S: LocalStorage>(store: &Store<S>, board_id: &str) -> Option<Vec<BoardItem>> {
        store
            .mood_boards()
            .iter()
            .find(|b| b.id == board_id)
            .map(|b| b.items.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStorage;

    fn store() -> Store<MemoryStorage> {
        Store::load(MemoryStorage::new())
    }

    #[test]
    fn test_slider_cannot_leave_range() {
        let mut tracker = MoodTracker::new();
        for raw in 0..=u8::MAX {
            tracker.set_value(raw);
            assert!((1..=10).contains(&tracker.value()), "{raw} -> {}", tracker.value());
        }
        tracker.set_value(0);
        assert_eq!(tracker.value(), 1);
        tracker.set_value(11);
        assert_eq!(tracker.value(), 10);
        tracker.set_value(7);
        assert_eq!(tracker.value(), 7);
    }

    #[test]
    fn test_mood_save_waits_for_delay() {
        let mut store = store();
        let mut ids = IdGenerator::new();
        let mut tracker = MoodTracker::new();
        tracker.set_value(8);
        tracker.notes = "sunny walk".to_string();
        let start = Instant::now();

        assert!(tracker.save(start));
        assert!(tracker.is_saving());
        assert!(tracker.poll(start + Duration::from_millis(499), &mut store, &mut ids).is_none());
        assert!(store.moods().is_empty());

        let note = tracker
            .poll(start + Duration::from_millis(500), &mut store, &mut ids)
            .unwrap();
        assert_eq!(note.description, "You're feeling good today.");
        assert_eq!(store.moods().len(), 1);
        assert_eq!(store.moods()[0].value, 8);
        assert_eq!(store.moods()[0].notes.as_deref(), Some("sunny walk"));
        assert!(tracker.notes.is_empty());
        assert!(!tracker.is_saving());
    }

    #[test]
    fn test_second_save_refused_while_busy() {
        let mut store = store();
        let mut ids = IdGenerator::new();
        let mut tracker = MoodTracker::new();
        let start = Instant::now();

        assert!(tracker.save(start));
        assert!(!tracker.save(start + Duration::from_millis(100)));
        tracker.poll(start + Duration::from_secs(1), &mut store, &mut ids);
        assert_eq!(store.moods().len(), 1);
        assert_eq!(store.moods()[0].notes, None);
    }

    #[test]
    fn test_empty_journal_entry_rejected() {
        let mut store = store();
        let mut ids = IdGenerator::new();
        let mut composer = JournalComposer::new();
        let start = Instant::now();

        for content in ["", "   \n\t"] {
            composer.content = content.to_string();
            let note = composer.submit(start).unwrap();
            assert_eq!(note.severity, Severity::Error);
            assert_eq!(note.title, "Entry cannot be empty");
            assert!(!composer.is_saving());
            assert_eq!(composer.content, content);
        }
        composer.poll(start + Duration::from_secs(1), &mut store, &mut ids);
        assert!(store.journal_entries().is_empty());
    }

    #[test]
    fn test_journal_entry_saved_after_delay() {
        let mut store = store();
        let mut ids = IdGenerator::new();
        let mut composer = JournalComposer::new();
        composer.content = "Today I felt calm".to_string();
        let start = Instant::now();

        assert!(composer.submit(start).is_none());
        assert!(composer.is_saving());
        let note = composer
            .poll(start + Duration::from_millis(500), &mut store, &mut ids)
            .unwrap();
        assert_eq!(note.title, "Journal entry saved!");
        assert_eq!(store.journal_entries()[0].content, "Today I felt calm");
        assert!(composer.content.is_empty());
    }

    #[test]
    fn test_create_named_board() {
        let mut store = store();
        let mut ids = IdGenerator::new();
        let mut catalog = BoardCatalog::new();
        catalog.new_board_name = "Calm".to_string();

        let (id, note) = catalog.create_board(&mut store, &mut ids, Utc::now()).unwrap();
        assert_eq!(note.description, "Your \"Calm\" mood board is ready to use.");

        let board = &store.mood_boards()[0];
        assert_eq!(board.id, id);
        assert_eq!(board.name, "Calm");
        assert!(board.items.is_empty());
        assert_eq!(board.created_at, board.updated_at);
        assert!(catalog.new_board_name.is_empty());
    }

    #[test]
    fn test_board_name_required() {
        let mut store = store();
        let mut ids = IdGenerator::new();
        let mut catalog = BoardCatalog::new();
        catalog.new_board_name = "  ".to_string();

        let note = catalog.create_board(&mut store, &mut ids, Utc::now()).unwrap_err();
        assert_eq!(note.title, "Board name required");
        assert!(store.mood_boards().is_empty());
        assert_eq!(catalog.new_board_name, "  ");
    }

    #[test]
    fn test_save_items_snapshots_editor() {
        let mut store = store();
        let mut ids = IdGenerator::new();
        let mut catalog = BoardCatalog::new();
        catalog.new_board_name = "Calm".to_string();
        let created = Utc::now();
        let (id, _) = catalog.create_board(&mut store, &mut ids, created).unwrap();

        let items = vec![BoardItem::text("t1".to_string(), 0)];
        let later = created + chrono::Duration::seconds(5);
        let note = catalog.save_items(&mut store, &id, items.clone(), later);
        assert_eq!(note.severity, Severity::Info);

        let board = &store.mood_boards()[0];
        assert_eq!(board.items, items);
        assert_eq!(board.created_at, created);
        assert_eq!(board.updated_at, later);
        assert_eq!(BoardCatalog::board_items(&store, &id), Some(items));
    }

    #[test]
    fn test_save_items_unknown_board() {
        let mut store = store();
        let catalog = BoardCatalog::new();
        let note = catalog.save_items(&mut store, "missing", Vec::new(), Utc::now());
        assert_eq!(note.severity, Severity::Error);
        assert!(store.mood_boards().is_empty());
        assert_eq!(BoardCatalog::board_items(&store, "missing"), None);
    }

    #[test]
    fn test_mood_labels() {
        assert_eq!(mood_label(1), "Sad");
        assert_eq!(mood_label(4), "Down");
        assert_eq!(mood_label(5), "Neutral");
        assert_eq!(mood_label(8), "Good");
        assert_eq!(mood_label(10), "Great");
        assert_eq!(mood_emoji(9), "😁");
    }
}
