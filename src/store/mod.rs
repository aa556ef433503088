//! Persisted store for moods, mood boards and journal entries
//!
//! The whole state is serialized to JSON and written under a single storage
//! key after every mutation, and read back once when the store is loaded.

mod model;
mod storage;

pub use model::{
    JournalEntry, JournalEntryPatch, Mood, MoodBoard, MoodBoardPatch, MoodPatch, StoreState,
};
#[cfg(test)]
pub use storage::MemoryStorage;
pub use storage::{FileStorage, LocalStorage, open_file_storage};

use anyhow::{Context, Result};
use std::sync::mpsc::{self, Receiver, Sender};
use tracing::{debug, error, info, warn};

use crate::constants::storage::STORE_KEY;
use model::StoredLayout;

/// Which collection a mutation touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    MoodsChanged,
    MoodBoardsChanged,
    JournalChanged,
}

pub struct Store<S: LocalStorage> {
    state: StoreState,
    storage: S,
    subscribers: Vec<Sender<StoreEvent>>,
}

impl<S: LocalStorage> Store<S> {
    /// Rehydrate from storage, starting empty when nothing usable is stored
    pub fn load(storage: S) -> Self {
        let state = match read_state(&storage) {
            Ok(Some(state)) => {
                info!(
                    moods = state.moods.len(),
                    mood_boards = state.mood_boards.len(),
                    journal_entries = state.journal_entries.len(),
                    "Rehydrated store"
                );
                state
            }
            Ok(None) => {
                info!(key = STORE_KEY, "No stored state, starting empty");
                StoreState::default()
            }
            Err(e) => {
                warn!(key = STORE_KEY, error = ?e, "Discarding unreadable stored state");
                StoreState::default()
            }
        };

        Self {
            state,
            storage,
            subscribers: Vec::new(),
        }
    }

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    pub fn moods(&self) -> &[Mood] {
        &self.state.moods
    }

    pub fn mood_boards(&self) -> &[MoodBoard] {
        &self.state.mood_boards
    }

    pub fn journal_entries(&self) -> &[JournalEntry] {
        &self.state.journal_entries
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Receive an event after every effective mutation
    pub fn subscribe(&mut self) -> Receiver<StoreEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    // === Moods ===

    pub fn add_mood(&mut self, mood: Mood) {
        debug!(id = %mood.id, value = mood.value, "Adding mood");
        self.state.moods.push(mood);
        self.commit(StoreEvent::MoodsChanged);
    }

    pub fn update_mood(&mut self, id: &str, patch: MoodPatch) {
        if let Some(mood) = self.state.moods.iter_mut().find(|m| m.id == id) {
            patch.apply(mood);
            self.commit(StoreEvent::MoodsChanged);
        }
    }

    pub fn delete_mood(&mut self, id: &str) {
        let before = self.state.moods.len();
        self.state.moods.retain(|m| m.id != id);
        if self.state.moods.len() != before {
            self.commit(StoreEvent::MoodsChanged);
        }
    }

    // === Mood boards ===

    pub fn add_mood_board(&mut self, board: MoodBoard) {
        debug!(id = %board.id, name = %board.name, "Adding mood board");
        self.state.mood_boards.push(board);
        self.commit(StoreEvent::MoodBoardsChanged);
    }

    pub fn update_mood_board(&mut self, id: &str, patch: MoodBoardPatch) {
        if let Some(board) = self.state.mood_boards.iter_mut().find(|b| b.id == id) {
            patch.apply(board);
            self.commit(StoreEvent::MoodBoardsChanged);
        }
    }

    pub fn delete_mood_board(&mut self, id: &str) {
        let before = self.state.mood_boards.len();
        self.state.mood_boards.retain(|b| b.id != id);
        if self.state.mood_boards.len() != before {
            self.commit(StoreEvent::MoodBoardsChanged);
        }
    }

    // === Journal ===

    pub fn add_journal_entry(&mut self, entry: JournalEntry) {
        debug!(id = %entry.id, chars = entry.content.chars().count(), "Adding journal entry");
        self.state.journal_entries.push(entry);
        self.commit(StoreEvent::JournalChanged);
    }

    pub fn update_journal_entry(&mut self, id: &str, patch: JournalEntryPatch) {
        if let Some(entry) = self.state.journal_entries.iter_mut().find(|e| e.id == id) {
            patch.apply(entry);
            self.commit(StoreEvent::JournalChanged);
        }
    }

    pub fn delete_journal_entry(&mut self, id: &str) {
        let before = self.state.journal_entries.len();
        self.state.journal_entries.retain(|e| e.id != id);
        if self.state.journal_entries.len() != before {
            self.commit(StoreEvent::JournalChanged);
        }
    }

    fn commit(&mut self, event: StoreEvent) {
        // A failed write keeps the in-memory change
        if let Err(e) = self.persist() {
            error!(key = STORE_KEY, error = ?e, "Failed to persist store");
        }
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }

    fn persist(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.state).context("Failed to serialize store")?;
        self.storage.set_item(STORE_KEY, &json)
    }
}

fn read_state<S: LocalStorage>(storage: &S) -> Result<Option<StoreState>> {
    let Some(contents) = storage.get_item(STORE_KEY)? else {
        return Ok(None);
    };
    let layout: StoredLayout =
        serde_json::from_str(&contents).context("Failed to parse stored state")?;
    Ok(Some(layout.into_state()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardItem;
    use chrono::{TimeZone, Utc};

    fn at(day: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, 9, 30, 0).unwrap()
    }

    fn mood(id: &str, value: u8) -> Mood {
        Mood {
            id: id.to_string(),
            date: at(1),
            value,
            notes: Some("walked the dog".to_string()),
        }
    }

    fn entry(id: &str, content: &str) -> JournalEntry {
        JournalEntry {
            id: id.to_string(),
            date: at(2),
            content: content.to_string(),
            mood_id: None,
        }
    }

    #[test]
    fn test_load_empty_storage() {
        let store = Store::load(MemoryStorage::new());
        assert_eq!(store.state(), &StoreState::default());
    }

    #[test]
    fn test_load_corrupt_storage_falls_back_to_empty() {
        let store = Store::load(MemoryStorage::with_item(STORE_KEY, "{not json"));
        assert!(store.moods().is_empty());
        assert!(store.mood_boards().is_empty());
        assert!(store.journal_entries().is_empty());
    }

    #[test]
    fn test_every_mutation_persists() {
        let mut store = Store::load(MemoryStorage::new());
        store.add_mood(mood("1", 7));

        let raw = store.storage().get_item(STORE_KEY).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["moods"][0]["value"], 7);
        assert!(json["moodBoards"].as_array().unwrap().is_empty());
        assert!(json["journalEntries"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_round_trip_preserves_insertion_order() {
        let mut store = Store::load(MemoryStorage::new());
        store.add_mood(mood("3", 2));
        store.add_mood(mood("1", 9));
        store.add_mood(mood("2", 5));
        let mut board = MoodBoard::new("b1".to_string(), "Calm".to_string(), at(3));
        board.items.push(BoardItem::text("t1".to_string(), 0));
        store.add_mood_board(board);
        store.add_journal_entry(entry("j2", "second"));
        store.add_journal_entry(entry("j1", "first"));

        let reloaded = Store::load(store.storage().clone());
        assert_eq!(reloaded.state(), store.state());
        let ids: Vec<&str> = reloaded.moods().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
    }

    #[test]
    fn test_update_merges_partial_fields() {
        let mut store = Store::load(MemoryStorage::new());
        store.add_mood(mood("1", 4));
        store.update_mood(
            "1",
            MoodPatch {
                value: Some(8),
                ..MoodPatch::default()
            },
        );
        let updated = &store.moods()[0];
        assert_eq!(updated.value, 8);
        assert_eq!(updated.notes.as_deref(), Some("walked the dog"));
        assert_eq!(updated.date, at(1));
    }

    #[test]
    fn test_update_and_delete_unknown_id_are_noops() {
        let mut store = Store::load(MemoryStorage::new());
        store.add_journal_entry(entry("j1", "hello"));
        let events = store.subscribe();
        let before = store.state().clone();

        store.update_journal_entry(
            "missing",
            JournalEntryPatch {
                content: Some("changed".to_string()),
                ..JournalEntryPatch::default()
            },
        );
        store.delete_journal_entry("missing");
        store.delete_mood("missing");
        store.delete_mood_board("missing");

        assert_eq!(store.state(), &before);
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_delete_removes_matching_entity() {
        let mut store = Store::load(MemoryStorage::new());
        store.add_mood(mood("1", 3));
        store.add_mood(mood("2", 6));
        store.delete_mood("1");
        assert_eq!(store.moods().len(), 1);
        assert_eq!(store.moods()[0].id, "2");
    }

    #[test]
    fn test_add_does_not_check_uniqueness() {
        let mut store = Store::load(MemoryStorage::new());
        store.add_mood(mood("dup", 3));
        store.add_mood(mood("dup", 4));
        assert_eq!(store.moods().len(), 2);
    }

    #[test]
    fn test_store_performs_no_range_validation() {
        let mut store = Store::load(MemoryStorage::new());
        store.add_mood(mood("zero", 0));
        store.add_mood(mood("eleven", 11));
        assert_eq!(store.moods().len(), 2);
    }

    #[test]
    fn test_update_board_items() {
        let mut store = Store::load(MemoryStorage::new());
        store.add_mood_board(MoodBoard::new("b".to_string(), "Calm".to_string(), at(1)));
        store.update_mood_board(
            "b",
            MoodBoardPatch {
                items: Some(vec![BoardItem::text("t".to_string(), 0)]),
                updated_at: Some(at(4)),
                ..MoodBoardPatch::default()
            },
        );
        let board = &store.mood_boards()[0];
        assert_eq!(board.items.len(), 1);
        assert_eq!(board.created_at, at(1));
        assert_eq!(board.updated_at, at(4));
        assert_eq!(board.name, "Calm");
    }

    #[test]
    fn test_subscribers_receive_events() {
        let mut store = Store::load(MemoryStorage::new());
        let events = store.subscribe();
        let dropped = store.subscribe();
        drop(dropped);

        store.add_mood(mood("1", 5));
        store.add_journal_entry(entry("j", "x"));
        store.add_mood_board(MoodBoard::new("b".to_string(), "B".to_string(), at(1)));

        let received: Vec<StoreEvent> = events.try_iter().collect();
        assert_eq!(
            received,
            vec![
                StoreEvent::MoodsChanged,
                StoreEvent::JournalChanged,
                StoreEvent::MoodBoardsChanged
            ]
        );
        assert_eq!(store.subscribers.len(), 1);
    }

    #[test]
    fn test_reads_wrapped_web_layout() {
        let raw = r##"{"state":{"moods":[{"id":"1714000000000","date":"2024-04-24T23:06:40.000Z","value":6,"notes":""}],
            "moodBoards":[{"id":"b","name":"Calm","items":[],"createdAt":"2024-04-25T10:00:00.000Z","updatedAt":"2024-04-25T10:00:00.000Z"}],
            "journalEntries":[{"id":"j","date":"2024-04-25T11:00:00.000Z","content":"Today I felt..."}]},"version":0}"##;
        let store = Store::load(MemoryStorage::with_item(STORE_KEY, raw));
        assert_eq!(store.moods().len(), 1);
        assert_eq!(store.moods()[0].value, 6);
        assert_eq!(store.mood_boards()[0].name, "Calm");
        assert_eq!(store.journal_entries()[0].mood_id, None);
    }

    #[test]
    fn test_tolerates_missing_collections_and_unknown_fields() {
        let raw = r#"{"moods":[],"theme":"dark"}"#;
        let store = Store::load(MemoryStorage::with_item(STORE_KEY, raw));
        assert!(store.mood_boards().is_empty());
        assert!(store.journal_entries().is_empty());
    }

    #[test]
    fn test_file_backed_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = Store::load(FileStorage::new(dir.path()));
            store.add_journal_entry(entry("j1", "persisted"));
        }
        let store = Store::load(FileStorage::new(dir.path()));
        assert_eq!(store.journal_entries()[0].content, "persisted");
    }
}
