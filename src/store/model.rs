//! Durable entities and their partial-update patches

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::board::BoardItem;

/// A mood check-in. `value` is expected in 1..=10; the tracker enforces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mood {
    pub id: String,
    pub date: DateTime<Utc>,
    pub value: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: String,
    pub date: DateTime<Utc>,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood_id: Option<String>,
}

/// A named board with a snapshot of its items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodBoard {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub items: Vec<BoardItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MoodBoard {
    /// Empty board; `created_at` and `updated_at` share the same instant
    pub fn new(id: String, name: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name,
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoodPatch {
    pub date: Option<DateTime<Utc>>,
    pub value: Option<u8>,
    pub notes: Option<Option<String>>,
}

impl MoodPatch {
    pub(crate) fn apply(self, mood: &mut Mood) {
        if let Some(date) = self.date {
            mood.date = date;
        }
        if let Some(value) = self.value {
            mood.value = value;
        }
        if let Some(notes) = self.notes {
            mood.notes = notes;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoodBoardPatch {
    pub name: Option<String>,
    pub items: Option<Vec<BoardItem>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl MoodBoardPatch {
    pub(crate) fn apply(self, board: &mut MoodBoard) {
        if let Some(name) = self.name {
            board.name = name;
        }
        if let Some(items) = self.items {
            board.items = items;
        }
        if let Some(created_at) = self.created_at {
            board.created_at = created_at;
        }
        if let Some(updated_at) = self.updated_at {
            board.updated_at = updated_at;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JournalEntryPatch {
    pub date: Option<DateTime<Utc>>,
    pub content: Option<String>,
    pub mood_id: Option<Option<String>>,
}

impl JournalEntryPatch {
    pub(crate) fn apply(self, entry: &mut JournalEntry) {
        if let Some(date) = self.date {
            entry.date = date;
        }
        if let Some(content) = self.content {
            entry.content = content;
        }
        if let Some(mood_id) = self.mood_id {
            entry.mood_id = mood_id;
        }
    }
}

/// Everything written under the storage key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreState {
    #[serde(default)]
    pub moods: Vec<Mood>,
    #[serde(default)]
    pub mood_boards: Vec<MoodBoard>,
    #[serde(default)]
    pub journal_entries: Vec<JournalEntry>,
}

/// Layouts accepted when reading storage
///
/// Older data may wrap the state as `{"state": {...}, "version": 0}`;
/// the bare object is what we write.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum StoredLayout {
    Wrapped {
        state: StoreState,
        #[allow(dead_code)]
        #[serde(default)]
        version: u32,
    },
    Bare(StoreState),
}

impl StoredLayout {
    pub(crate) fn into_state(self) -> StoreState {
        match self {
            StoredLayout::Wrapped { state, .. } => state,
            StoredLayout::Bare(state) => state,
        }
    }
}
